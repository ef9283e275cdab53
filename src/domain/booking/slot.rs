use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use derive_more::{Display, Error};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// 受付開始時刻
pub const FIRST_SLOT_HOUR: u32 = 9;
/// 受付終了時刻
pub const LAST_SLOT_HOUR: u32 = 21;

/// 受け渡し時刻の枠 (09:00〜21:00、1時間刻み)
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct TimeSlot(u32);

impl TimeSlot {
    pub fn from_hour(hour: u32) -> Result<Self, SlotError> {
        if !(FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&hour) {
            return Err(SlotError::OutOfHours);
        }
        Ok(Self(hour))
    }

    /// 全ての枠を昇順で返す
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).map(TimeSlot)
    }

    pub fn hour(&self) -> u32 {
        self.0
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.0, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for TimeSlot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| SlotError::Malformed)?;
        if time.minute() != 0 {
            return Err(SlotError::OutOfHours);
        }
        Self::from_hour(time.hour())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum SlotError {
    #[display(fmt = "Time must be formatted as HH:MM")]
    Malformed,
    #[display(fmt = "Time must be an hourly slot between 09:00 and 21:00")]
    OutOfHours,
}
