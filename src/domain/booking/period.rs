use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// 料金区分
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// 月〜木
    #[default]
    Weekday,
    /// 金〜日
    Weekend,
}

impl DayType {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => DayType::Weekday,
            Weekday::Fri | Weekday::Sat | Weekday::Sun => DayType::Weekend,
        }
    }
}

/// 予約期間
///
/// 受け取りから返却までを24時間単位で区切り、各ブロックが始まる暦日の曜日で
/// 平日/週末に振り分ける。24時間に満たない残りは `extra_hours` になる。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingPeriod {
    pickup: NaiveDateTime,
    dropoff: NaiveDateTime,
    weekday_count: u32,
    weekend_count: u32,
    extra_hours: f64,
    last_day_type_for_extra_hours: DayType,
    total_hours: f64,
    duration: String,
}

impl BookingPeriod {
    pub fn between(pickup: NaiveDateTime, dropoff: NaiveDateTime) -> Self {
        let total_hours = hours(dropoff - pickup);
        if total_hours <= 0.0 {
            return Self::empty(pickup, dropoff);
        }

        let day = Duration::hours(24);
        let mut weekday_count = 0;
        let mut weekend_count = 0;
        let mut cursor = pickup;
        while cursor
            .checked_add_signed(day)
            .map_or(false, |next| next <= dropoff)
        {
            match DayType::of(cursor.date()) {
                DayType::Weekday => weekday_count += 1,
                DayType::Weekend => weekend_count += 1,
            }
            cursor += day;
        }
        let extra_hours = hours(dropoff - cursor);

        Self {
            pickup,
            dropoff,
            weekday_count,
            weekend_count,
            extra_hours,
            last_day_type_for_extra_hours: DayType::of(cursor.date()),
            total_hours,
            duration: render_duration(weekday_count + weekend_count, extra_hours),
        }
    }

    /// 予約できない(まだ入力が揃っていない)期間
    pub fn empty(pickup: NaiveDateTime, dropoff: NaiveDateTime) -> Self {
        Self {
            pickup,
            dropoff,
            weekday_count: 0,
            weekend_count: 0,
            extra_hours: 0.0,
            last_day_type_for_extra_hours: DayType::Weekday,
            total_hours: 0.0,
            duration: render_duration(0, 0.0),
        }
    }

    pub fn is_bookable(&self) -> bool {
        self.total_hours > 0.0
    }

    pub fn pickup(&self) -> NaiveDateTime {
        self.pickup
    }

    pub fn dropoff(&self) -> NaiveDateTime {
        self.dropoff
    }

    pub fn weekday_count(&self) -> u32 {
        self.weekday_count
    }

    pub fn weekend_count(&self) -> u32 {
        self.weekend_count
    }

    pub fn day_count(&self) -> u32 {
        self.weekday_count + self.weekend_count
    }

    pub fn extra_hours(&self) -> f64 {
        self.extra_hours
    }

    pub fn last_day_type_for_extra_hours(&self) -> DayType {
        self.last_day_type_for_extra_hours
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }
}

/// 受け取り・返却の日付と時刻枠から予約期間を求める
pub fn resolve_booking_period(
    pickup_date: NaiveDate,
    pickup_time: TimeSlot,
    dropoff_date: NaiveDate,
    dropoff_time: TimeSlot,
) -> BookingPeriod {
    let period = BookingPeriod::between(
        pickup_date.and_time(pickup_time.time()),
        dropoff_date.and_time(dropoff_time.time()),
    );
    tracing::trace!(duration = period.duration(), "booking period resolved");
    period
}

/// 文字列入力版。どれか一つでも解釈できなければ空の期間を返す。
pub fn resolve_booking_period_str(
    pickup_date: &str,
    pickup_time: &str,
    dropoff_date: &str,
    dropoff_time: &str,
) -> BookingPeriod {
    let parsed = (|| {
        Some((
            parse_date(pickup_date).ok()?,
            pickup_time.parse::<TimeSlot>().ok()?,
            parse_date(dropoff_date).ok()?,
            dropoff_time.parse::<TimeSlot>().ok()?,
        ))
    })();
    match parsed {
        Some((pd, pt, dd, dt)) => resolve_booking_period(pd, pt, dd, dt),
        None => {
            tracing::debug!("unparseable booking input, treating as empty period");
            BookingPeriod::empty(NaiveDateTime::MIN, NaiveDateTime::MIN)
        }
    }
}

/// `YYYY-MM-DD` 形式の日付を読む
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DateError::Malformed)
}

#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum DateError {
    #[display(fmt = "Date must be formatted as YYYY-MM-DD")]
    Malformed,
}

pub(crate) fn hours(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 3600.0
}

fn render_duration(days: u32, extra_hours: f64) -> String {
    format!("{} days {} hours", days, extra_hours.trunc() as i64)
}
