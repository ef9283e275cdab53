use chrono::NaiveDateTime;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use super::{period::hours, BookingError, BookingPeriod, RateCard};

/// 端数時間1時間あたりの料金 (日額に対する割合)
pub const DEFAULT_EXTRA_HOUR_FRACTION: f64 = 0.10;
/// この時間以上の端数は1日分として請求する
pub const DEFAULT_FULL_DAY_THRESHOLD_HOURS: f64 = 5.0;
/// 最低予約時間
pub const DEFAULT_MINIMUM_BOOKING_HOURS: u32 = 6;

/// 料金ポリシー
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub extra_hour_fraction: f64,
    pub full_day_threshold_hours: f64,
    pub minimum_booking_hours: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            extra_hour_fraction: DEFAULT_EXTRA_HOUR_FRACTION,
            full_day_threshold_hours: DEFAULT_FULL_DAY_THRESHOLD_HOURS,
            minimum_booking_hours: DEFAULT_MINIMUM_BOOKING_HOURS,
        }
    }
}

/// 見積もりの内訳。表示用であり、確定料金はサーバー側で計算される。
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct RentalQuote {
    pub weekday_subtotal: f64,
    pub weekend_subtotal: f64,
    pub extra_hours_charge: f64,
    pub extra_hours_billed_as_day: bool,
    pub unit_total: f64,
    pub quantity: u32,
    pub total: f64,
}

impl PricingPolicy {
    /// 設定から読み込んだ値を検証する
    pub fn validate(&self) -> Result<(), PricingPolicyError> {
        if !self.extra_hour_fraction.is_finite() || self.extra_hour_fraction < 0.0 {
            return Err(PricingPolicyError::InvalidExtraHourFraction);
        }
        if !self.full_day_threshold_hours.is_finite() || self.full_day_threshold_hours <= 0.0 {
            return Err(PricingPolicyError::InvalidFullDayThreshold);
        }
        Ok(())
    }

    pub fn quote(&self, period: &BookingPeriod, rates: &RateCard, quantity: u32) -> RentalQuote {
        if period.total_hours() <= 0.0 {
            return RentalQuote {
                quantity,
                ..RentalQuote::default()
            };
        }

        let weekday_subtotal = period.weekday_count() as f64 * rates.price_per_day_mon_thu();
        let weekend_subtotal = period.weekend_count() as f64 * rates.price_per_day_fri_sun();

        let extra_hours = period.extra_hours();
        let extra_hour_rate = rates.rate_for(period.last_day_type_for_extra_hours());
        let extra_hours_billed_as_day = extra_hours >= self.full_day_threshold_hours;
        let extra_hours_charge = if extra_hours_billed_as_day {
            extra_hour_rate
        } else if extra_hours > 0.0 {
            extra_hour_rate * self.extra_hour_fraction * extra_hours
        } else {
            0.0
        };

        let unit_total = weekday_subtotal + weekend_subtotal + extra_hours_charge;
        RentalQuote {
            weekday_subtotal,
            weekend_subtotal,
            extra_hours_charge,
            extra_hours_billed_as_day,
            unit_total,
            quantity,
            total: unit_total * quantity as f64,
        }
    }

    pub fn rental_cost(&self, period: &BookingPeriod, rates: &RateCard, quantity: u32) -> f64 {
        self.quote(period, rates, quantity).total
    }

    /// 最低予約時間を満たしているか。期間の分解結果ではなく日時から直接求める。
    pub fn ensure_minimum_duration(
        &self,
        pickup: NaiveDateTime,
        dropoff: NaiveDateTime,
    ) -> Result<(), BookingError> {
        let actual_hours = hours(dropoff - pickup);
        if actual_hours < self.minimum_booking_hours as f64 {
            return Err(BookingError::BelowMinimumDuration {
                required_hours: self.minimum_booking_hours,
                actual_hours,
            });
        }
        Ok(())
    }
}

/// 料金ポリシーのエラー
#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum PricingPolicyError {
    #[display(fmt = "pricing.extra_hour_fraction must be a non-negative number")]
    InvalidExtraHourFraction,
    #[display(fmt = "pricing.full_day_threshold_hours must be a positive number")]
    InvalidFullDayThreshold,
}

pub fn calculate_rental_cost(period: &BookingPeriod, rates: &RateCard, quantity: u32) -> f64 {
    PricingPolicy::default().rental_cost(period, rates, quantity)
}
