use std::fmt;

use derive_more::{Display, Error};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

use super::DayType;

/// 料金表 (バイクごと、読み取り専用)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateCard")]
pub struct RateCard {
    price_per_day_mon_thu: f64,
    price_per_day_fri_sun: f64,
}

impl RateCard {
    pub fn new(
        price_per_day_mon_thu: f64,
        price_per_day_fri_sun: f64,
    ) -> Result<Self, RateCardError> {
        Self::validate_price(price_per_day_mon_thu)?;
        Self::validate_price(price_per_day_fri_sun)?;
        Ok(Self {
            price_per_day_mon_thu,
            price_per_day_fri_sun,
        })
    }

    pub fn price_per_day_mon_thu(&self) -> f64 {
        self.price_per_day_mon_thu
    }

    pub fn price_per_day_fri_sun(&self) -> f64 {
        self.price_per_day_fri_sun
    }

    pub fn rate_for(&self, day_type: DayType) -> f64 {
        match day_type {
            DayType::Weekday => self.price_per_day_mon_thu,
            DayType::Weekend => self.price_per_day_fri_sun,
        }
    }

    fn validate_price(price: f64) -> Result<(), RateCardError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(RateCardError::NonPositivePrice);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawRateCard {
    price_per_day_mon_thu: f64,
    price_per_day_fri_sun: f64,
}

impl TryFrom<RawRateCard> for RateCard {
    type Error = RateCardError;

    fn try_from(value: RawRateCard) -> Result<Self, Self::Error> {
        RateCard::new(value.price_per_day_mon_thu, value.price_per_day_fri_sun)
    }
}

#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum RateCardError {
    #[display(fmt = "Day rates must be positive amounts")]
    NonPositivePrice,
}

/// 通貨
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    JPY,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::JPY => "¥",
        }
    }
}

/// 金額。丸めは表示時にのみ行う。
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Money {
    amount: f64,
    currency: Currency,
}

impl Money {
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = (self.amount.abs() * 100.0).round() as u64;
        let sign = if self.amount < 0.0 && cents > 0 { "-" } else { "" };
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            self.currency.symbol(),
            (cents / 100).to_formatted_string(&Locale::en),
            cents % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_for_day_type() {
        let rates = RateCard::new(1000.0, 1500.0).unwrap();
        assert_eq!(rates.rate_for(DayType::Weekday), 1000.0);
        assert_eq!(rates.rate_for(DayType::Weekend), 1500.0);
    }

    #[test]
    fn test_rate_card_rejects_non_positive() {
        assert_eq!(RateCard::new(0.0, 1500.0), Err(RateCardError::NonPositivePrice));
        assert_eq!(RateCard::new(1000.0, -1.0), Err(RateCardError::NonPositivePrice));
        assert_eq!(RateCard::new(f64::NAN, 1.0), Err(RateCardError::NonPositivePrice));
    }

    #[test]
    fn test_rate_card_deserialize_validates() {
        let rates: RateCard =
            serde_json::from_str(r#"{"price_per_day_mon_thu":1000.0,"price_per_day_fri_sun":1500.0}"#)
                .unwrap();
        assert_eq!(rates, RateCard::new(1000.0, 1500.0).unwrap());

        let negative = serde_json::from_str::<RateCard>(
            r#"{"price_per_day_mon_thu":-100.0,"price_per_day_fri_sun":-5.0}"#,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(1234567.0, Currency::INR).to_string(), "₹1,234,567.00");
        assert_eq!(Money::new(400.456, Currency::USD).to_string(), "$400.46");
        assert_eq!(Money::new(0.0, Currency::JPY).to_string(), "¥0.00");
    }
}
