//! Money type for representing prices.
//!
//! Prices arrive from the content store as JSON decimals in Turkish lira.
//! They are kept as an integer count of kuruş so that display and
//! comparison never go through floating point twice.

use std::fmt;

const KURUS_PER_LIRA: i64 = 100;

/// A price in Turkish lira.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Money {
    /// Amount in kuruş.
    pub amount_minor: i64,
}

impl Money {
    /// Create a new Money value from kuruş.
    pub fn new(amount_minor: i64) -> Self {
        Self { amount_minor }
    }

    /// Create a Money value from a lira amount.
    ///
    /// ```
    /// use vitrin_commerce::money::Money;
    /// let price = Money::from_decimal(249.9);
    /// assert_eq!(price.amount_minor, 24990);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::new((amount * KURUS_PER_LIRA as f64).round() as i64)
    }

    /// Convert to a lira value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / KURUS_PER_LIRA as f64
    }

    /// Amount with exactly two decimals, no symbol (e.g., "249.90").
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let per = KURUS_PER_LIRA as u64;
        format!("{}{}.{:02}", sign, abs / per, abs % per)
    }

    /// Format for shoppers (e.g., "249.90 TL").
    pub fn display(&self) -> String {
        format!("{} TL", self.display_amount())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Serde adapter for prices stored as non-negative JSON decimals.
///
/// Use with `#[serde(with = "vitrin_commerce::money::decimal")]`.
pub mod decimal {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(de::Error::custom(format!(
                "price must be a non-negative number, got {}",
                amount
            )));
        }
        Ok(Money::from_decimal(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_minor, 4999);
        assert_eq!(Money::from_decimal(0.1 + 0.2).amount_minor, 30);
    }

    #[test]
    fn test_money_display_two_decimals() {
        assert_eq!(Money::from_decimal(249.9).display(), "249.90 TL");
        assert_eq!(Money::new(5).display_amount(), "0.05");
        assert_eq!(Money::default().display_amount(), "0.00");
    }

    #[test]
    fn test_money_orders_by_amount() {
        let mut prices = vec![Money::new(399_00), Money::new(249_90), Money::new(5)];
        prices.sort();
        assert_eq!(prices, vec![Money::new(5), Money::new(249_90), Money::new(399_00)]);
    }

    #[derive(serde::Deserialize, serde::Serialize)]
    struct Priced {
        #[serde(with = "decimal")]
        price: Money,
    }

    #[test]
    fn test_decimal_serde() {
        let p: Priced = serde_json::from_str(r#"{"price": 120.5}"#).unwrap();
        assert_eq!(p.price.amount_minor, 12050);
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"price":120.5}"#);

        let p: Priced = serde_json::from_str(r#"{"price": 3}"#).unwrap();
        assert_eq!(p.price.amount_minor, 300);
    }

    #[test]
    fn test_decimal_rejects_negative() {
        let res: Result<Priced, _> = serde_json::from_str(r#"{"price": -1}"#);
        assert!(res.is_err());
    }
}
