//! # Money
//!
//! Currency handling for typedesk-rs. Quotes are computed in major units
//! (rupees) as `f64` and converted to minor units (paise) only at the
//! gateway boundary.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    INR,
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
        }
    }

    /// Number of decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        2
    }

    /// Convert a major-unit amount to the smallest currency unit
    /// (paise for INR, cents for USD)
    pub fn to_minor_units(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from minor units back to a major-unit amount
    pub fn from_minor_units(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }

    /// Currency symbol for display
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
        }
    }

    /// Format a major-unit amount for display (e.g., "₹23.60")
    pub fn display(&self, amount: f64) -> String {
        format!("{}{:.2}", self.symbol(), round2(amount))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::INR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round a monetary amount to 2 decimal places.
/// Applied at presentation and conversion time only, never inside the
/// pricing breakdown itself.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_unit_conversion() {
        let inr = Currency::INR;
        assert_eq!(inr.to_minor_units(23.60), 2360);
        assert_eq!(inr.to_minor_units(17700.0), 1_770_000);
        assert_eq!(inr.from_minor_units(2360), 23.60);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.5999999999999996), 3.6);
        assert_eq!(round2(23.604), 23.6);
        assert_eq!(round2(23.605), 23.61);
    }

    #[test]
    fn test_display() {
        assert_eq!(Currency::INR.display(23.6), "₹23.60");
        assert_eq!(Currency::USD.display(10.0), "$10.00");
    }
}
