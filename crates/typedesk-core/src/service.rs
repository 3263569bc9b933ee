//! # Services & Rates
//!
//! Service types and the pricing rate table for typedesk-rs.
//! Rates are loaded from `config/pricing.toml`; the compiled-in defaults
//! match the published price list.

use crate::error::{OrderError, OrderResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Typing service offerings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Document,
    DataEntry,
    Thesis,
    Business,
    Book,
    Multilingual,
}

impl ServiceKind {
    /// Human-readable service name
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Document => "Document Typing",
            ServiceKind::DataEntry => "Data Entry",
            ServiceKind::Thesis => "Thesis Typing",
            ServiceKind::Business => "Business Documents",
            ServiceKind::Book => "Book Typing",
            ServiceKind::Multilingual => "Multilingual Typing",
        }
    }

    /// Wire identifier (matches the order form values)
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Document => "document",
            ServiceKind::DataEntry => "data-entry",
            ServiceKind::Thesis => "thesis",
            ServiceKind::Business => "business",
            ServiceKind::Book => "book",
            ServiceKind::Multilingual => "multilingual",
        }
    }

    /// All known services, in price-list order
    pub fn all() -> &'static [ServiceKind] {
        &[
            ServiceKind::Document,
            ServiceKind::DataEntry,
            ServiceKind::Thesis,
            ServiceKind::Business,
            ServiceKind::Book,
            ServiceKind::Multilingual,
        ]
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a service's base rate applies to the page count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceUnit {
    /// Base rate multiplied by the page count
    PerPage,
    /// Flat hourly rate, independent of the page count
    PerHour,
    /// Fixed price, independent of the page count
    Flat,
}

/// Requested turnaround band, each with a pricing multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Standard,
    Express,
    Urgent,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Standard
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Standard => "standard",
            Urgency::Express => "express",
            Urgency::Urgent => "urgent",
        }
    }
}

/// Base rate and unit classifier for one service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceRate {
    /// Base rate in major currency units
    pub base: f64,
    /// How the base rate scales with pages
    pub unit: ServiceUnit,
}

/// The full pricing configuration: per-service rates, urgency multipliers
/// and the tax rate. Externally supplied; never hard-coded into the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Per-service base rates
    pub rates: HashMap<ServiceKind, ServiceRate>,

    /// Urgency tier multipliers (standard must be 1.0)
    pub urgency_multipliers: HashMap<Urgency, f64>,

    /// Tax rate applied to the post-urgency subtotal (e.g. 0.18 for GST)
    pub tax_rate: f64,
}

impl PricingConfig {
    /// Look up the rate for a service
    pub fn rate(&self, service: ServiceKind) -> OrderResult<ServiceRate> {
        self.rates
            .get(&service)
            .copied()
            .ok_or_else(|| OrderError::UnknownService {
                service: service.to_string(),
            })
    }

    /// Look up the multiplier for an urgency tier (absent tiers price as standard)
    pub fn multiplier(&self, urgency: Urgency) -> f64 {
        self.urgency_multipliers.get(&urgency).copied().unwrap_or(1.0)
    }

    /// Load pricing from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        let mut rates = HashMap::new();
        rates.insert(
            ServiceKind::Document,
            ServiceRate {
                base: 2.0,
                unit: ServiceUnit::PerPage,
            },
        );
        rates.insert(
            ServiceKind::DataEntry,
            ServiceRate {
                base: 150.0,
                unit: ServiceUnit::PerHour,
            },
        );
        rates.insert(
            ServiceKind::Thesis,
            ServiceRate {
                base: 5.0,
                unit: ServiceUnit::PerPage,
            },
        );
        rates.insert(
            ServiceKind::Business,
            ServiceRate {
                base: 3.0,
                unit: ServiceUnit::PerPage,
            },
        );
        rates.insert(
            ServiceKind::Book,
            ServiceRate {
                base: 10000.0,
                unit: ServiceUnit::Flat,
            },
        );
        rates.insert(
            ServiceKind::Multilingual,
            ServiceRate {
                base: 4.0,
                unit: ServiceUnit::PerPage,
            },
        );

        let mut urgency_multipliers = HashMap::new();
        urgency_multipliers.insert(Urgency::Standard, 1.0);
        urgency_multipliers.insert(Urgency::Express, 1.25);
        urgency_multipliers.insert(Urgency::Urgent, 1.5);

        Self {
            rates,
            urgency_multipliers,
            tax_rate: 0.18,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_table() {
        let config = PricingConfig::default();

        let doc = config.rate(ServiceKind::Document).unwrap();
        assert_eq!(doc.base, 2.0);
        assert_eq!(doc.unit, ServiceUnit::PerPage);

        let book = config.rate(ServiceKind::Book).unwrap();
        assert_eq!(book.base, 10000.0);
        assert_eq!(book.unit, ServiceUnit::Flat);

        assert_eq!(config.multiplier(Urgency::Standard), 1.0);
        assert_eq!(config.multiplier(Urgency::Express), 1.25);
        assert_eq!(config.multiplier(Urgency::Urgent), 1.5);
        assert_eq!(config.tax_rate, 0.18);
    }

    #[test]
    fn test_missing_service_rate() {
        let mut config = PricingConfig::default();
        config.rates.remove(&ServiceKind::Thesis);

        let err = config.rate(ServiceKind::Thesis).unwrap_err();
        assert!(matches!(err, OrderError::UnknownService { .. }));
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            tax_rate = 0.18

            [rates.document]
            base = 2.0
            unit = "per-page"

            [rates.book]
            base = 10000.0
            unit = "flat"

            [urgency_multipliers]
            standard = 1.0
            express = 1.25
            urgent = 1.5
        "#;

        let config = PricingConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.rate(ServiceKind::Document).unwrap().base, 2.0);
        assert_eq!(
            config.rate(ServiceKind::Book).unwrap().unit,
            ServiceUnit::Flat
        );
        assert_eq!(config.multiplier(Urgency::Urgent), 1.5);
    }
}
