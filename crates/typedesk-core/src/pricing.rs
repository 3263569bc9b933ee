//! # Pricing Engine
//!
//! Pure price computation for order drafts. No side effects, no hidden
//! state: the same `(service, pages, urgency)` against the same
//! `PricingConfig` always yields the same quote.

use crate::error::OrderResult;
use crate::money::round2;
use crate::service::{PricingConfig, ServiceKind, ServiceUnit, Urgency};
use serde::{Deserialize, Serialize};

/// Price breakdown for one order.
///
/// All fields are in major currency units and unrounded; call
/// [`PriceQuote::rounded`] for display values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Pre-urgency subtotal (base rate scaled by the service unit)
    pub base: f64,
    /// Surcharge added by the urgency tier
    pub urgency_charge: f64,
    /// Tax on the post-urgency subtotal
    pub tax: f64,
    /// Subtotal after the urgency multiplier, before tax
    pub subtotal: f64,
    /// Final amount owed
    pub total: f64,
}

impl PriceQuote {
    /// Copy of this quote with every field rounded to 2 decimal places.
    /// Rounding happens only here, so the breakdown fields never compound
    /// rounding error against each other.
    pub fn rounded(&self) -> PriceQuote {
        PriceQuote {
            base: round2(self.base),
            urgency_charge: round2(self.urgency_charge),
            tax: round2(self.tax),
            subtotal: round2(self.subtotal),
            total: round2(self.total),
        }
    }
}

/// Compute a price quote for `(service, pages, urgency)`.
///
/// Fails with `UnknownService` if the rate table has no entry for the
/// service. Assumes `pages >= 1`; callers clamp on input.
pub fn quote(
    config: &PricingConfig,
    service: ServiceKind,
    pages: u32,
    urgency: Urgency,
) -> OrderResult<PriceQuote> {
    let rate = config.rate(service)?;

    let base = match rate.unit {
        ServiceUnit::PerPage => rate.base * pages as f64,
        ServiceUnit::PerHour | ServiceUnit::Flat => rate.base,
    };

    let multiplier = config.multiplier(urgency);
    let urgency_charge = base * (multiplier - 1.0);
    let subtotal = base * multiplier;

    let tax = subtotal * config.tax_rate;
    let total = subtotal + tax;

    Ok(PriceQuote {
        base,
        urgency_charge,
        tax,
        subtotal,
        total,
    })
}
