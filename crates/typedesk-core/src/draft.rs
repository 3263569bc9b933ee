//! # Order Draft
//!
//! An order as it moves through the multi-step form: created at the contact
//! step, edited by later steps, finalized at submission. The draft is an
//! owned value object carried through the checkout pipeline, not ambient
//! storage read at each step.

use crate::error::{OrderError, OrderResult};
use crate::service::{ServiceKind, Urgency};
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Delivery format requested for the typed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileType {
    Docx,
    Pdf,
    GoogleDocs,
    Txt,
}

impl Default for FileType {
    fn default() -> Self {
        FileType::Docx
    }
}

impl FileType {
    pub fn display_name(&self) -> &'static str {
        match self {
            FileType::Docx => "Microsoft Word",
            FileType::Pdf => "PDF Document",
            FileType::GoogleDocs => "Google Docs",
            FileType::Txt => "Plain Text",
        }
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, payment not yet confirmed
    Pending,
    /// Paid and queued for typing
    Processing,
    /// Delivered
    Completed,
    /// Payment or fulfilment failed
    Failed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// An order not yet paid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Assigned at submission ("TS-" prefix, unique per draft)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Requested service
    pub service: ServiceKind,

    /// Page/unit count; semantics depend on the service unit. Always >= 1.
    pub pages: u32,

    /// Turnaround band
    #[serde(default)]
    pub urgency: Urgency,

    /// Requested delivery date (weekends are not working days)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    /// Output format
    #[serde(default)]
    pub file_type: FileType,

    /// Free-text instructions
    #[serde(default)]
    pub instructions: String,

    // Contact fields
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub address: String,

    /// Newsletter opt-in
    #[serde(default)]
    pub newsletter: bool,

    /// Terms acceptance; must be true before submission is accepted
    #[serde(default)]
    pub terms: bool,

    #[serde(default)]
    pub status: OrderStatus,

    /// Stamped from the pricing engine at submission, never hand-entered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Create a new draft for a service with contact details.
    /// Pages below 1 are clamped to 1.
    pub fn new(
        service: ServiceKind,
        pages: u32,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            order_id: None,
            service,
            pages: pages.max(1),
            urgency: Urgency::Standard,
            deadline: None,
            file_type: FileType::Docx,
            instructions: String::new(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            college: String::new(),
            address: String::new(),
            newsletter: false,
            terms: false,
            status: OrderStatus::Pending,
            price: None,
            created_at: Utc::now(),
        }
    }

    /// Set the page count, clamping to a minimum of 1
    pub fn set_pages(&mut self, pages: u32) {
        self.pages = pages.max(1);
    }

    /// Builder: set urgency tier
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    /// Builder: set deadline
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder: set output format
    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    /// Builder: set instructions
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Builder: accept the terms and conditions
    pub fn accept_terms(mut self) -> Self {
        self.terms = true;
        self
    }

    /// Validate the draft for submission. Rejects immediately on the first
    /// problem; no partial processing.
    pub fn validate(&self, today: NaiveDate) -> OrderResult<()> {
        if !self.terms {
            return Err(OrderError::Validation(
                "terms and conditions must be accepted".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(OrderError::MissingField { field: "name" });
        }
        if !valid_email(&self.email) {
            return Err(OrderError::Validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        if !valid_phone(&self.phone) {
            return Err(OrderError::Validation(
                "phone must be a 10-digit number".to_string(),
            ));
        }
        if let Some(deadline) = self.deadline {
            if deadline < today {
                return Err(OrderError::Validation(
                    "deadline cannot be in the past".to_string(),
                ));
            }
            if is_disabled_day(deadline) {
                return Err(OrderError::Validation(
                    "deadline falls on a non-working day".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Receipt identifier sent to the payment gateway
    pub fn receipt(&self) -> String {
        match &self.order_id {
            Some(id) => format!("receipt_{}", id),
            None => format!("receipt_{}", uuid::Uuid::new_v4().simple()),
        }
    }
}

/// Generate a client-facing order id ("TS-" + 8 digits), unique per draft
pub fn generate_order_id(now: DateTime<Utc>) -> String {
    format!("TS-{:08}", now.timestamp_millis().rem_euclid(100_000_000))
}

fn valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

fn valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.len() == 10
}

/// Weekends are disabled calendar days for deadlines
pub fn is_disabled_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Payment details attached to a finalized order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Gateway payment id
    pub transaction_id: String,
    /// Gateway-side order id
    pub remote_order_id: String,
    /// Amount charged, in minor currency units
    pub amount: i64,
    /// "completed" once verified; "unpaid" for the pay-later path
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// An order past the point of submission: either verified-paid or
/// explicitly unpaid (pay-later). Created only by the checkout orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedOrder {
    #[serde(flatten)]
    pub draft: OrderDraft,

    /// Present only after successful signature verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
}

impl FinalizedOrder {
    /// True if this order carries a verified payment
    pub fn is_paid(&self) -> bool {
        self.payment
            .as_ref()
            .map(|p| p.status == "completed")
            .unwrap_or(false)
    }
}
