//! Registration (booking) model.

use serde::{Deserialize, Serialize};

use crate::db::StoredDocument;

/// Booking lifecycle. Any state may be set explicitly by an admin.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 3] = [
        RegistrationStatus::Pending,
        RegistrationStatus::Confirmed,
        RegistrationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RegistrationStatus::Pending),
            "confirmed" => Some(RegistrationStatus::Confirmed),
            "cancelled" => Some(RegistrationStatus::Cancelled),
            _ => None,
        }
    }
}

/// Ticket types on sale and their price in whole pounds.
pub const TICKET_PRICES: [(&str, u32); 3] = [
    ("CONFERENCE_DINNER_ACCOMMODATION", 499),
    ("CONFERENCE_DINNER", 429),
    ("CONFERENCE_ONLY", 399),
];

/// Price of a ticket type; unknown types (from older data) cost nothing.
pub fn ticket_price(ticket_type: &str) -> u32 {
    TICKET_PRICES
        .iter()
        .find(|(name, _)| *name == ticket_type)
        .map(|(_, price)| *price)
        .unwrap_or(0)
}

pub fn is_known_ticket_type(ticket_type: &str) -> bool {
    TICKET_PRICES.iter().any(|(name, _)| *name == ticket_type)
}

/// One delegate's booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    #[serde(default)]
    pub booking_reference: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_title: String,
    pub ticket_type: String,
    #[serde(default)]
    pub dietary_requirements: String,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub billing_name: String,
    #[serde(default)]
    pub billing_email: String,
    #[serde(default)]
    pub billing_phone: String,
    #[serde(default)]
    pub billing_address: String,
    pub created_at: String,
    #[serde(default)]
    pub status: RegistrationStatus,
}

impl Registration {
    /// Build a pending registration for one delegate of a batch.
    pub fn from_delegate(
        delegate: &DelegateInput,
        billing: &BillingInfo,
        booking_reference: String,
        created_at: String,
    ) -> Self {
        let company = if billing.company.trim().is_empty() {
            delegate.company.trim().to_string()
        } else {
            billing.company.trim().to_string()
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            booking_reference,
            first_name: delegate.first_name.trim().to_string(),
            last_name: delegate.last_name.trim().to_string(),
            email: delegate.email.trim().to_string(),
            company,
            job_title: delegate.job_title.trim().to_string(),
            ticket_type: delegate.ticket_type.trim().to_string(),
            dietary_requirements: delegate.dietary_requirements.trim().to_string(),
            special_requests: delegate.special_requests.trim().to_string(),
            billing_name: billing.cardholder_name.trim().to_string(),
            billing_email: delegate.email.trim().to_string(),
            billing_phone: billing.cardholder_phone.trim().to_string(),
            billing_address: billing.address_line(),
            created_at,
            status: RegistrationStatus::Pending,
        }
    }

    /// Reference shown on exports; very old records only had an id.
    pub fn display_reference(&self) -> &str {
        if self.booking_reference.is_empty() {
            &self.id
        } else {
            &self.booking_reference
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn price(&self) -> u32 {
        ticket_price(&self.ticket_type)
    }
}

impl StoredDocument for Vec<Registration> {
    const KEY: &'static str = "registrations";

    fn default_document() -> Self {
        Vec::new()
    }
}

/// Batch part of a booking reference (`FWD123456-2` -> `FWD123456`).
pub fn batch_reference(reference: &str) -> &str {
    reference.split('-').next().unwrap_or(reference)
}

/// Pick a batch reference not used by any stored registration.
///
/// Derived from the last six digits of the millisecond clock and bumped on collision.
pub fn generate_booking_reference(existing: &[Registration], now_millis: i64) -> String {
    const SPACE: i64 = 1_000_000;
    let taken: std::collections::HashSet<&str> = existing
        .iter()
        .map(|r| batch_reference(&r.booking_reference))
        .collect();

    let mut candidate = now_millis.rem_euclid(SPACE);
    for _ in 0..SPACE {
        let reference = format!("FWD{:06}", candidate);
        if !taken.contains(reference.as_str()) {
            return reference;
        }
        candidate = (candidate + 1) % SPACE;
    }

    // Every six-digit reference is in use; widen instead of failing.
    format!("FWD{}", now_millis)
}

/// References for each delegate in a batch of `count`.
pub fn delegate_references(base: &str, count: usize) -> Vec<String> {
    if count == 1 {
        vec![base.to_string()]
    } else {
        (1..=count).map(|i| format!("{}-{}", base, i)).collect()
    }
}

/// A delegate as submitted on the booking form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub ticket_type: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub dietary_requirements: String,
    #[serde(default)]
    pub special_requests: String,
}

/// Billing details shared by every delegate in a batch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingInfo {
    #[serde(default)]
    pub cardholder_name: String,
    #[serde(default)]
    pub cardholder_phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
}

impl BillingInfo {
    /// Single-line postal address, skipping blank parts.
    pub fn address_line(&self) -> String {
        [&self.street_address, &self.city, &self.postal_code]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Request body for creating registrations.
///
/// Accepts `{ delegates: [...], billingInfo }` or a single delegate object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub delegates: Option<Vec<DelegateInput>>,
    #[serde(default)]
    pub billing_info: BillingInfo,
    #[serde(flatten)]
    pub delegate: DelegateInput,
}

impl CreateRegistrationRequest {
    /// Whether the batch form was used.
    pub fn is_batch(&self) -> bool {
        self.delegates.is_some()
    }

    pub fn into_parts(self) -> (Vec<DelegateInput>, BillingInfo) {
        let delegates = self.delegates.unwrap_or_else(|| vec![self.delegate]);
        (delegates, self.billing_info)
    }
}

/// Response body for a successful booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub reference: String,
    pub registrations: Vec<Registration>,
}

/// Request body for a status change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationStatusRequest {
    #[serde(default)]
    pub status: String,
}
