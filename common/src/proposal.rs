use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message stored when the sender does not write their own.
pub const DEFAULT_MESSAGE: &str = "From the moment I met you, I knew you were special. \
Thank you for saying yes to being my Valentine. I promise to make this \
Valentine's Week 2026 unforgettable!";

/// Lifecycle state of a proposal. The only transition is
/// `Pending -> Accepted`; `Accepted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Pending,
    Accepted,
}

/// A stored proposal. Everything except `accepted`/`accepted_at` is
/// immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// 8-char URL-safe public id, assigned at creation.
    pub id: String,
    pub your_name: String,
    pub partner_name: String,
    /// WhatsApp number, digits only. Stored, never messaged by this service.
    pub phone_number: String,
    pub custom_message: String,
    pub accepted: bool,
    /// Set exactly once, together with `accepted`. `null` on the wire
    /// until acceptance.
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// Build a fresh pending record from validated input.
    pub fn new(id: String, input: &NewProposal, created_at: DateTime<Utc>) -> Self {
        Proposal {
            id,
            your_name: input.your_name.clone(),
            partner_name: input.partner_name.clone(),
            phone_number: input.phone_number.clone(),
            custom_message: input.resolved_message().to_string(),
            accepted: false,
            accepted_at: None,
            created_at,
        }
    }

    pub fn status(&self) -> ProposalStatus {
        if self.accepted {
            ProposalStatus::Accepted
        } else {
            ProposalStatus::Pending
        }
    }

    /// Transition to `Accepted`. Idempotent: a record that is already
    /// accepted keeps its original `accepted_at`, so the pair never
    /// disagrees and the first acceptance time survives re-delivery.
    pub fn mark_accepted(&mut self, now: DateTime<Utc>) {
        self.accepted = true;
        self.accepted_at.get_or_insert(now);
    }
}

/// Input for creating a proposal. `custom_message` falls back to
/// [`DEFAULT_MESSAGE`] when absent or empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub your_name: String,
    pub partner_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub custom_message: Option<String>,
}

impl NewProposal {
    /// Check the input against [`VALIDATION_RULES`] in declaration order.
    /// First failing rule wins; nothing is batched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for rule in VALIDATION_RULES {
            if !(rule.check)(self) {
                return Err(ValidationError {
                    message: rule.message,
                    field: rule.field,
                });
            }
        }
        Ok(())
    }

    /// The message that will actually be stored.
    pub fn resolved_message(&self) -> &str {
        match &self.custom_message {
            Some(m) if !m.is_empty() => m,
            _ => DEFAULT_MESSAGE,
        }
    }
}

/// One declarative validation rule: a wire-level field name, the check,
/// and the message reported when it fails. Shared by the create operation
/// and any client-side pre-validation so the two never drift.
pub struct FieldRule {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&NewProposal) -> bool,
}

pub const VALIDATION_RULES: &[FieldRule] = &[
    FieldRule {
        field: "yourName",
        message: "Your name is required",
        check: |p| !p.your_name.trim().is_empty(),
    },
    FieldRule {
        field: "partnerName",
        message: "Partner name is required",
        check: |p| !p.partner_name.trim().is_empty(),
    },
    FieldRule {
        field: "phoneNumber",
        message: "Phone number must be between 10 and 15 digits",
        check: |p| is_valid_phone(&p.phone_number),
    },
];

/// `^\d{10,15}$` without the regex machinery.
fn is_valid_phone(phone: &str) -> bool {
    (10..=15).contains(&phone.len()) && phone.bytes().all(|b| b.is_ascii_digit())
}

/// A create input rejected by [`VALIDATION_RULES`]. This is a wire value
/// (the 400 body), not a server fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub message: &'static str,
    pub field: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
