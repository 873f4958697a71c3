use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for allowlist records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllowlistRecordId(pub String);

/// A phone number pre-authorized to begin a ministerial application.
/// Keyed by the normalized phone number; distinct from any application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedApplicant {
    pub id: AllowlistRecordId,
    /// Canonical international form, see [`super::phone::normalize_phone`].
    pub phone_number: String,
    pub approved_by: String,
    pub approved_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Immutable audit row written before every approved-number change.
/// Append-only: never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneChangeAudit {
    pub record_id: AllowlistRecordId,
    pub old_phone_number: String,
    pub new_phone_number: String,
    pub changed_by: String,
    pub reason: String,
    pub changed_at: DateTime<Utc>,
}
