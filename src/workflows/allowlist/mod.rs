//! Approved-applicant phone allowlist and its append-only change audit.
//!
//! A separate, simpler machine from the admissions pipeline: numbers are
//! pre-authorized here before an application can be started, and every
//! later change of an approved number leaves an immutable audit row.

pub mod domain;
pub mod phone;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AllowlistRecordId, ApprovedApplicant, PhoneChangeAudit};
pub use phone::normalize_phone;
pub use repository::{AllowlistRepository, AllowlistRepositoryError};
pub use router::allowlist_router;
pub use service::{AllowlistService, AllowlistServiceError, PhoneApproval};
