//! Ministerial admissions platform: multi-stage application review,
//! required-document checklists, and the approved-applicant phone allowlist.
//!
//! The workflow core is deliberately decoupled from storage and transport:
//! persistence and messaging are traits implemented by adapters at the edge.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
