pub mod admissions;
pub mod allowlist;
