//! Ministerial admissions intake and the staged review pipeline.
//!
//! The pipeline is a strict linear sequence of statuses with a single
//! escape hatch to `rejected`. Transition legality lives in [`rules`] as a
//! pure function; [`service`] sequences the effectful steps (load, persist,
//! notify) around it. Storage and messaging are traits so the core can be
//! exercised without a database or SMS gateway.

pub mod documents;
pub mod domain;
pub mod letters;
pub mod notifications;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use documents::{missing_documents, required_documents, Document, DocumentType};
pub use domain::{
    AdmissionLevel, Application, ApplicationId, ApplicationIntake, ApplicationStatus,
    MaritalStatus, ReviewStage, ReviewerRole, StageReview,
};
pub use letters::{LetterKind, LetterRenderer, RenderError, Signatory};
pub use notifications::{status_message, DispatchError, DispatchOutcome, NotificationDispatcher};
pub use repository::{
    ApplicationRepository, ApplicationStatusView, ApplicationUpdate, RepositoryError,
};
pub use router::admissions_router;
pub use rules::{
    evaluate_transition, ReviewAction, ReviewPayload, TransitionError, TransitionPatch,
};
pub use service::{ReviewOutcome, ReviewService, ReviewServiceError};
