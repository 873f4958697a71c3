use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationStatus};

/// Letter variants produced once an application is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterKind {
    Admission,
    Rejection,
    Interview,
}

/// Signatory metadata printed on generated letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub name: String,
    pub title: String,
}

/// Boundary to the PDF rendering collaborator. Implementations consume a
/// finalized snapshot and produce the rendered bytes; layout is entirely
/// theirs. Only the presentation layer invokes this, never the workflow
/// controller.
pub trait LetterRenderer: Send + Sync {
    fn render(
        &self,
        application: &Application,
        kind: LetterKind,
        signatory: &Signatory,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Letter generation error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("application is not finalized (status {status})")]
    NotFinalized { status: &'static str },
    #[error("render backend failed: {0}")]
    Backend(String),
}

/// Guard shared by renderer call sites: letters exist only for terminal
/// applications, and the kind must match the outcome.
pub fn letter_kind_for(application: &Application) -> Result<LetterKind, RenderError> {
    match application.status {
        ApplicationStatus::Approved => Ok(LetterKind::Admission),
        ApplicationStatus::Rejected => Ok(LetterKind::Rejection),
        other => Err(RenderError::NotFinalized {
            status: other.label(),
        }),
    }
}
