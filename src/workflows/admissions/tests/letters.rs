use super::common::*;
use crate::workflows::admissions::domain::ApplicationStatus;
use crate::workflows::admissions::letters::{
    letter_kind_for, LetterKind, LetterRenderer, RenderError, Signatory,
};

/// Minimal renderer double: plain text standing in for the PDF backend.
struct PlainTextRenderer;

impl LetterRenderer for PlainTextRenderer {
    fn render(
        &self,
        application: &crate::workflows::admissions::domain::Application,
        kind: LetterKind,
        signatory: &Signatory,
    ) -> Result<Vec<u8>, RenderError> {
        let expected = letter_kind_for(application)?;
        debug_assert_eq!(kind, expected);
        let body = format!(
            "{:?} letter for {}\nsigned {} ({})",
            kind, application.full_name, signatory.name, signatory.title
        );
        Ok(body.into_bytes())
    }
}

fn signatory() -> Signatory {
    Signatory {
        name: "Rev. J. Owusu".to_string(),
        title: "Vice President".to_string(),
    }
}

#[test]
fn approved_applications_yield_admission_letters() {
    let app = application(ApplicationStatus::Approved);
    assert_eq!(letter_kind_for(&app).expect("finalized"), LetterKind::Admission);
}

#[test]
fn rejected_applications_yield_rejection_letters() {
    let app = application(ApplicationStatus::Rejected);
    assert_eq!(letter_kind_for(&app).expect("finalized"), LetterKind::Rejection);
}

#[test]
fn non_terminal_applications_cannot_be_rendered() {
    for status in [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::LocalScreening,
        ApplicationStatus::AssociationApproved,
        ApplicationStatus::VpReview,
    ] {
        let app = application(status);
        match letter_kind_for(&app) {
            Err(RenderError::NotFinalized { status: label }) => {
                assert_eq!(label, status.label());
            }
            other => panic!("expected not finalized for {}, got {other:?}", status.label()),
        }
    }
}

#[test]
fn renderer_consumes_finalized_snapshots() {
    let app = application(ApplicationStatus::Approved);
    let bytes = PlainTextRenderer
        .render(&app, LetterKind::Admission, &signatory())
        .expect("renders");
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.contains("Ama Mensah"));
    assert!(text.contains("Vice President"));
}
