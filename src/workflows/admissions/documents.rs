use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{AdmissionLevel, ApplicationId, MaritalStatus};

/// Type tags for the required-documents checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    NationalId,
    PassportPhoto,
    RecommendationLetter,
    MarriageCertificate,
    MentorLetter,
    VisionStatement,
    EvaluationLetter,
    AppointmentLetter,
}

impl DocumentType {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentType::NationalId => "national_id",
            DocumentType::PassportPhoto => "passport_photo",
            DocumentType::RecommendationLetter => "recommendation_letter",
            DocumentType::MarriageCertificate => "marriage_certificate",
            DocumentType::MentorLetter => "mentor_letter",
            DocumentType::VisionStatement => "vision_statement",
            DocumentType::EvaluationLetter => "evaluation_letter",
            DocumentType::AppointmentLetter => "appointment_letter",
        }
    }
}

/// Uploaded attachment, exclusively owned by its application. Re-uploads
/// replace the existing row for the same type; deleting the application
/// cascades to its documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub application_id: ApplicationId,
    pub doc_type: DocumentType,
    pub name: String,
    pub storage_key: String,
}

/// Checklist of document types required for an admission level and marital
/// status: a base set plus conditional additions.
pub fn required_documents(
    level: AdmissionLevel,
    marital_status: MaritalStatus,
) -> BTreeSet<DocumentType> {
    let mut required = BTreeSet::from([
        DocumentType::NationalId,
        DocumentType::PassportPhoto,
        DocumentType::RecommendationLetter,
    ]);

    if marital_status == MaritalStatus::Married {
        required.insert(DocumentType::MarriageCertificate);
    }

    match level {
        AdmissionLevel::Licensing => {
            required.insert(DocumentType::MentorLetter);
            required.insert(DocumentType::VisionStatement);
        }
        AdmissionLevel::Recognition | AdmissionLevel::Ordination => {
            required.insert(DocumentType::EvaluationLetter);
            required.insert(DocumentType::AppointmentLetter);
        }
    }

    required
}

/// Checklist gap used by the form layer to block progression until every
/// required document type has been uploaded. The transition rules engine
/// itself does not consult this.
pub fn missing_documents(
    uploaded: &[DocumentType],
    level: AdmissionLevel,
    marital_status: MaritalStatus,
) -> BTreeSet<DocumentType> {
    let mut missing = required_documents(level, marital_status);
    for doc_type in uploaded {
        missing.remove(doc_type);
    }
    missing
}
