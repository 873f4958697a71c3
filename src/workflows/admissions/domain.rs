use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Admission level sought by the applicant; drives the document checklist
/// and which training fields the intake form requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionLevel {
    Licensing,
    Recognition,
    Ordination,
}

impl AdmissionLevel {
    pub const fn label(self) -> &'static str {
        match self {
            AdmissionLevel::Licensing => "licensing",
            AdmissionLevel::Recognition => "recognition",
            AdmissionLevel::Ordination => "ordination",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Widowed,
    Divorced,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::Widowed => "widowed",
            MaritalStatus::Divorced => "divorced",
        }
    }
}

/// Status tracked throughout the admissions review pipeline.
///
/// The first six values form an ordered pipeline; `Rejected` is the single
/// absorbing branch reachable from every non-terminal status past `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    LocalScreening,
    AssociationApproved,
    VpReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::LocalScreening => "local_screening",
            ApplicationStatus::AssociationApproved => "association_approved",
            ApplicationStatus::VpReview => "vp_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Position in the forward pipeline; `Rejected` sits outside it.
    pub const fn rank(self) -> Option<u8> {
        match self {
            ApplicationStatus::Draft => Some(0),
            ApplicationStatus::Submitted => Some(1),
            ApplicationStatus::LocalScreening => Some(2),
            ApplicationStatus::AssociationApproved => Some(3),
            ApplicationStatus::VpReview => Some(4),
            ApplicationStatus::Approved => Some(5),
            ApplicationStatus::Rejected => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

/// Actor roles recognized by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerRole {
    LocalOfficer,
    AssociationHead,
    VpOffice,
    SuperAdmin,
}

impl ReviewerRole {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewerRole::LocalOfficer => "local_officer",
            ReviewerRole::AssociationHead => "association_head",
            ReviewerRole::VpOffice => "vp_office",
            ReviewerRole::SuperAdmin => "super_admin",
        }
    }
}

/// The three human review steps, each owning one audit triple on the
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Local,
    Association,
    Vp,
}

impl ReviewStage {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStage::Local => "local",
            ReviewStage::Association => "association",
            ReviewStage::Vp => "vp",
        }
    }
}

/// Per-stage audit triple, written at most once per review pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReview {
    pub reviewer_id: String,
    pub reviewed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// The central admissions entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub marital_status: MaritalStatus,
    pub photo_reference: Option<String>,
    pub admission_level: AdmissionLevel,
    pub church_name: String,
    pub fellowship: String,
    pub association: String,
    /// Assigned by the VP office; required before the VP approval completes.
    pub sector: Option<String>,
    pub status: ApplicationStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub local_review: Option<StageReview>,
    pub association_review: Option<StageReview>,
    pub vp_review: Option<StageReview>,
    pub rejection_reason: Option<String>,
}

impl Application {
    pub fn stage_review(&self, stage: ReviewStage) -> Option<&StageReview> {
        match stage {
            ReviewStage::Local => self.local_review.as_ref(),
            ReviewStage::Association => self.association_review.as_ref(),
            ReviewStage::Vp => self.vp_review.as_ref(),
        }
    }

    pub fn set_stage_review(&mut self, stage: ReviewStage, review: StageReview) {
        match stage {
            ReviewStage::Local => self.local_review = Some(review),
            ReviewStage::Association => self.association_review = Some(review),
            ReviewStage::Vp => self.vp_review = Some(review),
        }
    }
}

/// Applicant-provided intake payload; creating an application from it lands
/// it directly in `Submitted`. Draft bookkeeping stays in the form layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationIntake {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub photo_reference: Option<String>,
    pub admission_level: AdmissionLevel,
    pub church_name: String,
    pub fellowship: String,
    pub association: String,
}
