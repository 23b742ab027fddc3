//! Domain models for HireHub: job positions, applicants, and the
//! request/response types the API and repositories share.

use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PIPELINE STAGE / SOURCE CHANNEL
// =============================================================================

/// Hiring pipeline stage for an applicant.
///
/// A closed set so stage-based branching gets compile-time exhaustiveness
/// checking. Serialized with the human-readable labels the rest of the
/// system (and the stored rows) use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Stage {
    #[default]
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Interview Stage")]
    InterviewStage,
    #[serde(rename = "Technical Assessment")]
    TechnicalAssessment,
    #[serde(rename = "Final Interview")]
    FinalInterview,
    #[serde(rename = "Offer Extended")]
    OfferExtended,
    Hired,
    Rejected,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => write!(f, "Submitted"),
            Self::UnderReview => write!(f, "Under Review"),
            Self::InterviewStage => write!(f, "Interview Stage"),
            Self::TechnicalAssessment => write!(f, "Technical Assessment"),
            Self::FinalInterview => write!(f, "Final Interview"),
            Self::OfferExtended => write!(f, "Offer Extended"),
            Self::Hired => write!(f, "Hired"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Submitted" => Ok(Self::Submitted),
            "Under Review" => Ok(Self::UnderReview),
            "Interview Stage" => Ok(Self::InterviewStage),
            "Technical Assessment" => Ok(Self::TechnicalAssessment),
            "Final Interview" => Ok(Self::FinalInterview),
            "Offer Extended" => Ok(Self::OfferExtended),
            "Hired" => Ok(Self::Hired),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(format!("Invalid stage: {}", s)),
        }
    }
}

/// Channel an applicant arrived through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Source {
    LinkedIn,
    Indeed,
    Referral,
    #[serde(rename = "Company Website")]
    CompanyWebsite,
    #[serde(rename = "Job Board")]
    JobBoard,
    #[default]
    Other,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LinkedIn => write!(f, "LinkedIn"),
            Self::Indeed => write!(f, "Indeed"),
            Self::Referral => write!(f, "Referral"),
            Self::CompanyWebsite => write!(f, "Company Website"),
            Self::JobBoard => write!(f, "Job Board"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "LinkedIn" => Ok(Self::LinkedIn),
            "Indeed" => Ok(Self::Indeed),
            "Referral" => Ok(Self::Referral),
            "Company Website" => Ok(Self::CompanyWebsite),
            "Job Board" => Ok(Self::JobBoard),
            "Other" => Ok(Self::Other),
            _ => Err(format!("Invalid source: {}", s)),
        }
    }
}

// =============================================================================
// JOB POSITION
// =============================================================================

/// A job position a recruiter is hiring for.
///
/// The embedding is either absent or exactly `defaults::EMBED_DIMENSION`
/// long, and is derived solely from title+description+requirements at
/// last save time. It is written only through
/// [`PositionRepository::set_embedding`](crate::traits::PositionRepository),
/// never hand-edited.
#[derive(Debug, Clone)]
pub struct JobPosition {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    /// Comma-separated tags.
    pub tags: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub embedding: Option<Vector>,
}

/// An applicant in the hiring pipeline.
///
/// `position_id` is optional; deleting the referenced position clears it
/// rather than cascading. The embedding is derived solely from
/// `resume_text`; an empty resume never clears a previously stored
/// embedding.
#[derive(Debug, Clone)]
pub struct Applicant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: Option<Uuid>,
    pub stage: Stage,
    pub source: Source,
    /// Comma-separated tags.
    pub tags: String,
    pub resume_text: String,
    pub interviewers: String,
    pub interview_dates: String,
    pub overall_feedback: String,
    pub final_decision: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub embedding: Option<Vector>,
}

// =============================================================================
// POSITION REQUEST / RESPONSE TYPES
// =============================================================================

/// Request for creating a job position.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatePositionRequest {
    pub title: String,
    pub description: String,
    pub requirements: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Partial update of a job position. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdatePositionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub tags: Option<String>,
    pub is_active: Option<bool>,
}

/// Request for listing positions.
#[derive(Debug, Clone, Default)]
pub struct ListPositionsRequest {
    /// Restrict to active positions.
    pub active_only: bool,
    /// Maximum results.
    pub limit: Option<i64>,
    /// Pagination offset.
    pub offset: Option<i64>,
}

/// API view of a position. The raw vector is internal; only its presence
/// is exposed.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PositionResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub tags: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub has_embedding: bool,
}

impl From<JobPosition> for PositionResponse {
    fn from(p: JobPosition) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            requirements: p.requirements,
            tags: p.tags,
            is_active: p.is_active,
            created_at: p.created_at,
            has_embedding: p.embedding.is_some(),
        }
    }
}

// =============================================================================
// APPLICANT REQUEST / RESPONSE TYPES
// =============================================================================

/// Request for creating an applicant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateApplicantRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub position_id: Option<Uuid>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub interviewers: String,
    #[serde(default)]
    pub interview_dates: String,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub final_decision: String,
}

/// Partial update of an applicant. `None` fields are left unchanged.
///
/// `position_id` uses a nested Option: `None` leaves the assignment
/// alone, `Some(None)` detaches the applicant from their position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateApplicantRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, with = "double_option")]
    pub position_id: Option<Option<Uuid>>,
    pub stage: Option<Stage>,
    pub source: Option<Source>,
    pub tags: Option<String>,
    pub resume_text: Option<String>,
    pub interviewers: Option<String>,
    pub interview_dates: Option<String>,
    pub overall_feedback: Option<String>,
    pub final_decision: Option<String>,
}

/// Serde helper distinguishing "absent" from "explicitly null".
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Request for listing applicants.
#[derive(Debug, Clone, Default)]
pub struct ListApplicantsRequest {
    /// Case-insensitive substring search over name, email, and tags.
    pub search: Option<String>,
    /// Filter by pipeline stage.
    pub stage: Option<Stage>,
    /// Filter by source channel.
    pub source: Option<Source>,
    /// Filter by associated position.
    pub position_id: Option<Uuid>,
    /// Sort field: "created_at", "-created_at", "name", "-name",
    /// "updated_at", "-updated_at". Default "-created_at".
    pub ordering: Option<String>,
    /// Maximum results.
    pub limit: Option<i64>,
    /// Pagination offset.
    pub offset: Option<i64>,
}

/// API view of an applicant.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApplicantResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: Option<Uuid>,
    pub stage: Stage,
    pub source: Source,
    pub tags: String,
    pub resume_text: String,
    pub interviewers: String,
    pub interview_dates: String,
    pub overall_feedback: String,
    pub final_decision: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub has_embedding: bool,
}

impl From<Applicant> for ApplicantResponse {
    fn from(a: Applicant) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            phone: a.phone,
            position_id: a.position_id,
            stage: a.stage,
            source: a.source,
            tags: a.tags,
            resume_text: a.resume_text,
            interviewers: a.interviewers,
            interview_dates: a.interview_dates,
            overall_feedback: a.overall_feedback,
            final_decision: a.final_decision,
            created_at: a.created_at,
            updated_at: a.updated_at,
            has_embedding: a.embedding.is_some(),
        }
    }
}

// =============================================================================
// MATCHING TYPES
// =============================================================================

/// One entry of a ranking result, before hydration into a full applicant.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub applicant_id: Uuid,
    /// Cosine distance to the position's vector, in [0, 2]. Lower is a
    /// better match.
    pub distance: f32,
}

/// A ranked applicant as returned by the matches endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MatchResult {
    pub applicant: ApplicantResponse,
    /// Cosine distance to the position's vector (lower = better).
    pub distance: f32,
    /// AI fit assessment, present when narration was requested. On
    /// narrator failure this carries a descriptive error string rather
    /// than being omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}
