//! The persisted resume record and its sub-documents.
//!
//! Shape contract: every `Vec` field is always present (serde defaults, never
//! null in serialized form) and every optional scalar is present-or-null.
//! `id` and `created_at` are store-assigned and never set by callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contact information lifted from the resume. Every field is optional;
/// absent fields serialize as null rather than being dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Structured resume body. The sequence fields are ordered as they appeared
/// in the source document and are empty (not absent) when nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeContent {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

/// Qualitative feedback from the analysis model.
/// `rating` is mandatory and always within [0, 10] after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFeedback {
    pub rating: f64,
    #[serde(default)]
    pub rating_explanation: Option<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub suggested_skills: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
}

/// The normalized analysis output, before the store assigns identity.
/// This is the only shape `ResumeStore::create` accepts — a partial record
/// cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub personal_details: PersonalDetails,
    pub resume_content: ResumeContent,
    pub skills: Skills,
    pub ai_feedback: AiFeedback,
}

/// The persisted unit returned by `create` and `get_by_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: i64,
    pub file_name: String,
    pub personal_details: PersonalDetails,
    pub resume_content: ResumeContent,
    pub skills: Skills,
    pub ai_feedback: AiFeedback,
    pub created_at: DateTime<Utc>,
}

/// Reduced view returned by list operations. Projected in SQL from the JSONB
/// sub-documents without loading full records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSummary {
    pub id: i64,
    pub file_name: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}
