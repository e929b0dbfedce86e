//! Response normalization — the only trust boundary between the model and
//! the store.
//!
//! JSON mode is requested from the provider, but its shape guarantee is
//! best-effort. Everything here treats the response as loosely-typed data:
//! fences are stripped defensively, and each field is extracted leniently,
//! substituting `null`/`[]` defaults for anything absent or of the wrong
//! kind. The one exception is the rating — an analysis without a numeric
//! rating is not a usable record and fails normalization outright.

use serde_json::Value;

use crate::errors::AppError;
use crate::models::resume::{
    AiFeedback, Certification, Education, PersonalDetails, Project, ResumeAnalysis, ResumeContent,
    Skills, WorkExperience,
};

/// Normalizes a raw model response into a schema-conformant analysis.
///
/// Total over its input: every outcome is either a full `ResumeAnalysis` or
/// an `AppError::SchemaValidation`. No partial values escape.
pub fn normalize_analysis(raw: &str) -> Result<ResumeAnalysis, AppError> {
    let stripped = strip_json_fences(raw);

    let parsed: Value = serde_json::from_str(stripped)
        .map_err(|e| AppError::SchemaValidation(format!("malformed json: {e}")))?;

    let feedback = parsed.get("ai_feedback").cloned().unwrap_or(Value::Null);

    // Values outside [0, 10] are truncated to the nearest bound, not rejected.
    let rating = feedback
        .get("rating")
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::SchemaValidation("missing rating".to_string()))?
        .clamp(0.0, 10.0);

    let details = parsed.get("personal_details").cloned().unwrap_or(Value::Null);
    let content = parsed.get("resume_content").cloned().unwrap_or(Value::Null);
    let skills = parsed.get("skills").cloned().unwrap_or(Value::Null);

    Ok(ResumeAnalysis {
        personal_details: PersonalDetails {
            name: opt_string(&details, "name"),
            email: opt_string(&details, "email"),
            phone: opt_string(&details, "phone"),
            linkedin: opt_string(&details, "linkedin"),
            portfolio: opt_string(&details, "portfolio"),
            location: opt_string(&details, "location"),
        },
        resume_content: ResumeContent {
            summary: opt_string(&content, "summary"),
            work_experience: object_seq(&content, "work_experience", |entry| WorkExperience {
                company: opt_string(entry, "company"),
                position: opt_string(entry, "position"),
                duration: opt_string(entry, "duration"),
                responsibilities: string_seq(entry, "responsibilities"),
            }),
            education: object_seq(&content, "education", |entry| Education {
                degree: opt_string(entry, "degree"),
                institution: opt_string(entry, "institution"),
                year: opt_string(entry, "year"),
                gpa: opt_string(entry, "gpa"),
            }),
            projects: object_seq(&content, "projects", |entry| Project {
                name: opt_string(entry, "name"),
                description: opt_string(entry, "description"),
                technologies: string_seq(entry, "technologies"),
            }),
            certifications: object_seq(&content, "certifications", |entry| Certification {
                name: opt_string(entry, "name"),
                issuer: opt_string(entry, "issuer"),
                date: opt_string(entry, "date"),
            }),
        },
        skills: Skills {
            technical_skills: string_seq(&skills, "technical_skills"),
            soft_skills: string_seq(&skills, "soft_skills"),
        },
        ai_feedback: AiFeedback {
            rating,
            rating_explanation: opt_string(&feedback, "rating_explanation"),
            improvement_areas: string_seq(&feedback, "improvement_areas"),
            suggested_skills: string_seq(&feedback, "suggested_skills"),
            strengths: string_seq(&feedback, "strengths"),
        },
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
/// JSON mode should make this unnecessary; kept as the first normalization
/// step so a fenced response degrades to a parse instead of a failure.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// String field, or None when absent or not a string.
fn opt_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// String array field; non-string elements are dropped, anything that is not
/// an array becomes empty.
fn string_seq(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

/// Object array field mapped through `build`; non-object elements are
/// dropped, anything that is not an array becomes empty. Preserves order.
fn object_seq<T>(value: &Value, key: &str, build: impl Fn(&Value) -> T) -> Vec<T> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|i| i.is_object()).map(&build).collect())
        .unwrap_or_default()
}
