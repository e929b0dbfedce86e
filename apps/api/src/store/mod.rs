//! Resume record store — the only component allowed to assign `id` and
//! `created_at`.
//!
//! Records are written whole, as one INSERT, so per-record atomicity comes
//! from the statement itself: a failed write leaves nothing visible to
//! subsequent reads. Rows are never updated in place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{
    AiFeedback, PersonalDetails, ResumeAnalysis, ResumeContent, ResumeRecord, ResumeSummary, Skills,
};

/// Persistence seam for the analysis pipeline.
/// Carried in `AppState` as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Persists a normalized analysis as one atomic unit, assigning `id` and
    /// `created_at`.
    async fn create(
        &self,
        file_name: &str,
        analysis: ResumeAnalysis,
    ) -> Result<ResumeRecord, AppError>;

    /// Summary projections, most recent first (`created_at` non-increasing).
    async fn list(&self) -> Result<Vec<ResumeSummary>, AppError>;

    /// Full record, or `AppError::NotFound` for an unknown id.
    async fn get_by_id(&self, id: i64) -> Result<ResumeRecord, AppError>;
}

/// PostgreSQL-backed store over the `resumes` table.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ResumeRecordRow {
    id: i64,
    file_name: String,
    personal_details: Json<PersonalDetails>,
    resume_content: Json<ResumeContent>,
    skills: Json<Skills>,
    ai_feedback: Json<AiFeedback>,
    created_at: DateTime<Utc>,
}

impl From<ResumeRecordRow> for ResumeRecord {
    fn from(row: ResumeRecordRow) -> Self {
        ResumeRecord {
            id: row.id,
            file_name: row.file_name,
            personal_details: row.personal_details.0,
            resume_content: row.resume_content.0,
            skills: row.skills.0,
            ai_feedback: row.ai_feedback.0,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn create(
        &self,
        file_name: &str,
        analysis: ResumeAnalysis,
    ) -> Result<ResumeRecord, AppError> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO resumes (file_name, personal_details, resume_content, skills, ai_feedback)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(file_name)
        .bind(Json(&analysis.personal_details))
        .bind(Json(&analysis.resume_content))
        .bind(Json(&analysis.skills))
        .bind(Json(&analysis.ai_feedback))
        .fetch_one(&self.pool)
        .await?;

        info!("Stored resume record {id} for '{file_name}'");

        Ok(ResumeRecord {
            id,
            file_name: file_name.to_string(),
            personal_details: analysis.personal_details,
            resume_content: analysis.resume_content,
            skills: analysis.skills,
            ai_feedback: analysis.ai_feedback,
            created_at,
        })
    }

    async fn list(&self) -> Result<Vec<ResumeSummary>, AppError> {
        // Projected straight from the JSONB columns; the id tiebreak keeps
        // the order total when timestamps collide.
        Ok(sqlx::query_as::<_, ResumeSummary>(
            r#"
            SELECT id,
                   file_name,
                   personal_details->>'name'  AS name,
                   personal_details->>'email' AS email,
                   (ai_feedback->>'rating')::float8 AS rating,
                   created_at
            FROM resumes
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_by_id(&self, id: i64) -> Result<ResumeRecord, AppError> {
        let row: Option<ResumeRecordRow> = sqlx::query_as(
            r#"
            SELECT id, file_name, personal_details, resume_content, skills, ai_feedback, created_at
            FROM resumes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ResumeRecord::from)
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
    }
}
