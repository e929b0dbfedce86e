//! Analysis orchestration — sequences extraction, prompt construction, the
//! model call, normalization and persistence for one uploaded resume.
//!
//! Flow: spool upload → extract_text → build_analysis_prompt →
//!       model.generate → normalize_analysis → store.create → ResumeRecord.
//!
//! Failure at any step short-circuits the rest: the triggering error is
//! returned and no partial record ever reaches the store. The spooled upload
//! is a delete-on-drop temp file, so it is released on every exit path —
//! success, error, and cancellation (the handler's invocation timeout drops
//! this future, which drops the spool and aborts the in-flight model call).

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::analysis::normalize::normalize_analysis;
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::llm_client::AnalysisModel;
use crate::models::resume::ResumeRecord;
use crate::store::ResumeStore;

/// Runs the full analysis pipeline for one upload and persists the result.
pub async fn analyze_resume(
    store: &dyn ResumeStore,
    model: &dyn AnalysisModel,
    bytes: Bytes,
    file_name: &str,
) -> Result<ResumeRecord, AppError> {
    // The raw upload is kept on disk for the duration of the invocation.
    // NamedTempFile unlinks on drop, which covers every exit path below.
    let spool = spool_upload(&bytes)?;
    debug!("Upload '{file_name}' spooled to {:?}", spool.path());

    // Step 1: extract text. An unreadable or blank document fails here,
    // before any model call is made.
    let text = extract_text(&bytes)?;
    info!(
        "Extracted {} characters from '{file_name}'",
        text.chars().count()
    );

    analyze_text(store, model, &text, file_name).await
}

/// Steps 2-5 of the pipeline: prompt, model call, normalization, persistence.
/// Split from `analyze_resume` so the model/store seams can be exercised
/// without a real document.
pub async fn analyze_text(
    store: &dyn ResumeStore,
    model: &dyn AnalysisModel,
    text: &str,
    file_name: &str,
) -> Result<ResumeRecord, AppError> {
    // Step 2: deterministic prompt embedding the schema and the text.
    let prompt = build_analysis_prompt(text);

    // Step 3: single model attempt; no retries anywhere in the pipeline.
    let raw = model
        .generate(&prompt)
        .await
        .map_err(|e| AppError::AiService(format!("analysis model call failed: {e}")))?;

    // Step 4: validate shape independently of the provider's JSON mode.
    let analysis = normalize_analysis(&raw)?;

    // Step 5: persist the whole record; the store assigns id and created_at.
    let record = store.create(file_name, analysis).await?;

    info!(
        "Analysis complete for '{file_name}': record {} rated {:.1}",
        record.id, record.ai_feedback.rating
    );
    Ok(record)
}

fn spool_upload(bytes: &[u8]) -> Result<NamedTempFile, AppError> {
    use std::io::Write;

    // Uploads are capped at a few MiB by the edge, so a blocking write is fine.
    let mut spool = NamedTempFile::new()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to create upload spool: {e}")))?;
    spool
        .write_all(bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to spool upload: {e}")))?;
    Ok(spool)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::resume::{ResumeAnalysis, ResumeSummary};

    /// Canned-response model double. `None` simulates a service failure.
    struct MockModel {
        response: Option<String>,
        calls: AtomicUsize,
    }

    impl MockModel {
        fn returning(response: &str) -> Self {
            Self {
                response: Some(response.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisModel for MockModel {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().ok_or(LlmError::Api {
                status: 503,
                message: "model unavailable".to_string(),
            })
        }
    }

    /// Model double that never answers within any reasonable budget.
    struct SleepyModel;

    #[async_trait]
    impl AnalysisModel for SleepyModel {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok("{}".to_string())
        }
    }

    /// In-memory store double mirroring `PgResumeStore` semantics: assigned
    /// monotonically increasing ids, store-owned timestamps, list ordered by
    /// `created_at` desc with id as tiebreak.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<ResumeRecord>>,
    }

    impl MemoryStore {
        fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ResumeStore for MemoryStore {
        async fn create(
            &self,
            file_name: &str,
            analysis: ResumeAnalysis,
        ) -> Result<ResumeRecord, AppError> {
            let mut records = self.records.lock().unwrap();
            let record = ResumeRecord {
                id: records.len() as i64 + 1,
                file_name: file_name.to_string(),
                personal_details: analysis.personal_details,
                resume_content: analysis.resume_content,
                skills: analysis.skills,
                ai_feedback: analysis.ai_feedback,
                created_at: Utc::now(),
            };
            records.push(record.clone());
            Ok(record)
        }

        async fn list(&self) -> Result<Vec<ResumeSummary>, AppError> {
            let mut records = self.records.lock().unwrap().clone();
            records.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            Ok(records
                .into_iter()
                .map(|r| ResumeSummary {
                    id: r.id,
                    file_name: r.file_name,
                    name: r.personal_details.name,
                    email: r.personal_details.email,
                    rating: Some(r.ai_feedback.rating),
                    created_at: r.created_at,
                })
                .collect())
        }

        async fn get_by_id(&self, id: i64) -> Result<ResumeRecord, AppError> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
        }
    }

    const JANE_RESPONSE: &str = r#"{
        "personal_details": {"name": "Jane Doe", "email": "jane@x.com"},
        "resume_content": {"summary": "Engineer"},
        "skills": {"technical_skills": ["Go", "SQL"], "soft_skills": []},
        "ai_feedback": {"rating": 8, "strengths": ["clear writing"]}
    }"#;

    #[tokio::test]
    async fn test_happy_path_returns_persisted_record() {
        let store = MemoryStore::default();
        let model = MockModel::returning(JANE_RESPONSE);

        let record = analyze_text(&store, &model, "Jane Doe, jane@x.com", "jane.pdf")
            .await
            .unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.file_name, "jane.pdf");
        assert_eq!(record.personal_details.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.skills.technical_skills, vec!["Go", "SQL"]);
        assert!((record.ai_feedback.rating - 8.0).abs() < f64::EPSILON);
        assert_eq!(model.call_count(), 1);

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, record.id);
    }

    #[tokio::test]
    async fn test_list_places_most_recent_first() {
        let store = MemoryStore::default();
        let model = MockModel::returning(JANE_RESPONSE);

        analyze_text(&store, &model, "first resume", "first.pdf")
            .await
            .unwrap();
        analyze_text(&store, &model, "second resume", "second.pdf")
            .await
            .unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].file_name, "second.pdf");
        assert!(summaries[0].created_at >= summaries[1].created_at);
    }

    #[tokio::test]
    async fn test_get_by_id_round_trips_and_is_idempotent() {
        let store = MemoryStore::default();
        let model = MockModel::returning(JANE_RESPONSE);

        let record = analyze_text(&store, &model, "Jane Doe", "jane.pdf")
            .await
            .unwrap();

        let first = store.get_by_id(record.id).await.unwrap();
        let second = store.get_by_id(record.id).await.unwrap();
        assert_eq!(first, record);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_by_id_unknown_is_not_found() {
        let store = MemoryStore::default();
        let err = store.get_by_id(99999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_rating_fails_and_persists_nothing() {
        let store = MemoryStore::default();
        let model = MockModel::returning(r#"{"ai_feedback": {"strengths": ["nice"]}}"#);

        let err = analyze_text(&store, &model, "some resume", "r.pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::SchemaValidation(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_maps_to_ai_service_and_persists_nothing() {
        let store = MemoryStore::default();
        let model = MockModel::failing();

        let err = analyze_text(&store, &model, "some resume", "r.pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AiService(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_document_fails_before_any_model_call() {
        let store = MemoryStore::default();
        let model = MockModel::returning(JANE_RESPONSE);

        let err = analyze_resume(&store, &model, Bytes::from_static(b"not a pdf"), "bad.pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
        assert_eq!(model.call_count(), 0);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invocation_timeout_aborts_and_persists_nothing() {
        let store = MemoryStore::default();
        let model = SleepyModel;

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            analyze_text(&store, &model, "slow resume", "slow.pdf"),
        )
        .await;

        assert!(result.is_err(), "expected the invocation budget to elapse");
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_spooled_upload_is_deleted_on_drop() {
        let spool = spool_upload(b"%PDF-1.4 payload").unwrap();
        let path = spool.path().to_path_buf();
        assert!(path.exists());
        drop(spool);
        assert!(!path.exists());
    }
}
