//! Best-effort proxy to the external text generator.
//!
//! `enhance_resume` asks a [`FallbackChain`] for suggestions and stores
//! whatever text comes back as the resume's `aiEnhanced` field.

pub mod chain;
pub mod pollinations;

use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub use chain::{Attempt, FallbackChain};

use crate::{
    error::{AppError, AppResult},
    resumes::{repo::ResumeStore, repo_types::Resume, services::not_found},
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid upstream url: {0}")]
    Url(String),
    #[error("all {attempts} enhancement attempts failed")]
    Exhausted { attempts: usize },
}

const PROMPT_PREAMBLE: &str = "Enhance the following resume for better impact and clarity. \
Provide concise suggestions for improvement without modifying the core content:";

pub fn build_prompt(snapshot: &Value) -> AppResult<String> {
    let pretty = serde_json::to_string_pretty(snapshot)
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    Ok(format!("{PROMPT_PREAMBLE}\n\n{pretty}"))
}

/// `snapshot` is the client's view of the resume; when it is absent the
/// stored document is sent instead.
pub async fn enhance_resume(
    store: &dyn ResumeStore,
    chain: &FallbackChain,
    owner: Uuid,
    id: Uuid,
    snapshot: Value,
) -> AppResult<Resume> {
    let current = store.find(owner, id).await?.ok_or_else(not_found)?;

    let snapshot = match snapshot {
        Value::Null => {
            serde_json::to_value(&current).map_err(|e| AppError::Internal(e.into()))?
        }
        other => other,
    };
    let prompt = build_prompt(&snapshot)?;

    let text = chain.run(&prompt).await.map_err(|e| {
        AppError::Upstream(format!("Failed to enhance resume: {e}"))
    })?;

    let resume = store
        .set_ai_enhanced(owner, id, &text)
        .await?
        .ok_or_else(not_found)?;
    info!(user_id = %owner, resume_id = %id, chars = text.len(), "resume enhanced");
    Ok(resume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        resumes::{dto::ResumeDraft, services},
        testing::{MemoryResumeStore, ScriptedAttempt},
    };
    use serde_json::json;
    use std::sync::atomic::Ordering;

    async fn seeded(store: &MemoryResumeStore, owner: Uuid) -> Resume {
        services::create(
            store,
            owner,
            ResumeDraft {
                name: Some("Ada".into()),
                job_role: Some("Engineer".into()),
                email: Some("ada@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[test]
    fn prompt_embeds_pretty_snapshot() {
        let prompt = build_prompt(&json!({ "name": "Ada" })).unwrap();
        assert!(prompt.starts_with("Enhance the following resume"));
        assert!(prompt.ends_with("{\n  \"name\": \"Ada\"\n}"));
    }

    #[tokio::test]
    async fn stores_text_from_first_working_attempt() {
        let store = MemoryResumeStore::default();
        let owner = Uuid::new_v4();
        let resume = seeded(&store, owner).await;
        let chain = FallbackChain::new(vec![
            Box::new(ScriptedAttempt::failing("json-post")),
            Box::new(ScriptedAttempt::ok("get-encoded", "Quantify impact.")),
        ]);

        let out = enhance_resume(&store, &chain, owner, resume.id, json!({ "name": "Ada" }))
            .await
            .unwrap();
        assert_eq!(out.ai_enhanced.as_deref(), Some("Quantify impact."));
        assert_eq!(out.name, "Ada");

        let stored = services::get(&store, owner, resume.id).await.unwrap();
        assert_eq!(stored.ai_enhanced.as_deref(), Some("Quantify impact."));
    }

    #[tokio::test]
    async fn exhausted_chain_is_upstream_error_and_keeps_resume() {
        let store = MemoryResumeStore::default();
        let owner = Uuid::new_v4();
        let resume = seeded(&store, owner).await;
        let chain = FallbackChain::new(vec![
            Box::new(ScriptedAttempt::failing("a")),
            Box::new(ScriptedAttempt::failing("b")),
        ]);

        let err = enhance_resume(&store, &chain, owner, resume.id, Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        let stored = services::get(&store, owner, resume.id).await.unwrap();
        assert!(stored.ai_enhanced.is_none());
    }

    #[tokio::test]
    async fn foreign_resume_is_not_found_and_upstream_is_not_called() {
        let store = MemoryResumeStore::default();
        let resume = seeded(&store, Uuid::new_v4()).await;
        let attempt = ScriptedAttempt::ok("only", "text");
        let calls = attempt.calls();
        let chain = FallbackChain::new(vec![Box::new(attempt)]);

        let err = enhance_resume(&store, &chain, Uuid::new_v4(), resume.id, Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_snapshot_sends_stored_resume() {
        let store = MemoryResumeStore::default();
        let owner = Uuid::new_v4();
        let resume = seeded(&store, owner).await;
        let attempt = ScriptedAttempt::ok("only", "ok");
        let seen = attempt.prompts();
        let chain = FallbackChain::new(vec![Box::new(attempt)]);

        enhance_resume(&store, &chain, owner, resume.id, Value::Null)
            .await
            .unwrap();
        let prompts = seen.lock().unwrap();
        assert!(prompts[0].contains("\"jobRole\": \"Engineer\""));
    }
}
