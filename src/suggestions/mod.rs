pub mod handlers;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{config::AiConfig, enhance::GatewayError};

/// Upstream source of skill suggestions.
#[async_trait]
pub trait SkillSource: Send + Sync {
    async fn fetch(&self, role: &str, context: &str) -> Result<Vec<String>, GatewayError>;
}

pub struct PollinationsSkills {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

impl PollinationsSkills {
    pub fn new(client: Client, cfg: &AiConfig) -> Self {
        Self {
            client,
            url: format!("{}/v1/suggestions", cfg.alt_base_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpstreamSkills {
    skills: Option<Vec<String>>,
    result: Option<String>,
}

impl UpstreamSkills {
    fn into_skills(self) -> Vec<String> {
        if let Some(skills) = self.skills {
            return skills;
        }
        self.result
            .map(|r| {
                r.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SkillSource for PollinationsSkills {
    async fn fetch(&self, role: &str, context: &str) -> Result<Vec<String>, GatewayError> {
        let body = json!({
            "prompt": format!(
                "Generate a list of relevant skills for a {role} in the context of {context}"
            ),
            "max_tokens": 50,
        });
        let res: UpstreamSkills = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(res.into_skills())
    }
}

/// Built-in answer used whenever the upstream call fails.
pub fn fallback_skills(role: &str) -> Vec<String> {
    let skills: &[&str] = match role.trim().to_lowercase().as_str() {
        "software engineer" => &["JavaScript", "React", "Node.js", "Python", "TypeScript", "GraphQL"],
        "data scientist" => &["Python", "R", "SQL", "Machine Learning", "Pandas", "TensorFlow"],
        "designer" => &["Figma", "Adobe XD", "UI/UX", "Photoshop", "Illustrator", "Sketch"],
        _ => &["Communication", "Teamwork", "Problem Solving"],
    };
    skills.iter().map(|s| s.to_string()).collect()
}

pub async fn suggest(source: &dyn SkillSource, role: &str, context: &str) -> Vec<String> {
    match source.fetch(role, context).await {
        Ok(skills) => skills,
        Err(e) => {
            warn!(error = %e, %role, "skill suggestion upstream failed; using static table");
            fallback_skills(role)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticSkills;

    #[test]
    fn static_table_is_keyed_by_lowercased_role() {
        assert_eq!(fallback_skills("Data Scientist")[0], "Python");
        assert_eq!(fallback_skills("  DESIGNER ")[0], "Figma");
        assert_eq!(
            fallback_skills("astronaut"),
            vec!["Communication", "Teamwork", "Problem Solving"]
        );
    }

    #[test]
    fn upstream_body_prefers_skills_then_result() {
        let both: UpstreamSkills =
            serde_json::from_str(r#"{"skills":["Rust"],"result":"Go, C"}"#).unwrap();
        assert_eq!(both.into_skills(), vec!["Rust"]);

        let csv: UpstreamSkills = serde_json::from_str(r#"{"result":"Go, C ,, Zig"}"#).unwrap();
        assert_eq!(csv.into_skills(), vec!["Go", "C", "Zig"]);

        let empty: UpstreamSkills = serde_json::from_str("{}").unwrap();
        assert!(empty.into_skills().is_empty());
    }

    #[tokio::test]
    async fn suggest_falls_back_on_upstream_failure() {
        let skills = suggest(&StaticSkills::failing(), "Software Engineer", "startup").await;
        assert_eq!(skills[0], "JavaScript");
        assert_eq!(skills.len(), 6);
    }

    #[tokio::test]
    async fn suggest_passes_upstream_answer_through() {
        let source = StaticSkills::ok(&["Kubernetes"]);
        assert_eq!(suggest(&source, "designer", "fintech").await, vec!["Kubernetes"]);
    }

    mod over_http {
        use super::*;
        use crate::testing::{ai_config, spawn_upstream};
        use axum::{http::StatusCode, routing::post, Json, Router};
        use serde_json::Value;

        async fn skills_from(upstream: Router) -> Vec<String> {
            let base = spawn_upstream(upstream).await;
            let source = PollinationsSkills::new(Client::new(), &ai_config(&base, 5));
            suggest(&source, "Data Scientist", "healthcare").await
        }

        #[tokio::test]
        async fn upstream_answer_is_decoded() {
            let upstream = Router::new().route(
                "/v1/suggestions",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["max_tokens"], 50);
                    Json(json!({ "result": "Survival Analysis, SQL" }))
                }),
            );
            assert_eq!(skills_from(upstream).await, vec!["Survival Analysis", "SQL"]);
        }

        #[tokio::test]
        async fn server_error_uses_static_table() {
            let upstream = Router::new().route(
                "/v1/suggestions",
                post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );
            assert_eq!(skills_from(upstream).await, fallback_skills("data scientist"));
        }

        #[tokio::test]
        async fn non_json_body_uses_static_table() {
            let upstream = Router::new().route(
                "/v1/suggestions",
                post(|| async { "Python, R, SQL" }),
            );
            assert_eq!(skills_from(upstream).await, fallback_skills("data scientist"));
        }
    }
}
