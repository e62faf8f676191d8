use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Value};
use tracing::debug;

use super::{
    chain::{Attempt, FallbackChain},
    GatewayError,
};
use crate::config::AiConfig;

/// Request encodings, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// `POST {text}/` with `{prompt, model, seed}` and both auth headers.
    JsonPost,
    /// `GET {text}/<url-encoded prompt>` with both auth headers.
    GetEncoded,
    /// `POST {alt}/text` with `{prompt, apiKey}` in the body.
    AlternatePost,
    /// `POST {text}/` with `{prompt}` only.
    MinimalPost,
}

impl RequestShape {
    pub const ORDER: [RequestShape; 4] = [
        RequestShape::JsonPost,
        RequestShape::GetEncoded,
        RequestShape::AlternatePost,
        RequestShape::MinimalPost,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RequestShape::JsonPost => "json-post",
            RequestShape::GetEncoded => "get-encoded",
            RequestShape::AlternatePost => "alternate-post",
            RequestShape::MinimalPost => "minimal-post",
        }
    }

    /// JSON keys that hold the generated text, checked in order.
    fn text_fields(self) -> &'static [&'static str] {
        match self {
            RequestShape::JsonPost => &["text", "output"],
            RequestShape::AlternatePost => &["text"],
            RequestShape::GetEncoded | RequestShape::MinimalPost => &[],
        }
    }
}

pub struct PollinationsAttempt {
    client: Client,
    shape: RequestShape,
    api_key: String,
    text_base: String,
    alt_base: String,
    timeout: Duration,
}

impl PollinationsAttempt {
    pub fn new(client: Client, shape: RequestShape, cfg: &AiConfig) -> Self {
        Self {
            client,
            shape,
            api_key: cfg.api_key.clone(),
            text_base: cfg.text_base_url.trim_end_matches('/').to_string(),
            alt_base: cfg.alt_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.api_key)
            .header("X-API-Key", &self.api_key)
    }

    fn request(&self, prompt: &str) -> Result<RequestBuilder, GatewayError> {
        let req = match self.shape {
            RequestShape::JsonPost => {
                let seed: u32 = rand::thread_rng().gen_range(0..1_000_000);
                self.with_auth(self.client.post(format!("{}/", self.text_base)))
                    .json(&json!({ "prompt": prompt, "model": "openai", "seed": seed }))
            }
            RequestShape::GetEncoded => {
                self.with_auth(self.client.get(encoded_prompt_url(&self.text_base, prompt)?))
            }
            RequestShape::AlternatePost => self
                .client
                .post(format!("{}/text", self.alt_base))
                .json(&json!({ "prompt": prompt, "apiKey": self.api_key })),
            RequestShape::MinimalPost => self
                .client
                .post(format!("{}/", self.text_base))
                .json(&json!({ "prompt": prompt })),
        };
        Ok(req.timeout(self.timeout))
    }
}

#[async_trait]
impl Attempt for PollinationsAttempt {
    fn name(&self) -> &'static str {
        self.shape.name()
    }

    async fn call(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = self
            .request(prompt)?
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(attempt = self.name(), bytes = body.len(), "upstream responded");
        Ok(extract_text(&body, self.shape.text_fields()))
    }
}

/// All four shapes sharing one HTTP client.
pub fn default_chain(client: Client, cfg: &AiConfig) -> FallbackChain {
    FallbackChain::new(
        RequestShape::ORDER
            .into_iter()
            .map(|shape| Box::new(PollinationsAttempt::new(client.clone(), shape, cfg)) as Box<dyn Attempt>)
            .collect(),
    )
}

pub(crate) fn encoded_prompt_url(base: &str, prompt: &str) -> Result<Url, GatewayError> {
    let mut url = Url::parse(&format!("{base}/")).map_err(|e| GatewayError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| GatewayError::Url(format!("{base} cannot carry a path")))?
        .pop_if_empty()
        .push(prompt);
    Ok(url)
}

/// Turns whatever the generator returned into plain text.
///
/// A JSON string is unwrapped, a JSON object yields the first non-empty
/// string under `fields`, any other JSON is kept in its serialized form and
/// a non-JSON body is taken verbatim.
pub(crate) fn extract_text(body: &str, fields: &[&str]) -> String {
    let text = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => fields
            .iter()
            .find_map(|f| map.get(*f).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(map).to_string()),
        Ok(other) => other.to_string(),
        Err(_) => body.to_string(),
    };
    text.trim().to_string()
}
