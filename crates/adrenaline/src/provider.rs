//! Edit-suggestion providers.
//!
//! A provider takes code plus an instruction and returns a revised version
//! of the code. Failures here never reach the diff core.

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;

/// Errors from the edit-suggestion service
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured; set OPENAI_API_KEY or api_key in .adrenaline.toml")]
    MissingApiKey,
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("service rejected the credentials (HTTP {0})")]
    Unauthorized(u16),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("service returned no suggestion")]
    EmptyResponse,
}

/// Something that proposes a revised version of some code
pub trait EditProvider: Send + Sync {
    /// Ask for `code` rewritten according to `instruction`
    fn suggest_edit(&self, code: &str, instruction: &str) -> Result<String, ProviderError>;
}

// =============================================================================
// OpenAI edits API
// =============================================================================

#[derive(Serialize)]
struct EditRequest<'a> {
    model: &'a str,
    input: &'a str,
    instruction: &'a str,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct EditChoice {
    text: String,
}

#[derive(Deserialize)]
struct EditResponse {
    choices: Vec<EditChoice>,
}

impl EditResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(ProviderError::EmptyResponse)
    }
}

/// Provider backed by the OpenAI edits endpoint
pub struct OpenAiEditProvider {
    client: Client,
    api_key: SecretString,
    endpoint: Url,
    model: String,
    temperature: f32,
    top_p: f32,
}

impl OpenAiEditProvider {
    /// Build a provider from the application config
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| SecretString::from(key.to_string()))
            .ok_or(ProviderError::MissingApiKey)?;

        let endpoint = edits_endpoint(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }
}

impl EditProvider for OpenAiEditProvider {
    fn suggest_edit(&self, code: &str, instruction: &str) -> Result<String, ProviderError> {
        let request = EditRequest {
            model: &self.model,
            input: code,
            instruction,
            temperature: self.temperature,
            top_p: self.top_p,
        };

        log::debug!("Requesting edit from {} with model {}", self.endpoint, self.model);
        let res = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()?;

        match res.status() {
            StatusCode::OK => {
                let text = res.json::<EditResponse>()?.into_text()?;
                log::debug!("Received {} bytes of revised code", text.len());
                Ok(text)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ProviderError::Unauthorized(status.as_u16()))
            }
            status => {
                let body = res.text().unwrap_or_default();
                log::warn!("Edit request failed with HTTP {}", status);
                Err(ProviderError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

/// `{base_url}/edits`, tolerating a base URL without a trailing slash
fn edits_endpoint(base_url: &str) -> Result<Url, ProviderError> {
    let mut base = base_url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)
        .and_then(|url| url.join("edits"))
        .map_err(|e| ProviderError::InvalidUrl(format!("{base_url}: {e}")))
}
