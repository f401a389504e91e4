//! API Client — the single point of entry for all calls to the resume-tailoring service.
//!
//! Workflow code talks to the `TailorApi` trait, never to reqwest directly.
//! `ApiClient` is the HTTP implementation; tests substitute an in-process fake.
//!
//! No retries: a failed call fails the step that made it.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ExtractedSkills, MinScore, ScoredResume, TransformedResume};

pub mod job_description;

pub use job_description::JobDescription;

const EXTRACT_PATH: &str = "/api/extract";
const MATCH_PATH: &str = "/api/match";
const TRANSFORM_PATH: &str = "/api/transform";
const ALTERNATIVE_PATH: &str = "/api/alternative";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} ({message})")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    extracted_skills: &'a ExtractedSkills,
    resume: &'a Value,
}

#[derive(Debug, Serialize)]
struct TransformRequest<'a> {
    scored_resume: &'a ScoredResume,
    extracted_skills: &'a ExtractedSkills,
    min_score: MinScore,
}

#[derive(Debug, Serialize)]
struct AlternativeRequest<'a> {
    bullet_point: &'a str,
    matching_skills: &'a [String],
}

#[derive(Debug, Deserialize)]
struct AlternativeResponse {
    alternative: String,
}

/// The four endpoints the wizard drives. Carried by the router as `Arc<dyn TailorApi>`.
#[async_trait]
pub trait TailorApi: Send + Sync {
    async fn extract(&self, job: &JobDescription) -> Result<ExtractedSkills, ApiError>;

    async fn match_resume(
        &self,
        skills: &ExtractedSkills,
        resume: &Value,
    ) -> Result<ScoredResume, ApiError>;

    async fn transform(
        &self,
        scored: &ScoredResume,
        skills: &ExtractedSkills,
        min_score: MinScore,
    ) -> Result<TransformedResume, ApiError>;

    async fn alternative(
        &self,
        bullet_point: &str,
        matching_skills: &[String],
    ) -> Result<String, ApiError>;
}

/// HTTP client for the tailoring service.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {url}");
        let response = self.client.post(&url).json(body).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl TailorApi for ApiClient {
    async fn extract(&self, job: &JobDescription) -> Result<ExtractedSkills, ApiError> {
        let form = match job {
            JobDescription::Text(text) => Form::new().text("jobDescText", text.clone()),
            JobDescription::File { file_name, bytes } => Form::new().part(
                "jobDescFile",
                Part::bytes(bytes.clone()).file_name(file_name.clone()),
            ),
        };

        let url = self.endpoint(EXTRACT_PATH);
        debug!("POST {url} (multipart)");
        let response = self.client.post(&url).multipart(form).send().await?;

        let skills: ExtractedSkills = decode(response).await?;
        skills.validate()?;

        debug!(
            "Extracted {} required and {} nice-to-have skills",
            skills.required_skills.len(),
            skills.nice_to_have_skills.len()
        );
        Ok(skills)
    }

    async fn match_resume(
        &self,
        skills: &ExtractedSkills,
        resume: &Value,
    ) -> Result<ScoredResume, ApiError> {
        self.post_json(
            MATCH_PATH,
            &MatchRequest {
                extracted_skills: skills,
                resume,
            },
        )
        .await
    }

    async fn transform(
        &self,
        scored: &ScoredResume,
        skills: &ExtractedSkills,
        min_score: MinScore,
    ) -> Result<TransformedResume, ApiError> {
        self.post_json(
            TRANSFORM_PATH,
            &TransformRequest {
                scored_resume: scored,
                extracted_skills: skills,
                min_score,
            },
        )
        .await
    }

    async fn alternative(
        &self,
        bullet_point: &str,
        matching_skills: &[String],
    ) -> Result<String, ApiError> {
        let response: AlternativeResponse = self
            .post_json(
                ALTERNATIVE_PATH,
                &AlternativeRequest {
                    bullet_point,
                    matching_skills,
                },
            )
            .await?;

        let alternative = clean_alternative(&response.alternative);
        if alternative.is_empty() {
            return Err(ApiError::Malformed("empty alternative".to_string()));
        }
        Ok(alternative.to_string())
    }
}

/// Turns a response into `T`, treating every non-2xx status as a failure.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body);
        warn!("Tailoring API returned {status}: {message}");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(ApiError::Parse)
}

/// Pulls the human-readable message out of an error body.
/// Understands `{"detail": ...}` and `{"error": {"message": ...}}`; falls back to the raw body.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("detail")
            .or_else(|| v.get("error").and_then(|e| e.get("message")))
            .or_else(|| v.get("error"))
    });

    match message {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => body.trim().to_string(),
    }
}

/// Strips the quotes and backticks models like to wrap single-line answers in.
fn clean_alternative(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`').trim()
}
