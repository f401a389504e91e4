use anyhow::{bail, Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_MIN_SCORE: u8 = 7;

/// Client configuration loaded from environment variables.
/// Every variable has a default, so a bare environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub min_score: u8,
    /// Unset means requests never time out.
    pub http_timeout_secs: Option<u64>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let min_score = match optional("TAILOR_MIN_SCORE") {
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .context("TAILOR_MIN_SCORE must be an integer between 1 and 10")?,
            None => DEFAULT_MIN_SCORE,
        };
        if !(1..=10).contains(&min_score) {
            bail!("TAILOR_MIN_SCORE must be between 1 and 10, got {min_score}");
        }

        let http_timeout_secs = optional("TAILOR_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .context("TAILOR_HTTP_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?;

        Ok(Config {
            api_url: optional("TAILOR_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            min_score,
            http_timeout_secs,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
