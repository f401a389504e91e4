use thiserror::Error;

use crate::api_client::ApiError;
use crate::workflow::{Stage, StepId};

/// Application-level error type.
/// Every failure aborts the current step and leaves the wizard state as it was.
#[derive(Debug, Error)]
pub enum TailorError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Validation(String),

    #[error("{step} is not available until the wizard reaches {required}")]
    StepLocked { step: StepId, required: Stage },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl TailorError {
    /// The one-line message shown to the user when `step` fails.
    /// Network failures and non-2xx responses read the same way.
    pub fn user_message(&self, step: StepId) -> String {
        match self {
            TailorError::Validation(msg) => msg.clone(),
            TailorError::StepLocked { .. } => self.to_string(),
            other => format!("Error {}: {other}", step.activity()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefixes_the_step_activity() {
        let err = TailorError::Api(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(
            err.user_message(StepId::Extract),
            "Error extracting skills: API error: 500 (boom)"
        );
    }

    #[test]
    fn test_user_message_passes_validation_through() {
        let err = TailorError::Validation("Please provide a job description".to_string());
        assert_eq!(
            err.user_message(StepId::Extract),
            "Please provide a job description"
        );
    }

    #[test]
    fn test_step_locked_names_the_required_stage() {
        let err = TailorError::StepLocked {
            step: StepId::Match,
            required: Stage::SkillsExtracted,
        };
        assert_eq!(
            err.user_message(StepId::Match),
            "match is not available until the wizard reaches skills extracted"
        );
    }
}
