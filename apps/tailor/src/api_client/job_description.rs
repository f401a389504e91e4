use std::path::Path;

use crate::errors::TailorError;

/// Job description handed to the extract step. Pasted text is sent as the
/// `jobDescText` form field, an uploaded file as `jobDescFile`.
#[derive(Debug, Clone, PartialEq)]
pub enum JobDescription {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

impl JobDescription {
    /// Picks the job description the same way the wizard form does:
    /// non-blank text wins, otherwise the file, otherwise nothing to send.
    pub async fn from_inputs(
        text: Option<&str>,
        file: Option<&Path>,
    ) -> Result<Self, TailorError> {
        if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(JobDescription::Text(text.to_string()));
        }

        let Some(path) = file else {
            return Err(TailorError::Validation(
                "Please provide a job description".to_string(),
            ));
        };

        let bytes = tokio::fs::read(path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(TailorError::Validation(format!(
                "Job description file {} is empty",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "job_description.txt".to_string());

        Ok(JobDescription::File { file_name, bytes })
    }
}
