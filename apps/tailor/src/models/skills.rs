use serde::{Deserialize, Serialize};

use crate::api_client::ApiError;

/// A single skill pulled out of a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Output of `POST /api/extract`. `company_info` has no serde default: a
/// response without it is malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkills {
    pub required_skills: Vec<Skill>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<Skill>,
    pub company_info: CompanyInfo,
}

impl ExtractedSkills {
    /// Rejects an extraction that found no required skills.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.required_skills.iter().all(|s| s.name.trim().is_empty()) {
            return Err(ApiError::Malformed(
                "extraction returned no required skills".to_string(),
            ));
        }
        Ok(())
    }
}
