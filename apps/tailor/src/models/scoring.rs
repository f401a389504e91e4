//! Scored resume returned by `POST /api/match`, plus the min-score threshold
//! that decides which bullets go on to the transform step.

use serde::{Deserialize, Serialize};

use crate::errors::TailorError;

/// Threshold for transform eligibility. Always within 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MinScore(u8);

impl MinScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, TailorError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(TailorError::Validation(format!(
                "Min score must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn admits(self, score: f64) -> bool {
        score >= f64::from(self.0)
    }
}

impl Default for MinScore {
    fn default() -> Self {
        Self(7)
    }
}

impl TryFrom<u8> for MinScore {
    type Error = TailorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MinScore> for u8 {
    fn from(score: MinScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for MinScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display band for a relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,   // >= 8
    Medium, // 5 – 7.x
    Low,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::High
        } else if score >= 5.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHighlight {
    pub text: String,
    pub score: f64,
    #[serde(default)]
    pub matching_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredExperience {
    pub company: String,
    pub position: String,
    pub score: f64,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<ScoredHighlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProject {
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<ScoredHighlight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredResume {
    #[serde(default)]
    pub professional_experience: Vec<ScoredExperience>,
    #[serde(default)]
    pub projects: Vec<ScoredProject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
}

impl ScoredResume {
    /// Copy of this resume holding only highlights at or above `min_score`.
    /// Entries left without any highlight are dropped.
    pub fn retain_eligible(&self, min_score: MinScore) -> ScoredResume {
        let keep = |highlights: &[ScoredHighlight]| -> Vec<ScoredHighlight> {
            highlights
                .iter()
                .filter(|h| min_score.admits(h.score))
                .cloned()
                .collect()
        };

        ScoredResume {
            professional_experience: self
                .professional_experience
                .iter()
                .filter_map(|exp| {
                    let highlights = keep(&exp.highlights);
                    (!highlights.is_empty()).then(|| ScoredExperience {
                        highlights,
                        ..exp.clone()
                    })
                })
                .collect(),
            projects: self
                .projects
                .iter()
                .filter_map(|proj| {
                    let highlights = keep(&proj.highlights);
                    (!highlights.is_empty()).then(|| ScoredProject {
                        highlights,
                        ..proj.clone()
                    })
                })
                .collect(),
            overall_score: self.overall_score,
        }
    }

    pub fn highlight_count(&self) -> usize {
        self.professional_experience
            .iter()
            .map(|e| e.highlights.len())
            .chain(self.projects.iter().map(|p| p.highlights.len()))
            .sum()
    }
}
