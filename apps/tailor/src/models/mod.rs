//! Payloads exchanged with the tailoring service. Each one is produced by a
//! single endpoint and handed unchanged to the next step.

pub mod scoring;
pub mod skills;
pub mod transform;

pub use scoring::{MinScore, ScoreBand, ScoredExperience, ScoredHighlight, ScoredProject, ScoredResume};
pub use skills::{CompanyInfo, ExtractedSkills, Skill};
pub use transform::{
    HighlightRef, TransformedExperience, TransformedHighlight, TransformedProject,
    TransformedResume,
};
