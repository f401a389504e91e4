use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TailorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedHighlight {
    pub original: String,
    pub transformed: String,
    #[serde(default)]
    pub emphasized_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedExperience {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub highlights: Vec<TransformedHighlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedProject {
    pub name: String,
    #[serde(default)]
    pub highlights: Vec<TransformedHighlight>,
}

/// Output of `POST /api/transform`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformedResume {
    #[serde(default)]
    pub professional_experience: Vec<TransformedExperience>,
    #[serde(default)]
    pub projects: Vec<TransformedProject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Experience,
    Project,
}

impl Section {
    fn prefix(self) -> &'static str {
        match self {
            Section::Experience => "exp",
            Section::Project => "proj",
        }
    }
}

/// Address of one transformed bullet: section, entry position, bullet position.
/// Written as `exp:<entry>:<index>` or `proj:<entry>:<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HighlightRef {
    pub section: Section,
    pub entry: usize,
    pub index: usize,
}

impl HighlightRef {
    pub fn experience(entry: usize, index: usize) -> Self {
        Self {
            section: Section::Experience,
            entry,
            index,
        }
    }

    pub fn project(entry: usize, index: usize) -> Self {
        Self {
            section: Section::Project,
            entry,
            index,
        }
    }
}

impl fmt::Display for HighlightRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.section.prefix(), self.entry, self.index)
    }
}

impl FromStr for HighlightRef {
    type Err = TailorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            TailorError::Validation(format!(
                "Invalid bullet reference '{s}' (expected exp:<entry>:<index> or proj:<entry>:<index>)"
            ))
        };

        let mut parts = s.trim().split(':');
        let section = match parts.next() {
            Some("exp") => Section::Experience,
            Some("proj") => Section::Project,
            _ => return Err(invalid()),
        };
        let entry = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let index = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            section,
            entry,
            index,
        })
    }
}

impl TransformedResume {
    pub fn highlight(&self, at: HighlightRef) -> Option<&TransformedHighlight> {
        match at.section {
            Section::Experience => self
                .professional_experience
                .get(at.entry)
                .and_then(|e| e.highlights.get(at.index)),
            Section::Project => self
                .projects
                .get(at.entry)
                .and_then(|p| p.highlights.get(at.index)),
        }
    }

    pub fn highlight_mut(&mut self, at: HighlightRef) -> Option<&mut TransformedHighlight> {
        match at.section {
            Section::Experience => self
                .professional_experience
                .get_mut(at.entry)
                .and_then(|e| e.highlights.get_mut(at.index)),
            Section::Project => self
                .projects
                .get_mut(at.entry)
                .and_then(|p| p.highlights.get_mut(at.index)),
        }
    }

    /// Every bullet reference, experience before projects, in response order.
    pub fn refs(&self) -> Vec<HighlightRef> {
        let experience = self
            .professional_experience
            .iter()
            .enumerate()
            .flat_map(|(entry, e)| {
                (0..e.highlights.len()).map(move |index| HighlightRef::experience(entry, index))
            });
        let projects = self.projects.iter().enumerate().flat_map(|(entry, p)| {
            (0..p.highlights.len()).map(move |index| HighlightRef::project(entry, index))
        });
        experience.chain(projects).collect()
    }
}
