//! Builds the tailored resume: the uploaded resume with each matched entry's
//! bullets replaced by the kept transformed bullets.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::errors::TailorError;
use crate::models::{HighlightRef, TransformedHighlight, TransformedResume};
use crate::workflow::emphasis::strip_markup;

pub const DEFAULT_FILE_NAME: &str = "tailored_resume.json";

/// Experience entries match on `company` + `position`, projects on `name`.
/// Unmatched entries, and resumes without `CV.sections`, pass through as-is.
pub fn build_tailored_resume(
    resume: &Value,
    transformed: &TransformedResume,
    is_kept: impl Fn(HighlightRef) -> bool,
) -> Value {
    let mut tailored = resume.clone();
    if let Some(sections) = tailored.pointer_mut("/CV/sections") {
        replace_bullets(sections, transformed, &is_kept);
    }
    tailored
}

fn replace_bullets(
    sections: &mut Value,
    transformed: &TransformedResume,
    is_kept: &impl Fn(HighlightRef) -> bool,
) {
    if let Some(entries) = sections
        .get_mut("ProfessionalExperience")
        .and_then(Value::as_array_mut)
    {
        for (entry, exp) in transformed.professional_experience.iter().enumerate() {
            let target = entries.iter_mut().find(|e| {
                field(e, "company") == Some(exp.company.as_str())
                    && field(e, "position") == Some(exp.position.as_str())
            });
            if let Some(target) = target {
                target["highlights"] = kept_bullets(&exp.highlights, |index| {
                    is_kept(HighlightRef::experience(entry, index))
                });
            }
        }
    }

    if let Some(entries) = sections.get_mut("Projects").and_then(Value::as_array_mut) {
        for (entry, proj) in transformed.projects.iter().enumerate() {
            let target = entries
                .iter_mut()
                .find(|e| field(e, "name") == Some(proj.name.as_str()));
            if let Some(target) = target {
                target["highlights"] = kept_bullets(&proj.highlights, |index| {
                    is_kept(HighlightRef::project(entry, index))
                });
            }
        }
    }
}

/// Writes the document as pretty-printed JSON.
pub async fn save(path: &Path, document: &Value) -> Result<(), TailorError> {
    let body = serde_json::to_string_pretty(document)?;
    tokio::fs::write(path, body).await?;
    info!("Tailored resume written to {}", path.display());
    Ok(())
}

fn field<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

fn kept_bullets(highlights: &[TransformedHighlight], keep: impl Fn(usize) -> bool) -> Value {
    highlights
        .iter()
        .enumerate()
        .filter(|(index, _)| keep(*index))
        .map(|(_, h)| Value::String(strip_markup(&h.transformed)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::workflow::test_support::{resume_fixture, transformed_fixture};

    #[test]
    fn test_all_kept_replaces_matched_entries() {
        let tailored = build_tailored_resume(&resume_fixture(), &transformed_fixture(), |_| true);
        let sections = &tailored["CV"]["sections"];

        assert_eq!(
            sections["ProfessionalExperience"][0]["highlights"],
            json!(["Led Rust work on seven", "Led Rust work on nine"])
        );
        assert_eq!(
            sections["ProfessionalExperience"][1]["highlights"],
            json!(["Mentored interns"])
        );
        assert_eq!(sections["Projects"][0]["highlights"], json!(["Led Rust work on cli"]));
    }

    #[test]
    fn test_dropped_bullets_are_omitted_in_order() {
        let dropped = HighlightRef::experience(0, 0);
        let tailored =
            build_tailored_resume(&resume_fixture(), &transformed_fixture(), |at| at != dropped);

        assert_eq!(
            tailored["CV"]["sections"]["ProfessionalExperience"][0]["highlights"],
            json!(["Led Rust work on nine"])
        );
    }

    #[test]
    fn test_no_markup_survives() {
        let tailored = build_tailored_resume(&resume_fixture(), &transformed_fixture(), |_| true);
        let text = tailored.to_string();
        assert!(!text.contains("<strong>"));
        assert!(!text.contains("</strong>"));
    }

    #[test]
    fn test_comparison_signs_survive_in_bullets() {
        let mut transformed = transformed_fixture();
        transformed.professional_experience[0].highlights[0].transformed =
            "Cut <strong>errors</strong> to <1% while serving >10k rps".to_string();

        let tailored = build_tailored_resume(&resume_fixture(), &transformed, |_| true);
        assert_eq!(
            tailored["CV"]["sections"]["ProfessionalExperience"][0]["highlights"][0],
            "Cut errors to <1% while serving >10k rps"
        );
    }

    #[test]
    fn test_position_mismatch_leaves_entry_alone() {
        let mut transformed = transformed_fixture();
        transformed.professional_experience[0].position = "Manager".to_string();

        let tailored = build_tailored_resume(&resume_fixture(), &transformed, |_| true);
        assert_eq!(
            tailored["CV"]["sections"]["ProfessionalExperience"][0]["highlights"],
            json!(["five", "seven", "nine"])
        );
    }

    #[test]
    fn test_resume_without_sections_is_unchanged() {
        let resume = json!({"basics": {"name": "Jane"}});
        let tailored = build_tailored_resume(&resume, &transformed_fixture(), |_| true);
        assert_eq!(tailored, resume);
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE_NAME);

        save(&path, &json!({"CV": {"name": "Jane"}})).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"CV\""));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["CV"]["name"], "Jane");
    }
}
