use std::collections::BTreeSet;

use serde_json::Value;
use uuid::Uuid;

use crate::errors::TailorError;
use crate::models::{ExtractedSkills, HighlightRef, MinScore, ScoredResume, TransformedResume};
use crate::workflow::steps::StepOutput;
use crate::workflow::{Stage, StepId};

/// Everything the wizard knows, for one session.
///
/// Transitions consume the state and return the next one. Callers keep the
/// previous value until a transition succeeds, so a failed step never leaves
/// a half-updated state behind.
#[derive(Debug, Clone)]
pub struct WizardState {
    session_id: Uuid,
    min_score: MinScore,
    extracted_skills: Option<ExtractedSkills>,
    resume: Option<Value>,
    scored_resume: Option<ScoredResume>,
    transformed_resume: Option<TransformedResume>,
    /// Bullets toggled off. Everything else is kept.
    dropped: BTreeSet<HighlightRef>,
    downloaded: bool,
}

impl WizardState {
    pub fn new(min_score: MinScore) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            min_score,
            extracted_skills: None,
            resume: None,
            scored_resume: None,
            transformed_resume: None,
            dropped: BTreeSet::new(),
            downloaded: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn min_score(&self) -> MinScore {
        self.min_score
    }

    pub fn extracted_skills(&self) -> Option<&ExtractedSkills> {
        self.extracted_skills.as_ref()
    }

    pub fn resume(&self) -> Option<&Value> {
        self.resume.as_ref()
    }

    pub fn scored_resume(&self) -> Option<&ScoredResume> {
        self.scored_resume.as_ref()
    }

    pub fn transformed_resume(&self) -> Option<&TransformedResume> {
        self.transformed_resume.as_ref()
    }

    pub fn is_kept(&self, at: HighlightRef) -> bool {
        !self.dropped.contains(&at)
    }

    pub fn stage(&self) -> Stage {
        if self.transformed_resume.is_some() {
            if self.downloaded {
                Stage::Downloaded
            } else {
                Stage::ResumeTransformed
            }
        } else if self.scored_resume.is_some() {
            Stage::ResumeScored
        } else if self.extracted_skills.is_some() {
            Stage::SkillsExtracted
        } else {
            Stage::AwaitingJobDescription
        }
    }

    /// Steps that may run now, in wizard order.
    pub fn enabled_steps(&self) -> Vec<StepId> {
        let stage = self.stage();
        StepId::ALL
            .into_iter()
            .filter(|step| step.required_stage() <= stage)
            .collect()
    }

    /// The threshold can move at any stage; existing outputs stay valid.
    pub fn with_min_score(mut self, min_score: MinScore) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_toggle(mut self, at: HighlightRef, keep: bool) -> Result<Self, TailorError> {
        let exists = self
            .transformed_resume
            .as_ref()
            .is_some_and(|t| t.highlight(at).is_some());
        if !exists {
            return Err(TailorError::Validation(format!(
                "No transformed bullet at {at}"
            )));
        }

        if keep {
            self.dropped.remove(&at);
        } else {
            self.dropped.insert(at);
        }
        self.downloaded = false;
        Ok(self)
    }

    /// Folds a completed step's output into the state.
    ///
    /// A re-run overwrites that step's output and clears everything derived
    /// from it further down the wizard.
    pub fn apply(mut self, output: &StepOutput) -> Result<Self, TailorError> {
        let step = output.step();
        let required = step.required_stage();
        if self.stage() < required {
            return Err(TailorError::StepLocked { step, required });
        }

        match output {
            StepOutput::Extracted(skills) => {
                self.extracted_skills = Some(skills.clone());
                self.resume = None;
                self.clear_from_scoring();
            }
            StepOutput::Scored { resume, scored } => {
                self.resume = Some(resume.clone());
                self.clear_from_scoring();
                self.scored_resume = Some(scored.clone());
            }
            StepOutput::Transformed(transformed) => {
                self.transformed_resume = Some(transformed.clone());
                self.dropped.clear();
                self.downloaded = false;
            }
            StepOutput::Alternative { target, text } => {
                let highlight = self
                    .transformed_resume
                    .as_mut()
                    .and_then(|t| t.highlight_mut(*target))
                    .ok_or_else(|| {
                        TailorError::Validation(format!("No transformed bullet at {target}"))
                    })?;
                highlight.transformed = text.clone();
                self.downloaded = false;
            }
            StepOutput::Downloaded(_) => {
                self.downloaded = true;
            }
        }

        Ok(self)
    }

    fn clear_from_scoring(&mut self) {
        self.scored_resume = None;
        self.transformed_resume = None;
        self.dropped.clear();
        self.downloaded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::test_support::{
        resume_fixture, scored_fixture, skills_fixture, transformed_fixture,
    };

    fn transformed_state() -> WizardState {
        WizardState::new(MinScore::default())
            .apply(&StepOutput::Extracted(skills_fixture()))
            .unwrap()
            .apply(&StepOutput::Scored {
                resume: resume_fixture(),
                scored: scored_fixture(),
            })
            .unwrap()
            .apply(&StepOutput::Transformed(transformed_fixture()))
            .unwrap()
    }

    #[test]
    fn test_new_state_only_allows_extract() {
        let state = WizardState::new(MinScore::default());
        assert_eq!(state.stage(), Stage::AwaitingJobDescription);
        assert_eq!(state.enabled_steps(), vec![StepId::Extract]);
    }

    #[test]
    fn test_outputs_advance_the_stage() {
        let state = transformed_state();
        assert_eq!(state.stage(), Stage::ResumeTransformed);
        assert_eq!(state.enabled_steps(), StepId::ALL.to_vec());

        let done = state
            .apply(&StepOutput::Downloaded(serde_json::json!({})))
            .unwrap();
        assert_eq!(done.stage(), Stage::Downloaded);
    }

    #[test]
    fn test_skipping_ahead_is_refused() {
        let err = WizardState::new(MinScore::default())
            .apply(&StepOutput::Transformed(transformed_fixture()))
            .unwrap_err();
        assert!(matches!(
            err,
            TailorError::StepLocked {
                step: StepId::Transform,
                required: Stage::ResumeScored
            }
        ));
    }

    #[test]
    fn test_rerunning_extract_clears_later_outputs() {
        let state = transformed_state()
            .apply(&StepOutput::Extracted(skills_fixture()))
            .unwrap();

        assert_eq!(state.stage(), Stage::SkillsExtracted);
        assert!(state.resume().is_none());
        assert!(state.scored_resume().is_none());
        assert!(state.transformed_resume().is_none());
    }

    #[test]
    fn test_retransform_resets_toggles() {
        let at = HighlightRef::experience(0, 0);
        let state = transformed_state().with_toggle(at, false).unwrap();
        assert!(!state.is_kept(at));

        let state = state
            .apply(&StepOutput::Transformed(transformed_fixture()))
            .unwrap();
        assert!(state.is_kept(at));
    }

    #[test]
    fn test_toggle_requires_an_existing_bullet() {
        let err = transformed_state()
            .with_toggle(HighlightRef::project(5, 0), false)
            .unwrap_err();
        assert!(matches!(err, TailorError::Validation(_)));

        let err = WizardState::new(MinScore::default())
            .with_toggle(HighlightRef::experience(0, 0), false)
            .unwrap_err();
        assert!(matches!(err, TailorError::Validation(_)));
    }

    #[test]
    fn test_min_score_change_keeps_outputs() {
        let state = transformed_state().with_min_score(MinScore::new(9).unwrap());
        assert_eq!(state.min_score().get(), 9);
        assert_eq!(state.stage(), Stage::ResumeTransformed);
    }

    #[test]
    fn test_edits_after_download_reopen_the_download() {
        let downloaded = || {
            transformed_state()
                .apply(&StepOutput::Downloaded(serde_json::json!({})))
                .unwrap()
        };

        let toggled = downloaded()
            .with_toggle(HighlightRef::experience(0, 0), false)
            .unwrap();
        assert_eq!(toggled.stage(), Stage::ResumeTransformed);

        let rewritten = downloaded()
            .apply(&StepOutput::Alternative {
                target: HighlightRef::project(0, 0),
                text: "Shipped a Rust CLI".to_string(),
            })
            .unwrap();
        assert_eq!(rewritten.stage(), Stage::ResumeTransformed);
    }

    #[test]
    fn test_alternative_replaces_transformed_text() {
        let at = HighlightRef::experience(0, 1);
        let state = transformed_state()
            .apply(&StepOutput::Alternative {
                target: at,
                text: "Rewrote it".to_string(),
            })
            .unwrap();
        let highlight = state.transformed_resume().unwrap().highlight(at).unwrap();
        assert_eq!(highlight.transformed, "Rewrote it");
    }
}
