//! One handler per wizard step. A handler reads the current state, makes at
//! most one call to the tailoring service, and returns the step's output.
//! It never touches the state itself; `WizardState::apply` does that.

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::api_client::TailorApi;
use crate::errors::TailorError;
use crate::models::{ExtractedSkills, HighlightRef, ScoredResume, TransformedResume};
use crate::workflow::download::build_tailored_resume;
use crate::workflow::router::Action;
use crate::workflow::{StepId, WizardState};

/// What a completed step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput {
    Extracted(ExtractedSkills),
    Scored { resume: Value, scored: ScoredResume },
    Transformed(TransformedResume),
    Alternative { target: HighlightRef, text: String },
    /// The tailored resume document.
    Downloaded(Value),
}

impl StepOutput {
    pub fn step(&self) -> StepId {
        match self {
            StepOutput::Extracted(_) => StepId::Extract,
            StepOutput::Scored { .. } => StepId::Match,
            StepOutput::Transformed(_) => StepId::Transform,
            StepOutput::Alternative { .. } => StepId::Alternative,
            StepOutput::Downloaded(_) => StepId::Download,
        }
    }
}

#[async_trait]
pub trait StepHandler: Send + Sync {
    async fn run(
        &self,
        state: &WizardState,
        action: Action,
        api: &dyn TailorApi,
    ) -> Result<StepOutput, TailorError>;
}

pub struct ExtractStep;

#[async_trait]
impl StepHandler for ExtractStep {
    async fn run(
        &self,
        _state: &WizardState,
        action: Action,
        api: &dyn TailorApi,
    ) -> Result<StepOutput, TailorError> {
        let job = match action {
            Action::Extract(job) => job,
            other => return Err(misrouted(StepId::Extract, &other)),
        };

        let skills = api.extract(&job).await?;
        Ok(StepOutput::Extracted(skills))
    }
}

pub struct MatchStep;

#[async_trait]
impl StepHandler for MatchStep {
    async fn run(
        &self,
        state: &WizardState,
        action: Action,
        api: &dyn TailorApi,
    ) -> Result<StepOutput, TailorError> {
        let resume = match action {
            Action::Match(resume) => resume,
            other => return Err(misrouted(StepId::Match, &other)),
        };
        if !resume.is_object() {
            return Err(TailorError::Validation(
                "Invalid resume JSON format: expected an object".to_string(),
            ));
        }
        let skills = required(state.extracted_skills(), StepId::Match)?;

        let scored = api.match_resume(skills, &resume).await?;
        Ok(StepOutput::Scored { resume, scored })
    }
}

pub struct TransformStep;

#[async_trait]
impl StepHandler for TransformStep {
    async fn run(
        &self,
        state: &WizardState,
        action: Action,
        api: &dyn TailorApi,
    ) -> Result<StepOutput, TailorError> {
        if !matches!(action, Action::Transform) {
            return Err(misrouted(StepId::Transform, &action));
        }
        let skills = required(state.extracted_skills(), StepId::Transform)?;
        let scored = required(state.scored_resume(), StepId::Transform)?;
        let min_score = state.min_score();

        let eligible = scored.retain_eligible(min_score);
        if eligible.highlight_count() == 0 {
            return Err(TailorError::Validation(format!(
                "No highlights score {min_score} or higher; lower the min score to transform"
            )));
        }
        debug!(
            "Sending {} of {} highlights for transformation (min score {min_score})",
            eligible.highlight_count(),
            scored.highlight_count()
        );

        let transformed = api.transform(&eligible, skills, min_score).await?;
        Ok(StepOutput::Transformed(transformed))
    }
}

pub struct AlternativeStep;

#[async_trait]
impl StepHandler for AlternativeStep {
    async fn run(
        &self,
        state: &WizardState,
        action: Action,
        api: &dyn TailorApi,
    ) -> Result<StepOutput, TailorError> {
        let target = match action {
            Action::Alternative(target) => target,
            other => return Err(misrouted(StepId::Alternative, &other)),
        };
        let transformed = required(state.transformed_resume(), StepId::Alternative)?;
        let highlight = transformed.highlight(target).ok_or_else(|| {
            TailorError::Validation(format!("No transformed bullet at {target}"))
        })?;

        let text = api
            .alternative(&highlight.original, &highlight.emphasized_skills)
            .await?;
        Ok(StepOutput::Alternative { target, text })
    }
}

/// Local only: assembles the tailored resume from the kept bullets.
pub struct DownloadStep;

#[async_trait]
impl StepHandler for DownloadStep {
    async fn run(
        &self,
        state: &WizardState,
        action: Action,
        _api: &dyn TailorApi,
    ) -> Result<StepOutput, TailorError> {
        if !matches!(action, Action::Download) {
            return Err(misrouted(StepId::Download, &action));
        }
        let resume = required(state.resume(), StepId::Download)?;
        let transformed = required(state.transformed_resume(), StepId::Download)?;

        let document = build_tailored_resume(resume, transformed, |at| state.is_kept(at));
        Ok(StepOutput::Downloaded(document))
    }
}

fn required<T>(value: Option<&T>, step: StepId) -> Result<&T, TailorError> {
    value.ok_or(TailorError::StepLocked {
        step,
        required: step.required_stage(),
    })
}

fn misrouted(step: StepId, action: &Action) -> TailorError {
    TailorError::Internal(anyhow!(
        "{} action routed to the {step} handler",
        action.step()
    ))
}
