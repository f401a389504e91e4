use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

use crate::api_client::{JobDescription, TailorApi};
use crate::errors::TailorError;
use crate::models::HighlightRef;
use crate::workflow::steps::{
    AlternativeStep, DownloadStep, ExtractStep, MatchStep, StepHandler, StepOutput, TransformStep,
};
use crate::workflow::{StepId, WizardState};

/// A user request to run one step, with that step's input.
#[derive(Debug, Clone)]
pub enum Action {
    Extract(JobDescription),
    Match(Value),
    Transform,
    Alternative(HighlightRef),
    Download,
}

impl Action {
    pub fn step(&self) -> StepId {
        match self {
            Action::Extract(_) => StepId::Extract,
            Action::Match(_) => StepId::Match,
            Action::Transform => StepId::Transform,
            Action::Alternative(_) => StepId::Alternative,
            Action::Download => StepId::Download,
        }
    }
}

/// Result of a successful dispatch: the next state and what the step produced.
#[derive(Debug)]
pub struct Dispatch {
    pub state: WizardState,
    pub output: StepOutput,
}

/// Dispatch table from step to handler, gated by the forward-only wizard order.
pub struct Router {
    api: Arc<dyn TailorApi>,
    handlers: HashMap<StepId, Box<dyn StepHandler>>,
}

impl Router {
    pub fn new(api: Arc<dyn TailorApi>) -> Self {
        let mut handlers: HashMap<StepId, Box<dyn StepHandler>> = HashMap::new();
        handlers.insert(StepId::Extract, Box::new(ExtractStep));
        handlers.insert(StepId::Match, Box::new(MatchStep));
        handlers.insert(StepId::Transform, Box::new(TransformStep));
        handlers.insert(StepId::Alternative, Box::new(AlternativeStep));
        handlers.insert(StepId::Download, Box::new(DownloadStep));

        Self { api, handlers }
    }

    /// Runs `action` against `state` and returns the next state.
    ///
    /// `state` is only borrowed: on any error the caller still holds the
    /// unchanged state. A step whose predecessor has not completed is
    /// refused before any network call is made.
    pub async fn dispatch(
        &self,
        state: &WizardState,
        action: Action,
    ) -> Result<Dispatch, TailorError> {
        let step = action.step();
        let span = info_span!("step", %step, session = %state.session_id());

        async move {
            let required = step.required_stage();
            if state.stage() < required {
                return Err(TailorError::StepLocked { step, required });
            }

            let handler = self
                .handlers
                .get(&step)
                .ok_or_else(|| anyhow!("no handler registered for {step}"))?;

            let output = match handler.run(state, action, self.api.as_ref()).await {
                Ok(output) => output,
                Err(e) => {
                    error!("{}", e.user_message(step));
                    return Err(e);
                }
            };

            let next = state.clone().apply(&output)?;
            info!("Step completed, wizard is now {}", next.stage());

            Ok(Dispatch {
                state: next,
                output,
            })
        }
        .instrument(span)
        .await
    }
}
