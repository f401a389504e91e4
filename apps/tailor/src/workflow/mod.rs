//! The four-step wizard: extract → match → transform → download.
//!
//! `WizardState` holds every step output and changes only through pure
//! transitions. `Router` owns the dispatch table from `StepId` to handler and
//! refuses any step whose predecessor has not completed.

use std::fmt;

pub mod download;
pub mod emphasis;
pub mod router;
pub mod state;
pub mod steps;

#[cfg(test)]
pub mod test_support;

pub use router::{Action, Dispatch, Router};
pub use state::WizardState;
pub use steps::StepOutput;

/// Where the wizard is. Ordered: a later stage implies every earlier output exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    AwaitingJobDescription,
    SkillsExtracted,
    ResumeScored,
    ResumeTransformed,
    Downloaded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::AwaitingJobDescription => "awaiting job description",
            Stage::SkillsExtracted => "skills extracted",
            Stage::ResumeScored => "resume scored",
            Stage::ResumeTransformed => "resume transformed",
            Stage::Downloaded => "downloaded",
        };
        f.write_str(label)
    }
}

/// A user-triggered step. Keys the router's dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Extract,
    Match,
    Transform,
    Alternative,
    Download,
}

impl StepId {
    pub const ALL: [StepId; 5] = [
        StepId::Extract,
        StepId::Match,
        StepId::Transform,
        StepId::Alternative,
        StepId::Download,
    ];

    /// Earliest stage at which this step may run.
    pub fn required_stage(self) -> Stage {
        match self {
            StepId::Extract => Stage::AwaitingJobDescription,
            StepId::Match => Stage::SkillsExtracted,
            StepId::Transform => Stage::ResumeScored,
            StepId::Alternative | StepId::Download => Stage::ResumeTransformed,
        }
    }

    /// Progressive phrase used in failure messages.
    pub fn activity(self) -> &'static str {
        match self {
            StepId::Extract => "extracting skills",
            StepId::Match => "matching resume",
            StepId::Transform => "transforming resume",
            StepId::Alternative => "generating alternative",
            StepId::Download => "building tailored resume",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepId::Extract => "extract",
            StepId::Match => "match",
            StepId::Transform => "transform",
            StepId::Alternative => "alternative",
            StepId::Download => "download",
        };
        f.write_str(name)
    }
}
