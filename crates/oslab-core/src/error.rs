//! Error types for session actions.

use thiserror::Error;

use crate::model::TaskId;
use crate::session::Phase;

/// Errors returned by [`crate::session::LabSession`] actions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabError {
    /// The action does not apply to the session's current phase.
    #[error("'{action}' is not available in {phase}")]
    WrongPhase { action: &'static str, phase: Phase },

    /// Forward navigation attempted before the current task was unlocked.
    #[error("score {score}% on {task} is below the {threshold}% needed to continue")]
    NavigationLocked { task: TaskId, score: u8, threshold: u8 },

    /// Navigation to a task that is not adjacent to the current one.
    #[error("cannot move from task {from} to task {to}")]
    InvalidNavigation { from: u8, to: u8 },

    /// The second task was checked without both inputs present.
    #[error("select an architecture and provide a justification before checking")]
    MissingAnalysisInput,

    /// No catalog item with this id.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// No drop zone with this id.
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// No console command at this index.
    #[error("no command #{0}")]
    UnknownCommand(usize),

    /// No checkbox option with this id in the addressed group.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// No scenario at this index.
    #[error("no scenario #{0}")]
    UnknownScenario(usize),

    /// No essay field with this id.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Task numbers run from 1 to 4.
    #[error("task number must be between 1 and 4, got {0}")]
    UnknownTask(u8),
}

impl LabError {
    /// True for errors the learner fixes by supplying input, as opposed
    /// to addressing something that does not exist.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LabError::MissingAnalysisInput | LabError::NavigationLocked { .. }
        )
    }
}
