//! Read-only views of a session for presentation layers.
//!
//! A [`SessionSnapshot`] carries everything a renderer needs, already
//! denormalized: clock strings, per-task states, card positions and
//! form contents. Renderers never reach into live session state.

use serde::Serialize;

use crate::console::TranscriptEntry;
use crate::model::{ArchitectureClass, TaskId, ZoneMark};
use crate::session::Phase;

/// Full view of a session at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub lab: LabView,
    pub phase: Phase,
    pub current_task: Option<TaskId>,
    pub global: GlobalClockView,
    pub task_clock: Option<TaskClockView>,
    pub tasks: Vec<TaskStateView>,
    pub placement: PlacementView,
    pub console: ConsoleView,
    pub analysis: AnalysisView,
    pub comparison: ComparisonView,
    pub conclusions: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabView {
    pub id: String,
    pub title: String,
}

/// The session-wide countdown.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalClockView {
    /// Remaining time as `M:SS`.
    pub display: String,
    pub remaining_ms: u64,
    pub elapsed_ms: u64,
    /// Share of the budget consumed, `0.0..=1.0`.
    pub progress: f64,
    pub running: bool,
}

/// The live per-task countdown, absent outside of tasks.
#[derive(Debug, Clone, Serialize)]
pub struct TaskClockView {
    pub task: TaskId,
    /// Remaining time as `M:SS`, floored at `0:00`.
    pub display: String,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskStateView {
    pub task: TaskId,
    pub number: u8,
    pub name: String,
    pub score: u8,
    pub completed: bool,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneView {
    pub id: String,
    pub title: String,
    pub items: Vec<ItemView>,
    pub mark: Option<ZoneMark>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacementView {
    pub pool: Vec<ItemView>,
    pub zones: Vec<ZoneView>,
    /// Id of the armed card, if any.
    pub armed: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandView {
    pub index: usize,
    pub cmd: String,
    pub description: String,
    pub executed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsoleView {
    pub commands: Vec<CommandView>,
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub selected: Option<ArchitectureClass>,
    pub justification: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioView {
    pub index: usize,
    pub prompt: String,
    pub selected: Option<ArchitectureClass>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub monolithic: Vec<OptionView>,
    pub microkernel: Vec<OptionView>,
    pub scenarios: Vec<ScenarioView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub text: String,
}
