//! Session coordinator.
//!
//! [`LabSession`] owns a lab definition and all live state: the
//! current phase, both countdowns, the classification board, the
//! console and the form inputs. Presentation layers drive it through
//! actions and ticks and render from [`SessionSnapshot`]s; nothing in
//! here performs IO or schedules time.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::console::{CommandConsole, TranscriptEntry};
use crate::error::LabError;
use crate::inputs::{AnalysisInput, ComparisonInput, ConclusionsInput};
use crate::model::{AdvantageGroup, ArchitectureClass, LabSpec, TaskId};
use crate::placement::{Board, PlacementEvent};
use crate::results::{ReportEssay, SessionReport, TaskAnswers, TaskReportRow, TaskResult};
use crate::scoring::{self, CheckDetail, TaskScore, PASS_THRESHOLD, UNLOCK_THRESHOLD};
use crate::snapshot::{
    AnalysisView, CommandView, ComparisonView, ConsoleView, FieldView, GlobalClockView, ItemView,
    LabView, OptionView, PlacementView, ScenarioView, SessionSnapshot, TaskClockView,
    TaskStateView, ZoneView,
};
use crate::timer::{
    format_clock, GlobalCountdown, GlobalTick, TaskCountdowns, TaskTick, TaskTicket,
};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Task(TaskId),
    Results,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => write!(f, "the intro screen"),
            Phase::Task(task) => write!(f, "{task}"),
            Phase::Results => write!(f, "the results screen"),
        }
    }
}

/// Outcome of feeding one global tick into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalTickOutcome {
    /// The global clock is not running.
    Idle,
    /// Time remains.
    Running { remaining_ms: u64 },
    /// The budget ran out and the session finished itself.
    Expired,
}

/// What a check produced, with the running record folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub task: TaskId,
    /// Score of this attempt.
    pub score: u8,
    /// Best score recorded across attempts; never lower than before.
    pub recorded_score: u8,
    /// Whether the recorded score unlocks the next task.
    pub unlocked: bool,
    /// Whether this attempt counts as fully passing.
    pub passed: bool,
    pub detail: CheckDetail,
}

/// One learner's run through the lab.
pub struct LabSession {
    spec: LabSpec,
    id: Uuid,
    phase: Phase,
    board: Board,
    console: CommandConsole,
    analysis: AnalysisInput,
    comparison: ComparisonInput,
    conclusions: ConclusionsInput,
    results: HashMap<TaskId, TaskResult>,
    global: GlobalCountdown,
    task_clocks: TaskCountdowns,
    ticket: Option<TaskTicket>,
}

impl LabSession {
    pub fn new(spec: LabSpec) -> Self {
        let board = Board::new(&spec.classification);
        let console = CommandConsole::new(spec.analysis.commands.clone());
        let comparison = ComparisonInput::new(&spec.comparison);
        let conclusions = ConclusionsInput::new(&spec.conclusions);
        let global = GlobalCountdown::new(spec.global_budget_ms);
        Self {
            spec,
            id: Uuid::new_v4(),
            phase: Phase::NotStarted,
            board,
            console,
            analysis: AnalysisInput::default(),
            comparison,
            conclusions,
            results: Self::empty_results(),
            global,
            task_clocks: TaskCountdowns::new(),
            ticket: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_task(&self) -> Option<TaskId> {
        match self.phase {
            Phase::Task(task) => Some(task),
            _ => None,
        }
    }

    /// Best recorded score for a task, zero if never checked.
    pub fn score(&self, task: TaskId) -> u8 {
        self.results.get(&task).map(|r| r.score).unwrap_or(0)
    }

    /// Starts the global clock and enters the first task.
    pub fn start_lab(&mut self) -> Result<(), LabError> {
        if self.phase != Phase::NotStarted {
            return Err(LabError::WrongPhase {
                action: "start",
                phase: self.phase,
            });
        }
        tracing::info!(lab = %self.spec.id, session = %self.id, "session started");
        self.global.start();
        self.enter_task(TaskId::Classification);
        Ok(())
    }

    /// Moves to the next task. Forward movement requires the current
    /// task's recorded score to be at or above the unlock threshold.
    pub fn next_task(&mut self, target: u8) -> Result<TaskId, LabError> {
        self.navigate(target, true)
    }

    /// Moves back one task. Going back is never gated.
    pub fn prev_task(&mut self, target: u8) -> Result<TaskId, LabError> {
        self.navigate(target, false)
    }

    /// Click on a card, or a one-step placement when `zone` is given.
    pub fn arm_or_place(
        &mut self,
        item: &str,
        zone: Option<&str>,
    ) -> Result<PlacementEvent, LabError> {
        self.require_task(TaskId::Classification, "pick")?;
        match zone {
            Some(zone) => self.board.place(item, zone),
            None => self.board.click_item(item),
        }
    }

    /// Click on a zone, placing the armed card if there is one.
    pub fn zone_click(&mut self, zone: &str) -> Result<PlacementEvent, LabError> {
        self.require_task(TaskId::Classification, "put")?;
        self.board.click_zone(zone)
    }

    /// Start dragging a card.
    pub fn drag_start(&mut self, item: &str) -> Result<PlacementEvent, LabError> {
        self.require_task(TaskId::Classification, "drag")?;
        self.board.drag_start(item)
    }

    /// Drop onto a zone, with an optional transfer payload fallback.
    pub fn drop_on_zone(
        &mut self,
        zone: &str,
        payload: Option<&str>,
    ) -> Result<PlacementEvent, LabError> {
        self.require_task(TaskId::Classification, "drop")?;
        self.board.drop_on_zone(zone, payload)
    }

    /// Drop outside every zone; never changes the board.
    pub fn drop_outside(&mut self) -> Result<PlacementEvent, LabError> {
        self.require_task(TaskId::Classification, "drop")?;
        Ok(self.board.drop_outside())
    }

    /// Returns all cards to the pool and clears marks.
    pub fn reset_placement(&mut self) -> Result<(), LabError> {
        self.require_task(TaskId::Classification, "reset")?;
        self.board.reset();
        Ok(())
    }

    /// Runs a console command, appending to the transcript.
    pub fn run_command(&mut self, index: usize) -> Result<TranscriptEntry, LabError> {
        self.require_task(TaskId::Analysis, "exec")?;
        self.console.run(index)
    }

    /// Selects the architecture answer of the analysis task.
    pub fn set_architecture(&mut self, class: ArchitectureClass) -> Result<(), LabError> {
        self.require_task(TaskId::Analysis, "choose")?;
        self.analysis.architecture = Some(class);
        Ok(())
    }

    /// Replaces the justification text of the analysis task.
    pub fn set_justification(&mut self, text: impl Into<String>) -> Result<(), LabError> {
        self.require_task(TaskId::Analysis, "justify")?;
        self.analysis.justification = text.into();
        Ok(())
    }

    /// Toggles an advantage checkbox. Returns the new checked state.
    pub fn toggle_advantage(
        &mut self,
        group: AdvantageGroup,
        option: &str,
    ) -> Result<bool, LabError> {
        self.require_task(TaskId::Comparison, "mark")?;
        self.comparison.toggle(&self.spec.comparison, group, option)
    }

    /// Matches a scenario to an architecture class.
    pub fn set_scenario(
        &mut self,
        index: usize,
        class: ArchitectureClass,
    ) -> Result<(), LabError> {
        self.require_task(TaskId::Comparison, "match")?;
        self.comparison.set_scenario(index, class)
    }

    /// Replaces the text of a conclusions field.
    pub fn set_conclusion(
        &mut self,
        field: &str,
        text: impl Into<String>,
    ) -> Result<(), LabError> {
        self.require_task(TaskId::Conclusions, "write")?;
        self.conclusions.set(&self.spec.conclusions, field, text.into())
    }

    /// Scores the current task and records the outcome. The recorded
    /// score only ever goes up; the answers always track this attempt.
    pub fn check_task(&mut self, number: u8) -> Result<CheckReport, LabError> {
        let task = TaskId::from_number(number).ok_or(LabError::UnknownTask(number))?;
        self.require_task(task, "check")?;

        let outcome = match task {
            TaskId::Classification => scoring::score_classification(&self.board),
            TaskId::Analysis => scoring::score_analysis(&self.spec.analysis, &self.analysis)?,
            TaskId::Comparison => scoring::score_comparison(&self.spec.comparison, &self.comparison),
            TaskId::Conclusions => {
                scoring::score_conclusions(&self.spec.conclusions, &self.conclusions)
            }
        };
        if let CheckDetail::Classification { marks, .. } = &outcome.detail {
            self.board
                .set_marks(marks.iter().map(|v| (v.zone.clone(), v.mark)));
        }
        let report = self.record(task, outcome);
        tracing::info!(
            %task,
            score = report.score,
            recorded = report.recorded_score,
            "task checked"
        );
        Ok(report)
    }

    /// Ends the session from any task: scores the conclusions from
    /// whatever was typed, stops both clocks and shows the results.
    pub fn finish_lab(&mut self) -> Result<(), LabError> {
        if !matches!(self.phase, Phase::Task(_)) {
            return Err(LabError::WrongPhase {
                action: "finish",
                phase: self.phase,
            });
        }
        self.finish_now();
        Ok(())
    }

    /// Advances the global clock. On expiry the session finishes
    /// itself exactly as an explicit finish would.
    pub fn global_tick(&mut self) -> GlobalTickOutcome {
        match self.global.tick() {
            GlobalTick::Idle => GlobalTickOutcome::Idle,
            GlobalTick::Running { remaining_ms } => GlobalTickOutcome::Running { remaining_ms },
            GlobalTick::Expired => {
                tracing::info!("global time budget exhausted");
                self.finish_now();
                GlobalTickOutcome::Expired
            }
        }
    }

    /// Advances the per-task clock of the current task visit. Ticks
    /// that outlive their visit report as stale and change nothing.
    pub fn task_tick(&mut self) -> TaskTick {
        match self.ticket {
            Some(ticket) => self.task_clocks.tick(ticket),
            None => TaskTick::Stale,
        }
    }

    /// Wipes every trace of the run and returns to the intro screen.
    pub fn restart_lab(&mut self) {
        tracing::info!(session = %self.id, "session restarted");
        self.id = Uuid::new_v4();
        self.phase = Phase::NotStarted;
        self.board = Board::new(&self.spec.classification);
        self.console.reset();
        self.analysis = AnalysisInput::default();
        self.comparison = ComparisonInput::new(&self.spec.comparison);
        self.conclusions = ConclusionsInput::new(&self.spec.conclusions);
        self.results = Self::empty_results();
        self.global.reset();
        self.task_clocks.clear();
        self.ticket = None;
    }

    /// Builds the report payload. Only available on the results screen.
    pub fn generate_report(&self) -> Result<SessionReport, LabError> {
        if self.phase != Phase::Results {
            return Err(LabError::WrongPhase {
                action: "report",
                phase: self.phase,
            });
        }
        let tasks = TaskId::ALL
            .iter()
            .map(|task| TaskReportRow {
                task: *task,
                name: self.spec.task_name(*task).to_owned(),
                score: self.score(*task),
                elapsed_ms: self.task_clocks.captured_ms(*task),
            })
            .collect();
        let essays = match self.results.get(&TaskId::Conclusions).map(|r| &r.answers) {
            Some(TaskAnswers::Conclusions { entries }) => entries
                .iter()
                .filter(|entry| entry.in_report && !entry.text.is_empty())
                .map(|entry| ReportEssay {
                    label: entry.label.clone(),
                    text: entry.text.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(SessionReport {
            id: self.id,
            created_at: Utc::now(),
            lab_id: self.spec.id.clone(),
            title: self.spec.title.clone(),
            tasks,
            overall_score: self.overall_score(),
            duration_ms: self.global.elapsed_ms(),
            essays,
        })
    }

    /// Renders the whole session into a read-only view.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            lab: LabView {
                id: self.spec.id.clone(),
                title: self.spec.title.clone(),
            },
            phase: self.phase,
            current_task: self.current_task(),
            global: GlobalClockView {
                display: format_clock(self.global.remaining_ms()),
                remaining_ms: self.global.remaining_ms(),
                elapsed_ms: self.global.elapsed_ms(),
                progress: self.global.progress(),
                running: self.global.is_running(),
            },
            task_clock: self.task_clocks.active_task().map(|task| {
                let remaining_ms = self.task_clocks.remaining_ms().unwrap_or(0);
                TaskClockView {
                    task,
                    display: format_clock(remaining_ms),
                    remaining_ms,
                }
            }),
            tasks: TaskId::ALL
                .iter()
                .map(|task| TaskStateView {
                    task: *task,
                    number: task.number(),
                    name: self.spec.task_name(*task).to_owned(),
                    score: self.score(*task),
                    completed: self
                        .results
                        .get(task)
                        .map(|r| r.completed)
                        .unwrap_or(false),
                    unlocked: self.score(*task) >= UNLOCK_THRESHOLD,
                })
                .collect(),
            placement: PlacementView {
                pool: self.board.pool_items().into_iter().map(item_view).collect(),
                zones: self
                    .board
                    .zones()
                    .iter()
                    .map(|zone| ZoneView {
                        id: zone.id.clone(),
                        title: zone.title.clone(),
                        items: self
                            .board
                            .items_in(&zone.id)
                            .into_iter()
                            .map(item_view)
                            .collect(),
                        mark: self.board.mark(&zone.id),
                    })
                    .collect(),
                armed: self.board.armed().map(str::to_owned),
            },
            console: ConsoleView {
                commands: self
                    .console
                    .commands()
                    .iter()
                    .zip(self.console.executed())
                    .enumerate()
                    .map(|(index, (command, executed))| CommandView {
                        index,
                        cmd: command.cmd.clone(),
                        description: command.description.clone(),
                        executed: *executed,
                    })
                    .collect(),
                transcript: self.console.transcript().to_vec(),
            },
            analysis: AnalysisView {
                selected: self.analysis.architecture,
                justification: self.analysis.justification.clone(),
            },
            comparison: ComparisonView {
                monolithic: self.option_views(AdvantageGroup::Monolithic),
                microkernel: self.option_views(AdvantageGroup::Microkernel),
                scenarios: self
                    .spec
                    .comparison
                    .scenarios
                    .iter()
                    .zip(self.comparison.scenarios())
                    .enumerate()
                    .map(|(index, (scenario, selected))| ScenarioView {
                        index,
                        prompt: scenario.prompt.clone(),
                        selected: *selected,
                    })
                    .collect(),
            },
            conclusions: self
                .spec
                .conclusions
                .fields
                .iter()
                .zip(self.conclusions.texts())
                .map(|(field, text)| FieldView {
                    id: field.id.clone(),
                    label: field.label.clone(),
                    text: text.clone(),
                })
                .collect(),
        }
    }

    fn option_views(&self, group: AdvantageGroup) -> Vec<OptionView> {
        self.spec
            .comparison
            .options(group)
            .iter()
            .map(|option| OptionView {
                id: option.id.clone(),
                label: option.label.clone(),
                checked: self.comparison.checked(group).contains(&option.id),
            })
            .collect()
    }

    fn navigate(&mut self, target: u8, forward: bool) -> Result<TaskId, LabError> {
        let action = if forward { "next" } else { "prev" };
        let Phase::Task(current) = self.phase else {
            return Err(LabError::WrongPhase {
                action,
                phase: self.phase,
            });
        };
        let to = TaskId::from_number(target).ok_or(LabError::UnknownTask(target))?;
        let expected = if forward { current.next() } else { current.prev() };
        if expected != Some(to) {
            return Err(LabError::InvalidNavigation {
                from: current.number(),
                to: target,
            });
        }
        if forward {
            let score = self.score(current);
            if score < UNLOCK_THRESHOLD {
                return Err(LabError::NavigationLocked {
                    task: current,
                    score,
                    threshold: UNLOCK_THRESHOLD,
                });
            }
        }
        self.task_clocks.halt(current);
        self.enter_task(to);
        Ok(to)
    }

    fn enter_task(&mut self, task: TaskId) {
        tracing::info!(%task, name = self.spec.task_name(task), "entering");
        self.phase = Phase::Task(task);
        self.ticket = Some(
            self.task_clocks
                .begin(task, self.spec.task_budget_ms(task)),
        );
    }

    fn finish_now(&mut self) {
        if let Phase::Task(task) = self.phase {
            self.task_clocks.halt(task);
        }
        self.ticket = None;
        let outcome = scoring::score_conclusions(&self.spec.conclusions, &self.conclusions);
        self.record(TaskId::Conclusions, outcome);
        self.global.stop();
        self.phase = Phase::Results;
        tracing::info!(overall = self.overall_score(), "session finished");
    }

    fn record(&mut self, task: TaskId, outcome: TaskScore) -> CheckReport {
        let entry = self.results.entry(task).or_default();
        entry.completed = true;
        entry.score = entry.score.max(outcome.score);
        entry.answers = outcome.answers;
        CheckReport {
            task,
            score: outcome.score,
            recorded_score: entry.score,
            unlocked: entry.score >= UNLOCK_THRESHOLD,
            passed: outcome.score >= PASS_THRESHOLD,
            detail: outcome.detail,
        }
    }

    fn overall_score(&self) -> u8 {
        let total: u32 = TaskId::ALL.iter().map(|task| u32::from(self.score(*task))).sum();
        (f64::from(total) / TaskId::ALL.len() as f64).round() as u8
    }

    fn require_task(&self, task: TaskId, action: &'static str) -> Result<(), LabError> {
        if self.phase == Phase::Task(task) {
            Ok(())
        } else {
            Err(LabError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn empty_results() -> HashMap<TaskId, TaskResult> {
        TaskId::ALL
            .iter()
            .map(|task| (*task, TaskResult::default()))
            .collect()
    }
}

fn item_view(item: &crate::model::CatalogItem) -> ItemView {
    ItemView {
        id: item.id.clone(),
        name: item.name.clone(),
        description: item.description.clone(),
    }
}
