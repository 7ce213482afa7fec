//! Countdown timers driven by an external tick source.
//!
//! The session owns two clocks: one global countdown over the whole
//! lab and one per-task countdown that restarts on every task entry.
//! Neither clock schedules anything itself; the embedding layer calls
//! `tick` once per [`TICK_MS`] and reacts to the returned outcome.
//! Per-task countdowns hand out a [`TaskTicket`] so that ticks
//! belonging to an abandoned task visit are recognised and dropped.

use std::collections::HashMap;

use crate::model::TaskId;

/// Tick granularity expected by both clocks, in milliseconds.
pub const TICK_MS: u64 = 1_000;

/// Formats milliseconds as `M:SS`, e.g. `15:00` or `0:07`.
pub fn format_clock(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    format!("{minutes}:{seconds:02}")
}

/// Outcome of advancing the global countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalTick {
    /// The clock is not running; nothing advanced.
    Idle,
    /// Time remains on the budget.
    Running { remaining_ms: u64 },
    /// The budget is spent. Reported exactly once; the clock stops.
    Expired,
}

/// Countdown over the whole session.
#[derive(Debug, Clone)]
pub struct GlobalCountdown {
    budget_ms: u64,
    elapsed_ms: u64,
    running: bool,
}

impl GlobalCountdown {
    pub fn new(budget_ms: u64) -> Self {
        Self {
            budget_ms,
            elapsed_ms: 0,
            running: false,
        }
    }

    /// Starts the clock. Idempotent.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops the clock without clearing elapsed time.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns to the initial state with the same budget.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.running = false;
    }

    /// Advances the clock by one tick.
    pub fn tick(&mut self) -> GlobalTick {
        if !self.running {
            return GlobalTick::Idle;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(TICK_MS);
        if self.elapsed_ms >= self.budget_ms {
            self.running = false;
            return GlobalTick::Expired;
        }
        GlobalTick::Running {
            remaining_ms: self.remaining_ms(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.budget_ms.saturating_sub(self.elapsed_ms)
    }

    /// Share of the budget consumed, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.budget_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms as f64 / self.budget_ms as f64).min(1.0)
    }
}

/// Handle to one task visit's countdown. Ticks presented with a stale
/// ticket (the visit ended or another one began) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTicket {
    generation: u64,
}

/// Outcome of advancing a per-task countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTick {
    /// The ticket no longer addresses the live countdown.
    Stale,
    /// Time remains on the task budget.
    Running { remaining_ms: u64 },
    /// The task budget is spent. The display floors at `0:00`; the
    /// session keeps going and elapsed time keeps accruing.
    Floor,
}

#[derive(Debug, Clone)]
struct ActiveCountdown {
    task: TaskId,
    budget_ms: u64,
    elapsed_ms: u64,
    generation: u64,
}

/// Per-task countdowns plus the recorded time of finished visits.
///
/// At most one countdown is live at a time. `begin` supersedes any
/// previous countdown and invalidates its tickets; `halt` captures the
/// elapsed time for reporting, overwriting what an earlier visit to
/// the same task recorded.
#[derive(Debug, Clone, Default)]
pub struct TaskCountdowns {
    active: Option<ActiveCountdown>,
    last_generation: u64,
    captured_ms: HashMap<TaskId, u64>,
}

impl TaskCountdowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a countdown for a fresh visit to `task`.
    pub fn begin(&mut self, task: TaskId, budget_ms: u64) -> TaskTicket {
        self.last_generation += 1;
        self.active = Some(ActiveCountdown {
            task,
            budget_ms,
            elapsed_ms: 0,
            generation: self.last_generation,
        });
        TaskTicket {
            generation: self.last_generation,
        }
    }

    /// Advances the countdown addressed by `ticket` by one tick.
    pub fn tick(&mut self, ticket: TaskTicket) -> TaskTick {
        let Some(active) = self.active.as_mut() else {
            return TaskTick::Stale;
        };
        if active.generation != ticket.generation {
            return TaskTick::Stale;
        }
        active.elapsed_ms = active.elapsed_ms.saturating_add(TICK_MS);
        if active.elapsed_ms >= active.budget_ms {
            TaskTick::Floor
        } else {
            TaskTick::Running {
                remaining_ms: active.budget_ms - active.elapsed_ms,
            }
        }
    }

    /// Ends the live countdown for `task` and records its elapsed time.
    ///
    /// Returns the captured elapsed milliseconds. If the live countdown
    /// belongs to a different task nothing is recorded.
    pub fn halt(&mut self, task: TaskId) -> u64 {
        match &self.active {
            Some(active) if active.task == task => {
                let elapsed = active.elapsed_ms;
                self.captured_ms.insert(task, elapsed);
                self.active = None;
                elapsed
            }
            _ => {
                tracing::debug!(%task, "halt without a live countdown for it");
                self.captured_ms.get(&task).copied().unwrap_or(0)
            }
        }
    }

    /// Elapsed time recorded for the most recent finished visit.
    pub fn captured_ms(&self, task: TaskId) -> u64 {
        self.captured_ms.get(&task).copied().unwrap_or(0)
    }

    /// Task of the live countdown, if one is running.
    pub fn active_task(&self) -> Option<TaskId> {
        self.active.as_ref().map(|a| a.task)
    }

    /// Remaining time on the live countdown, floored at zero.
    pub fn remaining_ms(&self) -> Option<u64> {
        self.active
            .as_ref()
            .map(|a| a.budget_ms.saturating_sub(a.elapsed_ms))
    }

    /// Drops the live countdown and all recorded times. Previously
    /// issued tickets stay stale forever.
    pub fn clear(&mut self) {
        self.active = None;
        self.captured_ms.clear();
    }
}
