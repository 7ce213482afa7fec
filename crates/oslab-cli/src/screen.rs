//! Text rendering for the interactive session.
//!
//! Everything here turns snapshots and check feedback into the blocks
//! of text the run loop prints; no session state is touched.

use std::fmt::Write as _;

use comfy_table::{Cell, Table};

use oslab_core::model::TaskId;
use oslab_core::placement::PlacementEvent;
use oslab_core::results::SessionReport;
use oslab_core::scoring::{CheckDetail, PASS_THRESHOLD, UNLOCK_THRESHOLD};
use oslab_core::session::CheckReport;
use oslab_core::snapshot::SessionSnapshot;
use oslab_core::timer::format_clock;

/// Intro screen shown before `start` and after `restart`.
pub fn welcome(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.lab.title);
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(
        out,
        "Four tasks, {} on the shared clock. Score {UNLOCK_THRESHOLD}% or better",
        snapshot.global.display
    );
    let _ = writeln!(
        out,
        "on a task to unlock the next one; {PASS_THRESHOLD}% counts as a pass."
    );
    let _ = writeln!(out);
    for task in &snapshot.tasks {
        let _ = writeln!(out, "  {}. {}", task.number, task.name);
    }
    let _ = writeln!(out);
    let _ = write!(out, "Type 'start' to begin, 'help' for commands.");
    out
}

/// Current task screen.
pub fn task(snapshot: &SessionSnapshot) -> String {
    let Some(current) = snapshot.current_task else {
        return welcome(snapshot);
    };
    let mut out = String::new();
    let name = snapshot
        .tasks
        .iter()
        .find(|t| t.task == current)
        .map(|t| t.name.as_str())
        .unwrap_or("");
    let _ = writeln!(
        out,
        "== Task {} of {}: {} ==",
        current.number(),
        snapshot.tasks.len(),
        name
    );
    let task_display = snapshot
        .task_clock
        .as_ref()
        .map(|clock| clock.display.clone())
        .unwrap_or_else(|| "-".into());
    let _ = writeln!(
        out,
        "Task time {} | Total {} {}",
        task_display,
        snapshot.global.display,
        progress_bar(snapshot.global.progress)
    );
    let _ = writeln!(out);

    match current {
        TaskId::Classification => render_classification(&mut out, snapshot),
        TaskId::Analysis => render_analysis(&mut out, snapshot),
        TaskId::Comparison => render_comparison(&mut out, snapshot),
        TaskId::Conclusions => render_conclusions(&mut out, snapshot),
    }
    out
}

/// Results screen: the score table plus follow-up hints.
pub fn results(report: &SessionReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Task", "Score", "Time"]);
    for row in &report.tasks {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(format!("{}%", row.score)),
            Cell::new(format_clock(row.elapsed_ms)),
        ]);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{table}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall result: {}%", report.overall_score);
    let _ = writeln!(out, "Total time: {}", format_clock(report.duration_ms));
    let _ = write!(
        out,
        "Type 'report' to save the report, 'restart' to try again."
    );
    out
}

/// Feedback line(s) for a check, in the tone of the original grader.
pub fn feedback(check: &CheckReport) -> String {
    let mut out = match &check.detail {
        CheckDetail::Classification {
            correct, placed, ..
        } => format!(
            "Result: {}/{} correct answers ({}%)",
            correct, placed, check.score
        ),
        CheckDetail::Analysis { .. } => format!(
            "Result: {}% - {}",
            check.score,
            if check.passed { "Good!" } else { "Needs improvement" }
        ),
        CheckDetail::Comparison { .. } => format!(
            "Result: {}% - {}",
            check.score,
            if check.passed {
                "Excellent!"
            } else {
                "Needs improvement"
            }
        ),
        CheckDetail::Conclusions { substantive, fields } => format!(
            "Result: {}% ({}/{} substantive fields)",
            check.score, substantive, fields
        ),
    };
    if check.task == TaskId::Conclusions {
        out.push_str("\nType 'finish' to wrap up the lab.");
    } else if check.unlocked {
        out.push_str("\nNext task unlocked - type 'next'.");
    } else {
        let _ = write!(
            out,
            "\nScore at least {UNLOCK_THRESHOLD}% to unlock the next task."
        );
    }
    out
}

/// One-line echo of what a placement action did.
pub fn event_line(event: &PlacementEvent) -> String {
    match event {
        PlacementEvent::Armed { item } => {
            format!("{item} armed - type 'put <zone>' to place it")
        }
        PlacementEvent::Disarmed { item } => format!("{item} disarmed"),
        PlacementEvent::Switched { from, to } => {
            format!("armed card switched from {from} to {to}")
        }
        PlacementEvent::Placed { item, zone } => format!("{item} placed in {zone}"),
        PlacementEvent::Ignored => "nothing happened".into(),
    }
}

pub fn help() -> &'static str {
    "Commands:
  start                  begin the lab
  status                 redraw the current screen
  check                  score the current task
  next / prev            move between tasks
  finish                 end the lab and show results
  report                 save the report files
  restart                wipe the session and start over
  quit                   leave

Task 1: pick <card> [zone], put <zone>, move <card> <zone>,
        drop <zone> [card], cancel, reset
Task 2: exec <n>, choose <class>, justify <text>
Task 3: mark <mono|micro> <option>, match <n> <class>
Task 4: write <field> <text>"
}

fn render_classification(out: &mut String, snapshot: &SessionSnapshot) {
    let placement = &snapshot.placement;
    let _ = writeln!(out, "Cards in the pool:");
    if placement.pool.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for item in &placement.pool {
        let _ = writeln!(out, "  {:<12} {} - {}", item.id, item.name, item.description);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Zones:");
    for zone in &placement.zones {
        let contents = if zone.items.is_empty() {
            "(empty)".to_string()
        } else {
            zone.items
                .iter()
                .map(|item| item.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mark = match zone.mark {
            Some(oslab_core::model::ZoneMark::Correct) => " [correct]",
            Some(oslab_core::model::ZoneMark::Incorrect) => " [wrong]",
            None => "",
        };
        let _ = writeln!(out, "  {:<12} {}: {}{}", zone.id, zone.title, contents, mark);
    }
    if let Some(armed) = &placement.armed {
        let _ = writeln!(out);
        let _ = writeln!(out, "Armed card: {armed}");
    }
    let _ = writeln!(out);
    let _ = write!(
        out,
        "Commands: pick <card> [zone], put <zone>, move <card> <zone>, reset, check, next"
    );
}

fn render_analysis(out: &mut String, snapshot: &SessionSnapshot) {
    let console = &snapshot.console;
    let _ = writeln!(out, "Console commands:");
    for command in &console.commands {
        let done = if command.executed { " (run)" } else { "" };
        let _ = writeln!(
            out,
            "  {}) {:<20} {}{}",
            command.index + 1,
            command.cmd,
            command.description,
            done
        );
    }
    if !console.transcript.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Transcript:");
        for entry in &console.transcript {
            let _ = writeln!(out, "{} {}", oslab_core::console::PROMPT, entry.cmd);
            let _ = writeln!(out, "{}", entry.output);
        }
    }
    let _ = writeln!(out);
    let answer = snapshot
        .analysis
        .selected
        .map(|class| class.label().to_string())
        .unwrap_or_else(|| "(not chosen)".into());
    let _ = writeln!(out, "Your answer: {answer}");
    let _ = writeln!(
        out,
        "Justification: {} characters",
        snapshot.analysis.justification.trim().chars().count()
    );
    let _ = writeln!(out);
    let _ = write!(
        out,
        "Commands: exec <n>, choose <monolithic|microkernel|hybrid>, justify <text>, check, prev, next"
    );
}

fn render_comparison(out: &mut String, snapshot: &SessionSnapshot) {
    let comparison = &snapshot.comparison;
    let _ = writeln!(out, "Monolithic advantages:");
    for option in &comparison.monolithic {
        let checked = if option.checked { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {:<14} {}", checked, option.id, option.label);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Microkernel advantages:");
    for option in &comparison.microkernel {
        let checked = if option.checked { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {:<14} {}", checked, option.id, option.label);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Scenarios:");
    for scenario in &comparison.scenarios {
        let pick = scenario
            .selected
            .map(|class| class.to_string())
            .unwrap_or_else(|| "(not matched)".into());
        let _ = writeln!(out, "  {}) {} -> {}", scenario.index + 1, scenario.prompt, pick);
    }
    let _ = writeln!(out);
    let _ = write!(
        out,
        "Commands: mark <mono|micro> <option>, match <n> <class>, check, prev, next"
    );
}

fn render_conclusions(out: &mut String, snapshot: &SessionSnapshot) {
    let _ = writeln!(out, "Conclusion fields:");
    for field in &snapshot.conclusions {
        let filled = field.text.trim().chars().count();
        let state = if filled == 0 {
            "(empty)".to_string()
        } else {
            format!("({filled} characters)")
        };
        let _ = writeln!(out, "  {:<18} {} {}", field.id, field.label, state);
    }
    let _ = writeln!(out);
    let _ = write!(out, "Commands: write <field> <text>, check, prev, finish");
}

fn progress_bar(progress: f64) -> String {
    let cells = 20usize;
    let filled = (progress * cells as f64).round() as usize;
    let filled = filled.min(cells);
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        "-".repeat(cells - filled),
        progress * 100.0
    )
}
