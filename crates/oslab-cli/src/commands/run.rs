//! The `oslab run` command: the interactive session loop.
//!
//! Reads line commands from stdin and drives a [`LabSession`], while a
//! one-second ticker advances both countdowns. The ticker starts one
//! period in the future, so scripted input that finishes quickly never
//! races a tick.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncBufReadExt;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use oslab_core::console::PROMPT;
use oslab_core::error::LabError;
use oslab_core::model::{AdvantageGroup, ArchitectureClass};
use oslab_core::parser;
use oslab_core::session::{GlobalTickOutcome, LabSession, Phase};
use oslab_core::timer::TICK_MS;
use oslab_report::text::{write_text_report, DEFAULT_REPORT_FILENAME};

use crate::screen;

const JSON_REPORT_FILENAME: &str = "os_architecture_lab_report.json";

enum Flow {
    Continue,
    Quit,
}

pub async fn execute(lab: Option<PathBuf>, output: PathBuf, format: String) -> Result<()> {
    let spec = match &lab {
        Some(path) => parser::parse_lab(path)?,
        None => parser::builtin_lab()?,
    };
    for warning in parser::validate_lab(&spec) {
        tracing::warn!(%warning, "lab definition");
    }

    let mut session = LabSession::new(spec);
    println!("{}", screen::welcome(&session.snapshot()));

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let period = Duration::from_millis(TICK_MS);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match handle_line(&mut session, line.trim(), &output, &format) {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
            _ = ticker.tick() => {
                if session.global_tick() == GlobalTickOutcome::Expired {
                    println!();
                    println!("Time is up! The session finished itself.");
                    print_results(&session);
                }
                session.task_tick();
            }
        }
    }

    Ok(())
}

fn handle_line(session: &mut LabSession, line: &str, output: &Path, format: &str) -> Flow {
    if line.is_empty() {
        return Flow::Continue;
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "quit" | "exit" => return Flow::Quit,
        "help" | "?" => println!("{}", screen::help()),

        "start" => match session.start_lab() {
            Ok(()) => println!("{}", screen::task(&session.snapshot())),
            Err(e) => report_error(&e),
        },
        "status" => print_status(session),
        "next" => move_between_tasks(session, true),
        "prev" => move_between_tasks(session, false),
        "check" => match session.current_task() {
            Some(task) => match session.check_task(task.number()) {
                Ok(report) => println!("{}", screen::feedback(&report)),
                Err(e) => report_error(&e),
            },
            None => report_error(&LabError::WrongPhase {
                action: "check",
                phase: session.phase(),
            }),
        },
        "finish" => match session.finish_lab() {
            Ok(()) => print_results(session),
            Err(e) => report_error(&e),
        },
        "restart" => {
            session.restart_lab();
            println!("{}", screen::welcome(&session.snapshot()));
        }
        "report" => {
            if let Err(e) = write_reports(session, output, format) {
                println!("error: {e:#}");
            }
        }

        "pick" => {
            let mut args = rest.split_whitespace();
            match args.next() {
                Some(item) => print_event(session.arm_or_place(item, args.next())),
                None => usage("pick <card> [zone]"),
            }
        }
        "put" => match rest.split_whitespace().next() {
            Some(zone) => print_event(session.zone_click(zone)),
            None => usage("put <zone>"),
        },
        "move" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next()) {
                (Some(item), Some(zone)) => print_event(
                    session
                        .drag_start(item)
                        .and_then(|_| session.drop_on_zone(zone, None)),
                ),
                _ => usage("move <card> <zone>"),
            }
        }
        "drag" => match rest.split_whitespace().next() {
            Some(item) => print_event(session.drag_start(item)),
            None => usage("drag <card>"),
        },
        "drop" => {
            let mut args = rest.split_whitespace();
            match args.next() {
                Some(zone) => print_event(session.drop_on_zone(zone, args.next())),
                None => usage("drop <zone> [card]"),
            }
        }
        "cancel" => print_event(session.drop_outside()),
        "reset" => match session.reset_placement() {
            Ok(()) => println!("All cards returned to the pool."),
            Err(e) => report_error(&e),
        },

        "exec" => match rest.split_whitespace().next().and_then(|s| s.parse::<usize>().ok()) {
            Some(n) if n >= 1 => match session.run_command(n - 1) {
                Ok(entry) => {
                    println!("{PROMPT} {}", entry.cmd);
                    println!("{}", entry.output);
                }
                Err(LabError::UnknownCommand(_)) => println!("error: no command number {n}"),
                Err(e) => report_error(&e),
            },
            _ => usage("exec <n>"),
        },
        "choose" => match rest.split_whitespace().next() {
            Some(token) => match token.parse::<ArchitectureClass>() {
                Ok(class) => match session.set_architecture(class) {
                    Ok(()) => println!("Answer recorded: {}", class.label()),
                    Err(e) => report_error(&e),
                },
                Err(msg) => println!("error: {msg}"),
            },
            None => usage("choose <monolithic|microkernel|hybrid>"),
        },
        "justify" => {
            if rest.is_empty() {
                usage("justify <text>");
            } else {
                match session.set_justification(rest) {
                    Ok(()) => {
                        println!("Justification recorded ({} characters)", rest.chars().count())
                    }
                    Err(e) => report_error(&e),
                }
            }
        }

        "mark" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next()) {
                (Some(group), Some(option)) => match group.parse::<AdvantageGroup>() {
                    Ok(group) => match session.toggle_advantage(group, option) {
                        Ok(true) => println!("{option} checked"),
                        Ok(false) => println!("{option} unchecked"),
                        Err(e) => report_error(&e),
                    },
                    Err(msg) => println!("error: {msg}"),
                },
                _ => usage("mark <mono|micro> <option>"),
            }
        }
        "match" => {
            let mut args = rest.split_whitespace();
            let index = args.next().and_then(|s| s.parse::<usize>().ok());
            match (index, args.next()) {
                (Some(n), Some(class)) if n >= 1 => match class.parse::<ArchitectureClass>() {
                    Ok(class) => match session.set_scenario(n - 1, class) {
                        Ok(()) => println!("Scenario {n} matched to {class}"),
                        Err(LabError::UnknownScenario(_)) => {
                            println!("error: no scenario number {n}")
                        }
                        Err(e) => report_error(&e),
                    },
                    Err(msg) => println!("error: {msg}"),
                },
                _ => usage("match <n> <class>"),
            }
        }

        "write" => {
            let (field, text) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            let text = text.trim();
            if field.is_empty() || text.is_empty() {
                usage("write <field> <text>");
            } else {
                match session.set_conclusion(field, text) {
                    Ok(()) => {
                        println!("{field} recorded ({} characters)", text.chars().count())
                    }
                    Err(e) => report_error(&e),
                }
            }
        }

        other => println!("Unknown command: '{other}' - type 'help' for the list."),
    }
    Flow::Continue
}

/// `next`/`prev` address the adjacent task; at either end there is no
/// adjacent task and the session stays put.
fn move_between_tasks(session: &mut LabSession, forward: bool) {
    let Some(current) = session.current_task() else {
        report_error(&LabError::WrongPhase {
            action: if forward { "next" } else { "prev" },
            phase: session.phase(),
        });
        return;
    };
    let adjacent = if forward { current.next() } else { current.prev() };
    let Some(target) = adjacent else {
        if forward {
            println!("This is the last task - type 'finish' to end the lab.");
        } else {
            println!("This is the first task.");
        }
        return;
    };
    let moved = if forward {
        session.next_task(target.number())
    } else {
        session.prev_task(target.number())
    };
    match moved {
        Ok(_) => println!("{}", screen::task(&session.snapshot())),
        Err(e) => report_error(&e),
    }
}

fn print_status(session: &LabSession) {
    match session.phase() {
        Phase::NotStarted => println!("{}", screen::welcome(&session.snapshot())),
        Phase::Task(_) => println!("{}", screen::task(&session.snapshot())),
        Phase::Results => print_results(session),
    }
}

fn print_results(session: &LabSession) {
    match session.generate_report() {
        Ok(report) => println!("{}", screen::results(&report)),
        Err(e) => report_error(&e),
    }
}

fn print_event(event: Result<oslab_core::placement::PlacementEvent, LabError>) {
    match event {
        Ok(event) => println!("{}", screen::event_line(&event)),
        Err(e) => report_error(&e),
    }
}

/// Validation errors read as coaching; everything else as an error.
fn report_error(err: &LabError) {
    if err.is_validation() {
        println!("(!) {err}");
    } else {
        println!("error: {err}");
    }
}

fn usage(usage: &str) {
    println!("usage: {usage}");
}

fn write_reports(session: &LabSession, output: &Path, format: &str) -> Result<()> {
    let report = session.generate_report()?;
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    let formats: Vec<&str> = if format == "all" {
        vec!["text", "json"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "text" => {
                let path = output.join(DEFAULT_REPORT_FILENAME);
                write_text_report(&report, &path)?;
                println!("Report saved to: {}", path.display());
            }
            "json" => {
                let path = output.join(JSON_REPORT_FILENAME);
                report.save_json(&path)?;
                println!("Report saved to: {}", path.display());
            }
            other => println!("Unknown format: {other}"),
        }
    }
    Ok(())
}
