//! Scoring rubrics for the four tasks.
//!
//! All scorers are pure: they read the task state and produce a
//! percentage plus a breakdown, mutating nothing. Checking twice with
//! the same inputs gives the same score. Length thresholds count
//! characters of the trimmed text, a deliberately crude proxy for
//! substance.

use serde::Serialize;

use crate::error::LabError;
use crate::inputs::{AnalysisInput, ComparisonInput, ConclusionsInput};
use crate::model::{AdvantageGroup, AnalysisSpec, ComparisonSpec, ConclusionsSpec, ZoneMark};
use crate::placement::Board;
use crate::results::{ConclusionEntry, TaskAnswers};

/// Minimum score that unlocks the next task.
pub const UNLOCK_THRESHOLD: u8 = 60;

/// Score treated as fully passing in feedback.
pub const PASS_THRESHOLD: u8 = 80;

/// Outcome of scoring one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskScore {
    pub score: u8,
    pub answers: TaskAnswers,
    pub detail: CheckDetail,
}

/// Verdict for one zone after a classification check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneVerdict {
    pub zone: String,
    pub mark: ZoneMark,
}

/// Per-task breakdown surfaced in check feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CheckDetail {
    Classification {
        correct: u32,
        placed: u32,
        /// Verdicts only for zones that hold at least one card.
        marks: Vec<ZoneVerdict>,
    },
    Analysis {
        architecture_correct: bool,
        justification_substantive: bool,
    },
    Comparison {
        monolithic_hits: u32,
        monolithic_expected: u32,
        microkernel_hits: u32,
        microkernel_expected: u32,
        scenario_hits: u32,
        scenario_count: u32,
    },
    Conclusions {
        substantive: u32,
        fields: u32,
    },
}

/// Scores the classification board: the share of placed cards sitting
/// in a zone of their own class. Cards still in the pool do not count
/// against the score; an empty board scores zero.
pub fn score_classification(board: &Board) -> TaskScore {
    let mut correct = 0u32;
    let mut placed = 0u32;
    let mut marks = Vec::new();

    for zone in board.zones() {
        let cards = board.items_in(&zone.id);
        if cards.is_empty() {
            continue;
        }
        let mut zone_correct = true;
        for card in &cards {
            placed += 1;
            if card.class == zone.expected {
                correct += 1;
            } else {
                zone_correct = false;
            }
        }
        marks.push(ZoneVerdict {
            zone: zone.id.clone(),
            mark: if zone_correct {
                ZoneMark::Correct
            } else {
                ZoneMark::Incorrect
            },
        });
    }

    let score = if placed > 0 {
        percentage(correct, placed)
    } else {
        0
    };
    TaskScore {
        score,
        answers: TaskAnswers::Classification { correct, placed },
        detail: CheckDetail::Classification {
            correct,
            placed,
            marks,
        },
    }
}

/// Scores the analysis task: half for the right architecture, half
/// for a justification longer than the configured threshold. Checking
/// with either input missing is a validation error, not a zero.
pub fn score_analysis(
    spec: &AnalysisSpec,
    input: &AnalysisInput,
) -> Result<TaskScore, LabError> {
    let justification = input.justification.trim();
    let Some(architecture) = input.architecture else {
        return Err(LabError::MissingAnalysisInput);
    };
    if justification.is_empty() {
        return Err(LabError::MissingAnalysisInput);
    }

    let architecture_correct = architecture == spec.correct;
    let justification_substantive =
        justification.chars().count() > spec.min_justification_chars;

    let mut score = 0u8;
    if architecture_correct {
        score += 50;
    }
    if justification_substantive {
        score += 50;
    }

    Ok(TaskScore {
        score,
        answers: TaskAnswers::Analysis {
            architecture,
            justification: justification.to_owned(),
        },
        detail: CheckDetail::Analysis {
            architecture_correct,
            justification_substantive,
        },
    })
}

/// Scores the comparison task: 20 points per advantage group scaled
/// by the hit rate, plus 20 points per correctly matched scenario.
/// Checking a distractor neither earns nor costs points.
pub fn score_comparison(spec: &ComparisonSpec, input: &ComparisonInput) -> TaskScore {
    let (monolithic_hits, monolithic_expected) =
        group_hits(spec, input, AdvantageGroup::Monolithic);
    let (microkernel_hits, microkernel_expected) =
        group_hits(spec, input, AdvantageGroup::Microkernel);

    let scenario_hits = spec
        .scenarios
        .iter()
        .zip(input.scenarios())
        .filter(|(scenario, pick)| **pick == Some(scenario.expected))
        .count() as u32;

    let raw = 20.0 * f64::from(monolithic_hits) / f64::from(monolithic_expected.max(1))
        + 20.0 * f64::from(microkernel_hits) / f64::from(microkernel_expected.max(1))
        + 20.0 * f64::from(scenario_hits);
    let score = (raw.round() as u32).min(100) as u8;

    TaskScore {
        score,
        answers: TaskAnswers::Comparison {
            monolithic: input
                .checked(AdvantageGroup::Monolithic)
                .iter()
                .cloned()
                .collect(),
            microkernel: input
                .checked(AdvantageGroup::Microkernel)
                .iter()
                .cloned()
                .collect(),
            scenarios: input.scenarios().to_vec(),
        },
        detail: CheckDetail::Comparison {
            monolithic_hits,
            monolithic_expected,
            microkernel_hits,
            microkernel_expected,
            scenario_hits,
            scenario_count: spec.scenarios.len() as u32,
        },
    }
}

/// Scores the conclusions task: 25 points per field whose trimmed
/// text exceeds the configured length, capped at 100.
pub fn score_conclusions(spec: &ConclusionsSpec, input: &ConclusionsInput) -> TaskScore {
    let entries: Vec<ConclusionEntry> = spec
        .fields
        .iter()
        .zip(input.texts())
        .map(|(field, text)| ConclusionEntry {
            id: field.id.clone(),
            label: field.label.clone(),
            text: text.trim().to_owned(),
            in_report: field.in_report,
        })
        .collect();

    let substantive = entries
        .iter()
        .filter(|entry| entry.text.chars().count() > spec.min_field_chars)
        .count() as u32;
    let score = (25 * substantive).min(100) as u8;

    TaskScore {
        score,
        answers: TaskAnswers::Conclusions { entries },
        detail: CheckDetail::Conclusions {
            substantive,
            fields: spec.fields.len() as u32,
        },
    }
}

fn group_hits(
    spec: &ComparisonSpec,
    input: &ComparisonInput,
    group: AdvantageGroup,
) -> (u32, u32) {
    let correct = spec.correct(group);
    let hits = input
        .checked(group)
        .iter()
        .filter(|id| correct.contains(id))
        .count() as u32;
    (hits, correct.len() as u32)
}

fn percentage(part: u32, whole: u32) -> u8 {
    (f64::from(part) / f64::from(whole) * 100.0).round() as u8
}
