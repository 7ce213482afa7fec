//! Recorded task outcomes and the end-of-session report payload.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ArchitectureClass, TaskId};

/// Captured answers of one task, as of its latest check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TaskAnswers {
    /// The task has not been checked yet.
    Empty,
    Classification {
        correct: u32,
        placed: u32,
    },
    Analysis {
        architecture: ArchitectureClass,
        justification: String,
    },
    Comparison {
        monolithic: Vec<String>,
        microkernel: Vec<String>,
        scenarios: Vec<Option<ArchitectureClass>>,
    },
    Conclusions {
        entries: Vec<ConclusionEntry>,
    },
}

/// One essay field with the text the learner left in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConclusionEntry {
    pub id: String,
    pub label: String,
    pub text: String,
    pub in_report: bool,
}

/// Per-task outcome tracked by the session. The score never goes
/// down: a weaker re-check keeps the best recorded score while the
/// answers reflect the latest attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub completed: bool,
    pub score: u8,
    pub answers: TaskAnswers,
}

impl Default for TaskResult {
    fn default() -> Self {
        Self {
            completed: false,
            score: 0,
            answers: TaskAnswers::Empty,
        }
    }
}

/// One row of the report's score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReportRow {
    pub task: TaskId,
    pub name: String,
    pub score: u8,
    pub elapsed_ms: u64,
}

/// An essay included in the report's detailed answers section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEssay {
    pub label: String,
    pub text: String,
}

/// Everything the report renderers need, detached from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub lab_id: String,
    pub title: String,
    pub tasks: Vec<TaskReportRow>,
    pub overall_score: u8,
    pub duration_ms: u64,
    pub essays: Vec<ReportEssay>,
}

impl SessionReport {
    /// Writes the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Reads a report previously written by [`SessionReport::save_json`].
    pub fn load_json(path: &Path) -> Result<SessionReport> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse report: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_results_are_empty() {
        let result = TaskResult::default();
        assert!(!result.completed);
        assert_eq!(result.score, 0);
        assert_eq!(result.answers, TaskAnswers::Empty);
    }

    #[test]
    fn answers_serialize_with_a_kind_tag() {
        let answers = TaskAnswers::Analysis {
            architecture: ArchitectureClass::Monolithic,
            justification: "modules load into one address space".into(),
        };
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json["kind"], "analysis");
        assert_eq!(json["architecture"], "monolithic");
    }

    #[test]
    fn report_json_round_trips() {
        let report = SessionReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            lab_id: "os-architectures".into(),
            title: "Practical work report: OS architecture approaches".into(),
            tasks: vec![TaskReportRow {
                task: TaskId::Classification,
                name: "OS classification".into(),
                score: 80,
                elapsed_ms: 61_000,
            }],
            overall_score: 80,
            duration_ms: 120_000,
            essays: vec![ReportEssay {
                label: "Main conclusions".into(),
                text: "Monolithic kernels trade isolation for speed.".into(),
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn loading_a_missing_report_names_the_path() {
        let err = SessionReport::load_json(Path::new("/nope/report.json")).unwrap_err();
        assert!(err.to_string().contains("/nope/report.json"));
    }
}
