//! Data model for lab definitions.
//!
//! A [`LabSpec`] describes everything a session needs: the four tasks,
//! their time budgets, the catalog of operating systems to classify,
//! the simulated console commands, the comparison options and the
//! essay fields. Definitions are loaded from TOML by the `parser`
//! module; a built-in lab ships with the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kernel architecture class used throughout the lab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureClass {
    Monolithic,
    Microkernel,
    Hybrid,
}

impl ArchitectureClass {
    /// All classes, in the order they are offered to the learner.
    pub const ALL: [ArchitectureClass; 3] = [
        ArchitectureClass::Monolithic,
        ArchitectureClass::Microkernel,
        ArchitectureClass::Hybrid,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ArchitectureClass::Monolithic => "Monolithic",
            ArchitectureClass::Microkernel => "Microkernel",
            ArchitectureClass::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for ArchitectureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchitectureClass::Monolithic => write!(f, "monolithic"),
            ArchitectureClass::Microkernel => write!(f, "microkernel"),
            ArchitectureClass::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for ArchitectureClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monolithic" | "mono" => Ok(ArchitectureClass::Monolithic),
            "microkernel" | "micro" => Ok(ArchitectureClass::Microkernel),
            "hybrid" => Ok(ArchitectureClass::Hybrid),
            _ => Err(format!("unknown architecture class: {s}")),
        }
    }
}

/// The two advantage groups compared in the third task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvantageGroup {
    Monolithic,
    Microkernel,
}

impl fmt::Display for AdvantageGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvantageGroup::Monolithic => write!(f, "monolithic"),
            AdvantageGroup::Microkernel => write!(f, "microkernel"),
        }
    }
}

impl FromStr for AdvantageGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monolithic" | "mono" => Ok(AdvantageGroup::Monolithic),
            "microkernel" | "micro" => Ok(AdvantageGroup::Microkernel),
            _ => Err(format!("unknown advantage group: {s}")),
        }
    }
}

/// Identifier for one of the four fixed tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskId {
    Classification,
    Analysis,
    Comparison,
    Conclusions,
}

impl TaskId {
    /// All tasks, in lab order.
    pub const ALL: [TaskId; 4] = [
        TaskId::Classification,
        TaskId::Analysis,
        TaskId::Comparison,
        TaskId::Conclusions,
    ];

    /// 1-based task number as shown to the learner.
    pub fn number(&self) -> u8 {
        match self {
            TaskId::Classification => 1,
            TaskId::Analysis => 2,
            TaskId::Comparison => 3,
            TaskId::Conclusions => 4,
        }
    }

    /// Looks a task up by its 1-based number.
    pub fn from_number(n: u8) -> Option<TaskId> {
        match n {
            1 => Some(TaskId::Classification),
            2 => Some(TaskId::Analysis),
            3 => Some(TaskId::Comparison),
            4 => Some(TaskId::Conclusions),
            _ => None,
        }
    }

    /// The task after this one, if any.
    pub fn next(&self) -> Option<TaskId> {
        TaskId::from_number(self.number() + 1)
    }

    /// The task before this one, if any.
    pub fn prev(&self) -> Option<TaskId> {
        self.number().checked_sub(1).and_then(TaskId::from_number)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {}", self.number())
    }
}

/// Correctness mark attached to a drop zone after a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneMark {
    Correct,
    Incorrect,
}

/// An operating system card in the classification catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub class: ArchitectureClass,
    pub description: String,
}

/// A drop zone accepting cards of one architecture class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub title: String,
    pub expected: ArchitectureClass,
}

/// A canned command offered by the simulated console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleCommand {
    pub cmd: String,
    pub description: String,
    pub sample_output: String,
}

/// A checkbox option in one of the comparison groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
}

/// A usage scenario the learner matches to an architecture class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub prompt: String,
    pub expected: ArchitectureClass,
}

/// A free-text field in the conclusions task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayField {
    pub id: String,
    pub label: String,
    /// Whether the field's text is copied into the downloadable report.
    pub in_report: bool,
}

/// First task: drag OS cards into architecture zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSpec {
    pub name: String,
    pub budget_ms: u64,
    pub items: Vec<CatalogItem>,
    pub zones: Vec<Zone>,
}

/// Second task: inspect console output and identify the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSpec {
    pub name: String,
    pub budget_ms: u64,
    pub correct: ArchitectureClass,
    /// Justifications at or below this many characters score no credit.
    pub min_justification_chars: usize,
    pub commands: Vec<ConsoleCommand>,
}

/// Third task: pick true advantages and match scenarios to classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSpec {
    pub name: String,
    pub budget_ms: u64,
    pub monolithic_options: Vec<ChoiceOption>,
    pub monolithic_correct: Vec<String>,
    pub microkernel_options: Vec<ChoiceOption>,
    pub microkernel_correct: Vec<String>,
    pub scenarios: Vec<Scenario>,
}

impl ComparisonSpec {
    /// Options offered for the given group.
    pub fn options(&self, group: AdvantageGroup) -> &[ChoiceOption] {
        match group {
            AdvantageGroup::Monolithic => &self.monolithic_options,
            AdvantageGroup::Microkernel => &self.microkernel_options,
        }
    }

    /// Correct option ids for the given group.
    pub fn correct(&self, group: AdvantageGroup) -> &[String] {
        match group {
            AdvantageGroup::Monolithic => &self.monolithic_correct,
            AdvantageGroup::Microkernel => &self.microkernel_correct,
        }
    }
}

/// Fourth task: write up conclusions in free-text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConclusionsSpec {
    pub name: String,
    pub budget_ms: u64,
    /// Entries at or below this many characters are not substantive.
    pub min_field_chars: usize,
    pub fields: Vec<EssayField>,
}

/// A complete lab definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabSpec {
    pub id: String,
    /// Heading used on screen and at the top of the report.
    pub title: String,
    pub global_budget_ms: u64,
    pub classification: ClassificationSpec,
    pub analysis: AnalysisSpec,
    pub comparison: ComparisonSpec,
    pub conclusions: ConclusionsSpec,
}

impl LabSpec {
    /// Display name of a task.
    pub fn task_name(&self, task: TaskId) -> &str {
        match task {
            TaskId::Classification => &self.classification.name,
            TaskId::Analysis => &self.analysis.name,
            TaskId::Comparison => &self.comparison.name,
            TaskId::Conclusions => &self.conclusions.name,
        }
    }

    /// Time budget of a task in milliseconds.
    pub fn task_budget_ms(&self, task: TaskId) -> u64 {
        match task {
            TaskId::Classification => self.classification.budget_ms,
            TaskId::Analysis => self.analysis.budget_ms,
            TaskId::Comparison => self.comparison.budget_ms,
            TaskId::Conclusions => self.conclusions.budget_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_class_round_trips_through_str() {
        for class in ArchitectureClass::ALL {
            let parsed: ArchitectureClass = class.to_string().parse().unwrap();
            assert_eq!(parsed, class);
        }
    }

    #[test]
    fn architecture_class_accepts_short_aliases() {
        assert_eq!(
            "mono".parse::<ArchitectureClass>().unwrap(),
            ArchitectureClass::Monolithic
        );
        assert_eq!(
            "MICRO".parse::<ArchitectureClass>().unwrap(),
            ArchitectureClass::Microkernel
        );
        assert!("exokernel".parse::<ArchitectureClass>().is_err());
    }

    #[test]
    fn task_numbers_are_stable() {
        for (idx, task) in TaskId::ALL.iter().enumerate() {
            assert_eq!(task.number() as usize, idx + 1);
            assert_eq!(TaskId::from_number(task.number()), Some(*task));
        }
        assert_eq!(TaskId::from_number(0), None);
        assert_eq!(TaskId::from_number(5), None);
    }

    #[test]
    fn task_neighbours() {
        assert_eq!(TaskId::Classification.prev(), None);
        assert_eq!(TaskId::Classification.next(), Some(TaskId::Analysis));
        assert_eq!(TaskId::Conclusions.next(), None);
        assert_eq!(TaskId::Conclusions.prev(), Some(TaskId::Comparison));
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&ArchitectureClass::Hybrid).unwrap();
        assert_eq!(json, "\"hybrid\"");
        let task: TaskId = serde_json::from_str("\"comparison\"").unwrap();
        assert_eq!(task, TaskId::Comparison);
    }
}
