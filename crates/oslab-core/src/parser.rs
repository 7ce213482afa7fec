//! TOML lab definition parsing and validation.
//!
//! Definitions are written in TOML (see `data/default_lab.toml` for
//! the built-in one). Raw file structs are converted into the crate's
//! model types, turning minute budgets into milliseconds and applying
//! defaults for the optional scoring knobs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    AdvantageGroup, AnalysisSpec, ArchitectureClass, CatalogItem, ChoiceOption,
    ClassificationSpec, ComparisonSpec, ConclusionsSpec, ConsoleCommand, EssayField, LabSpec,
    Scenario, Zone,
};

/// The lab definition compiled into the crate.
pub const DEFAULT_LAB_TOML: &str = include_str!("data/default_lab.toml");

const MS_PER_MINUTE: u64 = 60_000;

fn default_min_justification_chars() -> usize {
    50
}

fn default_min_field_chars() -> usize {
    30
}

#[derive(Debug, Deserialize)]
struct TomlLabFile {
    lab: TomlLabHeader,
    classification: TomlClassification,
    analysis: TomlAnalysis,
    comparison: TomlComparison,
    conclusions: TomlConclusions,
}

#[derive(Debug, Deserialize)]
struct TomlLabHeader {
    id: String,
    title: String,
    global_budget_minutes: u64,
}

#[derive(Debug, Deserialize)]
struct TomlClassification {
    name: String,
    budget_minutes: u64,
    #[serde(default)]
    items: Vec<CatalogItem>,
    #[serde(default)]
    zones: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
struct TomlAnalysis {
    name: String,
    budget_minutes: u64,
    correct: ArchitectureClass,
    #[serde(default = "default_min_justification_chars")]
    min_justification_chars: usize,
    #[serde(default)]
    commands: Vec<ConsoleCommand>,
}

#[derive(Debug, Deserialize)]
struct TomlComparison {
    name: String,
    budget_minutes: u64,
    #[serde(default)]
    monolithic_options: Vec<ChoiceOption>,
    #[serde(default)]
    monolithic_correct: Vec<String>,
    #[serde(default)]
    microkernel_options: Vec<ChoiceOption>,
    #[serde(default)]
    microkernel_correct: Vec<String>,
    #[serde(default)]
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct TomlConclusions {
    name: String,
    budget_minutes: u64,
    #[serde(default = "default_min_field_chars")]
    min_field_chars: usize,
    #[serde(default)]
    fields: Vec<TomlEssayField>,
}

#[derive(Debug, Deserialize)]
struct TomlEssayField {
    id: String,
    label: String,
    #[serde(default)]
    in_report: bool,
}

/// Parses a lab definition from a TOML file.
pub fn parse_lab(path: &Path) -> Result<LabSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lab definition: {}", path.display()))?;
    parse_lab_str(&content)
        .with_context(|| format!("failed to parse lab definition: {}", path.display()))
}

/// Parses a lab definition from TOML text.
pub fn parse_lab_str(content: &str) -> Result<LabSpec> {
    let raw: TomlLabFile = toml::from_str(content).context("invalid lab TOML")?;
    Ok(convert(raw))
}

/// The lab definition shipped with the crate.
pub fn builtin_lab() -> Result<LabSpec> {
    parse_lab_str(DEFAULT_LAB_TOML).context("built-in lab definition is invalid")
}

/// Parses every `.toml` file in a directory, in name order.
pub fn load_lab_directory(dir: &Path) -> Result<Vec<LabSpec>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut labs = Vec::with_capacity(paths.len());
    for path in &paths {
        labs.push(parse_lab(path)?);
    }
    Ok(labs)
}

fn convert(raw: TomlLabFile) -> LabSpec {
    LabSpec {
        id: raw.lab.id,
        title: raw.lab.title,
        global_budget_ms: raw.lab.global_budget_minutes * MS_PER_MINUTE,
        classification: ClassificationSpec {
            name: raw.classification.name,
            budget_ms: raw.classification.budget_minutes * MS_PER_MINUTE,
            items: raw.classification.items,
            zones: raw.classification.zones,
        },
        analysis: AnalysisSpec {
            name: raw.analysis.name,
            budget_ms: raw.analysis.budget_minutes * MS_PER_MINUTE,
            correct: raw.analysis.correct,
            min_justification_chars: raw.analysis.min_justification_chars,
            commands: raw.analysis.commands,
        },
        comparison: ComparisonSpec {
            name: raw.comparison.name,
            budget_ms: raw.comparison.budget_minutes * MS_PER_MINUTE,
            monolithic_options: raw.comparison.monolithic_options,
            monolithic_correct: raw.comparison.monolithic_correct,
            microkernel_options: raw.comparison.microkernel_options,
            microkernel_correct: raw.comparison.microkernel_correct,
            scenarios: raw.comparison.scenarios,
        },
        conclusions: ConclusionsSpec {
            name: raw.conclusions.name,
            budget_ms: raw.conclusions.budget_minutes * MS_PER_MINUTE,
            min_field_chars: raw.conclusions.min_field_chars,
            fields: raw
                .conclusions
                .fields
                .into_iter()
                .map(|f| EssayField {
                    id: f.id,
                    label: f.label,
                    in_report: f.in_report,
                })
                .collect(),
        },
    }
}

/// A non-fatal problem found in a lab definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub section: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.section, self.message)
    }
}

/// Checks a parsed lab for definitions that cannot work as intended.
pub fn validate_lab(spec: &LabSpec) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |section: &'static str, message: String| {
        warnings.push(ValidationWarning { section, message });
    };

    if spec.global_budget_ms == 0 {
        warn("lab", "global time budget is zero".into());
    }
    for task in crate::model::TaskId::ALL {
        if spec.task_budget_ms(task) == 0 {
            warn("lab", format!("{task} has a zero time budget"));
        }
    }

    let items = &spec.classification.items;
    let zones = &spec.classification.zones;
    if items.is_empty() {
        warn("classification", "no catalog items".into());
    }
    if zones.is_empty() {
        warn("classification", "no drop zones".into());
    }
    for (idx, item) in items.iter().enumerate() {
        if items[..idx].iter().any(|other| other.id == item.id) {
            warn("classification", format!("duplicate item id: {}", item.id));
        }
        if !zones.iter().any(|zone| zone.expected == item.class) {
            warn(
                "classification",
                format!("item '{}' has no zone accepting class {}", item.id, item.class),
            );
        }
    }
    for (idx, zone) in zones.iter().enumerate() {
        if zones[..idx].iter().any(|other| other.id == zone.id) {
            warn("classification", format!("duplicate zone id: {}", zone.id));
        }
    }

    if spec.analysis.commands.is_empty() {
        warn("analysis", "no console commands to investigate".into());
    }

    for group in [AdvantageGroup::Monolithic, AdvantageGroup::Microkernel] {
        let options = spec.comparison.options(group);
        let correct = spec.comparison.correct(group);
        if correct.is_empty() {
            warn("comparison", format!("no correct options for the {group} group"));
        }
        for id in correct {
            if !options.iter().any(|option| &option.id == id) {
                warn(
                    "comparison",
                    format!("correct option '{id}' is not offered in the {group} group"),
                );
            }
        }
        for (idx, option) in options.iter().enumerate() {
            if options[..idx].iter().any(|other| other.id == option.id) {
                warn(
                    "comparison",
                    format!("duplicate option id in the {group} group: {}", option.id),
                );
            }
        }
    }
    let comparison_max = 40 + 20 * spec.comparison.scenarios.len();
    if comparison_max != 100 {
        warn(
            "comparison",
            format!("maximum score is {comparison_max}%, expected 100%"),
        );
    }

    let fields = &spec.conclusions.fields;
    for (idx, field) in fields.iter().enumerate() {
        if fields[..idx].iter().any(|other| other.id == field.id) {
            warn("conclusions", format!("duplicate field id: {}", field.id));
        }
    }
    let conclusions_max = 25 * fields.len();
    if conclusions_max != 100 {
        warn(
            "conclusions",
            format!("maximum score is {conclusions_max}%, expected 100%"),
        );
    }
    if !fields.iter().any(|field| field.in_report) {
        warn(
            "conclusions",
            "no field is flagged for the report; detailed answers will be empty".into(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;

    #[test]
    fn builtin_lab_parses() {
        let spec = builtin_lab().unwrap();
        assert_eq!(spec.id, "os-architectures");
        assert_eq!(spec.classification.items.len(), 5);
        assert_eq!(spec.classification.zones.len(), 3);
        assert_eq!(spec.analysis.commands.len(), 4);
        assert_eq!(spec.comparison.scenarios.len(), 3);
        assert_eq!(spec.conclusions.fields.len(), 4);
        assert_eq!(spec.analysis.correct, ArchitectureClass::Monolithic);
    }

    #[test]
    fn builtin_lab_validates_clean() {
        let spec = builtin_lab().unwrap();
        assert_eq!(validate_lab(&spec), Vec::new());
    }

    #[test]
    fn minute_budgets_become_milliseconds() {
        let spec = builtin_lab().unwrap();
        assert_eq!(spec.global_budget_ms, 3_600_000);
        assert_eq!(spec.task_budget_ms(TaskId::Classification), 900_000);
        assert_eq!(spec.task_budget_ms(TaskId::Analysis), 1_200_000);
        assert_eq!(spec.task_budget_ms(TaskId::Comparison), 900_000);
        assert_eq!(spec.task_budget_ms(TaskId::Conclusions), 600_000);
    }

    #[test]
    fn scoring_knobs_default_when_omitted() {
        let spec = builtin_lab().unwrap();
        assert_eq!(spec.analysis.min_justification_chars, 50);
        assert_eq!(spec.conclusions.min_field_chars, 30);
    }

    #[test]
    fn report_flags_survive_parsing() {
        let spec = builtin_lab().unwrap();
        let flags: Vec<bool> = spec.conclusions.fields.iter().map(|f| f.in_report).collect();
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = parse_lab_str("not really toml [").unwrap_err();
        assert!(err.to_string().contains("invalid lab TOML"));
    }

    #[test]
    fn missing_sections_are_rejected() {
        let err = parse_lab_str("[lab]\nid = \"x\"\ntitle = \"y\"\nglobal_budget_minutes = 1\n")
            .unwrap_err();
        assert!(err.to_string().contains("invalid lab TOML"));
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = parse_lab(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn directories_load_toml_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), DEFAULT_LAB_TOML).unwrap();
        let mut renamed = DEFAULT_LAB_TOML.replace(
            "id = \"os-architectures\"",
            "id = \"os-architectures-alt\"",
        );
        renamed.push('\n');
        std::fs::write(dir.path().join("a.toml"), renamed).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let labs = load_lab_directory(dir.path()).unwrap();
        assert_eq!(labs.len(), 2);
        assert_eq!(labs[0].id, "os-architectures-alt");
        assert_eq!(labs[1].id, "os-architectures");
    }

    fn lab_with(mutate: impl FnOnce(&mut LabSpec)) -> LabSpec {
        let mut spec = builtin_lab().unwrap();
        mutate(&mut spec);
        spec
    }

    #[test]
    fn duplicate_ids_are_flagged() {
        let spec = lab_with(|s| {
            let clone = s.classification.items[0].clone();
            s.classification.items.push(clone);
        });
        let warnings = validate_lab(&spec);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate item id: linux")));
    }

    #[test]
    fn unplaceable_items_are_flagged() {
        let spec = lab_with(|s| s.classification.zones.retain(|z| z.id != "hybrid"));
        let warnings = validate_lab(&spec);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("no zone accepting class hybrid")));
    }

    #[test]
    fn unknown_correct_options_are_flagged() {
        let spec = lab_with(|s| {
            s.comparison.monolithic_correct.push("zero-copy".into());
        });
        let warnings = validate_lab(&spec);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("correct option 'zero-copy'")));
    }

    #[test]
    fn off_balance_scoring_is_flagged() {
        let spec = lab_with(|s| {
            s.comparison.scenarios.pop();
            s.conclusions.fields.pop();
        });
        let warnings = validate_lab(&spec);
        assert!(warnings
            .iter()
            .any(|w| w.section == "comparison" && w.message.contains("80%")));
        assert!(warnings
            .iter()
            .any(|w| w.section == "conclusions" && w.message.contains("75%")));
    }

    #[test]
    fn warning_display_names_the_section() {
        let warning = ValidationWarning {
            section: "analysis",
            message: "no console commands to investigate".into(),
        };
        assert_eq!(
            warning.to_string(),
            "[analysis] no console commands to investigate"
        );
    }
}
