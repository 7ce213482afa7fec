//! Form state for the analysis, comparison and conclusions tasks.
//!
//! These hold whatever the learner typed or selected, unvalidated;
//! the `scoring` module judges them when a check runs. Text is stored
//! as entered and trimmed only at scoring time.

use std::collections::BTreeSet;

use crate::error::LabError;
use crate::model::{AdvantageGroup, ArchitectureClass, ComparisonSpec, ConclusionsSpec};

/// Selected architecture and typed justification for the second task.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub architecture: Option<ArchitectureClass>,
    pub justification: String,
}

/// Checked advantages and scenario picks for the third task.
#[derive(Debug, Clone)]
pub struct ComparisonInput {
    monolithic: BTreeSet<String>,
    microkernel: BTreeSet<String>,
    scenarios: Vec<Option<ArchitectureClass>>,
}

impl ComparisonInput {
    pub fn new(spec: &ComparisonSpec) -> Self {
        Self {
            monolithic: BTreeSet::new(),
            microkernel: BTreeSet::new(),
            scenarios: vec![None; spec.scenarios.len()],
        }
    }

    /// Toggles a checkbox in the given group. Returns whether the
    /// option is checked afterwards.
    pub fn toggle(
        &mut self,
        spec: &ComparisonSpec,
        group: AdvantageGroup,
        option: &str,
    ) -> Result<bool, LabError> {
        if !spec.options(group).iter().any(|o| o.id == option) {
            return Err(LabError::UnknownOption(option.to_owned()));
        }
        let checked = self.checked_mut(group);
        if checked.remove(option) {
            Ok(false)
        } else {
            checked.insert(option.to_owned());
            Ok(true)
        }
    }

    /// Selects an architecture for the scenario at `index`.
    pub fn set_scenario(
        &mut self,
        index: usize,
        class: ArchitectureClass,
    ) -> Result<(), LabError> {
        let slot = self
            .scenarios
            .get_mut(index)
            .ok_or(LabError::UnknownScenario(index))?;
        *slot = Some(class);
        Ok(())
    }

    pub fn checked(&self, group: AdvantageGroup) -> &BTreeSet<String> {
        match group {
            AdvantageGroup::Monolithic => &self.monolithic,
            AdvantageGroup::Microkernel => &self.microkernel,
        }
    }

    pub fn scenarios(&self) -> &[Option<ArchitectureClass>] {
        &self.scenarios
    }

    fn checked_mut(&mut self, group: AdvantageGroup) -> &mut BTreeSet<String> {
        match group {
            AdvantageGroup::Monolithic => &mut self.monolithic,
            AdvantageGroup::Microkernel => &mut self.microkernel,
        }
    }
}

/// Free-text entries for the fourth task, one slot per declared field.
#[derive(Debug, Clone)]
pub struct ConclusionsInput {
    texts: Vec<String>,
}

impl ConclusionsInput {
    pub fn new(spec: &ConclusionsSpec) -> Self {
        Self {
            texts: vec![String::new(); spec.fields.len()],
        }
    }

    /// Replaces the text of the field with the given id.
    pub fn set(
        &mut self,
        spec: &ConclusionsSpec,
        field: &str,
        text: String,
    ) -> Result<(), LabError> {
        let index = spec
            .fields
            .iter()
            .position(|f| f.id == field)
            .ok_or_else(|| LabError::UnknownField(field.to_owned()))?;
        self.texts[index] = text;
        Ok(())
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}
