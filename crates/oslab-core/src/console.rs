//! Simulated command console for the analysis task.
//!
//! The learner runs canned diagnostic commands and reads their canned
//! output; the transcript only ever grows until the session restarts.

use serde::Serialize;

use crate::error::LabError;
use crate::model::ConsoleCommand;

/// Shell prompt shown before each echoed command.
pub const PROMPT: &str = "user@system:~$";

/// One echoed command and its output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub cmd: String,
    pub output: String,
}

/// Append-only console: available commands, which ran, and the transcript.
#[derive(Debug, Clone)]
pub struct CommandConsole {
    commands: Vec<ConsoleCommand>,
    executed: Vec<bool>,
    transcript: Vec<TranscriptEntry>,
}

impl CommandConsole {
    pub fn new(commands: Vec<ConsoleCommand>) -> Self {
        let executed = vec![false; commands.len()];
        Self {
            commands,
            executed,
            transcript: Vec::new(),
        }
    }

    /// Runs the command at `index`, appending to the transcript.
    /// Re-running a command appends again.
    pub fn run(&mut self, index: usize) -> Result<TranscriptEntry, LabError> {
        let command = self
            .commands
            .get(index)
            .ok_or(LabError::UnknownCommand(index))?;
        let entry = TranscriptEntry {
            cmd: command.cmd.clone(),
            output: command.sample_output.clone(),
        };
        self.executed[index] = true;
        tracing::debug!(cmd = %entry.cmd, "console command executed");
        self.transcript.push(entry.clone());
        Ok(entry)
    }

    pub fn commands(&self) -> &[ConsoleCommand] {
        &self.commands
    }

    /// Per-command flag: has it been run at least once.
    pub fn executed(&self) -> &[bool] {
        &self.executed
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Clears the transcript and the executed flags.
    pub fn reset(&mut self) {
        self.executed.fill(false);
        self.transcript.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> CommandConsole {
        CommandConsole::new(vec![
            ConsoleCommand {
                cmd: "uname -a".into(),
                description: "Kernel information".into(),
                sample_output: "Linux ubuntu 5.15.0".into(),
            },
            ConsoleCommand {
                cmd: "lsmod".into(),
                description: "Loaded kernel modules".into(),
                sample_output: "Module  Size  Used by".into(),
            },
        ])
    }

    #[test]
    fn running_a_command_appends_its_output() {
        let mut console = console();
        let entry = console.run(0).unwrap();
        assert_eq!(entry.cmd, "uname -a");
        assert_eq!(entry.output, "Linux ubuntu 5.15.0");
        assert_eq!(console.executed(), &[true, false]);
        assert_eq!(console.transcript().len(), 1);
    }

    #[test]
    fn rerunning_appends_again() {
        let mut console = console();
        console.run(1).unwrap();
        console.run(1).unwrap();
        assert_eq!(console.transcript().len(), 2);
        assert_eq!(console.executed(), &[false, true]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut console = console();
        assert!(matches!(console.run(2), Err(LabError::UnknownCommand(2))));
        assert!(console.transcript().is_empty());
    }

    #[test]
    fn reset_clears_transcript_and_flags() {
        let mut console = console();
        console.run(0).unwrap();
        console.reset();
        assert!(console.transcript().is_empty());
        assert_eq!(console.executed(), &[false, false]);
    }
}
