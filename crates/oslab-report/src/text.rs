//! Plain-text report rendering.
//!
//! Reproduces the downloadable report layout: the lab title over a
//! ruled line, one score-and-time row per task, the overall result,
//! then the detailed answers section with the flagged essays.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use oslab_core::results::SessionReport;
use oslab_core::timer::format_clock;

/// File name reports are saved under by default.
pub const DEFAULT_REPORT_FILENAME: &str = "os_architecture_lab_report.txt";

/// Renders a session report as plain text.
pub fn render_text(report: &SessionReport) -> String {
    let mut out = String::new();
    out.push_str(&report.title);
    out.push('\n');
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");

    for row in &report.tasks {
        let _ = writeln!(
            out,
            "{}: {}% ({})",
            row.name,
            row.score,
            format_clock(row.elapsed_ms)
        );
    }

    let _ = write!(out, "\nOverall result: {}%\n\n", report.overall_score);

    out.push_str("Detailed answers:\n");
    out.push_str(&"-".repeat(20));
    out.push_str("\n\n");
    for essay in &report.essays {
        let _ = write!(out, "{}:\n{}\n\n", essay.label, essay.text);
    }

    out
}

/// Writes the rendered report to a file, creating parent directories.
pub fn write_text_report(report: &SessionReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, render_text(report))
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oslab_core::model::TaskId;
    use oslab_core::results::{ReportEssay, TaskReportRow};

    fn sample_report() -> SessionReport {
        SessionReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            lab_id: "os-architectures".into(),
            title: "Practical work report: OS architecture approaches".into(),
            tasks: vec![
                TaskReportRow {
                    task: TaskId::Classification,
                    name: "OS classification".into(),
                    score: 100,
                    elapsed_ms: 272_000,
                },
                TaskReportRow {
                    task: TaskId::Analysis,
                    name: "Kernel analysis".into(),
                    score: 100,
                    elapsed_ms: 381_000,
                },
                TaskReportRow {
                    task: TaskId::Comparison,
                    name: "Architecture comparison".into(),
                    score: 70,
                    elapsed_ms: 449_000,
                },
                TaskReportRow {
                    task: TaskId::Conclusions,
                    name: "Conclusions".into(),
                    score: 50,
                    elapsed_ms: 125_000,
                },
            ],
            overall_score: 80,
            duration_ms: 1_227_000,
            essays: vec![
                ReportEssay {
                    label: "Main conclusions".into(),
                    text: "Monolithic kernels trade isolation for raw speed.".into(),
                },
                ReportEssay {
                    label: "Architecture applicability".into(),
                    text: "Microkernels fit safety-critical control systems.".into(),
                },
            ],
        }
    }

    #[test]
    fn layout_is_reproduced_exactly() {
        let text = render_text(&sample_report());
        let expected = concat!(
            "Practical work report: OS architecture approaches\n",
            "============================================================\n",
            "\n",
            "OS classification: 100% (4:32)\n",
            "Kernel analysis: 100% (6:21)\n",
            "Architecture comparison: 70% (7:29)\n",
            "Conclusions: 50% (2:05)\n",
            "\n",
            "Overall result: 80%\n",
            "\n",
            "Detailed answers:\n",
            "--------------------\n",
            "\n",
            "Main conclusions:\n",
            "Monolithic kernels trade isolation for raw speed.\n",
            "\n",
            "Architecture applicability:\n",
            "Microkernels fit safety-critical control systems.\n",
            "\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_essays_leave_the_section_header_alone() {
        let mut report = sample_report();
        report.essays.clear();
        let text = render_text(&report);
        assert!(text.ends_with("Detailed answers:\n--------------------\n\n"));
        assert!(!text.contains("Main conclusions"));
    }

    #[test]
    fn zero_times_render_as_zero_clock() {
        let mut report = sample_report();
        report.tasks[0].elapsed_ms = 0;
        let text = render_text(&report);
        assert!(text.contains("OS classification: 100% (0:00)\n"));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out").join(DEFAULT_REPORT_FILENAME);
        write_text_report(&sample_report(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_text(&sample_report()));
    }
}
