//! The `oslab validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(lab_path: PathBuf) -> Result<()> {
    let labs = if lab_path.is_dir() {
        oslab_core::parser::load_lab_directory(&lab_path)?
    } else {
        vec![oslab_core::parser::parse_lab(&lab_path)?]
    };

    let mut total_warnings = 0;

    for lab in &labs {
        println!(
            "Lab: {} ({} cards, {} commands, {} scenarios)",
            lab.title,
            lab.classification.items.len(),
            lab.analysis.commands.len(),
            lab.comparison.scenarios.len()
        );

        let warnings = oslab_core::parser::validate_lab(lab);
        for w in &warnings {
            println!("  [{}] WARNING: {}", w.section, w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All lab definitions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
