//! The `oslab init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    std::fs::create_dir_all("labs")?;
    let example_path = std::path::Path::new("labs/example.toml");
    if example_path.exists() {
        println!("labs/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, oslab_core::parser::DEFAULT_LAB_TOML)?;
        println!("Created labs/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit labs/example.toml to fit your course");
    println!("  2. Run: oslab validate --lab labs/example.toml");
    println!("  3. Run: oslab run --lab labs/example.toml");

    Ok(())
}
