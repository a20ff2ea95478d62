//! Validate a Cutline project bundle.

use std::path::PathBuf;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating project at: {}", path.display());

    let project = super::load_project(&path)?;

    println!("  Name: {}", project.project.name);
    println!("  Version: {}", project.project.version);
    println!(
        "  Source duration: {:.2}s",
        project.project.source.duration_secs
    );
    println!("  Clips: {}", project.timeline.clips.len());

    let errors = project.validate();
    if errors.is_empty() {
        println!("\nProject is valid.");
    } else {
        println!("\nValidation issues:");
        for error in &errors {
            println!("  - {error}");
        }
        anyhow::bail!("{} issue(s) found", errors.len());
    }

    Ok(())
}
