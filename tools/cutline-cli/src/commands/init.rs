//! Initialize a new Cutline project.

use std::path::PathBuf;

use cutline_project_model::LoadedProject;

pub fn run(name: String, duration: f64, output: PathBuf) -> anyhow::Result<()> {
    let project_dir = output.join(&name);
    println!("Creating project '{}' at {}", name, project_dir.display());

    let project = LoadedProject::create(&project_dir, &name, duration)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  Directory: {}", project.root.display());
    println!("  Source duration: {:.2}s", duration);
    println!();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  ├── sources/     (raw media files)");
    println!("  ├── meta/        (project.json, timeline.json)");
    println!("  └── exports/     (edit lists handed to the renderer)");

    Ok(())
}
