//! Show or write the effective configuration.

use cutline_common::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = config.save()?;
        println!("\nConfiguration written to {}", path.display());
    }

    Ok(())
}
