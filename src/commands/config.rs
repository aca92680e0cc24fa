use std::path::Path;

use anyhow::Result;
use eventboard_core::config::BoardConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = BoardConfig::config_path()?;
    println!("{}", report(&config_path)?);
    Ok(())
}

/// Paths and effective settings, writing a commented template on first use.
///
/// The path is listed before the file is parsed, so a broken config can
/// still be located.
fn report(config_path: &Path) -> Result<String> {
    let mut lines = Vec::new();

    if !config_path.exists() {
        BoardConfig::create_default_config(config_path)?;
        lines.push(format!("{} {}", "Created".green(), config_path.display()));
    }

    lines.push("Paths".bold().to_string());
    lines.push(format!("  Config:      {}", config_path.display()));
    lines.push("Settings".bold().to_string());

    match BoardConfig::load_from(config_path) {
        Ok(config) => {
            lines.push(format!(
                "  Source:      {}",
                config
                    .source()
                    .unwrap_or_else(|| "(not set)".dimmed().to_string())
            ));
            lines.push(format!("  Week start:  {}", config.week_start));
            lines.push(format!("  Timezone:    {}", config.timezone));
            lines.push(format!(
                "  UID domain:  {}",
                config.export_options().uid_domain
            ));
        }
        Err(e) => lines.push(format!("  {}", e.to_string().red())),
    }

    Ok(lines.join("\n"))
}
