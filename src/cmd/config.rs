//! Configuration view and validation commands — `revq config`.

use anyhow::Result;
use console::style;

use revq::config::RevqToml;

use super::Ctx;
use crate::ConfigCommands;

pub fn cmd_config(ctx: &Ctx, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = ctx.config.config_file();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("revq configuration");
            println!("==================");
            println!();
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!(
                    "Config file: {} (not present, using defaults)",
                    config_path.display()
                );
            }
            println!();
            let toml = &ctx.config.toml;
            println!("[api]");
            println!("  url = \"{}\"", ctx.config.api_url());
            println!("  timeout_secs = {}", toml.api.timeout_secs);
            println!();
            println!("[polling]");
            println!("  interval_ms = {}", toml.polling.interval_ms);
            println!("  max_attempts = {}", toml.polling.max_attempts);
            println!("  budget_ms = {}", toml.polling.budget_ms);
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("Config file already exists: {}", config_path.display());
                return Ok(());
            }
            let defaults = RevqToml::default();
            defaults.save(&config_path)?;
            println!("Wrote {}", config_path.display());
        }
        Some(ConfigCommands::Validate) => {
            let warnings = ctx.config.validate();
            if warnings.is_empty() {
                println!("{} Configuration is valid.", style("OK").green().bold());
            } else {
                for warning in &warnings {
                    println!("{} {}", style("Warning:").yellow().bold(), warning);
                }
                anyhow::bail!("Configuration has {} warning(s)", warnings.len());
            }
        }
    }
    Ok(())
}
