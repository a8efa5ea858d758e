use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let rows = [
        (
            "defaults.theme",
            config.theme().unwrap_or(crate::theme::DEFAULT_THEME).to_string(),
        ),
        (
            "defaults.show_progress_bar",
            config.show_progress_bar().to_string(),
        ),
        (
            "defaults.show_slide_numbers",
            config.show_slide_numbers().to_string(),
        ),
        ("defaults.reduced_motion", config.reduced_motion().to_string()),
        (
            "defaults.start_mode",
            config
                .defaults
                .as_ref()
                .and_then(|d| d.start_mode.clone())
                .unwrap_or_else(|| "first".to_string()),
        ),
        (
            "site.base_url",
            config.base_url().unwrap_or("(unset)").to_string(),
        ),
    ];
    for (key, value) in rows {
        println!("  {:<28} {}", key.cyan(), value);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(_) => Config::default(),
    };
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Set".green(),
        key.bold(),
        value,
        path.display()
    );
    Ok(())
}
