mod animation;
mod app;
mod cli;
mod commands;
mod config;
mod note;
mod parser;
mod playback;
mod render;
mod theme;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    cli.run()
}
