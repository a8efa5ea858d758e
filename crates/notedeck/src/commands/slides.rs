use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::SlidesFormat;
use crate::config::Config;
use crate::note;
use crate::parser;

pub fn run(file: &Path, format: SlidesFormat) -> Result<()> {
    let config = Config::load_or_default();
    let note = note::load(file)?.with_profile_base(config.base_url());
    let slides = parser::parse_note_to_slides(&note);
    log::info!("{} -> {} slides", file.display(), slides.len());

    let out = match format {
        SlidesFormat::Yaml => serde_yaml::to_string(&slides).context("Failed to encode slides")?,
        SlidesFormat::Json => {
            serde_json::to_string_pretty(&slides).context("Failed to encode slides")?
        }
    };
    println!("{}", out.trim_end());
    Ok(())
}
