use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notedeck")]
#[command(author, version, about)]
#[command(long_about = "Present a note as an animated slide deck.\n\n\
    Notes are YAML or JSON files with a title, author and rich-text content.\n\
    The content is split into typed slides automatically.\n\n\
    Examples:\n  \
    notedeck trip.yaml                 Present (fullscreen)\n  \
    notedeck trip.yaml --windowed      Present in a window\n  \
    notedeck slides trip.yaml          Print the slides a note turns into\n  \
    notedeck export trip.yaml -o out   Save every slide as PNG")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Note file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub present: PresentArgs,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Presentation options. Anything left unset falls back to the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PresentArgs {
    /// Launch in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Theme id (see `notedeck themes`)
    #[arg(long)]
    pub theme: Option<String>,

    /// Start on a specific slide (1-indexed)
    #[arg(long)]
    pub slide: Option<usize>,

    /// Image drawn behind every slide
    #[arg(long, value_name = "IMAGE")]
    pub background: Option<String>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Hide the slide counter
    #[arg(long)]
    pub no_slide_numbers: bool,

    /// Skip entrance animations
    #[arg(long)]
    pub reduced_motion: bool,

    /// Don't reload when the note file changes
    #[arg(long)]
    pub no_watch: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the slides a note turns into
    Slides {
        /// Note file (YAML or JSON)
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: SlidesFormat,
    },

    /// Export slides as PNG images
    Export {
        /// Note file (YAML or JSON)
        file: PathBuf,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Theme id (see `notedeck themes`)
        #[arg(long)]
        theme: Option<String>,
    },

    /// List the built-in themes
    Themes,

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.reduced_motion, site.base_url)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SlidesFormat {
    Yaml,
    Json,
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Slides { file, format }) => crate::commands::slides::run(&file, format),
            Some(Commands::Export {
                file,
                output_dir,
                width,
                height,
                theme,
            }) => crate::commands::export::run(file, output_dir, width, height, theme),
            Some(Commands::Themes) => {
                crate::commands::themes::run();
                Ok(())
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    crate::app::run(file, self.present)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
