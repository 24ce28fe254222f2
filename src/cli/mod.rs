//! CLI argument definitions.

use std::path::{Path, PathBuf};

use clap::builder::FalseyValueParser;
use clap::{ArgAction, ArgGroup, Parser, ValueEnum};
use clap_complete::Shell;

/// Configuration tool for SteelSeries per-key RGB keyboards.
#[derive(Parser, Debug)]
#[command(name = "steelkeys", version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .args(["preset", "config", "json", "disable"])
        .multiple(false)
))]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Keyboard model (see --list-models)
    #[arg(long, short = 'm', env = "STEELKEYS_MODEL")]
    pub model: Option<String>,

    /// List available keyboard models
    #[arg(long)]
    pub list_models: bool,

    /// List available presets for the given model
    #[arg(long)]
    pub list_presets: bool,

    /// List key and group names for the given model
    #[arg(long)]
    pub list_keys: bool,

    /// Apply a vendor preset (see --list-presets)
    #[arg(long, short = 'p')]
    pub preset: Option<String>,

    /// Apply the configuration file at PATH (.json, .yaml, .yml or .toml; quote all-digit colors)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Apply the given JSON configuration
    #[arg(long, short = 'j', value_name = "JSON")]
    pub json: Option<String>,

    /// Disable RGB lighting
    #[arg(long, short = 'd')]
    pub disable: bool,

    /// Read model, layout and preset descriptors from DIR
    #[arg(long, value_name = "DIR", env = "STEELKEYS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format (text for humans, json for scripts)
    #[arg(long, short = 'f', default_value = "text", env = "STEELKEYS_FORMAT")]
    pub format: OutputFormat,

    /// Verbose logging (repeat for more detail)
    #[arg(long, short = 'v', action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts
    Json,
}

/// The lighting change requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Disable,
    Preset(&'a str),
    Json(&'a str),
    Config(&'a Path),
}

impl Cli {
    pub const fn use_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// The requested action, if any. At most one can be set.
    pub fn action(&self) -> Option<Action<'_>> {
        if self.disable {
            Some(Action::Disable)
        } else if let Some(preset) = &self.preset {
            Some(Action::Preset(preset))
        } else if let Some(json) = &self.json {
            Some(Action::Json(json))
        } else {
            self.config.as_deref().map(Action::Config)
        }
    }
}
