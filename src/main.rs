//! steelkeys - per-key RGB lighting for SteelSeries keyboards.
//!
//! Lists models, presets and keys, and applies presets or lighting
//! configurations over USB HID.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};

use clap::{CommandFactory, FromArgMatches};
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use steelkeys::cli::{Action, Cli};
use steelkeys::config::{LightingConfig, open_registry};
use steelkeys::error::{Result, SkError};
use steelkeys::keyboard::Keyboard;
use steelkeys::layout::Registry;
use steelkeys::logging::init_logging;
use steelkeys::protocol::RequestPlan;

/// Build information embedded at compile time.
mod build_info {
    use std::sync::LazyLock;

    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }

    static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
        format!(
            "{VERSION}\nbuilt: {}\nrustc: {}\ntarget: {}",
            build_timestamp(),
            rustc_semver(),
            target()
        )
    });

    pub fn long_version() -> &'static str {
        LONG_VERSION.as_str()
    }
}

fn main() {
    let matches = Cli::command()
        .long_version(build_info::long_version())
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }
    if cli.no_color || !io::stderr().is_terminal() {
        console::set_colors_enabled_stderr(false);
    }

    init_logging(cli.use_json(), cli.verbose, cli.quiet);
    debug!(version = build_info::VERSION, "Starting steelkeys");

    if let Err(e) = run(&cli) {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "steelkeys", &mut io::stdout());
        return Ok(());
    }

    let registry = open_registry(cli.data_dir.as_deref())?;

    if cli.list_models {
        return cmd_list_models(cli, &registry);
    }

    let model = cli.model.as_deref().ok_or(SkError::NoModel)?;
    let keyboard = Keyboard::load(&registry, model)?;

    if cli.list_presets || cli.list_keys {
        if cli.list_presets {
            cmd_list_presets(cli, &keyboard)?;
        }
        if cli.list_keys {
            cmd_list_keys(cli, &keyboard)?;
        }
        return Ok(());
    }

    match cli.action() {
        Some(action) => cmd_apply(cli, &keyboard, action),
        None => print_nothing_to_do(cli),
    }
}

// === Listing ===

fn cmd_list_models(cli: &Cli, registry: &Registry) -> Result<()> {
    if cli.use_json() {
        let models: Vec<_> = registry.list_models().collect();
        return output_json(&models);
    }

    println!("Available keyboard models are:");
    for model in registry.list_models() {
        println!(
            "  {:<8} {} {}",
            style(&model.name).bold().cyan(),
            style(format!("{:04x}:{:04x}", model.vendor_id, model.product_id)).dim(),
            model.layout
        );
    }
    println!(
        "\nIf your keyboard is not in this list, use the closest one \
         (with a keyboard layout as similar as possible)."
    );
    Ok(())
}

fn cmd_list_presets(cli: &Cli, keyboard: &Keyboard) -> Result<()> {
    let model = &keyboard.model().name;
    let presets: Vec<&str> = keyboard.list_presets().collect();

    if cli.use_json() {
        return output_json(&serde_json::json!({ "model": model, "presets": presets }));
    }

    if presets.is_empty() {
        println!("No presets available for {model}.");
    } else {
        println!("Available presets for {model}:");
        for preset in presets {
            println!("\t- {preset}");
        }
    }
    Ok(())
}

fn cmd_list_keys(cli: &Cli, keyboard: &Keyboard) -> Result<()> {
    let keys: Vec<&str> = keyboard.list_keys().collect();
    let groups: Vec<&str> = keyboard.list_groups().collect();

    if cli.use_json() {
        return output_json(&serde_json::json!({
            "model": keyboard.model().name,
            "keys": keys,
            "groups": groups,
        }));
    }

    println!("{} ({}):", style("Keys").bold(), keys.len());
    println!("  {}", keys.join(" "));
    if !groups.is_empty() {
        println!("{} ({}):", style("Groups").bold(), groups.len());
        println!("  {}", groups.join(" "));
    }
    Ok(())
}

// === Lighting ===

/// A validated action, ready to be sent.
enum Prepared<'a> {
    Plan(RequestPlan),
    Preset(&'a str),
}

fn cmd_apply(cli: &Cli, keyboard: &Keyboard, action: Action<'_>) -> Result<()> {
    // Everything is validated before the device is opened.
    let prepared = match action {
        Action::Disable => Prepared::Plan(RequestPlan::disable(keyboard.layout())),
        Action::Preset(name) => {
            keyboard.preset(name)?;
            Prepared::Preset(name)
        }
        Action::Json(json) => {
            Prepared::Plan(keyboard.plan_config(&LightingConfig::from_json(json)?)?)
        }
        Action::Config(path) => Prepared::Plan(keyboard.plan_config(&LightingConfig::load(path)?)?),
    };

    let session = keyboard.open()?;
    match &prepared {
        Prepared::Plan(plan) => session.apply(plan)?,
        Prepared::Preset(name) => session.push_preset(name)?,
    }
    info!(model = %keyboard.model().name, ?action, "Done");

    let description = match action {
        Action::Disable => "Lighting disabled".to_string(),
        Action::Preset(name) => format!("Preset {name} applied"),
        Action::Json(_) | Action::Config(_) => "Configuration applied".to_string(),
    };

    if cli.use_json() {
        output_json(&serde_json::json!({
            "success": true,
            "model": keyboard.model().name,
            "message": description,
        }))
    } else {
        if !cli.quiet {
            println!("{} {description}", style("✓").green());
        }
        Ok(())
    }
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_nothing_to_do(cli: &Cli) -> Result<()> {
    const MESSAGE: &str = "Nothing to do! Please specify a preset, a configuration or --disable.";

    if cli.use_json() {
        return output_json(&serde_json::json!({ "success": true, "message": MESSAGE }));
    }
    println!("{MESSAGE}");
    Ok(())
}

// === Output ===

fn output_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(io::Error::from)?;
    println!("{json}");
    Ok(())
}

fn output_error(cli: &Cli, error: &SkError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{json:#}");
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
