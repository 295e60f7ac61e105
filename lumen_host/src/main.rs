//! # Lumen Host Binary
//!
//! Runs the configuration script, loads extension modules and presents
//! every reported error on the console.
//!
//! # Usage
//!
//! ```bash
//! # Default files: ~/.config/lumen/lumen.toml and ~/.config/lumen/init.lua
//! lumen
//!
//! # Explicit configuration script and settings
//! lumen --config ./init.lua --settings ./lumen.toml
//!
//! # Extra module and entry point
//! lumen --module console --invoke console:print:hello
//!
//! # Verbose logging, JSON output
//! lumen -v --json
//! ```

#![deny(warnings)]

use clap::Parser;
use lumen_common::config::{LogLevel, TomlLoader};
use lumen_common::paths::{
    DEFAULT_SETTINGS_FILENAME, default_script_path, default_settings_path, find_config_file,
};
use lumen_host::settings::Invocation;
use lumen_host::{Host, HostError, HostSettings, ScriptConfig};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Lumen - error-domain registry host with Lua configuration
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Runs the Lua configuration script and extension modules")]
#[command(long_about = None)]
struct Args {
    /// Configuration script. Defaults to $XDG_CONFIG_HOME/lumen/init.lua,
    /// which may be absent.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host settings (TOML). Defaults to the first lumen.toml found in the
    /// XDG config directories.
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Load an extra module (can be specified multiple times)
    #[arg(short, long = "module", action = clap::ArgAction::Append)]
    modules: Vec<String>,

    /// Run MODULE:ENTRY[:ARG...] after startup (can be specified multiple times)
    #[arg(short, long = "invoke", action = clap::ArgAction::Append)]
    invocations: Vec<Invocation>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("Lumen failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings_path = args
        .settings
        .clone()
        .or_else(|| find_config_file(DEFAULT_SETTINGS_FILENAME));
    let settings = match &settings_path {
        Some(path) => HostSettings::load(path)?,
        None => HostSettings::default(),
    };

    // Initialize tracing
    setup_tracing(&args, settings.shared.log_level);

    if settings_path.is_none() {
        info!(
            "No settings at {} or in system config dirs, using defaults",
            default_settings_path().display()
        );
    }

    info!("Lumen v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut host = Host::new(settings)?;

    let script = match args.config.clone() {
        Some(path) => host.load_script(&path),
        None => {
            let path = default_script_path();
            if path.is_file() {
                host.load_script(&path)
            } else {
                info!("No configuration script at {}, using defaults", path.display());
                Ok(ScriptConfig::default())
            }
        }
    };

    let outcome = script.and_then(|script| host.start(&script, &args.modules, &args.invocations));
    if let Err(HostError::Fatal(message)) = &outcome {
        error!("Stopping after fatal error: {message}");
    }

    // Modules are unloaded on every path.
    host.shutdown();
    outcome?;

    info!("Lumen shutdown complete");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and settings.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::from(configured)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
