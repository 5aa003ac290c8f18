//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

use steer_config::Space;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();
/// Space and tick settings of the current run (for JSON error details).
pub static LAST_RUN: OnceLock<RunInfo> = OnceLock::new();

#[derive(Copy, Clone, Debug)]
pub struct RunInfo {
    pub space: Space,
    pub dt: f32,
    pub max_ticks: u64,
    pub converge_timeout: f32,
}

#[derive(Parser, Debug)]
#[command(name = "steer", version, about = "Steer a simulated body toward a target")]
pub struct Cli {
    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a simulated motion described by a TOML config
    Simulate {
        /// Path to config TOML (typed)
        #[arg(long, value_name = "FILE", default_value = "etc/steer.toml")]
        config: PathBuf,
        /// Override [sim].space (scalar|radians|degrees|vec2|vec3|vec4|color)
        #[arg(long, value_name = "SPACE")]
        space: Option<Space>,
        /// Print one JSON line per tick on stdout
        #[arg(long, action = ArgAction::SetTrue)]
        trace: bool,
    },
    /// Sample an easing curve on [0, 1]
    Ease {
        /// Curve name, e.g. in-out-quad or out-bounce
        curve: String,
        /// Number of evenly spaced samples, endpoints included
        #[arg(long, default_value_t = 11, value_parser = clap::value_parser!(u32).range(2..=10_000))]
        samples: u32,
    },
}
