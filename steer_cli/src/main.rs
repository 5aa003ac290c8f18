mod cli;
mod ease;
mod error_fmt;
mod simulate;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("warning: could not install error hooks: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if JSON_MODE.get().copied().unwrap_or(false) {
                eprintln!("{}", format_error_json(&err));
            } else {
                eprintln!("{}", humanize(&err));
            }
            ExitCode::from(exit_code_for_error(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.cmd {
        Commands::Simulate {
            config,
            space,
            trace,
        } => {
            let cfg = simulate::load_config(config, *space)?;
            let level = cli
                .log_level
                .as_deref()
                .or(cfg.logging.level.as_deref())
                .unwrap_or("info");
            // Held until the run ends so the file writer flushes.
            let _guard = init_tracing(
                level,
                cli.json || cfg.logging.json,
                cfg.logging.file.as_deref(),
                cfg.logging.rotation.as_deref(),
            )?;

            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = Arc::clone(&shutdown);
                ctrlc::set_handler(move || {
                    flag.store(true, Ordering::Relaxed);
                })
                .wrap_err("install Ctrl-C handler")?;
            }

            let report = simulate::run_simulation(&cfg, *trace, &shutdown)?;
            simulate::print_report(&report, cfg.sim.space, cli.json);
            report.into_converged()?;
            Ok(())
        }
        Commands::Ease { curve, samples } => {
            let _guard = init_tracing(cli.log_level.as_deref().unwrap_or("warn"), cli.json, None, None)?;
            let points = ease::sample(curve, *samples)?;
            ease::print_samples(curve, &points, cli.json);
            Ok(())
        }
    }
}

/// Console logs go to stderr (pretty or JSON); an optional file gets JSON
/// lines. `RUST_LOG` wins over `level` when set.
fn init_tracing(
    level: &str,
    json: bool,
    file: Option<&str>,
    rotation: Option<&str>,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level '{level}'"))?;

    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let (file_layer, guard) = match file {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {}", path.display()))?;
            let appender = match rotation.unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .wrap_err("init tracing")?;
    Ok(guard)
}
