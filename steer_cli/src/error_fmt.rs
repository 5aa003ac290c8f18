//! Human-readable error descriptions and structured JSON error formatting.

use crate::cli::LAST_RUN;
use steer_core::Completion;

fn curve_names() -> String {
    steer_core::Curve::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use steer_core::error::{ArithError, BuildError, EasingError, SteerError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingArith { type_name } => format!(
                "What happened: No arithmetic is registered for `{type_name}`.\nLikely causes: The value space was not initialized before building the accelerator.\nHow to fix: Call steer_core::arith::init() or register an arithmetic for the type."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/steer.toml for a sample."
            ),
        };
    }

    if let Some(ArithError::Unregistered { type_name }) = err.downcast_ref::<ArithError>() {
        return format!(
            "What happened: No arithmetic is registered for `{type_name}`.\nHow to fix: Call steer_core::arith::init() before resolving arithmetic."
        );
    }

    if let Some(ee) = err.downcast_ref::<EasingError>() {
        return match ee {
            EasingError::UnsupportedCurve(name) => format!(
                "What happened: Unknown easing curve '{name}'.\nHow to fix: Use one of: {}.",
                curve_names()
            ),
            EasingError::UnsupportedInterpolation(name) => format!(
                "What happened: Unknown keyframe interpolation '{name}'.\nHow to fix: Use linear, step or smooth."
            ),
            other => format!(
                "What happened: Invalid keyframe curve ({other}).\nHow to fix: Give at least one keyframe with finite, strictly increasing times."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SteerError>() {
        return match se {
            SteerError::NotConverged(Completion::Timeout) => "What happened: The motion did not converge before accelerator.converge_timeout.\nLikely causes: Tolerance too tight for the tick length, or force-mode PID gains that oscillate.\nHow to fix: Raise accelerator.tolerance or converge_timeout, or retune [pid].".to_string(),
            SteerError::NotConverged(Completion::Aborted) => "What happened: The motion was aborted before it converged.\nLikely causes: Interrupted with Ctrl-C.\nHow to fix: Rerun and let the motion finish.".to_string(),
            SteerError::NotConverged(other) => format!("What happened: Motion ended as {other}."),
            SteerError::TickCap(n) => format!("What happened: The run hit sim.max_ticks ({n}) before the motion completed.\nLikely causes: Convergence checking starts late or the tick cap is too low.\nHow to fix: Raise sim.max_ticks or lower sim.converge_after."),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    if err.downcast_ref::<toml::de::Error>().is_some() {
        return format!(
            "What happened: The config file could not be parsed.\nLikely causes: TOML syntax error, a misspelled key, or a missing [sim].target.\nHow to fix: Fix the file and rerun. Details: {}",
            err.root_cause()
        );
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("invalid configuration") {
        return format!(
            "What happened: Invalid configuration ({}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the TOML config and try again.",
            err.root_cause()
        );
    }

    if lower.contains("read config") {
        return format!(
            "What happened: {msg}.\nLikely causes: Wrong --config path or missing file.\nHow to fix: Pass --config with a readable TOML file."
        );
    }

    // Keyframe CSV header special-case
    if lower.contains("keyframe csv must have headers") {
        return "Invalid headers in keyframe CSV. Expected 't,value'.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes for motions that end without converging; other errors return 1.
pub fn exit_code_for_error(err: &eyre::Report) -> u8 {
    use steer_core::error::SteerError;
    match err.downcast_ref::<SteerError>() {
        Some(SteerError::NotConverged(Completion::Timeout)) => 3,
        Some(SteerError::NotConverged(Completion::Aborted)) => 4,
        Some(SteerError::TickCap(_)) => 5,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    use steer_core::error::SteerError;

    let msg = humanize(err);
    let run = LAST_RUN.get();
    let reason = match err.downcast_ref::<SteerError>() {
        Some(SteerError::NotConverged(c)) => c.name(),
        Some(SteerError::TickCap(_)) => "max_ticks",
        _ => "error",
    };
    let details = match reason {
        "timeout" => run.map(|r| {
            json!({ "space": r.space.name(), "converge_timeout": r.converge_timeout })
        }),
        "max_ticks" => run.map(|r| {
            json!({ "space": r.space.name(), "max_ticks": r.max_ticks, "dt": r.dt })
        }),
        _ => run.map(|r| json!({ "space": r.space.name() })),
    };

    let obj = if let Some(d) = details {
        json!({ "reason": reason, "details": d, "message": msg })
    } else {
        json!({ "reason": reason, "message": msg })
    };
    obj.to_string()
}
