//! `steer ease`: sample a named curve.

use serde_json::json;
use steer_core::Easer;
use steer_core::error::Result as CoreResult;

/// `(x, y)` pairs at `samples` evenly spaced points of [0, 1].
pub fn sample(curve: &str, samples: u32) -> CoreResult<Vec<(f32, f32)>> {
    let easer: Easer = curve.parse()?;
    let last = samples.saturating_sub(1).max(1) as f32;
    Ok((0..samples)
        .map(|i| {
            let x = i as f32 / last;
            (x, easer.evaluate(x))
        })
        .collect())
}

pub fn print_samples(curve: &str, points: &[(f32, f32)], json_mode: bool) {
    if json_mode {
        let pts: Vec<[f32; 2]> = points.iter().map(|&(x, y)| [x, y]).collect();
        println!("{}", json!({ "curve": curve, "samples": pts }));
    } else {
        println!("x,y");
        for (x, y) in points {
            println!("{x:.4},{y:.6}");
        }
    }
}
