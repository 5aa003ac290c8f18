#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};
use steer_core::arith::ScalarArith;
use steer_core::{Easer, Keyframes, Interpolation, VelocityProfile};

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    v_scale: f32,
    startup_t: f32,
    braking_x: f32,
    keyframes: Vec<(f32, f32)>,
    smooth: bool,
    elapsed: f32,
    error_x: f32,
}

fuzz_target!(|input: Input| {
    let interpolation = if input.smooth {
        Interpolation::Smooth
    } else {
        Interpolation::Linear
    };
    let v_by_x = match Keyframes::new(input.keyframes, interpolation) {
        Ok(k) => Easer::Keyframes(k),
        Err(_) => Easer::default(),
    };
    let profile = VelocityProfile {
        v_scale: input.v_scale,
        startup_t: input.startup_t,
        braking_x: input.braking_x,
        v_by_x,
        ..VelocityProfile::default()
    };
    // Only validated profiles are promised to be well behaved.
    if profile.validate().is_err() || !input.elapsed.is_finite() || !input.error_x.is_finite() {
        return;
    }
    let _ = profile.apply(&ScalarArith, input.elapsed, input.error_x);
});
