use std::sync::{Arc, Mutex};

use nalgebra::Vector2;
use steer_core::arith::{AngleArith, EuclidArith, ScalarArith};
use steer_core::{
    AccelCfg, Accelerator, Arith, Body, Completion, Control, Mode, Pid, SimBody, StepStatus,
    VelocityProfile,
};

const DT: f32 = 1.0 / 60.0;

fn scalar(mode: Mode, converge_timeout: f32) -> Accelerator<ScalarArith> {
    Accelerator::builder()
        .with_arith(ScalarArith)
        .with_profile(VelocityProfile::default())
        .with_pid(Pid::new(6.0, 4.0, 0.02, 36.0, 36.0))
        .with_config(AccelCfg {
            mode,
            converge_timeout,
            tolerance: 1e-2,
        })
        .build()
        .expect("valid accelerator")
}

/// Tick until a terminal status, integrating the body after each running
/// tick. Returns the outcome, the tick count and the largest speed seen.
fn drive<A: Arith>(
    accel: &mut Accelerator<A>,
    body: &mut SimBody<A>,
    max_ticks: usize,
) -> (Completion, usize, f32) {
    let mut peak = 0.0_f32;
    for n in 1..=max_ticks {
        match accel.step(body, DT) {
            StepStatus::Complete(c) => return (c, n, peak),
            StepStatus::Running(_) => {
                body.integrate(DT);
                peak = peak.max(accel.arith().length(body.velocity()));
            }
            StepStatus::Idle => panic!("went idle on tick {n}"),
        }
    }
    panic!("no completion within {max_ticks} ticks");
}

#[test]
fn velocity_mode_reaches_full_speed_then_converges() {
    let mut accel = scalar(Mode::Velocity, 15.0);
    let mut body = SimBody::new(ScalarArith, 0.0, 1.0);
    accel.start(10.0);
    accel.begin_converge();

    let (outcome, ticks, peak) = drive(&mut accel, &mut body, 1_000);
    assert_eq!(outcome, Completion::Converged);
    assert!((peak - 12.0).abs() < 1e-3, "peak speed {peak}");
    assert!(ticks < 200, "took {ticks} ticks");
    assert_eq!(body.position(), 10.0);
    assert!(!accel.is_running());
}

#[test]
fn short_timeout_reports_timeout() {
    let mut accel = scalar(Mode::Velocity, 0.001);
    let mut body = SimBody::new(ScalarArith, 0.0, 1.0);
    accel.start(10.0);
    accel.begin_converge();

    let (outcome, ticks, _) = drive(&mut accel, &mut body, 10);
    assert_eq!(outcome, Completion::Timeout);
    assert_eq!(ticks, 1);
    assert!(!accel.is_running());
}

#[test]
fn abort_mid_motion_reports_aborted_and_stops() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut accel = Accelerator::builder()
        .with_arith(ScalarArith)
        .with_on_complete(move |c| sink.lock().unwrap().push(c))
        .build()
        .unwrap();
    let mut body = SimBody::new(ScalarArith, 0.0, 1.0);
    accel.start(10.0);
    for _ in 0..10 {
        assert!(matches!(accel.step(&mut body, DT), StepStatus::Running(_)));
        body.integrate(DT);
    }
    accel.abort();
    assert_eq!(
        accel.step(&mut body, DT),
        StepStatus::Complete(Completion::Aborted)
    );
    assert!(!accel.is_running());
    assert_eq!(accel.elapsed(), None);
    assert_eq!(accel.step(&mut body, DT), StepStatus::Idle);
    assert_eq!(*seen.lock().unwrap(), vec![Completion::Aborted]);
}

#[test]
fn force_mode_output_bounded_and_converges() {
    let mut accel = scalar(Mode::Force, 15.0);
    let mut body = SimBody::new(ScalarArith, 0.0, 1.0);
    accel.start(10.0);
    accel.begin_converge();
    for n in 1..=600 {
        match accel.step(&mut body, DT) {
            StepStatus::Running(Control::Force(a)) => {
                assert!(a.abs() <= 36.0 + 1e-4, "tick {n}: {a}");
                body.integrate(DT);
            }
            StepStatus::Complete(c) => {
                assert_eq!(c, Completion::Converged);
                assert_eq!(body.position(), 10.0);
                return;
            }
            other => panic!("tick {n}: {other:?}"),
        }
    }
    panic!("force mode did not converge");
}

#[test]
fn moving_target_is_followed() {
    let mut accel = scalar(Mode::Velocity, 15.0);
    let mut body = SimBody::new(ScalarArith, 0.0, 1.0);
    accel.start(10.0);
    for _ in 0..30 {
        accel.step(&mut body, DT);
        body.integrate(DT);
    }
    accel.set_target(-10.0);
    accel.step(&mut body, DT);
    assert!(accel.target_v() < 0.0);
    assert!(accel.error_x() < 0.0);
}

#[test]
fn planar_motion_heads_straight_for_target() {
    let arith = EuclidArith::<2>;
    let mut accel = Accelerator::builder()
        .with_arith(arith)
        .with_mode(Mode::Velocity)
        .with_tolerance(1e-2)
        .build()
        .unwrap();
    let mut body = SimBody::new(arith, Vector2::zeros(), 1.0);
    let target = Vector2::new(3.0, 4.0);
    accel.start(target);
    accel.step(&mut body, DT);
    let v = accel.target_v();
    // parallel to (3, 4)
    assert!((v.x * 4.0 - v.y * 3.0).abs() < 1e-4);
    accel.begin_converge();
    let (outcome, _, _) = drive(&mut accel, &mut body, 1_000);
    assert_eq!(outcome, Completion::Converged);
    assert_eq!(body.position(), target);
}

#[test]
fn angle_motion_takes_the_short_way() {
    let arith = AngleArith::DEGREES;
    let mut accel = Accelerator::builder()
        .with_arith(arith)
        .with_mode(Mode::Velocity)
        .with_tolerance(1e-2)
        .build()
        .unwrap();
    let mut body = SimBody::new(arith, 350.0, 1.0);
    accel.start(10.0);
    accel.step(&mut body, DT);
    // heading up through 0 rather than down through 180
    assert!(arith.shortest(accel.target_v()) > 0.0);
    accel.begin_converge();
    let (outcome, _, _) = drive(&mut accel, &mut body, 1_000);
    assert_eq!(outcome, Completion::Converged);
    assert_eq!(body.position(), 10.0);
}
