use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const VALID: &str = r#"
[pid]
gain = 6.0
i_time = 4.0
d_time = 0.02

[accelerator]
mode = "velocity"
converge_timeout = 15.0
tolerance = 0.01

[sim]
space = "scalar"
start_position = [0.0]
target = [10.0]
"#;

fn write_config(dir: &tempfile::TempDir, toml: &str) -> PathBuf {
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn steer() -> Command {
    let mut cmd = Command::cargo_bin("steer").unwrap();
    cmd.arg("--log-level").arg("error");
    cmd
}

#[rstest]
#[case(VALID, 0, "motion converged", "stdout")]
#[case(&VALID.replace("mode = \"velocity\"", "mode = \"force\""), 0, "motion converged", "stdout")]
#[case(&VALID.replace("converge_timeout = 15.0", "converge_timeout = 0.001"), 3, "converge_timeout", "stderr")]
#[case(&VALID.replace("i_time = 4.0", "i_time = 0.0"), 1, "pid.i_time must be > 0", "stderr")]
#[case(&VALID.replace("target = [10.0]", "target = [1.0, 2.0]"), 1, "does not fit space 'scalar'", "stderr")]
#[case(&VALID.replace("[accelerator]", "[profile]\nv_by_t = \"wobble\"\n\n[accelerator]"), 1, "Unknown easing curve 'wobble'", "stderr")]
#[case("[sim]\nspace = \"scalar\"\n", 1, "could not be parsed", "stderr")]
fn simulate_table_cases(
    #[case] toml: &str,
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, toml);

    let assert = steer()
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .code(exit_code);

    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["ease", "in-quad", "--samples", "3"], 0, "0.5000,0.250000", "stdout")]
#[case(&["ease", "wobble"], 1, "Unknown easing curve", "stderr")]
#[case(&["ease", "linear", "--samples", "1"], 2, "samples", "stderr")]
#[case(&["simulate", "--config", "/nonexistent/steer.toml"], 1, "read config", "stderr")]
#[case(&["simulate", "--space", "vec5"], 2, "unknown space", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let assert = steer().args(args).assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn json_report_has_stable_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);

    let out = steer()
        .arg("--json")
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&out);
    let line = stdout
        .lines()
        .find(|l| l.contains("\"outcome\""))
        .unwrap_or_else(|| panic!("no report line; stdout was: {stdout}"));
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["outcome"], "converged");
    assert_eq!(v["space"], "scalar");
    assert_eq!(v["position"], serde_json::json!([10.0]));
    assert!(v["ticks"].as_u64().unwrap() > 1);
    assert!(v["sim_time_s"].is_number());
    assert!(v["wall_ms"].is_u64());
}

#[rstest]
fn json_errors_carry_reason_and_details() {
    let dir = tempdir().unwrap();
    let cfg = write_config(
        &dir,
        &VALID.replace("converge_timeout = 15.0", "converge_timeout = 0.001"),
    );

    let out = steer()
        .arg("--json")
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    let line = stderr
        .lines()
        .find(|l| l.contains("\"reason\""))
        .unwrap_or_else(|| panic!("no error line; stderr was: {stderr}"));
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "timeout");
    assert!((v["details"]["converge_timeout"].as_f64().unwrap() - 0.001).abs() < 1e-6);
}

#[rstest]
fn trace_prints_one_line_per_running_tick() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);

    let out = steer()
        .arg("--json")
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .arg("--trace")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&out);
    let ticks: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| l.contains("\"tick\""))
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let report: serde_json::Value = stdout
        .lines()
        .find(|l| l.contains("\"outcome\""))
        .map(|l| serde_json::from_str(l).unwrap())
        .unwrap();

    assert_eq!(ticks.len() as u64, report["ticks"].as_u64().unwrap() - 1);
    assert_eq!(ticks[0]["tick"], 1);
    assert_eq!(ticks[0]["control"], "velocity");
}

#[rstest]
fn planar_and_angular_spaces_converge() {
    let dir = tempdir().unwrap();
    let planar = VALID
        .replace("space = \"scalar\"", "space = \"vec2\"")
        .replace("start_position = [0.0]", "start_position = [0.0, 0.0]")
        .replace("target = [10.0]", "target = [3.0, 4.0]");
    let cfg = write_config(&dir, &planar);
    steer()
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("position: [3.0000, 4.0000]"));

    // 0.2 rad to 6.0 rad is shorter going backwards through 0.
    // Speeds are wrapped angles too, so stay below half a turn.
    let angular = VALID
        .replace("[pid]", "[profile]\nv_scale = 3.0\n\n[pid]")
        .replace("start_position = [0.0]", "start_position = [0.2]")
        .replace("target = [10.0]", "target = [6.0]");
    let cfg = write_config(&dir, &angular);
    steer()
        .arg("--json")
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .arg("--space")
        .arg("radians")
        .arg("--trace")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\":\"converged\""))
        .stdout(predicate::str::contains("\"tick\":1,").and(predicate::str::contains("\"velocity\":[-")));
}

#[rstest]
#[case("radians", "[3.0]", "profile.v_scale must be < 3.14")]
#[case("degrees", "[10.0]", "")]
fn sample_config_in_angle_spaces(#[case] space: &str, #[case] target: &str, #[case] needle: &str) {
    let sample = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("etc/steer.toml");
    let toml = fs::read_to_string(sample)
        .unwrap()
        .replace("target = [10.0]", &format!("target = {target}"));
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, &toml);
    let mut cmd = steer();
    cmd.arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .arg("--space")
        .arg(space);
    if needle.is_empty() {
        cmd.assert().success();
    } else {
        cmd.assert().code(1).stderr(predicate::str::contains(needle));
    }
}

#[rstest]
fn tick_cap_has_its_own_exit_code_and_json_details() {
    let dir = tempdir().unwrap();
    let capped = VALID.replace("[sim]", "[sim]\nmax_ticks = 5\nconverge_after = 10.0");
    let cfg = write_config(&dir, &capped);
    steer()
        .arg("--json")
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("\"reason\":\"max_ticks\""))
        .stderr(predicate::str::contains("\"space\":\"scalar\""));
}

#[rstest]
fn keyframe_csv_is_resolved_next_to_the_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("brake.csv"), "t,value\n0.0,0.0\n0.5,0.8\n1.0,1.0\n").unwrap();
    let with_csv = VALID.replace(
        "[accelerator]",
        "[profile]\nv_by_x = { csv = \"brake.csv\", interpolation = \"smooth\" }\n\n[accelerator]",
    );
    let cfg = write_config(&dir, &with_csv);
    steer()
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("motion converged"));

    fs::write(dir.path().join("brake.csv"), "time,v\n0.0,0.0\n").unwrap();
    steer()
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers in keyframe CSV"));
}

#[rstest]
fn sample_config_runs() {
    let cfg = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("etc/steer.toml");
    steer()
        .arg("simulate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("motion converged"));
}
