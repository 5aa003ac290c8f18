#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for steering runs.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Easing entries are a curve name, an inline keyframe table, or a CSV
//!   file of keyframes (`t,value` headers) resolved relative to the config.
//!
//! Curve and interpolation names are checked when the config is converted
//! into core types, not here.
use std::path::Path;

use serde::Deserialize;

/// Keyframe CSV schema.
///
/// Expected headers:
/// t,value
///
/// Example:
/// t,value
/// 0.0,0.0
/// 0.5,0.8
/// 1.0,1.0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct KeyframeRow {
    pub t: f32,
    pub value: f32,
}

/// An easing function as written in TOML.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum EasingCfg {
    /// `v_by_t = "in-out-quad"`
    Curve(String),
    /// `v_by_x = { keyframes = [[0.0, 0.0], [1.0, 1.0]], interpolation = "smooth" }`
    Keyframes {
        keyframes: Vec<(f32, f32)>,
        #[serde(default)]
        interpolation: Option<String>,
    },
    /// `v_by_x = { csv = "braking.csv" }`
    Csv {
        csv: String,
        #[serde(default)]
        interpolation: Option<String>,
    },
}

impl Default for EasingCfg {
    fn default() -> Self {
        EasingCfg::Curve("linear".into())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProfileCfg {
    pub v_scale: f32,
    pub startup_t: f32,
    pub braking_x: f32,
    pub v_by_t: EasingCfg,
    pub v_by_x: EasingCfg,
    pub x_min: f32,
    pub v_min: f32,
}

impl Default for ProfileCfg {
    fn default() -> Self {
        Self {
            v_scale: 12.0,
            startup_t: 0.25,
            braking_x: 2.0,
            v_by_t: EasingCfg::default(),
            v_by_x: EasingCfg::default(),
            x_min: 1e-6,
            v_min: 1e-6,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PidCfg {
    pub gain: f32,
    pub i_time: f32,
    pub d_time: f32,
    pub max_in: f32,
    pub max_out: f32,
}

impl Default for PidCfg {
    fn default() -> Self {
        Self {
            gain: 12.0,
            i_time: 2.0,
            d_time: 2.0,
            max_in: 36.0,
            max_out: 36.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModeCfg {
    Velocity,
    #[default]
    Force,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct AcceleratorCfg {
    /// "velocity" writes the target velocity; "force" runs the PID.
    pub mode: ModeCfg,
    pub converge_timeout: f32,
    pub tolerance: f32,
}

impl Default for AcceleratorCfg {
    fn default() -> Self {
        Self {
            mode: ModeCfg::Force,
            converge_timeout: 15.0,
            tolerance: 1e-6,
        }
    }
}

/// Value space a simulated motion runs in.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    #[default]
    Scalar,
    Radians,
    Degrees,
    Vec2,
    Vec3,
    Vec4,
    Color,
}

impl Space {
    pub const ALL: [Space; 7] = [
        Space::Scalar,
        Space::Radians,
        Space::Degrees,
        Space::Vec2,
        Space::Vec3,
        Space::Vec4,
        Space::Color,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Space::Scalar => "scalar",
            Space::Radians => "radians",
            Space::Degrees => "degrees",
            Space::Vec2 => "vec2",
            Space::Vec3 => "vec3",
            Space::Vec4 => "vec4",
            Space::Color => "color",
        }
    }

    /// Whether a value with `n` components fits this space. Colors take
    /// RGB or RGBA.
    pub fn accepts_arity(self, n: usize) -> bool {
        match self {
            Space::Scalar | Space::Radians | Space::Degrees => n == 1,
            Space::Vec2 => n == 2,
            Space::Vec3 => n == 3,
            Space::Vec4 => n == 4,
            Space::Color => n == 3 || n == 4,
        }
    }

    /// Half a turn for angle spaces. Velocities and forces are wrapped
    /// angles there, so magnitudes at or past it alias.
    pub fn half_period(self) -> Option<f32> {
        match self {
            Space::Radians => Some(std::f32::consts::PI),
            Space::Degrees => Some(180.0),
            _ => None,
        }
    }
}

impl std::str::FromStr for Space {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Space::ALL
            .into_iter()
            .find(|sp| sp.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown space '{s}'"))
    }
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_max_ticks() -> u64 {
    60 * 60
}

fn default_mass() -> f32 {
    1.0
}

fn default_start_position() -> Vec<f32> {
    vec![0.0]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimCfg {
    #[serde(default)]
    pub space: Space,
    /// Tick length in seconds.
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Pace ticks in real time instead of running flat out.
    #[serde(default)]
    pub realtime: bool,
    /// Seconds after start before convergence checking begins.
    #[serde(default)]
    pub converge_after: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default = "default_start_position")]
    pub start_position: Vec<f32>,
    /// Zero when absent.
    #[serde(default)]
    pub start_velocity: Option<Vec<f32>>,
    pub target: Vec<f32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
    /// JSON output on stderr.
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileCfg,
    #[serde(default)]
    pub pid: PidCfg,
    #[serde(default)]
    pub accelerator: AcceleratorCfg,
    pub sim: SimCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read keyframes from a CSV file with exact `t,value` headers.
pub fn load_keyframes_csv(path: &Path) -> eyre::Result<Vec<(f32, f32)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open keyframe CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["t", "value"];
    let actual: Vec<String> = headers.iter().map(ToString::to_string).collect();
    if actual != expected {
        eyre::bail!(
            "keyframe CSV must have headers 't,value', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<KeyframeRow>().enumerate() {
        match rec {
            Ok(row) => rows.push((row.t, row.value)),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    check_keyframes("keyframe CSV", &rows)?;
    Ok(rows)
}

fn check_keyframes(what: &str, samples: &[(f32, f32)]) -> eyre::Result<()> {
    if samples.is_empty() {
        eyre::bail!("{what}: needs at least one keyframe");
    }
    if samples.iter().any(|(t, v)| !t.is_finite() || !v.is_finite()) {
        eyre::bail!("{what}: keyframes must be finite");
    }
    if let Some(i) = samples.windows(2).position(|w| w[1].0 <= w[0].0) {
        eyre::bail!(
            "{what}: keyframe times must be strictly increasing (index {})",
            i + 1
        );
    }
    Ok(())
}

fn check_easing(what: &str, e: &EasingCfg) -> eyre::Result<()> {
    match e {
        EasingCfg::Curve(name) if name.trim().is_empty() => {
            eyre::bail!("{what}: curve name must not be empty")
        }
        EasingCfg::Curve(_) => Ok(()),
        EasingCfg::Keyframes { keyframes, .. } => check_keyframes(what, keyframes),
        EasingCfg::Csv { csv, .. } if csv.trim().is_empty() => {
            eyre::bail!("{what}: csv path must not be empty")
        }
        EasingCfg::Csv { .. } => Ok(()),
    }
}

fn check_finite(what: &str, v: f32) -> eyre::Result<()> {
    if !v.is_finite() {
        eyre::bail!("{what} must be finite");
    }
    Ok(())
}

fn check_value(what: &str, space: Space, v: &[f32]) -> eyre::Result<()> {
    if !space.accepts_arity(v.len()) {
        eyre::bail!(
            "{what} has {} components, which does not fit space '{}'",
            v.len(),
            space.name()
        );
    }
    if v.iter().any(|c| !c.is_finite()) {
        eyre::bail!("{what} must be finite");
    }
    Ok(())
}

impl Config {
    /// Replace every CSV-backed easing entry with its loaded keyframes.
    /// Relative paths resolve against `base_dir`.
    pub fn inline_keyframes(&mut self, base_dir: &Path) -> eyre::Result<()> {
        for easing in [&mut self.profile.v_by_t, &mut self.profile.v_by_x] {
            if let EasingCfg::Csv { csv, interpolation } = easing {
                let path = base_dir.join(csv.as_str());
                let interpolation = interpolation.take();
                let keyframes = load_keyframes_csv(&path)?;
                *easing = EasingCfg::Keyframes {
                    keyframes,
                    interpolation,
                };
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> eyre::Result<()> {
        // Profile
        let p = &self.profile;
        for (what, v) in [
            ("profile.v_scale", p.v_scale),
            ("profile.startup_t", p.startup_t),
            ("profile.braking_x", p.braking_x),
            ("profile.x_min", p.x_min),
            ("profile.v_min", p.v_min),
        ] {
            check_finite(what, v)?;
        }
        if p.v_scale < 0.0 {
            eyre::bail!("profile.v_scale must be >= 0");
        }
        if p.x_min < 0.0 {
            eyre::bail!("profile.x_min must be >= 0");
        }
        if p.v_min < 0.0 {
            eyre::bail!("profile.v_min must be >= 0");
        }
        check_easing("profile.v_by_t", &p.v_by_t)?;
        check_easing("profile.v_by_x", &p.v_by_x)?;

        // PID
        let pid = &self.pid;
        for (what, v) in [
            ("pid.gain", pid.gain),
            ("pid.i_time", pid.i_time),
            ("pid.d_time", pid.d_time),
            ("pid.max_in", pid.max_in),
            ("pid.max_out", pid.max_out),
        ] {
            check_finite(what, v)?;
        }
        if pid.i_time <= 0.0 {
            eyre::bail!("pid.i_time must be > 0");
        }
        if pid.d_time < 0.0 {
            eyre::bail!("pid.d_time must be >= 0");
        }
        if pid.max_in <= 0.0 {
            eyre::bail!("pid.max_in must be > 0");
        }
        if pid.max_out <= 0.0 {
            eyre::bail!("pid.max_out must be > 0");
        }

        // Accelerator
        let a = &self.accelerator;
        if a.converge_timeout.is_nan() || a.converge_timeout <= 0.0 {
            eyre::bail!("accelerator.converge_timeout must be > 0");
        }
        check_finite("accelerator.tolerance", a.tolerance)?;
        if a.tolerance < 0.0 {
            eyre::bail!("accelerator.tolerance must be >= 0");
        }

        // Sim
        let s = &self.sim;
        check_finite("sim.dt", s.dt)?;
        if s.dt <= 0.0 {
            eyre::bail!("sim.dt must be > 0");
        }
        if s.max_ticks == 0 {
            eyre::bail!("sim.max_ticks must be >= 1");
        }
        check_finite("sim.converge_after", s.converge_after)?;
        if s.converge_after < 0.0 {
            eyre::bail!("sim.converge_after must be >= 0");
        }
        check_finite("sim.mass", s.mass)?;
        if s.mass <= 0.0 {
            eyre::bail!("sim.mass must be > 0");
        }
        check_value("sim.start_position", s.space, &s.start_position)?;
        if let Some(v) = &s.start_velocity {
            check_value("sim.start_velocity", s.space, v)?;
        }
        check_value("sim.target", s.space, &s.target)?;
        if let Some(half) = s.space.half_period() {
            if p.v_scale >= half {
                eyre::bail!(
                    "profile.v_scale must be < {half} in space '{}'",
                    s.space.name()
                );
            }
            if a.mode == ModeCfg::Force && pid.max_out >= half {
                eyre::bail!(
                    "pid.max_out must be < {half} in space '{}' with force mode",
                    s.space.name()
                );
            }
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_takes_defaults() {
        let cfg = load_toml("[sim]\ntarget = [10.0]\n").unwrap();
        assert_eq!(cfg.sim.space, Space::Scalar);
        assert_eq!(cfg.sim.start_position, vec![0.0]);
        assert_eq!(cfg.pid.gain, 12.0);
        assert_eq!(cfg.accelerator.mode, ModeCfg::Force);
        assert_eq!(cfg.profile.v_by_t, EasingCfg::Curve("linear".into()));
        cfg.validate().unwrap();
    }

    #[test]
    fn easing_forms_parse() {
        let cfg = load_toml(
            r#"
[profile]
v_by_t = "in-out-quad"
v_by_x = { keyframes = [[0.0, 0.0], [1.0, 1.0]], interpolation = "smooth" }

[sim]
target = [1.0]
"#,
        )
        .unwrap();
        assert_eq!(cfg.profile.v_by_t, EasingCfg::Curve("in-out-quad".into()));
        assert!(matches!(
            &cfg.profile.v_by_x,
            EasingCfg::Keyframes { keyframes, interpolation: Some(i) }
                if keyframes.len() == 2 && i == "smooth"
        ));
    }

    #[test]
    fn space_names_parse() {
        assert_eq!("Vec3".parse::<Space>().unwrap(), Space::Vec3);
        assert!("vec5".parse::<Space>().is_err());
        assert!(Space::Color.accepts_arity(3));
        assert!(Space::Color.accepts_arity(4));
        assert!(!Space::Vec2.accepts_arity(3));
    }
}
