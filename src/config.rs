//! Configuration types for the collision engine and the mass-ratio sweep.
//!
//! Both types are `serde`-(de)serializable with defaults matching the classic
//! two-block setup, so a YAML file only needs the fields it changes:
//!
//! ```yaml
//! simulation:
//!   wall_position: -30.0
//!   wall_tolerance: 0.1     # contact zone in front of the wall, >= 0
//!   stop_boundary: 15.0     # big block must pass this to end the run
//!   max_steps: 20000000
//!   big:   { position: 0.0,   velocity: -10.0, mass: 1.0, half_extent: 2.5 }
//!   small: { position: -15.0, velocity: 0.0,   mass: 1.0, half_extent: 1.0 }
//! mass_base: 100.0
//! max_decade: 5
//! dt_schedule: { base: 1.0e-3, floor: 1.0e-6, ceiling: 1.0e-3 }
//! ```

use crate::core::{Body, Wall};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Initial state of one block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub position: f64,
    pub velocity: f64,
    pub mass: f64,
    pub half_extent: f64,
}

impl BodyConfig {
    /// Build the runtime body, validating mass, extent and finiteness.
    pub fn build(&self) -> Result<Body> {
        Body::new(self.position, self.velocity, self.mass, self.half_extent)
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// x position of the immovable wall.
    pub wall_position: f64,
    /// Heavy block, launched towards the wall.
    pub big: BodyConfig,
    /// Light block, between the wall and the big block.
    pub small: BodyConfig,
    /// Width of the contact zone in front of the wall. Valid range: `[0, gap)` where
    /// `gap` is the initial distance between the wall and the small block.
    pub wall_tolerance: f64,
    /// The run may only end once the big block's right face is past this x.
    pub stop_boundary: f64,
    /// Fixed integration step (> 0).
    pub dt: f64,
    /// Step budget; exhausting it is a non-convergence error.
    pub max_steps: u64,
    /// Steps between energy drift checks; 0 disables the periodic check.
    pub drift_check_interval: u64,
    /// Relative tolerance for energy and momentum conservation checks.
    pub drift_tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            wall_position: -30.0,
            big: BodyConfig {
                position: 0.0,
                velocity: -10.0,
                mass: 1.0,
                half_extent: 2.5,
            },
            small: BodyConfig {
                position: -15.0,
                velocity: 0.0,
                mass: 1.0,
                half_extent: 1.0,
            },
            wall_tolerance: 0.1,
            stop_boundary: 15.0,
            dt: 1e-3,
            max_steps: 20_000_000,
            drift_check_interval: 10_000,
            drift_tolerance: 1e-9,
        }
    }
}

impl SimulationConfig {
    /// Validate every field and the initial geometry; returns the runtime bodies and wall.
    pub fn validate(&self) -> Result<(Body, Body, Wall)> {
        let big = self.big.build()?;
        let small = self.small.build()?;
        let wall = Wall::new(self.wall_position)?;

        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::InvalidConfig("dt must be finite and > 0".into()));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfig("max_steps must be > 0".into()));
        }
        if !self.wall_tolerance.is_finite() || self.wall_tolerance < 0.0 {
            return Err(Error::InvalidConfig(
                "wall_tolerance must be finite and >= 0".into(),
            ));
        }
        if !self.drift_tolerance.is_finite() || self.drift_tolerance <= 0.0 {
            return Err(Error::InvalidConfig(
                "drift_tolerance must be finite and > 0".into(),
            ));
        }
        if !self.stop_boundary.is_finite() || self.stop_boundary <= wall.position {
            return Err(Error::InvalidConfig(
                "stop_boundary must be finite and to the right of the wall".into(),
            ));
        }
        if small.left_face() <= wall.position + self.wall_tolerance {
            return Err(Error::InvalidConfig(format!(
                "small block (left face {}) starts inside the wall contact zone (<= {})",
                small.left_face(),
                wall.position + self.wall_tolerance
            )));
        }
        if small.right_face() >= big.left_face() {
            return Err(Error::InvalidConfig(format!(
                "blocks overlap initially (small right face {} >= big left face {})",
                small.right_face(),
                big.left_face()
            )));
        }
        Ok((big, small, wall))
    }
}

/// Time step per decade: `clamp(base * 10^-i, floor, ceiling)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DtSchedule {
    pub base: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for DtSchedule {
    fn default() -> Self {
        Self {
            base: 1e-3,
            floor: 1e-6,
            ceiling: 1e-3,
        }
    }
}

impl DtSchedule {
    /// Step size for decade `i`.
    pub fn dt_for(&self, decade: u32) -> f64 {
        let raw = self.base * 10f64.powi(-(decade as i32));
        raw.max(self.floor).min(self.ceiling)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("base", self.base),
            ("floor", self.floor),
            ("ceiling", self.ceiling),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "dt_schedule.{name} must be finite and > 0"
                )));
            }
        }
        if self.floor > self.ceiling {
            return Err(Error::InvalidConfig(
                "dt_schedule.floor must not exceed dt_schedule.ceiling".into(),
            ));
        }
        Ok(())
    }
}

/// Mass-ratio sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Template run; `big.mass` and `dt` are overridden per decade.
    pub simulation: SimulationConfig,
    /// Big block mass for decade `i` is `small.mass * mass_base^i`.
    pub mass_base: f64,
    /// Last decade, inclusive.
    pub max_decade: u32,
    pub dt_schedule: DtSchedule,
    /// Sleep between runs, for interactive observers.
    pub pause_between_runs_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            mass_base: 100.0,
            max_decade: 5,
            dt_schedule: DtSchedule::default(),
            pause_between_runs_ms: 0,
        }
    }
}

impl SweepConfig {
    /// Load a sweep configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let cfg: SweepConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a sweep configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: SweepConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mass_base.is_finite() || self.mass_base < 1.0 {
            return Err(Error::InvalidConfig(
                "mass_base must be finite and >= 1".into(),
            ));
        }
        self.dt_schedule.validate()?;
        for decade in 0..=self.max_decade {
            self.run_config(decade).validate()?;
        }
        Ok(())
    }

    /// Concrete run configuration for decade `i`.
    pub fn run_config(&self, decade: u32) -> SimulationConfig {
        let mut cfg = self.simulation.clone();
        cfg.big.mass = cfg.small.mass * self.mass_base.powi(decade as i32);
        cfg.dt = self.dt_schedule.dt_for(decade);
        cfg
    }
}
