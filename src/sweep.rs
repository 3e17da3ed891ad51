//! Mass-ratio sweep: one fresh simulator per decade, collision counts normalized
//! so that they approach π.

use crate::config::SweepConfig;
use crate::core::{CollisionSimulator, NoopObserver, StepObserver};
use crate::error::Result;
use log::info;
use serde::Serialize;
use std::f64::consts::PI;
use std::ops::RangeInclusive;
use std::thread;
use std::time::Duration;

/// Outcome of one decade of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExperimentResult {
    /// Decade index `i`; the mass ratio is `mass_base^i`.
    pub decade: u32,
    pub mass_ratio: f64,
    pub dt: f64,
    pub collision_count: u64,
    /// `collision_count / sqrt(mass_ratio)`, i.e. `count / 10^i` for base 100.
    pub normalized_count: f64,
    pub steps: u64,
    pub big_velocity: f64,
    pub small_velocity: f64,
    pub overshoots: u64,
}

impl ExperimentResult {
    /// Absolute distance of the normalized count from π.
    pub fn pi_error(&self) -> f64 {
        (self.normalized_count - PI).abs()
    }
}

/// Runs the simulator once per decade and collects the results in order.
#[derive(Debug, Clone)]
pub struct ExperimentSweep {
    config: SweepConfig,
}

impl ExperimentSweep {
    /// Errors: `Error::InvalidConfig` if any decade's run configuration is invalid.
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn decades(&self) -> RangeInclusive<u32> {
        0..=self.config.max_decade
    }

    /// `(i, π)` pairs for a reference curve alongside the normalized counts.
    pub fn reference_curve(&self) -> Vec<(u32, f64)> {
        self.decades().map(|i| (i, PI)).collect()
    }

    /// Run a single decade.
    pub fn run_decade(&self, decade: u32) -> Result<ExperimentResult> {
        self.run_decade_with_observer(decade, &mut NoopObserver)
    }

    pub fn run_decade_with_observer(
        &self,
        decade: u32,
        observer: &mut dyn StepObserver,
    ) -> Result<ExperimentResult> {
        let cfg = self.config.run_config(decade);
        let mut sim = CollisionSimulator::new(&cfg)?;
        let report = sim.run_with_observer(observer)?;

        let mass_ratio = cfg.big.mass / cfg.small.mass;
        let result = ExperimentResult {
            decade,
            mass_ratio,
            dt: cfg.dt,
            collision_count: report.collision_count,
            normalized_count: report.collision_count as f64 / mass_ratio.sqrt(),
            steps: report.steps,
            big_velocity: report.big_velocity,
            small_velocity: report.small_velocity,
            overshoots: report.overshoots,
        };
        info!(
            "decade {}: ratio={} count={} normalized={:.6}",
            decade, mass_ratio, result.collision_count, result.normalized_count
        );
        Ok(result)
    }

    /// Run every decade in order. The first failing run aborts the sweep.
    pub fn run(&self) -> Result<Vec<ExperimentResult>> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Run every decade, sharing one observer across runs.
    pub fn run_with_observer(
        &self,
        observer: &mut dyn StepObserver,
    ) -> Result<Vec<ExperimentResult>> {
        let mut results = Vec::with_capacity(self.config.max_decade as usize + 1);
        for decade in self.decades() {
            results.push(self.run_decade_with_observer(decade, observer)?);
            if self.config.pause_between_runs_ms > 0 && decade < self.config.max_decade {
                thread::sleep(Duration::from_millis(self.config.pause_between_runs_ms));
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn reference_curve_covers_every_decade() -> Result<()> {
        let sweep = ExperimentSweep::new(SweepConfig::default())?;
        let curve = sweep.reference_curve();
        assert_eq!(curve.len(), 6);
        assert_eq!(curve[0], (0, PI));
        assert_eq!(curve[5].0, 5);
        Ok(())
    }

    #[test]
    fn first_two_decades() -> Result<()> {
        let cfg = SweepConfig {
            max_decade: 1,
            ..Default::default()
        };
        let results = ExperimentSweep::new(cfg)?.run()?;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].collision_count, 3);
        assert_eq!(results[0].normalized_count, 3.0);
        assert_eq!(results[1].mass_ratio, 100.0);
        assert_eq!(results[1].collision_count, 31);
        assert!((results[1].normalized_count - 3.1).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn invalid_template_rejected_up_front() {
        let mut cfg = SweepConfig::default();
        cfg.simulation.small.half_extent = -1.0;
        assert!(matches!(
            ExperimentSweep::new(cfg),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn failing_run_aborts_sweep() -> Result<()> {
        let mut cfg = SweepConfig {
            max_decade: 2,
            ..Default::default()
        };
        cfg.simulation.max_steps = 10_000;
        // Decade 0 needs ~6.3k steps; decade 1 needs ~63k and must fail.
        let err = ExperimentSweep::new(cfg)?.run().unwrap_err();
        assert!(matches!(err, Error::NonConvergence { .. }));
        Ok(())
    }
}
