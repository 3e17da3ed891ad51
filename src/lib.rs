//! Two blocks, one wall, and a collision count that spells out π.
//!
//! A heavy block slides towards a light block resting in front of a wall. With
//! a mass ratio of `100^i`, the number of elastic contacts (block–block plus
//! block–wall) before the blocks separate for good is `⌊π · 10^i⌋`.
//!
//! - [`core::CollisionSimulator`] advances the two blocks with a fixed time step,
//!   resolves contacts and stops once the blocks diverge.
//! - [`sweep::ExperimentSweep`] repeats the run for `i = 0..=max_decade`.
//! - [`config`] holds the serde/YAML configuration for both.
//!
//! ```
//! use pisim::config::SimulationConfig;
//! use pisim::core::CollisionSimulator;
//!
//! let mut sim = CollisionSimulator::new(&SimulationConfig::default())?;
//! assert_eq!(sim.run()?.collision_count, 3);
//! # Ok::<(), pisim::error::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod sweep;

#[cfg(feature = "python")]
mod python;

pub use crate::config::{SimulationConfig, SweepConfig};
pub use crate::core::CollisionSimulator;
pub use crate::sweep::{ExperimentResult, ExperimentSweep};
