use crate::config::SimulationConfig;
use crate::core::event::{Contact, ContactKind};
use crate::core::observer::{NoopObserver, Snapshot, StepObserver};
use crate::core::{Body, Wall};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use serde::Serialize;

/// Elastic exchange between masses `big_mass` (velocity `big_velocity`) and
/// `small_mass` (velocity `small_velocity`). Returns `(big', small')`.
///
/// Conserves momentum and kinetic energy up to rounding.
#[inline]
pub fn elastic_velocities(
    big_mass: f64,
    big_velocity: f64,
    small_mass: f64,
    small_velocity: f64,
) -> (f64, f64) {
    let total = big_mass + small_mass;
    let big_new =
        ((big_mass - small_mass) * big_velocity + 2.0 * small_mass * small_velocity) / total;
    let small_new =
        ((small_mass - big_mass) * small_velocity + 2.0 * big_mass * big_velocity) / total;
    (big_new, small_new)
}

/// Reflection off an immovable wall.
#[inline]
pub fn reflect(velocity: f64) -> f64 {
    -velocity
}

/// What happened during one call to [`CollisionSimulator::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub wall_contact: bool,
    pub block_contact: bool,
    /// At least one contact in this step fired after crossing its contact plane.
    pub overshoot: bool,
    /// The divergence predicate holds after this step.
    pub diverging: bool,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunReport {
    pub collision_count: u64,
    pub steps: u64,
    pub elapsed: f64,
    pub big_position: f64,
    pub small_position: f64,
    pub big_velocity: f64,
    pub small_velocity: f64,
    pub overshoots: u64,
    pub max_energy_drift: f64,
}

/// Fixed-step engine for two blocks on a line in front of a wall.
///
/// Per step, both blocks drift by `velocity * dt`, then the wall test and the block
/// test run independently; either, both or neither may fire. Positions are never
/// corrected, only velocities change at a contact.
#[derive(Debug, Clone)]
pub struct CollisionSimulator {
    big: Body,
    small: Body,
    wall: Wall,
    wall_tolerance: f64,
    stop_boundary: f64,
    dt: f64,
    max_steps: u64,
    drift_check_interval: u64,
    drift_tolerance: f64,
    collision_count: u64,
    steps: u64,
    overshoots: u64,
    initial_energy: f64,
    max_energy_drift: f64,
    // Contacts of the most recent step.
    contacts: Vec<Contact>,
}

impl CollisionSimulator {
    /// Create a simulator from a validated configuration.
    ///
    /// Errors: `Error::InvalidConfig` for any rejected field or degenerate geometry.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let (big, small, wall) = config.validate()?;
        let initial_energy = big.kinetic_energy() + small.kinetic_energy();
        Ok(Self {
            big,
            small,
            wall,
            wall_tolerance: config.wall_tolerance,
            stop_boundary: config.stop_boundary,
            dt: config.dt,
            max_steps: config.max_steps,
            drift_check_interval: config.drift_check_interval,
            drift_tolerance: config.drift_tolerance,
            collision_count: 0,
            steps: 0,
            overshoots: 0,
            initial_energy,
            max_energy_drift: 0.0,
            contacts: Vec::with_capacity(2),
        })
    }

    pub fn big(&self) -> &Body {
        &self.big
    }

    pub fn small(&self) -> &Body {
        &self.small
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time so far.
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Contacts that fired in the most recent step, in resolution order.
    pub fn last_contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn overshoots(&self) -> u64 {
        self.overshoots
    }

    /// Total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.big.kinetic_energy() + self.small.kinetic_energy()
    }

    /// Total momentum of both blocks (the wall is excluded, so this is not conserved overall).
    pub fn momentum(&self) -> f64 {
        self.big.momentum() + self.small.momentum()
    }

    /// True once the big block is past the stop boundary and moving away faster
    /// than the small block, so no further contact can happen.
    pub fn is_diverging(&self) -> bool {
        self.big.right_face() > self.stop_boundary
            && self.big.velocity > 0.0
            && self.small.velocity >= 0.0
            && self.small.velocity < self.big.velocity
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.steps,
            elapsed: self.elapsed(),
            big_position: self.big.position,
            small_position: self.small.position,
            big_velocity: self.big.velocity,
            small_velocity: self.small.velocity,
            big_mass: self.big.mass,
            small_mass: self.small.mass,
            collision_count: self.collision_count,
        }
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            collision_count: self.collision_count,
            steps: self.steps,
            elapsed: self.elapsed(),
            big_position: self.big.position,
            small_position: self.small.position,
            big_velocity: self.big.velocity,
            small_velocity: self.small.velocity,
            overshoots: self.overshoots,
            max_energy_drift: self.max_energy_drift,
        }
    }

    /// Advance by one fixed step and resolve any contacts.
    pub fn step(&mut self) -> Result<StepOutcome> {
        self.contacts.clear();
        self.big.advance(self.dt);
        self.small.advance(self.dt);
        self.steps += 1;

        let mut outcome = StepOutcome::default();

        if self.small.left_face() <= self.wall.position + self.wall_tolerance {
            self.small.velocity = reflect(self.small.velocity);
            self.collision_count += 1;
            self.record_contact(ContactKind::Wall)?;
            outcome.wall_contact = true;
            if self.small.left_face() < self.wall.position {
                self.overshoots += 1;
                outcome.overshoot = true;
            }
        }

        if self.small.right_face() >= self.big.left_face() {
            self.resolve_block_contact()?;
            self.collision_count += 1;
            self.record_contact(ContactKind::Block)?;
            outcome.block_contact = true;
            if self.small.left_face() > self.big.right_face() {
                self.overshoots += 1;
                outcome.overshoot = true;
            }
        }

        if self.drift_check_interval > 0 && self.steps % self.drift_check_interval == 0 {
            self.check_energy()?;
        }

        outcome.diverging = self.is_diverging();
        Ok(outcome)
    }

    /// Run to the divergence predicate without instrumentation.
    pub fn run(&mut self) -> Result<RunReport> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Run to the divergence predicate, calling `observer` after every step.
    ///
    /// Errors:
    /// - `Error::NonConvergence` if `max_steps` is exhausted first.
    /// - `Error::NumericalDrift` if energy or momentum leave the tolerance.
    pub fn run_with_observer<O>(&mut self, observer: &mut O) -> Result<RunReport>
    where
        O: StepObserver + ?Sized,
    {
        debug!(
            "run start: M={} m={} dt={} budget={} steps",
            self.big.mass, self.small.mass, self.dt, self.max_steps
        );
        loop {
            if self.steps >= self.max_steps {
                return Err(Error::NonConvergence {
                    steps: self.steps,
                    elapsed: self.elapsed(),
                    collisions: self.collision_count,
                });
            }
            let outcome = self.step()?;
            observer.on_step(&self.snapshot(), &self.contacts);
            if outcome.diverging {
                break;
            }
        }
        self.check_energy()?;

        if self.overshoots > 0 {
            warn!(
                "{} of {} contacts fired after crossing the contact plane (M={}, dt={}); count may be inaccurate",
                self.overshoots, self.collision_count, self.big.mass, self.dt
            );
        }
        info!(
            "run done: M={} collisions={} steps={} elapsed={:.6}",
            self.big.mass,
            self.collision_count,
            self.steps,
            self.elapsed()
        );
        Ok(self.report())
    }

    // ============ Internal helpers ============

    fn record_contact(&mut self, kind: ContactKind) -> Result<()> {
        let contact = Contact::new(self.elapsed(), self.steps, kind, self.collision_count)?;
        self.contacts.push(contact);
        Ok(())
    }

    fn resolve_block_contact(&mut self) -> Result<()> {
        let (m_big, m_small) = (self.big.mass, self.small.mass);
        let (v_big, v_small) = (self.big.velocity, self.small.velocity);
        let (v_big_new, v_small_new) = elastic_velocities(m_big, v_big, m_small, v_small);

        let before = m_big * v_big + m_small * v_small;
        let after = m_big * v_big_new + m_small * v_small_new;
        let scale = m_big * v_big.abs() + m_small * v_small.abs();
        if (after - before).abs() > self.drift_tolerance * scale {
            return Err(Error::NumericalDrift(format!(
                "momentum changed from {before} to {after} at step {}",
                self.steps
            )));
        }

        self.big.velocity = v_big_new;
        self.small.velocity = v_small_new;
        Ok(())
    }

    fn check_energy(&mut self) -> Result<()> {
        let e = self.kinetic_energy();
        let drift = if self.initial_energy > 0.0 {
            ((e - self.initial_energy) / self.initial_energy).abs()
        } else {
            e.abs()
        };
        if drift > self.max_energy_drift {
            self.max_energy_drift = drift;
        }
        if drift > self.drift_tolerance {
            return Err(Error::NumericalDrift(format!(
                "relative energy drift {drift:e} exceeds {:e} at step {}",
                self.drift_tolerance, self.steps
            )));
        }
        Ok(())
    }
}
