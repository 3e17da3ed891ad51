//! Per-step instrumentation hooks.
//!
//! The simulator calls [`StepObserver::on_step`] once after every step with a
//! read-only [`Snapshot`] and the contacts resolved in that step. Observers are
//! boundary consumers (renderers, info panels, recorders) and cannot feed back
//! into the simulation state.

use crate::core::event::{Contact, ContactKind};
use serde::Serialize;
use std::fmt;

/// Read-only view of the simulation after one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub step: u64,
    pub elapsed: f64,
    pub big_position: f64,
    pub small_position: f64,
    pub big_velocity: f64,
    pub small_velocity: f64,
    pub big_mass: f64,
    pub small_mass: f64,
    pub collision_count: u64,
}

/// Four-line info panel: mass ratio, collisions and both velocities.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mass Ratio: {} : {}", self.small_mass, self.big_mass)?;
        writeln!(f, "Collisions: {}", self.collision_count)?;
        writeln!(f, "Big Block Velocity: {:.6}", self.big_velocity)?;
        write!(f, "Small Block Velocity: {:.6}", self.small_velocity)
    }
}

/// Hook invoked once per simulation step.
pub trait StepObserver {
    fn on_step(&mut self, snapshot: &Snapshot, contacts: &[Contact]);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    #[inline]
    fn on_step(&mut self, _snapshot: &Snapshot, _contacts: &[Contact]) {}
}

/// Adapter turning a closure into a [`StepObserver`]; see [`from_fn`].
pub struct FnObserver<F>(F);

/// Wrap a closure as an observer.
pub fn from_fn<F>(f: F) -> FnObserver<F>
where
    F: FnMut(&Snapshot, &[Contact]),
{
    FnObserver(f)
}

impl<F> StepObserver for FnObserver<F>
where
    F: FnMut(&Snapshot, &[Contact]),
{
    #[inline]
    fn on_step(&mut self, snapshot: &Snapshot, contacts: &[Contact]) {
        (self.0)(snapshot, contacts)
    }
}

/// Records every contact in resolution order.
#[derive(Debug, Default, Clone)]
pub struct ContactLog {
    contacts: Vec<Contact>,
}

impl ContactLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Number of recorded contacts of the given kind.
    pub fn count_of(&self, kind: ContactKind) -> usize {
        self.contacts.iter().filter(|c| c.kind == kind).count()
    }

    /// Contacts recorded with `time >= since`.
    pub fn since(&self, since: f64) -> impl Iterator<Item = &Contact> {
        self.contacts.iter().filter(move |c| c.time_f64() >= since)
    }
}

impl StepObserver for ContactLog {
    fn on_step(&mut self, _snapshot: &Snapshot, contacts: &[Contact]) {
        self.contacts.extend_from_slice(contacts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn snap() -> Snapshot {
        Snapshot {
            step: 3,
            elapsed: 0.003,
            big_position: -0.03,
            small_position: -15.0,
            big_velocity: -10.0,
            small_velocity: 0.0,
            big_mass: 100.0,
            small_mass: 1.0,
            collision_count: 2,
        }
    }

    #[test]
    fn panel_formats_four_lines() {
        let text = snap().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Mass Ratio: 1 : 100");
        assert_eq!(lines[1], "Collisions: 2");
        assert_eq!(lines[2], "Big Block Velocity: -10.000000");
        assert_eq!(lines[3], "Small Block Velocity: 0.000000");
    }

    #[test]
    fn contact_log_counts_by_kind() -> Result<()> {
        let mut log = ContactLog::new();
        let contacts = [
            Contact::new(0.1, 100, ContactKind::Block, 1)?,
            Contact::new(0.2, 200, ContactKind::Wall, 2)?,
            Contact::new(0.3, 300, ContactKind::Block, 3)?,
        ];
        log.on_step(&snap(), &contacts[..1]);
        log.on_step(&snap(), &contacts[1..]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.count_of(ContactKind::Block), 2);
        assert_eq!(log.count_of(ContactKind::Wall), 1);
        assert_eq!(log.since(0.2).count(), 2);
        Ok(())
    }

    #[test]
    fn closure_observer_is_called() {
        let mut calls = 0u32;
        {
            let mut obs = from_fn(|s: &Snapshot, _c: &[Contact]| {
                assert_eq!(s.step, 3);
                calls += 1;
            });
            obs.on_step(&snap(), &[]);
            obs.on_step(&snap(), &[]);
        }
        assert_eq!(calls, 2);
    }
}
