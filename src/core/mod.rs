//! Core engine types: blocks, contact records, step observers and the simulator.

pub mod body;
pub mod event;
pub mod observer;
pub mod sim;

pub use body::{Body, Wall};
pub use event::{Contact, ContactKind};
pub use observer::{from_fn, ContactLog, NoopObserver, Snapshot, StepObserver};
pub use sim::{elastic_velocities, reflect, CollisionSimulator, RunReport, StepOutcome};
