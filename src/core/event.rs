use crate::error::{Error, Result};
use ordered_float::NotNan;
use serde::Serialize;
use std::cmp::Ordering;

/// Kinds of contacts the engine resolves.
///
/// Within one step the wall test runs before the block test, so `Wall` < `Block`
/// when two contacts share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContactKind {
    /// Small block reflected off the wall.
    Wall,
    /// Elastic exchange between the two blocks.
    Block,
}

impl ContactKind {
    #[inline]
    fn order_key(&self) -> u8 {
        match *self {
            ContactKind::Wall => 0,
            ContactKind::Block => 1,
        }
    }
}

/// A resolved contact with a deterministic total order.
///
/// - `time`: elapsed simulation time at the end of the step (finite, non-NaN).
/// - `step`: 1-based step index in which the contact fired.
/// - `kind`: wall or block contact.
/// - `count`: collision count after this contact was tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub time: NotNan<f64>,
    pub step: u64,
    pub kind: ContactKind,
    pub count: u64,
}

impl Contact {
    /// Create a new contact record, validating that time is finite and non-NaN.
    pub fn new(time: f64, step: u64, kind: ContactKind, count: u64) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::NumericalDrift(format!(
                "contact time must be finite, got {time}"
            )));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::NumericalDrift("contact time cannot be NaN".into()))?;
        Ok(Self {
            time,
            step,
            kind,
            count,
        })
    }

    /// Returns the raw f64 contact time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }
}

impl Ord for Contact {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.step.cmp(&other.step))
            .then(self.kind.order_key().cmp(&other.kind.order_key()))
            .then(self.count.cmp(&other.count))
    }
}

impl PartialOrd for Contact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ContactKind::{Block, Wall};

    #[test]
    fn new_contact_rejects_nan_time() {
        let err = Contact::new(f64::NAN, 1, Block, 1).unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn new_contact_rejects_infinite_time() {
        assert!(Contact::new(f64::INFINITY, 1, Wall, 1).is_err());
    }

    #[test]
    fn ordering_by_time() -> Result<()> {
        let c1 = Contact::new(1.0, 10, Block, 1)?;
        let c2 = Contact::new(2.0, 20, Wall, 2)?;
        assert!(c1 < c2);
        Ok(())
    }

    #[test]
    fn same_step_orders_wall_before_block() -> Result<()> {
        let w = Contact::new(0.5, 500, Wall, 4)?;
        let b = Contact::new(0.5, 500, Block, 5)?;
        assert!(w < b);
        let mut v = vec![b, w];
        v.sort();
        assert_eq!(v[0].kind, Wall);
        Ok(())
    }
}
