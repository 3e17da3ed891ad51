use crate::error::{Error, Result};

/// A rigid block constrained to the x axis.
///
/// Fields:
/// - `position`: centre of the block
/// - `velocity`: signed speed along x
/// - `mass`: block mass (> 0)
/// - `half_extent`: half of the block's edge length (> 0, fixed)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Centre position.
    pub position: f64,
    /// Signed velocity.
    pub velocity: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Half of the edge length (> 0).
    pub half_extent: f64,
}

impl Body {
    /// Create a new body after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidConfig` if `mass` or `half_extent` is non-positive or any value is NaN/inf.
    pub fn new(position: f64, velocity: f64, mass: f64, half_extent: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidConfig("mass must be finite and > 0".into()));
        }
        if !half_extent.is_finite() || half_extent <= 0.0 {
            return Err(Error::InvalidConfig(
                "half_extent must be finite and > 0".into(),
            ));
        }
        if !position.is_finite() {
            return Err(Error::InvalidConfig("position must be finite".into()));
        }
        if !velocity.is_finite() {
            return Err(Error::InvalidConfig("velocity must be finite".into()));
        }
        Ok(Self {
            position,
            velocity,
            mass,
            half_extent,
        })
    }

    /// Face pointing towards the wall (smaller x).
    #[inline]
    pub fn left_face(&self) -> f64 {
        self.position - self.half_extent
    }

    /// Face pointing away from the wall (larger x).
    #[inline]
    pub fn right_face(&self) -> f64 {
        self.position + self.half_extent
    }

    /// Linear drift over `dt`.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Returns the body's kinetic energy: 1/2 m v^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity * self.velocity
    }

    /// Returns the body's momentum: m v.
    #[inline]
    pub fn momentum(&self) -> f64 {
        self.mass * self.velocity
    }
}

/// Immovable wall (infinite mass) at a fixed x position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub position: f64,
}

impl Wall {
    pub fn new(position: f64) -> Result<Self> {
        if !position.is_finite() {
            return Err(Error::InvalidConfig("wall position must be finite".into()));
        }
        Ok(Self { position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_body_ok() -> Result<()> {
        let b = Body::new(-15.0, 0.0, 1.0, 1.0)?;
        assert_eq!(b.position, -15.0);
        assert_eq!(b.velocity, 0.0);
        assert_eq!(b.mass, 1.0);
        assert_eq!(b.half_extent, 1.0);
        assert_eq!(b.left_face(), -16.0);
        assert_eq!(b.right_face(), -14.0);
        Ok(())
    }

    #[test]
    fn invalid_mass_rejected() {
        let err = Body::new(0.0, 0.0, 0.0, 1.0).unwrap_err();
        assert!(err.to_string().contains("mass"));
        let err = Body::new(0.0, 0.0, -3.0, 1.0).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn invalid_extent_rejected() {
        let err = Body::new(0.0, 0.0, 1.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("half_extent"));
    }

    #[test]
    fn non_finite_state_rejected() {
        assert!(Body::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(Body::new(0.0, f64::INFINITY, 1.0, 1.0).is_err());
        assert!(Wall::new(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn energy_and_momentum() -> Result<()> {
        let b = Body::new(0.0, -10.0, 4.0, 2.5)?;
        assert!((b.kinetic_energy() - 200.0).abs() < 1e-12);
        assert!((b.momentum() + 40.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn advance_is_linear_drift() -> Result<()> {
        let mut b = Body::new(1.0, -2.0, 1.0, 0.5)?;
        b.advance(0.25);
        assert!((b.position - 0.5).abs() < 1e-15);
        assert_eq!(b.velocity, -2.0);
        Ok(())
    }
}
