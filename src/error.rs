use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the collision engine, its configuration and the sweep harness.
///
/// Each variant carries enough context to tell which run or parameter failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected initial configuration (masses, extents, time step, geometry, tolerances).
    #[error("invalid initial configuration: {0}")]
    InvalidConfig(String),

    /// The divergence predicate was not reached within the step budget.
    #[error(
        "did not converge within {steps} steps (elapsed {elapsed:.6}, {collisions} collisions so far)"
    )]
    NonConvergence {
        steps: u64,
        elapsed: f64,
        collisions: u64,
    },

    /// Energy or momentum drifted past the configured tolerance.
    #[error("numerical drift: {0}")]
    NumericalDrift(String),

    /// Propagated I/O errors (config files, result exports).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed YAML configuration.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization of results.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidConfig("dt must be finite and > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid initial configuration"));
        assert!(msg.contains("dt"));
    }

    #[test]
    fn non_convergence_reports_budget() {
        let e = Error::NonConvergence {
            steps: 1000,
            elapsed: 1.5,
            collisions: 7,
        };
        let msg = e.to_string();
        assert!(msg.contains("1000 steps"));
        assert!(msg.contains("7 collisions"));
    }

    #[test]
    fn result_type_alias_compiles() -> Result<()> {
        Ok(())
    }
}
