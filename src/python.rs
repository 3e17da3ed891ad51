use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{SimulationConfig, SweepConfig};
use crate::core::CollisionSimulator;
use crate::sweep::ExperimentSweep;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around one two-block run.
///
/// API:
/// - __new__(mass_ratio=1.0, dt=1e-3, wall_tolerance=0.1, stop_boundary=15.0, max_steps=20_000_000)
/// - step() -> (wall_contact, block_contact, diverging)
/// - run() -> collision count
/// - state() -> (big_position, small_position, big_velocity, small_velocity)
#[pyclass]
pub struct BlockSim {
    sim: CollisionSimulator,
}

#[pymethods]
impl BlockSim {
    /// Build the default two-block scene with `big.mass = mass_ratio * small.mass`.
    ///
    /// Errors: raises ValueError on an invalid configuration.
    #[new]
    #[pyo3(signature = (mass_ratio=1.0, dt=1e-3, wall_tolerance=0.1, stop_boundary=15.0, max_steps=20_000_000))]
    fn new(
        mass_ratio: f64,
        dt: f64,
        wall_tolerance: f64,
        stop_boundary: f64,
        max_steps: u64,
    ) -> PyResult<Self> {
        let mut cfg = SimulationConfig {
            dt,
            wall_tolerance,
            stop_boundary,
            max_steps,
            ..Default::default()
        };
        cfg.big.mass = cfg.small.mass * mass_ratio;
        let sim = CollisionSimulator::new(&cfg).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Advance one step for frame-by-frame rendering.
    fn step(&mut self) -> PyResult<(bool, bool, bool)> {
        let out = self.sim.step().map_err(py_err)?;
        Ok((out.wall_contact, out.block_contact, out.diverging))
    }

    /// Run until the blocks diverge (releases the GIL during computation).
    fn run(&mut self, py: Python<'_>) -> PyResult<u64> {
        let sim = &mut self.sim;
        let report = py
            .detach(|| sim.run().map_err(|e| e.to_string()))
            .map_err(py_err)?;
        Ok(report.collision_count)
    }

    fn state(&self) -> (f64, f64, f64, f64) {
        let s = self.sim.snapshot();
        (
            s.big_position,
            s.small_position,
            s.big_velocity,
            s.small_velocity,
        )
    }

    #[getter]
    fn collision_count(&self) -> u64 {
        self.sim.collision_count()
    }

    #[getter]
    fn elapsed(&self) -> f64 {
        self.sim.elapsed()
    }

    /// Four-line text panel (mass ratio, collisions, velocities).
    fn info_panel(&self) -> String {
        self.sim.snapshot().to_string()
    }
}

/// Run the default sweep and return a (N, 3) array of [decade, count, normalized count].
#[pyfunction]
#[pyo3(signature = (max_decade=5))]
fn run_sweep(py: Python<'_>, max_decade: u32) -> PyResult<Py<PyArray2<f64>>> {
    let cfg = SweepConfig {
        max_decade,
        ..Default::default()
    };
    let sweep = ExperimentSweep::new(cfg).map_err(py_err)?;
    let results = py
        .detach(|| sweep.run().map_err(|e| e.to_string()))
        .map_err(py_err)?;

    let mut arr = Array2::<f64>::zeros((results.len(), 3));
    for (row, r) in results.iter().enumerate() {
        arr[[row, 0]] = r.decade as f64;
        arr[[row, 1]] = r.collision_count as f64;
        arr[[row, 2]] = r.normalized_count;
    }
    Ok(arr.into_pyarray(py).unbind())
}

/// The pisim Python module entry point.
#[pymodule]
fn pisim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BlockSim>()?;
    m.add_function(wrap_pyfunction!(run_sweep, m)?)?;
    Ok(())
}
