use pisim::config::SimulationConfig;
use pisim::core::{elastic_velocities, from_fn, reflect, CollisionSimulator, Contact, Snapshot};
use pisim::error::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Momentum and kinetic energy survive a block–block exchange for arbitrary
/// masses and velocities (log-uniform masses over six decades).
#[test]
fn elastic_exchange_conserves_momentum_and_energy() {
    let mut rng = StdRng::seed_from_u64(20240611);
    for _ in 0..1000 {
        let m_big = 10f64.powf(rng.random_range(-2.0..4.0));
        let m_small = 10f64.powf(rng.random_range(-2.0..4.0));
        let v_big = rng.random_range(-50.0..50.0);
        let v_small = rng.random_range(-50.0..50.0);

        let (vb, vs) = elastic_velocities(m_big, v_big, m_small, v_small);

        let p0 = m_big * v_big + m_small * v_small;
        let p1 = m_big * vb + m_small * vs;
        let p_scale = m_big * v_big.abs() + m_small * v_small.abs();
        assert!(
            (p1 - p0).abs() <= 1e-12 * p_scale,
            "momentum {} -> {} (M={}, m={}, V={}, v={})",
            p0,
            p1,
            m_big,
            m_small,
            v_big,
            v_small
        );

        let e0 = m_big * v_big * v_big + m_small * v_small * v_small;
        let e1 = m_big * vb * vb + m_small * vs * vs;
        assert!(
            ((e1 - e0) / e0).abs() < 1e-10,
            "energy {} -> {} (M={}, m={}, V={}, v={})",
            e0,
            e1,
            m_big,
            m_small,
            v_big,
            v_small
        );
    }
}

/// Wall reflection keeps the speed and flips the direction.
#[test]
fn wall_reflection_preserves_speed() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let v = rng.random_range(-1e6..1e6);
        let r = reflect(v);
        assert_eq!(r.abs(), v.abs());
        assert_eq!(r, -v);
    }
}

/// Total kinetic energy stays put over a full run with mass ratio 10^4,
/// observed through per-step snapshots.
#[test]
fn energy_is_stable_over_a_run() -> Result<()> {
    let mut cfg = SimulationConfig::default();
    cfg.big.mass = 1e4;
    cfg.dt = 1e-5;
    let mut sim = CollisionSimulator::new(&cfg)?;
    let e0 = sim.kinetic_energy();

    let mut worst = 0.0_f64;
    let mut obs = from_fn(|s: &Snapshot, _c: &[Contact]| {
        let e = 0.5 * s.big_mass * s.big_velocity * s.big_velocity
            + 0.5 * s.small_mass * s.small_velocity * s.small_velocity;
        worst = worst.max(((e - e0) / e0).abs());
    });
    let report = sim.run_with_observer(&mut obs)?;

    assert_eq!(report.collision_count, 314);
    assert!(worst < 1e-12, "relative energy drift {worst} too large");
    assert!(report.max_energy_drift < 1e-12);
    Ok(())
}
