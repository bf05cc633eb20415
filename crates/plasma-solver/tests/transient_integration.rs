//! Integration tests for the BDF integrator against analytic solutions.

use nalgebra::DVector;
use plasma_core::{DaeSystem, MnaSystem};
use plasma_devices::{Element, Terminals};
use plasma_solver::{
    BdfIntegrator, CONSISTENCY_TOLERANCE, DaeIntegrator, DaeProblem, Error, IntegratorConfig,
    TimeSpan, consistent_initial_state, solve_dc,
};

fn tight() -> IntegratorConfig {
    IntegratorConfig {
        abs_tol: 1e-9,
        rel_tol: 1e-5,
        max_steps: 100_000,
        ..Default::default()
    }
}

/// RC discharge: C = 1 uF from 1 V through R = 1k, tau = 1 ms.
#[test]
fn test_rc_discharge_matches_exponential() {
    let r = Element::resistor("R1", 1, 0, 1e3).unwrap();
    let c = Element::capacitor("C1", 1, 0, 1e-6).unwrap();
    let mut dae = DaeSystem::new(1, 0);
    let t = Terminals::new(Some(0), None);
    r.stamp_dae(&t, &mut dae).unwrap();
    c.stamp_dae(&t, &mut dae).unwrap();

    let initial =
        consistent_initial_state(&dae, DVector::from_vec(vec![1.0]), CONSISTENCY_TOLERANCE, true)
            .unwrap();
    assert!((initial.xdot0[0] + 1000.0).abs() < 1e-9);

    let problem = DaeProblem::new(&dae, initial).unwrap();
    let span = TimeSpan::until(5e-3).unwrap();
    let traj = BdfIntegrator.integrate(&problem, span, &tight()).unwrap();

    let tau = 1e-3;
    for p in &traj.points {
        let expected = (-p.time / tau).exp();
        assert!(
            (p.state[0] - expected).abs() < 2e-3,
            "V(t = {:e}) = {} (expected {})",
            p.time,
            p.state[0],
            expected
        );
    }
    assert_eq!(traj.last().unwrap().time, 5e-3);
}

/// RL decay: L = 1 mH shorted by R = 1 ohm, i(0) = 1 A, tau = L/R = 1 ms.
#[test]
fn test_rl_decay_matches_exponential() {
    let r = Element::resistor("R1", 1, 0, 1.0).unwrap();
    let l = Element::inductor("L1", 1, 0, 1e-3).unwrap();
    let mut dae = DaeSystem::new(1, 1);
    r.stamp_dae(&Terminals::new(Some(0), None), &mut dae).unwrap();
    l.stamp_dae(&Terminals::with_branch(Some(0), None, 0), &mut dae)
        .unwrap();

    // Current leaves node 1 through the inductor, so v = -i R.
    let x0 = DVector::from_vec(vec![-1.0, 1.0]);
    let initial = consistent_initial_state(&dae, x0, CONSISTENCY_TOLERANCE, true).unwrap();
    assert!((initial.xdot0[1] + 1000.0).abs() < 1e-9);
    assert_eq!(initial.xdot0[0], 0.0);

    let problem = DaeProblem::new(&dae, initial).unwrap();
    let span = TimeSpan::until(5e-3).unwrap();
    let traj = BdfIntegrator.integrate(&problem, span, &tight()).unwrap();

    let tau = 1e-3;
    for p in &traj.points {
        let expected = (-p.time / tau).exp();
        assert!(
            (p.state[1] - expected).abs() < 2e-3,
            "I(t = {:e}) = {} (expected {})",
            p.time,
            p.state[1],
            expected
        );
        // The algebraic node voltage tracks the current exactly.
        assert!((p.state[0] + p.state[1]).abs() < 1e-9);
    }
}

/// Starting from the DC operating point, a DC-driven circuit stays put.
#[test]
fn test_dc_start_is_steady_state() {
    let v = Element::voltage_source("V1", 1, 0, 5.0).unwrap();
    let r = Element::resistor("R1", 1, 2, 1e3).unwrap();
    let c = Element::capacitor("C1", 2, 0, 1e-6).unwrap();
    let l = Element::inductor("L1", 2, 3, 1e-3).unwrap();
    let r2 = Element::resistor("R2", 3, 0, 1e3).unwrap();

    let tv = Terminals::with_branch(Some(0), None, 0);
    let tr = Terminals::new(Some(0), Some(1));
    let tc = Terminals::new(Some(1), None);
    let tl = Terminals::with_branch(Some(1), Some(2), 1);
    let tr2 = Terminals::new(Some(2), None);

    let mut mna = MnaSystem::new(3, 2);
    let mut dae = DaeSystem::new(3, 2);
    for (e, t) in [(&v, &tv), (&r, &tr), (&c, &tc), (&l, &tl), (&r2, &tr2)] {
        e.stamp_dc(t, &mut mna).unwrap();
        e.stamp_dae(t, &mut dae).unwrap();
    }

    let x0 = solve_dc(&mna).unwrap().to_vector();
    assert!((x0[1] - 2.5).abs() < 1e-10);

    let initial = consistent_initial_state(&dae, x0.clone(), CONSISTENCY_TOLERANCE, true).unwrap();
    assert!(initial.xdot0.iter().all(|d| d.abs() < 1e-9));

    let problem = DaeProblem::new(&dae, initial).unwrap();
    let span = TimeSpan::until(1e-3).unwrap();
    let traj = BdfIntegrator
        .integrate(&problem, span, &IntegratorConfig::default())
        .unwrap();

    for p in &traj.points {
        assert!(
            (&p.state - &x0).amax() < 1e-9,
            "state drifted at t = {:e}",
            p.time
        );
    }
}

#[test]
fn test_output_points_resample() {
    let mut dae = DaeSystem::new(1, 0);
    dae.stamp_capacitance(Some(0), None, 1e-6);
    dae.stamp_conductance(Some(0), None, 1e-3);
    let problem = DaeProblem {
        system: &dae,
        x0: DVector::from_vec(vec![1.0]),
        xdot0: DVector::from_vec(vec![-1000.0]),
    };
    let span = TimeSpan::new(0.0, 2e-3).unwrap();
    let config = IntegratorConfig {
        output_points: Some(20),
        ..tight()
    };

    let traj = BdfIntegrator.integrate(&problem, span, &config).unwrap();
    assert_eq!(traj.points.len(), 21);
    assert_eq!(traj.points[0].time, 0.0);
    assert_eq!(traj.points[20].time, 2e-3);
    for (k, p) in traj.points.iter().enumerate() {
        assert!((p.time - k as f64 * 1e-4).abs() < 1e-15);
    }
}

#[test]
fn test_invalid_config_rejected() {
    let dae = DaeSystem::new(1, 0);
    let problem = DaeProblem {
        system: &dae,
        x0: DVector::zeros(1),
        xdot0: DVector::zeros(1),
    };
    let span = TimeSpan::until(1.0).unwrap();
    let config = IntegratorConfig {
        rel_tol: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        BdfIntegrator.integrate(&problem, span, &config),
        Err(Error::InvalidConfig(_))
    ));
}
