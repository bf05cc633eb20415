//! Integration tests for DC assembly and the operating point.

use plasma::{Circuit, Error, NodeLabel, TopologyError};

/// Resistive divider:
///
/// ```text
///   V1 = E (+) -- in -- R1 -- mid -- R2 -- GND
/// ```
fn divider(e: f64, r1: f64, r2: f64) -> Circuit {
    let mut circuit = Circuit::with_title("Voltage Divider");
    circuit.add_voltage_source("V1", "in", 0, e).unwrap();
    circuit.add_resistor("R1", "in", "mid", r1).unwrap();
    circuit.add_resistor("R2", "mid", 0, r2).unwrap();
    circuit
}

#[test]
fn test_voltage_divider_equal_resistors() {
    let op = divider(5.0, 1000.0, 1000.0).solve_dc().unwrap();

    let mid = op.voltage("mid").unwrap();
    assert!((mid - 2.5).abs() < 1e-10, "V(mid) = {mid} (expected 2.5)");
    assert!((op.voltage("in").unwrap() - 5.0).abs() < 1e-10);

    // 2.5 mA leaves the + terminal, so the branch current (+ to -) is negative.
    let i = op.current("V1").unwrap();
    assert!((i + 2.5e-3).abs() < 1e-12, "I(V1) = {i} (expected -2.5m)");
}

#[test]
fn test_voltage_divider_unequal_resistors() {
    let (e, r1, r2) = (5.0, 1000.0, 2000.0);
    let op = divider(e, r1, r2).solve_dc().unwrap();

    let mid = op.voltage("mid").unwrap();
    let expected = e * r2 / (r1 + r2);
    assert!(
        (mid - expected).abs() < 1e-10,
        "V(mid) = {mid} (expected {expected})"
    );
    assert!((mid - 10.0 / 3.0).abs() < 1e-10);
}

#[test]
fn test_resistor_only_g_is_symmetric_with_nonnegative_diagonal() {
    let mut circuit = Circuit::new();
    circuit.add_resistor("R1", 1, 2, 1e3).unwrap();
    circuit.add_resistor("R2", 2, 3, 2.2e3).unwrap();
    circuit.add_resistor("R3", 3, 1, 4.7e3).unwrap();
    circuit.add_resistor("R4", 3, 0, 10e3).unwrap();
    circuit.add_resistor("R5", 2, 4, 330.0).unwrap();

    let assembly = circuit.assemble_dc().unwrap();
    let g = assembly.system.g();
    assert_eq!(g.nrows(), 4);
    for i in 0..g.nrows() {
        assert!(g[(i, i)] >= 0.0);
        for j in 0..g.ncols() {
            assert_eq!(g[(i, j)], g[(j, i)], "G[{i},{j}] != G[{j},{i}]");
        }
    }
}

#[test]
fn test_g_row_sums_equal_ground_conductance() {
    let mut circuit = Circuit::new();
    circuit.add_resistor("R1", "a", "b", 1e3).unwrap();
    circuit.add_resistor("R2", "b", 0, 2e3).unwrap();
    circuit.add_resistor("R3", "a", 0, 500.0).unwrap();
    circuit.add_resistor("R4", "b", "c", 100.0).unwrap();
    circuit.add_resistor("R5", 0, "a", 250.0).unwrap();

    let assembly = circuit.assemble_dc().unwrap();
    let g = assembly.system.g();
    let layout = &assembly.layout;

    let expected = [
        ("a", 1.0 / 500.0 + 1.0 / 250.0),
        ("b", 1.0 / 2e3),
        ("c", 0.0),
    ];
    for (label, to_ground) in expected {
        let row = layout.node_position(&NodeLabel::from(label)).unwrap();
        let sum: f64 = g.row(row).iter().sum();
        assert!(
            (sum - to_ground).abs() < 1e-15,
            "row sum at {label} = {sum} (expected {to_ground})"
        );
    }
}

#[test]
fn test_four_block_structure() {
    let mut circuit = Circuit::new();
    circuit.add_voltage_source("V1", 1, 0, 1.0).unwrap();
    circuit.add_resistor("R1", 1, 2, 1e3).unwrap();
    circuit.add_inductor("L1", 2, 3, 1e-3).unwrap();
    circuit.add_capacitor("C1", 3, 0, 1e-6).unwrap();
    circuit.add_resistor("R2", 3, 0, 1e3).unwrap();

    let mna = circuit.assemble_dc().unwrap().system;
    assert_eq!(mna.num_nodes, 3);
    assert_eq!(mna.num_branches, 2);
    assert_eq!(mna.c().transpose(), mna.b().into_owned());
    assert!(mna.d().iter().all(|&v| v == 0.0));
    // The capacitor is open at DC.
    assert_eq!(mna.g()[(2, 2)], 1e-3);
}

#[test]
fn test_inductor_is_short_at_dc() {
    let mut circuit = Circuit::new();
    circuit.add_voltage_source("V1", 1, 0, 10.0).unwrap();
    circuit.add_resistor("R1", 1, 2, 1e3).unwrap();
    circuit.add_inductor("L1", 2, 3, 1e-3).unwrap();
    circuit.add_resistor("R2", 3, 0, 1e3).unwrap();

    let op = circuit.solve_dc().unwrap();
    assert!((op.voltage(2).unwrap() - 5.0).abs() < 1e-10);
    assert!((op.voltage(3).unwrap() - 5.0).abs() < 1e-10);
    assert!((op.current("L1").unwrap() - 5e-3).abs() < 1e-12);
}

#[test]
fn test_current_source_direction() {
    // I1 drives 2 mA from ground into "out" through the source.
    let mut circuit = Circuit::new();
    circuit.add_current_source("I1", 0, "out", 2e-3).unwrap();
    circuit.add_resistor("R1", "out", 0, 1e3).unwrap();

    let op = circuit.solve_dc().unwrap();
    assert!((op.voltage("out").unwrap() - 2.0).abs() < 1e-10);
}

#[test]
fn test_solve_dc_is_idempotent() {
    let mut circuit = divider(5.0, 1e3, 2e3);
    circuit.add_capacitor("C1", "mid", 0, 1e-6).unwrap();
    circuit.add_inductor("L1", "mid", "x", 1e-3).unwrap();
    circuit.add_resistor("R3", "x", 0, 470.0).unwrap();

    let first = circuit.solve_dc().unwrap();
    let second = circuit.solve_dc().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_capacitor_only_node_is_singular() {
    let mut circuit = Circuit::new();
    circuit.add_voltage_source("V1", "in", 0, 5.0).unwrap();
    circuit.add_resistor("R1", "in", 0, 1e3).unwrap();
    circuit.add_capacitor("C1", "float", 0, 1e-6).unwrap();

    match circuit.solve_dc() {
        Err(Error::SingularSystem { node, .. }) => assert_eq!(node.as_deref(), Some("float")),
        other => panic!("expected SingularSystem, got {other:?}"),
    }
}

#[test]
fn test_node_behind_series_capacitor_is_singular() {
    let mut circuit = Circuit::new();
    circuit.add_voltage_source("V1", 1, 0, 5.0).unwrap();
    circuit.add_resistor("R1", 1, 2, 1e3).unwrap();
    circuit.add_capacitor("C1", 2, 3, 1e-6).unwrap();
    circuit.add_current_source("I1", 0, 3, 1e-3).unwrap();
    circuit.add_resistor("R2", 2, 0, 1e3).unwrap();

    match circuit.solve_dc() {
        Err(Error::SingularSystem { node, .. }) => assert_eq!(node.as_deref(), Some("3")),
        other => panic!("expected SingularSystem, got {other:?}"),
    }
}

#[test]
fn test_conflicting_parallel_sources_are_singular() {
    let mut circuit = Circuit::new();
    circuit.add_voltage_source("V1", 1, 0, 5.0).unwrap();
    circuit.add_voltage_source("V2", 1, 0, 3.0).unwrap();
    circuit.add_resistor("R1", 1, 0, 1e3).unwrap();

    assert!(matches!(
        circuit.solve_dc(),
        Err(Error::SingularSystem { .. })
    ));
}

#[test]
fn test_mutation_after_solve_reassembles() {
    let mut circuit = divider(5.0, 1e3, 1e3);
    let before = circuit.solve_dc().unwrap();
    assert_eq!(before.len(), 3);

    circuit.add_resistor("R3", "mid", 0, 1e3).unwrap();
    let after = circuit.solve_dc().unwrap();

    // 1k over (1k || 1k)
    let mid = after.voltage("mid").unwrap();
    assert!((mid - 5.0 / 3.0).abs() < 1e-10, "V(mid) = {mid}");

    circuit.add_inductor("L1", "mid", "tail", 1e-3).unwrap();
    circuit.add_resistor("R4", "tail", 0, 1e3).unwrap();
    let grown = circuit.solve_dc().unwrap();
    assert_eq!(grown.len(), 5);
    assert!(grown.current("L1").is_some());
}

#[test]
fn test_numeric_and_named_labels() {
    let mut circuit = Circuit::new();
    circuit.add_voltage_source("V1", "1", "GND", 1.0).unwrap();
    circuit.add_resistor("R1", 1, "n2", 1e3).unwrap();
    circuit.add_resistor("R2", "n2", "0", 1e3).unwrap();

    let op = circuit.solve_dc().unwrap();
    assert_eq!(circuit.num_nodes(), 2);
    assert!((op.voltage(1).unwrap() - 1.0).abs() < 1e-12);
    assert!((op.voltage("n2").unwrap() - 0.5).abs() < 1e-12);

    let names: Vec<_> = op.columns().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["V(1)", "V(n2)", "I(V1)"]);
}

#[test]
fn test_wide_conductance_range_is_solvable() {
    // 1 mA into node 1, 1 uOhm to node 2, 1 GOhm to ground.
    let mut circuit = Circuit::new();
    circuit.add_current_source("I1", 0, 1, 1e-3).unwrap();
    circuit.add_resistor("R1", 1, 2, 1e-6).unwrap();
    circuit.add_resistor("R2", 2, 0, 1e9).unwrap();

    let op = circuit.solve_dc().unwrap();
    let v2 = op.voltage(2).unwrap();
    // The 1 GOhm conductance is below the rounding of the 1 uOhm one.
    assert!((v2 - 1e6).abs() < 0.1 * 1e6, "V(2) = {v2}");
    assert!(op.voltage(1).unwrap() >= v2);
}

#[test]
fn test_resistor_self_loop_leaves_operating_point_unchanged() {
    let reference = divider(5.0, 1e3, 1e3).solve_dc().unwrap();

    let mut circuit = divider(5.0, 1e3, 1e3);
    circuit.add_resistor("R3", "mid", "mid", 10.0).unwrap();
    let op = circuit.solve_dc().unwrap();

    assert_eq!(op, reference);
}

#[test]
fn test_branch_self_loops_are_singular() {
    let mut shorted = divider(5.0, 1e3, 1e3);
    shorted.add_inductor("L1", "mid", "mid", 1e-3).unwrap();
    match shorted.solve_dc() {
        Err(Error::SingularSystem { node, .. }) => assert_eq!(node, None),
        other => panic!("expected SingularSystem, got {other:?}"),
    }

    let mut looped = divider(5.0, 1e3, 1e3);
    looped.add_voltage_source("V2", "in", "in", 1.0).unwrap();
    assert!(matches!(
        looped.solve_dc(),
        Err(Error::SingularSystem { .. })
    ));
}

#[test]
fn test_floating_resistor_island_is_singular() {
    let mut circuit = divider(5.0, 1e3, 1e3);
    circuit.add_resistor("R3", "x", "y", 1e3).unwrap();
    circuit.add_resistor("R4", "y", "z", 3e3).unwrap();
    circuit.add_resistor("R5", "z", "x", 7e3).unwrap();
    circuit.add_current_source("I1", 0, "x", 1e-3).unwrap();

    match circuit.solve_dc() {
        Err(Error::SingularSystem { node, .. }) => assert_eq!(node.as_deref(), Some("x")),
        other => panic!("expected SingularSystem, got {other:?}"),
    }
}

#[test]
fn test_labels_built_directly_are_normalized() {
    let mut circuit = Circuit::new();
    circuit
        .add_voltage_source("V1", 1, NodeLabel::Name("GND".into()), 2.0)
        .unwrap();
    circuit
        .add_resistor("R1", NodeLabel::Name("1".into()), 2, 1e3)
        .unwrap();
    circuit
        .add_resistor("R2", 2, NodeLabel::Name("0".into()), 1e3)
        .unwrap();

    assert_eq!(circuit.num_nodes(), 2);
    let op = circuit.solve_dc().unwrap();
    assert!((op.voltage(NodeLabel::Name("2".into())).unwrap() - 1.0).abs() < 1e-12);
    assert!(matches!(
        circuit.add_resistor("R3", NodeLabel::Name("0".into()), 0, 1.0),
        Err(Error::Topology(_))
    ));
}

#[test]
fn test_padded_name_is_a_duplicate() {
    let mut circuit = divider(5.0, 1e3, 1e3);
    match circuit.add_resistor(" R1 ", "mid", 0, 1e3) {
        Err(Error::Topology(TopologyError::DuplicateName(name))) => assert_eq!(name, "R1"),
        other => panic!("expected duplicate name, got {other:?}"),
    }
    assert_eq!(circuit.len(), 3);
}
