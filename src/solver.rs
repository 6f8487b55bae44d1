use std::collections::HashMap;

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

use crate::component::{Component, ComponentId, ComponentKind, Control, ControlKind};
use crate::errors::CircuitError;
use crate::graph::{Circuit, NodeId};

/// The controlling current of a current-controlled source, expressed as a
/// linear form over the unknown vector plus a constant: `i = Σ cᵢ·xᵢ + k`.
struct CurrentExpr {
    terms: Vec<(usize, f64)>,
    constant: f64,
}

/// Solves the circuit's nodal system for the node voltages, with
/// `reference` held at 0 V.
///
/// The unknown vector is every node voltage (the reference row is forced
/// to zero) extended with one branch current per voltage-type source.
/// Sign conventions, held across all stamps:
/// - each node's KCL row sums currents *leaving* the node, with injected
///   currents on the right-hand side;
/// - an independent current source drives its value from `node1` to
///   `node2`;
/// - a voltage-type source's branch current flows `node2 → node1` through
///   the element, and its constraint row reads `V(node2) − V(node1) = E`;
/// - a controlling current is measured flowing `ctrlNode1 → ctrlNode2`
///   through the branch joining the control nodes.
pub fn solve_nodal(circuit: &Circuit, reference: NodeId) -> Result<DVector<f64>, CircuitError> {
    let n = circuit.node_count();
    if n == 0 || reference >= n {
        return Err(CircuitError::InvalidComponent(format!(
            "reference node {reference} is not part of the circuit"
        )));
    }

    // Voltage-type sources cannot be expressed as node-to-node
    // conductances; each gets an auxiliary branch-current unknown.
    let mut aux: HashMap<ComponentId, usize> = HashMap::new();
    for c in circuit.components() {
        if matches!(
            c.kind,
            ComponentKind::VoltageSource { .. } | ComponentKind::DependentVoltageSource { .. }
        ) {
            let next = aux.len();
            aux.insert(c.id(), next);
        }
    }

    let dim = n + aux.len();
    let mut a = DMatrix::<f64>::zeros(dim, dim);
    let mut b = DVector::<f64>::zeros(dim);

    for c in circuit.components() {
        let (n1, n2) = (c.node1, c.node2);
        match &c.kind {
            ComponentKind::Resistor { r } => {
                let g = 1.0 / f64::from(*r);
                a[(n1, n1)] += g;
                a[(n2, n2)] += g;
                a[(n1, n2)] -= g;
                a[(n2, n1)] -= g;
            }
            ComponentKind::CurrentSource { i } => {
                let value = f64::from(*i);
                b[n1] -= value;
                b[n2] += value;
            }
            ComponentKind::VoltageSource { v } => {
                let row = n + aux[&c.id()];
                stamp_branch_current(&mut a, n1, n2, row);
                a[(row, n2)] += 1.0;
                a[(row, n1)] -= 1.0;
                b[row] += f64::from(*v);
            }
            ComponentKind::DependentVoltageSource { gain, control } => {
                check_control_nodes(control, n)?;
                let gain = f64::from(*gain);
                let row = n + aux[&c.id()];
                stamp_branch_current(&mut a, n1, n2, row);
                a[(row, n2)] += 1.0;
                a[(row, n1)] -= 1.0;
                match control.kind {
                    // V(n2) − V(n1) − gain·(V(c2) − V(c1)) = 0
                    ControlKind::Voltage => {
                        a[(row, control.node2)] -= gain;
                        a[(row, control.node1)] += gain;
                    }
                    // V(n2) − V(n1) − gain·i_ctrl = 0
                    ControlKind::Current => {
                        let i_ctrl = control_current(circuit, c, control, n, &aux)?;
                        for (col, coef) in i_ctrl.terms {
                            a[(row, col)] -= gain * coef;
                        }
                        b[row] += gain * i_ctrl.constant;
                    }
                }
            }
            ComponentKind::DependentCurrentSource { gain, control } => {
                check_control_nodes(control, n)?;
                let gain = f64::from(*gain);
                match control.kind {
                    // gain·(V(c2) − V(c1)) flows node1 → node2; pure
                    // conductance-like stamps at the control columns.
                    ControlKind::Voltage => {
                        a[(n2, control.node2)] -= gain;
                        a[(n2, control.node1)] += gain;
                        a[(n1, control.node2)] += gain;
                        a[(n1, control.node1)] -= gain;
                    }
                    // gain·i_ctrl arrives at node1 and leaves node2.
                    ControlKind::Current => {
                        let i_ctrl = control_current(circuit, c, control, n, &aux)?;
                        for (col, coef) in &i_ctrl.terms {
                            a[(n1, *col)] -= gain * coef;
                            a[(n2, *col)] += gain * coef;
                        }
                        b[n1] += gain * i_ctrl.constant;
                        b[n2] -= gain * i_ctrl.constant;
                    }
                }
            }
            ComponentKind::Ground => {}
        }
    }

    // The reference voltage is not a free unknown: overwrite its KCL row
    // with V(reference) = 0.
    for col in 0..dim {
        a[(reference, col)] = 0.0;
    }
    a[(reference, reference)] = 1.0;
    b[reference] = 0.0;

    trace!("nodal system assembled: {n} nodes, {} branch currents", aux.len());

    let solution = a.lu().solve(&b).ok_or(CircuitError::SingularSystem)?;
    if solution.iter().any(|x| !x.is_finite()) {
        return Err(CircuitError::Computation);
    }
    debug!("nodal solve succeeded ({dim} unknowns)");
    Ok(solution.rows(0, n).into_owned())
}

/// Couples a voltage-type source's branch current into its endpoint KCL
/// rows: the current flows node2 → node1 through the element.
fn stamp_branch_current(a: &mut DMatrix<f64>, n1: NodeId, n2: NodeId, col: usize) {
    a[(n2, col)] += 1.0;
    a[(n1, col)] -= 1.0;
}

fn check_control_nodes(control: &Control, n: usize) -> Result<(), CircuitError> {
    if control.node1 >= n || control.node2 >= n {
        return Err(CircuitError::InvalidComponent(format!(
            "control nodes ({}, {}) are not part of the circuit",
            control.node1, control.node2
        )));
    }
    Ok(())
}

/// Expresses the current through the branch between the control nodes,
/// measured flowing `ctrlNode1 → ctrlNode2`. The branch is the first
/// component (insertion order) joining the control nodes, the dependent
/// source itself excluded.
fn control_current(
    circuit: &Circuit,
    owner: &Component,
    control: &Control,
    n: usize,
    aux: &HashMap<ComponentId, usize>,
) -> Result<CurrentExpr, CircuitError> {
    let branch = circuit
        .components()
        .iter()
        .find(|c| {
            c.id() != owner.id() && !c.is_ground() && c.connects(control.node1, control.node2)
        })
        .ok_or_else(|| {
            CircuitError::InvalidComponent(format!(
                "no branch between control nodes ({}, {})",
                control.node1, control.node2
            ))
        })?;

    // True when the branch's own orientation matches the control pair.
    let aligned = branch.node1 == control.node1;

    match &branch.kind {
        ComponentKind::Resistor { r } => {
            let g = 1.0 / f64::from(*r);
            Ok(CurrentExpr {
                terms: vec![(control.node1, g), (control.node2, -g)],
                constant: 0.0,
            })
        }
        // The sense-branch current is already an unknown; reuse it. The
        // auxiliary current flows node2 → node1, so an aligned branch
        // carries −i_aux in the ctrl1 → ctrl2 direction.
        ComponentKind::VoltageSource { .. } | ComponentKind::DependentVoltageSource { .. } => {
            let col = n + aux[&branch.id()];
            Ok(CurrentExpr {
                terms: vec![(col, if aligned { -1.0 } else { 1.0 })],
                constant: 0.0,
            })
        }
        ComponentKind::CurrentSource { i } => {
            let value = f64::from(*i);
            Ok(CurrentExpr {
                terms: Vec::new(),
                constant: if aligned { value } else { -value },
            })
        }
        ComponentKind::DependentCurrentSource { .. } => {
            Err(CircuitError::InvalidComponent(format!(
                "control branch between ({}, {}) is itself a dependent current source",
                control.node1, control.node2
            )))
        }
        ComponentKind::Ground => unreachable!("ground components are filtered out"),
    }
}
