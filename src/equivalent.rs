use std::collections::BTreeSet;

use log::debug;

use crate::component::{Component, ComponentKind};
use crate::errors::CircuitError;
use crate::graph::{Circuit, NodeId};
use crate::reduce;
use crate::solver::solve_nodal;
use crate::units::{Current, Resistance, Voltage};

const TEST_CURRENT: f64 = 1.0;

/// Open-circuit voltage and equivalent series resistance seen from the
/// terminal pair, `vth = V(a) − V(b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheveninEquivalent {
    pub vth: f64,
    pub rth: f64,
}

/// The dual representation: short-circuit current with the same
/// resistance in parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NortonEquivalent {
    pub i_n: f64,
    pub r_n: f64,
}

/// A renderable minimal equivalent: source plus resistor, laid out on
/// fresh node ids, with the original load cloned onto the output
/// terminals when the selection was exactly one resistor. `bare` records
/// that no load branch is attached and the terminals are left open.
#[derive(Debug, Clone)]
pub struct EquivalentCircuit {
    pub circuit: Circuit,
    pub terminals: (NodeId, NodeId),
    pub bare: bool,
}

/// The opened, reduced and renumbered source network, with the terminal
/// pair mapped to its fixed slots (0 and 1 in some order).
struct Prepared {
    circuit: Circuit,
    node_a: NodeId,
    node_b: NodeId,
    original: (NodeId, NodeId),
}

fn prepare(circuit: &Circuit, a: NodeId, b: NodeId) -> Result<Prepared, CircuitError> {
    if a == b {
        return Err(CircuitError::InvalidBoundary(1));
    }
    let mut opened = circuit.open_between(a, b);
    opened.remove_useless_resistors();
    reduce::remove_unreachable(&mut opened, a, b)?;
    reduce::remove_dangling(&mut opened, a, b);
    let mapping = opened.renumber_nodes(&BTreeSet::from([a, b]));
    Ok(Prepared {
        circuit: opened,
        node_a: mapping[&a],
        node_b: mapping[&b],
        original: (a, b),
    })
}

fn open_circuit_voltage(prepared: &Prepared) -> Result<f64, CircuitError> {
    let voltages = solve_nodal(&prepared.circuit, 0)?;
    Ok(voltages[prepared.node_a] - voltages[prepared.node_b])
}

/// Driving-point resistance: deactivate every independent source
/// (voltage sources collapse to 0 V shorts, current sources drop out;
/// dependent sources stay active), then push a unit test current through
/// the terminals and read the voltage it develops.
fn equivalent_resistance(prepared: &Prepared) -> Result<f64, CircuitError> {
    let zero = Voltage::new(0.0)?;
    let mut deactivated = prepared.circuit.clone();
    for c in deactivated.components_mut() {
        if let ComponentKind::VoltageSource { .. } = c.kind {
            c.kind = ComponentKind::VoltageSource { v: zero };
        }
    }
    deactivated.retain_components(|c| !matches!(c.kind, ComponentKind::CurrentSource { .. }));

    let (a, b) = (prepared.node_a, prepared.node_b);
    if !deactivated.contains_node(a) {
        return Err(CircuitError::UnresolvedTerminal(prepared.original.0));
    }
    if !deactivated.contains_node(b) {
        return Err(CircuitError::UnresolvedTerminal(prepared.original.1));
    }
    // Dropped current sources may leave id gaps; compact the interior
    // nodes again. The terminals already sit at slots 0/1 and stay there.
    deactivated.renumber_nodes(&BTreeSet::from([a, b]));

    deactivated.add(
        ComponentKind::CurrentSource {
            i: Current::new(TEST_CURRENT)?,
        },
        a,
        b,
    )?;
    let voltages = solve_nodal(&deactivated, 0)?;
    let rth = (voltages[a] - voltages[b]).abs();
    if !rth.is_finite() {
        return Err(CircuitError::InvalidResistance(rth));
    }
    Ok(rth)
}

/// Computes the Thévenin equivalent of `circuit` seen from nodes
/// `a` and `b`, with `vth = V(a) − V(b)`.
pub fn thevenin(
    circuit: &Circuit,
    a: NodeId,
    b: NodeId,
) -> Result<TheveninEquivalent, CircuitError> {
    let prepared = prepare(circuit, a, b)?;
    let vth = open_circuit_voltage(&prepared)?;
    let rth = equivalent_resistance(&prepared)?;
    debug!("thevenin between ({a}, {b}): vth={vth}, rth={rth}");
    Ok(TheveninEquivalent { vth, rth })
}

/// Computes the Norton equivalent of `circuit` seen from nodes `a` and
/// `b`. The short-circuit current is `vth / rth`; it is undefined when
/// the network is an ideal source (`rth == 0` with `vth != 0`), and zero
/// when the network contributes nothing at all.
pub fn norton(circuit: &Circuit, a: NodeId, b: NodeId) -> Result<NortonEquivalent, CircuitError> {
    let th = thevenin(circuit, a, b)?;
    let i_n = if th.rth == 0.0 {
        if th.vth != 0.0 {
            return Err(CircuitError::DivisionByZero);
        }
        0.0
    } else {
        th.vth / th.rth
    };
    debug!("norton between ({a}, {b}): in={i_n}, rn={}", th.rth);
    Ok(NortonEquivalent { i_n, r_n: th.rth })
}

/// Clones the load selection onto the output terminals when it is exactly
/// one resistor. Returns false (the equivalent stays bare) otherwise.
fn clone_load(
    source: &Circuit,
    out: &mut Circuit,
    terminals: (NodeId, NodeId),
) -> Result<bool, CircuitError> {
    let loads: Vec<&Component> = source.load_components().collect();
    match loads.as_slice() {
        [single] if single.kind.is_passive() => {
            out.add_load(single.kind, terminals.0, terminals.1)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Builds the renderable Thévenin equivalent: voltage source between
/// nodes 0–1 and the series resistance between 1–2, output terminals
/// (2, 0). A negative `vth` flips the source's node order instead of
/// storing a negative value.
pub fn thevenin_equivalent_circuit(
    circuit: &Circuit,
    a: NodeId,
    b: NodeId,
) -> Result<EquivalentCircuit, CircuitError> {
    let th = thevenin(circuit, a, b)?;
    let mut out = Circuit::new();
    if th.vth >= 0.0 {
        out.add(ComponentKind::VoltageSource { v: Voltage::new(th.vth)? }, 0, 1)?;
    } else {
        out.add(ComponentKind::VoltageSource { v: Voltage::new(-th.vth)? }, 1, 0)?;
    }
    let terminals = if th.rth > 0.0 {
        out.add(ComponentKind::Resistor { r: Resistance::new(th.rth)? }, 1, 2)?;
        (2, 0)
    } else {
        (1, 0)
    };
    let attached = clone_load(circuit, &mut out, terminals)?;
    Ok(EquivalentCircuit {
        circuit: out,
        terminals,
        bare: !attached,
    })
}

/// Builds the renderable Norton equivalent: current source and parallel
/// resistance both between nodes 0–1, which are also the output
/// terminals. A negative `i_n` flips the source's node order.
pub fn norton_equivalent_circuit(
    circuit: &Circuit,
    a: NodeId,
    b: NodeId,
) -> Result<EquivalentCircuit, CircuitError> {
    let no = norton(circuit, a, b)?;
    let mut out = Circuit::new();
    if no.i_n >= 0.0 {
        out.add(ComponentKind::CurrentSource { i: Current::new(no.i_n)? }, 0, 1)?;
    } else {
        out.add(ComponentKind::CurrentSource { i: Current::new(-no.i_n)? }, 1, 0)?;
    }
    if no.r_n > 0.0 {
        out.add(ComponentKind::Resistor { r: Resistance::new(no.r_n)? }, 0, 1)?;
    }
    let terminals = (0, 1);
    let attached = clone_load(circuit, &mut out, terminals)?;
    Ok(EquivalentCircuit {
        circuit: out,
        terminals,
        bare: !attached,
    })
}
