use equiv_solve::{
    Circuit, ComponentId, ComponentKind, Control, ControlKind, Current, Gain, NodeId, Resistance,
    Voltage,
};

pub mod strategies;

/// Epsilon for fixture comparisons; the reference values are quoted to a
/// few decimals.
pub const EPSILON_FIXTURE: f64 = 1e-2;

/// Epsilon for comparisons that should agree to machine precision.
pub const EPSILON_STRICT: f64 = 1e-9;

pub fn resistor(circuit: &mut Circuit, ohms: f64, n1: NodeId, n2: NodeId) -> ComponentId {
    circuit
        .add(
            ComponentKind::Resistor {
                r: Resistance::new(ohms).unwrap(),
            },
            n1,
            n2,
        )
        .unwrap()
}

pub fn load_resistor(circuit: &mut Circuit, ohms: f64, n1: NodeId, n2: NodeId) -> ComponentId {
    circuit
        .add_load(
            ComponentKind::Resistor {
                r: Resistance::new(ohms).unwrap(),
            },
            n1,
            n2,
        )
        .unwrap()
}

pub fn voltage_source(circuit: &mut Circuit, volts: f64, n1: NodeId, n2: NodeId) -> ComponentId {
    circuit
        .add(
            ComponentKind::VoltageSource {
                v: Voltage::new(volts).unwrap(),
            },
            n1,
            n2,
        )
        .unwrap()
}

pub fn current_source(circuit: &mut Circuit, amps: f64, n1: NodeId, n2: NodeId) -> ComponentId {
    circuit
        .add(
            ComponentKind::CurrentSource {
                i: Current::new(amps).unwrap(),
            },
            n1,
            n2,
        )
        .unwrap()
}

pub fn ground(circuit: &mut Circuit, node: NodeId) -> ComponentId {
    circuit.add(ComponentKind::Ground, node, node).unwrap()
}

fn control(kind: ControlKind, c1: NodeId, c2: NodeId) -> Control {
    Control {
        kind,
        node1: c1,
        node2: c2,
    }
}

pub fn vcvs(
    circuit: &mut Circuit,
    gain: f64,
    n1: NodeId,
    n2: NodeId,
    c1: NodeId,
    c2: NodeId,
) -> ComponentId {
    circuit
        .add(
            ComponentKind::DependentVoltageSource {
                gain: Gain::new(gain).unwrap(),
                control: control(ControlKind::Voltage, c1, c2),
            },
            n1,
            n2,
        )
        .unwrap()
}

pub fn ccvs(
    circuit: &mut Circuit,
    gain: f64,
    n1: NodeId,
    n2: NodeId,
    c1: NodeId,
    c2: NodeId,
) -> ComponentId {
    circuit
        .add(
            ComponentKind::DependentVoltageSource {
                gain: Gain::new(gain).unwrap(),
                control: control(ControlKind::Current, c1, c2),
            },
            n1,
            n2,
        )
        .unwrap()
}

pub fn vccs(
    circuit: &mut Circuit,
    gain: f64,
    n1: NodeId,
    n2: NodeId,
    c1: NodeId,
    c2: NodeId,
) -> ComponentId {
    circuit
        .add(
            ComponentKind::DependentCurrentSource {
                gain: Gain::new(gain).unwrap(),
                control: control(ControlKind::Voltage, c1, c2),
            },
            n1,
            n2,
        )
        .unwrap()
}

pub fn cccs(
    circuit: &mut Circuit,
    gain: f64,
    n1: NodeId,
    n2: NodeId,
    c1: NodeId,
    c2: NodeId,
) -> ComponentId {
    circuit
        .add(
            ComponentKind::DependentCurrentSource {
                gain: Gain::new(gain).unwrap(),
                control: control(ControlKind::Current, c1, c2),
            },
            n1,
            n2,
        )
        .unwrap()
}
