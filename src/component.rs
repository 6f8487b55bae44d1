use crate::graph::NodeId;
use crate::units::{Current, Gain, Resistance, Voltage};

/// Identifier assigned by the owning circuit when a component is added.
/// Ids are never reused within a circuit and survive into working copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) u64);

impl ComponentId {
    /// Sentinel id shared by every ground component.
    pub const GROUND: ComponentId = ComponentId(u64::MAX);
}

/// What a dependent source senses: the voltage across, or the current
/// through, the branch between `node1` and `node2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Voltage,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub kind: ControlKind,
    pub node1: NodeId,
    pub node2: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentKind {
    Resistor { r: Resistance },
    VoltageSource { v: Voltage },
    CurrentSource { i: Current },
    DependentVoltageSource { gain: Gain, control: Control },
    DependentCurrentSource { gain: Gain, control: Control },
    Ground,
}

impl ComponentKind {
    pub fn is_passive(&self) -> bool {
        matches!(self, Self::Resistor { .. })
    }

    pub fn is_source(&self) -> bool {
        matches!(
            self,
            Self::VoltageSource { .. }
                | Self::CurrentSource { .. }
                | Self::DependentVoltageSource { .. }
                | Self::DependentCurrentSource { .. }
        )
    }

    /// Variant value: resistance in Ω, EMF in V, current in A, or gain.
    /// Ground has no value and reports 0.
    pub fn value(&self) -> f64 {
        match self {
            Self::Resistor { r } => f64::from(*r),
            Self::VoltageSource { v } => f64::from(*v),
            Self::CurrentSource { i } => f64::from(*i),
            Self::DependentVoltageSource { gain, .. }
            | Self::DependentCurrentSource { gain, .. } => f64::from(*gain),
            Self::Ground => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Resistor { .. } => "resistor",
            Self::VoltageSource { .. } => "voltage source",
            Self::CurrentSource { .. } => "current source",
            Self::DependentVoltageSource { .. } => "dependent voltage source",
            Self::DependentCurrentSource { .. } => "dependent current source",
            Self::Ground => "ground",
        }
    }
}

/// A two-terminal circuit element (ground being the degenerate
/// single-node case with `node1 == node2`).
#[derive(Debug, Clone)]
pub struct Component {
    pub(crate) id: ComponentId,
    pub node1: NodeId,
    pub node2: NodeId,
    pub(crate) is_load: bool,
    pub kind: ComponentKind,
}

impl Component {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn is_load(&self) -> bool {
        self.is_load
    }

    pub fn value(&self) -> f64 {
        self.kind.value()
    }

    pub fn is_ground(&self) -> bool {
        matches!(self.kind, ComponentKind::Ground)
    }

    /// True when the component joins `a` and `b`, in either orientation.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.node1 == a && self.node2 == b) || (self.node1 == b && self.node2 == a)
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.node1 == node || self.node2 == node
    }
}

/// Two components are the same element iff variant, value (bit-for-bit),
/// endpoints and load mark all agree. Ids are identity bookkeeping and
/// deliberately excluded.
impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.node1 == other.node1
            && self.node2 == other.node2
            && self.is_load == other.is_load
            && self.kind == other.kind
    }
}
