use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};

use crate::component::{Component, ComponentId, ComponentKind};
use crate::errors::CircuitError;

pub type NodeId = usize;

/// A circuit: an insertion-ordered collection of components plus a node
/// registry mapping each node id to the number of components touching it.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    components: Vec<Component>,
    nodes: HashMap<NodeId, usize>,
    next_id: u64,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component between `node1` and `node2`.
    ///
    /// Fails with `DuplicateGround` if a ground is already present and
    /// another is added, and with `InvalidComponent` on coincident nodes
    /// (two-terminal variants) or a mismatched ground node pair.
    pub fn add(
        &mut self,
        kind: ComponentKind,
        node1: NodeId,
        node2: NodeId,
    ) -> Result<ComponentId, CircuitError> {
        self.push(kind, node1, node2, false)
    }

    /// Adds a component carrying the load mark (the branch under study).
    pub fn add_load(
        &mut self,
        kind: ComponentKind,
        node1: NodeId,
        node2: NodeId,
    ) -> Result<ComponentId, CircuitError> {
        self.push(kind, node1, node2, true)
    }

    fn push(
        &mut self,
        kind: ComponentKind,
        node1: NodeId,
        node2: NodeId,
        is_load: bool,
    ) -> Result<ComponentId, CircuitError> {
        let id = match kind {
            ComponentKind::Ground => {
                if node1 != node2 {
                    return Err(CircuitError::InvalidComponent(format!(
                        "ground is a single-node element, got nodes ({node1}, {node2})"
                    )));
                }
                if self.has_ground() {
                    return Err(CircuitError::DuplicateGround);
                }
                ComponentId::GROUND
            }
            _ => {
                if node1 == node2 {
                    return Err(CircuitError::InvalidComponent(format!(
                        "{} connects node {node1} to itself",
                        kind.label()
                    )));
                }
                let id = ComponentId(self.next_id);
                self.next_id += 1;
                id
            }
        };
        trace!(
            "add {:?} id={id:?} nodes=({node1}, {node2}) load={is_load}",
            kind
        );
        self.components.push(Component {
            id,
            node1,
            node2,
            is_load,
            kind,
        });
        self.register(node1);
        self.register(node2);
        Ok(id)
    }

    /// Removes the component with the given id. No-op (returns false) if
    /// absent; otherwise unregisters its endpoints, pruning nodes that no
    /// remaining component references.
    pub fn remove(&mut self, id: ComponentId) -> bool {
        let Some(idx) = self.components.iter().position(|c| c.id == id) else {
            trace!("remove: no component with id {id:?}");
            return false;
        };
        let removed = self.components.remove(idx);
        self.unregister(removed.node1);
        self.unregister(removed.node2);
        trace!("removed {:?} id={id:?}", removed.kind);
        true
    }

    /// Replaces the component's value, re-validating the variant invariants
    /// (a resistance must stay positive through every mutation).
    pub fn set_value(&mut self, id: ComponentId, value: f64) -> Result<(), CircuitError> {
        use crate::units::{Current, Gain, Resistance, Voltage};
        let component = self
            .components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CircuitError::InvalidComponent(format!("no component {id:?}")))?;
        component.kind = match component.kind {
            ComponentKind::Resistor { .. } => ComponentKind::Resistor {
                r: Resistance::new(value)?,
            },
            ComponentKind::VoltageSource { .. } => ComponentKind::VoltageSource {
                v: Voltage::new(value)?,
            },
            ComponentKind::CurrentSource { .. } => ComponentKind::CurrentSource {
                i: Current::new(value)?,
            },
            ComponentKind::DependentVoltageSource { control, .. } => {
                ComponentKind::DependentVoltageSource {
                    gain: Gain::new(value)?,
                    control,
                }
            }
            ComponentKind::DependentCurrentSource { control, .. } => {
                ComponentKind::DependentCurrentSource {
                    gain: Gain::new(value)?,
                    control,
                }
            }
            ComponentKind::Ground => {
                return Err(CircuitError::InvalidComponent(
                    "ground carries no value".to_string(),
                ));
            }
        };
        Ok(())
    }

    pub fn set_load(&mut self, id: ComponentId, is_load: bool) -> bool {
        match self.components.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.is_load = is_load;
                true
            }
            None => false,
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Node registry: node id → number of components touching it.
    pub fn nodes(&self) -> &HashMap<NodeId, usize> {
        &self.nodes
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// One past the highest node id in use; the matrix dimension the
    /// nodal solver works with. Zero for an empty circuit.
    pub fn node_count(&self) -> usize {
        self.nodes.keys().max().map_or(0, |max| max + 1)
    }

    pub fn has_ground(&self) -> bool {
        self.components.iter().any(Component::is_ground)
    }

    pub fn ground_node(&self) -> Option<NodeId> {
        self.components
            .iter()
            .find(|c| c.is_ground())
            .map(|c| c.node1)
    }

    pub fn load_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.is_load)
    }

    /// Deep copy for analysis scratch work. Components are independent
    /// clones (ids preserved); ground is never carried over, the analysis
    /// passes fix their own reference.
    pub fn working_copy(&self) -> Circuit {
        let mut copy = Circuit {
            components: Vec::with_capacity(self.components.len()),
            nodes: HashMap::new(),
            next_id: self.next_id,
        };
        for component in &self.components {
            if component.is_ground() {
                continue;
            }
            copy.components.push(component.clone());
            copy.register(component.node1);
            copy.register(component.node2);
        }
        copy
    }

    /// Drops self-loop resistors; both ends on one node contribute nothing.
    pub fn remove_useless_resistors(&mut self) {
        self.retain_components(|c| !(c.kind.is_passive() && c.node1 == c.node2));
        debug!("useless resistors removed");
    }

    /// Returns a copy opened at the load: any load-flagged component lying
    /// directly between `a` and `b` (either orientation) is removed, then
    /// self-loop resistors are cleaned up.
    pub fn open_between(&self, a: NodeId, b: NodeId) -> Circuit {
        let mut opened = self.working_copy();
        opened.retain_components(|c| !(c.is_load && c.connects(a, b)));
        opened.remove_useless_resistors();
        debug!("circuit opened between nodes {a} and {b}");
        opened
    }

    /// Compacts node ids to the dense range `[0, N)`: sorted terminals
    /// first, then the remaining used nodes in ascending order. Every
    /// component endpoint (and dependent-source control node) is rewritten.
    /// Returns the applied old → new mapping. Idempotent once applied.
    pub fn renumber_nodes(&mut self, terminals: &BTreeSet<NodeId>) -> HashMap<NodeId, NodeId> {
        let mut used: BTreeSet<NodeId> = BTreeSet::new();
        for c in &self.components {
            used.insert(c.node1);
            used.insert(c.node2);
            if let ComponentKind::DependentVoltageSource { control, .. }
            | ComponentKind::DependentCurrentSource { control, .. } = &c.kind
            {
                used.insert(control.node1);
                used.insert(control.node2);
            }
        }
        for terminal in terminals {
            used.remove(terminal);
        }

        let mut mapping: HashMap<NodeId, NodeId> = HashMap::new();
        for (position, node) in terminals.iter().chain(used.iter()).enumerate() {
            mapping.insert(*node, position);
        }

        for c in &mut self.components {
            c.node1 = mapping[&c.node1];
            c.node2 = mapping[&c.node2];
            if let ComponentKind::DependentVoltageSource { control, .. }
            | ComponentKind::DependentCurrentSource { control, .. } = &mut c.kind
            {
                control.node1 = mapping[&control.node1];
                control.node2 = mapping[&control.node2];
            }
        }
        self.refresh_nodes();
        debug!("renumbered {} nodes, terminals={terminals:?}", mapping.len());
        mapping
    }

    /// Keeps only the components the predicate accepts and rebuilds the
    /// node registry.
    pub(crate) fn retain_components(&mut self, f: impl FnMut(&Component) -> bool) {
        self.components.retain(f);
        self.refresh_nodes();
    }

    /// Rebuilds the registry from the component list.
    fn refresh_nodes(&mut self) {
        self.nodes.clear();
        for i in 0..self.components.len() {
            let (n1, n2) = (self.components[i].node1, self.components[i].node2);
            self.register(n1);
            self.register(n2);
        }
    }

    fn register(&mut self, node: NodeId) {
        *self.nodes.entry(node).or_insert(0) += 1;
    }

    fn unregister(&mut self, node: NodeId) {
        if let Some(count) = self.nodes.get_mut(&node) {
            *count -= 1;
            if *count == 0 {
                self.nodes.remove(&node);
            }
        }
    }
}
