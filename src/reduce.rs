use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::component::Component;
use crate::errors::CircuitError;
use crate::graph::{Circuit, NodeId};

/// Breadth-first traversal over the undirected multigraph implied by the
/// components' endpoint pairs. Any component variant makes its two
/// endpoints adjacent.
fn bfs<'a>(
    components: impl Iterator<Item = &'a Component> + Clone,
    origin: NodeId,
) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(origin);
    while let Some(node) = queue.pop_front() {
        if !seen.insert(node) {
            continue;
        }
        for c in components.clone() {
            if c.node1 == node && !seen.contains(&c.node2) {
                queue.push_back(c.node2);
            }
            if c.node2 == node && !seen.contains(&c.node1) {
                queue.push_back(c.node1);
            }
        }
    }
    seen
}

/// Set of nodes reachable from `start` through any component.
pub fn reachable_set(circuit: &Circuit, start: NodeId) -> HashSet<NodeId> {
    bfs(circuit.components().iter(), start)
}

/// Whether an electrical path exists between two nodes.
pub fn path_exists(circuit: &Circuit, origin: NodeId, destination: NodeId) -> bool {
    reachable_set(circuit, origin).contains(&destination)
}

/// Drops every component with an endpoint outside the connected subgraph
/// containing `a`. Fails with `DisconnectedTerminals` when `b` does not
/// belong to that subgraph.
pub fn remove_unreachable(
    circuit: &mut Circuit,
    a: NodeId,
    b: NodeId,
) -> Result<(), CircuitError> {
    let reached = reachable_set(circuit, a);
    if !reached.contains(&b) {
        return Err(CircuitError::DisconnectedTerminals(a, b));
    }
    circuit.retain_components(|c| reached.contains(&c.node1) && reached.contains(&c.node2));
    debug!(
        "unreachable components removed, {} remain",
        circuit.components().len()
    );
    Ok(())
}

/// Iteratively removes resistors that are the sole attachment of some
/// non-terminal node, until no such node remains. Stub branches carry no
/// current and contribute nothing to the measured quantity. A node whose
/// single attachment is a source is left alone: its branch is live, the
/// source's own equation resolves it.
pub fn remove_dangling(circuit: &mut Circuit, a: NodeId, b: NodeId) {
    loop {
        let mut degree: HashMap<NodeId, usize> = HashMap::new();
        for c in circuit.components() {
            *degree.entry(c.node1).or_insert(0) += 1;
            *degree.entry(c.node2).or_insert(0) += 1;
        }
        let Some(dangling) = degree
            .iter()
            .find(|(node, count)| {
                **node != a
                    && **node != b
                    && **count == 1
                    && circuit
                        .components()
                        .iter()
                        .any(|c| c.kind.is_passive() && c.touches(**node))
            })
            .map(|(node, _)| *node)
        else {
            break;
        };
        circuit.retain_components(|c| !(c.kind.is_passive() && c.touches(dangling)));
        debug!("removed dangling resistor at node {dangling}");
    }
}

/// Detects the two boundary nodes ("bornes") through which the load-marked
/// subgraph attaches to the rest of the circuit.
///
/// The selection must be non-empty, source-free and one connected block;
/// the boundary (intersection of load-touched and non-load-touched node
/// sets) must have exactly two members.
pub fn detect_load_boundary(circuit: &Circuit) -> Result<(NodeId, NodeId), CircuitError> {
    let load: Vec<&Component> = circuit.load_components().collect();
    if load.is_empty() {
        return Err(CircuitError::InvalidComponent(
            "no load component selected".to_string(),
        ));
    }
    if let Some(source) = load.iter().find(|c| c.kind.is_source()) {
        return Err(CircuitError::InvalidComponent(format!(
            "load selection contains a {}",
            source.kind.label()
        )));
    }

    let mut load_nodes: HashSet<NodeId> = HashSet::new();
    for c in &load {
        load_nodes.insert(c.node1);
        load_nodes.insert(c.node2);
    }

    // The selection is connected iff a load-only BFS from its smallest
    // node reaches every load endpoint.
    let seed = load_nodes.iter().min().copied().unwrap_or(0);
    let reached = bfs(load.iter().copied(), seed);
    if load
        .iter()
        .any(|c| !reached.contains(&c.node1) || !reached.contains(&c.node2))
    {
        return Err(CircuitError::DisjointLoad);
    }

    let mut rest_nodes: HashSet<NodeId> = HashSet::new();
    for c in circuit.components().iter().filter(|c| !c.is_load()) {
        rest_nodes.insert(c.node1);
        rest_nodes.insert(c.node2);
    }

    let mut boundary: Vec<NodeId> = load_nodes.intersection(&rest_nodes).copied().collect();
    if boundary.len() != 2 {
        return Err(CircuitError::InvalidBoundary(boundary.len()));
    }
    boundary.sort_unstable();
    debug!("load boundary nodes: {} and {}", boundary[0], boundary[1]);
    Ok((boundary[0], boundary[1]))
}

impl Circuit {
    /// See [`path_exists`].
    pub fn path_exists(&self, origin: NodeId, destination: NodeId) -> bool {
        path_exists(self, origin, destination)
    }

    /// See [`reachable_set`].
    pub fn reachable_set(&self, start: NodeId) -> HashSet<NodeId> {
        reachable_set(self, start)
    }
}
