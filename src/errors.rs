use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("Only one ground component is allowed per circuit")]
    DuplicateGround,
    #[error("No electrical path between terminals {0} and {1}")]
    DisconnectedTerminals(NodeId, NodeId),
    #[error("Load selection does not form a single connected block")]
    DisjointLoad,
    #[error("Load selection has {0} boundary node(s) with the rest of the circuit (must be exactly 2)")]
    InvalidBoundary(usize),
    #[error("Nodal system is singular (floating sub-circuit or conflicting sources)")]
    SingularSystem,
    #[error("Nodal solve produced a non-finite voltage")]
    Computation,
    #[error("Terminal node {0} vanished after deactivating sources")]
    UnresolvedTerminal(NodeId),
    #[error("Short-circuit current is undefined: Req = 0 with nonzero open-circuit voltage")]
    DivisionByZero,
    #[error("Invalid equivalent resistance: {0}")]
    InvalidResistance(f64),
    #[error("Malformed value: {0}")]
    MalformedValue(String),
    #[error("Invalid component: {0}")]
    InvalidComponent(String),
}
