//! Thévenin and Norton equivalents of linear resistive circuits.
//!
//! The engine models a circuit as a multigraph of two-terminal
//! components, reduces it topologically around a terminal pair, solves
//! the nodal system by modified nodal analysis and derives the
//! open-circuit voltage and driving-point resistance.

pub mod component;
pub mod equivalent;
pub mod errors;
pub mod graph;
pub mod reduce;
pub mod solver;
pub mod units;

pub use component::{Component, ComponentId, ComponentKind, Control, ControlKind};
pub use equivalent::{
    EquivalentCircuit, NortonEquivalent, TheveninEquivalent, norton, norton_equivalent_circuit,
    thevenin, thevenin_equivalent_circuit,
};
pub use errors::CircuitError;
pub use graph::{Circuit, NodeId};
pub use units::{Current, Gain, Quantity, Resistance, Voltage};
