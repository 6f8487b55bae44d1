/// strategies.rs
use equiv_solve::{Circuit, ComponentKind, Current, Resistance, Voltage};
use proptest::prelude::*;

/// Generate arbitrary component kinds with physical values.
pub fn arbitrary_component_kind() -> impl Strategy<Value = ComponentKind> {
    prop_oneof![
        (1e-3_f64..1e9_f64).prop_map(|r| ComponentKind::Resistor {
            r: Resistance::new(r).unwrap()
        }),
        (-1e3_f64..1e3_f64).prop_map(|v| ComponentKind::VoltageSource {
            v: Voltage::new(v).unwrap()
        }),
        (-1e3_f64..1e3_f64).prop_map(|i| ComponentKind::CurrentSource {
            i: Current::new(i).unwrap()
        }),
    ]
}

/// Generate arbitrary circuits over a small node span. Components always
/// join two distinct nodes; connectivity is not guaranteed.
pub fn arbitrary_circuit() -> impl Strategy<Value = Circuit> {
    (2usize..=8)
        .prop_flat_map(|node_span| {
            prop::collection::vec(
                (
                    arbitrary_component_kind(),
                    (0usize..node_span, 0usize..node_span)
                        .prop_filter("distinct nodes", |(a, b)| a != b),
                ),
                1..=12,
            )
        })
        .prop_map(|components| {
            let mut circuit = Circuit::new();
            for (kind, (n1, n2)) in components {
                circuit.add(kind, n1, n2).unwrap();
            }
            circuit
        })
}

/// Generate arbitrary resistor-only circuits (useful for passes that only
/// look at resistive adjacency).
pub fn arbitrary_resistive_circuit() -> impl Strategy<Value = Circuit> {
    (2usize..=8)
        .prop_flat_map(|node_span| {
            prop::collection::vec(
                (
                    1.0_f64..1e6_f64,
                    (0usize..node_span, 0usize..node_span)
                        .prop_filter("distinct nodes", |(a, b)| a != b),
                ),
                1..=12,
            )
        })
        .prop_map(|resistors| {
            let mut circuit = Circuit::new();
            for (ohms, (n1, n2)) in resistors {
                circuit
                    .add(
                        ComponentKind::Resistor {
                            r: Resistance::new(ohms).unwrap(),
                        },
                        n1,
                        n2,
                    )
                    .unwrap();
            }
            circuit
        })
}
