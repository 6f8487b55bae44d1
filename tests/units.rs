use approx::assert_relative_eq;
use equiv_solve::units::{Quantity, format_value, parse_value};
use equiv_solve::{CircuitError, Current, Gain, Resistance, Voltage};
use proptest::prelude::*;

#[test]
fn parses_plain_numbers() {
    assert_relative_eq!(parse_value("42").unwrap(), 42.0);
    assert_relative_eq!(parse_value("0.5").unwrap(), 0.5);
    assert_relative_eq!(parse_value("-12").unwrap(), -12.0);
    assert_relative_eq!(parse_value("+3.3").unwrap(), 3.3);
    assert_relative_eq!(parse_value("  7  ").unwrap(), 7.0);
}

#[test]
fn parses_si_suffixes() {
    assert_relative_eq!(parse_value("2G").unwrap(), 2e9, max_relative = 1e-12);
    assert_relative_eq!(parse_value("1M").unwrap(), 1e6, max_relative = 1e-12);
    assert_relative_eq!(parse_value("3k").unwrap(), 3000.0, max_relative = 1e-12);
    assert_relative_eq!(parse_value("2.2k").unwrap(), 2200.0, max_relative = 1e-12);
    assert_relative_eq!(parse_value("4m").unwrap(), 4e-3, max_relative = 1e-12);
    assert_relative_eq!(parse_value("500m").unwrap(), 0.5, max_relative = 1e-12);
    assert_relative_eq!(parse_value("5µ").unwrap(), 5e-6, max_relative = 1e-12);
    assert_relative_eq!(parse_value("5u").unwrap(), 5e-6, max_relative = 1e-12);
    assert_relative_eq!(parse_value("10n").unwrap(), 1e-8, max_relative = 1e-12);
    assert_relative_eq!(parse_value("-4m").unwrap(), -4e-3, max_relative = 1e-12);
}

#[test]
fn suffix_case_sensitivity() {
    // The unambiguous letters fold case.
    assert_relative_eq!(parse_value("3K").unwrap(), 3000.0, max_relative = 1e-12);
    assert_relative_eq!(parse_value("2g").unwrap(), 2e9, max_relative = 1e-12);
    assert_relative_eq!(parse_value("7N").unwrap(), 7e-9, max_relative = 1e-12);
    // Mega and milli do not.
    assert_relative_eq!(parse_value("4M").unwrap(), 4e6, max_relative = 1e-12);
    assert_relative_eq!(parse_value("4m").unwrap(), 4e-3, max_relative = 1e-12);
}

#[test]
fn rejects_malformed_input() {
    for text in ["", "   ", "k", "3x", "3kk", "k3", "1e3", "--4", "3.2.1"] {
        assert!(
            matches!(parse_value(text), Err(CircuitError::MalformedValue(_))),
            "{text:?} should not parse"
        );
    }
}

#[test]
fn formats_with_largest_fitting_prefix() {
    assert_eq!(format_value(4333.33, Quantity::Resistance), "4.333 kΩ");
    assert_eq!(format_value(500.0, Quantity::Resistance), "500 Ω");
    assert_eq!(format_value(0.005, Quantity::Current), "5 mA");
    assert_eq!(format_value(12.0, Quantity::Voltage), "12 V");
    assert_eq!(format_value(2.2e6, Quantity::Resistance), "2.2 MΩ");
    assert_eq!(format_value(4.7e-6, Quantity::Current), "4.7 µA");
    assert_eq!(format_value(-24.0, Quantity::Voltage), "-24 V");
}

#[test]
fn formats_out_of_range_values_scientifically() {
    // Nothing in [1, 1000) for these; scientific notation instead.
    assert!(format_value(0.0, Quantity::Voltage).contains('e'));
    assert!(format_value(5e12, Quantity::Resistance).contains('e'));
    assert!(format_value(3e-12, Quantity::Current).contains('e'));
}

#[test]
fn resistance_must_be_positive_and_finite() {
    assert!(Resistance::new(1000.0).is_ok());
    for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            Resistance::new(bad),
            Err(CircuitError::InvalidResistance(_))
        ));
    }
    assert!(matches!(
        Resistance::parse("-3k"),
        Err(CircuitError::InvalidResistance(_))
    ));
}

#[test]
fn sources_accept_any_finite_value() {
    assert!(Voltage::new(-12.0).is_ok());
    assert!(Current::new(0.0).is_ok());
    assert!(Voltage::new(f64::NAN).is_err());
    assert!(Current::new(f64::NEG_INFINITY).is_err());
}

#[test]
fn quantity_newtypes_parse_suffixed_strings() {
    assert_relative_eq!(f64::from(Resistance::parse("3k").unwrap()), 3000.0, max_relative = 1e-12);
    assert_relative_eq!(f64::from(Voltage::parse("500m").unwrap()), 0.5, max_relative = 1e-12);
    assert_relative_eq!(f64::from(Current::parse("4m").unwrap()), 4e-3, max_relative = 1e-12);
    assert_relative_eq!(f64::from(Gain::parse("2k").unwrap()), 2000.0, max_relative = 1e-12);
}

proptest! {

#[test]
fn prop_parse_scales_by_prefix(
    value in 1.0_f64..999.0_f64
) {
    let base = parse_value(&format!("{value}")).unwrap();
    let kilo = parse_value(&format!("{value}k")).unwrap();
    let milli = parse_value(&format!("{value}m")).unwrap();
    prop_assert!((kilo - base * 1e3).abs() <= base * 1e-6);
    prop_assert!((milli - base * 1e-3).abs() <= base * 1e-6);
}

#[test]
fn prop_formatted_prefix_range_is_normalized(
    value in 1e-9_f64..1e9_f64
) {
    // Whenever a prefix applies, the leading numeric part lies in [1, 1000).
    let text = format_value(value, Quantity::Resistance);
    if !text.contains('e') {
        let numeric: f64 = text
            .split_whitespace()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        prop_assert!((1.0..1000.0).contains(&numeric.abs()) || numeric.abs() == 1000.0);
    }
}

}
