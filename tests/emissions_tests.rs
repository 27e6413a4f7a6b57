use approx::assert_abs_diff_eq;
use carbon_passport::emissions::{
    Error, TransportMode, emissions_for, savings_percentage, trees_equivalent,
};

#[test]
fn seoul_busan_known_values() {
    let emissions = emissions_for(328.57).unwrap();
    assert_abs_diff_eq!(emissions.train(), 13.3, epsilon = 0.5);
    assert_abs_diff_eq!(emissions.car(), 55.6, epsilon = 1.0);
    assert_abs_diff_eq!(emissions.saved(), 42.3, epsilon = 1.0);
    assert_eq!(emissions.train(), 13.47);
    assert_eq!(emissions.car(), 56.19);
    assert_eq!(emissions.saved(), 42.72);
}

#[test]
fn every_field_is_non_negative() {
    let mut distance = 0.0;
    while distance < 2_000.0 {
        let emissions = emissions_for(distance).unwrap();
        for mode in TransportMode::ALL {
            assert!(emissions.by_mode(mode) >= 0.0);
        }
        assert!(emissions.saved() >= 0.0);
        distance += 7.31;
    }
}

#[test]
fn emissions_are_linear_within_rounding() {
    let pairs = [(12.34, 56.78), (0.5, 0.5), (328.57, 142.02), (1.0, 999.99)];
    for (a, b) in pairs {
        let combined = emissions_for(a + b).unwrap();
        let first = emissions_for(a).unwrap();
        let second = emissions_for(b).unwrap();
        for mode in TransportMode::ALL {
            assert_abs_diff_eq!(
                combined.by_mode(mode),
                first.by_mode(mode) + second.by_mode(mode),
                epsilon = 0.011
            );
        }
    }
}

#[test]
fn invalid_distances() {
    assert_eq!(emissions_for(-0.01), Err(Error::InvalidDistance(-0.01)));
    assert!(savings_percentage(-1.0, TransportMode::Car).is_err());
}

#[test]
fn percentages_against_each_mode() {
    assert_eq!(savings_percentage(0.0, TransportMode::Airplane), Ok(0.0));
    let car = savings_percentage(100.0, TransportMode::Car).unwrap();
    let bus = savings_percentage(100.0, TransportMode::Bus).unwrap();
    let airplane = savings_percentage(100.0, TransportMode::Airplane).unwrap();
    assert!(bus < car && car < airplane);
    assert_abs_diff_eq!(car, 76.02, epsilon = 0.01);
}

#[test]
fn tree_equivalents() {
    assert_eq!(trees_equivalent(44.0), 2);
    assert_eq!(trees_equivalent(23.0), 2);
    assert_eq!(trees_equivalent(42.72), 2);
    assert_eq!(trees_equivalent(66.01), 4);
}
