use approx::assert_abs_diff_eq;
use carbon_passport::shared::{Coordinate, geo};

const SEOUL: Coordinate = Coordinate {
    latitude: 37.5547,
    longitude: 126.9707,
};

const BUSAN: Coordinate = Coordinate {
    latitude: 35.1154,
    longitude: 129.0413,
};

#[test]
fn seoul_to_busan() {
    let distance = SEOUL.haversine(&BUSAN).unwrap();
    assert_abs_diff_eq!(distance.as_kilometers(), 325.0, epsilon = 10.0);
    assert_eq!(SEOUL.distance_km(&BUSAN).unwrap(), 329.0);
}

#[test]
fn paris_to_london() {
    let paris = Coordinate::from((48.85800943005911, 2.3514350059357927));
    let london = Coordinate::from((51.5052389927712, -0.12495407345099824));
    let distance = paris.haversine(&london).unwrap();
    assert_abs_diff_eq!(distance.as_kilometers(), 343.0, epsilon = 2.0);
}

#[test]
fn distance_is_symmetric() {
    let points = [
        SEOUL,
        BUSAN,
        Coordinate::from((-33.8688, 151.2093)),
        Coordinate::from((64.1466, -21.9426)),
        Coordinate::from((0.0, 179.9)),
        Coordinate::from((0.0, -179.9)),
        Coordinate::from((-90.0, 0.0)),
    ];
    for a in points {
        for b in points {
            assert_eq!(a.haversine(&b).unwrap(), b.haversine(&a).unwrap());
        }
    }
}

#[test]
fn same_point_is_zero() {
    assert_eq!(SEOUL.haversine(&SEOUL).unwrap().as_meters(), 0.0);
}

#[test]
fn rejects_invalid_coordinates() {
    let invalid = Coordinate::from((12.0, 181.0));
    assert_eq!(
        SEOUL.haversine(&invalid),
        Err(geo::Error::InvalidCoordinate(invalid))
    );
    assert!(invalid.bearing(&SEOUL).is_err());
    assert!(SEOUL.midpoint(&invalid).is_err());
}

#[test]
fn bearing_cardinal_directions() {
    let origin = Coordinate::from((0.0, 0.0));
    let north = Coordinate::from((10.0, 0.0));
    let east = Coordinate::from((0.0, 10.0));
    let west = Coordinate::from((0.0, -10.0));
    assert_abs_diff_eq!(origin.bearing(&north).unwrap(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(origin.bearing(&east).unwrap(), 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(origin.bearing(&west).unwrap(), 270.0, epsilon = 1e-9);

    let bearing = SEOUL.bearing(&BUSAN).unwrap();
    assert!((0.0..360.0).contains(&bearing));
    assert_abs_diff_eq!(bearing, 145.0, epsilon = 5.0);
}

#[test]
fn midpoint_lies_between() {
    let midpoint = SEOUL.midpoint(&BUSAN).unwrap();
    assert!(midpoint.latitude < SEOUL.latitude && midpoint.latitude > BUSAN.latitude);
    assert!(midpoint.longitude > SEOUL.longitude && midpoint.longitude < BUSAN.longitude);

    let half = SEOUL.haversine(&midpoint).unwrap().as_kilometers();
    let total = SEOUL.haversine(&BUSAN).unwrap().as_kilometers();
    assert_abs_diff_eq!(half * 2.0, total, epsilon = 0.01);

    let across = Coordinate::from((0.0, 170.0))
        .midpoint(&Coordinate::from((0.0, -170.0)))
        .unwrap();
    assert_abs_diff_eq!(across.longitude.abs(), 180.0, epsilon = 1e-9);
}
