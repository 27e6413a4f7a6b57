use std::{
    cmp,
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS: Distance = Distance::from_kilometers(6371.0);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(Coordinate),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, distance| acc + distance)
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

/// WGS84 position in decimal degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl Coordinate {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn validate(self) -> Result<Self, Error> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidCoordinate(self))
        }
    }

    /// Unrounded great-circle distance. Chain this one through calculations
    /// and only round at the display boundary.
    pub fn haversine(&self, coord: &Self) -> Result<Distance, Error> {
        let a = self.validate()?;
        let b = coord.validate()?;
        // Always evaluate in the same operand order so that a->b and b->a
        // produce bit-identical results.
        let (a, b) = if (a.latitude, a.longitude) <= (b.latitude, b.longitude) {
            (a, b)
        } else {
            (b, a)
        };
        let dist_lat = f64::to_radians(b.latitude - a.latitude);
        let dist_lon = f64::to_radians(b.longitude - a.longitude);
        let h = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(a.latitude))
                * f64::cos(f64::to_radians(b.latitude))
                * f64::powi(f64::sin(dist_lon / 2.0), 2);
        let c = 2.0 * f64::atan2(f64::sqrt(h), f64::sqrt(1.0 - h));
        Ok(Distance::from_meters(EARTH_RADIUS.as_meters() * c))
    }

    /// Great-circle distance rounded to the nearest whole kilometer.
    pub fn distance_km(&self, coord: &Self) -> Result<f64, Error> {
        Ok(self.haversine(coord)?.as_kilometers().round())
    }

    /// Initial great-circle bearing towards `coord`, in degrees within [0, 360).
    pub fn bearing(&self, coord: &Self) -> Result<f64, Error> {
        let a = self.validate()?;
        let b = coord.validate()?;
        let lat_a = a.latitude.to_radians();
        let lat_b = b.latitude.to_radians();
        let dist_lon = (b.longitude - a.longitude).to_radians();
        let y = dist_lon.sin() * lat_b.cos();
        let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * dist_lon.cos();
        let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
        // rem_euclid can land exactly on 360.0 for tiny negative inputs
        Ok(if bearing >= 360.0 { 0.0 } else { bearing })
    }

    /// Point halfway along the great circle between both coordinates.
    pub fn midpoint(&self, coord: &Self) -> Result<Coordinate, Error> {
        let a = self.validate()?;
        let b = coord.validate()?;
        let lat_a = a.latitude.to_radians();
        let lat_b = b.latitude.to_radians();
        let lon_a = a.longitude.to_radians();
        let dist_lon = (b.longitude - a.longitude).to_radians();

        let bx = lat_b.cos() * dist_lon.cos();
        let by = lat_b.cos() * dist_lon.sin();
        let latitude = f64::atan2(
            lat_a.sin() + lat_b.sin(),
            f64::sqrt((lat_a.cos() + bx).powi(2) + by.powi(2)),
        );
        let longitude = lon_a + f64::atan2(by, lat_a.cos() + bx);
        let longitude = (longitude.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
        Ok(Coordinate {
            latitude: latitude.to_degrees(),
            longitude,
        })
    }
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}

#[test]
fn distance_sum_test() {
    let total: Distance = [1.5, 2.5, 1.0]
        .into_iter()
        .map(Distance::from_kilometers)
        .sum();
    assert_eq!(total, Distance::from_kilometers(5.0));
}

#[test]
fn out_of_range_latitude() {
    let coord = Coordinate::from((91.0, 0.0));
    assert_eq!(coord.validate(), Err(Error::InvalidCoordinate(coord)));
}

#[test]
fn non_finite_longitude() {
    let coord = Coordinate::from((0.0, f64::NAN));
    assert!(!coord.is_valid());
    assert!(Coordinate::default().haversine(&coord).is_err());
}
