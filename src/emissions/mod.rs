//! Per-kilometer CO2 estimates for each transport mode.
//!
//! One canonical factor set is used everywhere in the crate. Train is always
//! compared against car, the mode a rail trip is assumed to replace.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::shared::round_to;

/// kg CO2 per passenger-km.
pub const TRAIN_FACTOR: f64 = 0.041;
pub const CAR_FACTOR: f64 = 0.171;
pub const BUS_FACTOR: f64 = 0.089;
pub const AIRPLANE_FACTOR: f64 = 0.285;

/// kg CO2 a single mature tree absorbs in one year.
pub const TREE_ABSORPTION_KG_PER_YEAR: f64 = 22.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid distance: {0} km")]
    InvalidDistance(f64),
    #[error("Unknown transport mode: {0}")]
    UnknownMode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Train,
    Car,
    Bus,
    Airplane,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Train,
        TransportMode::Car,
        TransportMode::Bus,
        TransportMode::Airplane,
    ];

    pub const fn factor(&self) -> f64 {
        match self {
            TransportMode::Train => TRAIN_FACTOR,
            TransportMode::Car => CAR_FACTOR,
            TransportMode::Bus => BUS_FACTOR,
            TransportMode::Airplane => AIRPLANE_FACTOR,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Train => "train",
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Airplane => "airplane",
        }
    }
}

impl Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(TransportMode::Train),
            "car" => Ok(TransportMode::Car),
            "bus" => Ok(TransportMode::Bus),
            "airplane" | "plane" => Ok(TransportMode::Airplane),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// Estimated emissions of one distance for every mode, in kg rounded to
/// two decimals. `saved` is always `car - train` and cannot be set on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Co2Emissions {
    train: f64,
    car: f64,
    bus: f64,
    airplane: f64,
    saved: f64,
}

impl Co2Emissions {
    /// Rebuilds emissions stored when a route was created. The stored values
    /// are kept as-is even if the factors have changed since.
    pub fn from_snapshot(train: f64, car: f64, bus: f64, airplane: f64) -> Self {
        let saved = round_to(car - train, 2);
        if saved < 0.0 {
            warn!("Train emissions {train} exceed car emissions {car}, saved is negative");
        }
        Self {
            train,
            car,
            bus,
            airplane,
            saved,
        }
    }

    pub const fn train(&self) -> f64 {
        self.train
    }

    pub const fn car(&self) -> f64 {
        self.car
    }

    pub const fn bus(&self) -> f64 {
        self.bus
    }

    pub const fn airplane(&self) -> f64 {
        self.airplane
    }

    pub const fn saved(&self) -> f64 {
        self.saved
    }

    pub const fn by_mode(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Train => self.train,
            TransportMode::Car => self.car,
            TransportMode::Bus => self.bus,
            TransportMode::Airplane => self.airplane,
        }
    }
}

fn validate_distance(distance_km: f64) -> Result<f64, Error> {
    if distance_km.is_finite() && distance_km >= 0.0 {
        Ok(distance_km)
    } else {
        Err(Error::InvalidDistance(distance_km))
    }
}

/// Emissions of a single distance. Pass the unrounded distance, every field is
/// rounded independently from it. Distances too large to estimate without
/// overflowing are rejected.
pub fn emissions_for(distance_km: f64) -> Result<Co2Emissions, Error> {
    let distance_km = validate_distance(distance_km)?;
    let [train, car, bus, airplane] =
        TransportMode::ALL.map(|mode| round_to(distance_km * mode.factor(), 2));
    if ![train, car, bus, airplane].iter().all(|value| value.is_finite()) {
        return Err(Error::InvalidDistance(distance_km));
    }
    Ok(Co2Emissions::from_snapshot(train, car, bus, airplane))
}

/// Number of trees needed to absorb `co2_kg` over a year, rounded up.
pub fn trees_equivalent(co2_kg: f64) -> u32 {
    if !co2_kg.is_finite() || co2_kg <= 0.0 {
        return 0;
    }
    (co2_kg / TREE_ABSORPTION_KG_PER_YEAR).ceil() as u32
}

/// Share of `compare_mode` emissions avoided by taking the train, in percent.
pub fn savings_percentage(distance_km: f64, compare_mode: TransportMode) -> Result<f64, Error> {
    let distance_km = validate_distance(distance_km)?;
    let other = distance_km * compare_mode.factor();
    if other == 0.0 {
        return Ok(0.0);
    }
    let train = distance_km * TRAIN_FACTOR;
    Ok((other - train) / other * 100.0)
}
