//! Turns user supplied legs into validated routes with distances and emissions.
//!
//! A bad leg never aborts the batch: it is reported in [`Assembly::errors`]
//! and the remaining legs are still assembled.

use std::{fmt::Display, sync::Arc};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    emissions::{self, Co2Emissions, TransportMode, emissions_for},
    repository::{self, Repository, Station},
    shared::{geo, round_to},
};

/// Longest distance a leg may claim, roughly half the Earth's circumference.
pub const MAX_LEG_DISTANCE_KM: f64 = 20_000.0;

/// One origin -> destination segment as entered by the traveler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Station code or exact station name.
    #[serde(alias = "origin", alias = "start")]
    pub from: String,
    #[serde(alias = "destination", alias = "end")]
    pub to: String,
    /// Distance in km to use instead of the great-circle distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Leg {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            distance: None,
        }
    }

    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance = Some(distance_km);
        self
    }
}

#[derive(Error, Debug)]
pub enum LegFailure {
    #[error("missing {0} station")]
    MissingStation(&'static str),
    #[error(transparent)]
    Station(#[from] repository::Error),
    #[error("origin and destination are the same station ({0})")]
    SameStation(Arc<str>),
    #[error(transparent)]
    Coordinate(#[from] geo::Error),
    #[error(transparent)]
    Distance(#[from] emissions::Error),
    #[error("distance {0} km exceeds the {MAX_LEG_DISTANCE_KM} km limit for a single leg")]
    DistanceTooLong(f64),
}

/// A leg that could not be assembled. `index` is the zero-based position in
/// the submitted list.
#[derive(Debug)]
pub struct LegError {
    pub index: usize,
    pub failure: LegFailure,
}

impl Display for LegError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Leg {}: {}", self.index + 1, self.failure)
    }
}

impl std::error::Error for LegError {}

/// A validated leg. Distances are in km rounded to two decimals, emissions
/// were computed from the unrounded distance.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRoute {
    /// Zero-based position among the successfully assembled legs.
    pub sequence_order: u32,
    pub origin: Arc<str>,
    pub destination: Arc<str>,
    pub distance: f64,
    pub co2: Co2Emissions,
}

#[derive(Debug, Default)]
pub struct Assembly {
    pub routes: Vec<EnrichedRoute>,
    pub total_distance: f64,
    pub total_emissions: Co2Emissions,
    pub errors: Vec<LegError>,
}

impl Assembly {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

struct ResolvedLeg<'a> {
    origin: &'a Station,
    destination: &'a Station,
    distance_km: f64,
}

fn resolve_leg<'a>(repository: &'a Repository, leg: &Leg) -> Result<ResolvedLeg<'a>, LegFailure> {
    if leg.from.trim().is_empty() {
        return Err(LegFailure::MissingStation("origin"));
    }
    if leg.to.trim().is_empty() {
        return Err(LegFailure::MissingStation("destination"));
    }
    let origin = repository.resolve(&leg.from)?;
    let destination = repository.resolve(&leg.to)?;
    if origin.code == destination.code {
        return Err(LegFailure::SameStation(origin.code.clone()));
    }
    let distance_km = match leg.distance {
        Some(distance_km) if !distance_km.is_finite() || distance_km < 0.0 => {
            return Err(emissions::Error::InvalidDistance(distance_km).into());
        }
        Some(distance_km) if distance_km > MAX_LEG_DISTANCE_KM => {
            return Err(LegFailure::DistanceTooLong(distance_km));
        }
        Some(distance_km) => distance_km,
        None => origin
            .coordinate
            .haversine(&destination.coordinate)?
            .as_kilometers(),
    };
    Ok(ResolvedLeg {
        origin,
        destination,
        distance_km,
    })
}

/// Assembles legs in input order. Sequence numbers are contiguous from zero
/// over the legs that succeeded, skipped legs leave no gaps.
pub fn assemble(repository: &Repository, legs: &[Leg]) -> Assembly {
    let resolved: Vec<Result<(ResolvedLeg, Co2Emissions), LegFailure>> = legs
        .par_iter()
        .map(|leg| -> Result<(ResolvedLeg<'_>, Co2Emissions), LegFailure> {
            let resolved = resolve_leg(repository, leg)?;
            let co2 = emissions_for(resolved.distance_km)?;
            Ok((resolved, co2))
        })
        .collect();

    let mut assembly = Assembly::default();
    for (index, result) in resolved.into_iter().enumerate() {
        match result {
            Ok((leg, co2)) => {
                assembly.routes.push(EnrichedRoute {
                    sequence_order: assembly.routes.len() as u32,
                    origin: leg.origin.code.clone(),
                    destination: leg.destination.code.clone(),
                    distance: round_to(leg.distance_km, 2),
                    co2,
                });
            }
            Err(failure) => {
                let error = LegError { index, failure };
                debug!("Skipping leg: {error}");
                assembly.errors.push(error);
            }
        }
    }

    assembly.total_distance = round_to(
        assembly.routes.iter().map(|route| route.distance).sum(),
        2,
    );
    assembly.total_emissions = match emissions_for(assembly.total_distance) {
        Ok(emissions) => emissions,
        Err(err) => {
            error!("Falling back to summed leg emissions: {err}");
            summed_emissions(&assembly.routes)
        }
    };
    assembly
}

fn summed_emissions(routes: &[EnrichedRoute]) -> Co2Emissions {
    let total = |mode: TransportMode| {
        round_to(routes.iter().map(|route| route.co2.by_mode(mode)).sum(), 2)
    };
    Co2Emissions::from_snapshot(
        total(TransportMode::Train),
        total(TransportMode::Car),
        total(TransportMode::Bus),
        total(TransportMode::Airplane),
    )
}
