use std::{collections::HashMap, sync::Arc};

mod models;
mod source;
pub use models::*;
use thiserror::Error;

use crate::shared::{self, Coordinate, Identifiable, Locale};

type IdToIndex = HashMap<Arc<str>, u32>;
type IdToIndexes = HashMap<Arc<str>, Box<[u32]>>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Station code {0} is declared more than once")]
    DuplicateCode(String),
    #[error("Station {0} is missing its primary or fallback name")]
    MissingName(String),
    #[error("Station {0} has an invalid coordinate: {1}")]
    InvalidCoordinate(String, Coordinate),
    #[error("Unknown station: {0}")]
    StationNotFound(String),
    #[error("Station name {0} matches more than one station")]
    AmbiguousStation(String),
    #[error("Station {0} is no longer served")]
    InactiveStation(String),
}

/// Read-only station directory. Loaded once, then shared between callers
/// without locking.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub stations: Box<[Station]>,
    station_lookup: IdToIndex,
    region_to_stations: IdToIndexes,
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    /// Get a station by its code, ignoring case.
    /// If no station has the given code None is returned.
    pub fn station_by_code(&self, code: &str) -> Option<&Station> {
        let code = code.trim().to_ascii_uppercase();
        let index = self.station_lookup.get(code.as_str())?;
        Some(&self.stations[*index as usize])
    }

    /// Exact, case-insensitive match on the display name of one locale.
    /// Never falls back to a partial match, use [`Repository::search_stations`]
    /// for that.
    pub fn station_by_name(&self, name: &str, locale: Locale) -> Option<&Station> {
        let needle = name.trim().to_lowercase();
        self.stations
            .iter()
            .find(|station| station.normalized_name(locale) == needle)
    }

    /// Resolves a station code or an exact display name in any locale.
    /// A name shared by several stations is rejected instead of guessed, and
    /// so is a station that is no longer active.
    pub fn resolve(&self, identifier: &str) -> Result<&Station, Error> {
        let station = self.resolve_any(identifier)?;
        if !station.is_active {
            return Err(Error::InactiveStation(station.code.to_string()));
        }
        Ok(station)
    }

    fn resolve_any(&self, identifier: &str) -> Result<&Station, Error> {
        if let Some(station) = self.station_by_code(identifier) {
            return Ok(station);
        }
        let needle = identifier.trim().to_lowercase();
        let mut matches = self.stations.iter().filter(|station| {
            station
                .normalized_names
                .iter()
                .any(|name| name.as_ref() == needle)
        });
        match (matches.next(), matches.next()) {
            (Some(station), None) => Ok(station),
            (Some(_), Some(_)) => Err(Error::AmbiguousStation(identifier.to_string())),
            (None, _) => Err(Error::StationNotFound(identifier.to_string())),
        }
    }

    /// Substring search on the names of the given locale, in dataset order.
    pub fn search_stations(&self, query: &str, locale: Locale) -> Vec<&Station> {
        shared::search(query, &self.stations, locale)
    }

    pub fn stations_by_region(&self, region: &str) -> Vec<&Station> {
        self.region_to_stations
            .get(region.trim().to_lowercase().as_str())
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|index| &self.stations[*index as usize])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn list(&self, active_only: bool) -> Vec<&Station> {
        self.stations
            .iter()
            .filter(|station| !active_only || station.is_active)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
