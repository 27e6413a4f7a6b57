use std::{collections::HashMap, io, sync::Arc, time::Instant};

use serde::Deserialize;
use tracing::debug;

use crate::{
    repository::{Error, Repository, Station},
    shared::Coordinate,
};

const BUNDLED_STATIONS: &str = include_str!("../../../data/stations.csv");

#[derive(Debug, Deserialize)]
struct StationRow {
    code: String,
    name_ko: String,
    name_en: String,
    #[serde(default)]
    name_ja: String,
    #[serde(default)]
    name_zh: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    is_primary_hub: bool,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<StationRow> for Station {
    type Error = Error;

    fn try_from(row: StationRow) -> Result<Self, Self::Error> {
        let code = row.code.trim().to_ascii_uppercase();
        if row.name_ko.trim().is_empty() || row.name_en.trim().is_empty() {
            return Err(Error::MissingName(code));
        }
        let coordinate = Coordinate::from((row.latitude, row.longitude));
        if !coordinate.is_valid() {
            return Err(Error::InvalidCoordinate(code, coordinate));
        }
        let names = [row.name_ko, row.name_en, row.name_ja, row.name_zh]
            .map(|name| Arc::<str>::from(name.trim()));
        let mut station = Station {
            index: 0,
            code: code.into(),
            names,
            normalized_names: Default::default(),
            coordinate,
            region: row
                .region
                .map(|region| region.trim().to_lowercase())
                .filter(|region| !region.is_empty())
                .map(Arc::from),
            is_primary_hub: row.is_primary_hub,
            is_active: row.is_active,
        };
        station.set_normalized_names();
        Ok(station)
    }
}

impl Repository {
    /// Directory built from the dataset compiled into the crate.
    pub fn bundled() -> Result<Self, Error> {
        Self::new().load_csv(BUNDLED_STATIONS.as_bytes())
    }

    /// Loads stations from CSV. Duplicate codes are a data error, not something
    /// to silently resolve by picking one of the rows.
    pub fn load_csv<R: io::Read>(mut self, reader: R) -> Result<Self, Error> {
        debug!("Loading stations...");
        let now = Instant::now();
        let mut reader = csv::Reader::from_reader(reader);
        let mut stations: Vec<Station> = Vec::new();
        let mut station_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        for row in reader.deserialize::<StationRow>() {
            let mut station = Station::try_from(row?)?;
            let index = stations.len() as u32;
            station.index = index;
            if station_lookup.insert(station.code.clone(), index).is_some() {
                return Err(Error::DuplicateCode(station.code.to_string()));
            }
            stations.push(station);
        }

        let mut region_to_stations: HashMap<Arc<str>, Vec<u32>> = HashMap::new();
        stations.iter().for_each(|station| {
            if let Some(region) = &station.region {
                region_to_stations
                    .entry(region.clone())
                    .or_default()
                    .push(station.index);
            }
        });

        self.stations = stations.into();
        self.station_lookup = station_lookup;
        self.region_to_stations = region_to_stations
            .into_iter()
            .map(|(region, stations)| (region, stations.into()))
            .collect();
        debug!(
            "Loading {} stations took {:?}",
            self.stations.len(),
            now.elapsed()
        );
        Ok(self)
    }
}
