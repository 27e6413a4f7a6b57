use carbon_passport::{repository::LocalizedStation, shared::geo::Coordinate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub code: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub region: Option<String>,
    pub is_primary_hub: bool,
    pub is_active: bool,
}

impl StationDto {
    pub fn from(station: &LocalizedStation) -> Self {
        Self {
            code: station.code.to_string(),
            name: station.name.to_string(),
            coordinate: station.coordinate,
            region: station.region.as_ref().map(|region| region.to_string()),
            is_primary_hub: station.is_primary_hub,
            is_active: station.is_active,
        }
    }
}
