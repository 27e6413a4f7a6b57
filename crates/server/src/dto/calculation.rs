use carbon_passport::{
    assembler::{Assembly, EnrichedRoute, Leg},
    emissions::Co2Emissions,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub sequence_order: u32,
    pub origin: String,
    pub destination: String,
    pub distance: f64,
    pub co2: Co2Emissions,
}

impl RouteDto {
    pub fn from(route: &EnrichedRoute) -> Self {
        Self {
            sequence_order: route.sequence_order,
            origin: route.origin.to_string(),
            destination: route.destination.to_string(),
            distance: route.distance,
            co2: route.co2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDto {
    pub routes: Vec<RouteDto>,
    pub total_distance: f64,
    pub total_emissions: Co2Emissions,
    pub errors: Vec<String>,
}

impl CalculationDto {
    pub fn from(assembly: &Assembly) -> Self {
        Self {
            routes: assembly.routes.iter().map(RouteDto::from).collect(),
            total_distance: assembly.total_distance,
            total_emissions: assembly.total_emissions,
            errors: assembly.error_messages(),
        }
    }
}
