use std::collections::BTreeMap;

use carbon_passport::{
    passport::{Passport, Route},
    shared::round_to,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returned right after a passport is issued.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub share_hash: String,
    pub photo_url: Option<String>,
    #[serde(rename = "totalCO2Saved")]
    pub total_co2_saved: f64,
    pub total_distance: f64,
    pub route_count: usize,
}

impl PassportSummaryDto {
    pub fn from(passport: &Passport, routes: &[Route]) -> Self {
        let total_co2_saved: f64 = routes.iter().map(|route| route.co2.saved()).sum();
        let total_distance: f64 = routes.iter().map(|route| route.distance).sum();
        Self {
            id: passport.id,
            name: passport.traveler_name.clone(),
            share_hash: passport.share_hash.to_string(),
            photo_url: passport.photo_url.clone(),
            total_co2_saved: round_to(total_co2_saved, 2),
            total_distance: round_to(total_distance, 2),
            route_count: routes.len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyRequest {
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(default)]
    pub completed: bool,
}
