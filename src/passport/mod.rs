//! Passport records and the display projection derived from them.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{assembler::EnrichedRoute, emissions::Co2Emissions};

mod display;
mod share;
pub use display::*;
pub use share::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelFrequency {
    Daily,
    Weekly,
    Monthly,
    Occasionally,
    FirstTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelPurpose {
    Commute,
    Business,
    Leisure,
    Family,
    Other,
}

impl FromStr for TravelFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "occasionally" => Ok(Self::Occasionally),
            "first_time" | "first-time" => Ok(Self::FirstTime),
            other => Err(other.to_string()),
        }
    }
}

impl FromStr for TravelPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commute" => Ok(Self::Commute),
            "business" => Ok(Self::Business),
            "leisure" | "tourism" => Ok(Self::Leisure),
            "family" => Ok(Self::Family),
            "other" => Ok(Self::Other),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportMetadata {
    pub frequency: Option<TravelFrequency>,
    pub purpose: Option<TravelPurpose>,
    pub survey_opt_in: bool,
}

/// Passport row before the gateway assigned its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPassport {
    pub traveler_name: String,
    /// ISO 3166 alpha-2, upper case.
    pub country: String,
    pub travel_date: NaiveDate,
    pub photo_url: Option<String>,
    pub share_hash: ShareHash,
    pub expires_at: Option<DateTime<Utc>>,
    pub metadata: PassportMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Passport {
    pub id: Uuid,
    pub traveler_name: String,
    pub country: String,
    pub travel_date: NaiveDate,
    pub photo_url: Option<String>,
    pub share_hash: ShareHash,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub metadata: PassportMetadata,
}

impl Passport {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Route row before insertion. Emissions are a snapshot taken when the
/// passport was issued and are never recomputed from the distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoute {
    pub passport_id: Uuid,
    pub sequence_order: u32,
    pub origin: String,
    pub destination: String,
    pub distance: f64,
    pub co2: Co2Emissions,
}

impl NewRoute {
    pub fn from_enriched(passport_id: Uuid, route: &EnrichedRoute) -> Self {
        Self {
            passport_id,
            sequence_order: route.sequence_order,
            origin: route.origin.to_string(),
            destination: route.destination.to_string(),
            distance: route.distance,
            co2: route.co2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: Uuid,
    pub passport_id: Uuid,
    pub sequence_order: u32,
    pub origin: String,
    pub destination: String,
    pub distance: f64,
    pub co2: Co2Emissions,
    pub created_at: DateTime<Utc>,
}

/// A passport together with all of its routes.
#[derive(Debug, Clone, PartialEq)]
pub struct PassportRecord {
    pub passport: Passport,
    pub routes: Vec<Route>,
}

/// Lookup key for a stored passport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassportKey {
    Id(Uuid),
    ShareHash(ShareHash),
}

impl Display for PassportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassportKey::Id(id) => write!(f, "id {id}"),
            PassportKey::ShareHash(hash) => write!(f, "share hash {hash}"),
        }
    }
}

/// Optional questionnaire attached to one passport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub passport_id: Uuid,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(default)]
    pub completed: bool,
}
