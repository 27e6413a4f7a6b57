use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    emissions::trees_equivalent,
    passport::{Passport, Route},
    repository::Repository,
    shared::{Locale, flag_emoji, round_to},
};

/// Coarse classification of the total CO2 saved by a passport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTier {
    Low,
    Medium,
    High,
    Excellent,
}

impl ImpactTier {
    pub const MEDIUM_THRESHOLD: f64 = 5.0;
    pub const HIGH_THRESHOLD: f64 = 20.0;
    pub const EXCELLENT_THRESHOLD: f64 = 50.0;

    pub fn from_saved(total_co2_saved: f64) -> Self {
        if total_co2_saved.is_nan() || total_co2_saved < Self::MEDIUM_THRESHOLD {
            ImpactTier::Low
        } else if total_co2_saved < Self::HIGH_THRESHOLD {
            ImpactTier::Medium
        } else if total_co2_saved < Self::EXCELLENT_THRESHOLD {
            ImpactTier::High
        } else {
            ImpactTier::Excellent
        }
    }

    pub const fn key(&self) -> &'static str {
        match self {
            ImpactTier::Low => "low",
            ImpactTier::Medium => "medium",
            ImpactTier::High => "high",
            ImpactTier::Excellent => "excellent",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            ImpactTier::Low => "Every journey counts",
            ImpactTier::Medium => "Making a difference",
            ImpactTier::High => "Climate champion",
            ImpactTier::Excellent => "Planet protector",
        }
    }

    pub const fn badge(&self) -> &'static str {
        match self {
            ImpactTier::Low => "🌱",
            ImpactTier::Medium => "🌿",
            ImpactTier::High => "🌳",
            ImpactTier::Excellent => "🌍",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions<'a> {
    pub base_url: &'a str,
    pub locale: Locale,
    /// Used to show station names instead of codes when present.
    pub repository: Option<&'a Repository>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDisplay {
    pub sequence_order: u32,
    pub origin: String,
    pub origin_name: String,
    pub destination: String,
    pub destination_name: String,
    pub distance: f64,
    #[serde(rename = "co2Train")]
    pub co2_train: f64,
    #[serde(rename = "co2Car")]
    pub co2_car: f64,
    #[serde(rename = "co2Bus")]
    pub co2_bus: f64,
    #[serde(rename = "co2Airplane")]
    pub co2_airplane: f64,
    #[serde(rename = "co2Saved")]
    pub co2_saved: f64,
    /// Whole percent of the car emissions avoided.
    pub savings_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportDisplayData {
    pub id: Uuid,
    pub traveler_name: String,
    pub country: String,
    pub country_name: String,
    pub flag: Option<String>,
    pub photo_url: Option<String>,
    pub travel_date: NaiveDate,
    pub formatted_date: String,
    pub share_hash: String,
    pub share_url: String,
    pub qr_payload: String,
    pub barcode_payload: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub total_distance: f64,
    #[serde(rename = "totalCO2Saved")]
    pub total_co2_saved: f64,
    #[serde(rename = "totalCO2Train")]
    pub total_co2_train: f64,
    #[serde(rename = "totalCO2Car")]
    pub total_co2_car: f64,
    pub trip_count: usize,
    pub tree_equivalent: u32,
    pub impact: ImpactTier,
    pub impact_description: &'static str,
    pub impact_badge: &'static str,
    pub routes: Vec<RouteDisplay>,
}

fn savings_percentage(route: &Route) -> f64 {
    if route.co2.car() == 0.0 {
        return 0.0;
    }
    (route.co2.saved() / route.co2.car() * 100.0).round()
}

fn station_name(code: &str, options: &DisplayOptions) -> String {
    options
        .repository
        .and_then(|repository| repository.station_by_code(code))
        .map(|station| station.name_in(options.locale).to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Derives display data from a passport and its stored routes. Pure: the same
/// inputs always yield the same output and nothing is written back.
pub fn to_display(
    passport: &Passport,
    routes: &[Route],
    options: &DisplayOptions,
) -> PassportDisplayData {
    let mut ordered: Vec<&Route> = routes.iter().collect();
    ordered.sort_by_key(|route| route.sequence_order);

    let total_distance = round_to(ordered.iter().map(|route| route.distance).sum(), 2);
    let total_co2_saved = round_to(ordered.iter().map(|route| route.co2.saved()).sum(), 2);
    let total_co2_train = round_to(ordered.iter().map(|route| route.co2.train()).sum(), 2);
    let total_co2_car = round_to(ordered.iter().map(|route| route.co2.car()).sum(), 2);
    let impact = ImpactTier::from_saved(total_co2_saved);

    let routes = ordered
        .iter()
        .map(|route| RouteDisplay {
            sequence_order: route.sequence_order,
            origin: route.origin.clone(),
            origin_name: station_name(&route.origin, options),
            destination: route.destination.clone(),
            destination_name: station_name(&route.destination, options),
            distance: route.distance,
            co2_train: route.co2.train(),
            co2_car: route.co2.car(),
            co2_bus: route.co2.bus(),
            co2_airplane: route.co2.airplane(),
            co2_saved: route.co2.saved(),
            savings_percentage: savings_percentage(route),
        })
        .collect();

    let share_url = passport.share_hash.url(options.base_url, options.locale);
    PassportDisplayData {
        id: passport.id,
        traveler_name: passport.traveler_name.clone(),
        country: passport.country.clone(),
        country_name: options.locale.country_name(&passport.country),
        flag: flag_emoji(&passport.country),
        photo_url: passport.photo_url.clone(),
        travel_date: passport.travel_date,
        formatted_date: options.locale.format_date(passport.travel_date),
        share_hash: passport.share_hash.to_string(),
        qr_payload: share_url.clone(),
        share_url,
        barcode_payload: passport.share_hash.barcode_payload(passport.travel_date),
        created_at: passport.created_at,
        expires_at: passport.expires_at,
        total_distance,
        total_co2_saved,
        total_co2_train,
        total_co2_car,
        trip_count: ordered.len(),
        tree_equivalent: trees_equivalent(total_co2_saved),
        impact,
        impact_description: impact.description(),
        impact_badge: impact.badge(),
        routes,
    }
}
