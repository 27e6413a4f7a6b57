//! Validated steps of the passport submission form.
//!
//! Every step has its own validator and produces a typed value. A
//! [`FormDraft`] collects the steps as they are completed and only turns into
//! a [`PassportForm`] once every required step is present.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    assembler::Leg,
    gateway::{PhotoError, PhotoUpload, validate_photo},
    passport::{PassportMetadata, TravelFrequency, TravelPurpose},
};

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_LEGS: usize = 20;
pub const DEFAULT_COUNTRY: &str = "KR";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("name must be at most {MAX_NAME_CHARS} characters")]
    NameTooLong,
    #[error("country must be a two letter ISO 3166 code, got {0:?}")]
    InvalidCountry(String),
    #[error("date must be formatted YYYY-MM-DD, got {0:?}")]
    InvalidDate(String),
    #[error("at least one route is required")]
    NoLegs,
    #[error("at most {MAX_LEGS} routes are allowed, got {0}")]
    TooManyLegs(usize),
    #[error("unknown travel frequency {0:?}")]
    InvalidFrequency(String),
    #[error("unknown travel purpose {0:?}")]
    InvalidPurpose(String),
    #[error(transparent)]
    Photo(#[from] PhotoError),
}

impl Error {
    /// Form field the message belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Error::Required(field) => field,
            Error::NameTooLong => "name",
            Error::InvalidCountry(_) => "country",
            Error::InvalidDate(_) => "date",
            Error::NoLegs | Error::TooManyLegs(_) => "routes",
            Error::InvalidFrequency(_) => "frequency",
            Error::InvalidPurpose(_) => "purpose",
            Error::Photo(_) => "photo",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TravelerStep {
    pub name: String,
    pub country: String,
    pub travel_date: NaiveDate,
}

impl TravelerStep {
    pub fn validate(name: &str, country: Option<&str>, date: &str) -> Result<Self, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Required("name"));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(Error::NameTooLong);
        }

        let country = match country.map(str::trim).filter(|country| !country.is_empty()) {
            None => DEFAULT_COUNTRY.to_string(),
            Some(country)
                if country.len() == 2 && country.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                country.to_ascii_uppercase()
            }
            Some(country) => return Err(Error::InvalidCountry(country.to_string())),
        };

        let date = date.trim();
        if date.is_empty() {
            return Err(Error::Required("date"));
        }
        let travel_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(date.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            country,
            travel_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JourneyStep {
    pub legs: Vec<Leg>,
}

impl JourneyStep {
    /// Only checks the shape of the list; station resolution is the
    /// assembler's job so that partial failures can be reported per leg.
    pub fn validate(legs: Vec<Leg>) -> Result<Self, Error> {
        match legs.len() {
            0 => Err(Error::NoLegs),
            n if n > MAX_LEGS => Err(Error::TooManyLegs(n)),
            _ => Ok(Self { legs }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoStep {
    pub photo: PhotoUpload,
}

impl PhotoStep {
    pub fn validate(photo: PhotoUpload) -> Result<Self, Error> {
        validate_photo(&photo)?;
        Ok(Self { photo })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyStep {
    pub metadata: PassportMetadata,
}

impl SurveyStep {
    pub fn validate(
        frequency: Option<&str>,
        purpose: Option<&str>,
        survey_opt_in: bool,
    ) -> Result<Self, Error> {
        let frequency = non_empty(frequency)
            .map(|value| {
                value
                    .parse::<TravelFrequency>()
                    .map_err(|_| Error::InvalidFrequency(value.to_string()))
            })
            .transpose()?;
        let purpose = non_empty(purpose)
            .map(|value| {
                value
                    .parse::<TravelPurpose>()
                    .map_err(|_| Error::InvalidPurpose(value.to_string()))
            })
            .transpose()?;
        Ok(Self {
            metadata: PassportMetadata {
                frequency,
                purpose,
                survey_opt_in,
            },
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// One value per completed step of the submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PassportForm {
    pub traveler: TravelerStep,
    pub journey: JourneyStep,
    pub photo: Option<PhotoStep>,
    pub survey: SurveyStep,
}

#[derive(Debug, Clone, Default)]
pub struct FormDraft {
    traveler: Option<TravelerStep>,
    journey: Option<JourneyStep>,
    photo: Option<PhotoStep>,
    survey: Option<SurveyStep>,
}

impl FormDraft {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn traveler(mut self, step: TravelerStep) -> Self {
        self.traveler = Some(step);
        self
    }

    pub fn journey(mut self, step: JourneyStep) -> Self {
        self.journey = Some(step);
        self
    }

    pub fn photo(mut self, step: PhotoStep) -> Self {
        self.photo = Some(step);
        self
    }

    pub fn survey(mut self, step: SurveyStep) -> Self {
        self.survey = Some(step);
        self
    }

    /// Photo and survey are optional, traveler and journey are not.
    pub fn complete(self) -> Result<PassportForm, Error> {
        Ok(PassportForm {
            traveler: self.traveler.ok_or(Error::Required("name"))?,
            journey: self.journey.ok_or(Error::Required("routes"))?,
            photo: self.photo,
            survey: self.survey.unwrap_or_default(),
        })
    }
}
