//! Storage contract for passports, routes, surveys and photos.
//!
//! The pure core never touches a [`Gateway`]; only the submission and
//! retrieval flows of the server do.

use thiserror::Error;
use uuid::Uuid;

use crate::{
    passport::{NewPassport, NewRoute, Passport, PassportKey, PassportRecord, Route, SurveyResponse},
    repository::LocalizedStation,
    shared::Locale,
};

mod memory;
pub use memory::*;

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    #[error("photo is empty")]
    Empty,
    #[error("photo is {size} bytes, the limit is {MAX_PHOTO_BYTES} bytes (5 MB)")]
    TooLarge { size: usize },
    #[error("photo type {0:?} is not allowed, use JPEG, PNG or WebP")]
    UnsupportedType(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Photo(#[from] PhotoError),
    /// Temporary failure of the backing store, safe to retry.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn extension(&self) -> &'static str {
        match self.content_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

pub fn validate_photo(photo: &PhotoUpload) -> Result<(), PhotoError> {
    let content_type = photo.content_type.trim().to_ascii_lowercase();
    if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
        return Err(PhotoError::UnsupportedType(photo.content_type.clone()));
    }
    if photo.bytes.is_empty() {
        return Err(PhotoError::Empty);
    }
    if photo.bytes.len() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge {
            size: photo.bytes.len(),
        });
    }
    Ok(())
}

/// CRUD surface of the managed datastore and object storage.
pub trait Gateway: Send + Sync {
    fn create_passport(&self, passport: NewPassport) -> Result<Passport, Error>;

    /// Bulk insert, keeps `sequence_order` as given.
    fn create_routes(&self, routes: Vec<NewRoute>) -> Result<Vec<Route>, Error>;

    /// Passport plus its routes ordered by `sequence_order`.
    fn passport_with_routes(&self, key: &PassportKey) -> Result<PassportRecord, Error>;

    fn attach_photo(&self, passport_id: Uuid, photo_url: &str) -> Result<(), Error>;

    /// Removes the passport together with its routes, survey and photo.
    fn delete_passport(&self, passport_id: Uuid) -> Result<(), Error>;

    /// Stores the photo and returns its public URL.
    fn upload_photo(&self, photo: &PhotoUpload, owner_id: Uuid) -> Result<String, Error>;

    /// Removes a photo stored by [`Gateway::upload_photo`].
    fn delete_photo(&self, photo_url: &str) -> Result<(), Error>;

    /// Stations named in `locale`, in dataset order.
    fn list_stations(
        &self,
        locale: Locale,
        active_only: bool,
    ) -> Result<Vec<LocalizedStation>, Error>;

    fn upsert_survey(&self, survey: SurveyResponse) -> Result<SurveyResponse, Error>;

    fn survey(&self, passport_id: Uuid) -> Result<Option<SurveyResponse>, Error>;
}
