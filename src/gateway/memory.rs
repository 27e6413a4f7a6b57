use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    gateway::{Error, Gateway, PhotoUpload, validate_photo},
    passport::{
        NewPassport, NewRoute, Passport, PassportKey, PassportRecord, Route, ShareHash,
        SurveyResponse,
    },
    repository::{LocalizedStation, Repository},
    shared::Locale,
};

#[derive(Debug, Default)]
struct Tables {
    passports: HashMap<Uuid, Passport>,
    share_hashes: HashMap<ShareHash, Uuid>,
    routes: HashMap<Uuid, Vec<Route>>,
    surveys: HashMap<Uuid, SurveyResponse>,
    photos: HashMap<String, PhotoUpload>,
}

/// Process-local gateway. Keeps the passport, route and survey tables in
/// memory and serves stations from the loaded directory.
#[derive(Debug)]
pub struct MemoryGateway {
    repository: Arc<Repository>,
    storage_url: String,
    tables: RwLock<Tables>,
}

impl MemoryGateway {
    pub fn new(repository: Arc<Repository>, base_url: &str) -> Self {
        Self {
            repository,
            storage_url: format!("{}/storage", base_url.trim_end_matches('/')),
            tables: Default::default(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, Error> {
        self.tables
            .read()
            .map_err(|_| Error::Storage("table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, Error> {
        self.tables
            .write()
            .map_err(|_| Error::Storage("table lock poisoned".to_string()))
    }

    fn photo_key<'a>(&self, url: &'a str) -> Option<&'a str> {
        Some(url.strip_prefix(&self.storage_url)?.trim_start_matches('/'))
    }

    /// Photo previously stored under `url`.
    pub fn photo(&self, url: &str) -> Option<PhotoUpload> {
        let key = self.photo_key(url)?;
        self.read().ok()?.photos.get(key).cloned()
    }
}

impl Gateway for MemoryGateway {
    fn create_passport(&self, new: NewPassport) -> Result<Passport, Error> {
        let mut tables = self.write()?;
        if tables.share_hashes.contains_key(&new.share_hash) {
            return Err(Error::Storage(format!(
                "share hash {} already exists",
                new.share_hash
            )));
        }
        let passport = Passport {
            id: Uuid::new_v4(),
            traveler_name: new.traveler_name,
            country: new.country,
            travel_date: new.travel_date,
            photo_url: new.photo_url,
            share_hash: new.share_hash,
            expires_at: new.expires_at,
            created_at: Utc::now(),
            metadata: new.metadata,
        };
        tables
            .share_hashes
            .insert(passport.share_hash.clone(), passport.id);
        tables.passports.insert(passport.id, passport.clone());
        debug!("Created passport {}", passport.id);
        Ok(passport)
    }

    fn create_routes(&self, routes: Vec<NewRoute>) -> Result<Vec<Route>, Error> {
        let mut tables = self.write()?;
        // All or nothing: check every foreign key before inserting anything.
        if let Some(orphan) = routes
            .iter()
            .find(|route| !tables.passports.contains_key(&route.passport_id))
        {
            return Err(Error::NotFound(format!("passport {}", orphan.passport_id)));
        }
        let created_at = Utc::now();
        let created: Vec<Route> = routes
            .into_iter()
            .map(|route| Route {
                id: Uuid::new_v4(),
                passport_id: route.passport_id,
                sequence_order: route.sequence_order,
                origin: route.origin,
                destination: route.destination,
                distance: route.distance,
                co2: route.co2,
                created_at,
            })
            .collect();
        for route in &created {
            tables
                .routes
                .entry(route.passport_id)
                .or_default()
                .push(route.clone());
        }
        debug!("Created {} routes", created.len());
        Ok(created)
    }

    fn passport_with_routes(&self, key: &PassportKey) -> Result<PassportRecord, Error> {
        let tables = self.read()?;
        let id = match key {
            PassportKey::Id(id) => Some(*id),
            PassportKey::ShareHash(hash) => tables.share_hashes.get(hash).copied(),
        };
        let passport = id
            .and_then(|id| tables.passports.get(&id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("passport with {key}")))?;
        let mut routes = tables
            .routes
            .get(&passport.id)
            .cloned()
            .unwrap_or_default();
        routes.sort_by_key(|route| route.sequence_order);
        Ok(PassportRecord { passport, routes })
    }

    fn attach_photo(&self, passport_id: Uuid, photo_url: &str) -> Result<(), Error> {
        let mut tables = self.write()?;
        let passport = tables
            .passports
            .get_mut(&passport_id)
            .ok_or_else(|| Error::NotFound(format!("passport {passport_id}")))?;
        passport.photo_url = Some(photo_url.to_string());
        Ok(())
    }

    fn delete_passport(&self, passport_id: Uuid) -> Result<(), Error> {
        let mut tables = self.write()?;
        let passport = tables
            .passports
            .remove(&passport_id)
            .ok_or_else(|| Error::NotFound(format!("passport {passport_id}")))?;
        tables.share_hashes.remove(&passport.share_hash);
        tables.routes.remove(&passport_id);
        tables.surveys.remove(&passport_id);
        if let Some(key) = passport.photo_url.as_deref().and_then(|url| self.photo_key(url)) {
            tables.photos.remove(key);
        }
        Ok(())
    }

    fn upload_photo(&self, photo: &PhotoUpload, owner_id: Uuid) -> Result<String, Error> {
        validate_photo(photo)?;
        let key = format!(
            "photos/{owner_id}/{}.{}",
            Uuid::new_v4().simple(),
            photo.extension()
        );
        let url = format!("{}/{key}", self.storage_url);
        self.write()?.photos.insert(key, photo.clone());
        Ok(url)
    }

    fn delete_photo(&self, photo_url: &str) -> Result<(), Error> {
        let key = self
            .photo_key(photo_url)
            .ok_or_else(|| Error::NotFound(format!("photo {photo_url}")))?;
        self.write()?
            .photos
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("photo {photo_url}")))
    }

    fn list_stations(
        &self,
        locale: Locale,
        active_only: bool,
    ) -> Result<Vec<LocalizedStation>, Error> {
        Ok(self
            .repository
            .list(active_only)
            .into_iter()
            .map(|station| station.localized(locale))
            .collect())
    }

    fn upsert_survey(&self, survey: SurveyResponse) -> Result<SurveyResponse, Error> {
        let mut tables = self.write()?;
        if !tables.passports.contains_key(&survey.passport_id) {
            return Err(Error::NotFound(format!("passport {}", survey.passport_id)));
        }
        tables.surveys.insert(survey.passport_id, survey.clone());
        Ok(survey)
    }

    fn survey(&self, passport_id: Uuid) -> Result<Option<SurveyResponse>, Error> {
        Ok(self.read()?.surveys.get(&passport_id).cloned())
    }
}
