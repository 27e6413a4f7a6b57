//! Orchestration of the gateway calls behind the passport endpoints.

use carbon_passport::{
    assembler::assemble,
    form::PassportForm,
    gateway::{self, Gateway},
    passport::{NewPassport, NewRoute, Passport, PassportKey, PassportRecord, Route, ShareHash},
};
use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{config::RetryPolicy, error::ApiError, state::AppState};

/// Runs `call` until it succeeds, fails with a non-transient error or
/// `policy.max_attempts` is reached.
pub async fn with_retry<T, F>(
    policy: RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, gateway::Error>
where
    F: FnMut() -> Result<T, gateway::Error>,
{
    let mut backoff = policy.backoff;
    let mut attempt = 1;
    loop {
        match call() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    "{operation} failed on attempt {attempt}/{}: {err}",
                    policy.max_attempts
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(err) => {
                if err.is_transient() {
                    error!("{operation} gave up after {attempt} attempts: {err}");
                }
                return Err(err);
            }
        }
    }
}

#[derive(Debug)]
pub struct Submission {
    pub passport: Passport,
    pub routes: Vec<Route>,
    /// Messages for legs that were dropped.
    pub errors: Vec<String>,
    /// Set when the photo could not be stored and the passport was issued without it.
    pub photo_error: Option<String>,
}

/// Assembles the legs, stores the photo, then the passport, then its routes.
pub async fn submit(state: &AppState, form: PassportForm) -> Result<Submission, ApiError> {
    let retry = state.config.retry;
    let gateway = state.gateway.as_ref();

    let assembly = assemble(&state.repository, &form.journey.legs);
    let errors = assembly.error_messages();
    if assembly.is_empty() {
        return Err(ApiError::NoRoutes(errors));
    }
    debug!(
        "Assembled {} of {} legs",
        assembly.routes.len(),
        form.journey.legs.len()
    );

    let mut photo_url = None;
    let mut photo_error = None;
    if let Some(step) = &form.photo {
        let upload_id = Uuid::new_v4();
        match with_retry(retry, "Photo upload", || {
            gateway.upload_photo(&step.photo, upload_id)
        })
        .await
        {
            Ok(url) => photo_url = Some(url),
            Err(err) => {
                warn!("Issuing passport without photo: {err}");
                photo_error = Some("Photo could not be uploaded".to_string());
            }
        }
    }

    let now = Utc::now();
    let expires_at = match state.config.share_ttl() {
        Some(ttl) => match now.checked_add_signed(ttl) {
            Some(expires_at) => Some(expires_at),
            None => {
                warn!("Share link lifetime {ttl} is out of range, issuing without expiry");
                None
            }
        },
        None => None,
    };
    let new_passport = NewPassport {
        traveler_name: form.traveler.name,
        country: form.traveler.country,
        travel_date: form.traveler.travel_date,
        photo_url: photo_url.clone(),
        share_hash: ShareHash::generate(),
        expires_at,
        metadata: form.survey.metadata,
    };
    let passport = match with_retry(retry, "Passport insert", || {
        gateway.create_passport(new_passport.clone())
    })
    .await
    {
        Ok(passport) => passport,
        Err(err) => {
            // The photo has no owner without its passport.
            if let Some(url) = &photo_url {
                if let Err(cleanup) = gateway.delete_photo(url) {
                    warn!("Failed to remove photo {url}: {cleanup}");
                }
            }
            return Err(err.into());
        }
    };

    let new_routes: Vec<_> = assembly
        .routes
        .iter()
        .map(|route| NewRoute::from_enriched(passport.id, route))
        .collect();
    let routes = with_retry(retry, "Route insert", || {
        gateway.create_routes(new_routes.clone())
    })
    .await
    .map_err(|source| ApiError::Orphaned {
        passport_id: passport.id,
        source,
    })?;

    info!(
        "Issued passport {} with {} routes ({} dropped)",
        passport.id,
        routes.len(),
        errors.len()
    );
    Ok(Submission {
        passport,
        routes,
        errors,
        photo_error,
    })
}

/// Passport and routes by key. Expired share links are refused.
pub async fn load(state: &AppState, key: PassportKey) -> Result<PassportRecord, ApiError> {
    let record = with_retry(state.config.retry, "Passport lookup", || {
        state.gateway.passport_with_routes(&key)
    })
    .await?;
    if matches!(key, PassportKey::ShareHash(_)) && record.passport.is_expired(Utc::now()) {
        return Err(ApiError::Expired);
    }
    Ok(record)
}
