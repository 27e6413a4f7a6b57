use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    api::{locale, param_or},
    dto::StationDto,
    error::ApiError,
    service::with_retry,
    state::AppState,
};

pub async fn stations(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let locale = locale(&params, &state)?;
    let active_only = param_or(&params, "activeOnly", true)?;
    let stations: Vec<_> = with_retry(state.config.retry, "Station listing", || {
        state.gateway.list_stations(locale, active_only)
    })
    .await?
    .iter()
    .map(StationDto::from)
    .collect();
    Ok(Json(json!({
        "success": true,
        "count": stations.len(),
        "stations": stations,
    }))
    .into_response())
}

pub async fn search(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Some(query) = params.get("q") else {
        return Err(ApiError::BadRequest("Missing query parameter q".into()));
    };
    let locale = locale(&params, &state)?;
    let count: usize = param_or(&params, "count", 5)?;
    let stations: Vec<_> = state
        .repository
        .search_stations(query, locale)
        .into_iter()
        .filter(|station| station.is_active)
        .take(count)
        .map(|station| StationDto::from(&station.localized(locale)))
        .collect();
    Ok(Json(json!({
        "success": true,
        "count": stations.len(),
        "stations": stations,
    }))
    .into_response())
}
