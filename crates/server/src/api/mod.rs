mod passports;
mod routes;
mod stations;

pub use passports::*;
pub use routes::*;
pub use stations::*;

use std::{collections::HashMap, str::FromStr};

use carbon_passport::shared::Locale;

use crate::{error::ApiError, state::AppState};

/// `locale` query parameter, falling back to the configured default.
fn locale(params: &HashMap<String, String>, state: &AppState) -> Result<Locale, ApiError> {
    match params.get("locale") {
        Some(value) => value
            .parse()
            .map_err(|err: carbon_passport::shared::UnsupportedLocale| {
                ApiError::BadRequest(err.to_string())
            }),
        None => Ok(state.config.default_locale),
    }
}

fn param_or<T: FromStr>(
    params: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ApiError> {
    match params.get(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid {key}: {value}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        Json,
        extract::{Path, Query, State},
        http::StatusCode,
        response::Response,
    };
    use carbon_passport::{
        assembler::Leg,
        passport::{NewPassport, PassportMetadata, ShareHash},
    };
    use chrono::{Duration, NaiveDate, Utc};
    use serde_json::Value;

    use crate::{config::Config, dto::CalculateRequest};

    fn state() -> Arc<AppState> {
        Arc::new(AppState::load(Config::default()).unwrap())
    }

    fn query(pairs: &[(&str, &str)]) -> Query<HashMap<String, String>> {
        Query(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    async fn body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn status(result: Result<Response, ApiError>) -> StatusCode {
        match result {
            Ok(response) => response.status(),
            Err(err) => axum::response::IntoResponse::into_response(err).status(),
        }
    }

    #[tokio::test]
    async fn lists_localized_stations() {
        let state = state();
        let response = stations(query(&[("locale", "en")]), State(state.clone()))
            .await
            .unwrap();
        let value = body(response).await;
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], state.repository.list(true).len());
        assert_eq!(value["stations"][0]["name"], "Seoul");

        let all = stations(query(&[("activeOnly", "false")]), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(body(all).await["count"], state.repository.len());
    }

    #[tokio::test]
    async fn rejects_unknown_locale() {
        let result = stations(query(&[("locale", "fr")]), State(state())).await;
        assert_eq!(status(result), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_defaults_to_five_results() {
        let state = state();
        let response = search(query(&[("q", "a"), ("locale", "en")]), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(body(response).await["count"], 5);

        let response = search(query(&[("q", "부산")]), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(body(response).await["stations"][0]["code"], "BUSAN");

        let missing = search(query(&[]), State(state)).await;
        assert_eq!(status(missing), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn calculate_previews_routes() {
        let state = state();
        let request = CalculateRequest {
            legs: vec![Leg::new("SEOUL", "BUSAN"), Leg::new("BUSAN", "BUSAN")],
        };
        let response = calculate(State(state.clone()), Json(request)).await.unwrap();
        let value = body(response).await;
        let saved = value["calculation"]["routes"][0]["co2"]["saved"].as_f64().unwrap();
        assert!((42.0..43.0).contains(&saved));
        assert_eq!(value["calculation"]["errors"].as_array().unwrap().len(), 1);

        let request = CalculateRequest {
            legs: vec![Leg::new("BUSAN", "BUSAN")],
        };
        let result = calculate(State(state.clone()), Json(request)).await;
        assert_eq!(status(result), StatusCode::BAD_REQUEST);

        let result = calculate(State(state), Json(CalculateRequest { legs: vec![] })).await;
        assert_eq!(status(result), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_and_expired_passports() {
        let state = state();
        let result = passport(
            Path(uuid::Uuid::new_v4().to_string()),
            query(&[]),
            State(state.clone()),
        )
        .await;
        assert_eq!(status(result), StatusCode::NOT_FOUND);

        let result = shared(Path("not a hash".into()), query(&[]), State(state.clone())).await;
        assert_eq!(status(result), StatusCode::NOT_FOUND);

        let expired = state
            .gateway
            .create_passport(NewPassport {
                traveler_name: "Minji Kim".into(),
                country: "KR".into(),
                travel_date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                photo_url: None,
                share_hash: ShareHash::generate(),
                expires_at: Some(Utc::now() - Duration::days(1)),
                metadata: PassportMetadata::default(),
            })
            .unwrap();
        let result = shared(
            Path(expired.share_hash.to_string()),
            query(&[]),
            State(state.clone()),
        )
        .await;
        assert_eq!(status(result), StatusCode::GONE);

        // The owner can still open it by id.
        let response = passport(
            Path(expired.id.to_string()),
            query(&[("locale", "ko")]),
            State(state),
        )
        .await
        .unwrap();
        let value = body(response).await;
        assert_eq!(value["passport"]["formattedDate"], "2023년 1월 2일");
        assert_eq!(value["passport"]["tripCount"], 0);
    }
}
