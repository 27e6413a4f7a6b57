use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::MultipartError,
    },
    response::{IntoResponse, Response},
};
use carbon_passport::{
    assembler::Leg,
    form::{FormDraft, JourneyStep, PhotoStep, SurveyStep, TravelerStep},
    gateway::PhotoUpload,
    passport::{DisplayOptions, PassportKey, PassportRecord, ShareHash, SurveyResponse, to_display},
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::{
    api::locale,
    dto::{PassportSummaryDto, SurveyRequest},
    error::ApiError,
    service::{self, with_retry},
    state::AppState,
};

fn invalid_form(err: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid form data: {err}"))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut photo = None;
    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "photo" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(invalid_form)?;
            // Browsers send an empty part when no file was picked.
            if !bytes.is_empty() {
                photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field.text().await.map_err(invalid_form)?;
            fields.insert(name, value);
        }
    }
    let field = |name: &str| fields.get(name).map(String::as_str);

    let legs: Vec<Leg> = match field("routes") {
        Some(routes) if !routes.trim().is_empty() => serde_json::from_str(routes)
            .map_err(|err| ApiError::BadRequest(format!("Invalid routes: {err}")))?,
        _ => Vec::new(),
    };
    let mut draft = FormDraft::new()
        .traveler(TravelerStep::validate(
            field("name").unwrap_or_default(),
            field("country"),
            field("date").unwrap_or_default(),
        )?)
        .journey(JourneyStep::validate(legs)?)
        .survey(SurveyStep::validate(
            field("frequency"),
            field("purpose"),
            field("surveyOptIn").is_some_and(|value| value == "true"),
        )?);
    if let Some(photo) = photo {
        draft = draft.photo(PhotoStep::validate(photo)?);
    }
    let form = draft.complete()?;

    let submission = service::submit(&state, form).await?;
    Ok(Json(json!({
        "success": true,
        "passport": PassportSummaryDto::from(&submission.passport, &submission.routes),
        "errors": submission.errors,
        "photoError": submission.photo_error,
    }))
    .into_response())
}

fn display(
    record: &PassportRecord,
    params: &HashMap<String, String>,
    state: &AppState,
) -> Result<Response, ApiError> {
    let options = DisplayOptions {
        base_url: &state.config.base_url,
        locale: locale(params, state)?,
        repository: Some(&state.repository),
    };
    let passport = to_display(&record.passport, &record.routes, &options);
    Ok(Json(json!({ "success": true, "passport": passport })).into_response())
}

pub async fn passport(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound(format!("passport {id}")))?;
    let record = service::load(&state, PassportKey::Id(id)).await?;
    display(&record, &params, &state)
}

pub async fn shared(
    Path(hash): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let hash = ShareHash::parse(&hash).ok_or_else(|| ApiError::NotFound(format!("share {hash}")))?;
    let record = service::load(&state, PassportKey::ShareHash(hash)).await?;
    display(&record, &params, &state)
}

pub async fn survey(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SurveyRequest>,
) -> Result<Response, ApiError> {
    let passport_id =
        Uuid::parse_str(&id).map_err(|_| ApiError::NotFound(format!("passport {id}")))?;
    let survey = SurveyResponse {
        passport_id,
        answers: request.answers,
        completed: request.completed,
    };
    let survey = with_retry(state.config.retry, "Survey upsert", || {
        state.gateway.upsert_survey(survey.clone())
    })
    .await?;
    debug!("Stored survey for passport {passport_id}");
    Ok(Json(json!({ "success": true, "survey": survey })).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{Body, to_bytes},
        extract::FromRequest,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use serde_json::Value;

    use crate::config::Config;

    const BOUNDARY: &str = "passport-form-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState::load(Config::default()).unwrap())
    }

    async fn multipart(parts: &[Part<'_>]) -> Multipart {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/passports")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    async fn post(parts: &[Part<'_>]) -> (StatusCode, Value) {
        let response = match create(State(state()), multipart(parts).await).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        };
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const ROUTES: &str = r#"[{"from":"SEOUL","to":"BUSAN"},{"from":"SEOUL","to":"NOWHERE"}]"#;

    #[tokio::test]
    async fn issues_a_passport() {
        let (status, value) = post(&[
            Part::Text("name", "Minji Kim"),
            Part::Text("date", "2024-10-09"),
            Part::Text("routes", ROUTES),
            Part::File {
                name: "photo",
                file_name: "me.png",
                content_type: "image/png",
                bytes: &[0x89, 0x50, 0x4e, 0x47],
            },
        ])
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["success"], true);
        let passport = &value["passport"];
        assert_eq!(passport["name"], "Minji Kim");
        assert_eq!(passport["routeCount"], 1);
        assert_eq!(passport["shareHash"].as_str().unwrap().len(), 22);
        assert!(passport["id"].is_string());
        assert!(passport["photoUrl"].as_str().unwrap().ends_with(".png"));
        let saved = passport["totalCO2Saved"].as_f64().unwrap();
        assert!((42.0..43.0).contains(&saved));
        let distance = passport["totalDistance"].as_f64().unwrap();
        assert!((315.0..335.0).contains(&distance));
        assert_eq!(value["errors"][0], "Leg 2: Unknown station: NOWHERE");
        assert!(value["photoError"].is_null());
    }

    #[tokio::test]
    async fn empty_photo_part_is_ignored() {
        let (status, value) = post(&[
            Part::Text("name", "Minji Kim"),
            Part::Text("date", "2024-10-09"),
            Part::Text("routes", ROUTES),
            Part::File {
                name: "photo",
                file_name: "",
                content_type: "application/octet-stream",
                bytes: &[],
            },
        ])
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(value["passport"]["photoUrl"].is_null());
    }

    #[tokio::test]
    async fn missing_name() {
        let (status, value) = post(&[
            Part::Text("date", "2024-10-09"),
            Part::Text("routes", ROUTES),
        ])
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "name is required");
        assert_eq!(value["field"], "name");
    }

    #[tokio::test]
    async fn malformed_routes() {
        let (status, value) = post(&[
            Part::Text("name", "Minji Kim"),
            Part::Text("date", "2024-10-09"),
            Part::Text("routes", "[{\"from\":"),
        ])
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].as_str().unwrap().starts_with("Invalid routes"));
    }

    #[tokio::test]
    async fn rejects_unsupported_photo_type() {
        let (status, value) = post(&[
            Part::Text("name", "Minji Kim"),
            Part::Text("date", "2024-10-09"),
            Part::Text("routes", ROUTES),
            Part::File {
                name: "photo",
                file_name: "me.gif",
                content_type: "image/gif",
                bytes: b"GIF89a",
            },
        ])
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["field"], "photo");
    }

    #[tokio::test]
    async fn every_leg_failing_is_a_bad_request() {
        let (status, value) = post(&[
            Part::Text("name", "Minji Kim"),
            Part::Text("date", "2024-10-09"),
            Part::Text("routes", r#"[{"from":"SEOUL","to":"SEOUL"}]"#),
        ])
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["errors"].as_array().unwrap().len(), 1);
    }
}
