use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use carbon_passport::{assembler::assemble, form::JourneyStep};
use serde_json::json;

use crate::{
    dto::{CalculateRequest, CalculationDto},
    error::ApiError,
    state::AppState,
};

/// Assembles legs without storing anything, for previews while the form is
/// being filled in.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Response, ApiError> {
    let journey = JourneyStep::validate(request.legs)?;
    let assembly = assemble(&state.repository, &journey.legs);
    if assembly.is_empty() {
        return Err(ApiError::NoRoutes(assembly.error_messages()));
    }
    Ok(Json(json!({
        "success": true,
        "calculation": CalculationDto::from(&assembly),
    }))
    .into_response())
}
