//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an endpoint, validates the request shape,
//! and delegates to the service layer for validation and persistence.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use super::dto::{CreateMissionRequest, CreateScientistRequest, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    Mission, MissionDetail, PlanetId, PlanetSummary, Scientist, ScientistChanges,
    ScientistDetail, ScientistId, ScientistSummary,
};
use crate::db::repository::ScientistRepository;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Landing & Health
// =============================================================================

/// GET /
///
/// Landing endpoint; responds with an empty JSON object.
pub async fn landing() -> Json<Value> {
    Json(Value::Object(Map::new()))
}

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Scientists
// =============================================================================

/// GET /scientists
pub async fn list_scientists(
    State(state): State<AppState>,
) -> HandlerResult<Vec<ScientistSummary>> {
    let scientists = db_services::list_scientists(state.repository.as_ref()).await?;
    Ok(Json(scientists))
}

/// POST /scientists
///
/// Both fields must be present and non-empty before the store is touched.
pub async fn create_scientist(
    State(state): State<AppState>,
    Json(request): Json<CreateScientistRequest>,
) -> Result<(StatusCode, Json<ScientistDetail>), AppError> {
    let name = request.name.unwrap_or_default();
    let field_of_study = request.field_of_study.unwrap_or_default();

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("name is required".to_string());
    }
    if field_of_study.is_empty() {
        errors.push("field_of_study is required".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let detail =
        db_services::create_scientist(state.repository.as_ref(), Scientist::new(name, field_of_study))
            .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /scientists/{id}
pub async fn get_scientist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ScientistDetail> {
    let detail =
        db_services::get_scientist(state.repository.as_ref(), ScientistId::new(id)).await?;
    Ok(Json(detail))
}

/// PATCH /scientists/{id}
///
/// Partial update. Only `name` and `field_of_study` may be set; an unknown
/// field or an empty value aborts the whole update with no partial write.
pub async fn update_scientist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ScientistDetail>), AppError> {
    let scientist_id = ScientistId::new(id);

    // Missing record wins over a malformed body, matching DELETE.
    state.repository.get_scientist(scientist_id).await?;

    let fields = body
        .as_object()
        .ok_or_else(|| AppError::BadRequest("request body must be a JSON object".to_string()))?;

    let mut changes = ScientistChanges::default();
    for (key, value) in fields {
        let field = match key.as_str() {
            "name" => &mut changes.name,
            "field_of_study" => &mut changes.field_of_study,
            other => {
                return Err(AppError::BadRequest(format!("invalid field: {other}")));
            }
        };
        match value.as_str() {
            Some(text) => *field = Some(text.to_string()),
            None => {
                return Err(AppError::Validation(vec![format!(
                    "{key} must be a string"
                )]))
            }
        }
    }

    let detail =
        db_services::update_scientist(state.repository.as_ref(), scientist_id, changes).await?;
    Ok((StatusCode::ACCEPTED, Json(detail)))
}

/// DELETE /scientists/{id}
pub async fn delete_scientist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_scientist(state.repository.as_ref(), ScientistId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Planets
// =============================================================================

/// GET /planets
pub async fn list_planets(State(state): State<AppState>) -> HandlerResult<Vec<PlanetSummary>> {
    let planets = db_services::list_planets(state.repository.as_ref()).await?;
    Ok(Json(planets))
}

// =============================================================================
// Missions
// =============================================================================

/// GET /missions
pub async fn list_missions(State(state): State<AppState>) -> HandlerResult<Vec<MissionDetail>> {
    let missions = db_services::list_missions(state.repository.as_ref()).await?;
    Ok(Json(missions))
}

/// POST /missions
///
/// All three fields are required in the request body; the scientist must
/// exist for the insert to go through.
pub async fn create_mission(
    State(state): State<AppState>,
    Json(request): Json<CreateMissionRequest>,
) -> Result<(StatusCode, Json<MissionDetail>), AppError> {
    let name = request.name.unwrap_or_default();

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("name is required".to_string());
    }
    if request.scientist_id.is_none() {
        errors.push("scientist_id is required".to_string());
    }
    if request.planet_id.is_none() {
        errors.push("planet_id is required".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let record = Mission::new(
        name,
        ScientistId::new(request.scientist_id.unwrap_or_default()),
        request.planet_id.map(PlanetId::new),
    );
    let detail = db_services::create_mission(state.repository.as_ref(), record).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}
