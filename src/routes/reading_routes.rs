use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::reading_controller::ReadingController;
use crate::dto::reading_dto::{
    CreateWeightReadingRequest, IngestReadingResponse, WeightReadingResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reading_router() -> Router<AppState> {
    Router::new()
        .route("/", post(ingest_reading))
        .route("/vehicle/:vehicle_id", get(list_vehicle_readings))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

/// Punto de entrada de la ingesta: el ack llega cuando lectura y estado
/// están confirmados; alertas/penalidades/correo nunca lo frenan
async fn ingest_reading(
    State(state): State<AppState>,
    Json(request): Json<CreateWeightReadingRequest>,
) -> Result<Json<IngestReadingResponse>, AppError> {
    let controller = ReadingController::new(state);
    let response = controller.ingest(request).await?;
    Ok(Json(response))
}

async fn list_vehicle_readings(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WeightReadingResponse>>, AppError> {
    let controller = ReadingController::new(state);
    let response = controller.list_by_vehicle(vehicle_id, query.limit).await?;
    Ok(Json(response))
}
