use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::penalty_controller::PenaltyController;
use crate::dto::common::ApiResponse;
use crate::dto::penalty_dto::{
    MarkPaidRequest, PenaltyFilters, PenaltyRateResponse, PenaltyResponse,
    UpdatePenaltyRateRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_penalty_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_penalties))
        .route("/rate", get(get_penalty_rate))
        .route("/rate", put(replace_penalty_rate))
        .route("/:id/mark-paid", post(mark_penalty_paid))
}

async fn list_penalties(
    State(state): State<AppState>,
    Query(filters): Query<PenaltyFilters>,
) -> Result<Json<Vec<PenaltyResponse>>, AppError> {
    let controller = PenaltyController::new(state);
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn mark_penalty_paid(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MarkPaidRequest>,
) -> Result<Json<ApiResponse<PenaltyResponse>>, AppError> {
    let controller = PenaltyController::new(state);
    let response = controller.mark_paid(id, request).await?;
    Ok(Json(response))
}

async fn get_penalty_rate(
    State(state): State<AppState>,
) -> Result<Json<PenaltyRateResponse>, AppError> {
    let controller = PenaltyController::new(state);
    let response = controller.get_rate().await?;
    Ok(Json(response))
}

async fn replace_penalty_rate(
    State(state): State<AppState>,
    Json(request): Json<UpdatePenaltyRateRequest>,
) -> Result<Json<ApiResponse<PenaltyRateResponse>>, AppError> {
    let controller = PenaltyController::new(state);
    let response = controller.replace_rate(request).await?;
    Ok(Json(response))
}
