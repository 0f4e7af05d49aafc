use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::alert_controller::AlertController;
use crate::dto::alert_dto::{AlertFilters, AlertResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/:id/resolve", post(resolve_alert))
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(filters): Query<AlertFilters>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertResponse>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.resolve(id).await?;
    Ok(Json(response))
}
