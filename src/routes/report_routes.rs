use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{
    AlertFrequencyRow, FleetSummaryResponse, ReportQuery, WeightTrendResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(report_summary))
        .route("/alert-frequency", get(alert_frequency))
        .route("/weight-trends", get(weight_trends))
}

async fn report_summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<FleetSummaryResponse>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.summary(query).await?;
    Ok(Json(response))
}

async fn alert_frequency(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<AlertFrequencyRow>>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.alert_frequency(query).await?;
    Ok(Json(response))
}

async fn weight_trends(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<WeightTrendResponse>>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.weight_trends(query).await?;
    Ok(Json(response))
}
