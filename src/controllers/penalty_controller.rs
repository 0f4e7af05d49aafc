use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::penalty_dto::{
    MarkPaidRequest, PenaltyFilters, PenaltyRateResponse, PenaltyResponse,
    UpdatePenaltyRateRequest,
};
use crate::repositories::penalty_repository::PenaltyRepository;
use crate::services::penalty_service::PenaltyService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError, AppResult};

pub struct PenaltyController {
    state: AppState,
}

impl PenaltyController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, filters: PenaltyFilters) -> AppResult<Vec<PenaltyResponse>> {
        let penalties = PenaltyRepository::new(self.state.pool.clone())
            .list(&filters)
            .await?;
        Ok(penalties.into_iter().map(Into::into).collect())
    }

    /// Marcar una penalidad como pagada (idempotente)
    pub async fn mark_paid(
        &self,
        id: Uuid,
        request: MarkPaidRequest,
    ) -> AppResult<ApiResponse<PenaltyResponse>> {
        request.validate()?;

        let service = PenaltyService::new(
            self.state.pool.clone(),
            self.state.monitoring.clone(),
        );
        let penalty = service.mark_paid(id, request.reference_number).await?;

        Ok(ApiResponse::success_with_message(
            penalty.into(),
            "Penalidad marcada como pagada".to_string(),
        ))
    }

    pub async fn get_rate(&self) -> AppResult<PenaltyRateResponse> {
        let rate = PenaltyRepository::new(self.state.pool.clone())
            .active_rate()
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No hay tarifa de penalidad configurada".to_string())
            })?;

        Ok(rate.into())
    }

    /// Reemplazar la tarifa vigente (atómico: los lectores ven la vieja o
    /// la nueva, nunca un estado intermedio)
    pub async fn replace_rate(
        &self,
        request: UpdatePenaltyRateRequest,
    ) -> AppResult<ApiResponse<PenaltyRateResponse>> {
        request.validate()?;

        if request.amount <= Decimal::ZERO {
            return Err(bad_request_error("El monto de la tarifa tiene que ser positivo"));
        }

        let rate = PenaltyRepository::new(self.state.pool.clone())
            .replace_rate(request.amount, request.notes)
            .await?;

        Ok(ApiResponse::success_with_message(
            rate.into(),
            "Tarifa de penalidad actualizada".to_string(),
        ))
    }
}
