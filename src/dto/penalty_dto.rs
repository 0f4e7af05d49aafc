use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::penalty::{Penalty, PenaltyRate, PenaltyStatus};

/// Filtros para el listado de penalidades
#[derive(Debug, Deserialize)]
pub struct PenaltyFilters {
    pub vehicle_id: Option<Uuid>,
    pub status: Option<PenaltyStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request para marcar una penalidad como pagada
#[derive(Debug, Deserialize, Validate)]
pub struct MarkPaidRequest {
    #[validate(length(max = 50))]
    pub reference_number: Option<String>,
}

/// Request para reemplazar la tarifa vigente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePenaltyRateRequest {
    /// Monto en TZS; tiene que ser positivo
    pub amount: Decimal,

    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

/// Response de penalidad
#[derive(Debug, Serialize)]
pub struct PenaltyResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub amount: Decimal,
    pub overload_amount: Decimal,
    pub status: PenaltyStatus,
    pub paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<Penalty> for PenaltyResponse {
    fn from(penalty: Penalty) -> Self {
        Self {
            id: penalty.id,
            vehicle_id: penalty.vehicle_id,
            amount: penalty.amount,
            overload_amount: penalty.overload_amount,
            status: penalty.status,
            paid: penalty.paid,
            paid_date: penalty.paid_date,
            latitude: penalty.latitude,
            longitude: penalty.longitude,
            reference_number: penalty.reference_number,
            notes: penalty.notes,
            timestamp: penalty.timestamp,
        }
    }
}

/// Response de la tarifa vigente
#[derive(Debug, Serialize)]
pub struct PenaltyRateResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub effective_from: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<PenaltyRate> for PenaltyRateResponse {
    fn from(rate: PenaltyRate) -> Self {
        Self {
            id: rate.id,
            amount: rate.amount,
            effective_from: rate.effective_from,
            notes: rate.notes,
        }
    }
}
