//! Emisión de penalidades
//!
//! Una penalidad por transición normal→sobrecargado, nunca por lectura.
//! La tarifa vigente se lee al momento de emitir; si no hay tarifa, la
//! penalidad falla sin fabricar un monto por defecto. Penalidad, alerta
//! de penalidad y append de historial viajan en una sola transacción.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::MonitoringConfig;
use crate::models::alert::{Alert, AlertType};
use crate::models::penalty::{Penalty, PenaltyStatus};
use crate::models::vehicle::Vehicle;
use crate::models::weight_reading::WeightReading;
use crate::repositories::penalty_repository::PenaltyRepository;
use crate::services::alert_service::AlertService;
use crate::utils::errors::{internal_error, AppError, AppResult};

/// Mensaje de la alerta que acompaña a la penalidad emitida
pub fn penalty_message(
    amount: &Decimal,
    weight: f64,
    max_allowed: f64,
    vehicle_name: &str,
) -> String {
    format!(
        "New penalty issued: {} TZS for overload violation. Current weight: {} kg (Max allowed: {} kg) for {}",
        amount, weight, max_allowed, vehicle_name
    )
}

pub struct PenaltyService {
    pool: PgPool,
    alerts: AlertService,
    monitoring: MonitoringConfig,
}

impl PenaltyService {
    pub fn new(pool: PgPool, monitoring: MonitoringConfig) -> Self {
        Self {
            alerts: AlertService::new(pool.clone(), monitoring.clone()),
            pool,
            monitoring,
        }
    }

    /// Emitir la penalidad para una transición calificada. Precondición:
    /// el caller ya verificó la transición false→true y tiene el lock del
    /// vehículo. El error se devuelve tipado; quien ingesta lo registra y
    /// lo traga, jamás llega al caller de la lectura.
    pub async fn issue(
        &self,
        vehicle: &mut Vehicle,
        reading: &WeightReading,
    ) -> AppResult<(Penalty, Alert)> {
        let mut tx = self.pool.begin().await?;

        let rate = PenaltyRepository::active_rate_tx(&mut tx)
            .await?
            .ok_or_else(|| {
                AppError::ServiceUnavailable(
                    "No hay tarifa de penalidad vigente, no se puede emitir".to_string(),
                )
            })?;

        // > 0 por precondición de la transición
        let overload_kg = reading.weight - vehicle.max_allowed_weight;
        let overload_amount = Decimal::from_f64_retain(overload_kg)
            .ok_or_else(|| internal_error("overload amount out of decimal range"))?;

        let penalty = Penalty {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            amount: rate.amount,
            overload_amount,
            status: PenaltyStatus::Unpaid,
            paid: false,
            paid_date: None,
            latitude: reading.latitude.and_then(Decimal::from_f64_retain),
            longitude: reading.longitude.and_then(Decimal::from_f64_retain),
            reference_number: None,
            notes: None,
            // timestamp y coordenadas copiados de la lectura que disparó
            timestamp: reading.timestamp,
        };

        let penalty = PenaltyRepository::insert_tx(&mut tx, &penalty).await?;

        let message = penalty_message(
            &rate.amount,
            reading.weight,
            vehicle.max_allowed_weight,
            &vehicle.vehicle_name,
        );
        let alert = self
            .alerts
            .create_alert_tx(
                &mut tx,
                vehicle,
                AlertType::PenaltyIssued,
                message,
                Some(reading.weight),
                reading.latitude,
                reading.longitude,
                Some(self.monitoring.critical_severity),
            )
            .await?;

        tx.commit().await?;

        log::info!(
            "💰 Penalidad emitida: {} TZS para {} ({} kg sobre el límite)",
            penalty.amount,
            vehicle.vehicle_name,
            overload_kg
        );

        Ok((penalty, alert))
    }

    /// Marcar una penalidad como pagada. Idempotente a nivel de API.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        reference_number: Option<String>,
    ) -> AppResult<Penalty> {
        let repository = PenaltyRepository::new(self.pool.clone());
        let mut penalty = repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Penalidad no encontrada".to_string()))?;

        if penalty.mark_paid(reference_number) {
            repository.update_payment(&penalty).await?;
            log::info!(
                "✅ Penalidad {} pagada ({})",
                penalty.id,
                penalty.paid_date.unwrap_or_else(Utc::now)
            );
        }

        Ok(penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_message_includes_amount_weight_and_limit() {
        let amount = Decimal::new(50_000_00, 2);
        let message = penalty_message(&amount, 5200.0, 5000.0, "Truck A");
        assert_eq!(
            message,
            "New penalty issued: 50000.00 TZS for overload violation. Current weight: 5200 kg (Max allowed: 5000 kg) for Truck A"
        );
    }
}
