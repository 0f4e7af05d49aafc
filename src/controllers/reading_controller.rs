//! Controller de ingesta de lecturas
//!
//! Orquesta el pipeline: validación, chequeo referencial, sección crítica
//! por vehículo y despacho asíncrono de notificaciones. El caller recibe
//! éxito apenas la lectura y el estado del vehículo están confirmados;
//! los fallos best-effort solo se loguean.

use validator::Validate;

use crate::dto::reading_dto::{
    CreateWeightReadingRequest, IngestReadingResponse, WeightReadingResponse,
};
use crate::repositories::alert_repository::AlertRepository;
use crate::repositories::reading_repository::ReadingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::ingestion_service::IngestionService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};
use crate::utils::validation::{is_valid_coordinate_pair, is_valid_weight};

pub struct ReadingController {
    state: AppState,
}

impl ReadingController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn ingest(
        &self,
        request: CreateWeightReadingRequest,
    ) -> AppResult<IngestReadingResponse> {
        request.validate()?;
        if !is_valid_weight(request.weight) {
            return Err(bad_request_error(
                "El peso reportado tiene que ser un número finito no negativo",
            ));
        }
        match (request.latitude, request.longitude) {
            (Some(lat), Some(lon)) if !is_valid_coordinate_pair(lat, lon) => {
                return Err(bad_request_error("Coordenadas GPS fuera de rango"));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(bad_request_error("Latitud y longitud van juntas"));
            }
            _ => {}
        }

        // chequeo referencial antes de mutar nada
        let vehicles = VehicleRepository::new(self.state.pool.clone());
        let vehicle = vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.vehicle_id.to_string()))?;

        let service = IngestionService::new(
            self.state.pool.clone(),
            self.state.monitoring.clone(),
        );

        // sección crítica por vehículo: acá adentro solo base de datos,
        // nada de red
        let lock = self.state.vehicle_lock(vehicle.id).await;
        let guard = lock.lock().await;
        let mut outcome = service.ingest(vehicle, &request).await?;
        drop(guard);

        if outcome.transition.penalty_due() {
            tracing::info!(
                "🚨 {} entró en sobrecarga con {} kg",
                outcome.vehicle.vehicle_name,
                outcome.reading.weight
            );
        }

        for failure in &outcome.failures {
            tracing::warn!(
                "Ingesta {}: fase {} falló: {}",
                outcome.reading.id,
                failure.stage,
                failure.detail
            );
        }

        // notificación fuera del lock y fuera del request: el ack de la
        // lectura no espera al correo
        let alerts_to_notify: Vec<_> = outcome.alerts_to_notify.drain(..).collect();
        for alert in alerts_to_notify {
            let notifications = self.state.notifications.clone();
            let alerts_repo = AlertRepository::new(self.state.pool.clone());
            let vehicle_name = outcome.vehicle.vehicle_name.clone();
            tokio::spawn(async move {
                match notifications
                    .send_alert_to_authorities(&alert, &vehicle_name)
                    .await
                {
                    Ok(()) => {
                        if let Err(e) = alerts_repo.mark_notified(alert.id).await {
                            log::warn!("⚠️ Alerta {} enviada pero sin marcar: {}", alert.id, e);
                        }
                    }
                    Err(e) => {
                        log::warn!("📭 Notificación de alerta {} falló: {}", alert.id, e);
                    }
                }
            });
        }

        Ok(IngestReadingResponse {
            reading: outcome.reading.into(),
            vehicle: (&outcome.vehicle).into(),
            penalty_issued: outcome.penalty.is_some(),
        })
    }

    pub async fn list_by_vehicle(
        &self,
        vehicle_id: uuid::Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<WeightReadingResponse>> {
        let vehicles = VehicleRepository::new(self.state.pool.clone());
        vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        let readings = ReadingRepository::new(self.state.pool.clone())
            .list_by_vehicle(vehicle_id, limit.unwrap_or(100))
            .await?;

        Ok(readings.into_iter().map(Into::into).collect())
    }
}
