use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::models::weight_reading::{ReadingStatus, SensorHealth, WeightReading};

/// Request de ingesta: una lectura periódica de un sensor de peso
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWeightReadingRequest {
    pub vehicle_id: Uuid,

    /// Peso reportado en kg
    pub weight: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(length(max = 50))]
    pub sensor_id: Option<String>,

    #[serde(default)]
    pub sensor_health: SensorHealth,
}

/// Response de una lectura persistida
#[derive(Debug, Serialize)]
pub struct WeightReadingResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub weight: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sensor_id: Option<String>,
    pub sensor_health: SensorHealth,
    pub status: ReadingStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<WeightReading> for WeightReadingResponse {
    fn from(reading: WeightReading) -> Self {
        Self {
            id: reading.id,
            vehicle_id: reading.vehicle_id,
            weight: reading.weight,
            latitude: reading.latitude,
            longitude: reading.longitude,
            sensor_id: reading.sensor_id,
            sensor_health: reading.sensor_health,
            status: reading.status,
            timestamp: reading.timestamp,
        }
    }
}

/// Resumen del estado del vehículo luego de aplicar la lectura
#[derive(Debug, Serialize)]
pub struct VehicleStateSummary {
    pub id: Uuid,
    pub vehicle_name: String,
    pub current_weight: f64,
    pub average_weight: Option<f64>,
    pub is_currently_overloaded: bool,
    pub weight_alert: bool,
    pub status: VehicleStatus,
}

impl From<&Vehicle> for VehicleStateSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_name: vehicle.vehicle_name.clone(),
            current_weight: vehicle.current_weight,
            average_weight: vehicle.average_weight,
            is_currently_overloaded: vehicle.is_currently_overloaded,
            weight_alert: vehicle.weight_alert,
            status: vehicle.status,
        }
    }
}

/// Response de la ingesta completa. La ingesta reporta éxito aunque las
/// fases best-effort (alerta/penalidad/notificación) hayan fallado.
#[derive(Debug, Serialize)]
pub struct IngestReadingResponse {
    pub reading: WeightReadingResponse,
    pub vehicle: VehicleStateSummary,
    pub penalty_issued: bool,
}
