use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{AlertHistoryEntry, Vehicle, VehicleStatus};

/// Request para registrar un vehículo de la flota
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 50))]
    pub vehicle_name: String,

    #[validate(length(min = 1, max = 20))]
    pub registration_number: String,

    #[validate(length(max = 255))]
    pub description: Option<String>,

    #[validate(length(max = 100))]
    pub driver: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub owner: String,

    /// Peso máximo permitido en kg; tiene que ser positivo
    pub max_allowed_weight: f64,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 50))]
    pub vehicle_name: Option<String>,

    #[validate(length(max = 255))]
    pub description: Option<String>,

    #[validate(length(max = 100))]
    pub driver: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub owner: Option<String>,

    pub max_allowed_weight: Option<f64>,

    pub status: Option<VehicleStatus>,
}

/// Response con el agregado completo del vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub vehicle_name: String,
    pub registration_number: String,
    pub description: Option<String>,
    pub driver: Option<String>,
    pub owner: String,
    pub max_allowed_weight: f64,
    pub current_weight: f64,
    pub last_reported_weight: f64,
    pub average_weight: Option<f64>,
    pub weight_alert: bool,
    pub is_currently_overloaded: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_reported_location: Option<DateTime<Utc>>,
    pub status: VehicleStatus,
    pub alert_history: Vec<AlertHistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_name: vehicle.vehicle_name,
            registration_number: vehicle.registration_number,
            description: vehicle.description,
            driver: vehicle.driver,
            owner: vehicle.owner,
            max_allowed_weight: vehicle.max_allowed_weight,
            current_weight: vehicle.current_weight,
            last_reported_weight: vehicle.last_reported_weight,
            average_weight: vehicle.average_weight,
            weight_alert: vehicle.weight_alert,
            is_currently_overloaded: vehicle.is_currently_overloaded,
            latitude: vehicle.latitude,
            longitude: vehicle.longitude,
            last_reported_location: vehicle.last_reported_location,
            status: vehicle.status,
            alert_history: vehicle.alert_history.0,
            created_at: vehicle.created_at,
        }
    }
}
