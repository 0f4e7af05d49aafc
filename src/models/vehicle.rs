//! Modelo de Vehicle
//!
//! Este módulo contiene el agregado Vehicle: peso actual, bandera de
//! sobrecarga, promedio móvil e historial de alertas acotado. Todas sus
//! mutaciones pasan por el pipeline de ingesta, serializado por vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::alert::{AlertType, Severity};

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Inactive,
}

/// Entrada compacta del historial de alertas embebido en el vehículo.
/// Distinto de la tabla `alerts`: esto es el resumen acotado que viaja
/// con el registro del vehículo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertHistoryEntry {
    pub alert_type: AlertType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub location: Option<String>,
    pub map_url: Option<String>,
}

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
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
    pub alert_history: Json<Vec<AlertHistoryEntry>>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Insertar una entrada al frente del historial, descartando las más
    /// viejas por encima del tope. Invariante: len ≤ cap, más reciente primero.
    pub fn push_history_entry(&mut self, entry: AlertHistoryEntry, cap: usize) {
        let history = &mut self.alert_history.0;
        history.insert(0, entry);
        history.truncate(cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_vehicle(max_allowed_weight: f64) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            vehicle_name: "Truck A".to_string(),
            registration_number: "TRK123".to_string(),
            description: Some("Transport Truck".to_string()),
            driver: None,
            owner: "John Doe".to_string(),
            max_allowed_weight,
            current_weight: 0.0,
            last_reported_weight: 0.0,
            average_weight: None,
            weight_alert: false,
            is_currently_overloaded: false,
            latitude: None,
            longitude: None,
            last_reported_location: None,
            status: VehicleStatus::Inactive,
            alert_history: Json(Vec::new()),
            created_at: Utc::now(),
        }
    }

    fn entry(message: &str) -> AlertHistoryEntry {
        AlertHistoryEntry {
            alert_type: AlertType::Overload,
            message: message.to_string(),
            timestamp: Utc::now(),
            severity: Severity::High,
            location: None,
            map_url: None,
        }
    }

    #[test]
    fn test_history_newest_entry_first() {
        let mut vehicle = sample_vehicle(5000.0);
        vehicle.push_history_entry(entry("first"), 50);
        vehicle.push_history_entry(entry("second"), 50);

        assert_eq!(vehicle.alert_history.0[0].message, "second");
        assert_eq!(vehicle.alert_history.0[1].message, "first");
    }

    #[test]
    fn test_history_never_exceeds_cap() {
        let mut vehicle = sample_vehicle(5000.0);
        for i in 0..60 {
            vehicle.push_history_entry(entry(&format!("alert {}", i)), 50);
        }

        assert_eq!(vehicle.alert_history.0.len(), 50);
        // la más reciente quedó al frente, la más vieja se descartó
        assert_eq!(vehicle.alert_history.0[0].message, "alert 59");
        assert_eq!(vehicle.alert_history.0[49].message, "alert 10");
    }
}
