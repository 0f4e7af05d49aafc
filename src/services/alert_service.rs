//! Fábrica de alertas
//!
//! Crea la fila en `alerts` y antepone la entrada compacta al historial
//! acotado del vehículo. El caller serializa por vehículo: el append del
//! historial es un read-modify-write y no puede intercalarse.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::MonitoringConfig;
use crate::models::alert::{Alert, AlertType, Severity};
use crate::models::vehicle::{AlertHistoryEntry, Vehicle};
use crate::models::weight_reading::WeightReading;
use crate::repositories::alert_repository::AlertRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::map_service;
use crate::utils::errors::AppResult;

/// Texto de ubicación que viaja en la alerta y en el correo
pub fn location_text(latitude: Option<f64>, longitude: Option<f64>) -> Option<String> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(format!("Latitude: {}, Longitude: {}", lat, lon)),
        _ => None,
    }
}

pub fn overload_message(weight: f64, max_allowed: f64, vehicle_name: &str) -> String {
    format!(
        "Suspected overload: {} kg (Max allowed: {} kg) for {}",
        weight, max_allowed, vehicle_name
    )
}

pub fn sensor_malfunction_message(weight: f64, vehicle_name: &str) -> String {
    format!(
        "Sensor malfunction detected for {}. Reported weight: {} kg",
        vehicle_name, weight
    )
}

pub fn weight_warning_message(weight: f64, max_allowed: f64, vehicle_name: &str) -> String {
    format!(
        "Vehicle approaching max weight: {} kg (Max allowed: {} kg) for {}",
        weight, max_allowed, vehicle_name
    )
}

pub struct AlertService {
    alerts: AlertRepository,
    vehicles: VehicleRepository,
    monitoring: MonitoringConfig,
}

impl AlertService {
    pub fn new(pool: PgPool, monitoring: MonitoringConfig) -> Self {
        Self {
            alerts: AlertRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
            monitoring,
        }
    }

    /// Construir la alerta y su entrada de historial sin persistir nada
    fn build(
        &self,
        vehicle: &Vehicle,
        alert_type: AlertType,
        message: String,
        current_weight: Option<f64>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        severity: Option<Severity>,
    ) -> (Alert, AlertHistoryEntry) {
        let severity = severity.unwrap_or_else(|| alert_type.default_severity());
        let location = location_text(latitude, longitude);
        let map_url = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(map_service::build_map_link(lat, lon)),
            _ => None,
        };
        let timestamp = Utc::now();

        let alert = Alert {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            alert_type,
            message: message.clone(),
            severity,
            current_weight,
            location: location.clone(),
            latitude,
            longitude,
            map_url: map_url.clone(),
            notified: false,
            is_resolved: false,
            resolved_timestamp: None,
            timestamp,
        };

        let entry = AlertHistoryEntry {
            alert_type,
            message,
            timestamp,
            severity,
            location,
            map_url,
        };

        (alert, entry)
    }

    /// Persistir la alerta y el historial acotado del vehículo
    pub async fn create_alert(
        &self,
        vehicle: &mut Vehicle,
        alert_type: AlertType,
        message: String,
        current_weight: Option<f64>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        severity: Option<Severity>,
    ) -> AppResult<Alert> {
        let (alert, entry) = self.build(
            vehicle,
            alert_type,
            message,
            current_weight,
            latitude,
            longitude,
            severity,
        );

        let alert = self.alerts.insert(&alert).await?;
        vehicle.push_history_entry(entry, self.monitoring.max_alert_history);
        self.vehicles
            .update_alert_history(vehicle.id, &vehicle.alert_history)
            .await?;

        Ok(alert)
    }

    /// Variante transaccional: alerta + historial viajan en la transacción
    /// del caller (creación de penalidad)
    pub async fn create_alert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle: &mut Vehicle,
        alert_type: AlertType,
        message: String,
        current_weight: Option<f64>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        severity: Option<Severity>,
    ) -> AppResult<Alert> {
        let (alert, entry) = self.build(
            vehicle,
            alert_type,
            message,
            current_weight,
            latitude,
            longitude,
            severity,
        );

        let alert = AlertRepository::insert_tx(tx, &alert).await?;
        vehicle.push_history_entry(entry, self.monitoring.max_alert_history);
        VehicleRepository::update_alert_history_tx(tx, vehicle.id, &vehicle.alert_history).await?;

        Ok(alert)
    }

    /// Alerta de sobrecarga sospechosa (caso (b) de la clasificación)
    pub async fn overload_alert(
        &self,
        vehicle: &mut Vehicle,
        reading: &WeightReading,
    ) -> AppResult<Alert> {
        let message = overload_message(
            reading.weight,
            vehicle.max_allowed_weight,
            &vehicle.vehicle_name,
        );
        self.create_alert(
            vehicle,
            AlertType::Overload,
            message,
            Some(reading.weight),
            reading.latitude,
            reading.longitude,
            Some(self.monitoring.critical_severity),
        )
        .await
    }

    /// Alerta de sensor defectuoso (caso (a))
    pub async fn sensor_malfunction_alert(
        &self,
        vehicle: &mut Vehicle,
        reading: &WeightReading,
    ) -> AppResult<Alert> {
        let message = sensor_malfunction_message(reading.weight, &vehicle.vehicle_name);
        self.create_alert(
            vehicle,
            AlertType::SensorMalfunction,
            message,
            Some(reading.weight),
            reading.latitude,
            reading.longitude,
            None,
        )
        .await
    }

    /// Aviso de aproximación al límite (caso (c)): severidad media,
    /// no se notifica a las autoridades
    pub async fn weight_warning_alert(
        &self,
        vehicle: &mut Vehicle,
        reading: &WeightReading,
    ) -> AppResult<Alert> {
        let message = weight_warning_message(
            reading.weight,
            vehicle.max_allowed_weight,
            &vehicle.vehicle_name,
        );
        self.create_alert(
            vehicle,
            AlertType::WeightWarning,
            message,
            Some(reading.weight),
            reading.latitude,
            reading.longitude,
            Some(self.monitoring.warning_severity),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_text_requires_both_coordinates() {
        assert_eq!(
            location_text(Some(-6.79), Some(39.2)),
            Some("Latitude: -6.79, Longitude: 39.2".to_string())
        );
        assert_eq!(location_text(Some(-6.79), None), None);
        assert_eq!(location_text(None, None), None);
    }

    #[test]
    fn test_alert_messages_carry_weight_and_limit() {
        let message = overload_message(5200.0, 5000.0, "Truck A");
        assert_eq!(
            message,
            "Suspected overload: 5200 kg (Max allowed: 5000 kg) for Truck A"
        );

        let message = weight_warning_message(5050.0, 5000.0, "Truck A");
        assert!(message.starts_with("Vehicle approaching max weight: 5050 kg"));

        let message = sensor_malfunction_message(123.0, "Truck B");
        assert_eq!(
            message,
            "Sensor malfunction detected for Truck B. Reported weight: 123 kg"
        );
    }
}
