//! Modelo de Alert
//!
//! Alertas generadas por la ingesta de lecturas. Inmutables salvo los
//! campos `notified` y de resolución, que se tocan con operaciones
//! explícitas fuera del pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de alerta - mapea al ENUM alert_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "alert_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Overload,
    SensorMalfunction,
    WeightWarning,
    PenaltyIssued,
    Other,
}

/// Severidad - mapea al ENUM alert_severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "alert_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl AlertType {
    /// Severidad por defecto cuando el caller no especifica una
    pub fn default_severity(&self) -> Severity {
        match self {
            AlertType::Overload | AlertType::PenaltyIssued => Severity::High,
            AlertType::WeightWarning => Severity::Medium,
            AlertType::SensorMalfunction => Severity::High,
            AlertType::Other => Severity::Low,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AlertType::Overload => "overload",
            AlertType::SensorMalfunction => "sensor_malfunction",
            AlertType::WeightWarning => "weight_warning",
            AlertType::PenaltyIssued => "penalty_issued",
            AlertType::Other => "other",
        };
        write!(f, "{}", label)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{}", label)
    }
}

/// Alerta persistida, pertenece a un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub alert_type: AlertType,
    pub message: String,
    pub severity: Severity,
    pub current_weight: Option<f64>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub map_url: Option<String>,
    pub notified: bool,
    pub is_resolved: bool,
    pub resolved_timestamp: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Marcar la alerta como resuelta. Idempotente: la segunda llamada
    /// no cambia nada y devuelve `false`.
    pub fn resolve(&mut self) -> bool {
        if self.is_resolved {
            return false;
        }
        self.is_resolved = true;
        self.resolved_timestamp = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_alert() -> Alert {
        Alert {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            alert_type: AlertType::Overload,
            message: "Suspected overload".to_string(),
            severity: Severity::High,
            current_weight: Some(5200.0),
            location: None,
            latitude: None,
            longitude: None,
            map_url: None,
            notified: false,
            is_resolved: false,
            resolved_timestamp: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_default_severities_per_type() {
        assert_eq!(AlertType::Overload.default_severity(), Severity::High);
        assert_eq!(AlertType::PenaltyIssued.default_severity(), Severity::High);
        assert_eq!(AlertType::WeightWarning.default_severity(), Severity::Medium);
        assert_eq!(AlertType::SensorMalfunction.default_severity(), Severity::High);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut alert = sample_alert();

        assert!(alert.resolve());
        assert!(alert.is_resolved);
        let first_resolution = alert.resolved_timestamp;
        assert!(first_resolution.is_some());

        // segunda llamada: no-op
        assert!(!alert.resolve());
        assert_eq!(alert.resolved_timestamp, first_resolution);
    }
}
