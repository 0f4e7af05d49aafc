use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::alert::{Alert, AlertType, Severity};

/// Filtros para el listado de alertas
#[derive(Debug, Deserialize)]
pub struct AlertFilters {
    pub vehicle_id: Option<Uuid>,
    pub alert_type: Option<AlertType>,
    pub include_resolved: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response de alerta
#[derive(Debug, Serialize)]
pub struct AlertResponse {
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

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            vehicle_id: alert.vehicle_id,
            alert_type: alert.alert_type,
            message: alert.message,
            severity: alert.severity,
            current_weight: alert.current_weight,
            location: alert.location,
            latitude: alert.latitude,
            longitude: alert.longitude,
            map_url: alert.map_url,
            notified: alert.notified,
            is_resolved: alert.is_resolved,
            resolved_timestamp: alert.resolved_timestamp,
            timestamp: alert.timestamp,
        }
    }
}
