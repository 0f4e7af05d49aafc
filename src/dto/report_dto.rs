use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::alert::{AlertType, Severity};

/// Parámetros comunes de los reportes
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Ventana en días (default 30)
    pub days: Option<i64>,
    pub vehicle_id: Option<Uuid>,
}

/// Resumen de flota para el dashboard
#[derive(Debug, Serialize)]
pub struct FleetSummaryResponse {
    pub window_days: i64,
    pub total_vehicles: i64,
    pub active_vehicles: i64,
    pub overloaded_vehicles: i64,
    pub readings_in_window: i64,
    pub alerts_in_window: i64,
    pub unresolved_alerts: i64,
    pub unpaid_penalties: i64,
    pub unpaid_amount: Decimal,
    pub average_penalty_amount: Option<f64>,
}

/// Frecuencia de alertas por tipo y severidad
#[derive(Debug, Serialize, FromRow)]
pub struct AlertFrequencyRow {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub count: i64,
}

/// Punto diario de la tendencia de peso de un vehículo
#[derive(Debug, Serialize, FromRow)]
pub struct WeightTrendPoint {
    pub day: NaiveDate,
    pub min_weight: f64,
    pub avg_weight: f64,
    pub max_weight: f64,
    pub readings: i64,
}

/// Tendencia de peso de un vehículo
#[derive(Debug, Serialize)]
pub struct WeightTrendResponse {
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub points: Vec<WeightTrendPoint>,
}
