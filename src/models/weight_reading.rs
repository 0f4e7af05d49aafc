//! Modelo de WeightReading
//!
//! Lecturas de sensores de peso. Log append-only: una vez validada la
//! lectura, `status` es el único campo que se escribe (exactamente una vez,
//! durante la clasificación).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Clasificación de la lectura - mapea al ENUM reading_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reading_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Valid,
    Suspected,
}

/// Salud del sensor reportada junto a la lectura - ENUM sensor_health
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "sensor_health", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SensorHealth {
    Healthy,
    Malfunctioning,
}

impl Default for SensorHealth {
    fn default() -> Self {
        SensorHealth::Healthy
    }
}

/// Lectura de peso persistida, pertenece a exactamente un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightReading {
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
