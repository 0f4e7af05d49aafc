use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::reading_dto::CreateWeightReadingRequest;
use crate::models::weight_reading::{ReadingStatus, WeightReading};
use crate::utils::errors::AppError;

pub struct ReadingRepository {
    pool: PgPool,
}

impl ReadingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar la lectura tal como llegó del sensor. Entra al log como
    /// `valid`; la clasificación la reescribe una única vez después.
    pub async fn insert(
        &self,
        request: &CreateWeightReadingRequest,
    ) -> Result<WeightReading, AppError> {
        let reading = sqlx::query_as::<_, WeightReading>(
            r#"
            INSERT INTO weight_readings (
                id, vehicle_id, weight, latitude, longitude,
                sensor_id, sensor_health, status, timestamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.vehicle_id)
        .bind(request.weight)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.sensor_id.clone())
        .bind(request.sensor_health)
        .bind(ReadingStatus::Valid)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(reading)
    }

    /// La única escritura post-creación que admite una lectura
    pub async fn set_status(&self, id: Uuid, status: ReadingStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE weight_readings SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_by_vehicle(
        &self,
        vehicle_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WeightReading>, AppError> {
        let readings = sqlx::query_as::<_, WeightReading>(
            r#"
            SELECT * FROM weight_readings
            WHERE vehicle_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(vehicle_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    /// Selección para el promedio móvil: lecturas válidas de sensor sano,
    /// peso distinto de cero, dentro de la ventana, más recientes primero,
    /// acotadas al tope configurado.
    pub async fn recent_valid_weights(
        &self,
        vehicle_id: Uuid,
        window_days: i64,
        limit: i64,
    ) -> Result<Vec<f64>, AppError> {
        let cutoff = Utc::now() - Duration::days(window_days);

        let weights = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT weight FROM weight_readings
            WHERE vehicle_id = $1
              AND status = 'valid'
              AND sensor_health = 'healthy'
              AND weight <> 0
              AND timestamp >= $2
            ORDER BY timestamp DESC
            LIMIT $3
            "#,
        )
        .bind(vehicle_id)
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(weights)
    }
}
