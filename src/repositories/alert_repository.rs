use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::alert_dto::AlertFilters;
use crate::models::alert::Alert;
use crate::utils::errors::AppError;

const INSERT_ALERT_SQL: &str = r#"
    INSERT INTO alerts (
        id, vehicle_id, alert_type, message, severity, current_weight,
        location, latitude, longitude, map_url, notified,
        is_resolved, resolved_timestamp, timestamp
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
    RETURNING *
"#;

pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, alert: &Alert) -> Result<Alert, AppError> {
        let alert = sqlx::query_as::<_, Alert>(INSERT_ALERT_SQL)
            .bind(alert.id)
            .bind(alert.vehicle_id)
            .bind(alert.alert_type)
            .bind(alert.message.clone())
            .bind(alert.severity)
            .bind(alert.current_weight)
            .bind(alert.location.clone())
            .bind(alert.latitude)
            .bind(alert.longitude)
            .bind(alert.map_url.clone())
            .bind(alert.notified)
            .bind(alert.is_resolved)
            .bind(alert.resolved_timestamp)
            .bind(alert.timestamp)
            .fetch_one(&self.pool)
            .await?;

        Ok(alert)
    }

    /// Variante transaccional, usada cuando la alerta acompaña a una
    /// penalidad recién creada
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        alert: &Alert,
    ) -> Result<Alert, AppError> {
        let alert = sqlx::query_as::<_, Alert>(INSERT_ALERT_SQL)
            .bind(alert.id)
            .bind(alert.vehicle_id)
            .bind(alert.alert_type)
            .bind(alert.message.clone())
            .bind(alert.severity)
            .bind(alert.current_weight)
            .bind(alert.location.clone())
            .bind(alert.latitude)
            .bind(alert.longitude)
            .bind(alert.map_url.clone())
            .bind(alert.notified)
            .bind(alert.is_resolved)
            .bind(alert.resolved_timestamp)
            .bind(alert.timestamp)
            .fetch_one(&mut **tx)
            .await?;

        Ok(alert)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(alert)
    }

    pub async fn list(&self, filters: &AlertFilters) -> Result<Vec<Alert>, AppError> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM alerts
            WHERE ($1::uuid IS NULL OR vehicle_id = $1)
              AND ($2::alert_type IS NULL OR alert_type = $2)
              AND ($3::bool OR is_resolved = false)
            ORDER BY timestamp DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filters.vehicle_id)
        .bind(filters.alert_type)
        .bind(filters.include_resolved.unwrap_or(true))
        .bind(filters.limit.unwrap_or(100))
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    pub async fn update_resolution(&self, alert: &Alert) -> Result<(), AppError> {
        sqlx::query("UPDATE alerts SET is_resolved = $2, resolved_timestamp = $3 WHERE id = $1")
            .bind(alert.id)
            .bind(alert.is_resolved)
            .bind(alert.resolved_timestamp)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Se marca después de entregar la notificación, nunca dentro del
    /// pipeline de ingesta
    pub async fn mark_notified(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE alerts SET notified = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
