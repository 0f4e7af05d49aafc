//! Reportes de solo lectura
//!
//! Vistas de resumen y tendencia sobre las entidades persistidas. Acá no
//! hay decisiones ni mutaciones: consume las mismas tablas que la ingesta
//! y solo agrega.

use chrono::{Duration, Utc};
use futures::future::try_join_all;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::dto::report_dto::{
    AlertFrequencyRow, FleetSummaryResponse, WeightTrendPoint, WeightTrendResponse,
};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};

const DEFAULT_REPORT_DAYS: i64 = 30;

pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resumen de flota para el dashboard
    pub async fn fleet_summary(&self, days: Option<i64>) -> AppResult<FleetSummaryResponse> {
        let window_days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let cutoff = Utc::now() - Duration::days(window_days);

        let vehicles_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'active') AS active,
                   COUNT(*) FILTER (WHERE is_currently_overloaded) AS overloaded
            FROM vehicles
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let readings_row =
            sqlx::query("SELECT COUNT(*) AS in_window FROM weight_readings WHERE timestamp >= $1")
                .bind(cutoff)
                .fetch_one(&self.pool)
                .await?;

        let alerts_row = sqlx::query(
            r#"
            SELECT COUNT(*) FILTER (WHERE timestamp >= $1) AS in_window,
                   COUNT(*) FILTER (WHERE is_resolved = false) AS unresolved
            FROM alerts
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;

        let penalties_row = sqlx::query(
            r#"
            SELECT COUNT(*) FILTER (WHERE paid = false) AS unpaid,
                   COALESCE(SUM(amount) FILTER (WHERE paid = false), 0) AS unpaid_amount,
                   AVG(amount) AS average_amount
            FROM penalties
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(FleetSummaryResponse {
            window_days,
            total_vehicles: vehicles_row.try_get("total")?,
            active_vehicles: vehicles_row.try_get("active")?,
            overloaded_vehicles: vehicles_row.try_get("overloaded")?,
            readings_in_window: readings_row.try_get("in_window")?,
            alerts_in_window: alerts_row.try_get("in_window")?,
            unresolved_alerts: alerts_row.try_get("unresolved")?,
            unpaid_penalties: penalties_row.try_get("unpaid")?,
            unpaid_amount: penalties_row.try_get::<Decimal, _>("unpaid_amount")?,
            average_penalty_amount: penalties_row
                .try_get::<Option<Decimal>, _>("average_amount")?
                .and_then(|d| d.to_f64()),
        })
    }

    /// Frecuencia de alertas por tipo y severidad dentro de la ventana
    pub async fn alert_frequency(
        &self,
        days: Option<i64>,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<Vec<AlertFrequencyRow>> {
        let window_days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let cutoff = Utc::now() - Duration::days(window_days);

        let rows = sqlx::query_as::<_, AlertFrequencyRow>(
            r#"
            SELECT alert_type, severity, COUNT(*) AS count
            FROM alerts
            WHERE timestamp >= $1
              AND ($2::uuid IS NULL OR vehicle_id = $2)
            GROUP BY alert_type, severity
            ORDER BY count DESC
            "#,
        )
        .bind(cutoff)
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Tendencia diaria de peso (min/avg/max) para un vehículo
    pub async fn weight_trend(
        &self,
        vehicle_id: Uuid,
        days: Option<i64>,
    ) -> AppResult<WeightTrendResponse> {
        let vehicle = VehicleRepository::new(self.pool.clone())
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let window_days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let cutoff = Utc::now() - Duration::days(window_days);

        let points = sqlx::query_as::<_, WeightTrendPoint>(
            r#"
            SELECT DATE(timestamp) AS day,
                   MIN(weight) AS min_weight,
                   AVG(weight) AS avg_weight,
                   MAX(weight) AS max_weight,
                   COUNT(*) AS readings
            FROM weight_readings
            WHERE vehicle_id = $1 AND timestamp >= $2
            GROUP BY DATE(timestamp)
            ORDER BY day
            "#,
        )
        .bind(vehicle_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(WeightTrendResponse {
            vehicle_id,
            vehicle_name: vehicle.vehicle_name,
            points,
        })
    }

    /// Tendencias de toda la flota, un response por vehículo
    pub async fn fleet_weight_trends(
        &self,
        days: Option<i64>,
    ) -> AppResult<Vec<WeightTrendResponse>> {
        let vehicles = VehicleRepository::new(self.pool.clone()).list_all().await?;

        let trends = try_join_all(
            vehicles
                .iter()
                .map(|vehicle| self.weight_trend(vehicle.id, days)),
        )
        .await?;

        Ok(trends)
    }
}
