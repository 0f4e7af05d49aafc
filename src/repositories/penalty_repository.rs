use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::penalty_dto::PenaltyFilters;
use crate::models::penalty::{Penalty, PenaltyRate};
use crate::utils::errors::AppError;

pub struct PenaltyRepository {
    pool: PgPool,
}

impl PenaltyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert transaccional: la penalidad se crea junto con su alerta y el
    /// append de historial, dentro de la misma transacción
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        penalty: &Penalty,
    ) -> Result<Penalty, AppError> {
        let penalty = sqlx::query_as::<_, Penalty>(
            r#"
            INSERT INTO penalties (
                id, vehicle_id, amount, overload_amount, status, paid,
                paid_date, latitude, longitude, reference_number, notes, timestamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(penalty.id)
        .bind(penalty.vehicle_id)
        .bind(penalty.amount)
        .bind(penalty.overload_amount)
        .bind(penalty.status)
        .bind(penalty.paid)
        .bind(penalty.paid_date)
        .bind(penalty.latitude)
        .bind(penalty.longitude)
        .bind(penalty.reference_number.clone())
        .bind(penalty.notes.clone())
        .bind(penalty.timestamp)
        .fetch_one(&mut **tx)
        .await?;

        Ok(penalty)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Penalty>, AppError> {
        let penalty = sqlx::query_as::<_, Penalty>("SELECT * FROM penalties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(penalty)
    }

    pub async fn list(&self, filters: &PenaltyFilters) -> Result<Vec<Penalty>, AppError> {
        let penalties = sqlx::query_as::<_, Penalty>(
            r#"
            SELECT * FROM penalties
            WHERE ($1::uuid IS NULL OR vehicle_id = $1)
              AND ($2::penalty_status IS NULL OR status = $2)
            ORDER BY timestamp DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filters.vehicle_id)
        .bind(filters.status)
        .bind(filters.limit.unwrap_or(100))
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(penalties)
    }

    pub async fn update_payment(&self, penalty: &Penalty) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE penalties
            SET paid = $2, status = $3, paid_date = $4, reference_number = $5
            WHERE id = $1
            "#,
        )
        .bind(penalty.id)
        .bind(penalty.paid)
        .bind(penalty.status)
        .bind(penalty.paid_date)
        .bind(penalty.reference_number.clone())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// La tarifa vigente. `None` es un fallo duro para la penalidad en curso:
    /// nunca se fabrica un monto por defecto.
    pub async fn active_rate(&self) -> Result<Option<PenaltyRate>, AppError> {
        let rate = sqlx::query_as::<_, PenaltyRate>(
            "SELECT * FROM penalty_rates ORDER BY effective_from DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(rate)
    }

    pub async fn active_rate_tx(
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<PenaltyRate>, AppError> {
        let rate = sqlx::query_as::<_, PenaltyRate>(
            "SELECT * FROM penalty_rates ORDER BY effective_from DESC LIMIT 1",
        )
        .fetch_optional(&mut **tx)
        .await?;

        Ok(rate)
    }

    /// Reemplazo atómico de la tarifa: delete-then-insert en una sola
    /// transacción, los lectores ven la fila vieja o la nueva, nunca un
    /// estado intermedio
    pub async fn replace_rate(
        &self,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<PenaltyRate, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM penalty_rates")
            .execute(&mut *tx)
            .await?;

        let rate = sqlx::query_as::<_, PenaltyRate>(
            r#"
            INSERT INTO penalty_rates (id, amount, effective_from, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(amount)
        .bind(Utc::now())
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rate)
    }
}
