use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::vehicle::{AlertHistoryEntry, Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, vehicle_name, registration_number, description, driver, owner,
                max_allowed_weight, current_weight, last_reported_weight, average_weight,
                weight_alert, is_currently_overloaded, latitude, longitude,
                last_reported_location, status, alert_history, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, 0, NULL, false, false, NULL, NULL, NULL, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.vehicle_name)
        .bind(request.registration_number)
        .bind(request.description)
        .bind(request.driver)
        .bind(request.owner)
        .bind(request.max_allowed_weight)
        .bind(VehicleStatus::Inactive)
        .bind(Json(Vec::<AlertHistoryEntry>::new()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn registration_exists(&self, registration_number: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1)",
        )
        .bind(registration_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<Vehicle, AppError> {
        // Obtener vehículo actual
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_name = $2, description = $3, driver = $4, owner = $5,
                max_allowed_weight = $6, status = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.vehicle_name.unwrap_or(current.vehicle_name))
        .bind(request.description.or(current.description))
        .bind(request.driver.or(current.driver))
        .bind(request.owner.unwrap_or(current.owner))
        .bind(request.max_allowed_weight.unwrap_or(current.max_allowed_weight))
        .bind(request.status.unwrap_or(current.status))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Borra el vehículo; lecturas, alertas y penalidades caen en cascada
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }

    /// Commit de los campos del agregado que muta la ingesta. Se llama con
    /// el lock por vehículo tomado; el historial se escribe aparte.
    pub async fn commit_reading_state(&self, vehicle: &Vehicle) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET current_weight = $2, last_reported_weight = $3, average_weight = $4,
                weight_alert = $5, is_currently_overloaded = $6,
                latitude = $7, longitude = $8, last_reported_location = $9, status = $10
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.current_weight)
        .bind(vehicle.last_reported_weight)
        .bind(vehicle.average_weight)
        .bind(vehicle.weight_alert)
        .bind(vehicle.is_currently_overloaded)
        .bind(vehicle.latitude)
        .bind(vehicle.longitude)
        .bind(vehicle.last_reported_location)
        .bind(vehicle.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_alert_history(
        &self,
        id: Uuid,
        history: &Json<Vec<AlertHistoryEntry>>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET alert_history = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(history.0.clone()))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Variante transaccional del append de historial, para acoplarla a la
    /// creación de la penalidad
    pub async fn update_alert_history_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        history: &Json<Vec<AlertHistoryEntry>>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET alert_history = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(history.0.clone()))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
