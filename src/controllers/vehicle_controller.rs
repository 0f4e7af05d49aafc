use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{bad_request_error, conflict_error, AppError, AppResult};
use crate::utils::validation::normalize_registration;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        mut request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        request.validate()?;

        if !(request.max_allowed_weight.is_finite() && request.max_allowed_weight > 0.0) {
            return Err(bad_request_error("El peso máximo permitido tiene que ser positivo"));
        }

        request.registration_number = normalize_registration(&request.registration_number);
        if request.registration_number.is_empty() {
            return Err(bad_request_error("La matrícula es requerida"));
        }

        // Verificar que la matrícula no esté registrada
        if self
            .repository
            .registration_exists(&request.registration_number)
            .await?
        {
            return Err(conflict_error(
                "Vehicle",
                "registration_number",
                &request.registration_number,
            ));
        }

        let vehicle = self.repository.create(request).await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.list_all().await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        request.validate()?;

        if let Some(max_allowed_weight) = request.max_allowed_weight {
            if !(max_allowed_weight.is_finite() && max_allowed_weight > 0.0) {
                return Err(bad_request_error(
                    "El peso máximo permitido tiene que ser positivo",
                ));
            }
        }

        let vehicle = self.repository.update(id, request).await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
