use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::alert_dto::{AlertFilters, AlertResponse};
use crate::repositories::alert_repository::AlertRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct AlertController {
    repository: AlertRepository,
}

impl AlertController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AlertRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: AlertFilters) -> AppResult<Vec<AlertResponse>> {
        let alerts = self.repository.list(&filters).await?;
        Ok(alerts.into_iter().map(Into::into).collect())
    }

    /// Resolver una alerta. Idempotente: resolver dos veces deja el mismo
    /// estado que resolver una.
    pub async fn resolve(&self, id: Uuid) -> AppResult<AlertResponse> {
        let mut alert = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Alerta no encontrada".to_string()))?;

        if alert.resolve() {
            self.repository.update_resolution(&alert).await?;
        }

        Ok(alert.into())
    }
}
