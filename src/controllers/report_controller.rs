use sqlx::PgPool;

use crate::dto::report_dto::{
    AlertFrequencyRow, FleetSummaryResponse, ReportQuery, WeightTrendResponse,
};
use crate::services::report_service::ReportService;
use crate::utils::errors::AppResult;

pub struct ReportController {
    service: ReportService,
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: ReportService::new(pool),
        }
    }

    pub async fn summary(&self, query: ReportQuery) -> AppResult<FleetSummaryResponse> {
        self.service.fleet_summary(query.days).await
    }

    pub async fn alert_frequency(&self, query: ReportQuery) -> AppResult<Vec<AlertFrequencyRow>> {
        self.service.alert_frequency(query.days, query.vehicle_id).await
    }

    pub async fn weight_trends(
        &self,
        query: ReportQuery,
    ) -> AppResult<Vec<WeightTrendResponse>> {
        match query.vehicle_id {
            Some(vehicle_id) => {
                let trend = self.service.weight_trend(vehicle_id, query.days).await?;
                Ok(vec![trend])
            }
            None => self.service.fleet_weight_trends(query.days).await,
        }
    }
}
