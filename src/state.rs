//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, incluido el mapa de locks por vehículo
//! que serializa la ingesta.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use sqlx::PgPool;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::{EnvironmentConfig, MonitoringConfig};
use crate::services::notification_service::NotificationService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub env: EnvironmentConfig,
    pub monitoring: MonitoringConfig,
    pub http_client: Client,
    pub notifications: Arc<NotificationService>,
    /// Un mutex por vehículo: las lecturas del mismo vehículo se procesan
    /// de a una (el read-modify-write del historial y el chequeo de
    /// transición no pueden intercalarse); vehículos distintos corren en
    /// paralelo.
    vehicle_locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl AppState {
    pub fn new(pool: PgPool, env: EnvironmentConfig, monitoring: MonitoringConfig) -> Self {
        let notifications = Arc::new(NotificationService::new(&env));
        Self {
            pool,
            env,
            monitoring,
            http_client: Client::new(),
            notifications,
            vehicle_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Obtener (o crear) el lock de un vehículo. El lock se mantiene solo
    /// durante la sección crítica de la ingesta, nunca a través de I/O
    /// de red.
    pub async fn vehicle_lock(&self, vehicle_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.vehicle_locks.read().await;
            if let Some(lock) = locks.get(&vehicle_id) {
                return lock.clone();
            }
        }

        let mut locks = self.vehicle_locks.write().await;
        locks
            .entry(vehicle_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Descartar locks de vehículos eliminados
    pub async fn drop_vehicle_lock(&self, vehicle_id: Uuid) {
        let mut locks = self.vehicle_locks.write().await;
        locks.remove(&vehicle_id);
    }
}
