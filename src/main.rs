mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::{EnvironmentConfig, MonitoringConfig};
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("⚖️ Fleet Weight Monitoring - Ingesta y penalidades por sobrecarga");
    info!("=================================================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let env_config = EnvironmentConfig::default();
    let monitoring_config = MonitoringConfig::default();
    info!(
        "🔧 Reglas: umbral de sobrecarga {} kg, ventana {} días, tope promedio {}, historial {}",
        monitoring_config.overload_threshold_kg,
        monitoring_config.valid_reading_days,
        monitoring_config.max_readings_for_average,
        monitoring_config.max_alert_history
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", env_config.port).parse()?;
    let app_state = AppState::new(pool, env_config, monitoring_config);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/weights", routes::reading_routes::create_reading_router())
        .nest("/api/alerts", routes::alert_routes::create_alert_router())
        .nest("/api/penalties", routes::penalty_routes::create_penalty_router())
        .nest("/api/reports", routes::report_routes::create_report_router())
        .layer(cors_middleware())
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚚 Vehículos:");
    info!("   POST   /api/vehicles - Registrar vehículo");
    info!("   GET    /api/vehicles - Listar vehículos");
    info!("   GET    /api/vehicles/:id - Obtener vehículo");
    info!("   PUT    /api/vehicles/:id - Actualizar vehículo");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo");
    info!("⚖️ Lecturas de peso:");
    info!("   POST /api/weights - Ingestar lectura (motor de reglas)");
    info!("   GET  /api/weights/vehicle/:id - Lecturas de un vehículo");
    info!("🚨 Alertas:");
    info!("   GET  /api/alerts - Listar alertas");
    info!("   POST /api/alerts/:id/resolve - Resolver alerta");
    info!("💰 Penalidades:");
    info!("   GET  /api/penalties - Listar penalidades");
    info!("   POST /api/penalties/:id/mark-paid - Marcar pagada");
    info!("   GET  /api/penalties/rate - Tarifa vigente");
    info!("   PUT  /api/penalties/rate - Reemplazar tarifa");
    info!("📊 Reportes:");
    info!("   GET  /api/reports/summary - Resumen de flota");
    info!("   GET  /api/reports/alert-frequency - Frecuencia de alertas");
    info!("   GET  /api/reports/weight-trends - Tendencias de peso");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "weight-monitoring",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
