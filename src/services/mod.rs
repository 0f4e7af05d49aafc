//! Services module
//!
//! Este módulo contiene la lógica de negocio: el motor de ingesta y sus
//! colaboradores (alertas, penalidades, mapas, notificaciones) más los
//! reportes de solo lectura.

pub mod alert_service;
pub mod ingestion_service;
pub mod map_service;
pub mod notification_service;
pub mod penalty_service;
pub mod report_service;

pub use ingestion_service::*;
pub use notification_service::*;
