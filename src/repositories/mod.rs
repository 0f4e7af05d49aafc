//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las queries SQL de su entidad. Las variantes
//! `_tx` existen para las escrituras que tienen que viajar juntas (penalidad
//! + alerta + historial).

pub mod alert_repository;
pub mod penalty_repository;
pub mod reading_repository;
pub mod vehicle_repository;
