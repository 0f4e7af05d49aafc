//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean
//! al schema PostgreSQL (ver schema.sql).

pub mod alert;
pub mod penalty;
pub mod vehicle;
pub mod weight_reading;
