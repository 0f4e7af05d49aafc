//! Controllers de la API
//!
//! Orquestación fina por recurso: validan, delegan en servicios y
//! repositorios, y arman los DTOs de respuesta.

pub mod alert_controller;
pub mod penalty_controller;
pub mod reading_controller;
pub mod report_controller;
pub mod vehicle_controller;
