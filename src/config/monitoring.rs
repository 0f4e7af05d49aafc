//! Configuración del motor de reglas de pesaje
//!
//! Constantes que gobiernan la clasificación de lecturas, el promedio
//! móvil y el historial de alertas. Todas tienen override por entorno.

use std::env;

use crate::models::alert::Severity;

/// Constantes de reglas de la ingesta
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Kilos por encima de `max_allowed_weight` que marcan una lectura
    /// como sobrecarga sospechosa
    pub overload_threshold_kg: f64,
    /// Ventana de días de lecturas válidas para el promedio móvil
    pub valid_reading_days: i64,
    /// Tope de lecturas consideradas para el promedio
    pub max_readings_for_average: i64,
    /// Tope del historial de alertas embebido en el vehículo
    pub max_alert_history: usize,
    /// Severidad para alertas críticas (overload, penalty)
    pub critical_severity: Severity,
    /// Severidad para avisos de aproximación al límite
    pub warning_severity: Severity,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            overload_threshold_kg: env_parse("OVERLOAD_THRESHOLD_KG", 100.0),
            valid_reading_days: env_parse("VALID_READING_DAYS", 30),
            max_readings_for_average: env_parse("MAX_READINGS_FOR_AVERAGE", 100),
            max_alert_history: env_parse("MAX_ALERT_HISTORY", 50),
            critical_severity: Severity::High,
            warning_severity: Severity::Medium,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_rule_engine_expectations() {
        let config = MonitoringConfig::default();
        assert_eq!(config.overload_threshold_kg, 100.0);
        assert_eq!(config.valid_reading_days, 30);
        assert_eq!(config.max_readings_for_average, 100);
        assert_eq!(config.max_alert_history, 50);
        assert_eq!(config.critical_severity, Severity::High);
        assert_eq!(config.warning_severity, Severity::Medium);
    }
}
