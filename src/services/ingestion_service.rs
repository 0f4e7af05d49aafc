//! Motor de ingesta de lecturas de peso
//!
//! El corazón del sistema: clasifica cada lectura, detecta la transición
//! de sobrecarga, actualiza el agregado del vehículo y dispara las fases
//! best-effort (alertas, penalidad). La ingesta confirma la lectura aunque
//! esas fases fallen; los fallos se devuelven tipados y se registran.
//!
//! Orden canónico: primero se persiste la clasificación de la lectura,
//! después se consulta el promedio (que solo ve lecturas ya clasificadas)
//! y recién entonces se commitea el agregado del vehículo.

use sqlx::PgPool;

use crate::config::MonitoringConfig;
use crate::dto::reading_dto::CreateWeightReadingRequest;
use crate::models::alert::Alert;
use crate::models::penalty::Penalty;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::models::weight_reading::{ReadingStatus, SensorHealth, WeightReading};
use crate::repositories::reading_repository::ReadingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::alert_service::AlertService;
use crate::services::penalty_service::PenaltyService;
use crate::utils::errors::AppResult;

/// Resultado de la clasificación de una lectura, en orden de precedencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOutcome {
    /// (a) sensor defectuoso: sospechosa, sin lógica de sobrecarga
    SensorMalfunction,
    /// (b) peso > límite + umbral: sospechosa, candidata a sobrecarga
    SuspectedOverload,
    /// (c) peso > límite pero dentro del umbral: válida, solo aviso
    ApproachingLimit,
    /// (d) todo en orden
    Normal,
}

#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub status: ReadingStatus,
    pub outcome: ReadingOutcome,
}

/// Clasificar una lectura. Primera regla que matchea gana.
pub fn classify_reading(
    weight: f64,
    sensor_health: SensorHealth,
    max_allowed: f64,
    overload_threshold: f64,
) -> Classification {
    if sensor_health == SensorHealth::Malfunctioning {
        return Classification {
            status: ReadingStatus::Suspected,
            outcome: ReadingOutcome::SensorMalfunction,
        };
    }
    if weight > max_allowed + overload_threshold {
        return Classification {
            status: ReadingStatus::Suspected,
            outcome: ReadingOutcome::SuspectedOverload,
        };
    }
    if weight > max_allowed {
        return Classification {
            status: ReadingStatus::Valid,
            outcome: ReadingOutcome::ApproachingLimit,
        };
    }
    Classification {
        status: ReadingStatus::Valid,
        outcome: ReadingOutcome::Normal,
    }
}

/// Transición del flag de sobrecarga evaluada sobre una misma lectura
#[derive(Debug, Clone, Copy)]
pub struct OverloadTransition {
    pub was_overloaded: bool,
    pub is_overloaded: bool,
}

impl OverloadTransition {
    /// La penalidad se emite solo en la transición false→true.
    /// Sin cooldown: al volver bajo el límite el vehículo queda listo
    /// para una nueva penalidad en la próxima transición.
    pub fn penalty_due(&self) -> bool {
        !self.was_overloaded && self.is_overloaded
    }
}

/// Promedio aritmético del set seleccionado. Set vacío → `None`, nunca 0:
/// un vehículo sin lecturas válidas recientes tiene promedio indefinido.
pub fn rolling_average(weights: &[f64]) -> Option<f64> {
    if weights.is_empty() {
        return None;
    }
    Some(weights.iter().sum::<f64>() / weights.len() as f64)
}

/// Aplicar la lectura clasificada al agregado del vehículo (en memoria).
/// Devuelve la transición para el chequeo de penalidad.
pub fn apply_reading(
    vehicle: &mut Vehicle,
    reading: &WeightReading,
    classification: &Classification,
    average: Option<f64>,
) -> OverloadTransition {
    let was_overloaded = vehicle.is_currently_overloaded;

    vehicle.current_weight = reading.weight;
    vehicle.last_reported_weight = reading.weight;
    if reading.latitude.is_some() && reading.longitude.is_some() {
        vehicle.latitude = reading.latitude;
        vehicle.longitude = reading.longitude;
    }
    vehicle.last_reported_location = Some(reading.timestamp);
    vehicle.average_weight = average;

    let is_overloaded = match classification.outcome {
        // un sensor roto no setea ni limpia el flag
        ReadingOutcome::SensorMalfunction => was_overloaded,
        ReadingOutcome::SuspectedOverload => true,
        ReadingOutcome::ApproachingLimit | ReadingOutcome::Normal => false,
    };

    vehicle.is_currently_overloaded = is_overloaded;
    vehicle.weight_alert = is_overloaded
        || classification.status == ReadingStatus::Suspected
        || reading.sensor_health == SensorHealth::Malfunctioning;
    vehicle.status = VehicleStatus::Active;

    OverloadTransition {
        was_overloaded,
        is_overloaded,
    }
}

/// Fallo de una fase best-effort. Se registra y se devuelve junto al
/// resultado principal; nunca se propaga como error de la ingesta.
#[derive(Debug)]
pub struct SideEffectFailure {
    pub stage: &'static str,
    pub detail: String,
}

/// Resultado completo de la ingesta de una lectura
pub struct IngestionOutcome {
    pub reading: WeightReading,
    pub vehicle: Vehicle,
    pub transition: OverloadTransition,
    pub penalty: Option<Penalty>,
    /// Alertas que hay que despachar a las autoridades, fuera del lock
    pub alerts_to_notify: Vec<Alert>,
    pub failures: Vec<SideEffectFailure>,
}

pub struct IngestionService {
    vehicles: VehicleRepository,
    readings: ReadingRepository,
    alerts: AlertService,
    penalties: PenaltyService,
    monitoring: MonitoringConfig,
}

impl IngestionService {
    pub fn new(pool: PgPool, monitoring: MonitoringConfig) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            readings: ReadingRepository::new(pool.clone()),
            alerts: AlertService::new(pool.clone(), monitoring.clone()),
            penalties: PenaltyService::new(pool, monitoring.clone()),
            monitoring,
        }
    }

    /// Pipeline completo para una lectura ya validada referencialmente.
    /// Precondición: el caller tiene tomado el lock del vehículo; acá no
    /// hay I/O de red, solo base de datos.
    pub async fn ingest(
        &self,
        mut vehicle: Vehicle,
        request: &CreateWeightReadingRequest,
    ) -> AppResult<IngestionOutcome> {
        // 1. la lectura entra al log tal cual llegó
        let mut reading = self.readings.insert(request).await?;

        // 2. clasificar y persistir el status antes de tocar el agregado
        let classification = classify_reading(
            reading.weight,
            reading.sensor_health,
            vehicle.max_allowed_weight,
            self.monitoring.overload_threshold_kg,
        );
        self.readings
            .set_status(reading.id, classification.status)
            .await?;
        reading.status = classification.status;

        // 3. promedio móvil sobre lecturas ya clasificadas
        let weights = self
            .readings
            .recent_valid_weights(
                vehicle.id,
                self.monitoring.valid_reading_days,
                self.monitoring.max_readings_for_average,
            )
            .await?;
        let average = rolling_average(&weights);

        // 4. transición y commit del agregado
        let transition = apply_reading(&mut vehicle, &reading, &classification, average);
        self.vehicles.commit_reading_state(&vehicle).await?;

        // 5. fases best-effort: la lectura ya está confirmada, nada de lo
        //    que sigue puede rechazarla ni revertirla
        let mut penalty = None;
        let mut alerts_to_notify = Vec::new();
        let mut failures = Vec::new();

        match classification.outcome {
            ReadingOutcome::SensorMalfunction => {
                if let Err(e) = self
                    .alerts
                    .sensor_malfunction_alert(&mut vehicle, &reading)
                    .await
                {
                    tracing::error!("Fallo creando alerta de sensor: {}", e);
                    failures.push(SideEffectFailure {
                        stage: "sensor_malfunction_alert",
                        detail: e.to_string(),
                    });
                }
            }
            ReadingOutcome::SuspectedOverload => {
                match self.alerts.overload_alert(&mut vehicle, &reading).await {
                    Ok(alert) => alerts_to_notify.push(alert),
                    Err(e) => {
                        tracing::error!("Fallo creando alerta de sobrecarga: {}", e);
                        failures.push(SideEffectFailure {
                            stage: "overload_alert",
                            detail: e.to_string(),
                        });
                    }
                }

                if transition.penalty_due() {
                    match self.penalties.issue(&mut vehicle, &reading).await {
                        Ok((issued, alert)) => {
                            penalty = Some(issued);
                            alerts_to_notify.push(alert);
                        }
                        Err(e) => {
                            // la penalidad falla sola; la lectura ya está confirmada
                            tracing::error!("Fallo emitiendo penalidad: {}", e);
                            failures.push(SideEffectFailure {
                                stage: "penalty",
                                detail: e.to_string(),
                            });
                        }
                    }
                }
            }
            ReadingOutcome::ApproachingLimit => {
                // aviso de severidad media, sin correo a las autoridades
                if let Err(e) = self
                    .alerts
                    .weight_warning_alert(&mut vehicle, &reading)
                    .await
                {
                    tracing::error!("Fallo creando aviso de peso: {}", e);
                    failures.push(SideEffectFailure {
                        stage: "weight_warning_alert",
                        detail: e.to_string(),
                    });
                }
            }
            ReadingOutcome::Normal => {}
        }

        Ok(IngestionOutcome {
            reading,
            vehicle,
            transition,
            penalty,
            alerts_to_notify,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn sample_vehicle(max_allowed_weight: f64) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            vehicle_name: "Truck A".to_string(),
            registration_number: "TRK123".to_string(),
            description: None,
            driver: None,
            owner: "John Doe".to_string(),
            max_allowed_weight,
            current_weight: 0.0,
            last_reported_weight: 0.0,
            average_weight: None,
            weight_alert: false,
            is_currently_overloaded: false,
            latitude: None,
            longitude: None,
            last_reported_location: None,
            status: VehicleStatus::Inactive,
            alert_history: Json(Vec::new()),
            created_at: Utc::now(),
        }
    }

    fn reading_for(vehicle: &Vehicle, weight: f64, sensor_health: SensorHealth) -> WeightReading {
        WeightReading {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            weight,
            latitude: Some(-6.7924),
            longitude: Some(39.2083),
            sensor_id: Some("SENSOR001".to_string()),
            sensor_health,
            status: ReadingStatus::Valid,
            timestamp: Utc::now(),
        }
    }

    /// Aplica una lectura completa con las funciones puras del motor,
    /// como hace el pipeline, y devuelve si correspondía penalidad.
    fn run_reading(vehicle: &mut Vehicle, weight: f64, sensor_health: SensorHealth) -> bool {
        let reading = reading_for(vehicle, weight, sensor_health);
        let classification =
            classify_reading(weight, sensor_health, vehicle.max_allowed_weight, 100.0);
        let transition = apply_reading(vehicle, &reading, &classification, None);
        transition.penalty_due()
    }

    #[test]
    fn test_malfunctioning_sensor_wins_over_any_weight() {
        let classification =
            classify_reading(99_999.0, SensorHealth::Malfunctioning, 5000.0, 100.0);
        assert_eq!(classification.status, ReadingStatus::Suspected);
        assert_eq!(classification.outcome, ReadingOutcome::SensorMalfunction);
    }

    #[test]
    fn test_weight_over_threshold_is_suspected_overload() {
        let classification = classify_reading(5101.0, SensorHealth::Healthy, 5000.0, 100.0);
        assert_eq!(classification.status, ReadingStatus::Suspected);
        assert_eq!(classification.outcome, ReadingOutcome::SuspectedOverload);
    }

    #[test]
    fn test_weight_at_threshold_boundary_is_only_a_warning() {
        // exactamente límite + umbral: no supera estrictamente, es aviso
        let classification = classify_reading(5100.0, SensorHealth::Healthy, 5000.0, 100.0);
        assert_eq!(classification.status, ReadingStatus::Valid);
        assert_eq!(classification.outcome, ReadingOutcome::ApproachingLimit);
    }

    #[test]
    fn test_weight_at_limit_is_normal() {
        let classification = classify_reading(5000.0, SensorHealth::Healthy, 5000.0, 100.0);
        assert_eq!(classification.status, ReadingStatus::Valid);
        assert_eq!(classification.outcome, ReadingOutcome::Normal);
    }

    #[test]
    fn test_healthy_reading_under_limit_clears_overload() {
        let mut vehicle = sample_vehicle(5000.0);
        vehicle.is_currently_overloaded = true;
        vehicle.weight_alert = true;

        let reading = reading_for(&vehicle, 4000.0, SensorHealth::Healthy);
        let classification = classify_reading(4000.0, SensorHealth::Healthy, 5000.0, 100.0);
        let transition = apply_reading(&mut vehicle, &reading, &classification, Some(4000.0));

        assert!(!vehicle.is_currently_overloaded);
        assert!(!vehicle.weight_alert);
        assert!(!transition.is_overloaded);
        assert!(transition.was_overloaded);
        assert_eq!(vehicle.current_weight, 4000.0);
        assert_eq!(vehicle.last_reported_weight, 4000.0);
        assert_eq!(vehicle.average_weight, Some(4000.0));
        assert_eq!(vehicle.status, VehicleStatus::Active);
        assert!(vehicle.last_reported_location.is_some());
    }

    #[test]
    fn test_malfunctioning_sensor_preserves_overload_flag() {
        let mut vehicle = sample_vehicle(5000.0);
        vehicle.is_currently_overloaded = true;

        let reading = reading_for(&vehicle, 100.0, SensorHealth::Malfunctioning);
        let classification = classify_reading(100.0, SensorHealth::Malfunctioning, 5000.0, 100.0);
        let transition = apply_reading(&mut vehicle, &reading, &classification, None);

        // el sensor roto no limpia el flag ni genera transición
        assert!(vehicle.is_currently_overloaded);
        assert!(!transition.penalty_due());
        assert!(vehicle.weight_alert);
    }

    #[test]
    fn test_reading_without_gps_keeps_last_known_position() {
        let mut vehicle = sample_vehicle(5000.0);
        vehicle.latitude = Some(-6.7924);
        vehicle.longitude = Some(39.2083);

        let mut reading = reading_for(&vehicle, 4000.0, SensorHealth::Healthy);
        reading.latitude = None;
        reading.longitude = None;
        let classification = classify_reading(4000.0, SensorHealth::Healthy, 5000.0, 100.0);
        apply_reading(&mut vehicle, &reading, &classification, None);

        assert_eq!(vehicle.latitude, Some(-6.7924));
        assert_eq!(vehicle.longitude, Some(39.2083));
    }

    #[test]
    fn test_rolling_average_of_empty_set_is_unset_not_zero() {
        assert_eq!(rolling_average(&[]), None);
        assert_ne!(rolling_average(&[]), Some(0.0));
    }

    #[test]
    fn test_rolling_average_is_arithmetic_mean() {
        assert_eq!(rolling_average(&[4000.0, 5000.0, 6000.0]), Some(5000.0));
        assert_eq!(rolling_average(&[4800.0]), Some(4800.0));
    }

    #[test]
    fn test_penalty_only_on_false_to_true_transition() {
        let issue = OverloadTransition {
            was_overloaded: false,
            is_overloaded: true,
        };
        let repeat = OverloadTransition {
            was_overloaded: true,
            is_overloaded: true,
        };
        let clear = OverloadTransition {
            was_overloaded: true,
            is_overloaded: false,
        };
        let quiet = OverloadTransition {
            was_overloaded: false,
            is_overloaded: false,
        };

        assert!(issue.penalty_due());
        assert!(!repeat.penalty_due());
        assert!(!clear.penalty_due());
        assert!(!quiet.penalty_due());
    }

    #[test]
    fn test_overload_penalty_scenario_sequence() {
        // max 5000, umbral 100: la secuencia del caso de referencia
        let mut vehicle = sample_vehicle(5000.0);

        // 5050: dentro del umbral → aviso, sin sobrecarga, sin penalidad
        assert!(!run_reading(&mut vehicle, 5050.0, SensorHealth::Healthy));
        assert!(!vehicle.is_currently_overloaded);

        // 5200: sobrecarga → transición, una penalidad
        assert!(run_reading(&mut vehicle, 5200.0, SensorHealth::Healthy));
        assert!(vehicle.is_currently_overloaded);

        // 5300: sigue sobrecargado → ninguna penalidad nueva
        assert!(!run_reading(&mut vehicle, 5300.0, SensorHealth::Healthy));
        assert!(vehicle.is_currently_overloaded);
        assert_eq!(vehicle.current_weight, 5300.0);

        // 4800: vuelve a la normalidad → flag limpio, sin penalidad
        assert!(!run_reading(&mut vehicle, 4800.0, SensorHealth::Healthy));
        assert!(!vehicle.is_currently_overloaded);

        // 5150: nueva transición → segunda penalidad
        assert!(run_reading(&mut vehicle, 5150.0, SensorHealth::Healthy));
        assert!(vehicle.is_currently_overloaded);
    }

    #[test]
    fn test_malfunction_scenario_never_penalizes() {
        let mut vehicle = sample_vehicle(5000.0);

        // peso absurdo pero sensor roto: sospechosa, sin penalidad
        let reading = reading_for(&vehicle, 50_000.0, SensorHealth::Malfunctioning);
        let classification =
            classify_reading(50_000.0, SensorHealth::Malfunctioning, 5000.0, 100.0);
        let transition = apply_reading(&mut vehicle, &reading, &classification, None);

        assert_eq!(classification.status, ReadingStatus::Suspected);
        assert_eq!(classification.outcome, ReadingOutcome::SensorMalfunction);
        assert!(!transition.penalty_due());
        assert!(vehicle.weight_alert);
    }

    #[test]
    fn test_unconfigured_vehicle_limit_treats_positive_weight_as_overload() {
        // vehículo legacy sin límite configurado: max = 0
        let classification = classify_reading(150.0, SensorHealth::Healthy, 0.0, 100.0);
        assert_eq!(classification.outcome, ReadingOutcome::SuspectedOverload);
    }
}
