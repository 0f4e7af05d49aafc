//! Modelo de Penalty y PenaltyRate
//!
//! Penalidades monetarias por sobrecarga. Se crea a lo sumo una por
//! transición normal→sobrecargado, nunca por lectura repetida. La tarifa
//! vigente es una fila de configuración única (reemplazo atómico).

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la penalidad - mapea al ENUM penalty_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "penalty_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PenaltyStatus {
    Unpaid,
    Paid,
    Disputed,
    Waived,
}

/// Penalidad persistida, pertenece a un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Penalty {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    /// Monto en TZS
    pub amount: Decimal,
    /// Kilos por encima del límite permitido
    pub overload_amount: Decimal,
    pub status: PenaltyStatus,
    pub paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Penalty {
    /// Marcar como pagada. Idempotente: si ya estaba pagada devuelve `false`
    /// y no toca ningún campo. Sin referencia del pagador se genera un
    /// comprobante propio.
    pub fn mark_paid(&mut self, reference_number: Option<String>) -> bool {
        if self.paid {
            return false;
        }
        self.paid = true;
        self.status = PenaltyStatus::Paid;
        self.paid_date = Some(Utc::now());
        self.reference_number = reference_number.or_else(|| Some(generate_payment_reference()));
        true
    }
}

/// Tarifa vigente de penalidad: una sola fila activa en todo momento
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PenaltyRate {
    pub id: Uuid,
    /// Monto actual en TZS
    pub amount: Decimal,
    pub effective_from: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Generar una referencia de pago tipo `PAY-XXXXXXXX`
pub fn generate_payment_reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();
    format!("PAY-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_penalty() -> Penalty {
        Penalty {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            amount: Decimal::new(50_000_00, 2),
            overload_amount: Decimal::new(200_00, 2),
            status: PenaltyStatus::Unpaid,
            paid: false,
            paid_date: None,
            latitude: None,
            longitude: None,
            reference_number: None,
            notes: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_mark_paid_sets_payment_fields() {
        let mut penalty = sample_penalty();

        assert!(penalty.mark_paid(Some("BANK-REF-001".to_string())));
        assert!(penalty.paid);
        assert_eq!(penalty.status, PenaltyStatus::Paid);
        assert!(penalty.paid_date.is_some());
        assert_eq!(penalty.reference_number.as_deref(), Some("BANK-REF-001"));
    }

    #[test]
    fn test_mark_paid_is_idempotent() {
        let mut penalty = sample_penalty();
        penalty.mark_paid(Some("BANK-REF-001".to_string()));
        let paid_date = penalty.paid_date;

        // segunda llamada con otra referencia: no-op
        assert!(!penalty.mark_paid(Some("BANK-REF-002".to_string())));
        assert_eq!(penalty.reference_number.as_deref(), Some("BANK-REF-001"));
        assert_eq!(penalty.paid_date, paid_date);
    }

    #[test]
    fn test_mark_paid_generates_reference_when_missing() {
        let mut penalty = sample_penalty();
        penalty.mark_paid(None);

        let reference = penalty.reference_number.expect("reference generated");
        assert!(reference.starts_with("PAY-"));
        assert_eq!(reference.len(), 12);
    }
}
