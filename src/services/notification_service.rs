//! Despacho de notificaciones a las autoridades
//!
//! Arma el mensaje legible de una alerta, busca el mapa estático
//! (best-effort) y lo entrega por el canal externo. Los fallos de entrega
//! no se reintentan acá y nunca afectan la ingesta ya confirmada.
//!
//! Nada de esto corre con el lock por vehículo tomado: el caller despacha
//! después de soltar la sección crítica.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EnvironmentConfig;
use crate::models::alert::Alert;
use crate::services::map_service::MapService;

/// Canal de entrega externo. Un solo método: entregar o fallar.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: Option<Vec<u8>>,
    ) -> Result<()>;
}

/// Canal SMTP real (lettre sobre tokio)
pub struct SmtpChannel {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpChannel {
    pub fn from_config(config: &EnvironmentConfig) -> Result<Self> {
        let host = config
            .smtp_host
            .clone()
            .ok_or_else(|| anyhow!("SMTP_HOST must be set"))?;
        let username = config
            .smtp_username
            .clone()
            .ok_or_else(|| anyhow!("SMTP_USERNAME must be set"))?;
        let password = config
            .smtp_password
            .clone()
            .ok_or_else(|| anyhow!("SMTP_PASSWORD must be set"))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?
            .credentials(Credentials::new(username, password))
            .build();

        let from = config.mail_from.parse::<Mailbox>()?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl NotificationChannel for SmtpChannel {
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: Option<Vec<u8>>,
    ) -> Result<()> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        let body_part = SinglePart::plain(body.to_string());
        let message = match attachment {
            Some(bytes) => {
                let content_type = ContentType::parse("image/jpeg")?;
                let image = Attachment::new("map_image.jpg".to_string()).body(bytes, content_type);
                builder.multipart(MultiPart::mixed().singlepart(body_part).singlepart(image))?
            }
            None => builder.multipart(MultiPart::mixed().singlepart(body_part))?,
        };

        self.mailer.send(message).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationService {
    channel: Option<Arc<dyn NotificationChannel>>,
    map: MapService,
    recipients: Vec<String>,
    subject_prefix: String,
}

impl NotificationService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let channel: Option<Arc<dyn NotificationChannel>> = if config.smtp_configured() {
            match SmtpChannel::from_config(config) {
                Ok(channel) => Some(Arc::new(channel)),
                Err(e) => {
                    log::error!("❌ No se pudo inicializar el canal SMTP: {}", e);
                    None
                }
            }
        } else {
            log::warn!("📭 SMTP no configurado: las alertas solo se persisten, sin correo");
            None
        };

        Self {
            channel,
            map: MapService::new(config.tomtom_api_key.clone()),
            recipients: config.authority_emails.clone(),
            subject_prefix: config.email_subject_prefix.clone(),
        }
    }

    /// Cuerpo del correo para una alerta. Puro, sin I/O.
    pub fn build_alert_body(alert: &Alert) -> String {
        let map_link = alert
            .map_url
            .clone()
            .unwrap_or_else(|| "unavailable".to_string());
        format!(
            "Alert Type: {}\nMessage: {}\nAlert Severity: {}\nClick this link to check the vehicle on Google Maps: {}\nVEHICLE LOCATION:",
            alert.alert_type, alert.message, alert.severity, map_link
        )
    }

    /// Entregar la alerta al listado fijo de autoridades. El fetch del mapa
    /// es best-effort; un canal sin configurar es no-op.
    pub async fn send_alert_to_authorities(
        &self,
        alert: &Alert,
        vehicle_name: &str,
    ) -> Result<()> {
        let channel = match &self.channel {
            Some(channel) => channel,
            None => {
                log::warn!(
                    "📭 Alerta {} sin notificar: canal no configurado",
                    alert.id
                );
                return Ok(());
            }
        };

        let subject = format!(
            "{}Overload Alert for Vehicle {}",
            self.subject_prefix, vehicle_name
        );

        let image = match (alert.latitude, alert.longitude) {
            (Some(lat), Some(lon)) => self.map.fetch_static_image(lat, lon).await,
            _ => None,
        };

        let body = Self::build_alert_body(alert);
        channel.send(&self.recipients, &subject, &body, image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alert::{AlertType, Severity};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_alert_body_contains_type_severity_and_link() {
        let alert = Alert {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            alert_type: AlertType::Overload,
            message: "Suspected overload: 5200 kg (Max allowed: 5000 kg) for Truck A".to_string(),
            severity: Severity::High,
            current_weight: Some(5200.0),
            location: Some("Latitude: -6.79, Longitude: 39.2".to_string()),
            latitude: Some(-6.79),
            longitude: Some(39.2),
            map_url: Some("https://www.google.com/maps?q=-6.79,39.2".to_string()),
            notified: false,
            is_resolved: false,
            resolved_timestamp: None,
            timestamp: Utc::now(),
        };

        let body = NotificationService::build_alert_body(&alert);
        assert!(body.starts_with("Alert Type: overload\n"));
        assert!(body.contains("Alert Severity: high"));
        assert!(body.contains("https://www.google.com/maps?q=-6.79,39.2"));
        assert!(body.ends_with("VEHICLE LOCATION:"));
    }
}
