//! Servicio de mapas
//!
//! Links de Google Maps para los mensajes de alerta y fetch best-effort
//! del mapa estático de TomTom para adjuntar al correo. El fetch nunca
//! bloquea la entrega del mensaje: sin imagen, el correo sale igual.

use std::time::Duration;

/// Link al mapa para un par de coordenadas. Puro, sin I/O.
pub fn build_map_link(latitude: f64, longitude: f64) -> String {
    format!("https://www.google.com/maps?q={},{}", latitude, longitude)
}

/// URL del mapa estático de TomTom centrado en la posición reportada
pub fn static_image_url(api_key: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "https://api.tomtom.com/map/1/staticimage?key={}&zoom=9&center={},{}&format=jpg&layer=basic&style=main&width=1305&height=748&view=Unified&language=en-GB",
        api_key, latitude, longitude
    )
}

#[derive(Clone)]
pub struct MapService {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl MapService {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_key }
    }

    /// Descargar la imagen del mapa. Best-effort: cualquier fallo del
    /// proveedor o respuesta no exitosa devuelve `None`.
    pub async fn fetch_static_image(&self, latitude: f64, longitude: f64) -> Option<Vec<u8>> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                log::warn!("⚠️ TOMTOM_API_KEY no configurada, correo sin mapa adjunto");
                return None;
            }
        };

        let url = static_image_url(api_key, latitude, longitude);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("⚠️ Fetch del mapa estático falló: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            log::warn!("⚠️ Mapa estático respondió {}", response.status());
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                log::warn!("⚠️ No se pudo leer el body del mapa estático: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_map_link_format() {
        let link = build_map_link(-6.7924, 39.2083);
        assert_eq!(link, "https://www.google.com/maps?q=-6.7924,39.2083");
    }

    #[test]
    fn test_static_image_url_contains_key_and_center() {
        let url = static_image_url("test-key", -6.7924, 39.2083);
        assert!(url.starts_with("https://api.tomtom.com/map/1/staticimage?key=test-key"));
        assert!(url.contains("center=-6.7924,39.2083"));
        assert!(url.contains("format=jpg"));
    }
}
