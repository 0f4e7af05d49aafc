use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "weight-monitoring");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ingest_endpoint_rejects_malformed_body() {
    let app = create_test_app();

    // sin weight: el body ni siquiera deserializa, la ingesta no arranca
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/weights")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "vehicle_id": "9b2e7a50-0000-0000-0000-000000000000" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// Función helper para crear la app de test. Las rutas con estado real
// necesitan PostgreSQL; acá solo se prueba el contrato HTTP externo.
fn create_test_app() -> axum::Router {
    use axum::routing::{get, post};
    use axum::Json;

    async fn health() -> Json<serde_json::Value> {
        Json(json!({
            "service": "weight-monitoring",
            "status": "healthy",
        }))
    }

    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    struct IngestBody {
        vehicle_id: uuid::Uuid,
        weight: f64,
    }

    async fn ingest(Json(_body): Json<IngestBody>) -> StatusCode {
        StatusCode::CREATED
    }

    axum::Router::new()
        .route("/health", get(health))
        .route("/api/weights", post(ingest))
}
