//! Web服务器

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};
use hms_core::{Appointment, Department, Doctor, Patient};
use hms_storage::{MemStorage, Stored};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::handlers::{
    api_root, create_record, delete_record, get_record, get_stats, health, list_records,
    update_appointment_status, update_record, AppState,
};

/// HTTP层选项
#[derive(Debug, Clone)]
pub struct WebOptions {
    pub enable_cors: bool,
    pub body_limit_bytes: usize,
}

impl Default for WebOptions {
    fn default() -> Self {
        Self {
            enable_cors: true,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, storage: Arc<MemStorage>, options: &WebOptions) -> Self {
        let app = create_app(storage, options);
        Self { addr, app }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start web server: {}", e))?;

        info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// 构建应用路由
pub fn create_app(storage: Arc<MemStorage>, options: &WebOptions) -> Router {
    let state = AppState::new(storage);

    let app = Router::new()
        // 根路径
        .route("/", get(api_root))
        // 健康检查
        .route("/health", get(health))
        // API路由
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(options.body_limit_bytes)),
        );

    if options.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// API 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/patients", record_routes::<Patient>())
        .nest("/doctors", record_routes::<Doctor>())
        .nest(
            "/appointments",
            record_routes::<Appointment>().route("/:id/status", patch(update_appointment_status)),
        )
        .nest("/departments", record_routes::<Department>())
        .route("/stats", get(get_stats))
}

/// 单类实体的CRUD路由
fn record_routes<R: Stored>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records::<R>).post(create_record::<R>))
        .route(
            "/:id",
            get(get_record::<R>)
                .put(update_record::<R>)
                .delete(delete_record::<R>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use hms_core::utils;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(Arc::new(MemStorage::new()), &WebOptions::default())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn patient_body() -> Value {
        json!({
            "name": "Sarah Johnson",
            "email": "sarah.j@email.com",
            "phone": "+1 234-567-8900",
            "dateOfBirth": "1985-03-15",
            "gender": "Female",
            "address": "123 Main St, City",
            "bloodType": "O+",
            "allergies": "Penicillin",
            "medicalHistory": "Hypertension"
        })
    }

    fn appointment_body(date: &str) -> Value {
        json!({
            "patientId": "p1",
            "doctorId": "d1",
            "patientName": "Sarah Johnson",
            "doctorName": "Michael Chen",
            "date": date,
            "time": "10:00 AM",
            "reason": "Routine Checkup",
            "status": "scheduled"
        })
    }

    #[tokio::test]
    async fn test_patient_crud_flow() {
        let app = app();

        let (status, created) = send(&app, Method::POST, "/api/patients", Some(patient_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["allergies"], "Penicillin");

        let (status, fetched) = send(&app, Method::GET, &format!("/api/patients/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/patients/{}", id),
            Some(json!({ "name": "New Name" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "New Name");
        assert_eq!(updated["allergies"], "Penicillin");
        assert_eq!(updated["id"], created["id"]);

        let (_, cleared) = send(
            &app,
            Method::PUT,
            &format!("/api/patients/{}", id),
            Some(json!({ "allergies": null })),
        )
        .await;
        assert!(cleared["allergies"].is_null());
        assert_eq!(cleared["medicalHistory"], "Hypertension");

        let (status, list) = send(&app, Method::GET, "/api/patients", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::DELETE, &format!("/api/patients/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, body) = send(&app, Method::DELETE, &format!("/api/patients/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Patient not found");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let app = app();

        let mut body = patient_body();
        body.as_object_mut().unwrap().remove("email");
        let (status, error) = send(&app, Method::POST, "/api/patients", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains("email"));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/doctors",
            Some(json!({ "name": "Michael Chen", "experience": "many" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = send(&app, Method::GET, "/api/patients", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/departments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let app = app();
        let missing = uuid::Uuid::new_v4();

        let (status, _) = send(&app, Method::GET, &format!("/api/doctors/{}", missing), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/doctors/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/departments/{}", missing),
            Some(json!({ "availableBeds": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/appointments/{}/status", missing),
            Some(json!({ "status": "completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let app = app();
        let missing = uuid::Uuid::new_v4();
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/departments/{}", missing),
            Some(json!({ "bedCount": -4 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_appointment_status_patch() {
        let app = app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/appointments",
            Some(appointment_body("2024-01-15")),
        )
        .await;
        let uri = format!("/api/appointments/{}/status", created["id"].as_str().unwrap());

        let (status, updated) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "completed" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "completed");
        assert_eq!(updated["reason"], "Routine Checkup");

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "reason": "other" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = app();

        let (status, stats) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            stats,
            json!({
                "totalPatients": 0,
                "totalDoctors": 0,
                "totalAppointments": 0,
                "todayAppointments": 0,
                "totalDepartments": 0
            })
        );

        send(&app, Method::POST, "/api/patients", Some(patient_body())).await;
        send(&app, Method::POST, "/api/appointments", Some(appointment_body(&utils::today()))).await;
        send(&app, Method::POST, "/api/appointments", Some(appointment_body("1999-01-01"))).await;

        let (_, stats) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(stats["totalPatients"], 1);
        assert_eq!(stats["totalAppointments"], 2);
        assert_eq!(stats["todayAppointments"], 1);
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoints"]["stats"], "/api/stats");
    }
}
