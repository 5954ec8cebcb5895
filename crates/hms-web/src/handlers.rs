//! HTTP处理器
//!
//! 四类实体共用一组泛型CRUD处理器，按实体类型实例化后挂载到各自路径。

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use hms_core::{
    utils, Appointment, AppointmentPatch, FromPayload, HmsError, Record, StatusUpdate,
};
use hms_storage::{queries, DashboardStats, MemStorage, Stored};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<MemStorage>,
}

impl AppState {
    pub fn new(storage: Arc<MemStorage>) -> Self {
        Self { storage }
    }
}

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "HMS Web API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "patients": "/api/patients",
            "doctors": "/api/doctors",
            "appointments": "/api/appointments",
            "departments": "/api/departments",
            "stats": "/api/stats"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 非UUID格式的ID不可能对应任何记录，按"未找到"处理
fn parse_id<R: Record>(raw: &str) -> Result<Uuid, HmsError> {
    utils::parse_record_id(raw).ok_or_else(|| HmsError::not_found(R::KIND))
}

fn read_payload<R: Record>(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, HmsError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        HmsError::Validation(format!(
            "Invalid {} data: {}",
            R::KIND.to_lowercase(),
            rejection.body_text()
        ))
    })
}

/// 列出全部记录
pub async fn list_records<R: Stored>(State(state): State<AppState>) -> Json<Vec<R>> {
    let records = state.storage.collection::<R>().list().await;
    debug!(kind = R::KIND, count = records.len(), "Listed records");
    Json(records)
}

/// 按ID查询
pub async fn get_record<R: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError> {
    let id = parse_id::<R>(&id)?;
    let record = state
        .storage
        .collection::<R>()
        .get(id)
        .await
        .ok_or_else(|| HmsError::not_found(R::KIND))?;
    Ok(Json(record))
}

/// 创建记录
pub async fn create_record<R: Stored>(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let payload = read_payload::<R>(payload)?;
    let insert = R::Insert::from_payload(&payload)?;
    let record = state.storage.collection::<R>().create(insert).await;
    Ok((StatusCode::CREATED, Json(record)))
}

/// 部分更新记录
pub async fn update_record<R: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let payload = read_payload::<R>(payload)?;
    let patch = R::Patch::from_payload(&payload)?;
    let id = parse_id::<R>(&id)?;
    let record = state
        .storage
        .collection::<R>()
        .update(id, patch)
        .await
        .ok_or_else(|| HmsError::not_found(R::KIND))?;
    Ok(Json(record))
}

/// 删除记录
pub async fn delete_record<R: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id::<R>(&id)?;
    if !state.storage.collection::<R>().delete(id).await {
        return Err(HmsError::not_found(R::KIND).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// 更新预约状态，请求体仅含 `status`
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let payload = read_payload::<Appointment>(payload)?;
    let update = StatusUpdate::from_payload(&payload)?;
    let id = parse_id::<Appointment>(&id)?;

    info!(%id, status = %update.status, "Updating appointment status");
    let appointment = state
        .storage
        .appointments()
        .update(id, AppointmentPatch::from(update))
        .await
        .ok_or_else(|| HmsError::not_found(Appointment::KIND))?;
    Ok(Json(appointment))
}

/// 仪表盘统计
pub async fn get_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(queries::stats(&state.storage).await)
}
