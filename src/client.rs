//! REST API客户端

use anyhow::{Context, Result};
use hms_core::{Appointment, AppointmentStatus, Department, Doctor, Patient, Record};
use hms_storage::DashboardStats;
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

/// 通过REST API访问的实体
pub trait Resource: Record {
    /// 集合路径，例如 `/api/patients`
    const PATH: &'static str;
}

impl Resource for Patient {
    const PATH: &'static str = "/api/patients";
}

impl Resource for Doctor {
    const PATH: &'static str = "/api/doctors";
}

impl Resource for Appointment {
    const PATH: &'static str = "/api/appointments";
}

impl Resource for Department {
    const PATH: &'static str = "/api/departments";
}

/// HMS HTTP客户端
#[derive(Debug, Clone)]
pub struct HmsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HmsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 非成功状态码转换为错误，错误信息取自响应体的 `error` 字段
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body["error"].as_str().unwrap_or("request failed");
        Err(anyhow::anyhow!("HTTP {}: {}", status.as_u16(), message))
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>> {
        let response = self.http.get(self.url(R::PATH)).send().await?;
        Self::check(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to decode {} list", R::KIND))
    }

    /// 按ID查询，404返回 `None`
    pub async fn get<R: Resource>(&self, id: Uuid) -> Result<Option<R>> {
        let response = self
            .http
            .get(self.url(&format!("{}/{}", R::PATH, id)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record = Self::check(response).await?.json().await?;
        Ok(Some(record))
    }

    pub async fn create<R: Resource>(&self, insert: &impl Serialize) -> Result<R> {
        let response = self.http.post(self.url(R::PATH)).json(insert).send().await?;
        let record: R = Self::check(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to decode created {}", R::KIND))?;
        debug!(kind = R::KIND, id = %record.id(), "Created remote record");
        Ok(record)
    }

    /// 部分更新；`patch` 只包含需要修改的字段
    pub async fn update<R: Resource>(&self, id: Uuid, patch: &Value) -> Result<R> {
        let response = self
            .http
            .put(self.url(&format!("{}/{}", R::PATH, id)))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// 删除记录，记录不存在时返回 `false`
    pub async fn delete<R: Resource>(&self, id: Uuid) -> Result<bool> {
        let response = self
            .http
            .delete(self.url(&format!("{}/{}", R::PATH, id)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(response).await?;
        Ok(true)
    }

    pub async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment> {
        let response = self
            .http
            .patch(self.url(&format!("{}/{}/status", Appointment::PATH, id)))
            .json(&json!({ "status": status.as_str() }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let response = self.http.get(self.url("/api/stats")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
