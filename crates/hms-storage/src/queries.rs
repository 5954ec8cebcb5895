//! 查询与统计
//!
//! 基于存储全量扫描的只读派生视图，不保存任何状态。

use hms_core::{utils, Appointment, AppointmentStatus, Department, Doctor, Patient};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::MemStorage;

/// 仪表盘统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: usize,
    pub total_doctors: usize,
    pub total_appointments: usize,
    pub today_appointments: usize,
    pub total_departments: usize,
}

/// 按当前本地日期计算统计
pub async fn stats(storage: &MemStorage) -> DashboardStats {
    stats_on(storage, &utils::today()).await
}

/// 以指定日期 (`YYYY-MM-DD`) 作为"今天"计算统计
pub async fn stats_on(storage: &MemStorage, today: &str) -> DashboardStats {
    let appointments = storage.appointments().list().await;

    let stats = DashboardStats {
        total_patients: storage.patients().len().await,
        total_doctors: storage.doctors().len().await,
        total_appointments: appointments.len(),
        today_appointments: appointments.iter().filter(|a| a.date == today).count(),
        total_departments: storage.departments().len().await,
    };

    debug!(?stats, today, "Computed dashboard stats");
    stats
}

/// 当天的预约
pub fn todays_appointments(appointments: &[Appointment], today: &str) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.date == today)
        .cloned()
        .collect()
}

/// 可按文本字段检索的实体
pub trait Searchable {
    /// 界面默认检索的字段
    const SEARCH_FIELDS: &'static [&'static str];

    /// 按JSON字段名取文本值，未知字段返回 `None`
    fn text_field(&self, field: &str) -> Option<&str>;
}

impl Searchable for Patient {
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(self.name.as_str()),
            "email" => Some(self.email.as_str()),
            "phone" => Some(self.phone.as_str()),
            "gender" => Some(self.gender.as_str()),
            "address" => Some(self.address.as_str()),
            "bloodType" => Some(self.blood_type.as_str()),
            "allergies" => self.allergies.as_deref(),
            "medicalHistory" => self.medical_history.as_deref(),
            _ => None,
        }
    }
}

impl Searchable for Doctor {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "specialization"];

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(self.name.as_str()),
            "email" => Some(self.email.as_str()),
            "specialization" => Some(self.specialization.as_str()),
            "department" => Some(self.department.as_str()),
            "availability" => Some(self.availability.as_str()),
            _ => None,
        }
    }
}

impl Searchable for Appointment {
    const SEARCH_FIELDS: &'static [&'static str] = &["patientName", "doctorName"];

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "patientName" => Some(self.patient_name.as_str()),
            "doctorName" => Some(self.doctor_name.as_str()),
            "reason" => Some(self.reason.as_str()),
            "date" => Some(self.date.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Searchable for Department {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "headDoctor"];

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(self.name.as_str()),
            "description" => Some(self.description.as_str()),
            "headDoctor" => Some(self.head_doctor.as_str()),
            _ => None,
        }
    }
}

/// 不区分大小写的子串过滤，任一指定字段命中即保留，保持原有顺序。空查询匹配全部。
pub fn filter_by_substring<R>(records: &[R], query: &str, fields: &[&str]) -> Vec<R>
where
    R: Searchable + Clone,
{
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            fields.iter().any(|field| {
                record
                    .text_field(field)
                    .map(|value| value.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        })
        .cloned()
        .collect()
}

/// 使用实体默认检索字段过滤
pub fn search<R>(records: &[R], query: &str) -> Vec<R>
where
    R: Searchable + Clone,
{
    filter_by_substring(records, query, R::SEARCH_FIELDS)
}

/// 按状态分组的预约
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusGroups {
    pub scheduled: Vec<Appointment>,
    pub completed: Vec<Appointment>,
    pub cancelled: Vec<Appointment>,
}

impl StatusGroups {
    pub fn get(&self, status: AppointmentStatus) -> &[Appointment] {
        match status {
            AppointmentStatus::Scheduled => self.scheduled.as_slice(),
            AppointmentStatus::Completed => self.completed.as_slice(),
            AppointmentStatus::Cancelled => self.cancelled.as_slice(),
        }
    }

    pub fn total(&self) -> usize {
        self.scheduled.len() + self.completed.len() + self.cancelled.len()
    }
}

/// 按已知状态分组；状态值不在三种已知状态内的预约不进入任何分组
pub fn group_by_status(appointments: &[Appointment]) -> StatusGroups {
    let mut groups = StatusGroups::default();
    for appointment in appointments {
        match appointment.known_status() {
            Some(AppointmentStatus::Scheduled) => groups.scheduled.push(appointment.clone()),
            Some(AppointmentStatus::Completed) => groups.completed.push(appointment.clone()),
            Some(AppointmentStatus::Cancelled) => groups.cancelled.push(appointment.clone()),
            None => {}
        }
    }
    groups
}

/// 病历视图：已完成的预约，按患者姓名或就诊原因过滤
pub fn medical_records(appointments: &[Appointment], query: &str) -> Vec<Appointment> {
    let completed = group_by_status(appointments).completed;
    filter_by_substring(&completed, query, &["patientName", "reason"])
}
