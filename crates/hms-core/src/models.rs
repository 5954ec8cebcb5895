//! 核心数据模型定义
//!
//! 四类实体（患者、医生、预约、科室）各自独立存储，彼此之间的ID引用仅作记录，
//! 不做外键校验。

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::FromPayload;

/// 可存储的实体类型
///
/// `Insert` 为创建时的完整字段集合，`Patch` 为部分更新，仅覆盖出现的字段。
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Insert: FromPayload + Send;
    type Patch: FromPayload + Default + Send;

    /// 实体名称，用于日志和错误信息
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    fn from_insert(id: Uuid, insert: Self::Insert) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// 患者信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub blood_type: String,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
}

/// 新建患者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertPatient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub blood_type: String,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
}

/// 患者部分更新
///
/// `allergies` / `medical_history` 为三态：`None` 保持不变，`Some(None)` 清空，
/// `Some(Some(_))` 覆盖。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<Option<String>>,
    pub medical_history: Option<Option<String>>,
}

impl Record for Patient {
    type Insert = InsertPatient;
    type Patch = PatientPatch;

    const KIND: &'static str = "Patient";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_insert(id: Uuid, insert: InsertPatient) -> Self {
        Patient {
            id,
            name: insert.name,
            email: insert.email,
            phone: insert.phone,
            date_of_birth: insert.date_of_birth,
            gender: insert.gender,
            address: insert.address,
            blood_type: insert.blood_type,
            allergies: insert.allergies,
            medical_history: insert.medical_history,
        }
    }

    fn apply_patch(&mut self, patch: PatientPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email);
        merge(&mut self.phone, patch.phone);
        merge(&mut self.date_of_birth, patch.date_of_birth);
        merge(&mut self.gender, patch.gender);
        merge(&mut self.address, patch.address);
        merge(&mut self.blood_type, patch.blood_type);
        merge(&mut self.allergies, patch.allergies);
        merge(&mut self.medical_history, patch.medical_history);
    }
}

/// 医生信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub department: String, // 科室名称，非外键
    pub experience: i32,    // 从业年限
    pub availability: String,
}

/// 新建医生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDoctor {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub department: String,
    pub experience: i32,
    pub availability: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub experience: Option<i32>,
    pub availability: Option<String>,
}

impl Record for Doctor {
    type Insert = InsertDoctor;
    type Patch = DoctorPatch;

    const KIND: &'static str = "Doctor";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_insert(id: Uuid, insert: InsertDoctor) -> Self {
        Doctor {
            id,
            name: insert.name,
            email: insert.email,
            phone: insert.phone,
            specialization: insert.specialization,
            department: insert.department,
            experience: insert.experience,
            availability: insert.availability,
        }
    }

    fn apply_patch(&mut self, patch: DoctorPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email);
        merge(&mut self.phone, patch.phone);
        merge(&mut self.specialization, patch.specialization);
        merge(&mut self.department, patch.department);
        merge(&mut self.experience, patch.experience);
        merge(&mut self.availability, patch.availability);
    }
}

/// 预约状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled, // 已预约
    Completed, // 已完成
    Cancelled, // 已取消
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    /// 解析存储中的状态字符串，未知值返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 预约信息
///
/// `patient_name` / `doctor_name` 是创建时的冗余副本，患者或医生改名后不会同步。
/// `status` 在存储层不做枚举约束。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String, // YYYY-MM-DD
    pub time: String,
    pub reason: String,
    pub status: String,
}

impl Appointment {
    pub fn known_status(&self) -> Option<AppointmentStatus> {
        AppointmentStatus::parse(&self.status)
    }
}

/// 新建预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAppointment {
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
}

impl Record for Appointment {
    type Insert = InsertAppointment;
    type Patch = AppointmentPatch;

    const KIND: &'static str = "Appointment";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_insert(id: Uuid, insert: InsertAppointment) -> Self {
        Appointment {
            id,
            patient_id: insert.patient_id,
            doctor_id: insert.doctor_id,
            patient_name: insert.patient_name,
            doctor_name: insert.doctor_name,
            date: insert.date,
            time: insert.time,
            reason: insert.reason,
            status: insert.status,
        }
    }

    fn apply_patch(&mut self, patch: AppointmentPatch) {
        merge(&mut self.patient_id, patch.patient_id);
        merge(&mut self.doctor_id, patch.doctor_id);
        merge(&mut self.patient_name, patch.patient_name);
        merge(&mut self.doctor_name, patch.doctor_name);
        merge(&mut self.date, patch.date);
        merge(&mut self.time, patch.time);
        merge(&mut self.reason, patch.reason);
        merge(&mut self.status, patch.status);
    }
}

/// 科室信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub head_doctor: String,
    pub staff_count: i32,
    pub bed_count: i32,
    pub available_beds: i32,
}

impl Department {
    /// 床位占用率（百分比），床位数为0时返回 `None`
    pub fn occupancy_rate(&self) -> Option<f64> {
        if self.bed_count == 0 {
            return None;
        }
        let occupied = (self.bed_count - self.available_beds) as f64;
        Some(occupied / self.bed_count as f64 * 100.0)
    }
}

/// 新建科室
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDepartment {
    pub name: String,
    pub description: String,
    pub head_doctor: String,
    pub staff_count: i32,
    pub bed_count: i32,
    pub available_beds: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub head_doctor: Option<String>,
    pub staff_count: Option<i32>,
    pub bed_count: Option<i32>,
    pub available_beds: Option<i32>,
}

impl Record for Department {
    type Insert = InsertDepartment;
    type Patch = DepartmentPatch;

    const KIND: &'static str = "Department";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_insert(id: Uuid, insert: InsertDepartment) -> Self {
        Department {
            id,
            name: insert.name,
            description: insert.description,
            head_doctor: insert.head_doctor,
            staff_count: insert.staff_count,
            bed_count: insert.bed_count,
            available_beds: insert.available_beds,
        }
    }

    fn apply_patch(&mut self, patch: DepartmentPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.description, patch.description);
        merge(&mut self.head_doctor, patch.head_doctor);
        merge(&mut self.staff_count, patch.staff_count);
        merge(&mut self.bed_count, patch.bed_count);
        merge(&mut self.available_beds, patch.available_beds);
    }
}
