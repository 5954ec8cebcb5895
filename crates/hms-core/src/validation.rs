//! 请求数据验证模块
//!
//! 将客户端提交的JSON对象转换为强类型的新建/更新结构。创建时所有必填字段必须存在，
//! 更新时所有字段均可省略；只检查载荷本身的形状，不与已有记录比对。

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{HmsError, Result};
use crate::models::*;

/// 从JSON载荷构造并验证
pub trait FromPayload: Sized {
    fn from_payload(payload: &Value) -> Result<Self>;
}

/// 验证结果
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
        self.is_valid = false;
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 转换为统一错误；无错误时返回 `None`
    pub fn into_error(self, kind: &str) -> Option<HmsError> {
        if self.is_valid {
            return None;
        }
        Some(HmsError::Validation(format!(
            "Invalid {} data: {}",
            kind,
            self.errors.join("; ")
        )))
    }
}

/// 逐字段读取JSON对象，收集全部字段错误
struct PayloadReader<'a> {
    fields: &'a Map<String, Value>,
    result: ValidationResult,
}

impl<'a> PayloadReader<'a> {
    fn new(payload: &'a Value, kind: &str) -> Result<Self> {
        match payload.as_object() {
            Some(fields) => Ok(Self {
                fields,
                result: ValidationResult::new(),
            }),
            None => Err(HmsError::Validation(format!(
                "Invalid {} data: request body must be a JSON object",
                kind
            ))),
        }
    }

    fn missing(&mut self, name: &str, required: bool) {
        if required {
            self.result
                .add_error(format!("missing required field '{}'", name));
        }
    }

    fn string(&mut self, name: &str, required: bool) -> Option<String> {
        match self.fields.get(name) {
            None => {
                self.missing(name, required);
                None
            }
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                self.result
                    .add_error(format!("field '{}' must be a string", name));
                None
            }
        }
    }

    /// 三态读取：缺失 → `None`，null → `Some(None)`，字符串 → `Some(Some(_))`
    fn nullable_string(&mut self, name: &str) -> Option<Option<String>> {
        match self.fields.get(name) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(value)) => Some(Some(value.clone())),
            Some(_) => {
                self.result
                    .add_error(format!("field '{}' must be a string or null", name));
                None
            }
        }
    }

    /// 非负整数字段
    fn count(&mut self, name: &str, required: bool) -> Option<i32> {
        let value = match self.fields.get(name) {
            None => {
                self.missing(name, required);
                return None;
            }
            Some(value) => value,
        };

        match value.as_i64() {
            Some(n) if n < 0 => {
                self.result
                    .add_error(format!("field '{}' must not be negative", name));
                None
            }
            Some(n) => match i32::try_from(n) {
                Ok(n) => Some(n),
                Err(_) => {
                    self.result
                        .add_error(format!("field '{}' is out of range", name));
                    None
                }
            },
            None => {
                self.result
                    .add_error(format!("field '{}' must be an integer", name));
                None
            }
        }
    }

    fn finish(self, kind: &str) -> Result<()> {
        match self.result.into_error(kind) {
            Some(err) => {
                debug!("Rejected {} payload: {}", kind, err);
                Err(err)
            }
            None => Ok(()),
        }
    }
}

impl FromPayload for InsertPatient {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "patient")?;
        let name = reader.string("name", true);
        let email = reader.string("email", true);
        let phone = reader.string("phone", true);
        let date_of_birth = reader.string("dateOfBirth", true);
        let gender = reader.string("gender", true);
        let address = reader.string("address", true);
        let blood_type = reader.string("bloodType", true);
        let allergies = reader.nullable_string("allergies");
        let medical_history = reader.nullable_string("medicalHistory");
        reader.finish("patient")?;

        Ok(InsertPatient {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            date_of_birth: date_of_birth.unwrap_or_default(),
            gender: gender.unwrap_or_default(),
            address: address.unwrap_or_default(),
            blood_type: blood_type.unwrap_or_default(),
            allergies: allergies.flatten(),
            medical_history: medical_history.flatten(),
        })
    }
}

impl FromPayload for PatientPatch {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "patient")?;
        let patch = PatientPatch {
            name: reader.string("name", false),
            email: reader.string("email", false),
            phone: reader.string("phone", false),
            date_of_birth: reader.string("dateOfBirth", false),
            gender: reader.string("gender", false),
            address: reader.string("address", false),
            blood_type: reader.string("bloodType", false),
            allergies: reader.nullable_string("allergies"),
            medical_history: reader.nullable_string("medicalHistory"),
        };
        reader.finish("patient")?;
        Ok(patch)
    }
}

impl FromPayload for InsertDoctor {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "doctor")?;
        let name = reader.string("name", true);
        let email = reader.string("email", true);
        let phone = reader.string("phone", true);
        let specialization = reader.string("specialization", true);
        let department = reader.string("department", true);
        let experience = reader.count("experience", true);
        let availability = reader.string("availability", true);
        reader.finish("doctor")?;

        Ok(InsertDoctor {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            specialization: specialization.unwrap_or_default(),
            department: department.unwrap_or_default(),
            experience: experience.unwrap_or_default(),
            availability: availability.unwrap_or_default(),
        })
    }
}

impl FromPayload for DoctorPatch {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "doctor")?;
        let patch = DoctorPatch {
            name: reader.string("name", false),
            email: reader.string("email", false),
            phone: reader.string("phone", false),
            specialization: reader.string("specialization", false),
            department: reader.string("department", false),
            experience: reader.count("experience", false),
            availability: reader.string("availability", false),
        };
        reader.finish("doctor")?;
        Ok(patch)
    }
}

impl FromPayload for InsertAppointment {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "appointment")?;
        let patient_id = reader.string("patientId", true);
        let doctor_id = reader.string("doctorId", true);
        let patient_name = reader.string("patientName", true);
        let doctor_name = reader.string("doctorName", true);
        let date = reader.string("date", true);
        let time = reader.string("time", true);
        let reason = reader.string("reason", true);
        let status = reader.string("status", true);
        reader.finish("appointment")?;

        Ok(InsertAppointment {
            patient_id: patient_id.unwrap_or_default(),
            doctor_id: doctor_id.unwrap_or_default(),
            patient_name: patient_name.unwrap_or_default(),
            doctor_name: doctor_name.unwrap_or_default(),
            date: date.unwrap_or_default(),
            time: time.unwrap_or_default(),
            reason: reason.unwrap_or_default(),
            status: status.unwrap_or_default(),
        })
    }
}

impl FromPayload for AppointmentPatch {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "appointment")?;
        let patch = AppointmentPatch {
            patient_id: reader.string("patientId", false),
            doctor_id: reader.string("doctorId", false),
            patient_name: reader.string("patientName", false),
            doctor_name: reader.string("doctorName", false),
            date: reader.string("date", false),
            time: reader.string("time", false),
            reason: reader.string("reason", false),
            status: reader.string("status", false),
        };
        reader.finish("appointment")?;
        Ok(patch)
    }
}

impl FromPayload for InsertDepartment {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "department")?;
        let name = reader.string("name", true);
        let description = reader.string("description", true);
        let head_doctor = reader.string("headDoctor", true);
        let staff_count = reader.count("staffCount", true);
        let bed_count = reader.count("bedCount", true);
        let available_beds = reader.count("availableBeds", true);
        reader.finish("department")?;

        Ok(InsertDepartment {
            name: name.unwrap_or_default(),
            description: description.unwrap_or_default(),
            head_doctor: head_doctor.unwrap_or_default(),
            staff_count: staff_count.unwrap_or_default(),
            bed_count: bed_count.unwrap_or_default(),
            available_beds: available_beds.unwrap_or_default(),
        })
    }
}

impl FromPayload for DepartmentPatch {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "department")?;
        let patch = DepartmentPatch {
            name: reader.string("name", false),
            description: reader.string("description", false),
            head_doctor: reader.string("headDoctor", false),
            staff_count: reader.count("staffCount", false),
            bed_count: reader.count("bedCount", false),
            available_beds: reader.count("availableBeds", false),
        };
        reader.finish("department")?;
        Ok(patch)
    }
}

/// 预约状态更新请求，仅包含 `status`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: String,
}

impl FromPayload for StatusUpdate {
    fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "status")?;
        let status = reader.string("status", true);
        reader.finish("status")?;
        Ok(StatusUpdate {
            status: status.unwrap_or_default(),
        })
    }
}

impl From<StatusUpdate> for AppointmentPatch {
    fn from(update: StatusUpdate) -> Self {
        AppointmentPatch {
            status: Some(update.status),
            ..Default::default()
        }
    }
}
