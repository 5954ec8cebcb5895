//! 内存记录存储

use hms_core::{Appointment, Department, Doctor, Patient, Record};

use crate::collection::Collection;

/// 四类实体的内存存储
///
/// 每个进程（或每个测试）显式构造一个实例，状态随进程结束而丢失。
#[derive(Debug, Default)]
pub struct MemStorage {
    patients: Collection<Patient>,
    doctors: Collection<Doctor>,
    appointments: Collection<Appointment>,
    departments: Collection<Department>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patients(&self) -> &Collection<Patient> {
        &self.patients
    }

    pub fn doctors(&self) -> &Collection<Doctor> {
        &self.doctors
    }

    pub fn appointments(&self) -> &Collection<Appointment> {
        &self.appointments
    }

    pub fn departments(&self) -> &Collection<Department> {
        &self.departments
    }

    /// 按实体类型取得对应集合
    pub fn collection<R: Stored>(&self) -> &Collection<R> {
        R::collection(self)
    }
}

/// 保存在 [`MemStorage`] 中的实体类型
pub trait Stored: Record {
    fn collection(storage: &MemStorage) -> &Collection<Self>;
}

impl Stored for Patient {
    fn collection(storage: &MemStorage) -> &Collection<Self> {
        storage.patients()
    }
}

impl Stored for Doctor {
    fn collection(storage: &MemStorage) -> &Collection<Self> {
        storage.doctors()
    }
}

impl Stored for Appointment {
    fn collection(storage: &MemStorage) -> &Collection<Self> {
        storage.appointments()
    }
}

impl Stored for Department {
    fn collection(storage: &MemStorage) -> &Collection<Self> {
        storage.departments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hms_core::{
        AppointmentPatch, DepartmentPatch, DoctorPatch, InsertAppointment, InsertDepartment,
        InsertDoctor, InsertPatient, PatientPatch,
    };
    use uuid::Uuid;

    fn insert_patient(name: &str) -> InsertPatient {
        InsertPatient {
            name: name.to_string(),
            email: "sarah.j@email.com".to_string(),
            phone: "+1 234-567-8900".to_string(),
            date_of_birth: "1985-03-15".to_string(),
            gender: "Female".to_string(),
            address: "123 Main St, City".to_string(),
            blood_type: "O+".to_string(),
            allergies: Some("Penicillin".to_string()),
            medical_history: None,
        }
    }

    fn insert_doctor() -> InsertDoctor {
        InsertDoctor {
            name: "Michael Chen".to_string(),
            email: "m.chen@hospital.com".to_string(),
            phone: "+1 234-567-8901".to_string(),
            specialization: "Cardiology".to_string(),
            department: "Cardiology".to_string(),
            experience: 15,
            availability: "Mon-Fri, 9AM-5PM".to_string(),
        }
    }

    fn insert_appointment() -> InsertAppointment {
        InsertAppointment {
            patient_id: "p1".to_string(),
            doctor_id: "d1".to_string(),
            patient_name: "Sarah Johnson".to_string(),
            doctor_name: "Michael Chen".to_string(),
            date: "2024-01-15".to_string(),
            time: "10:00 AM".to_string(),
            reason: "Routine Checkup".to_string(),
            status: "scheduled".to_string(),
        }
    }

    fn insert_department() -> InsertDepartment {
        InsertDepartment {
            name: "Cardiology".to_string(),
            description: "Specialized in heart and cardiovascular diseases".to_string(),
            head_doctor: "Michael Chen".to_string(),
            staff_count: 25,
            bed_count: 40,
            available_beds: 12,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_record() {
        let storage = MemStorage::new();

        let patient = storage.patients().create(insert_patient("Sarah Johnson")).await;
        assert_eq!(storage.patients().get(patient.id).await, Some(patient));

        let doctor = storage.doctors().create(insert_doctor()).await;
        assert_eq!(storage.doctors().get(doctor.id).await, Some(doctor));

        let appointment = storage.appointments().create(insert_appointment()).await;
        assert_eq!(storage.appointments().get(appointment.id).await, Some(appointment));

        let department = storage.departments().create(insert_department()).await;
        assert_eq!(storage.departments().get(department.id).await, Some(department));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_absent() {
        let storage = MemStorage::new();
        assert!(storage.doctors().get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_succeeds_exactly_once() {
        let storage = MemStorage::new();
        let doctor = storage.doctors().create(insert_doctor()).await;

        assert!(storage.doctors().delete(doctor.id).await);
        assert!(!storage.doctors().delete(doctor.id).await);
        assert!(storage.doctors().get(doctor.id).await.is_none());
        assert!(storage.doctors().is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_does_not_cascade() {
        let storage = MemStorage::new();
        let doctor = storage.doctors().create(insert_doctor()).await;
        let mut appointment = insert_appointment();
        appointment.doctor_id = doctor.id.to_string();
        storage.appointments().create(appointment).await;

        assert!(storage.doctors().delete(doctor.id).await);
        assert_eq!(storage.appointments().len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_patch_returns_record_unchanged() {
        let storage = MemStorage::new();

        let department = storage.departments().create(insert_department()).await;
        let updated = storage
            .departments()
            .update(department.id, DepartmentPatch::default())
            .await;
        assert_eq!(updated, Some(department));

        let appointment = storage.appointments().create(insert_appointment()).await;
        let updated = storage
            .appointments()
            .update(appointment.id, AppointmentPatch::default())
            .await;
        assert_eq!(updated, Some(appointment));
    }

    #[tokio::test]
    async fn test_update_nullable_field_tri_state() {
        let storage = MemStorage::new();
        let patient = storage.patients().create(insert_patient("Sarah Johnson")).await;

        let renamed = storage
            .patients()
            .update(
                patient.id,
                PatientPatch {
                    name: Some("New Name".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "New Name");
        assert_eq!(renamed.allergies.as_deref(), Some("Penicillin"));
        assert_eq!(renamed.id, patient.id);

        let cleared = storage
            .patients()
            .update(
                patient.id,
                PatientPatch {
                    allergies: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.allergies, None);
        assert_eq!(cleared.name, "New Name");
        assert_eq!(storage.patients().get(patient.id).await, Some(cleared));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_absent() {
        let storage = MemStorage::new();
        let result = storage
            .doctors()
            .update(
                Uuid::new_v4(),
                DoctorPatch {
                    experience: Some(3),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_none());
        assert!(storage.doctors().is_empty().await);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_is_repeatable() {
        let storage = MemStorage::new();
        let names = ["Alice", "Bob", "Carol", "Dave"];
        for name in names {
            storage.patients().create(insert_patient(name)).await;
        }
        let bob = storage.patients().list().await[1].clone();
        storage.patients().delete(bob.id).await;

        let first = storage.patients().list().await;
        let second = storage.patients().list().await;
        assert_eq!(first, second);
        let listed: Vec<&str> = first.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(listed, vec!["Alice", "Carol", "Dave"]);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let storage = MemStorage::new();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..50 {
            let department = storage.departments().create(insert_department()).await;
            assert!(ids.insert(department.id));
        }
        assert_eq!(storage.departments().len().await, 50);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let storage = std::sync::Arc::new(MemStorage::new());
        let patient = storage.patients().create(insert_patient("Sarah Johnson")).await;
        let id = patient.id;

        let mut handles = Vec::new();
        for i in 0..16 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .patients()
                    .update(
                        id,
                        PatientPatch {
                            address: Some(format!("{} Main St", i)),
                            ..Default::default()
                        },
                    )
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }

        let stored = storage.patients().get(patient.id).await.unwrap();
        assert!(stored.address.ends_with("Main St"));
        assert_eq!(stored.allergies.as_deref(), Some("Penicillin"));
        assert_eq!(storage.patients().len().await, 1);
    }

    #[tokio::test]
    async fn test_generic_collection_lookup() {
        let storage = MemStorage::new();
        let doctor = storage.collection::<Doctor>().create(insert_doctor()).await;
        assert_eq!(storage.doctors().get(doctor.id).await, Some(doctor));
    }
}
