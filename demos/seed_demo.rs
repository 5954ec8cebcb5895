//! HMS演示程序
//!
//! 向运行中的服务器写入示例数据，并展示仪表盘使用的各类视图：
//! - 统计信息与今日预约
//! - 按状态分组的预约
//! - 患者/医生检索与病历视图
//!
//! 先启动 `hms-server`，再运行 `cargo run --example seed_demo [base_url]`。

use anyhow::Result;
use hms::model::{
    utils, Appointment, AppointmentStatus, Department, Doctor, InsertAppointment,
    InsertDepartment, InsertDoctor, InsertPatient, Patient,
};
use hms::store::queries;
use hms::HmsClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt().with_env_filter("info").init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
    let client = HmsClient::new(&base_url);

    info!("🚀 向 {} 写入示例数据", base_url);
    seed(&client).await?;

    show_dashboard(&client).await?;
    show_search(&client).await?;

    info!("✅ 演示完成");
    Ok(())
}

fn patient(name: &str, email: &str, allergies: Option<&str>) -> InsertPatient {
    InsertPatient {
        name: name.to_string(),
        email: email.to_string(),
        phone: "+1 234-567-8900".to_string(),
        date_of_birth: "1985-03-15".to_string(),
        gender: "Female".to_string(),
        address: "123 Main St, City".to_string(),
        blood_type: "O+".to_string(),
        allergies: allergies.map(str::to_string),
        medical_history: None,
    }
}

async fn seed(client: &HmsClient) -> Result<()> {
    let sarah: Patient = client
        .create(&patient("Sarah Johnson", "sarah.j@email.com", Some("Penicillin")))
        .await?;
    let tom: Patient = client
        .create(&patient("Tom Baker", "tom.b@email.com", None))
        .await?;

    let chen: Doctor = client
        .create(&InsertDoctor {
            name: "Michael Chen".to_string(),
            email: "m.chen@hospital.com".to_string(),
            phone: "+1 234-567-8901".to_string(),
            specialization: "Cardiology".to_string(),
            department: "Cardiology".to_string(),
            experience: 15,
            availability: "Mon-Fri, 9AM-5PM".to_string(),
        })
        .await?;

    let _: Department = client
        .create(&InsertDepartment {
            name: "Cardiology".to_string(),
            description: "Specialized in heart and cardiovascular diseases".to_string(),
            head_doctor: chen.name.clone(),
            staff_count: 25,
            bed_count: 40,
            available_beds: 12,
        })
        .await?;

    let today = utils::today();
    for (who, date, reason) in [
        (&sarah, today.as_str(), "Routine Checkup"),
        (&tom, today.as_str(), "Chest pain"),
        (&sarah, "2024-01-15", "Blood pressure review"),
    ] {
        let appointment: Appointment = client
            .create(&InsertAppointment {
                patient_id: who.id.to_string(),
                doctor_id: chen.id.to_string(),
                patient_name: who.name.clone(),
                doctor_name: chen.name.clone(),
                date: date.to_string(),
                time: "10:00 AM".to_string(),
                reason: reason.to_string(),
                status: AppointmentStatus::Scheduled.to_string(),
            })
            .await?;

        if date != today {
            client
                .update_status(appointment.id, AppointmentStatus::Completed)
                .await?;
        }
    }

    info!("   已写入 2 名患者、1 名医生、1 个科室、3 个预约");
    Ok(())
}

async fn show_dashboard(client: &HmsClient) -> Result<()> {
    info!("\n📊 仪表盘");

    let stats = client.stats().await?;
    info!("   患者: {}", stats.total_patients);
    info!("   医生: {}", stats.total_doctors);
    info!("   预约: {} (今日 {})", stats.total_appointments, stats.today_appointments);
    info!("   科室: {}", stats.total_departments);

    let appointments = client.list::<Appointment>().await?;
    for appointment in queries::todays_appointments(&appointments, &utils::today()) {
        info!(
            "   今日: {} {} - {} ({})",
            appointment.time, appointment.patient_name, appointment.reason, appointment.status
        );
    }

    let groups = queries::group_by_status(&appointments);
    for status in AppointmentStatus::ALL {
        info!("   {}: {}", status, groups.get(status).len());
    }

    for department in client.list::<Department>().await? {
        match department.occupancy_rate() {
            Some(rate) => info!("   {} 床位占用率 {:.0}%", department.name, rate),
            None => info!("   {} 无床位", department.name),
        }
    }

    Ok(())
}

async fn show_search(client: &HmsClient) -> Result<()> {
    info!("\n🔎 检索");

    let patients = client.list::<Patient>().await?;
    for patient in queries::search(&patients, "joh") {
        info!("   患者匹配 'joh': {}", patient.name);
    }

    let doctors = client.list::<Doctor>().await?;
    for doctor in queries::search(&doctors, "cardio") {
        info!("   医生匹配 'cardio': {} ({})", doctor.name, doctor.specialization);
    }

    let appointments = client.list::<Appointment>().await?;
    for record in queries::medical_records(&appointments, "") {
        info!("   病历: {} {} - {}", record.date, record.patient_name, record.reason);
    }

    Ok(())
}
