use sqlx::types::Json;
use uuid::Uuid;

use tuition_backend::models::teacher::Teacher;
use tuition_backend::models::vacancy::{ApplicationStatus, Vacancy, VacancyApplication};
use tuition_backend::services::notification_service::{DashboardEvent, NotificationService};

fn sample_teacher() -> Teacher {
    Teacher {
        id: Uuid::new_v4(),
        full_name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        phone: "555-0100".into(),
        password_hash: "$argon2id$secret".into(),
        address: "12 Main St".into(),
        latitude: Some(41.31),
        longitude: Some(69.24),
        grade: 9,
        subjects: vec!["Math".into(), "Physics".into()],
        agreement_accepted: true,
        cv_url: Some("https://files.example.com/cv.pdf".into()),
        certificates: vec![],
        status: "pending".into(),
        created_at: None,
        updated_at: None,
    }
}

fn sample_vacancy(applications: Vec<VacancyApplication>) -> Vacancy {
    Vacancy {
        id: Uuid::new_v4(),
        title: "Math tutor wanted".into(),
        subject: "Mathematics".into(),
        description: "Grade 9 algebra, twice a week".into(),
        requirements: vec!["2+ years experience".into()],
        salary: "Negotiable".into(),
        status: "open".into(),
        featured: true,
        created_by: Uuid::new_v4(),
        applications: Json(applications),
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn new_application_event_carries_the_full_snapshot() {
    let hub = NotificationService::new();
    let (_id, mut rx) = hub.subscribe();

    let teacher = sample_teacher();
    let application = VacancyApplication::new(teacher.id);
    let vacancy = sample_vacancy(vec![application.clone()]);

    hub.broadcast(&DashboardEvent::NewApplication {
        vacancy: vacancy.clone(),
        teacher: teacher.clone(),
        status: application.status,
        applied_at: application.applied_at,
    });

    let raw = rx.recv().await.unwrap();
    let message: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(message["type"], "NEW_APPLICATION");
    assert_eq!(message["data"]["status"], "pending");
    assert_eq!(message["data"]["vacancy"]["title"], "Math tutor wanted");
    assert_eq!(
        message["data"]["vacancy"]["applications"][0]["teacher_id"],
        teacher.id.to_string()
    );
    assert_eq!(message["data"]["teacher"]["email"], "jane@example.com");
    // The applicant's credential hash must never leave the process.
    assert!(message["data"]["teacher"].get("password_hash").is_none());
}

#[tokio::test]
async fn every_connected_observer_gets_the_same_message() {
    let hub = NotificationService::new();
    let mut receivers = Vec::new();
    for _ in 0..5 {
        let (_id, rx) = hub.subscribe();
        receivers.push(rx);
    }

    hub.broadcast(&DashboardEvent::StatusUpdate {
        teacher_id: Uuid::new_v4(),
        vacancy_id: Some(Uuid::new_v4()),
        status: "approved".into(),
    });

    let mut seen = Vec::new();
    for rx in receivers.iter_mut() {
        seen.push(rx.recv().await.unwrap());
    }
    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn broadcast_without_observers_does_not_fail() {
    let hub = NotificationService::new();
    let teacher = sample_teacher();
    let application = VacancyApplication::new(teacher.id);

    hub.broadcast(&DashboardEvent::NewApplication {
        vacancy: sample_vacancy(vec![application.clone()]),
        teacher,
        status: application.status,
        applied_at: application.applied_at,
    });

    assert_eq!(hub.observer_count(), 0);
}

#[tokio::test]
async fn disconnected_observers_are_pruned_and_others_still_receive() {
    let hub = NotificationService::new();
    let (_alive, mut rx_alive) = hub.subscribe();
    let (_dead, rx_dead) = hub.subscribe();
    drop(rx_dead);

    hub.broadcast(&DashboardEvent::StatusUpdate {
        teacher_id: Uuid::new_v4(),
        vacancy_id: None,
        status: "rejected".into(),
    });

    assert_eq!(hub.observer_count(), 1);
    let message: serde_json::Value =
        serde_json::from_str(&rx_alive.recv().await.unwrap()).unwrap();
    assert_eq!(message["type"], "STATUS_UPDATE");
    assert_eq!(message["data"]["vacancy_id"], serde_json::Value::Null);
}

#[test]
fn application_status_serializes_into_the_wire_vocabulary() {
    assert_eq!(
        serde_json::to_value(ApplicationStatus::Pending).unwrap(),
        "pending"
    );
    assert_eq!(
        serde_json::to_value(ApplicationStatus::Accepted).unwrap(),
        "accepted"
    );
}
