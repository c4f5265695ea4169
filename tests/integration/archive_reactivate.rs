//! Integration tests for archive/reactivate on subjects and projects:
//! the status flip is a targeted update — remote and local status
//! change while every other field and dependent reference stays put.
//!
//! Verification command: `cargo test --test archive_reactivate`

use std::sync::Arc;

use serde_json::json;

use studyflow::managers::{ProjectDetails, SubjectDetails, TaskDetails};
use studyflow::remote::MemoryRemote;
use studyflow::{Organizer, Session};
use studyflow_model::{EntityStatus, RefInput};

fn organizer(remote: &Arc<MemoryRemote>) -> Organizer<MemoryRemote> {
    Organizer::in_memory(Session::new("u1"), Arc::clone(remote))
}

#[tokio::test]
async fn archive_subject_flips_status_and_nothing_else() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let math = org
        .create_subject(SubjectDetails {
            name: "Math".to_string(),
            semester: "Fall 2024".to_string(),
            color: "blue".to_string(),
            ..SubjectDetails::default()
        })
        .await
        .expect("subject");
    let task = org
        .create_task(TaskDetails {
            name: "HW1".to_string(),
            subject: RefInput::ById(math.id.clone()),
            ..TaskDetails::default()
        })
        .await
        .expect("task");

    org.archive_subject(&math.id).await.expect("archive");

    let local = org.get_subject(&math.id).await.expect("local");
    assert_eq!(local.status, EntityStatus::Archived);
    assert_eq!(local.name, "Math");
    assert_eq!(local.semester, "Fall 2024");
    assert_eq!(local.color, "blue");

    let doc = remote
        .raw_document(&org.session().subjects().doc(&math.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("status"), Some(&json!("Archived")));
    assert_eq!(doc.get("name"), Some(&json!("Math")));
    assert_eq!(doc.get("semester"), Some(&json!("Fall 2024")));

    // Archiving is a soft delete: the dependent task keeps its reference.
    let task = org.get_task(&task.id).await.expect("task");
    assert_eq!(task.subject, math.id);
}

#[tokio::test]
async fn reactivate_subject_restores_active() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let math = org
        .create_subject(SubjectDetails {
            name: "Math".to_string(),
            ..SubjectDetails::default()
        })
        .await
        .expect("subject");

    org.archive_subject(&math.id).await.expect("archive");
    org.reactivate_subject(&math.id).await.expect("reactivate");

    let local = org.get_subject(&math.id).await.expect("local");
    assert_eq!(local.status, EntityStatus::Active);
    let doc = remote
        .raw_document(&org.session().subjects().doc(&math.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("status"), Some(&json!("Active")));
}

#[tokio::test]
async fn archive_project_flips_status_and_nothing_else() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let math = org
        .create_subject(SubjectDetails {
            name: "Math".to_string(),
            ..SubjectDetails::default()
        })
        .await
        .expect("subject");
    let thesis = org
        .create_project(ProjectDetails {
            name: "thesis".to_string(),
            subjects: vec![RefInput::ById(math.id.clone())],
            due_date: "2024-06-01".parse().ok(),
            ..ProjectDetails::default()
        })
        .await
        .expect("project");
    let task = org
        .create_task(TaskDetails {
            name: "outline".to_string(),
            project: RefInput::ById(thesis.id.clone()),
            ..TaskDetails::default()
        })
        .await
        .expect("task");

    org.archive_project(&thesis.id).await.expect("archive");

    let local = org.get_project(&thesis.id).await.expect("local");
    assert_eq!(local.status, EntityStatus::Archived);
    assert_eq!(local.name, "thesis");
    assert_eq!(local.subjects, vec![math.id.clone()]);
    assert_eq!(local.due_date, "2024-06-01".parse().ok());

    let doc = remote
        .raw_document(&org.session().projects().doc(&thesis.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("status"), Some(&json!("Archived")));
    assert_eq!(doc.get("dueDate"), Some(&json!("2024-06-01T23:59:59.999")));

    let task = org.get_task(&task.id).await.expect("task");
    assert_eq!(task.project, thesis.id);

    org.reactivate_project(&thesis.id).await.expect("reactivate");
    let local = org.get_project(&thesis.id).await.expect("local");
    assert_eq!(local.status, EntityStatus::Active);
}

#[tokio::test]
async fn archive_unknown_id_is_a_noop() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    org.archive_subject("ghost").await.expect("no-op");
    org.reactivate_subject("ghost").await.expect("no-op");
    org.archive_project("ghost").await.expect("no-op");
    org.reactivate_project("ghost").await.expect("no-op");
    assert!(org.get_subject("ghost").await.is_none());
    assert!(org.get_project("ghost").await.is_none());
}

#[tokio::test]
async fn offline_archive_queues_and_replays_on_reconnect() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let math = org
        .create_subject(SubjectDetails {
            name: "Math".to_string(),
            ..SubjectDetails::default()
        })
        .await
        .expect("subject");

    org.handle_offline().await;
    remote.set_online(false);
    org.archive_subject(&math.id).await.expect("offline archive");
    assert_eq!(
        org.get_subject(&math.id).await.expect("local").status,
        EntityStatus::Archived
    );

    remote.set_online(true);
    org.handle_reconnect().await;

    let doc = remote
        .raw_document(&org.session().subjects().doc(&math.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("status"), Some(&json!("Archived")));
}
