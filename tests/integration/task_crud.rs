//! Integration tests for task create/update/delete against an in-memory
//! remote: date anchoring on the remote document, explicit field-clear
//! on update, and last-writer-wins across sessions.
//!
//! Verification command: `cargo test --test task_crud`

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde_json::json;

use studyflow::managers::TaskDetails;
use studyflow::remote::{
    CollectionPath, DocPatch, DocPath, Document, MemoryRemote, RemoteError, RemoteStore,
};
use studyflow::{Organizer, Session};
use studyflow_model::{RefInput, TaskPriority, TaskStatus};

fn organizer(remote: &Arc<MemoryRemote>) -> Organizer<MemoryRemote> {
    Organizer::in_memory(Session::new("u1"), Arc::clone(remote))
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("test date")
}

#[tokio::test]
async fn create_anchors_due_date_to_end_of_day() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let task = org
        .create_task(TaskDetails {
            name: "essay".to_string(),
            due_date: Some(date("2024-03-10")),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    let doc = remote
        .raw_document(&org.session().tasks().doc(&task.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("dueDate"), Some(&json!("2024-03-10T23:59:59.999")));
    assert!(!doc.contains_key("dueTime"));
    assert!(!doc.contains_key("startDate"));

    // Local mirror keeps the plain components.
    assert_eq!(task.due_date, Some(date("2024-03-10")));
    assert_eq!(task.due_time, None);
}

#[tokio::test]
async fn create_with_time_anchors_to_exact_time() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let task = org
        .create_task(TaskDetails {
            name: "exam".to_string(),
            start_date: Some(date("2024-03-01")),
            due_date: Some(date("2024-03-10")),
            due_time: NaiveTime::from_hms_opt(14, 30, 0),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    let doc = remote
        .raw_document(&org.session().tasks().doc(&task.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("startDate"), Some(&json!("2024-03-01T00:00:00.000")));
    assert_eq!(doc.get("dueDate"), Some(&json!("2024-03-10T23:59:59.999")));
    assert_eq!(doc.get("dueTime"), Some(&json!("2024-03-10T14:30:00.000")));
    assert_eq!(task.due_time, NaiveTime::from_hms_opt(14, 30, 0));
}

#[tokio::test]
async fn update_clears_omitted_optional_fields() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let task = org
        .create_task(TaskDetails {
            name: "essay".to_string(),
            due_date: Some(date("2024-03-10")),
            due_time: NaiveTime::from_hms_opt(9, 0, 0),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    let updated = org
        .update_task(
            &task.id,
            TaskDetails {
                name: "essay (final)".to_string(),
                ..TaskDetails::default()
            },
        )
        .await
        .expect("update");

    let doc = remote
        .raw_document(&org.session().tasks().doc(&task.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("name"), Some(&json!("essay (final)")));
    assert!(!doc.contains_key("dueDate"), "stale due date survived");
    assert!(!doc.contains_key("dueTime"), "stale due time survived");
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.due_time, None);
}

#[tokio::test]
async fn due_time_without_due_date_is_ignored_not_fatal() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let task = org
        .create_task(TaskDetails {
            name: "essay".to_string(),
            due_date: Some(date("2024-03-10")),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    // Update supplies a time but no date; the record must not end up
    // with a time and no date.
    let updated = org
        .update_task(
            &task.id,
            TaskDetails {
                name: "essay".to_string(),
                due_time: NaiveTime::from_hms_opt(9, 0, 0),
                ..TaskDetails::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.due_time, None);

    let doc = remote
        .raw_document(&org.session().tasks().doc(&task.id))
        .await
        .expect("remote doc");
    assert!(!doc.contains_key("dueTime"));
}

#[tokio::test]
async fn delete_removes_remote_and_local() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let task = org
        .create_task(TaskDetails {
            name: "essay".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    org.delete_task(&task.id).await;
    assert!(org.get_task(&task.id).await.is_none());
    assert!(
        remote
            .raw_document(&org.session().tasks().doc(&task.id))
            .await
            .is_none()
    );

    // Deleting again is a no-op, not an error.
    org.delete_task(&task.id).await;
}

#[tokio::test]
async fn archive_task_flips_status_only() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let task = org
        .create_task(TaskDetails {
            name: "essay".to_string(),
            priority: TaskPriority::High,
            due_date: Some(date("2024-03-10")),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    org.archive_task(&task.id).await.expect("archive");

    let local = org.get_task(&task.id).await.expect("local");
    assert_eq!(local.status, TaskStatus::Completed);
    assert_eq!(local.priority, TaskPriority::High);
    assert_eq!(local.due_date, Some(date("2024-03-10")));

    let doc = remote
        .raw_document(&org.session().tasks().doc(&task.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("status"), Some(&json!("Completed")));
    assert_eq!(doc.get("dueDate"), Some(&json!("2024-03-10T23:59:59.999")));
}

#[tokio::test]
async fn lms_import_uses_external_uid_and_reimport_upserts() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let lms = studyflow_model::LmsOrigin {
        source: "canvas".to_string(),
        uid: "canvas-assignment-42".to_string(),
    };
    let first = org
        .create_task(TaskDetails {
            name: "Assignment 42".to_string(),
            lms: Some(lms.clone()),
            ..TaskDetails::default()
        })
        .await
        .expect("create");
    assert_eq!(first.id, "canvas-assignment-42");

    // Re-importing the same feed item overwrites, never duplicates.
    let second = org
        .create_task(TaskDetails {
            name: "Assignment 42 (revised)".to_string(),
            lms: Some(lms),
            ..TaskDetails::default()
        })
        .await
        .expect("re-create");
    assert_eq!(second.id, first.id);
    assert_eq!(org.list_tasks().await.len(), 1);
    assert_eq!(
        org.get_task(&first.id).await.expect("local").name,
        "Assignment 42 (revised)"
    );
}

/// A backend where every document has vanished and the connection drops
/// before the upsert retry lands.
struct VanishingRemote;

impl RemoteStore for VanishingRemote {
    async fn get_document(&self, _path: &DocPath) -> Result<Option<Document>, RemoteError> {
        Ok(None)
    }

    async fn get_collection(
        &self,
        _path: &CollectionPath,
    ) -> Result<Vec<(String, Document)>, RemoteError> {
        Ok(Vec::new())
    }

    async fn set_document(&self, _path: &DocPath, _doc: Document) -> Result<(), RemoteError> {
        Err(RemoteError::Offline)
    }

    async fn update_document(&self, path: &DocPath, _patch: DocPatch) -> Result<(), RemoteError> {
        Err(RemoteError::NotFound(path.to_string()))
    }

    async fn delete_document(&self, _path: &DocPath) -> Result<(), RemoteError> {
        Ok(())
    }
}

#[tokio::test]
async fn update_queues_when_connection_drops_during_upsert_fallback() {
    let org = Organizer::in_memory(Session::new("u1"), Arc::new(VanishingRemote));

    // Losing the connection mid-update is not an error; the edit lands
    // locally and waits for the next sync, like any other offline write.
    let updated = org
        .update_task(
            "t1",
            TaskDetails {
                name: "essay (edited)".to_string(),
                ..TaskDetails::default()
            },
        )
        .await
        .expect("offline fallback must not propagate");
    assert_eq!(updated.name, "essay (edited)");
    assert_eq!(
        org.get_task("t1").await.expect("local mirror").name,
        "essay (edited)"
    );
}

#[tokio::test]
async fn later_session_wins_entirely() {
    let remote = Arc::new(MemoryRemote::new());
    let org_a = organizer(&remote);
    let org_b = organizer(&remote);

    let task = org_a
        .create_task(TaskDetails {
            name: "essay".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    org_a
        .update_task(
            &task.id,
            TaskDetails {
                name: "essay v1".to_string(),
                subject: RefInput::ById("math".to_string()),
                due_date: Some(date("2024-03-10")),
                ..TaskDetails::default()
            },
        )
        .await
        .expect("first update");

    // Second session's update replaces every field, no field-level merge.
    org_b
        .update_task(
            &task.id,
            TaskDetails {
                name: "essay v2".to_string(),
                ..TaskDetails::default()
            },
        )
        .await
        .expect("second update");

    let doc = remote
        .raw_document(&org_a.session().tasks().doc(&task.id))
        .await
        .expect("remote doc");
    assert_eq!(doc.get("name"), Some(&json!("essay v2")));
    assert!(!doc.contains_key("dueDate"));
    let subject = doc.get("subject").expect("subject field");
    assert_eq!(subject.get("id"), Some(&json!("None")));
}
