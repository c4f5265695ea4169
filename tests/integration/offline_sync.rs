//! Integration tests for the sync coordinator: offline queuing,
//! reconnect replay, best-effort continuation on partial failure, and
//! the remote→local refresh.
//!
//! Verification command: `cargo test --test offline_sync`

use std::sync::Arc;

use serde_json::json;

use studyflow::managers::{SubjectDetails, TaskDetails};
use studyflow::remote::{MemoryRemote, RemoteStore};
use studyflow::sync::SyncState;
use studyflow::{Organizer, Session};
use studyflow_model::{NONE_SENTINEL, ProfileUpdate, TimeFormat};

fn organizer(remote: &Arc<MemoryRemote>) -> Organizer<MemoryRemote> {
    Organizer::in_memory(Session::new("u1"), Arc::clone(remote))
}

#[tokio::test]
async fn offline_create_succeeds_locally_and_replays_on_reconnect() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    org.handle_offline().await;
    remote.set_online(false);
    assert_eq!(org.sync_state().await, SyncState::Offline);

    let task = org
        .create_task(TaskDetails {
            name: "essay".to_string(),
            due_date: "2024-03-10".parse().ok(),
            ..TaskDetails::default()
        })
        .await
        .expect("offline create still succeeds locally");
    assert!(org.get_task(&task.id).await.is_some());
    assert!(
        remote
            .raw_document(&org.session().tasks().doc(&task.id))
            .await
            .is_none()
    );

    remote.set_online(true);
    org.handle_reconnect().await;
    assert_eq!(org.sync_state().await, SyncState::Idle);

    let doc = remote
        .raw_document(&org.session().tasks().doc(&task.id))
        .await
        .expect("pushed on reconnect");
    assert_eq!(doc.get("name"), Some(&json!("essay")));
    assert_eq!(doc.get("dueDate"), Some(&json!("2024-03-10T23:59:59.999")));
}

#[tokio::test]
async fn offline_edit_and_delete_replay_in_order() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let keep = org
        .create_task(TaskDetails {
            name: "keep".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");
    let doomed = org
        .create_task(TaskDetails {
            name: "doomed".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    org.handle_offline().await;
    remote.set_online(false);

    org.update_task(
        &keep.id,
        TaskDetails {
            name: "keep (edited)".to_string(),
            ..TaskDetails::default()
        },
    )
    .await
    .expect("offline update");
    org.delete_task(&doomed.id).await;

    remote.set_online(true);
    org.handle_reconnect().await;

    let doc = remote
        .raw_document(&org.session().tasks().doc(&keep.id))
        .await
        .expect("edited doc");
    assert_eq!(doc.get("name"), Some(&json!("keep (edited)")));
    assert!(
        remote
            .raw_document(&org.session().tasks().doc(&doomed.id))
            .await
            .is_none(),
        "queued delete not replayed"
    );
}

#[tokio::test]
async fn offline_create_then_delete_does_not_resurrect() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    org.handle_offline().await;
    remote.set_online(false);

    let task = org
        .create_task(TaskDetails {
            name: "ephemeral".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");
    org.delete_task(&task.id).await;

    remote.set_online(true);
    org.handle_reconnect().await;

    assert!(
        remote
            .raw_document(&org.session().tasks().doc(&task.id))
            .await
            .is_none()
    );
    assert!(org.get_task(&task.id).await.is_none());
}

#[tokio::test]
async fn push_failure_keeps_entity_dirty_and_continues() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    org.handle_offline().await;
    remote.set_online(false);

    let poisoned = org
        .create_task(TaskDetails {
            name: "poisoned".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");
    let healthy = org
        .create_task(TaskDetails {
            name: "healthy".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    remote.set_online(true);
    remote
        .reject_writes(&org.session().tasks().doc(&poisoned.id))
        .await;
    org.handle_reconnect().await;

    // The batch continued past the rejected write.
    assert!(
        remote
            .raw_document(&org.session().tasks().doc(&healthy.id))
            .await
            .is_some()
    );
    assert!(
        remote
            .raw_document(&org.session().tasks().doc(&poisoned.id))
            .await
            .is_none()
    );
    assert_eq!(org.sync_state().await, SyncState::Idle);
}

#[tokio::test]
async fn profile_updates_queue_and_replay_in_order() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    org.handle_offline().await;
    remote.set_online(false);

    org.update_profile(ProfileUpdate {
        name: Some("Ada".to_string()),
        ..ProfileUpdate::default()
    })
    .await
    .expect("queue first");
    org.update_profile(ProfileUpdate {
        name: Some("Ada Lovelace".to_string()),
        time_format: Some(TimeFormat::TwentyFourHour),
        ..ProfileUpdate::default()
    })
    .await
    .expect("queue second");

    remote.set_online(true);
    org.handle_reconnect().await;

    let profile = org.fetch_profile().await.expect("profile");
    assert_eq!(profile.name, "Ada Lovelace");
    assert_eq!(profile.time_format, TimeFormat::TwentyFourHour);
}

#[tokio::test]
async fn refresh_overwrites_local_and_prunes_stale_records() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    let stale = org
        .create_task(TaskDetails {
            name: "stale".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    // Another device deletes the task and adds a subject remotely.
    remote
        .delete_document(&org.session().tasks().doc(&stale.id))
        .await
        .expect("remote delete");
    let other = organizer(&remote);
    let math = other
        .create_subject(SubjectDetails {
            name: "Math".to_string(),
            ..SubjectDetails::default()
        })
        .await
        .expect("remote subject");

    org.handle_reconnect().await;

    assert!(org.get_task(&stale.id).await.is_none(), "stale task kept");
    assert_eq!(
        org.get_subject(&math.id).await.expect("subject pulled").name,
        "Math"
    );
}

#[tokio::test]
async fn refresh_seeds_sentinel_entries() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    org.handle_reconnect().await;

    // Sentinels exist locally so joins resolve, but never show in lists.
    assert!(org.get_subject(NONE_SENTINEL).await.is_some());
    assert!(org.get_project(NONE_SENTINEL).await.is_some());
    assert!(org.list_subjects().await.is_empty());
    assert!(org.list_projects().await.is_empty());

    // A second refresh must not prune them either.
    org.handle_reconnect().await;
    assert!(org.get_subject(NONE_SENTINEL).await.is_some());
}

#[tokio::test]
async fn reconnect_replay_is_idempotent() {
    let remote = Arc::new(MemoryRemote::new());
    let org = organizer(&remote);

    org.handle_offline().await;
    remote.set_online(false);
    let task = org
        .create_task(TaskDetails {
            name: "essay".to_string(),
            ..TaskDetails::default()
        })
        .await
        .expect("create");

    remote.set_online(true);
    org.handle_reconnect().await;
    org.handle_reconnect().await;

    assert_eq!(org.list_tasks().await.len(), 1);
    assert!(
        remote
            .raw_document(&org.session().tasks().doc(&task.id))
            .await
            .is_some()
    );
}
