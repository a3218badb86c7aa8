//! ArchiveConfirmationFlow gating and the end-to-end list scenario.

mod common;

use std::sync::Arc;

use clinic_client::{Endpoint, RoleCycleResponse};
use clinic_core::{AccessLevel, Entry, EntryId};
use clinic_sync::{
    ArchiveConfirmationFlow, ArchiveState, EntryListSynchronizer, ListScope, Reconciliation,
    SyncError,
};
use common::{record, Reply, ScriptedDirectory};
use serde_json::json;

async fn three_entries(
    service: Arc<ScriptedDirectory>,
) -> EntryListSynchronizer<Arc<ScriptedDirectory>> {
    service.on_list(Reply::ok(vec![
        record(json!({"id": "A", "fullName": "Amal", "accessLevel": "admin"})),
        record(json!({"id": "B", "fullName": "Bilel", "accessLevel": "manager"})),
        record(json!({"id": "C", "fullName": "Chaima", "accessLevel": "user"})),
    ]));
    let sync = EntryListSynchronizer::new(service, ListScope::Active);
    sync.initialize().await.expect("initialize");
    sync
}

#[tokio::test]
async fn cancel_sends_nothing() {
    let service = Arc::new(ScriptedDirectory::default());
    let sync = three_entries(service.clone()).await;
    let before = sync.snapshot().await;
    let mut flow = ArchiveConfirmationFlow::new();

    flow.open(EntryId::from("B"));
    assert_eq!(flow.cancel(), Some(EntryId::from("B")));

    assert_eq!(service.calls_to(Endpoint::ArchiveEntry), 0);
    assert_eq!(sync.snapshot().await, before);
    assert_eq!(flow.state(), &ArchiveState::Idle);
}

#[tokio::test]
async fn confirm_archives_and_takes_server_list_in_order() {
    let service = Arc::new(ScriptedDirectory::default());
    let sync = three_entries(service.clone()).await;
    let mut flow = ArchiveConfirmationFlow::new();

    service.on_archive(Reply::ok(vec![
        record(json!({"id": "A", "fullName": "Amal", "accessLevel": "admin"})),
        record(json!({"id": "C", "fullName": "Chaima", "accessLevel": "user"})),
    ]));
    flow.open(EntryId::from("B"));
    let outcome = flow.confirm(&sync).await.expect("confirm");

    assert_eq!(outcome, Reconciliation::Replaced { entries: 2 });
    let ids: Vec<String> = sync.entries().await.into_iter().map(|e| e.id.0).collect();
    assert_eq!(ids, ["A", "C"]);
    assert_eq!(service.ids_sent_to(Endpoint::ArchiveEntry), [EntryId::from("B")]);
    assert_eq!(flow.state(), &ArchiveState::Idle);
}

#[tokio::test]
async fn confirm_archives_the_last_opened_target() {
    let service = Arc::new(ScriptedDirectory::default());
    let sync = three_entries(service.clone()).await;
    let mut flow = ArchiveConfirmationFlow::new();

    service.on_archive(Reply::ok(vec![]));
    flow.open(EntryId::from("A"));
    flow.open(EntryId::from("C"));
    flow.confirm(&sync).await.expect("confirm");

    assert_eq!(service.ids_sent_to(Endpoint::ArchiveEntry), [EntryId::from("C")]);
}

#[tokio::test]
async fn failed_archive_still_returns_to_idle() {
    let service = Arc::new(ScriptedDirectory::default());
    let sync = three_entries(service.clone()).await;
    let before = sync.snapshot().await;
    let mut flow = ArchiveConfirmationFlow::new();

    service.on_archive(Reply::rejected(Endpoint::ArchiveEntry));
    flow.open(EntryId::from("A"));
    let err = flow.confirm(&sync).await.unwrap_err();

    assert!(matches!(err, SyncError::Service(_)), "got: {err}");
    assert_eq!(flow.state(), &ArchiveState::Idle);
    assert_eq!(sync.snapshot().await, before);
}

#[tokio::test]
async fn confirm_while_idle_is_refused_without_a_call() {
    let service = Arc::new(ScriptedDirectory::default());
    let sync = three_entries(service.clone()).await;
    let mut flow = ArchiveConfirmationFlow::new();

    let err = flow.confirm(&sync).await.unwrap_err();
    assert!(matches!(err, SyncError::NothingPending), "got: {err}");

    flow.open(EntryId::from("A"));
    flow.cancel();
    assert!(matches!(flow.confirm(&sync).await, Err(SyncError::NothingPending)));
    assert_eq!(service.calls_to(Endpoint::ArchiveEntry), 0);
}

#[tokio::test]
async fn load_cycle_then_archive_scenario() {
    let service = Arc::new(ScriptedDirectory::default());
    service.on_list(Reply::ok(vec![record(
        json!({"id": 1, "accessLevel": "user", "address": null}),
    )]));
    let sync = EntryListSynchronizer::new(service.clone(), ListScope::Active);

    sync.initialize().await.expect("initialize");
    let entries = sync.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].address, "");

    service.on_cycle(Reply::ok(RoleCycleResponse::One(record(
        json!({"id": 1, "accessLevel": "admin"}),
    ))));
    sync.request_role_cycle(&EntryId::from(1u64)).await.expect("cycle");
    let expected = Entry {
        id: EntryId::from(1u64),
        full_name: String::new(),
        phone: String::new(),
        email: String::new(),
        address: String::new(),
        avatar_url: None,
        access_level: AccessLevel::Admin,
    };
    assert_eq!(sync.entries().await, [expected]);

    service.on_archive(Reply::ok(vec![]));
    let mut flow = ArchiveConfirmationFlow::new();
    flow.open(EntryId::from(1u64));
    flow.confirm(&sync).await.expect("confirm");
    assert!(sync.entries().await.is_empty());
}
