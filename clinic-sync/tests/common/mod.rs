//! Scripted remote collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use clinic_client::{
    DirectoryService, Endpoint, RoleCycleResponse, ServiceError, SettingsService,
};
use clinic_core::{
    CrmSettingsRecord, EntryId, EntryPatch, EntryRecord, ImageKind, LogoUpload, SettingsUpdate,
};
use serde_json::Value;
use tokio::sync::oneshot;

/// A scripted answer: immediate, or released later by the test.
pub enum Reply<T> {
    Now(Result<T, ServiceError>),
    Later(oneshot::Receiver<Result<T, ServiceError>>),
}

impl<T> Reply<T> {
    pub fn ok(value: T) -> Self {
        Reply::Now(Ok(value))
    }

    pub fn rejected(endpoint: Endpoint) -> Self {
        Reply::Now(Err(rejected(endpoint)))
    }

    async fn resolve(self, endpoint: Endpoint) -> Result<T, ServiceError> {
        match self {
            Reply::Now(result) => result,
            Reply::Later(rx) => rx.await.unwrap_or_else(|_| {
                Err(ServiceError::Transport {
                    endpoint,
                    message: "reply sender dropped".into(),
                })
            }),
        }
    }
}

pub fn rejected(endpoint: Endpoint) -> ServiceError {
    ServiceError::Rejected {
        endpoint,
        status: 500,
        message: "scripted failure".into(),
    }
}

/// Decode a record from JSON the way the HTTP client would.
pub fn record(value: Value) -> EntryRecord {
    serde_json::from_value(value).expect("valid record JSON")
}

type Queue<T> = Mutex<VecDeque<Reply<T>>>;

#[derive(Default)]
pub struct ScriptedDirectory {
    list: Queue<Vec<EntryRecord>>,
    archived: Queue<Vec<EntryRecord>>,
    cycle: Queue<RoleCycleResponse>,
    archive: Queue<Vec<EntryRecord>>,
    update: Queue<EntryRecord>,
    fetch: Queue<EntryRecord>,
    calls: Mutex<Vec<(Endpoint, Option<EntryId>)>>,
    patches: Mutex<Vec<EntryPatch>>,
}

impl ScriptedDirectory {
    pub fn on_list(&self, reply: Reply<Vec<EntryRecord>>) -> &Self {
        self.list.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_list_archived(&self, reply: Reply<Vec<EntryRecord>>) -> &Self {
        self.archived.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_cycle(&self, reply: Reply<RoleCycleResponse>) -> &Self {
        self.cycle.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_archive(&self, reply: Reply<Vec<EntryRecord>>) -> &Self {
        self.archive.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_update(&self, reply: Reply<EntryRecord>) -> &Self {
        self.update.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_fetch(&self, reply: Reply<EntryRecord>) -> &Self {
        self.fetch.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .count()
    }

    pub fn ids_sent_to(&self, endpoint: Endpoint) -> Vec<EntryId> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .filter_map(|(_, id)| id.clone())
            .collect()
    }

    pub fn last_patch(&self) -> Option<EntryPatch> {
        self.patches.lock().unwrap().last().cloned()
    }

    fn next<T>(&self, queue: &Queue<T>, endpoint: Endpoint, id: Option<&EntryId>) -> Reply<T> {
        self.calls.lock().unwrap().push((endpoint, id.cloned()));
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Reply::Now(Err(ServiceError::Transport {
                endpoint,
                message: "no scripted reply".into(),
            }))
        })
    }
}

#[async_trait]
impl DirectoryService for ScriptedDirectory {
    async fn list_entries(&self) -> Result<Vec<EntryRecord>, ServiceError> {
        let reply = self.next(&self.list, Endpoint::ListEntries, None);
        reply.resolve(Endpoint::ListEntries).await
    }

    async fn list_archived(&self) -> Result<Vec<EntryRecord>, ServiceError> {
        let reply = self.next(&self.archived, Endpoint::ListArchived, None);
        reply.resolve(Endpoint::ListArchived).await
    }

    async fn cycle_role(&self, id: &EntryId) -> Result<RoleCycleResponse, ServiceError> {
        let reply = self.next(&self.cycle, Endpoint::CycleRole, Some(id));
        reply.resolve(Endpoint::CycleRole).await
    }

    async fn archive_entry(&self, id: &EntryId) -> Result<Vec<EntryRecord>, ServiceError> {
        let reply = self.next(&self.archive, Endpoint::ArchiveEntry, Some(id));
        reply.resolve(Endpoint::ArchiveEntry).await
    }

    async fn update_entry(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
    ) -> Result<EntryRecord, ServiceError> {
        self.patches.lock().unwrap().push(patch.clone());
        let reply = self.next(&self.update, Endpoint::UpdateEntry, Some(id));
        reply.resolve(Endpoint::UpdateEntry).await
    }

    async fn fetch_entry(&self, id: &EntryId) -> Result<EntryRecord, ServiceError> {
        let reply = self.next(&self.fetch, Endpoint::FetchEntry, Some(id));
        reply.resolve(Endpoint::FetchEntry).await
    }
}

#[derive(Default)]
pub struct ScriptedSettings {
    fetch: Queue<CrmSettingsRecord>,
    update: Queue<Value>,
    upload: Queue<Value>,
    updates_sent: Mutex<Vec<SettingsUpdate>>,
    uploads_sent: Mutex<Vec<(ImageKind, String)>>,
}

impl ScriptedSettings {
    pub fn on_fetch(&self, reply: Reply<CrmSettingsRecord>) -> &Self {
        self.fetch.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_update(&self, reply: Reply<Value>) -> &Self {
        self.update.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_upload(&self, reply: Reply<Value>) -> &Self {
        self.upload.lock().unwrap().push_back(reply);
        self
    }

    pub fn updates_sent(&self) -> Vec<SettingsUpdate> {
        self.updates_sent.lock().unwrap().clone()
    }

    pub fn uploads_sent(&self) -> Vec<(ImageKind, String)> {
        self.uploads_sent.lock().unwrap().clone()
    }

    fn pop<T>(queue: &Queue<T>, endpoint: Endpoint) -> Reply<T> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Reply::Now(Err(ServiceError::Transport {
                endpoint,
                message: "no scripted reply".into(),
            }))
        })
    }
}

#[async_trait]
impl SettingsService for ScriptedSettings {
    async fn fetch_settings(&self) -> Result<CrmSettingsRecord, ServiceError> {
        let reply = Self::pop(&self.fetch, Endpoint::FetchSettings);
        reply.resolve(Endpoint::FetchSettings).await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<Value, ServiceError> {
        self.updates_sent.lock().unwrap().push(update.clone());
        let reply = Self::pop(&self.update, Endpoint::UpdateSettings);
        reply.resolve(Endpoint::UpdateSettings).await
    }

    async fn upload_image(
        &self,
        kind: ImageKind,
        image: &LogoUpload,
    ) -> Result<Value, ServiceError> {
        self.uploads_sent
            .lock()
            .unwrap()
            .push((kind, image.file_name.clone()));
        let reply = Self::pop(&self.upload, Endpoint::UploadImage);
        reply.resolve(Endpoint::UploadImage).await
    }
}
