//! Owner of a list view's [`Snapshot`].
//!
//! All mutations are pessimistic: the snapshot changes only after the server
//! answers, and only through [`Snapshot::reconcile`]. A failed call leaves it
//! exactly as it was, is logged at `warn`, and is returned to the caller.
//!
//! Calls are neither deduplicated nor serialized. Two role cycles in flight
//! for the same entry both apply, in the order their responses arrive; the
//! snapshot lock is only taken after a response is in hand.

use tokio::sync::RwLock;

use clinic_client::DirectoryService;
use clinic_core::{Entry, EntryId, EntryPatch, EntryRecord};

use crate::error::SyncError;
use crate::snapshot::{Reconciliation, ServerUpdate, Snapshot};

/// Which listing backs the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    #[default]
    Active,
    Archived,
}

/// Result of a successful [`EntryListSynchronizer::request_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The server's record, un-normalized, for edit forms.
    pub record: EntryRecord,
    pub reconciliation: Reconciliation,
}

pub struct EntryListSynchronizer<S> {
    service: S,
    scope: ListScope,
    snapshot: RwLock<Snapshot>,
}

impl<S: DirectoryService> EntryListSynchronizer<S> {
    /// Create and issue the first list request. Fails if that load fails.
    pub async fn load(service: S, scope: ListScope) -> Result<Self, SyncError> {
        let sync = Self::new(service, scope);
        sync.initialize().await?;
        Ok(sync)
    }

    /// Create with an empty snapshot and no request issued. Prefer
    /// [`load`](Self::load) unless the first load must be driven separately.
    pub fn new(service: S, scope: ListScope) -> Self {
        Self {
            service,
            scope,
            snapshot: RwLock::new(Snapshot::default()),
        }
    }

    pub fn scope(&self) -> ListScope {
        self.scope
    }

    /// Copy of the current snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn entries(&self) -> Vec<Entry> {
        self.snapshot.read().await.entries().to_vec()
    }

    /// Load (or reload) the list. The previous snapshot stays visible while
    /// the request is pending and after a failure; there is no retry.
    pub async fn initialize(&self) -> Result<Reconciliation, SyncError> {
        let result = self.try_initialize().await;
        report("initialize", None, &result);
        result
    }

    /// Ask the server to rotate `id`'s access level.
    ///
    /// An id missing from the snapshot is still forwarded; a single-record
    /// answer for it is ignored, a full-set answer still replaces the list.
    pub async fn request_role_cycle(&self, id: &EntryId) -> Result<Reconciliation, SyncError> {
        tracing::debug!(%id, "requesting role cycle");
        let result = self.try_role_cycle(id).await;
        report("role cycle", Some(id), &result);
        result
    }

    /// Archive `id`; the server's remaining list replaces the snapshot.
    ///
    /// Crate-private: the only caller is [`ArchiveConfirmationFlow::confirm`](crate::ArchiveConfirmationFlow::confirm).
    pub(crate) async fn request_archive(&self, id: &EntryId) -> Result<Reconciliation, SyncError> {
        tracing::debug!(%id, "requesting archive");
        let result = self.try_archive(id).await;
        report("archive", Some(id), &result);
        result
    }

    /// Send `patch` for `id`. The returned record replaces the matching
    /// snapshot entry wholesale; an entry not in the snapshot is left out.
    /// A returned record missing `accessLevel` is merged, not rejected.
    pub async fn request_update(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
    ) -> Result<UpdateOutcome, SyncError> {
        tracing::debug!(%id, "requesting update");
        let result = self.try_update(id, patch).await;
        report("update", Some(id), &result);
        result
    }

    async fn try_initialize(&self) -> Result<Reconciliation, SyncError> {
        let records = match self.scope {
            ListScope::Active => self.service.list_entries().await?,
            ListScope::Archived => self.service.list_archived().await?,
        };
        let update = ServerUpdate::full_set(records)?;
        Ok(self.apply(update).await)
    }

    async fn try_role_cycle(&self, id: &EntryId) -> Result<Reconciliation, SyncError> {
        let response = self.service.cycle_role(id).await?;
        let update = ServerUpdate::from_role_cycle(response)?;
        Ok(self.apply(update).await)
    }

    async fn try_archive(&self, id: &EntryId) -> Result<Reconciliation, SyncError> {
        let remaining = self.service.archive_entry(id).await?;
        let update = ServerUpdate::full_set(remaining)?;
        Ok(self.apply(update).await)
    }

    async fn try_update(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
    ) -> Result<UpdateOutcome, SyncError> {
        let record = self.service.update_entry(id, patch).await?;
        let reconciliation = if self.snapshot.read().await.contains(&record.id) {
            // The update is already applied server-side; a record that cannot
            // be normalized is merged field by field instead.
            let update = ServerUpdate::single(record.clone()).unwrap_or_else(|err| {
                tracing::warn!(
                    id = %record.id,
                    error = %err,
                    "partial update record; merging carried fields"
                );
                ServerUpdate::Patch(record.clone())
            });
            self.apply(update).await
        } else {
            Reconciliation::Ignored {
                id: record.id.clone(),
            }
        };
        Ok(UpdateOutcome {
            record,
            reconciliation,
        })
    }

    async fn apply(&self, update: ServerUpdate) -> Reconciliation {
        let mut snapshot = self.snapshot.write().await;
        let outcome = snapshot.reconcile(update);
        tracing::info!(scope = ?self.scope, ?outcome, "snapshot reconciled");
        outcome
    }
}

fn report<T>(operation: &'static str, id: Option<&EntryId>, result: &Result<T, SyncError>) {
    if let Err(err) = result {
        match id {
            Some(id) => tracing::warn!(%id, error = %err, "{operation} failed"),
            None => tracing::warn!(error = %err, "{operation} failed"),
        }
    }
}
