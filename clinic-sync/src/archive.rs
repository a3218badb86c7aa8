//! Two-state confirmation gate in front of the archive mutation.
//!
//! ```text
//!   Idle ──open(id)──▶ AwaitingConfirmation(id) ──confirm()──▶ Idle  (archive sent)
//!                      │          ▲              ──cancel()───▶ Idle  (nothing sent)
//!                      └─open(id')┘
//! ```

use clinic_client::DirectoryService;
use clinic_core::EntryId;

use crate::error::SyncError;
use crate::snapshot::Reconciliation;
use crate::synchronizer::EntryListSynchronizer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArchiveState {
    #[default]
    Idle,
    AwaitingConfirmation(EntryId),
}

#[derive(Debug, Default)]
pub struct ArchiveConfirmationFlow {
    state: ArchiveState,
}

impl ArchiveConfirmationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ArchiveState {
        &self.state
    }

    /// The entry awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&EntryId> {
        match &self.state {
            ArchiveState::AwaitingConfirmation(id) => Some(id),
            ArchiveState::Idle => None,
        }
    }

    /// Ask for confirmation to archive `id`. Replaces any earlier pending target.
    pub fn open(&mut self, id: EntryId) {
        if let ArchiveState::AwaitingConfirmation(previous) = &self.state {
            tracing::debug!(%previous, next = %id, "replacing pending archive target");
        }
        self.state = ArchiveState::AwaitingConfirmation(id);
    }

    /// Drop the pending target without any network call.
    pub fn cancel(&mut self) -> Option<EntryId> {
        match std::mem::take(&mut self.state) {
            ArchiveState::AwaitingConfirmation(id) => Some(id),
            ArchiveState::Idle => None,
        }
    }

    /// Archive the pending target. The gate returns to `Idle` whatever the
    /// outcome; it only gates the request, it does not track it.
    pub async fn confirm<S: DirectoryService>(
        &mut self,
        sync: &EntryListSynchronizer<S>,
    ) -> Result<Reconciliation, SyncError> {
        let id = self.cancel().ok_or(SyncError::NothingPending)?;
        sync.request_archive(&id).await
    }
}
