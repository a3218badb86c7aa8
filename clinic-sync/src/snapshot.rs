//! The list view's in-memory copy of the directory and its single
//! reconciliation step.

use chrono::{DateTime, Utc};

use clinic_client::RoleCycleResponse;
use clinic_core::{Entry, EntryId, EntryRecord, RecordError};

/// Ordered entries, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<Entry>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// A normalized server answer, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerUpdate {
    /// Authoritative full list; replaces the snapshot.
    FullSet(Vec<Entry>),
    /// One entry as the server now holds it; replaces the matching entry.
    Single(Entry),
    /// Partial record; only the fields it carries overwrite the matching entry.
    Patch(EntryRecord),
}

/// What applying a [`ServerUpdate`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    Replaced { entries: usize },
    Merged { id: EntryId },
    /// The entry is not in the snapshot; the server's answer is not inserted.
    Ignored { id: EntryId },
}

impl ServerUpdate {
    /// Normalize a full list. One malformed row rejects the whole list.
    pub fn full_set(records: Vec<EntryRecord>) -> Result<Self, RecordError> {
        records
            .into_iter()
            .map(Entry::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(ServerUpdate::FullSet)
    }

    pub fn single(record: EntryRecord) -> Result<Self, RecordError> {
        Entry::try_from(record).map(ServerUpdate::Single)
    }

    pub fn from_role_cycle(response: RoleCycleResponse) -> Result<Self, RecordError> {
        match response {
            RoleCycleResponse::Many(records) => Self::full_set(records),
            RoleCycleResponse::One(record) => Ok(ServerUpdate::Patch(record)),
        }
    }
}

impl Snapshot {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    /// Time of the last wholesale replacement.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Apply a server answer. Callers are shape-agnostic: a full set replaces
    /// everything, a single entry or patch is applied in place by id.
    pub(crate) fn reconcile(&mut self, update: ServerUpdate) -> Reconciliation {
        match update {
            ServerUpdate::FullSet(entries) => {
                self.replace_all(entries);
                Reconciliation::Replaced {
                    entries: self.entries.len(),
                }
            }
            ServerUpdate::Single(entry) => {
                let id = entry.id.clone();
                match self.entries.iter_mut().find(|e| e.id == id) {
                    Some(slot) => {
                        *slot = entry;
                        Reconciliation::Merged { id }
                    }
                    None => Reconciliation::Ignored { id },
                }
            }
            ServerUpdate::Patch(record) => {
                let id = record.id.clone();
                match self.entries.iter_mut().find(|e| e.id == id) {
                    Some(slot) => {
                        slot.merge(record);
                        Reconciliation::Merged { id }
                    }
                    None => Reconciliation::Ignored { id },
                }
            }
        }
    }

    fn replace_all(&mut self, entries: Vec<Entry>) {
        let mut unique: Vec<Entry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if unique.iter().any(|e| e.id == entry.id) {
                tracing::warn!(id = %entry.id, "duplicate id in server list; keeping first");
                continue;
            }
            unique.push(entry);
        }
        self.entries = unique;
        self.refreshed_at = Some(Utc::now());
    }
}
