//! User-detail edit flow: load one entry into a [`UserForm`], submit it back
//! through the list synchronizer.

use clinic_client::DirectoryService;
use clinic_core::{validate, EntryId, EntryRecord, UserForm};

use crate::error::SyncError;
use crate::synchronizer::{EntryListSynchronizer, UpdateOutcome};

#[derive(Debug, Clone)]
pub struct UserDetailEditor {
    id: EntryId,
    form: UserForm,
    record: Option<EntryRecord>,
}

impl UserDetailEditor {
    /// Editor for `id` with an empty form.
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            form: UserForm::default(),
            record: None,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.form
    }

    /// Last record received from the server.
    pub fn record(&self) -> Option<&EntryRecord> {
        self.record.as_ref()
    }

    /// Fill the form from the server. On failure the form keeps its values.
    pub async fn load<S: DirectoryService>(&mut self, service: &S) -> Result<(), SyncError> {
        match service.fetch_entry(&self.id).await {
            Ok(record) => {
                self.form = UserForm::from_record(&record);
                self.record = Some(record);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(id = %self.id, error = %err, "failed to fetch user");
                Err(err.into())
            }
        }
    }

    /// Validate, then send the whole form as an update.
    ///
    /// On success the form shows the server's values; on any failure it keeps
    /// the user's unsaved input so the submit can be retried.
    pub async fn submit<S: DirectoryService>(
        &mut self,
        sync: &EntryListSynchronizer<S>,
    ) -> Result<UpdateOutcome, SyncError> {
        if let Err(errors) = validate::user_form(&self.form) {
            tracing::debug!(id = %self.id, %errors, "user form rejected");
            return Err(errors.into());
        }

        let outcome = sync.request_update(&self.id, &self.form.to_patch()).await?;
        self.form = UserForm::from_record(&outcome.record);
        self.record = Some(outcome.record.clone());
        Ok(outcome)
    }
}
