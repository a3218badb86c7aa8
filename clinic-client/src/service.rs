//! Remote collaborator traits.
//!
//! The synchronizer and editors only ever see these traits; tests swap in
//! scripted implementations, the binary uses [`HttpAdminClient`](crate::HttpAdminClient).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use clinic_core::{
    CrmSettingsRecord, EntryId, EntryPatch, EntryRecord, ImageKind, LogoUpload, SettingsUpdate,
};

use crate::error::ServiceError;
use crate::protocol::RoleCycleResponse;

/// Backing store of the patient / team directory.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Active entries, in server order.
    async fn list_entries(&self) -> Result<Vec<EntryRecord>, ServiceError>;

    /// Archived entries, in server order.
    async fn list_archived(&self) -> Result<Vec<EntryRecord>, ServiceError>;

    /// Rotate the entry's access level one step server-side.
    async fn cycle_role(&self, id: &EntryId) -> Result<RoleCycleResponse, ServiceError>;

    /// Archive the entry; returns the remaining list.
    async fn archive_entry(&self, id: &EntryId) -> Result<Vec<EntryRecord>, ServiceError>;

    async fn update_entry(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
    ) -> Result<EntryRecord, ServiceError>;

    async fn fetch_entry(&self, id: &EntryId) -> Result<EntryRecord, ServiceError>;
}

/// CRM branding and contact settings.
#[async_trait]
pub trait SettingsService: Send + Sync {
    async fn fetch_settings(&self) -> Result<CrmSettingsRecord, ServiceError>;

    /// Returns the server's confirmation payload (`Null` when the body is empty).
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<Value, ServiceError>;

    async fn upload_image(&self, kind: ImageKind, image: &LogoUpload)
        -> Result<Value, ServiceError>;
}

#[async_trait]
impl<T: DirectoryService + ?Sized> DirectoryService for Arc<T> {
    async fn list_entries(&self) -> Result<Vec<EntryRecord>, ServiceError> {
        (**self).list_entries().await
    }

    async fn list_archived(&self) -> Result<Vec<EntryRecord>, ServiceError> {
        (**self).list_archived().await
    }

    async fn cycle_role(&self, id: &EntryId) -> Result<RoleCycleResponse, ServiceError> {
        (**self).cycle_role(id).await
    }

    async fn archive_entry(&self, id: &EntryId) -> Result<Vec<EntryRecord>, ServiceError> {
        (**self).archive_entry(id).await
    }

    async fn update_entry(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
    ) -> Result<EntryRecord, ServiceError> {
        (**self).update_entry(id, patch).await
    }

    async fn fetch_entry(&self, id: &EntryId) -> Result<EntryRecord, ServiceError> {
        (**self).fetch_entry(id).await
    }
}

#[async_trait]
impl<T: SettingsService + ?Sized> SettingsService for Arc<T> {
    async fn fetch_settings(&self) -> Result<CrmSettingsRecord, ServiceError> {
        (**self).fetch_settings().await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<Value, ServiceError> {
        (**self).update_settings(update).await
    }

    async fn upload_image(
        &self,
        kind: ImageKind,
        image: &LogoUpload,
    ) -> Result<Value, ServiceError> {
        (**self).upload_image(kind, image).await
    }
}
