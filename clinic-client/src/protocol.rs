//! REST endpoints and JSON bodies of the clinic API.

use std::fmt;

use serde::{Deserialize, Serialize};

use clinic_core::{EntryId, EntryPatch, EntryRecord};

/// One REST operation. Paths are relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListEntries,
    ListArchived,
    CycleRole,
    ArchiveEntry,
    UpdateEntry,
    FetchEntry,
    FetchSettings,
    UpdateSettings,
    UploadImage,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ListEntries => "patient/getall",
            Endpoint::ListArchived => "patient/archived",
            Endpoint::CycleRole => "patient/switch-role-cyclic",
            Endpoint::ArchiveEntry => "patient/archiver",
            Endpoint::UpdateEntry => "patient/update",
            Endpoint::FetchEntry => "patient/getbyid",
            Endpoint::FetchSettings => "crm/settings",
            Endpoint::UpdateSettings => "crm/updateSettings",
            Endpoint::UploadImage => "crm/uploadImage",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::ListEntries => "listEntries",
            Endpoint::ListArchived => "listArchived",
            Endpoint::CycleRole => "cycleRole",
            Endpoint::ArchiveEntry => "archiveEntry",
            Endpoint::UpdateEntry => "updateEntry",
            Endpoint::FetchEntry => "fetchById",
            Endpoint::FetchSettings => "fetchSettings",
            Endpoint::UpdateSettings => "updateSettings",
            Endpoint::UploadImage => "uploadImage",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `{ "patientId": id }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatientRef<'a> {
    pub patient_id: &'a EntryId,
}

/// `{ "userId": id }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRef<'a> {
    pub user_id: &'a EntryId,
}

/// `{ "patientId": id, ...patch }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRequest<'a> {
    pub patient_id: &'a EntryId,
    #[serde(flatten)]
    pub patch: &'a EntryPatch,
}

/// The switch-role endpoint answers either with the changed record or with
/// the whole list, depending on server version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleCycleResponse {
    Many(Vec<EntryRecord>),
    One(EntryRecord),
}
