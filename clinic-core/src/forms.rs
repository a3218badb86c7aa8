//! Editable form models backing the user-detail and CRM settings screens.

use serde::Serialize;

use crate::types::{CrmSettingsRecord, EntryPatch, EntryRecord, LogoUpload, SettingsUpdate};

/// User-detail edit form. `contact` is the wire `phoneNumber`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
}

impl UserForm {
    pub fn from_record(record: &EntryRecord) -> Self {
        Self {
            first_name: record.first_name.clone().unwrap_or_default(),
            last_name: record.last_name.clone().unwrap_or_default(),
            email: record.email.clone().unwrap_or_default(),
            contact: record.phone.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
        }
    }

    /// Patch carrying every form field; the edit screen always submits the
    /// whole form.
    pub fn to_patch(&self) -> EntryPatch {
        EntryPatch {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.contact.clone()),
            address: Some(self.address.clone()),
        }
    }
}

/// Current logo state of the settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogoField {
    #[default]
    Unset,
    /// URL of the logo already stored server-side.
    Existing(String),
    /// A newly chosen file; uploaded on submit.
    Pending(LogoUpload),
}

impl LogoField {
    pub fn pending(&self) -> Option<&LogoUpload> {
        match self {
            LogoField::Pending(upload) => Some(upload),
            _ => None,
        }
    }
}

/// CRM settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrmSettingsForm {
    pub primary_color: String,
    pub logo: LogoField,
    pub instagram: String,
    pub phone: String,
    pub address: String,
    pub email: String,
}

impl CrmSettingsForm {
    /// Missing server fields become empty strings; a missing logo stays unset.
    pub fn from_record(record: CrmSettingsRecord) -> Self {
        Self {
            primary_color: record.color.unwrap_or_default(),
            logo: record
                .logo_image
                .filter(|url| !url.is_empty())
                .map_or(LogoField::Unset, LogoField::Existing),
            instagram: record.instagram_url.unwrap_or_default(),
            phone: record.phone_number.unwrap_or_default(),
            address: record.address.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
        }
    }

    pub fn to_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            color: self.primary_color.clone(),
            instagram_url: self.instagram.clone(),
            phone_number: self.phone.clone(),
            address: self.address.clone(),
            email: self.email.clone(),
        }
    }
}
