//! Domain types for the clinic directory and CRM settings.
//!
//! Wire types (`*Record`) mirror the server's JSON and keep every display
//! field optional; [`Entry`] is the normalized form the list view holds.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RecordError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Server-assigned identifier of a directory entry.
///
/// Payloads carry it either as a JSON string or as a number; both decode to
/// the same text form. Requests always send the text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<u64> for EntryId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// ---------------------------------------------------------------------------
// Access level
// ---------------------------------------------------------------------------

/// Role of a directory entry. Closed set; the server rotates it with
/// [`AccessLevel::next`] on each switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Admin,
    Manager,
    User,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [AccessLevel::Admin, AccessLevel::Manager, AccessLevel::User];

    /// admin → manager → user → admin
    pub fn next(self) -> Self {
        match self {
            AccessLevel::Admin => AccessLevel::Manager,
            AccessLevel::Manager => AccessLevel::User,
            AccessLevel::User => AccessLevel::Admin,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Admin => "admin",
            AccessLevel::Manager => "manager",
            AccessLevel::User => "user",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Directory entries
// ---------------------------------------------------------------------------

/// A patient / team member record exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireEntry", rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: EntryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "prenom", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "avatar", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
}

/// Raw payload shape. Mongo-style documents carry `_id`, transformed list
/// rows carry `id`, some carry both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    id: Option<EntryId>,
    #[serde(rename = "_id")]
    object_id: Option<EntryId>,
    full_name: Option<String>,
    prenom: Option<String>,
    nom: Option<String>,
    phone: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
    address: Option<String>,
    avatar: Option<String>,
    access_level: Option<AccessLevel>,
}

impl TryFrom<WireEntry> for EntryRecord {
    type Error = RecordError;

    fn try_from(wire: WireEntry) -> Result<Self, Self::Error> {
        let id = wire.id.or(wire.object_id).ok_or(RecordError::MissingId)?;
        Ok(Self {
            id,
            full_name: wire.full_name,
            first_name: wire.prenom,
            last_name: wire.nom,
            phone: wire.phone.or(wire.phone_number),
            email: wire.email,
            address: wire.address,
            avatar_url: wire.avatar,
            access_level: wire.access_level,
        })
    }
}

/// One row of the directory list, normalized.
///
/// `address` is never absent: a null or missing server value becomes `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub access_level: AccessLevel,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = RecordError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let access_level = record.access_level.ok_or_else(|| RecordError::MissingAccessLevel {
            id: record.id.0.clone(),
        })?;
        let full_name = match record.full_name {
            Some(name) => name,
            None => joined_name(record.first_name.as_deref(), record.last_name.as_deref()),
        };
        Ok(Self {
            id: record.id,
            full_name,
            phone: record.phone.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            address: record.address.unwrap_or_default(),
            avatar_url: record.avatar_url,
            access_level,
        })
    }
}

impl Entry {
    /// Overlay the fields `record` carries; fields it omits keep their
    /// current value. A name given only as `prenom`/`nom` replaces
    /// `full_name` when either part is present.
    pub fn merge(&mut self, record: EntryRecord) {
        if let Some(name) = record.full_name {
            self.full_name = name;
        } else if record.first_name.is_some() || record.last_name.is_some() {
            self.full_name =
                joined_name(record.first_name.as_deref(), record.last_name.as_deref());
        }
        if let Some(phone) = record.phone {
            self.phone = phone;
        }
        if let Some(email) = record.email {
            self.email = email;
        }
        if let Some(address) = record.address {
            self.address = address;
        }
        if record.avatar_url.is_some() {
            self.avatar_url = record.avatar_url;
        }
        if let Some(level) = record.access_level {
            self.access_level = level;
        }
    }
}

fn joined_name(first: Option<&str>, last: Option<&str>) -> String {
    [first.unwrap_or(""), last.unwrap_or("")]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Subset of an entry's mutable fields; absent fields are left untouched
/// server-side and omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryPatch {
    #[serde(rename = "prenom", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

// ---------------------------------------------------------------------------
// CRM settings
// ---------------------------------------------------------------------------

/// Branding and contact settings as stored server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmSettingsRecord {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub logo_image: Option<String>,
    #[serde(default)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of a settings update. The logo travels separately as an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub color: String,
    pub instagram_url: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
}

/// Which CRM image slot an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Logo,
}

impl ImageKind {
    /// Value of the `imageType` multipart field.
    pub fn type_tag(self) -> &'static str {
        match self {
            ImageKind::Logo => "logoImage",
        }
    }
}

/// A new image chosen for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for LogoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
