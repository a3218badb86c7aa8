//! REST implementation of the remote collaborators.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use clinic_core::{
    ClientConfig, CrmSettingsRecord, EntryId, EntryPatch, EntryRecord, ImageKind, LogoUpload,
    SettingsUpdate,
};

use crate::error::ServiceError;
use crate::protocol::{Endpoint, PatientRef, RoleCycleResponse, UpdateRequest, UserRef};
use crate::service::{DirectoryService, SettingsService};

/// JSON-over-HTTP client for the clinic API.
///
/// Any non-2xx status is a [`ServiceError::Rejected`] regardless of body.
#[derive(Debug, Clone)]
pub struct HttpAdminClient {
    http: Client,
    base: Url,
}

impl HttpAdminClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let base = config.parsed_base_url()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, endpoint: Endpoint) -> Result<Url, ServiceError> {
        self.base
            .join(endpoint.path())
            .map_err(|e| ServiceError::Client(format!("cannot build {endpoint} URL: {e}")))
    }

    fn get(&self, endpoint: Endpoint) -> Result<RequestBuilder, ServiceError> {
        Ok(self.http.get(self.url(endpoint)?))
    }

    fn post(&self, endpoint: Endpoint) -> Result<RequestBuilder, ServiceError> {
        Ok(self.http.post(self.url(endpoint)?))
    }

    fn put(&self, endpoint: Endpoint) -> Result<RequestBuilder, ServiceError> {
        Ok(self.http.put(self.url(endpoint)?))
    }

    /// Send and return the raw body of a 2xx response.
    async fn send_raw(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, ServiceError> {
        tracing::debug!(%endpoint, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Rejected {
                endpoint,
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::transport(endpoint, e))?;
        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let body = self.send_raw(endpoint, request).await?;
        serde_json::from_slice(&body).map_err(|e| ServiceError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    /// Like [`send_json`](Self::send_json) but an empty body is `Null`.
    async fn send_ack(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Value, ServiceError> {
        let body = self.send_raw(endpoint, request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| ServiceError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DirectoryService for HttpAdminClient {
    async fn list_entries(&self) -> Result<Vec<EntryRecord>, ServiceError> {
        let request = self.get(Endpoint::ListEntries)?;
        self.send_json(Endpoint::ListEntries, request).await
    }

    async fn list_archived(&self) -> Result<Vec<EntryRecord>, ServiceError> {
        let request = self.get(Endpoint::ListArchived)?;
        self.send_json(Endpoint::ListArchived, request).await
    }

    async fn cycle_role(&self, id: &EntryId) -> Result<RoleCycleResponse, ServiceError> {
        let request = self
            .post(Endpoint::CycleRole)?
            .json(&PatientRef { patient_id: id });
        self.send_json(Endpoint::CycleRole, request).await
    }

    async fn archive_entry(&self, id: &EntryId) -> Result<Vec<EntryRecord>, ServiceError> {
        let request = self
            .post(Endpoint::ArchiveEntry)?
            .json(&PatientRef { patient_id: id });
        self.send_json(Endpoint::ArchiveEntry, request).await
    }

    async fn update_entry(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
    ) -> Result<EntryRecord, ServiceError> {
        let request = self.put(Endpoint::UpdateEntry)?.json(&UpdateRequest {
            patient_id: id,
            patch,
        });
        self.send_json(Endpoint::UpdateEntry, request).await
    }

    async fn fetch_entry(&self, id: &EntryId) -> Result<EntryRecord, ServiceError> {
        let request = self.post(Endpoint::FetchEntry)?.json(&UserRef { user_id: id });
        self.send_json(Endpoint::FetchEntry, request).await
    }
}

#[async_trait]
impl SettingsService for HttpAdminClient {
    async fn fetch_settings(&self) -> Result<CrmSettingsRecord, ServiceError> {
        let request = self.get(Endpoint::FetchSettings)?;
        self.send_json(Endpoint::FetchSettings, request).await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<Value, ServiceError> {
        let request = self.post(Endpoint::UpdateSettings)?.json(update);
        self.send_ack(Endpoint::UpdateSettings, request).await
    }

    async fn upload_image(
        &self,
        kind: ImageKind,
        image: &LogoUpload,
    ) -> Result<Value, ServiceError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image_mime(&image.file_name))
            .map_err(|e| ServiceError::Client(format!("invalid image part: {e}")))?;
        let form = Form::new()
            .part("image", part)
            .text("imageType", kind.type_tag());
        let request = self.post(Endpoint::UploadImage)?.multipart(form);
        self.send_ack(Endpoint::UploadImage, request).await
    }
}

fn image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
