//! CRM settings edit flow.

use serde_json::Value;

use clinic_client::{ServiceError, SettingsService};
use clinic_core::{validate, CrmSettingsForm, ImageKind, LogoField, LogoUpload};

use crate::error::SyncError;

/// Outcome of both steps of a settings submit.
#[derive(Debug)]
pub struct SettingsReport {
    /// `None` when no new logo was chosen.
    pub logo: Option<Result<Value, ServiceError>>,
    pub settings: Result<Value, ServiceError>,
}

impl SettingsReport {
    pub fn is_success(&self) -> bool {
        self.settings.is_ok() && self.logo.as_ref().map_or(true, Result::is_ok)
    }
}

pub struct CrmSettingsEditor<S> {
    service: S,
    form: CrmSettingsForm,
}

impl<S: SettingsService> CrmSettingsEditor<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            form: CrmSettingsForm::default(),
        }
    }

    pub fn form(&self) -> &CrmSettingsForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CrmSettingsForm {
        &mut self.form
    }

    /// Choose a new logo; it is uploaded on the next submit.
    pub fn choose_logo(&mut self, upload: LogoUpload) {
        self.form.logo = LogoField::Pending(upload);
    }

    /// Fill the form from the server. On failure the form keeps its values.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        match self.service.fetch_settings().await {
            Ok(record) => {
                self.form = CrmSettingsForm::from_record(record);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch settings");
                Err(err.into())
            }
        }
    }

    /// Validate, upload a pending logo, then post the settings.
    ///
    /// A failed logo upload is reported in the [`SettingsReport`] but does not
    /// stop the settings update.
    pub async fn submit(&mut self) -> Result<SettingsReport, SyncError> {
        validate::settings_form(&self.form)?;

        let logo = match self.form.logo.pending() {
            Some(upload) => {
                let uploaded = self.service.upload_image(ImageKind::Logo, upload).await;
                match &uploaded {
                    Ok(ack) => {
                        tracing::info!(file = %upload.file_name, "logo uploaded");
                        self.form.logo = uploaded_logo(ack);
                    }
                    Err(err) => tracing::warn!(error = %err, "failed to upload logo"),
                }
                Some(uploaded)
            }
            None => None,
        };

        let settings = self.service.update_settings(&self.form.to_update()).await;
        match &settings {
            Ok(_) => tracing::info!("settings updated"),
            Err(err) => tracing::warn!(error = %err, "failed to update settings"),
        }

        Ok(SettingsReport { logo, settings })
    }
}

/// The stored logo URL, when the upload acknowledgement carries one.
fn uploaded_logo(ack: &Value) -> LogoField {
    ["logoImage", "url", "imageUrl"]
        .iter()
        .find_map(|key| ack.get(key).and_then(Value::as_str))
        .map_or(LogoField::Unset, |url| LogoField::Existing(url.to_string()))
}
