//! Banner image and promo video settings.

use kaushalya_core::{MediaSettings, MediaUpload, Validate};
use reqwest::multipart::{Form, Part};

use crate::client::ApiClient;
use crate::error::{ClientError, SyncError};
use crate::sync::MutationOutcome;

const LATEST_PATH: &str = "/media/latest";
const UPLOAD_PATH: &str = "/media/upload";

/// Mirror of the singleton "latest media" record.
#[derive(Debug, Clone)]
pub struct MediaController {
    client: ApiClient,
    current: Option<MediaSettings>,
}

impl MediaController {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current: None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&MediaSettings> {
        self.current.as_ref()
    }

    /// Fetches the latest saved media. A response without `data` means
    /// nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Client`] on transport failure, `success: false`,
    /// or a `data` payload that is not a media record. Local state is kept.
    pub async fn load(&mut self) -> Result<Option<&MediaSettings>, SyncError> {
        let settings = match self.client.get(LATEST_PATH).await {
            Ok(envelope) => envelope.decode::<MediaSettings>("media/latest"),
            Err(e) => Err(e),
        };
        match settings {
            Ok(settings) => {
                self.current = settings;
                Ok(self.current.as_ref())
            }
            Err(e) => {
                tracing::warn!(error = %e, "media load failed; keeping previous settings");
                Err(e.into())
            }
        }
    }

    /// Uploads the selected files as one multipart request, then reloads.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Validation`] before any request when nothing is
    ///   selected or a file has the wrong type.
    /// - [`SyncError::Client`] when a file cannot be read or the upload fails.
    pub async fn upload(&mut self, upload: &MediaUpload) -> Result<MutationOutcome, SyncError> {
        upload.validate()?;

        let mut form = Form::new();
        for (kind, path, mime) in upload.parts() {
            let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map_or_else(|| kind.field_name().to_owned(), |n| n.to_string_lossy().into_owned());
            tracing::debug!(field = kind.field_name(), %file_name, size = bytes.len(), "attaching media");
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(mime)
                .map_err(ClientError::from)?;
            form = form.part(kind.field_name(), part);
        }

        let envelope = self.client.post_multipart(UPLOAD_PATH, form).await?;
        tracing::info!("media uploaded");
        let refreshed = self.load().await.is_ok();
        Ok(MutationOutcome {
            message: envelope.message,
            refreshed,
        })
    }
}
