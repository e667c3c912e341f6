use kaushalya_core::ValidationError;
use thiserror::Error;

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with `success: false` or an error envelope.
    #[error("backend error: {0}")]
    Api(String),

    /// Non-2xx response without a usable envelope.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Reading a file selected for upload.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a [`crate::SyncController`] operation.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Client-side validation failed; nothing was sent.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The record may never be deleted.
    #[error("{resource} {id} is protected and cannot be deleted")]
    Protected { resource: &'static str, id: String },

    /// The operator declined the confirmation prompt.
    #[error("cancelled")]
    Declined,

    /// The resource has no endpoint for this operation.
    #[error("{resource} does not support {operation}")]
    Unsupported {
        resource: &'static str,
        operation: &'static str,
    },

    /// A product was addressed to a grouping that is not in the loaded list.
    #[error("unknown {resource} {name:?}")]
    UnknownParent { resource: &'static str, name: String },
}

/// Sign-in and session-file failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("admin login is not configured; set KAUSHALYA_ADMIN_EMAIL and KAUSHALYA_ADMIN_PASSWORD")]
    LoginDisabled,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not signed in; run `kaushalya login` first")]
    NotSignedIn,

    #[error("session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
