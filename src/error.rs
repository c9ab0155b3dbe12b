//! Error taxonomy shared by the configuration, storage, authorization and
//! playlist layers.
//!
//! Every error keeps the message of the collaborator that produced it so the
//! caller can diagnose the failure without consulting the log.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required config field `{0}`")]
    MissingField(&'static str),

    #[error("invalid redirect url `{url}`: {reason}")]
    InvalidRedirectUrl { url: String, reason: String },

    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot load environment file: {0}")]
    Env(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stored record at {path} is malformed: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by an [`AuthProvider`](crate::youtube::AuthProvider) or
/// [`PlaylistApi`](crate::youtube::PlaylistApi) implementation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("platform returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization state mismatch (possible CSRF), refusing to exchange code")]
    StateMismatch,

    #[error("authentication required, run `tubelist auth` first")]
    AuthenticationRequired,

    #[error("token refresh failed: {0}, run `tubelist auth` to authorize again")]
    RefreshFailed(String),

    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("authorization denied by the server: {0}")]
    Denied(String),

    #[error("authorization provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("no playlist id given and no default playlist configured")]
    NoPlaylistId,

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("platform error: {0}")]
    Platform(String),
}

impl From<ApiError> for MutationError {
    fn from(err: ApiError) -> Self {
        MutationError::Platform(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot bind callback server: {0}")]
    Bind(#[source] std::io::Error),

    #[error("no authorization callback received within {0:?}")]
    Timeout(std::time::Duration),

    #[error("callback server stopped before a callback arrived")]
    Closed,
}
