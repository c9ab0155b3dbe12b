//! # YouTube Integration Module
//!
//! The two capabilities the core relies on, and their blocking HTTP
//! implementations against Google's OAuth2 endpoints and the YouTube Data
//! API v3:
//!
//! ```text
//! Session (auth, add, remove)
//!          ↓
//! AuthController ── AuthProvider ── auth::GoogleAuthProvider
//! PlaylistMutator ── PlaylistApi ─── playlist::YouTubePlaylistApi
//!          ↓
//! reqwest::blocking
//! ```
//!
//! The core only sees the traits. Tests drive it with in-memory fakes.
//!
//! ## Endpoints
//!
//! - `GET {auth_url}` - consent page the user is redirected to
//! - `POST {token_url}` - code exchange and refresh
//! - `GET {api_url}/playlistItems` - paged listing, `part=snippet`
//! - `POST {api_url}/playlistItems` - append a video
//! - `DELETE {api_url}/playlistItems?id=` - remove one playlist item

pub mod auth;
pub mod playlist;

pub use auth::GoogleAuthProvider;
pub use playlist::YouTubePlaylistApi;

use crate::{
    error::ApiError,
    types::{
        AuthorizationRequest, DeletePlaylistItemRequest, InsertPlaylistItemRequest,
        PlaylistItemPage, Token,
    },
};

/// OAuth2 authorization-code capability.
pub trait AuthProvider {
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, ApiError>;

    fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, ApiError>;

    /// Returns `Ok(None)` when the server refuses the refresh token.
    fn refresh(&self, refresh_token: &str) -> Result<Option<Token>, ApiError>;

    /// A token expiring exactly now is already expired.
    fn is_expired(&self, token: &Token, now: i64) -> bool {
        token.expires_at <= now
    }
}

/// Playlist item listing and mutation capability.
pub trait PlaylistApi {
    fn list_items(
        &self,
        access_token: &str,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemPage, ApiError>;

    fn insert_item(
        &self,
        access_token: &str,
        request: &InsertPlaylistItemRequest,
    ) -> Result<(), ApiError>;

    fn delete_item(
        &self,
        access_token: &str,
        request: &DeletePlaylistItemRequest,
    ) -> Result<(), ApiError>;
}

impl<T: AuthProvider + ?Sized> AuthProvider for &T {
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, ApiError> {
        (**self).authorization_url(request)
    }

    fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, ApiError> {
        (**self).exchange_code(code, code_verifier)
    }

    fn refresh(&self, refresh_token: &str) -> Result<Option<Token>, ApiError> {
        (**self).refresh(refresh_token)
    }

    fn is_expired(&self, token: &Token, now: i64) -> bool {
        (**self).is_expired(token, now)
    }
}

impl<T: PlaylistApi + ?Sized> PlaylistApi for &T {
    fn list_items(
        &self,
        access_token: &str,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemPage, ApiError> {
        (**self).list_items(access_token, playlist_id, page_token, max_results)
    }

    fn insert_item(
        &self,
        access_token: &str,
        request: &InsertPlaylistItemRequest,
    ) -> Result<(), ApiError> {
        (**self).insert_item(access_token, request)
    }

    fn delete_item(
        &self,
        access_token: &str,
        request: &DeletePlaylistItemRequest,
    ) -> Result<(), ApiError> {
        (**self).delete_item(access_token, request)
    }
}

/// Turns a non-success response into [`ApiError::Status`] carrying the body.
pub(crate) fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
