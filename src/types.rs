use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: i64,
    #[serde(default)]
    pub scope: String,
}

/// State nonce and PKCE verifier generated right before redirecting the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub state: String,
    pub code_verifier: String,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub state: String,
    pub code_challenge: String,
}

/// Query parameters the authorization server appends to the redirect url.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    pub fn is_present(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    RedirectRequired { url: String },
}

/// Outcome of the user-facing `auth` entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthReport {
    pub success: bool,
    pub message: String,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub item_id: String,
    pub video_id: String,
    pub position: i64,
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistItemPage {
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Added(AddOutcome),
    Removed(RemoveOutcome),
}

#[derive(Tabled)]
pub struct PlaylistItemTableRow {
    pub position: i64,
    pub video: String,
    pub item: String,
}

// Wire types of the YouTube Data API `playlistItems` resource.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItemResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemResource {
    pub id: String,
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub position: i64,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub kind: String,
    #[serde(default)]
    pub video_id: String,
}

impl From<PlaylistItemResource> for PlaylistItem {
    fn from(resource: PlaylistItemResource) -> Self {
        PlaylistItem {
            item_id: resource.id,
            video_id: resource.snippet.resource_id.video_id,
            position: resource.snippet.position,
        }
    }
}

/// Body of `POST /playlistItems?part=snippet`. No position is sent, so the
/// platform appends the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertPlaylistItemRequest {
    pub snippet: InsertSnippet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSnippet {
    pub playlist_id: String,
    pub resource_id: ResourceIdRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdRef {
    pub kind: String,
    pub video_id: String,
}

impl InsertPlaylistItemRequest {
    pub fn new(playlist_id: &str, video_id: &str) -> Self {
        InsertPlaylistItemRequest {
            snippet: InsertSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceIdRef {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.snippet.playlist_id
    }

    pub fn video_id(&self) -> &str {
        &self.snippet.resource_id.video_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlaylistItemRequest {
    pub item_id: String,
}

impl DeletePlaylistItemRequest {
    pub fn new(item_id: &str) -> Self {
        DeletePlaylistItemRequest {
            item_id: item_id.to_string(),
        }
    }
}

/// Body of a successful response from the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
}

impl TokenResponse {
    pub fn into_token(self, now: i64) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: now.saturating_add(self.expires_in.unwrap_or(3600)),
            scope: self.scope,
        }
    }
}
