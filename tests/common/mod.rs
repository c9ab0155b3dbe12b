#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use chrono::{DateTime, Local, TimeZone};
use tempfile::TempDir;
use tubelist::{
    config::Config,
    error::ApiError,
    management::{AuthController, PendingAuthStore, PlaylistMutator, TokenStore},
    session::Session,
    types::{
        AuthorizationRequest, DeletePlaylistItemRequest, InsertPlaylistItemRequest, PlaylistItem,
        PlaylistItemPage, Token,
    },
    utils::{Clock, SharedClock},
    youtube::{AuthProvider, PlaylistApi},
};

pub const NOW: i64 = 1_760_000_000;

pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn at(timestamp: i64) -> Arc<Self> {
        Arc::new(FixedClock(AtomicI64::new(timestamp)))
    }

    pub fn set(&self, timestamp: i64) {
        self.0.store(timestamp, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        Local
            .timestamp_opt(self.0.load(Ordering::SeqCst), 0)
            .single()
            .unwrap()
    }
}

pub fn token(access: &str, refresh: Option<&str>, expires_at: i64) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_at,
        scope: "https://www.googleapis.com/auth/youtube".to_string(),
    }
}

pub fn item(item_id: &str, video_id: &str, position: i64) -> PlaylistItem {
    PlaylistItem {
        item_id: item_id.to_string(),
        video_id: video_id.to_string(),
        position,
    }
}

pub fn config(default_playlist: Option<&str>) -> Config {
    let playlist = default_playlist
        .map(|p| format!(r#","playlistId":"{}""#, p))
        .unwrap_or_default();
    Config::from_json_str(&format!(
        r#"{{"clientId":"id","clientSecret":"secret","redirectUrl":"http://127.0.0.1:8765/callback"{}}}"#,
        playlist
    ))
    .unwrap()
}

#[derive(Default)]
pub struct FakeAuthProvider {
    pub exchange_result: RefCell<Option<Token>>,
    pub refresh_result: RefCell<Option<Token>>,
    pub refresh_error: Cell<bool>,
    pub exchanges: RefCell<Vec<(String, String)>>,
    pub refreshes: RefCell<Vec<String>>,
    pub authorization_requests: RefCell<Vec<AuthorizationRequest>>,
}

impl FakeAuthProvider {
    pub fn exchanging_to(token: Token) -> Self {
        let provider = FakeAuthProvider::default();
        *provider.exchange_result.borrow_mut() = Some(token);
        provider
    }

    pub fn refreshing_to(token: Token) -> Self {
        let provider = FakeAuthProvider::default();
        *provider.refresh_result.borrow_mut() = Some(token);
        provider
    }
}

impl AuthProvider for FakeAuthProvider {
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, ApiError> {
        self.authorization_requests
            .borrow_mut()
            .push(request.clone());
        Ok(format!(
            "https://accounts.example.com/auth?state={}",
            request.state
        ))
    }

    fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, ApiError> {
        self.exchanges
            .borrow_mut()
            .push((code.to_string(), code_verifier.to_string()));
        self.exchange_result
            .borrow()
            .clone()
            .ok_or_else(|| ApiError::Status {
                status: 400,
                message: "invalid_grant".to_string(),
            })
    }

    fn refresh(&self, refresh_token: &str) -> Result<Option<Token>, ApiError> {
        self.refreshes.borrow_mut().push(refresh_token.to_string());
        if self.refresh_error.get() {
            return Err(ApiError::Decode("connection reset".to_string()));
        }
        Ok(self.refresh_result.borrow().clone())
    }
}

/// In-memory playlist honouring `max_results` with offset page tokens.
#[derive(Default)]
pub struct FakePlaylistApi {
    pub items: RefCell<Vec<PlaylistItem>>,
    pub list_calls: RefCell<Vec<(Option<String>, u32)>>,
    pub inserts: RefCell<Vec<InsertPlaylistItemRequest>>,
    pub deletes: RefCell<Vec<DeletePlaylistItemRequest>>,
    pub access_tokens: RefCell<Vec<String>>,
    pub fail_list: Cell<bool>,
    pub fail_insert: Cell<bool>,
    next_id: Cell<u32>,
}

impl FakePlaylistApi {
    pub fn with_items(items: Vec<PlaylistItem>) -> Self {
        let api = FakePlaylistApi::default();
        *api.items.borrow_mut() = items;
        api
    }

    pub fn video_ids(&self) -> Vec<String> {
        self.items
            .borrow()
            .iter()
            .map(|i| i.video_id.clone())
            .collect()
    }
}

impl PlaylistApi for FakePlaylistApi {
    fn list_items(
        &self,
        access_token: &str,
        _playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemPage, ApiError> {
        self.access_tokens
            .borrow_mut()
            .push(access_token.to_string());
        self.list_calls
            .borrow_mut()
            .push((page_token.map(str::to_string), max_results));
        if self.fail_list.get() {
            return Err(ApiError::Status {
                status: 403,
                message: "quotaExceeded".to_string(),
            });
        }

        let offset: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let items = self.items.borrow();
        let end = (offset + max_results as usize).min(items.len());
        Ok(PlaylistItemPage {
            items: items[offset..end].to_vec(),
            next_page_token: (end < items.len()).then(|| end.to_string()),
        })
    }

    fn insert_item(
        &self,
        _access_token: &str,
        request: &InsertPlaylistItemRequest,
    ) -> Result<(), ApiError> {
        if self.fail_insert.get() {
            return Err(ApiError::Status {
                status: 404,
                message: "playlistNotFound".to_string(),
            });
        }
        self.inserts.borrow_mut().push(request.clone());

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let mut items = self.items.borrow_mut();
        let position = items.len() as i64;
        items.push(item(&format!("new-{}", id), request.video_id(), position));
        Ok(())
    }

    fn delete_item(
        &self,
        _access_token: &str,
        request: &DeletePlaylistItemRequest,
    ) -> Result<(), ApiError> {
        self.deletes.borrow_mut().push(request.clone());
        let mut items = self.items.borrow_mut();
        let before = items.len();
        items.retain(|i| i.item_id != request.item_id);
        if items.len() == before {
            return Err(ApiError::Status {
                status: 404,
                message: "playlistItemNotFound".to_string(),
            });
        }
        Ok(())
    }
}

pub fn token_store(dir: &TempDir) -> TokenStore {
    TokenStore::new(dir.path().join("cache/token.json"))
}

pub fn pending_store(dir: &TempDir) -> PendingAuthStore {
    PendingAuthStore::new(dir.path().join("cache/pending_auth.json"))
}

pub fn controller<'a>(
    dir: &TempDir,
    provider: &'a FakeAuthProvider,
    clock: &Arc<FixedClock>,
) -> AuthController<&'a FakeAuthProvider> {
    let clock: SharedClock = clock.clone();
    AuthController::new(
        provider,
        token_store(dir),
        pending_store(dir),
        clock,
    )
}

pub fn mutator(api: &FakePlaylistApi) -> PlaylistMutator<&FakePlaylistApi> {
    PlaylistMutator::new(api)
}

pub fn session<'a>(
    dir: &TempDir,
    config: Config,
    provider: &'a FakeAuthProvider,
    api: &'a FakePlaylistApi,
    clock: &Arc<FixedClock>,
) -> Session<&'a FakeAuthProvider, &'a FakePlaylistApi> {
    let shared: SharedClock = clock.clone();
    Session::new(
        config,
        provider,
        api,
        token_store(dir),
        pending_store(dir),
        shared,
    )
}

/// Writes a valid token so that mutations can run without the browser flow.
pub fn authorize(dir: &TempDir) {
    token_store(dir)
        .save(&token("ya29.valid", Some("1//refresh"), NOW + 3600))
        .unwrap();
}
