use tracing::{debug, error, info};

use crate::{
    config::Config,
    error::MutationError,
    management::auth::AuthController,
    types::{
        AddOutcome, DeletePlaylistItemRequest, InsertPlaylistItemRequest, PlaylistItem,
        RemoveOutcome,
    },
    youtube::{AuthProvider, PlaylistApi},
};

/// Items requested per `playlistItems` page.
pub const PAGE_SIZE: u32 = 25;

/// The explicit id wins, then the configured default. A blank explicit id is
/// rejected rather than replaced by the default.
pub fn resolve_playlist_id(explicit: Option<&str>, config: &Config) -> Result<String, MutationError> {
    match explicit.map(str::trim) {
        Some("") => Err(MutationError::Empty("playlist id")),
        Some(id) => Ok(id.to_string()),
        None => config
            .default_playlist_id
            .clone()
            .ok_or(MutationError::NoPlaylistId),
    }
}

fn require_video_id(video_id: &str) -> Result<&str, MutationError> {
    match video_id.trim() {
        "" => Err(MutationError::Empty("video id")),
        id => Ok(id),
    }
}

/// Last item carrying `video_id`, in snapshot order.
///
/// A playlist can hold the same video twice; removal then targets the last
/// occurrence, not the first.
pub fn find_last_match<'a>(items: &'a [PlaylistItem], video_id: &str) -> Option<&'a PlaylistItem> {
    items.iter().rev().find(|item| item.video_id == video_id)
}

/// Idempotent add/remove on top of a [`PlaylistApi`].
///
/// Holds no playlist state: every mutation fetches a fresh snapshot first.
pub struct PlaylistMutator<A> {
    api: A,
}

impl<A: PlaylistApi> PlaylistMutator<A> {
    pub fn new(api: A) -> Self {
        PlaylistMutator { api }
    }

    /// Follows continuation tokens until the platform stops returning one.
    pub fn list_all_items(
        &self,
        access_token: &str,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, MutationError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .api
                .list_items(access_token, playlist_id, page_token.as_deref(), PAGE_SIZE)
                .map_err(|e| {
                    error!("listing playlist {} failed: {}", playlist_id, e);
                    MutationError::from(e)
                })?;

            items.extend(page.items);
            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!("playlist {} holds {} items", playlist_id, items.len());
        Ok(items)
    }

    /// Resolves the playlist, authenticates and returns the current items.
    pub fn snapshot<P: AuthProvider>(
        &self,
        auth: &mut AuthController<P>,
        config: &Config,
        playlist_id: Option<&str>,
    ) -> Result<(String, Vec<PlaylistItem>), MutationError> {
        let playlist_id = resolve_playlist_id(playlist_id, config)?;
        auth.ensure_authenticated(false, None)?;
        let items = self.list_all_items(auth.access_token()?, &playlist_id)?;
        Ok((playlist_id, items))
    }

    pub fn add_video<P: AuthProvider>(
        &self,
        auth: &mut AuthController<P>,
        config: &Config,
        video_id: &str,
        playlist_id: Option<&str>,
    ) -> Result<AddOutcome, MutationError> {
        let video_id = require_video_id(video_id)?;
        let (playlist_id, items) = self.snapshot(auth, config, playlist_id)?;

        if items.iter().any(|item| item.video_id == video_id) {
            info!("video {} already in playlist {}", video_id, playlist_id);
            return Ok(AddOutcome::AlreadyPresent);
        }

        let request = InsertPlaylistItemRequest::new(&playlist_id, video_id);
        self.api
            .insert_item(auth.access_token()?, &request)
            .map_err(|e| {
                error!(
                    "adding video {} to playlist {} failed: {}",
                    video_id, playlist_id, e
                );
                MutationError::from(e)
            })?;

        info!("video {} added to playlist {}", video_id, playlist_id);
        Ok(AddOutcome::Inserted)
    }

    pub fn remove_video<P: AuthProvider>(
        &self,
        auth: &mut AuthController<P>,
        config: &Config,
        video_id: &str,
        playlist_id: Option<&str>,
    ) -> Result<RemoveOutcome, MutationError> {
        let video_id = require_video_id(video_id)?;
        let (playlist_id, items) = self.snapshot(auth, config, playlist_id)?;

        let Some(target) = find_last_match(&items, video_id) else {
            info!("video {} not in playlist {}", video_id, playlist_id);
            return Ok(RemoveOutcome::NotPresent);
        };

        let request = DeletePlaylistItemRequest::new(&target.item_id);
        self.api
            .delete_item(auth.access_token()?, &request)
            .map_err(|e| {
                error!(
                    "removing item {} from playlist {} failed: {}",
                    target.item_id, playlist_id, e
                );
                MutationError::from(e)
            })?;

        info!(
            "video {} (item {}) removed from playlist {}",
            video_id, target.item_id, playlist_id
        );
        Ok(RemoveOutcome::Removed)
    }
}
