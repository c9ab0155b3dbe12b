//! The object callers work with.
//!
//! A [`Session`] owns the configuration, the authorization controller and
//! the playlist mutator. It is built once per process and passed
//! around by reference; there is no global client state.

use std::sync::Arc;

use tracing::{error, warn};

use crate::{
    config::{self, Config},
    error::{AuthError, MutationError},
    management::{AuthController, AuthState, PendingAuthStore, PlaylistMutator, TokenStore},
    types::{AuthReport, AuthStatus, CallbackParams, MutationOutcome, PlaylistItem},
    utils::{SharedClock, SystemClock},
    youtube::{AuthProvider, GoogleAuthProvider, PlaylistApi, YouTubePlaylistApi},
};

pub struct Session<P, A> {
    config: Config,
    auth: AuthController<P>,
    playlists: PlaylistMutator<A>,
}

impl Session<GoogleAuthProvider, YouTubePlaylistApi> {
    /// Session against the real Google endpoints with the on-disk stores in
    /// the local data directory.
    pub fn open(config: Config) -> Self {
        let provider = GoogleAuthProvider::new(&config);
        let api = YouTubePlaylistApi::new(&config);
        Session::new(
            config,
            provider,
            api,
            TokenStore::new(config::token_path()),
            PendingAuthStore::new(config::pending_auth_path()),
            Arc::new(SystemClock),
        )
    }
}

impl<P: AuthProvider, A: PlaylistApi> Session<P, A> {
    pub fn new(
        config: Config,
        provider: P,
        api: A,
        tokens: TokenStore,
        pending: PendingAuthStore,
        clock: SharedClock,
    ) -> Self {
        let auth = AuthController::new(provider, tokens, pending, clock);
        let playlists = PlaylistMutator::new(api);
        Session {
            config,
            auth,
            playlists,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    /// Interactive authorization: may ask the caller to redirect the user.
    pub fn authenticate(
        &mut self,
        callback: Option<&CallbackParams>,
    ) -> Result<AuthStatus, AuthError> {
        self.auth.ensure_authenticated(true, callback)
    }

    /// User-facing variant of [`Session::authenticate`]: every outcome is a
    /// report with a readable message.
    ///
    /// A stored token whose refresh is rejected does not end the flow here:
    /// the user asked to authorize, so authorization starts over. The stored
    /// token is only replaced once a new code has been exchanged.
    pub fn auth(&mut self, callback: Option<&CallbackParams>) -> AuthReport {
        let result = match self.authenticate(callback) {
            Err(AuthError::RefreshFailed(reason)) => {
                warn!("stored authorization rejected ({}), authorizing again", reason);
                self.auth.authorize(callback)
            }
            other => other,
        };

        match result {
            Ok(AuthStatus::Authenticated) => AuthReport {
                success: true,
                message: "Authenticated.".to_string(),
                redirect_url: None,
            },
            Ok(AuthStatus::RedirectRequired { url }) => AuthReport {
                success: false,
                message: "Authorization required, open the redirect url to continue.".to_string(),
                redirect_url: Some(url),
            },
            Err(e) => {
                error!("authentication failed: {}", e);
                AuthReport {
                    success: false,
                    message: e.to_string(),
                    redirect_url: None,
                }
            }
        }
    }

    pub fn reset_auth(&mut self) -> Result<(), AuthError> {
        self.auth.reset()
    }

    pub fn list_items(
        &mut self,
        playlist_id: Option<&str>,
    ) -> Result<Vec<PlaylistItem>, MutationError> {
        let (_, items) = self
            .playlists
            .snapshot(&mut self.auth, &self.config, playlist_id)?;
        Ok(items)
    }

    pub fn add_video(
        &mut self,
        video_id: &str,
        playlist_id: Option<&str>,
    ) -> Result<Chain<'_, P, A>, MutationError> {
        let outcome = self
            .playlists
            .add_video(&mut self.auth, &self.config, video_id, playlist_id)?;
        Ok(Chain {
            session: self,
            outcome: MutationOutcome::Added(outcome),
        })
    }

    pub fn remove_video(
        &mut self,
        video_id: &str,
        playlist_id: Option<&str>,
    ) -> Result<Chain<'_, P, A>, MutationError> {
        let outcome = self
            .playlists
            .remove_video(&mut self.auth, &self.config, video_id, playlist_id)?;
        Ok(Chain {
            session: self,
            outcome: MutationOutcome::Removed(outcome),
        })
    }

    /// `true` when the video is in the playlist afterwards. Errors are
    /// logged and reported as `false`.
    pub fn add(&mut self, video_id: &str, playlist_id: Option<&str>) -> bool {
        match self.add_video(video_id, playlist_id) {
            Ok(_) => true,
            Err(e) => {
                error!("add {} failed: {}", video_id, e);
                false
            }
        }
    }

    /// `true` when the video is not in the playlist afterwards. Errors are
    /// logged and reported as `false`.
    pub fn remove(&mut self, video_id: &str, playlist_id: Option<&str>) -> bool {
        match self.remove_video(video_id, playlist_id) {
            Ok(_) => true,
            Err(e) => {
                error!("remove {} failed: {}", video_id, e);
                false
            }
        }
    }
}

/// Result of a mutation that can be followed by another one.
///
/// Chaining is a convenience only: calls are not transactional, and the
/// first error ends the chain.
pub struct Chain<'s, P, A> {
    session: &'s mut Session<P, A>,
    outcome: MutationOutcome,
}

impl<'s, P: AuthProvider, A: PlaylistApi> Chain<'s, P, A> {
    pub fn outcome(&self) -> MutationOutcome {
        self.outcome
    }

    pub fn add_video(
        self,
        video_id: &str,
        playlist_id: Option<&str>,
    ) -> Result<Chain<'s, P, A>, MutationError> {
        Session::add_video(self.session, video_id, playlist_id)
    }

    pub fn remove_video(
        self,
        video_id: &str,
        playlist_id: Option<&str>,
    ) -> Result<Chain<'s, P, A>, MutationError> {
        Session::remove_video(self.session, video_id, playlist_id)
    }

    pub fn into_session(self) -> &'s mut Session<P, A> {
        self.session
    }
}
