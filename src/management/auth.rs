use tracing::{debug, error, info, warn};

use crate::{
    error::AuthError,
    management::store::{PendingAuthStore, TokenStore},
    types::{AuthStatus, AuthorizationRequest, CallbackParams, PendingAuthorization, Token},
    utils::{self, SharedClock},
    youtube::AuthProvider,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoToken,
    Valid,
    Expired,
    AwaitingRedirect,
    Exchanging,
}

/// Owns the OAuth2 token for the lifetime of a [`Session`](crate::session::Session)
/// and drives the authorization-code flow.
///
/// The redirect is split into two calls: the first returns
/// [`AuthStatus::RedirectRequired`] and persists the state nonce, a later
/// call (possibly from another process) hands in the callback parameters.
pub struct AuthController<P> {
    provider: P,
    tokens: TokenStore,
    pending_store: PendingAuthStore,
    clock: SharedClock,
    token: Option<Token>,
    pending: Option<PendingAuthorization>,
    state: AuthState,
}

impl<P: AuthProvider> AuthController<P> {
    pub fn new(
        provider: P,
        tokens: TokenStore,
        pending_store: PendingAuthStore,
        clock: SharedClock,
    ) -> Self {
        AuthController {
            provider,
            tokens,
            pending_store,
            clock,
            token: None,
            pending: None,
            state: AuthState::NoToken,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn access_token(&self) -> Result<&str, AuthError> {
        self.token
            .as_ref()
            .map(|t| t.access_token.as_str())
            .ok_or(AuthError::AuthenticationRequired)
    }

    /// Makes sure a usable access token is held.
    ///
    /// Order: in-memory token, stored token, refresh, callback exchange,
    /// redirect. Refresh failures are final; the user has to authorize
    /// again.
    pub fn ensure_authenticated(
        &mut self,
        allow_redirect: bool,
        callback: Option<&CallbackParams>,
    ) -> Result<AuthStatus, AuthError> {
        let now = self.clock.timestamp();

        if let Some(token) = &self.token {
            if !self.provider.is_expired(token, now) {
                self.state = AuthState::Valid;
                return Ok(AuthStatus::Authenticated);
            }
        }

        if let Some(stored) = self.tokens.load()? {
            self.token = Some(stored);
        }

        if let Some(token) = self.token.clone() {
            if !self.provider.is_expired(&token, now) {
                debug!("using stored access token");
                self.state = AuthState::Valid;
                return Ok(AuthStatus::Authenticated);
            }

            self.state = AuthState::Expired;
            if let Some(refresh_token) = token.refresh_token.clone() {
                self.refresh(token, &refresh_token)?;
                return Ok(AuthStatus::Authenticated);
            }
            warn!("access token expired and no refresh token is stored");
        }

        if let Some(callback) = callback.filter(|c| c.is_present()) {
            return self.complete_authorization(callback);
        }

        if allow_redirect {
            return self.begin_authorization(now);
        }

        Err(AuthError::AuthenticationRequired)
    }

    /// Runs the authorization flow without looking at the stored token:
    /// completes `callback` when one is given, otherwise starts a new
    /// redirect.
    pub fn authorize(
        &mut self,
        callback: Option<&CallbackParams>,
    ) -> Result<AuthStatus, AuthError> {
        match callback.filter(|c| c.is_present()) {
            Some(callback) => self.complete_authorization(callback),
            None => self.begin_authorization(self.clock.timestamp()),
        }
    }

    /// Forgets the stored token and any pending authorization.
    pub fn reset(&mut self) -> Result<(), AuthError> {
        self.tokens.clear()?;
        self.pending_store.clear()?;
        self.token = None;
        self.pending = None;
        self.state = AuthState::NoToken;
        info!("stored token removed");
        Ok(())
    }

    fn refresh(&mut self, current: Token, refresh_token: &str) -> Result<(), AuthError> {
        info!("access token expired, refreshing");

        let refreshed = match self.provider.refresh(refresh_token) {
            Ok(Some(token)) => token,
            Ok(None) => {
                let message = "authorization server returned no token".to_string();
                error!("token refresh failed: {}", message);
                return Err(AuthError::RefreshFailed(message));
            }
            Err(e) => {
                error!("token refresh failed: {}", e);
                return Err(AuthError::RefreshFailed(e.to_string()));
            }
        };

        // Google does not rotate refresh tokens; keep the one we have.
        let token = Token {
            refresh_token: refreshed.refresh_token.or(current.refresh_token),
            ..refreshed
        };
        self.tokens.save(&token)?;
        self.token = Some(token);
        self.state = AuthState::Valid;
        info!("access token refreshed");
        Ok(())
    }

    fn complete_authorization(
        &mut self,
        callback: &CallbackParams,
    ) -> Result<AuthStatus, AuthError> {
        if let Some(error) = &callback.error {
            error!("authorization server returned error: {}", error);
            return Err(AuthError::Denied(error.clone()));
        }

        let pending = match self.pending.clone() {
            Some(pending) => Some(pending),
            None => self.pending_store.load()?,
        };

        let Some(pending) = pending.filter(|p| callback.state.as_deref() == Some(p.state.as_str()))
        else {
            error!("callback state does not match the pending authorization");
            return Err(AuthError::StateMismatch);
        };

        let Some(code) = callback.code.as_deref() else {
            return Err(AuthError::AuthenticationRequired);
        };

        // The nonce is single use.
        self.pending = None;
        self.pending_store.clear()?;

        self.state = AuthState::Exchanging;
        let token = match self.provider.exchange_code(code, &pending.code_verifier) {
            Ok(token) => token,
            Err(e) => {
                self.state = AuthState::NoToken;
                error!("code exchange failed: {}", e);
                return Err(AuthError::ExchangeFailed(e.to_string()));
            }
        };

        self.tokens.save(&token)?;
        self.token = Some(token);
        self.state = AuthState::Valid;
        info!("authorization completed, token stored");
        Ok(AuthStatus::Authenticated)
    }

    fn begin_authorization(&mut self, now: i64) -> Result<AuthStatus, AuthError> {
        let pending = PendingAuthorization {
            state: utils::generate_state(),
            code_verifier: utils::generate_code_verifier(),
            created_at: now,
        };

        let url = self
            .provider
            .authorization_url(&AuthorizationRequest {
                state: pending.state.clone(),
                code_challenge: utils::generate_code_challenge(&pending.code_verifier),
            })
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        self.pending_store.save(&pending)?;
        self.pending = Some(pending);
        self.state = AuthState::AwaitingRedirect;
        info!("redirecting to the authorization server");
        Ok(AuthStatus::RedirectRequired { url })
    }
}
