use chrono::Utc;
use reqwest::{Url, blocking::Client};

use crate::{
    config::Config,
    error::ApiError,
    types::{AuthorizationRequest, Token, TokenResponse},
    youtube::{AuthProvider, check_status},
};

/// Google OAuth2 authorization-code flow with PKCE (S256) and a confidential
/// client secret.
pub struct GoogleAuthProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl GoogleAuthProvider {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        GoogleAuthProvider {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            scope: config.scope.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        let response = self.client.post(&self.token_url).form(form).send()?;
        let response = check_status(response)?;
        response
            .json::<TokenResponse>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl AuthProvider for GoogleAuthProvider {
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, ApiError> {
        // `access_type=offline` and `prompt=consent` make Google hand out a
        // refresh token on every consent.
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", self.scope.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("state", request.state.as_str()),
                ("code_challenge", request.code_challenge.as_str()),
                ("code_challenge_method", "S256"),
            ],
        )
        .map_err(|e| ApiError::Decode(format!("invalid auth url {}: {}", self.auth_url, e)))?;

        Ok(url.to_string())
    }

    fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, ApiError> {
        let response = self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_url),
            ("code_verifier", code_verifier),
        ])?;

        Ok(response.into_token(Utc::now().timestamp()))
    }

    fn refresh(&self, refresh_token: &str) -> Result<Option<Token>, ApiError> {
        let result = self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ]);

        match result {
            Ok(response) => Ok(Some(response.into_token(Utc::now().timestamp()))),
            // 400/401 mean the grant was revoked or is otherwise unusable.
            Err(ApiError::Status { status, .. }) if status == 400 || status == 401 => Ok(None),
            Err(e) => Err(e),
        }
    }
}
