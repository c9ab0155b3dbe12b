use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Local};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{PlaylistItem, PlaylistItemTableRow};

/// Source of the current time. Injected so expiry and log rotation can be
/// driven from tests.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

pub type SharedClock = Arc<dyn Clock + Send + Sync>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Anti-CSRF nonce sent as the `state` parameter of the authorization url.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Accepts either a bare video id or a watch/share url and returns the id.
pub fn parse_video_id(input: &str) -> Result<String, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("video id must not be empty".to_string());
    }

    if let Ok(url) = reqwest::Url::parse(input) {
        let host = url.host_str().unwrap_or_default();
        if host.ends_with("youtu.be") {
            return url
                .path_segments()
                .and_then(|mut s| s.next())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| format!("no video id in {}", input));
        }

        return url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .ok_or_else(|| format!("no video id in {}", input));
    }

    Ok(input.to_string())
}

pub fn playlist_table_rows(items: &[PlaylistItem]) -> Vec<PlaylistItemTableRow> {
    items
        .iter()
        .map(|item| PlaylistItemTableRow {
            position: item.position,
            video: item.video_id.clone(),
            item: item.item_id.clone(),
        })
        .collect()
}
