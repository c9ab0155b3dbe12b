mod common;

use std::cell::RefCell;

use common::*;
use tempfile::TempDir;
use tubelist::{
    error::{ApiError, AuthError, MutationError},
    management::{PAGE_SIZE, PlaylistMutator, find_last_match, resolve_playlist_id},
    types::{
        AddOutcome, DeletePlaylistItemRequest, InsertPlaylistItemRequest, PlaylistItem,
        PlaylistItemPage, RemoveOutcome,
    },
    youtube::PlaylistApi,
};

/// Serves fixed pages keyed by the incoming continuation token.
struct ScriptedPages {
    pages: Vec<(Option<&'static str>, Vec<PlaylistItem>, Option<&'static str>)>,
    seen: RefCell<Vec<(Option<String>, u32)>>,
}

impl PlaylistApi for ScriptedPages {
    fn list_items(
        &self,
        _access_token: &str,
        _playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemPage, ApiError> {
        self.seen
            .borrow_mut()
            .push((page_token.map(str::to_string), max_results));
        let (_, items, next) = self
            .pages
            .iter()
            .find(|(token, _, _)| *token == page_token)
            .unwrap();
        Ok(PlaylistItemPage {
            items: items.clone(),
            next_page_token: next.map(str::to_string),
        })
    }

    fn insert_item(&self, _: &str, _: &InsertPlaylistItemRequest) -> Result<(), ApiError> {
        unreachable!()
    }

    fn delete_item(&self, _: &str, _: &DeletePlaylistItemRequest) -> Result<(), ApiError> {
        unreachable!()
    }
}

fn numbered(from: usize, count: usize) -> Vec<PlaylistItem> {
    (from..from + count)
        .map(|n| item(&format!("item-{}", n), &format!("video-{}", n), n as i64))
        .collect()
}

#[test]
fn test_resolve_playlist_id_prefers_explicit() {
    let config = config(Some("PLdefault"));

    assert_eq!(
        resolve_playlist_id(Some("PLexplicit"), &config).unwrap(),
        "PLexplicit"
    );
    assert_eq!(resolve_playlist_id(None, &config).unwrap(), "PLdefault");
}

#[test]
fn test_blank_explicit_playlist_id_is_rejected() {
    let config = config(Some("PLdefault"));

    assert!(matches!(
        resolve_playlist_id(Some("  "), &config),
        Err(MutationError::Empty("playlist id"))
    ));
}

#[test]
fn test_resolve_playlist_id_without_default_fails() {
    let config = config(None);

    assert!(matches!(
        resolve_playlist_id(None, &config),
        Err(MutationError::NoPlaylistId)
    ));
}

#[test]
fn test_list_all_items_follows_continuation_tokens() {
    let api = ScriptedPages {
        pages: vec![
            (None, numbered(0, 25), Some("2")),
            (Some("2"), numbered(25, 25), Some("1")),
            (Some("1"), numbered(50, 4), None),
        ],
        seen: RefCell::new(Vec::new()),
    };
    let mutator = PlaylistMutator::new(&api);

    let items = mutator.list_all_items("ya29.valid", "PL1").unwrap();

    assert_eq!(items.len(), 54);
    assert_eq!(items, numbered(0, 54));
    assert_eq!(
        api.seen.borrow().as_slice(),
        [
            (None, PAGE_SIZE),
            (Some("2".to_string()), PAGE_SIZE),
            (Some("1".to_string()), PAGE_SIZE),
        ]
    );
}

#[test]
fn test_add_twice_inserts_once() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::with_items(numbered(0, 3));
    let config = config(Some("PL1"));
    authorize(&dir);

    let mut auth = controller(&dir, &provider, &clock);
    let mutator = mutator(&api);

    let first = mutator.add_video(&mut auth, &config, "new-video", None).unwrap();
    let second = mutator.add_video(&mut auth, &config, "new-video", None).unwrap();

    assert_eq!(first, AddOutcome::Inserted);
    assert_eq!(second, AddOutcome::AlreadyPresent);
    assert_eq!(api.items.borrow().len(), 4);
    assert_eq!(
        api.inserts.borrow().as_slice(),
        [InsertPlaylistItemRequest::new("PL1", "new-video")]
    );
    assert!(api.access_tokens.borrow().iter().all(|t| t == "ya29.valid"));
}

#[test]
fn test_add_existing_video_issues_no_insert() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::with_items(numbered(0, 30));
    let config = config(None);
    authorize(&dir);

    let mut auth = controller(&dir, &provider, &clock);
    let outcome = mutator(&api)
        .add_video(&mut auth, &config, "video-29", Some("PL1"))
        .unwrap();

    assert_eq!(outcome, AddOutcome::AlreadyPresent);
    assert!(api.inserts.borrow().is_empty());
    // 30 items span two pages.
    assert_eq!(api.list_calls.borrow().len(), 2);
}

#[test]
fn test_remove_absent_video_issues_no_delete() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::with_items(numbered(0, 3));
    let config = config(Some("PL1"));
    authorize(&dir);

    let mut auth = controller(&dir, &provider, &clock);
    let outcome = mutator(&api)
        .remove_video(&mut auth, &config, "missing", None)
        .unwrap();

    assert_eq!(outcome, RemoveOutcome::NotPresent);
    assert!(api.deletes.borrow().is_empty());
    assert_eq!(api.items.borrow().len(), 3);
}

#[test]
fn test_remove_deletes_by_item_id() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::with_items(numbered(0, 3));
    let config = config(Some("PL1"));
    authorize(&dir);

    let mut auth = controller(&dir, &provider, &clock);
    let outcome = mutator(&api)
        .remove_video(&mut auth, &config, "video-1", None)
        .unwrap();

    assert_eq!(outcome, RemoveOutcome::Removed);
    assert_eq!(
        api.deletes.borrow().as_slice(),
        [DeletePlaylistItemRequest::new("item-1")]
    );
    assert_eq!(api.video_ids(), ["video-0", "video-2"]);
}

#[test]
fn test_remove_duplicate_video_deletes_last_occurrence() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::with_items(vec![
        item("item-a", "X", 0),
        item("item-b", "Y", 1),
        item("item-c", "X", 2),
    ]);
    let config = config(Some("PL1"));
    authorize(&dir);

    let mut auth = controller(&dir, &provider, &clock);
    mutator(&api)
        .remove_video(&mut auth, &config, "X", None)
        .unwrap();

    assert_eq!(
        api.deletes.borrow().as_slice(),
        [DeletePlaylistItemRequest::new("item-c")]
    );
}

#[test]
fn test_find_last_match_scans_whole_snapshot() {
    let items = vec![
        item("a", "X", 0),
        item("b", "X", 1),
        item("c", "Z", 2),
    ];

    assert_eq!(find_last_match(&items, "X").unwrap().item_id, "b");
    assert!(find_last_match(&items, "Q").is_none());
}

#[test]
fn test_mutation_requires_prior_authorization() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::default();
    let config = config(Some("PL1"));

    let mut auth = controller(&dir, &provider, &clock);
    let err = mutator(&api)
        .add_video(&mut auth, &config, "v", None)
        .unwrap_err();

    assert!(matches!(
        err,
        MutationError::Auth(AuthError::AuthenticationRequired)
    ));
    // Never starts the browser flow on its own.
    assert!(provider.authorization_requests.borrow().is_empty());
    assert!(api.list_calls.borrow().is_empty());
}

#[test]
fn test_missing_playlist_is_checked_before_authorization() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::default();
    let config = config(None);

    let mut auth = controller(&dir, &provider, &clock);
    let err = mutator(&api)
        .remove_video(&mut auth, &config, "v", None)
        .unwrap_err();

    assert!(matches!(err, MutationError::NoPlaylistId));
}

#[test]
fn test_empty_video_id_never_matches_snapshot() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    // Items without a resourceId.videoId decode with an empty video id.
    let api = FakePlaylistApi::with_items(vec![item("item-a", "", 0)]);
    let config = config(Some("PL1"));
    authorize(&dir);

    let mut auth = controller(&dir, &provider, &clock);
    let mutator = mutator(&api);

    let added = mutator.add_video(&mut auth, &config, "  ", None);
    assert!(matches!(added, Err(MutationError::Empty("video id"))));
    let removed = mutator.remove_video(&mut auth, &config, "", None);
    assert!(matches!(removed, Err(MutationError::Empty("video id"))));

    assert!(api.list_calls.borrow().is_empty());
    assert!(api.deletes.borrow().is_empty());
}

#[test]
fn test_platform_errors_keep_their_message() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::default();
    let api = FakePlaylistApi::default();
    let config = config(Some("PL1"));
    authorize(&dir);

    let mut auth = controller(&dir, &provider, &clock);
    let mutator = mutator(&api);

    api.fail_list.set(true);
    match mutator.add_video(&mut auth, &config, "v", None) {
        Err(MutationError::Platform(message)) => assert!(message.contains("quotaExceeded")),
        other => panic!("unexpected result: {:?}", other),
    }

    api.fail_list.set(false);
    api.fail_insert.set(true);
    match mutator.add_video(&mut auth, &config, "v", None) {
        Err(MutationError::Platform(message)) => assert!(message.contains("playlistNotFound")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_expired_token_is_refreshed_before_listing() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(NOW);
    let provider = FakeAuthProvider::refreshing_to(token("ya29.fresh", None, NOW + 3600));
    let api = FakePlaylistApi::default();
    let config = config(Some("PL1"));
    token_store(&dir)
        .save(&token("ya29.old", Some("1//r"), NOW - 1))
        .unwrap();

    let mut auth = controller(&dir, &provider, &clock);
    mutator(&api)
        .add_video(&mut auth, &config, "v", None)
        .unwrap();

    assert_eq!(api.access_tokens.borrow().as_slice(), ["ya29.fresh"]);
}
