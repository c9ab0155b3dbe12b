mod auth;
mod playlist;
mod store;

pub use auth::AuthController;
pub use auth::AuthState;
pub use playlist::PAGE_SIZE;
pub use playlist::PlaylistMutator;
pub use playlist::find_last_match;
pub use playlist::resolve_playlist_id;
pub use store::FileStore;
pub use store::PendingAuthStore;
pub use store::TokenStore;
