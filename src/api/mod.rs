//! # API Module
//!
//! HTTP endpoints of the short-lived local server used during `tubelist
//! auth`.
//!
//! ## Endpoints
//!
//! - [`callback`] - target of the OAuth2 redirect. Passes `code`, `state`
//!   and `error` on to the waiting CLI. It does not exchange anything
//!   itself; the state check and the exchange run in the synchronous core
//!   once the server has shut down.
//! - [`health`] - liveness probe returning name and version.
//!
//! The callback route is mounted at the path of the configured redirect
//! url, see [`crate::server::router`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
