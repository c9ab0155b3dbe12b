//! # CLI Module
//!
//! Command implementations behind the `tubelist` binary. Each command takes
//! the process' [`Session`](crate::session::Session) by reference and turns
//! its results into terminal output using the crate's output macros.
//!
//! ## Commands
//!
//! - [`auth`] - runs the OAuth2 authorization flow through a local callback
//!   server, or resumes it from pasted `code`/`state` values
//! - [`add`] - appends one or more videos to a playlist, skipping the ones
//!   already in it
//! - [`remove`] - removes one or more videos from a playlist, skipping the
//!   ones not in it
//! - [`items`] - prints the current playlist as a table
//!
//! ## Usage
//!
//! ```bash
//! tubelist auth                                   # authorize once
//! tubelist add dQw4w9WgXcQ                        # default playlist
//! tubelist add --playlist PL123 dQw4w9WgXcQ oHg5SJYRHA0
//! tubelist remove https://youtu.be/dQw4w9WgXcQ
//! tubelist items
//! ```
//!
//! Add and remove require a prior `tubelist auth`; they never start the
//! browser flow themselves. Failures end the process with exit code 1.

mod auth;
mod playlist;

pub use auth::auth;
pub use playlist::add;
pub use playlist::items;
pub use playlist::remove;
