//! tubelist library
//!
//! Adds videos to and removes videos from YouTube playlists on behalf of a
//! user who authorized the application once through the OAuth2
//! authorization-code flow. The token is cached on disk and refreshed when
//! it expires; add and remove are idempotent.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Credentials, default playlist and on-disk locations
//! - `error` - Error types of every layer
//! - `logger` - Day-rotating file sink for `tracing` events
//! - `management` - Token storage, authorization state machine, playlist mutations
//! - `server` - Local HTTP server receiving the OAuth2 redirect
//! - `session` - The object tying configuration, authorization and playlists together
//! - `types` - Data structures and wire types
//! - `utils` - Clock, nonces, PKCE helpers and formatting
//! - `youtube` - Capability traits and their YouTube/Google implementations
//!
//! # Example
//!
//! ```
//! use tubelist::{config::{self, Config}, session::Session};
//!
//! let config = Config::load(&config::resolve_source(None))?;
//! let mut session = Session::open(config);
//! session.add_video("dQw4w9WgXcQ", None)?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod management;
pub mod server;
pub mod session;
pub mod types;
pub mod utils;
pub mod youtube;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Fetching playlist {}", playlist_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Accepts the same arguments as `println!`.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with code 1.
///
/// Only for the CLI layer; library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Accepts the same arguments as `println!`.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
