//! Chat Playlist Mirror Library
//!
//! This library watches a chat stream for Spotify links and mirrors every shared
//! track and album into two curated playlists, one for singles and one for albums,
//! without ever inserting the same track twice. It also replays an exported chat
//! history through the same logic so an existing group can be imported in its
//! original order.
//!
//! # Modules
//!
//! - `backlog` - Chat export parsing and ordered replay
//! - `cli` - Command implementations (listen, backlog, info)
//! - `config` - Configuration management and environment variables
//! - `dispatch` - Live message handling, reply rendering and reactions
//! - `error` - Error taxonomy shared by the sync core
//! - `link` - Classification of chat tokens into track/album links
//! - `management` - Playlist membership snapshots and token caching
//! - `spotify` - Spotify Web API client implementation
//! - `sync` - The sync engine deciding novelty and appending to playlists
//! - `telegram` - Telegram Bot API client used as the chat platform
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tunedrop::link::{self, Link};
//!
//! let link = link::classify("https://open.spotify.com/track/abc123?si=xyz");
//! assert_eq!(link, Link::Track("abc123".to_string()));
//! assert_eq!(link::classify("hello"), Link::None);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

pub mod backlog;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod link;
pub mod management;
pub mod spotify;
pub mod sync;
pub mod telegram;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for the chat-facing and CLI
/// plumbing using a boxed dynamic error trait object. The sync core uses the
/// typed [`error::SyncError`] instead so callers can tell remote failures apart.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enables or disables the output of [`debug!`] lines.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

/// Returns whether verbose action logging was requested with `--logging`.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Listening for links...");
/// info!("Loaded {} tracks", count);
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
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations.
///
/// # Example
///
/// ```
/// success!("Backlog replay finished");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// such as a snapshot that could not be loaded at startup.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
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
/// Used for recoverable issues, e.g. a single link that could not be added
/// while the bot keeps serving the chat.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed action trace, only when verbose logging is enabled.
///
/// # Example
///
/// ```
/// debug!("admit {}", token);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::is_verbose() {
      use colored::Colorize;
      println!("[{}] {}", ".".dimmed(), std::format_args!($($arg)*));
    }
  })
}
