//! YouTube thumbnail downloader: resolves a pasted video URL to its
//! identifier, builds the five thumbnail addresses and shows them in an
//! egui window with a small annotation editor.

// Window state and layout
pub mod app;
// Action dispatch for UI events
pub mod commands;
// config.toml loading
pub mod config;
// Annotation overlay editor
pub mod editor;
// FAQ accordion state
pub mod faq;
// Embedded string catalogs
pub mod i18n;
// Log file setup
pub mod logging;
// Data models for thumbnail cards and load results
pub mod model;
// Persisted theme and language flags
pub mod preferences;
// Video identifier extraction
pub mod resolver;
// Thumbnail address building and fetching
pub mod thumbnail;

// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;

/// Global Tokio runtime; its blocking pool loads thumbnail images.
pub static RUNTIME: OnceCell<Runtime> = OnceCell::new();
