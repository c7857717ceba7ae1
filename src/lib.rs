//! Adaptive layout core for a now-playing home-screen widget.
//!
//! Each refresh resolves every placed instance's pixel size from host hints,
//! renders the session state into a [`view::ViewState`], and drops optional
//! elements (cover, skip buttons, text lines) when the instance is too small
//! to show them all. Host, session store, display metrics and image decoding
//! are injected through the traits in [`host`], [`session`], [`intent`] and
//! [`cover`].

pub mod config;
pub mod cover;
pub mod dimension;
pub mod error;
pub mod host;
pub mod intent;
pub mod layout;
pub mod preview;
pub mod render;
pub mod session;
pub mod updater;
pub mod view;

pub use updater::{RefreshReport, WidgetUpdater};
