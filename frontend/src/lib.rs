//! Stylebook theme engine
//!
//! Resolves, persists and applies the visual theme of the documentation site
//! and its story previews. Everything except the `platform` module is
//! platform-neutral; the browser collaborators live behind the
//! [`theme::ThemeDocument`] and [`theme::KeyValueStore`] traits.

pub mod story_frame;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod platform;

pub use shared::{THEMES, ThemeConfig, ThemeDescriptor, ThemeError, ThemeId};
