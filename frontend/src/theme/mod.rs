//! Theme engine
//!
//! Resolves, persists and applies the documentation site's visual theme.
//!
//! # Components
//!
//! - **[`ThemeResolver`]** - theme -> stylesheet URL, loaded once per theme
//! - **[`ThemeState`]** - page-wide observable selection
//! - **[`ThemePersistence`]** - selection stored across reloads
//! - **[`ThemeApplier`]** - the tagged stylesheet link and body marker class
//! - **[`ThemeController`]** - facade tying the above together

pub mod applier;
pub mod controller;
pub mod persistence;
pub mod resolver;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use applier::{ThemeApplier, ThemeDocument};
pub use controller::{Phase, SyncOutcome, ThemeController, ThemeControllerBuilder};
pub use persistence::{KeyValueStore, MemoryStore, ThemePersistence};
pub use resolver::{LoadFuture, ManifestLoader, StaticPathLoader, ThemeLoader, ThemeResolver};
pub use state::ThemeState;
