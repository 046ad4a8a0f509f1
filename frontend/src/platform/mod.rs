//! Platform layer for the theme engine
//!
//! Browser implementations of the engine's collaborators: `localStorage`,
//! the live document, manifest fetching and story-frame detection.

pub mod web;

pub use web::{
    BrowserDocument, BrowserStorage, detect_embedding, fetch_text, init_logging, page_controller,
};
