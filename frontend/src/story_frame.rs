//! Story preview bootstrap
//!
//! Stories render inside an iframe of the story browser. Only that frame gets
//! themed; the browser chrome around it keeps its own styles unless a demo
//! page opts in.

use crate::theme::{ThemeApplier, ThemeDocument, ThemeResolver};
use shared::{ThemeError, ThemeId};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Embedding {
    /// The top-level document, e.g. the story browser itself.
    TopLevel,
    /// A nested preview frame.
    StoryFrame,
    /// No DOM at all (pre-rendering, tests).
    Headless,
}

impl Embedding {
    pub fn has_dom(self) -> bool {
        !matches!(self, Embedding::Headless)
    }

    /// Whether the theme engine may write to this document.
    pub fn owns_theme(self, style_top_level: bool) -> bool {
        match self {
            Embedding::StoryFrame => true,
            Embedding::TopLevel => style_top_level,
            Embedding::Headless => false,
        }
    }
}

/// Applier bound to `document` only when the engine owns it.
pub fn applier_for<D>(embedding: Embedding, style_top_level: bool, document: Option<D>) -> ThemeApplier
where
    D: ThemeDocument + 'static,
{
    match document {
        Some(document) if embedding.owns_theme(style_top_level) => ThemeApplier::new(document),
        _ => ThemeApplier::detached(),
    }
}

/// Styles a freshly loaded story frame with `fallback` unless a theme
/// stylesheet is already present. Returns whether anything was applied.
pub async fn ensure_story_styles(
    embedding: Embedding,
    resolver: &ThemeResolver,
    applier: &ThemeApplier,
    fallback: ThemeId,
) -> Result<bool, ThemeError> {
    if embedding != Embedding::StoryFrame {
        return Ok(false);
    }
    if applier.has_theme_link() {
        debug!("story frame already themed");
        return Ok(false);
    }
    let href = resolver.resolve(fallback).await?;
    applier.apply(&href, fallback)
}
