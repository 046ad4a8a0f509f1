//! DOM reconciliation for the active theme
//!
//! The applier owns two things in the document: the single stylesheet link
//! tagged with `data-theme="dkfds"` and the `theme-<id>` marker class on
//! `<body>`. Nothing else writes to either.

use shared::{ThemeError, ThemeId, all_marker_classes};
use std::rc::Rc;
use tracing::{debug, info};

/// Document operations the applier needs.
pub trait ThemeDocument {
    /// Removes every tagged theme link and returns how many were removed.
    fn remove_theme_links(&self) -> Result<usize, ThemeError>;
    /// Appends a tagged `<link rel="stylesheet">` to `<head>`.
    fn append_theme_link(&self, href: &str) -> Result<(), ThemeError>;
    fn has_theme_link(&self) -> bool;
    /// Removes `stale` classes from `<body>`, then adds `marker`.
    fn replace_body_classes(&self, stale: &[String], marker: &str) -> Result<(), ThemeError>;
}

pub struct ThemeApplier {
    document: Option<Rc<dyn ThemeDocument>>,
}

impl ThemeApplier {
    pub fn new(document: impl ThemeDocument + 'static) -> Self {
        Self {
            document: Some(Rc::new(document)),
        }
    }

    /// Applier for contexts without a DOM; `apply` does nothing.
    pub fn detached() -> Self {
        Self { document: None }
    }

    pub fn is_attached(&self) -> bool {
        self.document.is_some()
    }

    pub fn has_theme_link(&self) -> bool {
        self.document
            .as_ref()
            .is_some_and(|document| document.has_theme_link())
    }

    /// Returns `Ok(false)` when there is no document to update.
    pub fn apply(&self, href: &str, theme: ThemeId) -> Result<bool, ThemeError> {
        let Some(document) = &self.document else {
            debug!(%theme, "no document, theme not applied");
            return Ok(false);
        };

        let removed = document.remove_theme_links()?;
        document.append_theme_link(href)?;
        document.replace_body_classes(&all_marker_classes(), &theme.marker_class())?;

        info!(%theme, href, removed, "theme applied");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::testing::MemoryDocument;

    #[test]
    fn test_apply_inserts_single_tagged_link() {
        let document = MemoryDocument::new();
        let applier = ThemeApplier::new(document.clone());

        assert!(applier.apply("/css/dkfds-virkdk.css", ThemeId::VirkDk).unwrap());

        assert_eq!(document.theme_link_hrefs(), vec!["/css/dkfds-virkdk.css"]);
        assert_eq!(document.body_classes(), vec!["theme-virkdk"]);
        assert!(applier.has_theme_link());
    }

    #[test]
    fn test_apply_replaces_previous_theme() {
        let document = MemoryDocument::new();
        document.push_body_class("story-container");
        let applier = ThemeApplier::new(document.clone());

        applier.apply("/css/dkfds.css", ThemeId::Default).unwrap();
        applier.apply("/css/dkfds-borgerdk.css", ThemeId::BorgerDk).unwrap();

        assert_eq!(document.theme_link_hrefs(), vec!["/css/dkfds-borgerdk.css"]);
        assert_eq!(document.body_classes(), vec!["story-container", "theme-borgerdk"]);
    }

    #[test]
    fn test_apply_removes_duplicate_tagged_links() {
        let document = MemoryDocument::new();
        document.push_link("/css/dkfds.css", true);
        document.push_link("/css/dkfds-virkdk.css", true);
        document.push_link("/histoire/app.css", false);
        let applier = ThemeApplier::new(document.clone());

        applier.apply("/css/dkfds-borgerdk.css", ThemeId::BorgerDk).unwrap();

        assert_eq!(document.theme_link_hrefs(), vec!["/css/dkfds-borgerdk.css"]);
        assert_eq!(document.untagged_link_hrefs(), vec!["/histoire/app.css"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let document = MemoryDocument::new();
        let applier = ThemeApplier::new(document.clone());

        applier.apply("/css/dkfds.css", ThemeId::Default).unwrap();
        let links = document.theme_link_hrefs();
        let classes = document.body_classes();
        applier.apply("/css/dkfds.css", ThemeId::Default).unwrap();

        assert_eq!(document.theme_link_hrefs(), links);
        assert_eq!(document.body_classes(), classes);
    }

    #[test]
    fn test_detached_applier_is_a_no_op() {
        let applier = ThemeApplier::detached();
        assert!(!applier.is_attached());
        assert!(!applier.has_theme_link());
        assert_eq!(applier.apply("/css/dkfds.css", ThemeId::Default), Ok(false));
    }
}
