//! Test doubles for the browser collaborators.

use super::applier::ThemeDocument;
use shared::ThemeError;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug)]
struct LinkNode {
    href: String,
    tagged: bool,
}

#[derive(Default)]
struct DocumentModel {
    head: Vec<LinkNode>,
    body_classes: Vec<String>,
}

/// Minimal `<head>` + `<body>` model. Clones share the same document.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    model: Rc<RefCell<DocumentModel>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_link(&self, href: &str, tagged: bool) {
        self.model.borrow_mut().head.push(LinkNode {
            href: href.to_string(),
            tagged,
        });
    }

    pub fn push_body_class(&self, class: &str) {
        self.model.borrow_mut().body_classes.push(class.to_string());
    }

    pub fn theme_link_hrefs(&self) -> Vec<String> {
        self.link_hrefs(true)
    }

    pub fn untagged_link_hrefs(&self) -> Vec<String> {
        self.link_hrefs(false)
    }

    pub fn body_classes(&self) -> Vec<String> {
        self.model.borrow().body_classes.clone()
    }

    fn link_hrefs(&self, tagged: bool) -> Vec<String> {
        self.model
            .borrow()
            .head
            .iter()
            .filter(|link| link.tagged == tagged)
            .map(|link| link.href.clone())
            .collect()
    }
}

impl ThemeDocument for MemoryDocument {
    fn remove_theme_links(&self) -> Result<usize, ThemeError> {
        let mut model = self.model.borrow_mut();
        let before = model.head.len();
        model.head.retain(|link| !link.tagged);
        Ok(before - model.head.len())
    }

    fn append_theme_link(&self, href: &str) -> Result<(), ThemeError> {
        self.push_link(href, true);
        Ok(())
    }

    fn has_theme_link(&self) -> bool {
        self.model.borrow().head.iter().any(|link| link.tagged)
    }

    fn replace_body_classes(&self, stale: &[String], marker: &str) -> Result<(), ThemeError> {
        let mut model = self.model.borrow_mut();
        model.body_classes.retain(|class| !stale.contains(class));
        model.body_classes.push(marker.to_string());
        Ok(())
    }
}
