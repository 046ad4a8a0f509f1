//! Durable storage of the selected theme
//!
//! The preference is a plain string under one key. Storage problems never
//! reach the caller: saving becomes a no-op and loading reports no preference.

use shared::{ThemeError, ThemeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Per-browser key-value store, e.g. `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ThemeError>;
}

/// In-memory store for non-browser hosts. Clones share their entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError> {
        Ok(self.entry(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct ThemePersistence {
    store: Option<Rc<dyn KeyValueStore>>,
    key: String,
}

impl ThemePersistence {
    pub fn new(store: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            store: Some(Rc::new(store)),
            key: key.into(),
        }
    }

    /// Persistence without a backing store; every operation is a no-op.
    pub fn detached(key: impl Into<String>) -> Self {
        Self {
            store: None,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn save(&self, theme: ThemeId) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(error) = store.set(&self.key, theme.as_str()) {
            debug!(%theme, %error, "theme preference not saved");
        }
    }

    /// Stored theme, or `None` when absent, unreadable or not a known theme.
    pub fn load(&self) -> Option<ThemeId> {
        let store = self.store.as_ref()?;
        let value = match store.get(&self.key) {
            Ok(value) => value?,
            Err(error) => {
                debug!(%error, "theme preference not readable");
                return None;
            }
        };
        match value.parse() {
            Ok(theme) => Some(theme),
            Err(error) => {
                debug!(%error, "ignoring stored theme preference");
                None
            }
        }
    }
}
