// Page-wide selected theme

use futures_signals::signal::{Mutable, MutableSignal};
use shared::ThemeId;
use std::sync::LazyLock;

static PAGE_THEME: LazyLock<ThemeState> = LazyLock::new(|| ThemeState::new(ThemeId::default()));

/// Observable holder of the selected theme.
///
/// Clones share the same cell. Only [`ThemeController`](super::ThemeController)
/// writes to it.
#[derive(Clone)]
pub struct ThemeState {
    current: Mutable<ThemeId>,
}

impl ThemeState {
    pub fn new(initial: ThemeId) -> Self {
        Self {
            current: Mutable::new(initial),
        }
    }

    /// The one cell shared by every consumer on the page.
    pub fn page() -> Self {
        PAGE_THEME.clone()
    }

    pub fn get(&self) -> ThemeId {
        self.current.get()
    }

    /// Emits the current value first, then every committed change.
    pub fn signal(&self) -> MutableSignal<ThemeId> {
        self.current.signal()
    }

    /// Returns `true` when the value changed. Observers are only notified on change.
    pub(crate) fn set(&self, theme: ThemeId) -> bool {
        if self.current.get() == theme {
            return false;
        }
        self.current.set(theme);
        true
    }
}
