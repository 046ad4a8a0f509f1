//! Theme controller
//!
//! The facade every consumer talks to. It exposes the selected theme, the
//! list of selectable themes and a setter, and runs the pipeline that keeps
//! the document in line with the selection:
//!
//! ```text
//! set_theme(id) -> ThemeState -> watch() -> resolve(id) -> still current? -> apply(href, id)
//!      \-> persist(id)
//! ```
//!
//! Resolutions run concurrently. A slow resolution for an older selection is
//! discarded instead of overwriting the stylesheet of a newer one. Selecting
//! the current theme again after its load failed runs the pipeline again.

use super::{ThemeApplier, ThemePersistence, ThemeResolver, ThemeState};
use futures::StreamExt;
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, MutableSignal, MutableSignalCloned, SignalExt};
use shared::{DEFAULT_STORAGE_KEY, THEMES, ThemeDescriptor, ThemeError, ThemeId};
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Ready,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied { theme: ThemeId, href: String },
    /// The selection changed while the stylesheet was resolving.
    Stale { theme: ThemeId, current: ThemeId },
    /// Resolved, but there is no document to apply it to.
    Detached { theme: ThemeId, href: String },
}

pub struct ThemeControllerBuilder {
    resolver: Rc<ThemeResolver>,
    state: Option<ThemeState>,
    persistence: Option<ThemePersistence>,
    applier: Option<ThemeApplier>,
    descriptors: &'static [ThemeDescriptor],
    default_theme: ThemeId,
}

impl ThemeControllerBuilder {
    /// Defaults to the page-wide state.
    pub fn state(mut self, state: ThemeState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn persistence(mut self, persistence: ThemePersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn applier(mut self, applier: ThemeApplier) -> Self {
        self.applier = Some(applier);
        self
    }

    pub fn descriptors(mut self, descriptors: &'static [ThemeDescriptor]) -> Self {
        self.descriptors = descriptors;
        self
    }

    pub fn default_theme(mut self, theme: ThemeId) -> Self {
        self.default_theme = theme;
        self
    }

    pub fn build(self) -> ThemeController {
        let descriptors = self.descriptors;
        let default_theme = if descriptors.iter().any(|descriptor| descriptor.id == self.default_theme) {
            self.default_theme
        } else {
            descriptors.first().map(|descriptor| descriptor.id).unwrap_or_default()
        };

        ThemeController {
            inner: Rc::new(ControllerInner {
                descriptors,
                default_theme,
                state: self.state.unwrap_or_else(ThemeState::page),
                resolver: self.resolver,
                persistence: self
                    .persistence
                    .unwrap_or_else(|| ThemePersistence::detached(DEFAULT_STORAGE_KEY)),
                applier: self.applier.unwrap_or_else(ThemeApplier::detached),
                phase: Cell::new(Phase::Uninitialized),
                last_error: Mutable::new(None),
                retries: Mutable::new(0),
            }),
        }
    }
}

struct ControllerInner {
    descriptors: &'static [ThemeDescriptor],
    default_theme: ThemeId,
    state: ThemeState,
    resolver: Rc<ThemeResolver>,
    persistence: ThemePersistence,
    applier: ThemeApplier,
    phase: Cell<Phase>,
    last_error: Mutable<Option<ThemeError>>,
    /// Bumped to re-run the pipeline for an unchanged selection.
    retries: Mutable<u32>,
}

/// Cheap to clone; clones drive the same controller.
#[derive(Clone)]
pub struct ThemeController {
    inner: Rc<ControllerInner>,
}

impl ThemeController {
    pub fn builder(resolver: Rc<ThemeResolver>) -> ThemeControllerBuilder {
        ThemeControllerBuilder {
            resolver,
            state: None,
            persistence: None,
            applier: None,
            descriptors: THEMES,
            default_theme: ThemeId::default(),
        }
    }

    pub fn current_theme(&self) -> ThemeId {
        self.inner.state.get()
    }

    pub fn current_theme_signal(&self) -> MutableSignal<ThemeId> {
        self.inner.state.signal()
    }

    pub fn available_themes(&self) -> &'static [ThemeDescriptor] {
        self.inner.descriptors
    }

    pub fn default_theme(&self) -> ThemeId {
        self.inner.default_theme
    }

    pub fn is_available(&self, theme: ThemeId) -> bool {
        self.inner.descriptors.iter().any(|descriptor| descriptor.id == theme)
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    pub fn resolver(&self) -> &ThemeResolver {
        &self.inner.resolver
    }

    pub fn applier(&self) -> &ThemeApplier {
        &self.inner.applier
    }

    /// Selects `theme` if it is one of the available themes.
    ///
    /// The state changes immediately; stylesheet resolution and DOM updates
    /// follow through [`watch`](Self::watch).
    pub fn set_theme(&self, theme: ThemeId) -> bool {
        if !self.is_available(theme) {
            debug!(%theme, "theme not selectable, ignored");
            return false;
        }
        if self.inner.state.set(theme) {
            info!(%theme, "theme selected");
        } else if self.inner.last_error.lock_ref().is_some() {
            info!(%theme, "theme selected again, retrying failed load");
            let mut retries = self.inner.retries.lock_mut();
            *retries = retries.wrapping_add(1);
        }
        self.inner.persistence.save(theme);
        true
    }

    pub fn set_theme_by_name(&self, name: &str) -> bool {
        match name.parse::<ThemeId>() {
            Ok(theme) => self.set_theme(theme),
            Err(error) => {
                debug!(%error, "theme selection ignored");
                false
            }
        }
    }

    /// Seeds the state from the stored preference, falling back to (and
    /// storing) the default theme. Safe to call any number of times.
    pub fn initialize(&self) -> ThemeId {
        self.inner.phase.set(Phase::Initializing);

        let restored = self
            .inner
            .persistence
            .load()
            .filter(|theme| self.is_available(*theme));
        let theme = match restored {
            Some(theme) => {
                debug!(%theme, "theme preference restored");
                theme
            }
            None => {
                let theme = self.inner.default_theme;
                self.inner.persistence.save(theme);
                theme
            }
        };
        self.inner.state.set(theme);

        self.inner.phase.set(Phase::Ready);
        theme
    }

    /// Resolves `theme` and applies it if it is still the selected theme.
    pub async fn sync_theme(&self, theme: ThemeId) -> Result<SyncOutcome, ThemeError> {
        let href = self.inner.resolver.resolve(theme).await?;

        let current = self.inner.state.get();
        if current != theme {
            debug!(%theme, %current, "stale theme resolution discarded");
            return Ok(SyncOutcome::Stale { theme, current });
        }

        if self.inner.applier.apply(&href, theme)? {
            Ok(SyncOutcome::Applied { theme, href })
        } else {
            Ok(SyncOutcome::Detached { theme, href })
        }
    }

    /// Keeps the document in sync with the state for as long as it is polled.
    ///
    /// Fires once for the current value, then once per change and once per
    /// retry of a failed theme. The host spawns it once per page.
    pub fn watch(&self) -> impl Future<Output = ()> + use<> {
        let controller = self.clone();
        let selection = map_ref! {
            let theme = self.inner.state.signal(),
            let _retry = self.inner.retries.signal() => *theme
        };
        selection
            .to_stream()
            .for_each_concurrent(None, move |theme| {
                let controller = controller.clone();
                async move { controller.on_theme_changed(theme).await }
            })
    }

    /// Latest resolution or DOM failure; cleared by the next applied theme.
    pub fn last_error(&self) -> Option<ThemeError> {
        self.inner.last_error.get_cloned()
    }

    pub fn last_error_signal(&self) -> MutableSignalCloned<Option<ThemeError>> {
        self.inner.last_error.signal_cloned()
    }

    async fn on_theme_changed(&self, theme: ThemeId) {
        match self.sync_theme(theme).await {
            Ok(SyncOutcome::Stale { .. }) => {}
            Ok(_) => self.inner.last_error.set(None),
            Err(error) if self.inner.state.get() != theme => {
                debug!(%theme, %error, "failure for a superseded theme ignored");
            }
            Err(error) => {
                warn!(%theme, %error, "theme not applied, keeping previous stylesheet");
                self.inner.last_error.set(Some(error));
            }
        }
    }
}
