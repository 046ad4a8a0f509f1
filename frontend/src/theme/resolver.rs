//! Theme stylesheet resolution
//!
//! Turns a [`ThemeId`] into a loadable stylesheet URL. Each theme is loaded at
//! most once per page: concurrent first requests share the in-flight load and
//! later requests are served from the memo table. Failed loads are forgotten
//! so a later request can retry.

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use shared::{AssetManifest, AssetStrategy, AssetsSection, ThemeError, ThemeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, warn};

pub type LoadFuture = LocalBoxFuture<'static, Result<String, ThemeError>>;

/// Source of stylesheet URLs. The resolver wraps one of these.
pub trait ThemeLoader {
    fn load(&self, theme: ThemeId) -> LoadFuture;
}

impl<F, Fut> ThemeLoader for F
where
    F: Fn(ThemeId) -> Fut,
    Fut: Future<Output = Result<String, ThemeError>> + 'static,
{
    fn load(&self, theme: ThemeId) -> LoadFuture {
        self(theme).boxed_local()
    }
}

enum Slot {
    Pending(Shared<LoadFuture>),
    Resolved(String),
}

pub struct ThemeResolver {
    loader: Box<dyn ThemeLoader>,
    slots: RefCell<HashMap<ThemeId, Slot>>,
}

impl ThemeResolver {
    pub fn new(loader: impl ThemeLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slots: RefCell::new(HashMap::new()),
        }
    }

    /// Resolver for the configured asset strategy.
    ///
    /// `fetch_text` is only used by the manifest strategy, to download the
    /// bundler manifest.
    pub fn for_assets(
        assets: &AssetsSection,
        fetch_text: impl Fn(&str) -> LoadFuture + 'static,
    ) -> Self {
        match effective_strategy(assets.strategy) {
            AssetStrategy::Static => Self::new(StaticPathLoader::new(assets.clone())),
            AssetStrategy::Manifest => Self::new(ManifestLoader::new(assets.clone(), fetch_text)),
        }
    }

    /// Already resolved URL, without triggering a load.
    pub fn cached(&self, theme: ThemeId) -> Option<String> {
        match self.slots.borrow().get(&theme) {
            Some(Slot::Resolved(href)) => Some(href.clone()),
            _ => None,
        }
    }

    pub async fn resolve(&self, theme: ThemeId) -> Result<String, ThemeError> {
        let pending = {
            let mut slots = self.slots.borrow_mut();
            match slots.get(&theme) {
                Some(Slot::Resolved(href)) => {
                    debug!(%theme, %href, "theme stylesheet served from cache");
                    return Ok(href.clone());
                }
                Some(Slot::Pending(load)) => load.clone(),
                None => {
                    debug!(%theme, "loading theme stylesheet");
                    let load = self.loader.load(theme).shared();
                    slots.insert(theme, Slot::Pending(load.clone()));
                    load
                }
            }
        };

        let result = pending.clone().await;

        let mut slots = self.slots.borrow_mut();
        match &result {
            Ok(href) => {
                slots.insert(theme, Slot::Resolved(href.clone()));
            }
            Err(error) => {
                // A retry may already own the slot.
                let owns_slot = matches!(
                    slots.get(&theme),
                    Some(Slot::Pending(current)) if current.ptr_eq(&pending)
                );
                if owns_slot {
                    slots.remove(&theme);
                }
                warn!(%theme, %error, "theme stylesheet failed to load");
            }
        }
        result
    }
}

/// Strategy after applying the build-time `STYLEBOOK_ASSETS` override.
pub fn effective_strategy(configured: AssetStrategy) -> AssetStrategy {
    if cfg!(STYLEBOOK_ASSETS = "STATIC") {
        AssetStrategy::Static
    } else if cfg!(STYLEBOOK_ASSETS = "MANIFEST") {
        AssetStrategy::Manifest
    } else {
        configured
    }
}

// ===== LOADERS =====

/// Stylesheets published under a fixed public directory.
pub struct StaticPathLoader {
    assets: AssetsSection,
}

impl StaticPathLoader {
    pub fn new(assets: AssetsSection) -> Self {
        Self { assets }
    }
}

impl ThemeLoader for StaticPathLoader {
    fn load(&self, theme: ThemeId) -> LoadFuture {
        let href = self.assets.static_href(theme);
        async move { Ok(href) }.boxed_local()
    }
}

type ManifestFuture = LocalBoxFuture<'static, Result<Rc<AssetManifest>, ThemeError>>;

/// Stylesheets emitted by a bundler, located through its JSON manifest.
///
/// The manifest is downloaded once and shared by every theme lookup.
pub struct ManifestLoader {
    assets: AssetsSection,
    fetch_text: Rc<dyn Fn(&str) -> LoadFuture>,
    manifest: Rc<RefCell<Option<Shared<ManifestFuture>>>>,
}

impl ManifestLoader {
    pub fn new(assets: AssetsSection, fetch_text: impl Fn(&str) -> LoadFuture + 'static) -> Self {
        Self {
            assets,
            fetch_text: Rc::new(fetch_text),
            manifest: Rc::new(RefCell::new(None)),
        }
    }

    fn manifest(&self) -> Shared<ManifestFuture> {
        let mut slot = self.manifest.borrow_mut();
        if let Some(pending) = slot.as_ref() {
            return pending.clone();
        }
        let text = (self.fetch_text)(&self.assets.manifest_url);
        let pending = async move {
            let text = text.await?;
            AssetManifest::from_json(&text).map(Rc::new)
        }
        .boxed_local()
        .shared();
        *slot = Some(pending.clone());
        pending
    }
}

impl ThemeLoader for ManifestLoader {
    fn load(&self, theme: ThemeId) -> LoadFuture {
        let pending = self.manifest();
        let slot = Rc::clone(&self.manifest);
        let assets = self.assets.clone();
        async move {
            let manifest = match pending.clone().await {
                Ok(manifest) => manifest,
                Err(error) => {
                    let mut slot = slot.borrow_mut();
                    if slot.as_ref().is_some_and(|current| current.ptr_eq(&pending)) {
                        *slot = None;
                    }
                    return Err(error);
                }
            };
            manifest.stylesheet_href(&assets, theme)
        }
        .boxed_local()
    }
}
