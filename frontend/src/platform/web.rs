//! Web platform implementation using `web-sys`

use crate::story_frame::{self, Embedding};
use crate::theme::{
    KeyValueStore, LoadFuture, ThemeController, ThemeDocument, ThemePersistence, ThemeResolver,
    ThemeState,
};
use futures::FutureExt;
use shared::{THEME_LINK_ATTRIBUTE, THEME_LINK_TAG, ThemeConfig, ThemeError};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

thread_local! {
    static PAGE_RESOLVER: RefCell<Option<Rc<ThemeResolver>>> = const { RefCell::new(None) };
}

fn describe(context: &str, error: JsValue) -> String {
    format!("{context}: {error:?}")
}

/// Where this page runs: top-level document, nested story frame or no DOM.
pub fn detect_embedding() -> Embedding {
    let Some(window) = web_sys::window() else {
        return Embedding::Headless;
    };
    if window.document().is_none() {
        return Embedding::Headless;
    }
    match window.top() {
        Ok(Some(top)) if !js_sys::Object::is(window.as_ref(), top.as_ref()) => Embedding::StoryFrame,
        _ => Embedding::TopLevel,
    }
}

/// Controller over the page-wide theme state, wired to the browser.
///
/// The resolver is shared by every controller on the page, so each theme is
/// loaded once no matter how many switchers are mounted.
pub fn page_controller(config: &ThemeConfig, style_top_level: bool) -> (ThemeController, Embedding) {
    let embedding = detect_embedding();

    let persistence = match BrowserStorage::local() {
        Some(storage) => ThemePersistence::new(storage, config.storage_key.clone()),
        None => ThemePersistence::detached(config.storage_key.clone()),
    };
    let applier = story_frame::applier_for(embedding, style_top_level, BrowserDocument::current());

    let controller = ThemeController::builder(page_resolver(config))
        .state(ThemeState::page())
        .persistence(persistence)
        .applier(applier)
        .default_theme(config.default_theme)
        .build();
    (controller, embedding)
}

fn page_resolver(config: &ThemeConfig) -> Rc<ThemeResolver> {
    PAGE_RESOLVER.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(|| Rc::new(ThemeResolver::for_assets(&config.assets, fetch_text)))
            .clone()
    })
}

// ===== DOCUMENT =====

pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    fn theme_link_selector() -> String {
        format!("link[{THEME_LINK_ATTRIBUTE}=\"{THEME_LINK_TAG}\"]")
    }
}

impl ThemeDocument for BrowserDocument {
    fn remove_theme_links(&self) -> Result<usize, ThemeError> {
        let links = self
            .document
            .query_selector_all(&Self::theme_link_selector())
            .map_err(|error| ThemeError::Dom(describe("querySelectorAll", error)))?;
        let mut removed = 0;
        for index in 0..links.length() {
            if let Some(element) = links.item(index).and_then(|node| node.dyn_into::<web_sys::Element>().ok()) {
                element.remove();
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn append_theme_link(&self, href: &str) -> Result<(), ThemeError> {
        let head = self
            .document
            .head()
            .ok_or_else(|| ThemeError::Dom("document has no <head>".to_string()))?;
        let link = self
            .document
            .create_element("link")
            .map_err(|error| ThemeError::Dom(describe("createElement", error)))?
            .dyn_into::<web_sys::HtmlLinkElement>()
            .map_err(|_| ThemeError::Dom("created element is not a <link>".to_string()))?;
        link.set_rel("stylesheet");
        link.set_href(href);
        link.set_attribute(THEME_LINK_ATTRIBUTE, THEME_LINK_TAG)
            .map_err(|error| ThemeError::Dom(describe("setAttribute", error)))?;
        head.append_child(&link)
            .map_err(|error| ThemeError::Dom(describe("appendChild", error)))?;
        Ok(())
    }

    fn has_theme_link(&self) -> bool {
        matches!(
            self.document.query_selector(&Self::theme_link_selector()),
            Ok(Some(_))
        )
    }

    fn replace_body_classes(&self, stale: &[String], marker: &str) -> Result<(), ThemeError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| ThemeError::Dom("document has no <body>".to_string()))?;
        let classes = body.class_list();
        for class in stale {
            classes
                .remove_1(class)
                .map_err(|error| ThemeError::Dom(describe("classList.remove", error)))?;
        }
        classes
            .add_1(marker)
            .map_err(|error| ThemeError::Dom(describe("classList.add", error)))
    }
}

// ===== STORAGE =====

pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// `None` when `localStorage` is missing or blocked.
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError> {
        self.storage
            .get_item(key)
            .map_err(|error| ThemeError::Storage(describe("getItem", error)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.storage
            .set_item(key, value)
            .map_err(|error| ThemeError::Storage(describe("setItem", error)))
    }
}

// ===== NETWORK =====

/// Downloads `url` as text; used for the bundler manifest.
pub fn fetch_text(url: &str) -> LoadFuture {
    let url = url.to_string();
    async move {
        let window = web_sys::window().ok_or_else(|| ThemeError::Manifest("no window".to_string()))?;
        let response = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(|error| ThemeError::Manifest(describe(&url, error)))?
            .dyn_into::<web_sys::Response>()
            .map_err(|error| ThemeError::Manifest(describe(&url, error)))?;
        if !response.ok() {
            return Err(ThemeError::Manifest(format!("{url}: HTTP {}", response.status())));
        }
        let body = response
            .text()
            .map_err(|error| ThemeError::Manifest(describe(&url, error)))?;
        JsFuture::from(body)
            .await
            .map_err(|error| ThemeError::Manifest(describe(&url, error)))?
            .as_string()
            .ok_or_else(|| ThemeError::Manifest(format!("{url}: response body is not text")))
    }
    .boxed_local()
}

// ===== LOGGING =====

/// Routes `tracing` events to the browser console.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(ConsoleMakeWriter)
        .try_init();
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

/// Buffers one formatted event and prints it with `zoon::println!` when dropped.
#[derive(Default)]
struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            zoon::println!("{line}");
        }
    }
}
