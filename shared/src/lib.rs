use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ===== THEME TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Default,
    VirkDk,
    BorgerDk,
}

impl ThemeId {
    pub const ALL: [ThemeId; 3] = [ThemeId::Default, ThemeId::VirkDk, ThemeId::BorgerDk];

    /// Identifier as stored in the durable store and used in class names.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Default => "default",
            ThemeId::VirkDk => "virkdk",
            ThemeId::BorgerDk => "borgerdk",
        }
    }

    /// Body class marking this theme as the active one, e.g. `theme-virkdk`.
    pub fn marker_class(self) -> String {
        format!("{MARKER_CLASS_PREFIX}{}", self.as_str())
    }

    /// File name of the stylesheet shipped for this theme.
    pub fn stylesheet_file(self) -> &'static str {
        match self {
            ThemeId::Default => "dkfds.css",
            ThemeId::VirkDk => "dkfds-virkdk.css",
            ThemeId::BorgerDk => "dkfds-borgerdk.css",
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = ThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ThemeId::ALL
            .into_iter()
            .find(|theme| theme.as_str() == value)
            .ok_or_else(|| ThemeError::UnknownTheme(value.to_string()))
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeDescriptor {
    pub id: ThemeId,
    pub label: &'static str,
}

/// Selectable themes in display order.
pub const THEMES: &[ThemeDescriptor] = &[
    ThemeDescriptor { id: ThemeId::Default, label: "Default" },
    ThemeDescriptor { id: ThemeId::VirkDk, label: "Virk.dk" },
    ThemeDescriptor { id: ThemeId::BorgerDk, label: "Borger.dk" },
];

pub fn find_descriptor(
    descriptors: &'static [ThemeDescriptor],
    theme: ThemeId,
) -> Option<&'static ThemeDescriptor> {
    descriptors.iter().find(|descriptor| descriptor.id == theme)
}

// ===== DOM CONVENTIONS =====

/// Attribute carried by the one stylesheet link owned by the theme engine.
pub const THEME_LINK_ATTRIBUTE: &str = "data-theme";
pub const THEME_LINK_TAG: &str = "dkfds";
pub const MARKER_CLASS_PREFIX: &str = "theme-";
pub const DEFAULT_STORAGE_KEY: &str = "dkfds-theme";

/// Every marker class a theme can put on `<body>`.
pub fn all_marker_classes() -> Vec<String> {
    ThemeId::ALL.into_iter().map(ThemeId::marker_class).collect()
}

// ===== ERROR TYPES =====

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    #[error("failed to load stylesheet for theme '{theme}': {reason}")]
    AssetLoad { theme: ThemeId, reason: String },
    #[error("invalid asset manifest: {0}")]
    Manifest(String),
    #[error("asset manifest has no entry '{key}'")]
    MissingManifestEntry { key: String },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("invalid theme config: {0}")]
    Config(String),
}

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub default_theme: ThemeId,
    pub assets: AssetsSection,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_theme: ThemeId::Default,
            assets: AssetsSection::default(),
        }
    }
}

impl ThemeConfig {
    pub fn from_toml(text: &str) -> Result<Self, ThemeError> {
        toml::from_str(text).map_err(|error| ThemeError::Config(error.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetStrategy {
    /// Stylesheets are served from a fixed public directory.
    #[default]
    Static,
    /// Stylesheets are emitted by a bundler and located through its manifest.
    Manifest,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssetsSection {
    pub strategy: AssetStrategy,
    pub base_path: String,
    pub manifest_url: String,
    pub source_prefix: String,
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            strategy: AssetStrategy::Static,
            base_path: "/css".to_string(),
            manifest_url: "/manifest.json".to_string(),
            source_prefix: "node_modules/dkfds/dist/css".to_string(),
        }
    }
}

impl AssetsSection {
    pub fn static_href(&self, theme: ThemeId) -> String {
        join_path(&self.base_path, theme.stylesheet_file())
    }

    pub fn manifest_key(&self, theme: ThemeId) -> String {
        join_path(&self.source_prefix, theme.stylesheet_file())
            .trim_start_matches('/')
            .to_string()
    }
}

// ===== ASSET MANIFEST =====

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub file: String,
    #[serde(default)]
    pub src: Option<String>,
}

/// Bundler output manifest: source path -> emitted asset.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: HashMap<String, ManifestEntry>,
}

impl AssetManifest {
    pub fn from_json(text: &str) -> Result<Self, ThemeError> {
        serde_json::from_str(text).map_err(|error| ThemeError::Manifest(error.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Public URL of the emitted stylesheet for `theme`.
    pub fn stylesheet_href(&self, assets: &AssetsSection, theme: ThemeId) -> Result<String, ThemeError> {
        let key = assets.manifest_key(theme);
        let entry = self
            .entries
            .get(&key)
            .ok_or_else(|| ThemeError::MissingManifestEntry { key: key.clone() })?;
        Ok(format!("/{}", entry.file.trim_start_matches('/')))
    }
}

// ===== UTILITY FUNCTIONS =====

fn join_path(base: &str, file: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        format!("/{file}")
    } else {
        format!("{base}/{file}")
    }
}
