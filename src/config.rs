//! Configuration persistence for mangalens settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured backend URL
pub const BACKEND_URL_ENV: &str = "MANGALENS_BACKEND_URL";

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for OverlayColor {
    fn default() -> Self {
        // Blue, matching the live drag preview
        Self {
            r: 0.23,
            g: 0.51,
            b: 0.96,
        }
    }
}

impl OverlayColor {
    /// Convert to RGBA bytes (0-255) with the given alpha
    pub fn to_rgba_u8(self, alpha: u8) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            alpha,
        ]
    }
}

/// Translation engine the backend should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TranslationMethod {
    /// Large language model translation, keeps conversational context
    #[default]
    #[serde(rename = "method1")]
    Llm,
    /// DeepL machine translation
    #[serde(rename = "method2")]
    DeepL,
}

impl TranslationMethod {
    pub fn label(self) -> &'static str {
        match self {
            TranslationMethod::Llm => "LLM",
            TranslationMethod::DeepL => "DeepL",
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaLensConfig {
    /// Base URL of the recognition/translation backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Which translation engine to request
    #[serde(default)]
    pub translation_method: TranslationMethod,
    /// Outline color of stored region overlays
    #[serde(default)]
    pub overlay_color: OverlayColor,
    /// Whether overlays get a dark border for contrast
    #[serde(default = "default_overlay_shadow")]
    pub overlay_shadow: bool,
    /// Width of the detail popup in screen pixels
    #[serde(default = "default_popup_width")]
    pub popup_width: f32,
    /// Gap between a region box and its popup in screen pixels
    #[serde(default = "default_popup_gap")]
    pub popup_gap: f32,
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_overlay_shadow() -> bool {
    true
}

fn default_popup_width() -> f32 {
    320.0
}

fn default_popup_gap() -> f32 {
    8.0
}

impl Default for MangaLensConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            translation_method: TranslationMethod::default(),
            overlay_color: OverlayColor::default(),
            overlay_shadow: default_overlay_shadow(),
            popup_width: default_popup_width(),
            popup_gap: default_popup_gap(),
        }
    }
}

impl MangaLensConfig {
    /// Directory name under the platform config dir
    pub const APP_DIR: &'static str = "mangalens";
    pub const FILE_NAME: &'static str = "config.json";

    /// Default location of the config file, if the platform has a config dir
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))
    }

    /// Backend URL with the environment override applied, without a trailing slash
    pub fn backend_url(&self) -> String {
        let url = std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.backend_url.clone());
        url.trim().trim_end_matches('/').to_string()
    }
}
