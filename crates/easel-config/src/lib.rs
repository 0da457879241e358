//! Easel configuration system
//!
//! This crate provides centralized configuration management for Easel,
//! loading settings from `easel.toml` as an alternative to environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Easel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EaselConfig {
    /// Transcoding and layout settings
    pub transcode: TranscodeConfig,
    /// Chat panel settings
    pub chat: ChatConfig,
    /// Plugin window settings
    pub ui: UiConfig,
}

/// Transcoding and layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Width of committed document frames in points
    pub frame_width: f32,
    /// Inner padding of document frames in points
    pub padding: f32,
    /// Timeout for the HTML parse round-trip in milliseconds
    pub parse_timeout_ms: u64,
    /// Font family every run falls back to
    pub default_font: String,
    /// Monospace family used when no candidate loads
    pub monospace_fallback: String,
}

/// Chat panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Chat completion endpoint URL
    pub endpoint: Option<String>,
    /// Model identifier to request
    pub model: Option<String>,
}

/// Plugin window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Panel height when collapsed, in pixels
    pub collapsed_height: u32,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            frame_width: 800.0,
            padding: 40.0,
            parse_timeout_ms: 5000,
            default_font: "Inter".to_string(),
            monospace_fallback: "Courier New".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            width: 380,
            height: 700,
            collapsed_height: 50,
        }
    }
}

impl EaselConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the easel.toml configuration file
    ///
    /// # Returns
    /// * `Ok(EaselConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (easel.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("easel.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// This allows for temporary overrides without modifying the config file.
    pub fn merge_with_env(&mut self) {
        // Transcode settings
        if let Ok(val) = std::env::var("EASEL_FRAME_WIDTH") {
            if let Ok(width) = val.parse::<f32>() {
                self.transcode.frame_width = width;
            }
        }
        if let Ok(val) = std::env::var("EASEL_PADDING") {
            if let Ok(padding) = val.parse::<f32>() {
                self.transcode.padding = padding;
            }
        }
        if let Ok(val) = std::env::var("EASEL_PARSE_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse::<u64>() {
                self.transcode.parse_timeout_ms = timeout;
            }
        }
        if let Ok(font) = std::env::var("EASEL_DEFAULT_FONT") {
            self.transcode.default_font = font;
        }
        if let Ok(font) = std::env::var("EASEL_MONOSPACE_FALLBACK") {
            self.transcode.monospace_fallback = font;
        }

        // Chat settings
        if let Ok(endpoint) = std::env::var("EASEL_CHAT_ENDPOINT") {
            self.chat.endpoint = Some(endpoint);
        }
        if let Ok(model) = std::env::var("EASEL_CHAT_MODEL") {
            self.chat.model = Some(model);
        }

        // UI settings
        if let Ok(val) = std::env::var("EASEL_UI_WIDTH") {
            if let Ok(width) = val.parse::<u32>() {
                self.ui.width = width;
            }
        }
        if let Ok(val) = std::env::var("EASEL_UI_HEIGHT") {
            if let Ok(height) = val.parse::<u32>() {
                self.ui.height = height;
            }
        }
        if let Ok(val) = std::env::var("EASEL_UI_COLLAPSED_HEIGHT") {
            if let Ok(height) = val.parse::<u32>() {
                self.ui.collapsed_height = height;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from easel.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
