//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted vision model that turns a fridge photo into
/// ingredients and recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the Gemini REST API (no trailing slash).
    pub base_url: String,
    /// API key: `None` means "read `GEMINI_API_KEY` / `API_KEY` from the
    /// environment".
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"gemini-2.5-flash"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
    /// Number of recipes the model is asked to propose.
    pub recipe_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.5-flash".into(),
            temperature: 0.4,
            timeout_secs: 60,
            recipe_count: 4,
        }
    }
}

impl AnalysisConfig {
    /// Environment variables consulted, in order, when `api_key` is unset.
    pub const API_KEY_VARS: [&'static str; 2] = ["GEMINI_API_KEY", "API_KEY"];

    /// Resolve the API key: a non-empty configured key wins, then the
    /// environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Some(key.to_string());
        }
        Self::API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.is_empty())
    }
}

// ---------------------------------------------------------------------------
// CameraConfig
// ---------------------------------------------------------------------------

/// Settings for the still-image camera device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// A photo file, or a directory whose newest image is used as the frame.
    ///
    /// `None` resolves to [`AppPaths::captures_dir`].
    pub source: Option<PathBuf>,
    /// Longest edge of the frame sent to the model, in pixels.
    pub max_dimension: u32,
    /// JPEG quality (1 – 100).
    pub jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: None,
            max_dimension: 1568,
            jpeg_quality: 85,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceEngine
// ---------------------------------------------------------------------------

/// Which text-to-speech program narrates cooking steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VoiceEngine {
    /// `espeak-ng` (Linux, Windows).
    EspeakNg,
    /// The macOS `say` command.
    Say,
}

impl Default for VoiceEngine {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Say
        } else {
            Self::EspeakNg
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceConfig
// ---------------------------------------------------------------------------

/// Narration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Narrate cooking steps at all.
    pub enabled: bool,
    /// Speech program to drive.
    pub engine: VoiceEngine,
    /// Path to the engine's executable when it is not on `PATH`.
    pub program: Option<String>,
    /// Speaking rate relative to the engine's normal speed (1.0 = normal).
    pub rate: f32,
    /// Pitch relative to the engine's normal pitch (1.0 = normal, 0.0 – 2.0).
    pub pitch: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: VoiceEngine::default(),
            program: None,
            rate: 0.9,
            pitch: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Dietary filters offered on the recipes screen.  The first entry should
    /// be the `"All"` sentinel.
    pub dietary_options: Vec<String>,
    /// Initial window size `(width, height)` in logical pixels.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dietary_options: crate::recipe::DEFAULT_DIETARY_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            window_size: (420.0, 720.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use fridge_chef::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Vision model settings.
    pub analysis: AnalysisConfig,
    /// Camera device settings.
    pub camera: CameraConfig,
    /// Narration settings.
    pub voice: VoiceConfig,
    /// UI / window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The camera source with the platform default filled in.
    pub fn camera_source(&self) -> PathBuf {
        self.camera
            .source
            .clone()
            .unwrap_or_else(|| AppPaths::new().captures_dir)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
