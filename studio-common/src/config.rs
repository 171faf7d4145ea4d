//! Configuration loading for the studio tools
//!
//! Resolution order for the config file:
//! 1. Explicit path (command-line argument)
//! 2. `STUDIO_CONFIG` environment variable
//! 3. Platform config dir (`<config_dir>/studio/textures.toml`)
//! 4. Compiled defaults
//!
//! Individual keys can then be overridden from the environment.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_ENV_VAR: &str = "STUDIO_CONFIG";
pub const DATABASE_ENV_VAR: &str = "STUDIO_DATABASE";
pub const AI_API_KEY_ENV_VAR: &str = "STUDIO_AI_API_KEY";
pub const AI_BASE_URL_ENV_VAR: &str = "STUDIO_AI_BASE_URL";
pub const AI_MODEL_ENV_VAR: &str = "STUDIO_AI_MODEL";
pub const IMAGE_ENDPOINT_ENV_VAR: &str = "STUDIO_IMAGE_ENDPOINT";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudioConfig {
    /// SQLite catalog location (defaults to the platform data dir)
    pub database_path: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
    pub ai: AiConfig,
    pub image: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Texture pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum textures linked per style
    pub max_textures_per_style: usize,
    /// Delay between descriptors (external API pacing)
    pub pacing_interval_ms: u64,
    /// Match context snapshot lifetime
    pub context_ttl_secs: u64,
    /// Cap on texture projections loaded into the match context
    pub context_texture_limit: usize,
    pub generate_images: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_textures_per_style: 5,
            pacing_interval_ms: 1000,
            context_ttl_secs: 300,
            context_texture_limit: 200,
            generate_images: true,
        }
    }
}

/// Semantic-match model endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 30,
            requests_per_minute: 30,
        }
    }
}

/// External image-generation service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// POST endpoint; `None` disables image generation regardless of pipeline flag
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 120,
        }
    }
}

/// Load configuration following the resolution order in the module docs
///
/// A missing file at the explicit path is an error; a missing default file is not.
pub fn load_config(explicit_path: Option<&Path>) -> Result<StudioConfig> {
    let path = match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => std::env::var(CONFIG_ENV_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| default_config_path().filter(|p| p.exists())),
    };

    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let config = parse_config(&content)?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => {
            warn!("No configuration file found, using compiled defaults");
            StudioConfig::default()
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse TOML content into a config (missing keys take defaults)
pub fn parse_config(content: &str) -> Result<StudioConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Overlay environment variables on top of file values
pub fn apply_env_overrides(config: &mut StudioConfig) {
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        config.database_path = Some(PathBuf::from(path));
    }
    if let Ok(url) = std::env::var(AI_BASE_URL_ENV_VAR) {
        config.ai.base_url = url;
    }
    if let Ok(model) = std::env::var(AI_MODEL_ENV_VAR) {
        config.ai.model = model;
    }
    if let Ok(endpoint) = std::env::var(IMAGE_ENDPOINT_ENV_VAR) {
        config.image.endpoint = Some(endpoint);
    }
}

/// Resolve the AI API key
///
/// **Priority:** Environment → TOML
pub fn resolve_ai_api_key(config: &StudioConfig) -> Result<String> {
    let env_key = std::env::var(AI_API_KEY_ENV_VAR)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = config.ai.api_key.as_ref().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("AI API key found in both environment and TOML config. Using environment.");
    }

    if let Some(key) = env_key {
        info!("AI API key loaded from environment variable");
        return Ok(key);
    }
    if let Some(key) = toml_key {
        info!("AI API key loaded from TOML config");
        return Ok(key.clone());
    }

    Err(Error::Config(format!(
        "AI API key not configured. Set {} or `api_key` under [ai] in the config file",
        AI_API_KEY_ENV_VAR
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// `<config_dir>/studio/textures.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("studio").join("textures.toml"))
}

/// Database path from config, or `<data_local_dir>/studio/studio.db`
pub fn resolve_database_path(config: &StudioConfig) -> PathBuf {
    config.database_path.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .map(|d| d.join("studio").join("studio.db"))
            .unwrap_or_else(|| PathBuf::from("./studio_data/studio.db"))
    })
}
