// ABOUTME: Configuration management for the portal client
// Handles API endpoints, upload limits, session backend and UI preferences

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.base_url`
pub const API_URL_ENV: &str = "ICT_PORTAL_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Portal API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Materials upload limits
    #[serde(default)]
    pub materials: MaterialsConfig,

    /// Where the signed-in session is kept
    #[serde(default)]
    pub session: SessionConfig,

    /// UI preferences
    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the portal API, e.g. `https://portal.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Endpoint paths relative to `base_url`
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            endpoints: EndpointConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// REGISTRATION.SUBMIT
    #[serde(default = "default_registration_submit")]
    pub registration_submit: String,

    /// AUTH.LOGIN
    #[serde(default = "default_auth_login")]
    pub auth_login: String,

    /// MATERIALS.UPLOAD
    #[serde(default = "default_materials_upload")]
    pub materials_upload: String,

    /// ATTENDANCE.CHECK_IN
    #[serde(default = "default_attendance_check_in")]
    pub attendance_check_in: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            registration_submit: default_registration_submit(),
            auth_login: default_auth_login(),
            materials_upload: default_materials_upload(),
            attendance_check_in: default_attendance_check_in(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialsConfig {
    /// Largest file accepted for upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Lowercase file extensions accepted for upload
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Storage backend for the signed-in session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// JSON file under the portal data directory
    #[default]
    File,
    /// System keychain
    Keyring,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Show the password rules under the password fields
    #[serde(default = "default_true")]
    pub show_password_hints: bool,

    /// Event loop tick in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            show_password_hints: default_true(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_registration_submit() -> String {
    "/api/registration".to_string()
}

fn default_auth_login() -> String {
    "/api/auth/login".to_string()
}

fn default_materials_upload() -> String {
    "/api/materials/upload".to_string()
}

fn default_attendance_check_in() -> String {
    "/api/attendance/check-in".to_string()
}

fn default_max_upload_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    [
        "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "txt", "png", "jpg", "jpeg", "zip",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_tick_rate_ms() -> u64 {
    250
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from default locations, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_paths(&Self::get_config_paths())?;
        config.apply_env_overrides(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    /// Load and merge config files, lowest precedence last
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Self::default();

        // Lowest precedence first so higher ones overwrite
        for path in paths.iter().rev() {
            if path.exists() {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;

                let file_config: AppConfig = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config from {}", path.display()))?;

                tracing::debug!("Merging config from {}", path.display());
                config.merge(file_config);
            }
        }

        Ok(config)
    }

    /// Save configuration to user config directory
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::get_user_config_dir()?;
        self.save_to(&config_dir.join("config.toml"))
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Base directory for portal data (`~/.ict-portal`)
    pub fn base_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".ict-portal"))
    }

    /// Get configuration file paths in order of precedence
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".ict-portal").join("config.toml"));
        }

        // 2. User config (~/.ict-portal/config/config.toml)
        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        // 3. System config
        paths.push(PathBuf::from("/etc/ict-portal/config.toml"));

        paths
    }

    /// Get user configuration directory
    fn get_user_config_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config"))
    }

    /// Apply environment overrides
    pub fn apply_env_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            tracing::info!("Using API base URL from {}", API_URL_ENV);
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Merge another config into this one
    fn merge(&mut self, other: AppConfig) {
        // Don't override version
        if other.api.base_url != default_base_url() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.timeout_secs != default_timeout_secs() {
            self.api.timeout_secs = other.api.timeout_secs;
        }

        let defaults = EndpointConfig::default();
        let endpoints = other.api.endpoints;
        if endpoints.registration_submit != defaults.registration_submit {
            self.api.endpoints.registration_submit = endpoints.registration_submit;
        }
        if endpoints.auth_login != defaults.auth_login {
            self.api.endpoints.auth_login = endpoints.auth_login;
        }
        if endpoints.materials_upload != defaults.materials_upload {
            self.api.endpoints.materials_upload = endpoints.materials_upload;
        }
        if endpoints.attendance_check_in != defaults.attendance_check_in {
            self.api.endpoints.attendance_check_in = endpoints.attendance_check_in;
        }

        if other.materials.max_upload_bytes != default_max_upload_bytes() {
            self.materials.max_upload_bytes = other.materials.max_upload_bytes;
        }
        if other.materials.allowed_extensions != default_allowed_extensions() {
            self.materials.allowed_extensions = other
                .materials
                .allowed_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect();
        }

        if other.session.backend != SessionBackend::default() {
            self.session.backend = other.session.backend;
        }

        self.ui_preferences.show_password_hints = other.ui_preferences.show_password_hints;
        if other.ui_preferences.tick_rate_ms != default_tick_rate_ms() {
            self.ui_preferences.tick_rate_ms = other.ui_preferences.tick_rate_ms;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            materials: MaterialsConfig::default(),
            session: SessionConfig::default(),
            ui_preferences: UiPreferences::default(),
        }
    }
}
