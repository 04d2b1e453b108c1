//! Framework configuration
//!
//! Loaded once from a TOML file at suite startup and passed by reference to
//! the session, page objects, and resolvers. Every section has sensible
//! defaults so a partial file (or none at all) still yields a usable config.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable consulted for the language-model API key when the
/// config file does not carry one.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Top-level framework configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Application under test
    pub app: AppSettings,

    /// Browser launch options
    pub browser: BrowserSettings,

    /// Locator repository options
    pub repository: RepositorySettings,

    /// Self-healing / language-model options
    pub self_healing: SelfHealingSettings,

    /// Credentials and MFA secrets
    pub auth: AuthSettings,

    /// Reporting (screenshots, logs)
    pub reports: ReportSettings,
}

impl FrameworkConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("invalid config: {e}")))
    }

    /// Resolves the language-model API key: the `OPENAI_API_KEY` environment
    /// variable takes precedence over the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.self_healing.api_key.clone())
    }
}

/// Application under test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// URL the browser navigates to at session start (the login page)
    pub base_url: String,

    /// URL the application lands on after a successful login
    pub home_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/login".to_string(),
            home_url: "http://localhost:8080/home".to_string(),
        }
    }
}

/// Which browser binary to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Chromium,
    Edge,
}

/// Browser launch options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Browser flavor, used for executable auto-detection
    pub kind: BrowserKind,

    /// Explicit path to the browser binary; overrides auto-detection
    pub executable: Option<PathBuf>,

    /// Run without a visible window
    pub headless: bool,

    /// Window size as (width, height)
    pub window_size: Option<(u32, u32)>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chrome,
            executable: None,
            headless: true,
            window_size: None,
        }
    }
}

/// Locator repository options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    /// Directory holding one CSV source file per logical page
    pub dir: PathBuf,

    /// How long a probe waits for a selector before the repair path kicks in
    pub probe_timeout_ms: u64,
}

impl RepositorySettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("object_repository"),
            probe_timeout_ms: 10_000,
        }
    }
}

/// Self-healing / language-model options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfHealingSettings {
    /// Master switch; when off a failed probe reports absent without any
    /// language-model call
    pub enabled: bool,

    /// Chat-completions model name
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,

    /// API key; the `OPENAI_API_KEY` environment variable overrides this
    pub api_key: Option<String>,

    /// Per-request timeout
    pub request_timeout_ms: u64,

    /// Total attempts per completion (first try + retries)
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub retry_delay_ms: u64,
}

impl SelfHealingSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for SelfHealingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            request_timeout_ms: 60_000,
            max_attempts: 3,
            retry_delay_ms: 2_000,
        }
    }
}

/// Credentials and MFA secrets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub username: Option<String>,
    pub password: Option<String>,

    /// Base32-encoded TOTP secrets, keyed by the secret-selection rules in
    /// [`crate::mfa::secret_key_for`] (`mfa_secret`, `mfa_secret_automation`,
    /// `mfa_secret_review`, `mfa_secret_reviewL2`)
    pub mfa_secrets: HashMap<String, String>,
}

/// Reporting (screenshots, logs)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory screenshots are written into
    pub screenshot_dir: PathBuf,

    /// Directory the execution log file is written into
    pub log_dir: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from("reports"),
            log_dir: PathBuf::from("logs"),
        }
    }
}
