// Error types for healwright

use thiserror::Error;

/// Result type alias for healwright operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using healwright
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to launch the browser process
    ///
    /// Common causes: no Chrome/Chromium binary on the PATH, insufficient
    /// permissions, or a stale user-data directory lock.
    #[error("Failed to launch browser: {0}. Check that Chrome or Chromium is installed.")]
    LaunchFailed(String),

    /// CDP-level error while driving the browser
    #[error("Driver error: {0}")]
    Driver(String),

    /// Selector did not become present/visible within the probe timeout
    #[error("Probe timeout after {duration_ms}ms waiting for selector '{selector}'")]
    ProbeTimeout { selector: String, duration_ms: u64 },

    /// No selector is registered for the requested element key
    ///
    /// Raised by callers that require a locator to exist (page objects,
    /// validation helpers). The repository itself reports absence as a
    /// [`Lookup`](crate::repository::Lookup) value, not an error.
    #[error("No locator for element '{key}' in source '{source_name}'")]
    LocatorNotFound { key: String, source_name: String },

    /// Selector candidate was rejected by the persist-time validation hook
    #[error("Selector rejected by validation: {0:?}")]
    InvalidSelector(String),

    /// The language-model service call failed (after its retry budget)
    #[error("Language-model request failed: {0}")]
    Llm(String),

    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOTP code generation failed (bad secret or parameters)
    #[error("TOTP error: {0}")]
    Totp(String),

    /// Live-page state did not match the expected value
    ///
    /// Carries a descriptive message with the element key, expected and
    /// actual values so the failing test step is diagnosable from the log.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }
}
