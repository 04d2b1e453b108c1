//! Browser session lifecycle: launch, page creation, screenshots, teardown.

use std::path::{Path, PathBuf};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::{BrowserKind, FrameworkConfig};
use crate::driver::PageHandle;
use crate::error::{Error, Result};

/// Executable names probed per browser kind when no explicit path is
/// configured. chromiumoxide's own detection is the final fallback.
fn candidate_executables(kind: BrowserKind) -> &'static [&'static str] {
    match kind {
        BrowserKind::Chrome => &["google-chrome", "google-chrome-stable", "chrome"],
        BrowserKind::Chromium => &["chromium", "chromium-browser"],
        BrowserKind::Edge => &["msedge", "microsoft-edge", "microsoft-edge-stable"],
    }
}

fn detect_executable(kind: BrowserKind) -> Option<PathBuf> {
    candidate_executables(kind)
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// One launched browser with its initial page, already navigated to the
/// configured base URL.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: PageHandle,
}

impl BrowserSession {
    /// Launches the configured browser and opens the application's base URL.
    pub async fn launch(config: &FrameworkConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder();

        // chromiumoxide defaults to headless; with_head() shows the window.
        if !config.browser.headless {
            builder = builder.with_head();
        }
        if let Some((width, height)) = config.browser.window_size {
            builder = builder.window_size(width, height);
        }

        let executable = config
            .browser
            .executable
            .clone()
            .or_else(|| detect_executable(config.browser.kind));
        match &executable {
            Some(path) => {
                info!(kind = ?config.browser.kind, path = %path.display(), "browser executable selected");
                builder = builder.chrome_executable(path);
            }
            None => {
                info!(kind = ?config.browser.kind, "no executable detected; relying on default discovery");
            }
        }

        let browser_config = builder
            .build()
            .map_err(|e| Error::LaunchFailed(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| Error::LaunchFailed(e.to_string()))?;

        // Drive CDP events for the lifetime of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
        });

        let base_url = config.app.base_url.as_str();
        info!(url = base_url, headless = config.browser.headless, "opening application");
        let page = browser
            .new_page(base_url)
            .await
            .map_err(|e| Error::Driver(e.to_string()).context("opening initial page"))?;
        let _ = page.wait_for_navigation().await;

        Ok(Self {
            browser,
            handler_task,
            page: PageHandle::new(page),
        })
    }

    /// The session's page.
    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    /// Captures a full-page PNG into `dir` with a timestamped filename and
    /// returns the path.
    pub async fn screenshot(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.png", chrono::Utc::now().timestamp_millis()));

        let image = self
            .page
            .inner()
            .screenshot(
                chromiumoxide::page::ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await
            .map_err(|e| Error::Driver(format!("screenshot failed: {e}")))?;

        std::fs::write(&path, &image)?;
        info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }

    /// Closes the browser and stops the event handler. Errors are logged,
    /// not propagated — teardown should never fail a finished test group.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            error!(error = %e, "error closing browser");
        }
        let _ = self.handler_task.await;
    }
}
