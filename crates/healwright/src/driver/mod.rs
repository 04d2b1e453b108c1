//! Browser driver layer.
//!
//! [`LivePage`] is the narrow seam the locator core depends on; everything
//! else here is the chromiumoxide-backed implementation of it plus the
//! page operations the page objects use.

pub mod page;
pub mod session;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// The three capabilities the locator core consumes from a live page.
///
/// Production code gets this from [`PageHandle`]; tests substitute fakes.
#[async_trait]
pub trait LivePage: Send + Sync {
    /// Waits for `selector` to be present in the DOM, up to `timeout`.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Whether `selector` currently resolves to a visible element.
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Full DOM content of the page.
    async fn content(&self) -> Result<String>;
}

pub use page::PageHandle;
pub use session::BrowserSession;
