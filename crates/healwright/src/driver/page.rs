//! Page handle over a chromiumoxide page.
//!
//! Selector expressions are opaque to the repository, so the handle accepts
//! both syntaxes the stored locators use: expressions starting with `/` or
//! `(` are evaluated as XPath, everything else as a CSS selector. All
//! element operations go through injected JS for that reason.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::driver::LivePage;
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A live page plus the element operations the page objects use.
pub struct PageHandle {
    page: Page,
}

impl PageHandle {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// The underlying chromiumoxide page, for operations not wrapped here.
    pub fn inner(&self) -> &Page {
        &self.page
    }

    /// Navigates and waits for the load to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "navigating");
        self.page.goto(url).await.map_err(driver_err)?;
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    /// Reloads the current page and waits for the load to settle.
    pub async fn reload(&self) -> Result<()> {
        self.page
            .evaluate("location.reload()")
            .await
            .map_err(driver_err)?;
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    /// Current page URL.
    pub async fn url(&self) -> Result<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(driver_err)?
            .unwrap_or_default())
    }

    /// Whether `selector` is currently present in the DOM.
    pub async fn exists(&self, selector: &str) -> Result<bool> {
        self.eval(selector_script(selector, "return find(sel) !== null;"))
            .await
    }

    /// Focuses the element and sets its value, firing `input` and `change`
    /// so framework-bound fields pick the text up.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let body = format!(
            "const el = find(sel);\n\
             if (!el) return false;\n\
             el.focus();\n\
             el.value = {};\n\
             el.dispatchEvent(new Event('input', {{bubbles: true}}));\n\
             el.dispatchEvent(new Event('change', {{bubbles: true}}));\n\
             return true;",
            js_string(value)
        );
        self.element_op(selector, &body).await
    }

    /// Scrolls the element into view and clicks it.
    pub async fn click(&self, selector: &str) -> Result<()> {
        self.element_op(
            selector,
            "const el = find(sel);\n\
             if (!el) return false;\n\
             el.scrollIntoView({block: 'center'});\n\
             el.click();\n\
             return true;",
        )
        .await
    }

    /// Text content of the first matching element, `None` when absent.
    pub async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        self.eval(selector_script(
            selector,
            "const el = find(sel); return el ? el.textContent : null;",
        ))
        .await
    }

    /// Text content of every matching element, in document order.
    pub async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        self.eval(selector_script(
            selector,
            "return findAll(sel).map((el) => el.textContent ?? '');",
        ))
        .await
    }

    /// Number of elements matching `selector`.
    pub async fn count(&self, selector: &str) -> Result<usize> {
        self.eval(selector_script(selector, "return findAll(sel).length;"))
            .await
    }

    async fn element_op(&self, selector: &str, body: &str) -> Result<()> {
        let found: bool = self.eval(selector_script(selector, body)).await?;
        if found {
            Ok(())
        } else {
            Err(Error::Driver(format!("element not found: '{selector}'")))
        }
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        self.page
            .evaluate(script.as_str())
            .await
            .map_err(driver_err)?
            .into_value()
            .map_err(|e| Error::Driver(format!("unexpected evaluation result: {e:?}")))
    }
}

#[async_trait]
impl LivePage for PageHandle {
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.exists(selector).await? {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(Error::ProbeTimeout {
                    selector: selector.to_string(),
                    duration_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.eval(selector_script(
            selector,
            "const el = find(sel);\n\
             if (!el) return false;\n\
             const style = window.getComputedStyle(el);\n\
             if (style.display === 'none' || style.visibility === 'hidden') return false;\n\
             const rect = el.getBoundingClientRect();\n\
             return rect.width > 0 && rect.height > 0;",
        ))
        .await
    }

    async fn content(&self) -> Result<String> {
        self.page.content().await.map_err(driver_err)
    }
}

fn driver_err(e: impl std::fmt::Display) -> Error {
    Error::Driver(e.to_string())
}

/// Wraps `body` in an IIFE with `sel`, `find` (first match, CSS or XPath)
/// and `findAll` (all matches) in scope.
fn selector_script(selector: &str, body: &str) -> String {
    format!(
        "(() => {{\n\
           const sel = {sel};\n\
           const isXPath = (s) => s.startsWith('/') || s.startsWith('(');\n\
           const find = (s) => isXPath(s)\n\
             ? document.evaluate(s, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue\n\
             : document.querySelector(s);\n\
           const findAll = (s) => {{\n\
             if (isXPath(s)) {{\n\
               const snapshot = document.evaluate(s, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);\n\
               const out = [];\n\
               for (let i = 0; i < snapshot.snapshotLength; i++) out.push(snapshot.snapshotItem(i));\n\
               return out;\n\
             }}\n\
             return Array.from(document.querySelectorAll(s));\n\
           }};\n\
           {body}\n\
         }})()",
        sel = js_string(selector),
    )
}

/// Renders `value` as a JS double-quoted string literal.
fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
