//! Self-healing locator resolution.
//!
//! Wraps the [`LocatorRepository`] with a live-page probe and a
//! language-model repair path: resolve the stored selector, try it against
//! the page, and only when it fails ask the model — with the page's DOM in
//! hand — for a replacement, which is validated and persisted before being
//! returned.

pub mod extract;

pub use extract::extract_quoted;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::FrameworkConfig;
use crate::driver::LivePage;
use crate::error::{Error, Result};
use crate::llm::LlmClient;
use crate::repository::{LocatorRepository, Lookup};

/// Tuning for the probe/repair flow.
#[derive(Debug, Clone)]
pub struct HealOptions {
    /// How long the probe waits for the stored selector before escalating
    pub probe_timeout: Duration,

    /// When off, a failed probe reports absent without a model call
    pub enabled: bool,
}

impl Default for HealOptions {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(10),
            enabled: true,
        }
    }
}

impl HealOptions {
    pub fn from_config(config: &FrameworkConfig) -> Self {
        Self {
            probe_timeout: config.repository.probe_timeout(),
            enabled: config.self_healing.enabled,
        }
    }
}

/// Locator resolution with a language-model repair fallback.
///
/// One resolution request runs to completion before the next begins; the
/// only suspension points are the element-wait (bounded by the probe
/// timeout) and the model call (bounded by the client's own timeout and
/// retry budget).
pub struct HealingResolver {
    repository: Arc<LocatorRepository>,
    llm: Arc<dyn LlmClient>,
    options: HealOptions,
}

impl HealingResolver {
    pub fn new(repository: Arc<LocatorRepository>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            repository,
            llm,
            options: HealOptions::default(),
        }
    }

    pub fn with_options(mut self, options: HealOptions) -> Self {
        self.options = options;
        self
    }

    /// The repository this resolver reads from and writes corrections to.
    pub fn repository(&self) -> &LocatorRepository {
        &self.repository
    }

    /// Resolves `key` and confirms it against the live page, repairing the
    /// selector through the language model when the probe fails.
    ///
    /// Returns `None` when no working selector could be produced — the
    /// caller decides how that fails the test step. Persistent storage is
    /// touched only after a candidate has been extracted and validated; a
    /// failed or ambiguous model response never overwrites the stored
    /// selector.
    pub async fn resolve_or_heal(
        &self,
        key: &str,
        source: &str,
        page: &dyn LivePage,
    ) -> Option<String> {
        let selector = match self.repository.resolve(key, source) {
            Lookup::Found(selector) => selector,
            Lookup::KeyMissing => {
                error!(key, source, "locator not found; nothing to heal");
                return None;
            }
            Lookup::SourceMissing => {
                error!(key, source, "locator source missing; nothing to heal");
                return None;
            }
        };

        match self.probe(page, &selector).await {
            Ok(()) => {
                debug!(key, source, selector, "selector confirmed on live page");
                return Some(selector);
            }
            Err(e) => {
                warn!(key, source, selector, error = %e, "selector did not resolve; attempting repair");
            }
        }

        if !self.options.enabled {
            warn!(key, source, "self-healing disabled; reporting locator unavailable");
            return None;
        }

        let dom = match page.content().await {
            Ok(dom) => dom,
            Err(e) => {
                error!(key, source, error = %e, "could not capture page content for repair");
                return None;
            }
        };

        let response = match self.llm.complete(&repair_prompt(&selector, &dom)).await {
            Ok(response) => response,
            Err(e) => {
                error!(key, source, selector, error = %e, "repair service failed; no selector available");
                return None;
            }
        };

        let candidate = match extract_quoted(&response) {
            Some(candidate) => candidate,
            None => {
                error!(key, source, response, "could not extract a selector from the repair response");
                return None;
            }
        };

        if !self.repository.validate_selector(&candidate) {
            error!(key, source, candidate, "repair candidate failed validation; keeping the stored selector");
            return None;
        }

        info!(key, source, old = selector, new = candidate, "locator repaired");
        if let Err(e) = self.repository.update(key, &candidate, source) {
            // The healed selector still serves this run; it just will not
            // survive to the next one.
            error!(key, source, candidate, error = %e, "could not persist healed locator");
        }

        Some(candidate)
    }

    async fn probe(&self, page: &dyn LivePage, selector: &str) -> Result<()> {
        page.wait_for_selector(selector, self.options.probe_timeout)
            .await?;
        if page.is_visible(selector).await? {
            Ok(())
        } else {
            Err(Error::ProbeTimeout {
                selector: selector.to_string(),
                duration_ms: self.options.probe_timeout.as_millis() as u64,
            })
        }
    }
}

fn repair_prompt(selector: &str, dom: &str) -> String {
    format!(
        "As a seasoned QA analyst, analyze the DOM of this web application and recommend \
         the most appropriate replacement for the failing locator {selector}, one that will \
         reliably identify the same element. DOM: {dom} Do not add any description or a \
         By.<strategy> prefix; answer exactly as locator = \"<correct_locator>\""
    )
}
