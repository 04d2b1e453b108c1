//! Live-page validation helpers for test steps.
//!
//! Each helper resolves its locator through the repository, waits for the
//! element within `timeout`, and fails with a descriptive
//! [`Error::Validation`] carrying the element key plus expected and actual
//! values.

use std::time::Duration;

use tracing::info;

use crate::driver::{LivePage, PageHandle};
use crate::error::{Error, Result};
use crate::repository::LocatorRepository;

/// Element keys every dialog shares.
const DIALOG_TITLE_KEY: &str = "lbl_DialogTitle";
const DIALOG_TEXT_KEY: &str = "lbl_DialogText";

/// Asserts that the element's text equals `expected`.
pub async fn validate_text(
    page: &PageHandle,
    repository: &LocatorRepository,
    key: &str,
    expected: &str,
    source: &str,
    timeout: Duration,
) -> Result<()> {
    let selector = repository.require(key, source)?;
    page.wait_for_selector(&selector, timeout).await?;
    let actual = clean(&page.text_content(&selector).await?.unwrap_or_default());

    info!(key, expected, actual, "validating text");
    if actual == expected {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "text mismatch for {key}: expected '{expected}', got '{actual}'"
        )))
    }
}

/// Asserts several `key -> expected text` pairs in order.
pub async fn validate_fields(
    page: &PageHandle,
    repository: &LocatorRepository,
    fields: &[(&str, &str)],
    source: &str,
    timeout: Duration,
) -> Result<()> {
    for (key, expected) in fields.iter().copied() {
        validate_text(page, repository, key, expected, source, timeout).await?;
    }
    info!(count = fields.len(), "fields validated");
    Ok(())
}

/// Asserts a dialog's title and message text.
pub async fn validate_popup(
    page: &PageHandle,
    repository: &LocatorRepository,
    expected_title: &str,
    expected_message: &str,
    source: &str,
    timeout: Duration,
) -> Result<()> {
    validate_text(page, repository, DIALOG_TITLE_KEY, expected_title, source, timeout).await?;
    validate_text(page, repository, DIALOG_TEXT_KEY, expected_message, source, timeout).await?;
    info!(title = expected_title, "popup validated");
    Ok(())
}

/// Asserts that a list/dropdown renders exactly `expected` options, in order.
pub async fn validate_list_options(
    page: &PageHandle,
    repository: &LocatorRepository,
    key: &str,
    expected: &[&str],
    source: &str,
    timeout: Duration,
) -> Result<()> {
    let selector = repository.require(key, source)?;
    page.wait_for_selector(&selector, timeout).await?;
    let actual: Vec<String> = page
        .texts(&selector)
        .await?
        .iter()
        .map(|text| clean(text))
        .collect();

    if actual.len() != expected.len() {
        return Err(Error::Validation(format!(
            "option count mismatch for {key}: expected {}, got {}",
            expected.len(),
            actual.len()
        )));
    }
    for (index, (actual, expected)) in actual.iter().zip(expected).enumerate() {
        if actual != expected {
            return Err(Error::Validation(format!(
                "option {index} mismatch for {key}: expected '{expected}', got '{actual}'"
            )));
        }
    }

    info!(key, count = actual.len(), "list options validated");
    Ok(())
}

/// Trims and folds non-breaking spaces, which UI frameworks love to render.
fn clean(text: &str) -> String {
    text.trim().replace('\u{a0}', " ")
}
