//! healwright: browser UI test automation with self-healing locators
//!
//! Page objects resolve selectors by element key from a CSV-backed locator
//! repository. When a stored selector no longer matches the live page, the
//! self-healing resolver hands the page's DOM to a language model, extracts
//! the proposed replacement, validates it, persists it back to the source
//! file, and returns it — so the suite keeps running and the repository
//! keeps up with the UI.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use healwright::{
//!     BrowserSession, FrameworkConfig, HealOptions, HealingResolver, LocatorRepository,
//!     OpenAiClient, pages::sources,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FrameworkConfig::load("configs/config.toml")?;
//!     let _log = healwright::logging::init(&config.reports.log_dir);
//!
//!     let session = BrowserSession::launch(&config).await?;
//!     let repository = Arc::new(LocatorRepository::new(&config.repository.dir));
//!
//!     let api_key = config.resolved_api_key().unwrap_or_default();
//!     let llm = Arc::new(OpenAiClient::from_config(&config.self_healing, api_key)?);
//!     let resolver = HealingResolver::new(repository.clone(), llm)
//!         .with_options(HealOptions::from_config(&config));
//!
//!     match resolver
//!         .resolve_or_heal("txtUsername", sources::LOGIN, session.page())
//!         .await
//!     {
//!         Some(selector) => println!("login field resolves at {selector}"),
//!         None => eprintln!("no working selector; fail the step"),
//!     }
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod config;
pub mod dates;
pub mod driver;
pub mod error;
pub mod heal;
pub mod llm;
pub mod logging;
pub mod mfa;
pub mod pages;
pub mod repository;

pub use config::{BrowserKind, FrameworkConfig};
pub use driver::{BrowserSession, LivePage, PageHandle};
pub use error::{Error, Result};
pub use heal::{HealOptions, HealingResolver};
pub use llm::{LlmClient, OpenAiClient};
pub use pages::LoginPage;
pub use repository::{LocatorRepository, Lookup};
