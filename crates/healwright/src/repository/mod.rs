//! Locator repository: CSV-backed sources, a load-once cache, and a
//! persist-time validation hook.

pub mod resolver;
pub mod store;
pub mod validate;

pub use resolver::{LocatorRepository, Lookup};
pub use store::{HEADER, SourceLoad};
pub use validate::{SelectorValidator, selector_is_plausible};
