//! Locator resolution with a load-once-per-source cache.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::repository::store::{self, SourceLoad};
use crate::repository::validate::{SelectorValidator, selector_is_plausible};

/// Outcome of a locator lookup.
///
/// Absence is a legitimate result, not an error: callers decide how to
/// react. The two absent cases are distinguishable so a test can assert
/// whether the source file was missing or merely lacked the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Key resolved to this selector
    Found(String),
    /// Source was loaded but has no such key
    KeyMissing,
    /// Source file was absent/unreadable when it was (not) loaded
    SourceMissing,
}

impl Lookup {
    /// Collapses the lookup into the selector, discarding why it was absent.
    pub fn selector(self) -> Option<String> {
        match self {
            Lookup::Found(selector) => Some(selector),
            Lookup::KeyMissing | Lookup::SourceMissing => None,
        }
    }
}

#[derive(Default)]
struct CacheState {
    /// Flattened across all loaded sources; keys are globally unique
    entries: HashMap<String, String>,
    loaded: HashSet<String>,
    missing: HashSet<String>,
}

/// Locator repository: an explicit cache object over a directory of CSV
/// source files.
///
/// One repository is owned by a session or test-group context and passed by
/// reference to resolver calls; parallel workers each create their own.
/// Each source file is read at most once per cache lifetime — call
/// [`invalidate`](Self::invalidate) at test-group boundaries to pick up
/// externally edited files.
pub struct LocatorRepository {
    root: PathBuf,
    validator: SelectorValidator,
    state: Mutex<CacheState>,
}

impl LocatorRepository {
    /// Creates a repository over `root`, the directory holding one CSV file
    /// per logical page.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            validator: selector_is_plausible,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Replaces the persist-time validation hook.
    pub fn with_validator(mut self, validator: SelectorValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Directory the source files live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs the persist-time validation hook against a candidate selector.
    pub fn validate_selector(&self, selector: &str) -> bool {
        (self.validator)(selector)
    }

    /// Looks up `key`, loading `source` from disk on first use.
    pub fn resolve(&self, key: &str, source: &str) -> Lookup {
        let mut state = self.state.lock();

        if state.loaded.contains(source) {
            debug!(source, "locator source already cached");
        } else {
            match store::load_source(&self.source_path(source)) {
                SourceLoad::Loaded(entries) => {
                    info!(source, count = entries.len(), "locator source loaded");
                    for (k, v) in entries {
                        state.entries.insert(k, v);
                    }
                }
                SourceLoad::Missing => {
                    warn!(source, "locator source missing; its keys will not resolve");
                    state.missing.insert(source.to_string());
                }
            }
            state.loaded.insert(source.to_string());
        }

        match state.entries.get(key) {
            Some(selector) => Lookup::Found(selector.clone()),
            None if state.missing.contains(source) => Lookup::SourceMissing,
            None => {
                info!(key, source, "element not found in locator cache");
                Lookup::KeyMissing
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but for callers that cannot proceed
    /// without a selector: absence becomes [`Error::LocatorNotFound`].
    pub fn require(&self, key: &str, source: &str) -> Result<String> {
        self.resolve(key, source)
            .selector()
            .ok_or_else(|| Error::LocatorNotFound {
                key: key.to_string(),
                source_name: source.to_string(),
            })
    }

    /// Clears the cache and the loaded-source set.
    ///
    /// Intended for the boundary between independent test groups so edited
    /// source files are re-read.
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.loaded.clear();
        state.missing.clear();
        debug!("locator cache invalidated");
    }

    /// Sets `key -> selector` in `source` and writes the file back.
    ///
    /// Reload-then-write: the file is re-read fresh from disk first, so
    /// concurrent updates to the same file can lose each other's changes —
    /// locator maintenance is a single-writer operation in practice. The
    /// in-memory cache is updated before the write-back, so the new value
    /// serves the rest of this run even if persisting fails.
    pub fn update(&self, key: &str, selector: &str, source: &str) -> Result<()> {
        if !(self.validator)(selector) {
            return Err(Error::InvalidSelector(selector.to_string()));
        }

        let path = self.source_path(source);
        let mut entries = match store::load_source(&path) {
            SourceLoad::Loaded(entries) => entries,
            SourceLoad::Missing => Vec::new(),
        };

        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => {
                info!(key, source, selector, "updating locator");
                *v = selector.to_string();
            }
            None => {
                info!(key, source, selector, "adding new locator");
                entries.push((key.to_string(), selector.to_string()));
            }
        }

        {
            let mut state = self.state.lock();
            for (k, v) in &entries {
                state.entries.insert(k.clone(), v.clone());
            }
            state.loaded.insert(source.to_string());
            state.missing.remove(source);
        }

        store::persist_source(&path, &entries)
    }

    fn source_path(&self, source: &str) -> PathBuf {
        self.root.join(source)
    }
}
