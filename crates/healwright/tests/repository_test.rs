// Integration tests for the locator repository
//
// Covers the cache laws:
// - update -> invalidate -> resolve round-trip
// - load-once per source file per cache lifetime
// - invalidate re-reads from storage
// - missing source is distinguishable from a missing key

use healwright::repository::{LocatorRepository, Lookup};
use healwright::Error;

const LOGIN: &str = "Login_Elements.csv";

fn seed(dir: &tempfile::TempDir, name: &str, rows: &str) {
    std::fs::write(
        dir.path().join(name),
        format!("Element Name,Locator\n{rows}"),
    )
    .expect("Failed to seed source file");
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn resolve_returns_the_seeded_selector() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\nbtnLogin,#login-btn\n");
    let repository = LocatorRepository::new(dir.path());

    assert_eq!(
        repository.resolve("txtUsername", LOGIN),
        Lookup::Found("#user".to_string())
    );
    assert_eq!(
        repository.resolve("btnLogin", LOGIN),
        Lookup::Found("#login-btn".to_string())
    );
}

#[test]
fn missing_source_is_distinguishable_from_missing_key() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\n");
    let repository = LocatorRepository::new(dir.path());

    assert_eq!(repository.resolve("txtGhost", LOGIN), Lookup::KeyMissing);
    assert_eq!(
        repository.resolve("anything", "Ghost_Elements.csv"),
        Lookup::SourceMissing
    );
}

#[test]
fn require_turns_absence_into_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\n");
    let repository = LocatorRepository::new(dir.path());

    assert_eq!(
        repository.require("txtUsername", LOGIN).expect("present"),
        "#user"
    );
    assert!(matches!(
        repository.require("txtGhost", LOGIN),
        Err(Error::LocatorNotFound { .. })
    ));
}

// ============================================================================
// Caching
// ============================================================================

#[test]
fn sources_load_once_per_cache_lifetime() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\nbtnLogin,#login-btn\n");
    let repository = LocatorRepository::new(dir.path());

    // First key triggers the (only) load.
    assert_eq!(
        repository.resolve("txtUsername", LOGIN),
        Lookup::Found("#user".to_string())
    );

    // Edit the file behind the cache's back.
    seed(&dir, LOGIN, "txtUsername,#user\nbtnLogin,#edited\n");

    // A second key from the same source must come from the cache, not disk.
    assert_eq!(
        repository.resolve("btnLogin", LOGIN),
        Lookup::Found("#login-btn".to_string())
    );

    // Only invalidation picks up the external edit.
    repository.invalidate();
    assert_eq!(
        repository.resolve("btnLogin", LOGIN),
        Lookup::Found("#edited".to_string())
    );
}

#[test]
fn invalidate_rereads_even_after_an_update() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\n");
    let repository = LocatorRepository::new(dir.path());

    repository
        .update("txtUsername", "#healed", LOGIN)
        .expect("update should persist");

    // External edit wins after invalidation: the cache is gone and the file
    // is the source of truth.
    seed(&dir, LOGIN, "txtUsername,#external\n");
    repository.invalidate();
    assert_eq!(
        repository.resolve("txtUsername", LOGIN),
        Lookup::Found("#external".to_string())
    );
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn update_then_fresh_resolve_round_trips() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\n");
    let repository = LocatorRepository::new(dir.path());

    repository
        .update("txtUsername", "//input[@id='user']", LOGIN)
        .expect("update should persist");

    // Visible immediately from memory...
    assert_eq!(
        repository.resolve("txtUsername", LOGIN),
        Lookup::Found("//input[@id='user']".to_string())
    );

    // ...and from a cold cache, proving it reached the file.
    repository.invalidate();
    assert_eq!(
        repository.resolve("txtUsername", LOGIN),
        Lookup::Found("//input[@id='user']".to_string())
    );
}

#[test]
fn update_preserves_unrelated_entries_and_file_order() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\ntxtPassword,#pwd\nbtnLogin,#login-btn\n");
    let repository = LocatorRepository::new(dir.path());

    repository
        .update("txtPassword", "#password-input", LOGIN)
        .expect("update should persist");

    let raw = std::fs::read_to_string(dir.path().join(LOGIN)).expect("read back");
    assert_eq!(
        raw,
        "Element Name,Locator\n\
         txtUsername,#user\n\
         txtPassword,#password-input\n\
         btnLogin,#login-btn\n"
    );
}

#[test]
fn update_creates_a_missing_source_file() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    let repository = LocatorRepository::new(dir.path());

    repository
        .update("btn_Later", "#later", "Working_Elements.csv")
        .expect("update should create the file");

    repository.invalidate();
    assert_eq!(
        repository.resolve("btn_Later", "Working_Elements.csv"),
        Lookup::Found("#later".to_string())
    );
}

#[test]
fn update_rejects_implausible_selectors() {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    seed(&dir, LOGIN, "txtUsername,#user\n");
    let repository = LocatorRepository::new(dir.path());

    let err = repository
        .update("txtUsername", "//div[@id='broken", LOGIN)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSelector(_)));

    // The known-good selector survived, in memory and on disk.
    assert_eq!(
        repository.resolve("txtUsername", LOGIN),
        Lookup::Found("#user".to_string())
    );
    let raw = std::fs::read_to_string(dir.path().join(LOGIN)).expect("read back");
    assert!(raw.contains("txtUsername,#user"));
}
