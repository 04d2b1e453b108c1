//! Page objects.
//!
//! Page objects resolve every selector through the locator repository by
//! element key; no selector strings live in page-object code, so a healed
//! locator takes effect everywhere at once.

pub mod login;

pub use login::LoginPage;

/// Locator source files, one per logical page.
pub mod sources {
    /// Login page elements
    pub const LOGIN: &str = "Login_Elements.csv";
    /// Post-login landing page elements
    pub const LANDING: &str = "Landing_Elements.csv";
    /// Working screen elements
    pub const WORKING: &str = "Working_Elements.csv";
}
