//! TOTP code generation for MFA login flows.

use totp_rs::{Algorithm, Secret, TOTP};
use tracing::debug;

use crate::error::{Error, Result};

/// Config key holding the TOTP secret for `username`.
///
/// Automation accounts, review accounts, and the review L2 variant each
/// authenticate with their own enrolled secret; everyone else shares the
/// default one.
pub fn secret_key_for(username: &str) -> &'static str {
    let username = username.to_lowercase();
    if username.contains("automation") {
        "mfa_secret_automation"
    } else if username.contains("review") {
        if username.contains("l2") {
            "mfa_secret_reviewL2"
        } else {
            "mfa_secret_review"
        }
    } else {
        "mfa_secret"
    }
}

/// Generates the current 6-digit TOTP code from a base32-encoded secret.
pub fn generate_code(secret_b32: &str) -> Result<String> {
    let code = build_totp(secret_b32)?
        .generate_current()
        .map_err(|e| Error::Totp(format!("system clock error: {e}")))?;
    debug!("TOTP code generated");
    Ok(code)
}

/// Standard authenticator parameters: SHA-1, 6 digits, 30-second step.
fn build_totp(secret_b32: &str) -> Result<TOTP> {
    let secret = Secret::Encoded(secret_b32.trim().to_string())
        .to_bytes()
        .map_err(|e| Error::Totp(format!("invalid base32 secret: {e:?}")))?;
    TOTP::new(Algorithm::SHA1, 6, 1, 30, secret, None, String::new())
        .map_err(|e| Error::Totp(format!("invalid TOTP parameters: {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Base32 of the RFC 6238 SHA-1 test secret "12345678901234567890".
    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn rfc6238_sha1_vectors() {
        let totp = build_totp(RFC_SECRET).expect("valid secret");
        assert_eq!(totp.generate(59), "287082");
        assert_eq!(totp.generate(1_111_111_109), "081804");
        assert_eq!(totp.generate(1_234_567_890), "005924");
    }

    #[test]
    fn generate_code_produces_six_digits() {
        let code = generate_code(RFC_SECRET).expect("code generated");
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn invalid_base32_is_rejected() {
        assert!(matches!(generate_code("not base32!!!"), Err(Error::Totp(_))));
    }

    #[test]
    fn secret_selection_follows_account_type() {
        assert_eq!(secret_key_for("alice@example.com"), "mfa_secret");
        assert_eq!(secret_key_for("automation.bot@example.com"), "mfa_secret_automation");
        assert_eq!(secret_key_for("Review.User@example.com"), "mfa_secret_review");
        assert_eq!(secret_key_for("reviewL2.user@example.com"), "mfa_secret_reviewL2");
    }
}
