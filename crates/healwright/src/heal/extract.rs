//! Candidate extraction from free-form model output.

use std::sync::OnceLock;

use regex::Regex;

fn quoted_span() -> &'static Regex {
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    QUOTED.get_or_init(|| Regex::new(r#""(.*?)""#).expect("static pattern compiles"))
}

/// Returns the first double-quoted substring of `response`.
///
/// The repair prompt asks the model to answer `locator = "<selector>"`, so
/// the first quoted span is taken as the candidate. If the model's prose
/// quotes unrelated text before the selector, that text wins — a known
/// fragility of the heuristic; candidates are validated downstream before
/// anything is persisted.
pub fn extract_quoted(response: &str) -> Option<String> {
    quoted_span()
        .captures(response)
        .and_then(|captures| captures.get(1))
        .map(|quoted| quoted.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_first_quoted_span() {
        assert_eq!(
            extract_quoted(r##"locator = "#username-input""##).as_deref(),
            Some("#username-input")
        );
        assert_eq!(
            extract_quoted(r##"The fix is "#username-input""##).as_deref(),
            Some("#username-input")
        );
    }

    #[test]
    fn xpath_with_embedded_single_quotes_survives() {
        assert_eq!(
            extract_quoted(r#"Use locator = "//div[@id='login']""#).as_deref(),
            Some("//div[@id='login']")
        );
    }

    #[test]
    fn no_quotes_means_no_candidate() {
        assert_eq!(extract_quoted("try the login div"), None);
        assert_eq!(extract_quoted(""), None);
    }

    #[test]
    fn earlier_prose_quotes_win() {
        // Deliberate behavior, not an accident: the heuristic is first-span.
        assert_eq!(
            extract_quoted(r##"As "QA folk" say, use "#user""##).as_deref(),
            Some("QA folk")
        );
    }

    #[test]
    fn lone_quote_yields_nothing() {
        assert_eq!(extract_quoted(r#"unterminated "span"#), None);
    }
}
