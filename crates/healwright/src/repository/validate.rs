//! Persist-time selector validation.
//!
//! Selectors are opaque strings to the store (CSS, XPath, or anything the
//! driver understands), so validation is syntactic plausibility only. The
//! hook exists to keep a mangled language-model suggestion from being
//! committed over a known-good selector.

/// Signature of the persist-time validation hook on
/// [`LocatorRepository`](crate::repository::LocatorRepository).
pub type SelectorValidator = fn(&str) -> bool;

/// Default validation hook: non-empty, single-line, with balanced quotes,
/// brackets, and parentheses.
pub fn selector_is_plausible(selector: &str) -> bool {
    let selector = selector.trim();
    if selector.is_empty() || selector.contains('\n') || selector.contains('\r') {
        return false;
    }
    balanced(selector)
}

fn balanced(selector: &str) -> bool {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    for c in selector.chars() {
        match quote {
            // Inside a quoted span everything is literal until the closer.
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '[' | '(' => stack.push(c),
                ']' => {
                    if stack.pop() != Some('[') {
                        return false;
                    }
                }
                ')' => {
                    if stack.pop() != Some('(') {
                        return false;
                    }
                }
                _ => {}
            },
        }
    }
    quote.is_none() && stack.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_css_and_xpath() {
        assert!(selector_is_plausible("#username-input"));
        assert!(selector_is_plausible("input[name='user']"));
        assert!(selector_is_plausible("//div[@id='login']"));
        assert!(selector_is_plausible("(//button[text()=\"Sign in\"])[1]"));
        assert!(selector_is_plausible("  div.card > a  "));
    }

    #[test]
    fn rejects_empty_and_multiline() {
        assert!(!selector_is_plausible(""));
        assert!(!selector_is_plausible("   "));
        assert!(!selector_is_plausible("#a\n#b"));
    }

    #[test]
    fn rejects_unbalanced_candidates() {
        assert!(!selector_is_plausible("//div[@id='login"));
        assert!(!selector_is_plausible("input[name='user'"));
        assert!(!selector_is_plausible("(//a[@href]"));
        assert!(!selector_is_plausible("div]"));
    }

    #[test]
    fn brackets_inside_quotes_are_literal() {
        assert!(selector_is_plausible("a[title='[beta]']"));
        assert!(selector_is_plausible("//span[contains(text(), '(draft)')]"));
    }
}
