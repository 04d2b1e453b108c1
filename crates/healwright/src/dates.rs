//! Date normalization for comparing UI-rendered dates.

use chrono::NaiveDate;

/// Formats the UI is known to render dates in.
const INPUT_FORMATS: &[&str] = &[
    "%b %d, %Y", // Jun 28, 1953
    "%B %d, %Y", // June 28, 1953
    "%m/%d/%Y",  // 6/28/1953
    "%Y-%m-%d",  // 1953-06-28
    "%d/%m/%Y",  // 28/06/1953
];

/// Normalizes a date string to `MM/DD/YYYY` for comparison.
///
/// Unrecognized input is returned trimmed, so a mismatch surfaces the
/// original text in the validation message.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    for format in INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.format("%m/%d/%Y").to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_normalize() {
        assert_eq!(normalize_date("Jun 28, 1953"), "06/28/1953");
        assert_eq!(normalize_date("June 28, 1953"), "06/28/1953");
        assert_eq!(normalize_date("6/28/1953"), "06/28/1953");
        assert_eq!(normalize_date("1953-06-28"), "06/28/1953");
        assert_eq!(normalize_date("28/06/1953"), "06/28/1953");
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(normalize_date("  1953-06-28  "), "06/28/1953");
    }

    #[test]
    fn unknown_formats_pass_through() {
        assert_eq!(normalize_date("sometime in June"), "sometime in June");
        assert_eq!(normalize_date("  raw text  "), "raw text");
    }
}
