//! Notion object ID normalization.
//!
//! IDs are accepted as 32 hex digits, a hyphenated UUID, or a full page or
//! database URL copied from the browser.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12}").unwrap()
});

/// Normalize an ID or URL to a hyphenated lowercase UUID.
///
/// For URLs, the query string (which may carry a view ID) is ignored and the
/// last ID in the path wins.
pub fn normalize_id(input: &str) -> Option<String> {
    let path = input.split(['?', '#']).next().unwrap_or_default();
    let candidate = ID_RE.find_iter(path).last()?;
    let uuid = Uuid::try_parse(candidate.as_str()).ok()?;
    Some(uuid.hyphenated().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HYPHENATED: &str = "0123abcd-4567-89ab-cdef-0123456789ab";

    #[test]
    fn test_normalize_simple_id() {
        assert_eq!(
            normalize_id("0123abcd456789abcdef0123456789ab").as_deref(),
            Some(HYPHENATED)
        );
    }

    #[test]
    fn test_normalize_hyphenated_uppercase() {
        assert_eq!(
            normalize_id("0123ABCD-4567-89AB-CDEF-0123456789AB").as_deref(),
            Some(HYPHENATED)
        );
    }

    #[test]
    fn test_normalize_database_url_ignores_view() {
        let url = "https://www.notion.so/team/Hosts-0123abcd456789abcdef0123456789ab?v=ffffffffffffffffffffffffffffffff";
        assert_eq!(normalize_id(url).as_deref(), Some(HYPHENATED));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_id("not-an-id"), None);
        assert_eq!(normalize_id(""), None);
    }
}
