//! Page lookup by title.

use tracing::info;

use crate::api::NotionApi;
use crate::error::NotionError;

/// Result of looking up a page by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A page with the exact title exists.
    Found(String),
    /// No page with that title.
    NotFound,
}

impl Resolution {
    /// ID of the found page.
    #[must_use]
    pub fn page_id(&self) -> Option<&str> {
        match self {
            Self::Found(id) => Some(id.as_str()),
            Self::NotFound => None,
        }
    }
}

/// Look up the page titled `page_name` in a database.
///
/// Read-only. The first match wins when the database contains duplicates.
///
/// # Errors
///
/// Returns the API error if the query fails.
pub fn resolve(
    api: &dyn NotionApi,
    database_id: &str,
    title_property: &str,
    page_name: &str,
) -> Result<Resolution, NotionError> {
    let pages = api.query_by_title(database_id, title_property, page_name)?;

    Ok(match pages.into_iter().next() {
        Some(page) => {
            info!("Resolved {:?} to page {}", page_name, page.id);
            Resolution::Found(page.id)
        }
        None => {
            info!("No page titled {:?}", page_name);
            Resolution::NotFound
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockNotion;
    use pretty_assertions::assert_eq;

    const DB: &str = "db-1";

    #[test]
    fn test_resolve_empty_database() {
        let api = MockNotion::new();
        let resolution = resolve(&api, DB, "Name", "host/readme").unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(resolution.page_id(), None);
    }

    #[test]
    fn test_resolve_exact_title() {
        let api = MockNotion::new()
            .with_page("page-a", DB, "host/readme")
            .with_page("page-b", DB, "host/readme-old");

        let resolution = resolve(&api, DB, "Name", "host/readme").unwrap();
        assert_eq!(resolution, Resolution::Found("page-a".to_owned()));
    }

    #[test]
    fn test_resolve_ignores_other_databases() {
        let api = MockNotion::new().with_page("page-a", "db-2", "host/readme");
        let resolution = resolve(&api, DB, "Name", "host/readme").unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let api = MockNotion::new().with_page("page-a", DB, "host/readme");

        let first = resolve(&api, DB, "Name", "host/readme").unwrap();
        let second = resolve(&api, DB, "Name", "host/readme").unwrap();
        assert_eq!(first, second);
        assert_eq!(api.page_count(), 1);
        assert_eq!(api.query_count(), 2);
    }

    #[test]
    fn test_resolve_propagates_error() {
        let api = MockNotion::new().failing_query();
        let err = resolve(&api, DB, "Name", "host/readme").unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
