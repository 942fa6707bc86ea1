//! Sync runner implementation.

use std::path::Path;

use r2n_config::SyncConfig;
use tracing::{info, warn};

use crate::api::NotionApi;
use crate::properties::PageProperties;
use crate::replacer::{chunk_count, list_all_children, replace_content};
use crate::resolver::{Resolution, resolve};

use super::error::SyncError;
use super::result::{DryRunResult, SyncAction, SyncResult};

/// Publishes markdown files to Notion pages.
pub struct SyncRunner<'a> {
    api: &'a dyn NotionApi,
}

impl<'a> SyncRunner<'a> {
    /// Create a new sync runner.
    #[must_use]
    pub fn new(api: &'a dyn NotionApi) -> Self {
        Self { api }
    }

    /// Sync `input` to the page identified by `hostname` and the configured
    /// name, then save the page ID in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failed stage. Stages before the failure
    /// are not rolled back.
    pub fn sync(
        &self,
        config: &mut SyncConfig,
        input: &Path,
        hostname: &str,
    ) -> Result<SyncResult, SyncError> {
        let converted = r2n_blocks::load_file(input)?;
        info!(
            "Converted {} into {} block(s)",
            input.display(),
            converted.blocks.len()
        );

        let page_name = config.page_name(hostname);
        let resolution = resolve(
            self.api,
            &config.database_id,
            &config.properties.title,
            &page_name,
        )
        .map_err(SyncError::Resolve)?;

        let properties = PageProperties {
            title: page_name.clone(),
            hostname: hostname.to_owned(),
            commit: config.commit.clone(),
        }
        .to_json(&config.properties);

        let (page_id, action) = match resolution {
            Resolution::NotFound => {
                let page = self
                    .api
                    .create_page(&config.database_id, &properties)
                    .map_err(SyncError::Create)?;
                (page.id, SyncAction::Created)
            }
            Resolution::Found(page_id) => {
                if let Some(stored) = &config.page_id
                    && *stored != page_id
                {
                    warn!(
                        "Stored page ID {} does not match page {} found by name; using {}",
                        stored, page_name, page_id
                    );
                }
                self.api
                    .update_page_properties(&page_id, &properties)
                    .map_err(|source| SyncError::UpdateProperties {
                        page_id: page_id.clone(),
                        source,
                    })?;
                (page_id, SyncAction::Updated)
            }
        };

        let outcome = replace_content(self.api, &page_id, &converted.blocks, config.chunk_size)
            .map_err(|source| SyncError::Replace {
                page_id: page_id.clone(),
                source,
            })?;

        config.set_page_id(&page_id);
        config.save().map_err(|source| SyncError::Persist {
            page_id: page_id.clone(),
            source,
        })?;

        Ok(SyncResult {
            page_id,
            page_name,
            action,
            outcome,
            warnings: converted.warnings,
        })
    }

    /// Perform a dry run (no changes made).
    ///
    /// Converts the document and looks up the page, reporting what a real
    /// run would do.
    ///
    /// # Errors
    ///
    /// Returns an error if the document can't be read or the lookup fails.
    pub fn dry_run(
        &self,
        config: &SyncConfig,
        input: &Path,
        hostname: &str,
    ) -> Result<DryRunResult, SyncError> {
        let converted = r2n_blocks::load_file(input)?;

        let page_name = config.page_name(hostname);
        let resolution = resolve(
            self.api,
            &config.database_id,
            &config.properties.title,
            &page_name,
        )
        .map_err(SyncError::Resolve)?;

        let existing_blocks = match resolution.page_id() {
            Some(page_id) => list_all_children(self.api, page_id)
                .map_err(SyncError::Resolve)?
                .len(),
            None => 0,
        };

        Ok(DryRunResult {
            page_name,
            page_id: resolution.page_id().map(str::to_owned),
            block_count: converted.blocks.len(),
            total_blocks: converted.total_blocks(),
            chunk_count: chunk_count(&converted.blocks, config.chunk_size),
            existing_blocks,
            warnings: converted.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::mock::MockNotion;
    use crate::sync::SyncStage;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    const DB_ID: &str = "0123abcd-4567-89ab-cdef-0123456789ab";
    const HOST: &str = "build-01";
    const TITLE: &str = "build-01/readme";

    struct Fixture {
        dir: TempDir,
        config_path: PathBuf,
        input: PathBuf,
    }

    impl Fixture {
        fn new(markdown: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config_path = dir.path().join(".notion.toml");
            std::fs::write(
                &config_path,
                format!("name = \"readme\"\ndatabase_id = \"{DB_ID}\"\ntoken = \"t\"\ncommit = \"abc\"\n"),
            )
            .unwrap();
            let input = dir.path().join("README.md");
            std::fs::write(&input, markdown).unwrap();
            Self {
                dir,
                config_path,
                input,
            }
        }

        fn config(&self) -> SyncConfig {
            SyncConfig::load(Some(self.config_path.as_path()), None).unwrap()
        }

        fn saved(&self) -> String {
            std::fs::read_to_string(&self.config_path).unwrap()
        }
    }

    #[test]
    fn test_first_sync_creates_page() {
        let fixture = Fixture::new("# Title\n\nBody text.\n");
        let api = MockNotion::new();
        let mut config = fixture.config();

        let result = SyncRunner::new(&api)
            .sync(&mut config, &fixture.input, HOST)
            .unwrap();

        assert_eq!(result.action, SyncAction::Created);
        assert_eq!(result.page_name, TITLE);
        assert_eq!(api.page_count(), 1);
        assert_eq!(api.children(&result.page_id).len(), 2);
        assert_eq!(config.page_id.as_deref(), Some(result.page_id.as_str()));
        assert!(fixture.saved().contains(&result.page_id));

        let properties = api.properties(&result.page_id).unwrap();
        assert_eq!(
            properties["Hostname"],
            json!({"rich_text": [{"type": "text", "text": {"content": HOST}}]})
        );
        assert_eq!(
            properties["GitCommit"],
            json!({"rich_text": [{"type": "text", "text": {"content": "abc"}}]})
        );
    }

    #[test]
    fn test_second_sync_reuses_page() {
        let fixture = Fixture::new("one\n\ntwo\n");
        let api = MockNotion::new();

        let first = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &fixture.input, HOST)
            .unwrap();
        std::fs::write(&fixture.input, "three\n").unwrap();
        let second = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &fixture.input, HOST)
            .unwrap();

        assert_eq!(second.action, SyncAction::Updated);
        assert_eq!(second.page_id, first.page_id);
        assert_eq!(api.page_count(), 1);
        assert_eq!(second.outcome.deleted, 2);
        assert_eq!(api.children(&first.page_id).len(), 1);
    }

    #[test]
    fn test_stored_page_id_replaced_by_resolved() {
        let fixture = Fixture::new("text\n");
        let api = MockNotion::new().with_page("page-real", DB_ID, TITLE);
        let mut config = fixture.config();
        config.set_page_id("page-stale");

        let result = SyncRunner::new(&api)
            .sync(&mut config, &fixture.input, HOST)
            .unwrap();

        assert_eq!(result.page_id, "page-real");
        let saved = fixture.saved();
        assert!(saved.contains("page-real"));
        assert!(!saved.contains("page-stale"));
    }

    #[test]
    fn test_unsaved_page_found_on_next_run() {
        let fixture = Fixture::new("text\n");
        let api = MockNotion::new();
        let mut config = fixture.config();
        config.config_path = fixture.dir.path().join("missing-dir").join(".notion.toml");

        let err = SyncRunner::new(&api)
            .sync(&mut config, &fixture.input, HOST)
            .unwrap_err();
        assert_eq!(err.stage(), SyncStage::Persist);
        assert_eq!(api.page_count(), 1);

        let result = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &fixture.input, HOST)
            .unwrap();
        assert_eq!(result.action, SyncAction::Updated);
        assert_eq!(api.page_count(), 1);
    }

    #[test]
    fn test_missing_input_fails_before_remote_calls() {
        let fixture = Fixture::new("");
        let api = MockNotion::new();
        let missing = fixture.dir.path().join("NOPE.md");

        let err = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &missing, HOST)
            .unwrap_err();

        assert_eq!(err.stage(), SyncStage::Load);
        assert_eq!(api.query_count(), 0);
    }

    #[test]
    fn test_empty_document_clears_page() {
        let fixture = Fixture::new("");
        let api = MockNotion::new()
            .with_page("page-1", DB_ID, TITLE)
            .with_children("page-1", 2);

        let result = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &fixture.input, HOST)
            .unwrap();

        assert_eq!(result.outcome.deleted, 2);
        assert_eq!(result.outcome.append_calls, 0);
        assert!(api.children("page-1").is_empty());
    }

    #[test]
    fn test_resolve_failure() {
        let fixture = Fixture::new("text\n");
        let api = MockNotion::new().failing_query();

        let err = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &fixture.input, HOST)
            .unwrap_err();

        assert_eq!(err.stage(), SyncStage::Resolve);
        assert_eq!(api.page_count(), 0);
    }

    #[test]
    fn test_create_failure() {
        let fixture = Fixture::new("text\n");
        let api = MockNotion::new().failing_create();

        let err = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &fixture.input, HOST)
            .unwrap_err();

        assert_eq!(err.stage(), SyncStage::Create);
        assert!(!fixture.saved().contains("page_id"));
    }

    #[test]
    fn test_update_failure() {
        let fixture = Fixture::new("text\n");
        let api = MockNotion::new()
            .with_page("page-1", DB_ID, TITLE)
            .failing_update();

        let err = SyncRunner::new(&api)
            .sync(&mut fixture.config(), &fixture.input, HOST)
            .unwrap_err();

        assert_eq!(err.stage(), SyncStage::UpdateProperties);
        assert!(api.append_calls().is_empty());
    }

    #[test]
    fn test_append_failure_is_not_persisted() {
        let fixture = Fixture::new("a\n\nb\n\nc\n");
        let api = MockNotion::new()
            .with_page("page-1", DB_ID, TITLE)
            .failing_append_call(2);
        let mut config = fixture.config();
        config.chunk_size = 1;

        let err = SyncRunner::new(&api)
            .sync(&mut config, &fixture.input, HOST)
            .unwrap_err();

        assert_eq!(err.stage(), SyncStage::Replace);
        assert_eq!(api.append_calls(), vec![1, 1]);
        assert_eq!(api.children("page-1").len(), 1);
        assert!(!fixture.saved().contains("page-1"));
    }

    #[test]
    fn test_dry_run_makes_no_changes() {
        let fixture = Fixture::new("a\n\nb\n\nc\n");
        let api = MockNotion::new()
            .with_page("page-1", DB_ID, TITLE)
            .with_children("page-1", 4);
        let mut config = fixture.config();
        config.chunk_size = 2;
        let before = fixture.saved();

        let result = SyncRunner::new(&api)
            .dry_run(&config, &fixture.input, HOST)
            .unwrap();

        assert_eq!(result.action(), SyncAction::Updated);
        assert_eq!(result.page_id.as_deref(), Some("page-1"));
        assert_eq!(result.block_count, 3);
        assert_eq!(result.chunk_count, 2);
        assert_eq!(result.existing_blocks, 4);
        assert!(api.delete_attempts().is_empty());
        assert!(api.append_calls().is_empty());
        assert_eq!(fixture.saved(), before);
    }

    #[test]
    fn test_dry_run_new_page() {
        let fixture = Fixture::new("text\n");
        let api = MockNotion::new();

        let result = SyncRunner::new(&api)
            .dry_run(&fixture.config(), &fixture.input, HOST)
            .unwrap();

        assert_eq!(result.action(), SyncAction::Created);
        assert_eq!(result.existing_blocks, 0);
        assert_eq!(api.page_count(), 0);
    }
}
