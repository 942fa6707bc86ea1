//! `readme2notion <INPUT_FILE>` command implementation.

use std::path::PathBuf;

use clap::Args;
use r2n_config::{CliSettings, SyncConfig};
use r2n_notion::sync::{DryRunResult, SyncAction, SyncResult};
use r2n_notion::{NotionClient, SyncError, SyncRunner};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for publishing a markdown file.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Markdown file to publish.
    input_file: PathBuf,

    /// Path to configuration file (default: auto-discover .notion.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Commit hash recorded on the page.
    #[arg(short = 't', long)]
    commit: Option<String>,

    /// Notion integration token (overrides config).
    #[arg(short = 'n', long, env = "NOTION_TOKEN", hide_env_values = true)]
    notion_token: Option<String>,

    /// Blocks per append request, 1-100 (overrides config).
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Logical page name (overrides config, saved).
    #[arg(long)]
    name: Option<String>,

    /// Target database ID or URL (overrides config, saved).
    #[arg(long)]
    database_id: Option<String>,

    /// Hostname used in the page title (default: this machine's hostname).
    #[arg(long)]
    hostname: Option<String>,

    /// Preview changes without modifying Notion.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output (log every API request).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or any sync stage fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            name: self.name.clone(),
            database_id: self.database_id.clone(),
            token: self.notion_token.clone(),
            chunk_size: self.chunk_size,
            commit: self.commit.clone(),
            hostname: self.hostname.clone(),
        };
        let mut config = SyncConfig::load(self.config.as_deref(), Some(&cli_settings))?;
        let hostname = resolve_hostname(config.hostname.as_deref())?;

        let client = NotionClient::new(&config.api_url, &config.token);
        let runner = SyncRunner::new(&client);

        output.info(&format!(
            "Publishing {} as \"{}\"...",
            self.input_file.display(),
            config.page_name(&hostname)
        ));

        if self.dry_run {
            let result = runner.dry_run(&config, &self.input_file, &hostname)?;
            print_dry_run_result(&output, &result);
            return Ok(());
        }

        match runner.sync(&mut config, &self.input_file, &hostname) {
            Ok(result) => {
                print_sync_result(&output, &result);
                Ok(())
            }
            Err(err) => {
                if let SyncError::Persist { page_id, .. } = &err {
                    output.warning(&format!(
                        "Page {page_id} is up to date, but {} was not updated.",
                        config.config_path.display()
                    ));
                }
                Err(err.into())
            }
        }
    }
}

/// Use the override if given, otherwise the machine's hostname.
fn resolve_hostname(hostname: Option<&str>) -> Result<String, CliError> {
    if let Some(hostname) = hostname {
        return Ok(hostname.to_owned());
    }
    let hostname = hostname::get().map_err(CliError::Hostname)?;
    Ok(hostname.to_string_lossy().into_owned())
}

fn print_dry_run_result(output: &Output, result: &DryRunResult) {
    output.highlight("\n[DRY RUN] No changes made.");

    output.field("Title", &result.page_name);
    match &result.page_id {
        Some(page_id) => output.info(&format!("Would update page {page_id}")),
        None => output.info("Would create a new page"),
    }
    output.field(
        "Blocks",
        format!(
            "{} ({} including nested) in {} request(s)",
            result.block_count, result.total_blocks, result.chunk_count
        ),
    );
    if result.existing_blocks > 0 {
        output.field("Existing blocks to remove", result.existing_blocks);
    }

    print_warnings(output, &result.warnings);
}

fn print_sync_result(output: &Output, result: &SyncResult) {
    match result.action {
        SyncAction::Created => output.success("\nPage created successfully!"),
        SyncAction::Updated => output.success("\nPage updated successfully!"),
    }
    output.field("ID", &result.page_id);
    output.field("Title", &result.page_name);

    let outcome = &result.outcome;
    output.field(
        "Blocks",
        format!(
            "{} appended in {} request(s), {} removed",
            outcome.appended_blocks, outcome.append_calls, outcome.deleted
        ),
    );
    if outcome.delete_failures > 0 {
        output.warning(&format!(
            "\nWarning: {} old block(s) could not be removed",
            outcome.delete_failures
        ));
    }

    print_warnings(output, &result.warnings);
}

fn print_warnings(output: &Output, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    output.warning(&format!("\nConversion warnings ({}):", warnings.len()));
    for warning in warnings {
        output.info(&format!("  - {warning}"));
    }
}
