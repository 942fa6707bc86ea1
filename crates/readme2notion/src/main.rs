//! readme2notion CLI - publish a markdown file to a Notion database page.
//!
//! The page is identified by `{hostname}/{name}`: the first run creates it,
//! later runs replace its content and properties. The page ID is saved back
//! to `.notion.toml`.

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::SyncArgs;
use output::Output;

/// readme2notion - Publish markdown to Notion.
#[derive(Parser)]
#[command(name = "readme2notion", version, about)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.sync.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.sync.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_file_required() {
        assert!(Cli::try_parse_from(["readme2notion"]).is_err());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "readme2notion",
            "-t",
            "abc123",
            "--chunk-size",
            "50",
            "--dry-run",
            "README.md",
        ])
        .unwrap();
        assert!(cli.sync.dry_run);
        assert!(!cli.sync.verbose);
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).to_string(), "warn");
        assert_eq!(log_filter(false, Some("")).to_string(), "warn");
    }

    #[test]
    fn test_log_filter_uses_rust_log() {
        assert_eq!(
            log_filter(false, Some("r2n_notion=debug")).to_string(),
            "r2n_notion=debug"
        );
    }

    #[test]
    fn test_log_filter_verbose_is_info() {
        assert_eq!(log_filter(true, None).to_string(), "info");
        assert_eq!(log_filter(true, Some("error")).to_string(), "info");
    }
}
