use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use textbook_catalogue::catalogue::{Catalogue, CatalogueFetcher};
use textbook_catalogue::config::{find_config_file, load_config, Config};
use textbook_catalogue::models::{AggregatedResult, SearchCriteria, SearchMode};
use textbook_catalogue::utils::{render_json, render_plain, render_table};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shown when the catalogue cannot be reached
const FALLBACK_SITE: &str = "https://open.bccampus.ca/find-open-textbooks/";

/// Textbook Catalogue - Search an open textbook repository
#[derive(Parser, Debug)]
#[command(name = "textbook-catalogue")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search an open textbook repository by subject, keyword or contributor", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides configuration)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the catalogue and print every matching record
    Search {
        /// Subject, keyword, institution or free text; omit to list everything
        term: Option<String>,

        /// Match the term against the subject classification
        #[arg(long, conflicts_with_all = ["keyword", "contributor"])]
        subject: bool,

        /// Match the term against keywords, in title and lower case
        #[arg(long, conflicts_with = "contributor")]
        keyword: bool,

        /// Match the term against the contributing institution
        #[arg(long)]
        contributor: bool,

        /// Records per request (at most 50; 0 means the maximum)
        #[arg(long, short)]
        limit: Option<usize>,

        /// Collection UUID to search
        #[arg(long)]
        collection: Option<String>,

        /// Attachment field holding the authors listed in table output
        #[arg(long, default_value = "description")]
        authors_key: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref())?;
    if let Some(timeout) = cli.timeout {
        config.catalogue.timeout_seconds = timeout;
    }

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command {
        Commands::Search {
            term,
            subject,
            keyword,
            contributor,
            limit,
            collection,
            authors_key,
        } => {
            let mode = search_mode(subject, keyword, contributor);
            let mut criteria = config
                .catalogue
                .criteria(mode, term.unwrap_or_default());
            if let Some(limit) = limit {
                criteria = criteria.page_size(limit);
            }
            if let Some(collection) = collection {
                criteria = criteria.collection_id(collection);
            }

            let fetcher = CatalogueFetcher::from_config(&config.catalogue)?;
            run_search(&fetcher, &criteria, cli.output, &authors_key).await?;
        }
        Commands::Config => {
            println!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Mode picked by the mutually exclusive search flags; free text without one
fn search_mode(subject: bool, keyword: bool, contributor: bool) -> SearchMode {
    if subject {
        SearchMode::Subject
    } else if keyword {
        SearchMode::Keyword
    } else if contributor {
        SearchMode::Contributor
    } else {
        SearchMode::All
    }
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("textbook_catalogue={}", level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_search(
    catalogue: &dyn Catalogue,
    criteria: &SearchCriteria,
    format: OutputFormat,
    authors_key: &str,
) -> Result<()> {
    match catalogue.fetch(criteria).await {
        Ok(result) => {
            println!("{}", format_result(&result, format, authors_key)?);
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "Sorry, something went wrong searching {}: {}\nVisit {} to discover and download free textbooks.",
                catalogue.name(),
                e,
                FALLBACK_SITE
            );
            Err(e.into())
        }
    }
}

fn format_result(
    result: &AggregatedResult,
    format: OutputFormat,
    authors_key: &str,
) -> Result<String> {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    let rendered = match actual_format {
        OutputFormat::Json => render_json(result)?,
        OutputFormat::Plain => render_plain(result),
        OutputFormat::Table | OutputFormat::Auto => render_table(result, authors_key),
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use textbook_catalogue::catalogue::{make_record, MockCatalogue};
    use textbook_catalogue::FetchError;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["textbook-catalogue", "search"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.timeout.is_none());
        match cli.command {
            Commands::Search {
                term,
                subject,
                keyword,
                contributor,
                limit,
                authors_key,
                ..
            } => {
                assert!(term.is_none());
                assert_eq!(search_mode(subject, keyword, contributor), SearchMode::All);
                assert!(limit.is_none());
                assert_eq!(authors_key, "description");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_search_args() {
        let cli = Cli::parse_from([
            "textbook-catalogue",
            "-vv",
            "-o",
            "json",
            "search",
            "--keyword",
            "--limit",
            "20",
            "--authors-key",
            "authors",
            "Organic Chemistry",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Search {
                term,
                subject,
                keyword,
                contributor,
                limit,
                authors_key,
                ..
            } => {
                assert_eq!(term.as_deref(), Some("Organic Chemistry"));
                assert_eq!(search_mode(subject, keyword, contributor), SearchMode::Keyword);
                assert_eq!(limit, Some(20));
                assert_eq!(authors_key, "authors");
            }
            other => panic!("unexpected command {:?}", other),
        }

        for (flag, expected) in [
            ("--subject", SearchMode::Subject),
            ("--keyword", SearchMode::Keyword),
            ("--contributor", SearchMode::Contributor),
        ] {
            let cli = Cli::parse_from(["textbook-catalogue", "search", flag, "Biology"]);
            match cli.command {
                Commands::Search {
                    term,
                    subject,
                    keyword,
                    contributor,
                    ..
                } => {
                    assert_eq!(term.as_deref(), Some("Biology"));
                    assert_eq!(search_mode(subject, keyword, contributor), expected);
                }
                other => panic!("unexpected command {:?}", other),
            }
        }

        for pair in [
            ["--subject", "--keyword"],
            ["--keyword", "--contributor"],
            ["--contributor", "--subject"],
        ] {
            let parsed =
                Cli::try_parse_from(["textbook-catalogue", "search", pair[0], pair[1], "Art"]);
            assert!(parsed.is_err(), "{:?} should conflict", pair);
        }
    }

    #[test]
    fn test_cli_config_command() {
        let cli = Cli::parse_from(["textbook-catalogue", "--timeout", "30", "config"]);
        assert_eq!(cli.timeout, Some(30));
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn test_format_result_json() {
        let result = AggregatedResult {
            total_available: 1,
            records: vec![make_record("u1", "Physics")],
        };
        let rendered = format_result(&result, OutputFormat::Json, "description").unwrap();
        assert!(rendered.contains("\"Physics\""));
    }

    #[tokio::test]
    async fn test_run_search_propagates_error() {
        let mock = MockCatalogue::new();
        mock.set_error(FetchError::Transport("timed out".into()));
        let result = run_search(
            &mock,
            &SearchCriteria::subject("Art"),
            OutputFormat::Plain,
            "description",
        )
        .await;
        assert!(result.is_err());
        assert_eq!(mock.calls()[0].term, "Art");
    }
}
