use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use k2bib_acquire::{FetchConfig, PageFetcher};
use k2bib_batch::{BatchOptions, Outcome};
use k2bib_model::Identifier;
use k2bib_parse::AbstractPolicy;

#[derive(Parser)]
#[command(name = "k2bib")]
#[command(about = "BibTeX citations for K2 Guest Observer proposals")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Cite every GO proposal listed in a metadata table
    Batch {
        /// CSV table with an "Investigation IDs" column
        #[arg(short, long, default_value = "GO_proposal_metadata.csv")]
        input: PathBuf,

        /// Output file for the citations
        #[arg(short, long, default_value = "K2bib.txt")]
        output: PathBuf,

        /// Append to the output file instead of replacing it
        #[arg(long)]
        append: bool,

        /// Cite proposals even when their page has no abstract
        #[arg(long)]
        allow_missing_abstract: bool,

        /// Save each fetched page to this directory as {ID}.txt
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Print the citation for a single proposal
    Cite {
        /// Proposal identifier (e.g., "GO5023")
        id: Identifier,

        /// Cite the proposal even when its page has no abstract
        #[arg(long)]
        allow_missing_abstract: bool,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Extract a proposal record from a saved page and write it as JSON
    Extract {
        /// Saved proposal page (e.g., from --cache-dir)
        #[arg(short, long)]
        page: PathBuf,

        /// Proposal identifier the page belongs to
        #[arg(long)]
        id: Identifier,

        /// Source URL to record (defaults to the program page URL for the ID)
        #[arg(long)]
        url: Option<String>,

        /// Output path for the record JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the record even when the page has no abstract
        #[arg(long)]
        allow_missing_abstract: bool,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// Base URL the proposal ID is appended to
    #[arg(long, default_value = k2bib_acquire::fetch::DEFAULT_BASE_URL)]
    base_url: String,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl FetchArgs {
    fn into_config(self) -> FetchConfig {
        FetchConfig {
            base_url: self.base_url,
            verify_tls: !self.insecure,
            timeout: Duration::from_secs(self.timeout_secs),
            ..FetchConfig::default()
        }
    }
}

fn abstract_policy(allow_missing: bool) -> AbstractPolicy {
    if allow_missing {
        AbstractPolicy::Optional
    } else {
        AbstractPolicy::Required
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs go to stderr so `cite` and `extract` can print to stdout.
    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Batch {
            input,
            output,
            append,
            allow_missing_abstract,
            cache_dir,
            fetch,
        } => {
            tracing::info!(input = %input.display(), output = %output.display(), "Building citations");
            let fetcher = PageFetcher::new(fetch.into_config())?;
            let options = BatchOptions {
                input,
                output,
                append,
                policy: abstract_policy(allow_missing_abstract),
                cache_dir,
            };
            let summary = k2bib_batch::run_batch(&fetcher, &options).await?;
            if summary.failed > 0 {
                tracing::warn!(failed = summary.failed, "Some proposals could not be cited; see warnings above");
            }
        }
        Commands::Cite {
            id,
            allow_missing_abstract,
            fetch,
        } => {
            tracing::info!(id = %id, "Citing proposal");
            let fetcher = PageFetcher::new(fetch.into_config())?;
            let policy = abstract_policy(allow_missing_abstract);
            match k2bib_batch::process_one(&fetcher, &id, policy, None).await? {
                Outcome::Cited(citation) => println!("{citation}"),
                Outcome::NotFound => tracing::warn!(id = %id, "No program page for this proposal"),
                Outcome::NoAbstract => tracing::warn!(
                    id = %id,
                    "Proposal page has no abstract; pass --allow-missing-abstract to cite it anyway"
                ),
            }
        }
        Commands::Extract {
            page,
            id,
            url,
            output,
            allow_missing_abstract,
        } => {
            tracing::info!(page = %page.display(), id = %id, "Extracting proposal record");
            let url = url.unwrap_or_else(|| FetchConfig::default().page_url(&id));
            let policy = abstract_policy(allow_missing_abstract);
            let Some(record) = k2bib_parse::extract_saved_page(&page, &id, &url, policy)? else {
                tracing::warn!(id = %id, "Page yielded no record (missing page or no abstract)");
                return Ok(());
            };

            let json = serde_json::to_string_pretty(&record)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Wrote proposal record");
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
