use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use usearch::app::App;
use usearch::config::Config;
use usearch::error::{AppError, AppResult};
use usearch::query::{ProviderKind, SearchProvider, StaticIndexProvider};

#[derive(Debug, Parser)]
#[command(
    name = "usk",
    about = "Modal search overlay over a static site's search index",
    version
)]
struct Cli {
    /// Path to the generated JSON search index.
    index: PathBuf,

    /// Search backend to attach (google, algolia, hexo, azure, baidu).
    #[arg(long, default_value = "hexo")]
    provider: String,

    /// Explicit config file, overriding the default lookup.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open the overlay with this query already submitted.
    #[arg(long)]
    query: Option<String>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Logging goes to stderr and only when USEARCH_LOG is set; the terminal
/// UI owns stdout.
fn init_tracing() {
    if std::env::var_os("USEARCH_LOG").is_none() {
        return;
    }
    let filter = EnvFilter::try_from_env("USEARCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let kind = ProviderKind::parse(&cli.provider)
        .ok_or_else(|| AppError::invalid_argument(format!("unknown provider: {}", cli.provider)))?;
    let provider: Option<Arc<dyn SearchProvider>> = match kind {
        ProviderKind::Hexo => Some(Arc::new(StaticIndexProvider::new(cli.index.clone()))),
        _ => None,
    };

    let index_label = cli.index.display().to_string();
    let mut app = App::new(config, kind, provider, index_label);
    if let Some(query) = cli.query
        && !query.is_empty()
    {
        app.submit_initial_query(query, Instant::now())?;
    }

    app.run().await
}
