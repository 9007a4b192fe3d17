use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rss_digest::catalog::SourceCatalog;
use rss_digest::pipeline::{self, Options};

#[derive(Parser, Debug)]
#[command(name = "rss-digest", about = "Fetches configured feeds and renders a Markdown news digest")]
struct Args {
    /// Feed source catalog (JSON map of name to URL); a default is created
    /// when the file does not exist
    #[arg(short, long, default_value = "rss_feeds.json")]
    source: PathBuf,

    /// Destination directory for the rendered digest
    #[arg(short, long, default_value = "/tmp/rss")]
    destination: PathBuf,

    /// Limit of days to download. Default 1 (today)
    #[arg(short, long, default_value_t = 1)]
    limit: u32,

    /// Enable output log information
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    // Verbose mode raises the floor to info; otherwise RUST_LOG decides
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Bootstrap: a missing catalog gets a default the user is expected to
    // edit, then the run ends without fetching anything
    if !args.source.is_file() {
        println!(
            "Feed source {} does not exist, creating a default one. Fill this file and run again.",
            args.source.display()
        );
        SourceCatalog::create_default(&args.source)
            .context("Failed to create default feed catalog")?;
        return Ok(());
    }

    if !args.destination.is_dir() {
        println!(
            "Destination directory {} does not exist, creating.",
            args.destination.display()
        );
        std::fs::create_dir_all(&args.destination)
            .context("Failed to create destination directory")?;
    }

    let catalog =
        SourceCatalog::load(&args.source).context("Failed to load feed catalog")?;

    let options = Options {
        limit_days: args.limit,
        ..Options::default()
    };
    let path = pipeline::run(catalog, &args.destination, &options)
        .await
        .context("Failed to produce digest")?;

    println!("Digest written to {}", path.display());
    Ok(())
}
