mod crawler;
mod dataset;
mod fetcher;
mod index_scraper;
mod mirror;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crawler::Crawler;
use dataset::AI4BOUNDARIES;
use fetcher::FetchError;
use index_scraper::IndexPage;
use mirror::{Mirror, MirrorError, PathMapper};

#[derive(Parser, Debug)]
#[command(version, about = "Mirror the AI4Boundaries dataset to local disk")]
pub struct Cli {
    /// Directory to mirror the dataset into
    dest: PathBuf,
    /// Override the built-in dataset root URL
    #[arg(short, long)]
    url: Option<String>,
    /// Seconds to pause after a failed download before moving on
    #[arg(long, default_value_t = 20)]
    cooldown: u64,
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error("crawl failed: {0}")]
    Crawl(#[from] FetchError),
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

#[tokio::main]
async fn main() {
    let args = Cli::try_parse();
    match args {
        Ok(args) => {
            if let Some(log_level) = &args.log_level {
                tracing_subscriber::fmt()
                    .with_env_filter(format!("ai4boundaries_dl={}", log_level))
                    .compact()
                    .init();
            }

            if let Err(err) = run(args).await {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        }
        Err(e) => println!("{}", e),
    }
}

async fn run(args: Cli) -> Result<(), RunError> {
    let root = args
        .url
        .unwrap_or_else(|| AI4BOUNDARIES.root_url.to_string());
    let client = reqwest::Client::new();

    println!("Scraping data");
    let crawler = Crawler {
        scraper: IndexPage::new(client.clone()),
        extensions: AI4BOUNDARIES.extensions,
    };
    let listing = crawler.crawl(&root).await?;

    let mirror = Mirror {
        fetcher: client,
        mapper: PathMapper {
            remote_root: root,
            local_root: args.dest,
            elided_segment: AI4BOUNDARIES.elided_segment,
            excluded_marker: AI4BOUNDARIES.excluded_marker,
        },
        cooldown: Duration::from_secs(args.cooldown),
    };
    let report = mirror.run(&listing).await?;

    println!("Download finished!");
    println!("{}", report);
    println!("Cite the data set:");
    println!("{}", AI4BOUNDARIES.citation);
    Ok(())
}
