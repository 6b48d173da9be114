use anyhow::Result;
use clap::Parser;
use scrap_app::publish::{Publisher, ScrapboxPublisher, StdoutPublisher};
use scrap_app::run::{run_once, FetchPosts, RunMode, RunOutcome};
use scrap_common::observability::{init_logging, LogConfig};
use scrap_config::JournalConfigLoader;
use scrap_http::{Credentials, HttpClient};
use scrap_outline::Post;
use scrap_social::twitter::{auth, extract, TwitterApi};
use scrap_store::FileStore;

/// Poll a Twitter account and append its new posts to the journal.
#[derive(Parser, Debug)]
#[command(name = "scrap-journal", version)]
struct Opts {
    /// Ignore the cursor, fetch the full available window, and leave the
    /// cursor untouched afterward.
    #[arg(short, long)]
    all: bool,
    /// Write the rendered document to stdout instead of publishing.
    #[arg(short, long)]
    raw: bool,
}

/// Live fetcher: signed timeline call, then normalization into [`Post`]s.
struct TimelineFetcher {
    api: TwitterApi,
    screen_name: String,
}

#[async_trait::async_trait]
impl FetchPosts for TimelineFetcher {
    async fn fetch(&self, since_id: Option<&str>) -> Result<Vec<Post>> {
        let tweets = self.api.user_timeline(&self.screen_name, since_id).await?;
        tweets.iter().map(extract::post_from_tweet).collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    // Config first: a missing file must fail before any network activity.
    let cfg = JournalConfigLoader::new()
        .with_file(scrap_config::default_config_path())
        .load()?;

    init_logging(LogConfig::default())?;

    let store = FileStore::new(scrap_config::state_dir());
    let http = HttpClient::new("https://api.twitter.com")?;
    let consumer = Credentials::new(cfg.consumer.key.clone(), cfg.consumer.secret.clone());

    let token = auth::load_or_authorize(&store, &http, &consumer, &auth::StdinPrompt).await?;
    let api = TwitterApi::new(consumer, Credentials::new(token.token, token.secret));
    let fetcher = TimelineFetcher {
        api,
        screen_name: cfg.twitter.user.clone(),
    };

    let publisher: Box<dyn Publisher> = if opts.raw {
        Box::new(StdoutPublisher)
    } else {
        Box::new(ScrapboxPublisher::new(cfg.scrapbox.project.clone()))
    };

    let mode = RunMode {
        fetch_all: opts.all,
    };
    match run_once(&store, &fetcher, publisher.as_ref(), mode).await? {
        RunOutcome::NoNewPosts => eprintln!("no new posts"),
        RunOutcome::Dispatched { posts } => {
            tracing::info!(posts, all = opts.all, raw = opts.raw, "journal.run.complete")
        }
    }
    Ok(())
}
