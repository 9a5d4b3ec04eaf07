//! crawlbot CLI
//!
//! Local execution entry point. For AWS Lambda, use `crawlbot-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use crawlbot::{
    error::{AppError, Result},
    models::{Config, CrawlOutcome, MESSAGE_EVENT_TYPE, MessageEvent, Secrets},
    pipeline::{IntentClassifier, IntentPipeline, compose},
    server,
    services::{ConsoleNotifier, FirecrawlClient, SlackNotifier, UrlCrawler},
    utils::url::extract_urls,
};

/// crawlbot - recrawl requests from chat
#[derive(Parser, Debug)]
#[command(
    name = "crawlbot",
    version,
    about = "Chat webhook that crawls URLs on request"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the webhook endpoint over HTTP
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: String,
    },

    /// Run a message through the pipeline and print the reply instead of posting it
    Simulate {
        /// Message text as a user would type it
        message: String,

        /// Channel to address the reply to
        #[arg(long, default_value = "C0SIMULATED")]
        channel: String,
    },

    /// Crawl a single URL and print the result
    Crawl {
        url: String,
    },

    /// Validate configuration and report which credentials are set
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    let secrets = Secrets::from_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Serve { bind } => {
            config.validate()?;
            let pipeline = Arc::new(IntentPipeline::from_config(&config, &secrets)?);
            server::serve(&bind, pipeline).await?;
        }

        Command::Simulate { message, channel } => {
            let urls = extract_urls(&message);
            let intent = IntentClassifier::from_config(&config.intent).detect(&message);
            log::info!("Extracted {} URL(s): {:?}", urls.len(), urls);
            log::info!(
                "Recrawl intent: {}",
                if intent { "detected" } else { "not detected" }
            );

            let crawler = FirecrawlClient::new(&config, secrets.crawl_api_key.clone())?;
            let pipeline =
                IntentPipeline::new(&config, Arc::new(crawler), Arc::new(ConsoleNotifier));
            let event = MessageEvent {
                event_type: MESSAGE_EVENT_TYPE.to_string(),
                text: Some(message),
                channel,
                user: "simulator".to_string(),
                ..Default::default()
            };

            if pipeline.handle(&event).await.is_none() {
                log::info!("No reply would be sent");
            }
        }

        Command::Crawl { url } => {
            let crawler = FirecrawlClient::new(&config, secrets.crawl_api_key.clone())?;
            let result = crawler.crawl(&url).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            println!();
            println!("{}", compose::crawl_block(&result));

            if let CrawlOutcome::Failure { error } = result.outcome {
                return Err(AppError::api("crawl API", error));
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} intent keywords)", config.intent.keywords.len());

            match secrets.crawl_api_key {
                Some(_) => log::info!("✓ Crawl API key set"),
                None => log::warn!("✗ Crawl API key not set; crawls will fail"),
            }

            let notifier = SlackNotifier::new(&config, secrets.bot_token.clone())?;
            match notifier.usable_token() {
                Ok(_) => log::info!("✓ Bot token set"),
                Err(e) => log::warn!("✗ {}; replies will not be delivered", e),
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
