use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vidatlas_cache::{BatchCache, BlobStore, FileStore};
use vidatlas_core::{AppConfig, MediaItem};
use vidatlas_geocode::{GeocodeClient, RateLimiter};
use vidatlas_pipeline::Aggregator;
use vidatlas_youtube::VideoApiClient;

#[derive(Debug, Parser)]
#[command(name = "vidatlas")]
#[command(about = "Aggregates channel videos and enriches them with locations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the aggregated batch, serving from cache when fresh.
    Fetch {
        /// Bypass the cache and refetch every channel.
        #[arg(long)]
        force_refresh: bool,
        /// Print items as JSON lines instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Show the cached batch's age and validity.
    CacheStatus,
    /// Remove the cached batch.
    ClearCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = vidatlas_core::load_app_config()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch {
            force_refresh,
            json,
        } => run_fetch(&config, force_refresh, json).await,
        Commands::CacheStatus => run_cache_status(&config),
        Commands::ClearCache => {
            batch_cache(&config).clear();
            println!("cache cleared");
            Ok(())
        }
    }
}

fn batch_cache(config: &AppConfig) -> BatchCache {
    let store = Arc::new(FileStore::new(config.cache_dir.clone())) as Arc<dyn BlobStore>;
    BatchCache::new(store, config.cache_ttl_hours)
}

fn build_aggregator(config: &AppConfig) -> anyhow::Result<Aggregator> {
    let roster = vidatlas_core::load_channels(&config.channels_path)
        .map_err(|e| anyhow::anyhow!("channel roster error: {e}"))?;

    let video = VideoApiClient::new(
        &config.youtube_api_key,
        config.video_request_timeout_secs,
        config.video_max_retries,
        config.video_retry_backoff_base_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build video API client: {e}"))?;

    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
        config.geocoder_min_interval_ms,
    )));
    let geocoder = GeocodeClient::new(
        &config.geocoder_user_agent,
        config.geocoder_timeout_secs,
        limiter,
    )
    .map_err(|e| anyhow::anyhow!("failed to build geocode client: {e}"))?;

    Ok(Aggregator::new(
        video,
        geocoder,
        batch_cache(config),
        roster.channels,
        config.video_max_results,
    ))
}

async fn run_fetch(config: &AppConfig, force_refresh: bool, json: bool) -> anyhow::Result<()> {
    let aggregator = build_aggregator(config)?;
    let items = aggregator.fetch_all(force_refresh).await;

    if json {
        for item in &items {
            println!("{}", serde_json::to_string(item)?);
        }
        return Ok(());
    }

    if items.is_empty() {
        println!("no items — every channel fetch failed or returned nothing");
        return Ok(());
    }

    for item in &items {
        println!(
            "{}  {:<14} {:<24} {}{}",
            item.published_at.format("%Y-%m-%d"),
            item.id,
            item.source_name,
            item.title,
            location_summary(item)
        );
    }
    println!("{} items", items.len());
    Ok(())
}

fn location_summary(item: &MediaItem) -> String {
    match &item.location {
        Some(geo) => {
            let place: Vec<&str> = [geo.city.as_deref(), geo.country.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if place.is_empty() {
                match (geo.latitude, geo.longitude) {
                    (Some(lat), Some(lon)) => format!("  [{lat:.2}, {lon:.2}]"),
                    _ => String::new(),
                }
            } else {
                format!("  [{}]", place.join(", "))
            }
        }
        None => String::new(),
    }
}

fn run_cache_status(config: &AppConfig) -> anyhow::Result<()> {
    let cache = batch_cache(config);
    match cache.age_minutes() {
        Some(age) => println!(
            "cached batch: {age} minutes old, {}",
            if cache.is_valid() { "valid" } else { "expired" }
        ),
        None => println!("no cached batch"),
    }
    Ok(())
}
