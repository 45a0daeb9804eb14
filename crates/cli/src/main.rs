use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use catalog::{CatalogIndex, ClientId, ProductId};
use engine::ScoredProduct;
use rand::seq::IndexedRandom;
use recommender::{RecommendationService, RecommenderConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// shop-recs - Product Recommendation Engine
#[derive(Parser)]
#[command(name = "shop-recs")]
#[command(about = "Product recommendations from popularity and category affinity", long_about = None)]
struct Cli {
    /// Snapshot directory (products.json, clients.json, interactions.json)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed seed for the scoring noise
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get product recommendations for a client
    Recommend {
        /// Client ID to get recommendations for
        #[arg(long)]
        client: String,

        /// Number of recommendations (default: config default_limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Full listing page (config listing_limit)
        #[arg(long, conflicts_with = "limit")]
        all: bool,

        /// Show the strategy and the score of each product
        #[arg(long)]
        explain: bool,
    },

    /// Show the most popular products across all clients
    Popularity {
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Show products similar to a product (same category)
    Similar {
        #[arg(long)]
        product: String,

        /// Number of products (default: config similar_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the action weights, optionally replacing the overrides first
    Weights {
        /// JSON object of action name to weight, e.g. '{"purchase": 8}'
        #[arg(long)]
        set: Option<String>,

        /// Rank this client's recommendations under the resulting weights
        #[arg(long)]
        preview: Option<String>,
    },

    /// Show a client's declared interests and interaction history
    Client {
        #[arg(long)]
        client: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = RecommenderConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    println!("Loading shop snapshot from {}...", config.data_dir.display());
    let start = Instant::now();
    let index = Arc::new(
        CatalogIndex::load_from_dir(&config.data_dir).context("Failed to load shop snapshot")?,
    );
    let (products, clients, interactions) = index.counts();
    println!(
        "{} Loaded {} products, {} clients, {} interactions in {:?}",
        "✓".green(),
        products,
        clients,
        interactions,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            client,
            limit,
            all,
            explain,
        } => {
            let limit = if all {
                config.listing_limit
            } else {
                limit.unwrap_or(config.default_limit)
            };
            handle_recommend(index, &config, ClientId(client), limit, explain)?
        }
        Commands::Popularity { top } => handle_popularity(&index, top),
        Commands::Similar { product, limit } => {
            handle_similar(&index, ProductId(product), limit.unwrap_or(config.similar_limit))?
        }
        Commands::Weights { set, preview } => {
            handle_weights(index, &config, set, preview.map(ClientId))?
        }
        Commands::Client { client } => handle_client(&index, ClientId(client))?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(index, &config, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    index: Arc<CatalogIndex>,
    config: &RecommenderConfig,
    client_id: ClientId,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let service = RecommendationService::from_config(index, config);
    let recommendations = service.get_scored_recommendations(&client_id, limit)?;

    println!(
        "{}",
        format!("Recommendations for {}:", client_id).bold().blue()
    );
    if explain {
        println!(
            "   Strategy: {}",
            recommendations.strategy.to_string().yellow()
        );
    }
    print_products(&recommendations.items, explain);
    Ok(())
}

/// Handle the 'popularity' command
fn handle_popularity(index: &CatalogIndex, top: usize) {
    let weights = index.resolved_weights();
    let scores =
        engine::compute_global_popularity(index.products(), &index.all_interactions(), &weights);
    let ranked = engine::rank(index.products().to_vec(), &scores, top);

    println!("{}", "Most popular products:".bold().blue());
    print_products(&ranked, true);
}

/// Handle the 'similar' command
fn handle_similar(index: &CatalogIndex, product_id: ProductId, limit: usize) -> Result<()> {
    let product = index
        .get_product(&product_id)
        .ok_or_else(|| anyhow!("Product {} not found", product_id))?;

    println!(
        "{}",
        format!("Similar to {} [{}]:", product.name, product.category)
            .bold()
            .blue()
    );
    let similar = index.similar_products(&product_id, limit);
    if similar.is_empty() {
        println!("  (no other products in this category)");
    }
    for (i, product) in similar.iter().enumerate() {
        println!(
            "{}. {} - {} ({})",
            (i + 1).to_string().green(),
            product.name,
            product.price,
            product.id
        );
    }
    Ok(())
}

/// Handle the 'weights' command
///
/// `--set` only changes the loaded snapshot; nothing is written back, so
/// `--preview` is the way to see its effect.
fn handle_weights(
    index: Arc<CatalogIndex>,
    config: &RecommenderConfig,
    set: Option<String>,
    preview: Option<ClientId>,
) -> Result<()> {
    if let Some(json) = set {
        apply_weight_update(&index, &json)?;
        println!("{} Weight overrides replaced for this run", "✓".green());
        println!(
            "   {}",
            format!(
                "Not persisted: edit {} to keep it",
                config.data_dir.join("weights.json").display()
            )
            .yellow()
        );
    }

    let overrides = index.weight_overrides();
    println!("{}", "Action weights:".bold().blue());
    for (name, weight) in index.resolved_weights().iter() {
        let marker = if overrides.contains_key(name) {
            " (override)".yellow().to_string()
        } else {
            String::new()
        };
        println!("{}{}: {}{}", "• ".green(), name, weight, marker);
    }

    if let Some(client_id) = preview {
        let service = RecommendationService::from_config(index, config);
        let recommendations =
            service.get_scored_recommendations(&client_id, config.default_limit)?;
        println!(
            "{}",
            format!("Recommendations for {} under these weights:", client_id)
                .bold()
                .blue()
        );
        print_products(&recommendations.items, true);
    }
    Ok(())
}

fn apply_weight_update(index: &CatalogIndex, json: &str) -> Result<()> {
    index
        .update_weights_json(json)
        .context("Weight update rejected")
}

/// Handle the 'client' command
fn handle_client(index: &CatalogIndex, client_id: ClientId) -> Result<()> {
    let profile = index
        .get_client(&client_id)
        .ok_or_else(|| anyhow!("Client {} not found", client_id))?;
    let history = index.client_history(&client_id);

    println!("{}", format!("Client ID: {}", client_id).bold().blue());
    let interests = if profile.interests.is_empty() {
        "(none)".to_string()
    } else {
        profile
            .interests
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("{}Interests: {}", "• ".green(), interests);
    println!("{}Interactions: {}", "• ".cyan(), history.len());

    if history.is_empty() {
        println!("  (cold-start client)");
    }
    for event in &history {
        let name = index
            .get_product(&event.product_id)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        println!(
            "  - {} {} ({}) at {}",
            event.action, name, event.product_id, event.timestamp
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    index: Arc<CatalogIndex>,
    config: &RecommenderConfig,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let client_ids = index.client_ids();
    if client_ids.is_empty() {
        bail!("Snapshot has no clients to benchmark");
    }

    let service = RecommendationService::from_config(index.clone(), config);
    let limit = config.default_limit;
    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));

    let mut rng = rand::rng();
    let picks: Vec<ClientId> = (0..requests)
        .filter_map(|_| client_ids.choose(&mut rng).cloned())
        .collect();

    info!(
        "Benchmarking {} requests, {} concurrent",
        requests, concurrent
    );
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(picks.len());
    for client_id in picks {
        let service = service.clone();
        let semaphore = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let elapsed = tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                service.get_recommendations(&client_id, limit)?;
                Ok::<_, anyhow::Error>(start.elapsed())
            })
            .await??;
            Ok::<_, anyhow::Error>(elapsed)
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let summed: Duration = timings.iter().sum();
    let avg_latency = summed / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p) as usize];
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_products(items: &[ScoredProduct], show_scores: bool) {
    if items.is_empty() {
        println!("  (nothing to recommend)");
    }
    for (i, scored) in items.iter().enumerate() {
        let product = &scored.product;
        print!(
            "{}. {} [{}] - {}",
            (i + 1).to_string().green(),
            product.name,
            product.category,
            product.price
        );
        if show_scores {
            print!(" - Score: {:.3}", scored.score);
        }
        println!();
    }
}
