//! Demo harness for the recommendation service.
//!
//! Loads a snapshot directory and logs the recommendations of every client
//! in it. Pass a TOML config path as the first argument to override the
//! defaults.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::CatalogIndex;
use recommender::{RecommendationService, RecommenderConfig};

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = RecommenderConfig::load(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting shop recommender harness");

    let index = CatalogIndex::load_from_dir(&config.data_dir).with_context(|| {
        format!("Failed to load snapshot from {}", config.data_dir.display())
    })?;
    let index = Arc::new(index);
    let service = RecommendationService::from_config(index.clone(), &config);

    for client_id in index.client_ids() {
        let recommendations =
            service.get_scored_recommendations(&client_id, config.default_limit)?;
        info!(
            "Client {} ({}): {} recommendations",
            client_id,
            recommendations.strategy,
            recommendations.items.len()
        );
        for (i, scored) in recommendations.items.iter().enumerate() {
            info!(
                "{}. {} [{}] {} - Score: {:.3}",
                i + 1,
                scored.product.name,
                scored.product.category,
                scored.product.price,
                scored.score
            );
        }
    }

    Ok(())
}
