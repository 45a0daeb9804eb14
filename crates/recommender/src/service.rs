//! # Recommendation Service
//!
//! The single entry point callers use: `get_recommendations(client, limit)`.
//!
//! Per request it:
//! 1. Fetches history, catalog, full log, weights and profile from the
//!    data source (failures stop here, before the engine runs)
//! 2. Lets the engine pick cold-start or personalized scoring
//! 3. Ranks the catalog and keeps the top `limit`
//!
//! Nothing is cached between requests, so a weight change made through the
//! store is visible on the very next call.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, instrument};

use catalog::{ClientId, ClientProfile, DataSource, InteractionEvent, Product, WeightConfig};
use engine::{AnalysisInput, Recommendations};

use crate::config::RecommenderConfig;

/// Everything fetched for one request
#[derive(Debug, Clone)]
struct RequestSnapshot {
    profile: ClientProfile,
    history: Vec<InteractionEvent>,
    products: Vec<Product>,
    all_interactions: Vec<InteractionEvent>,
    weights: WeightConfig,
}

impl RequestSnapshot {
    fn input(&self) -> AnalysisInput<'_> {
        AnalysisInput {
            profile: &self.profile,
            history: &self.history,
            products: &self.products,
            all_interactions: &self.all_interactions,
            weights: &self.weights,
        }
    }
}

/// Strategy selector over a shared data source.
///
/// Cheap to clone; clones share the same source.
#[derive(Clone)]
pub struct RecommendationService {
    source: Arc<dyn DataSource>,
    seed: Option<u64>,
}

impl RecommendationService {
    /// Create a service drawing fresh noise on every request
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source, seed: None }
    }

    /// Create a service with the caller policies from `config`
    pub fn from_config(source: Arc<dyn DataSource>, config: &RecommenderConfig) -> Self {
        Self {
            source,
            seed: config.seed,
        }
    }

    /// Use a fixed noise seed so every request with the same inputs ranks the same
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Top `limit` products for `client_id`, best first.
    pub fn get_recommendations(&self, client_id: &ClientId, limit: usize) -> Result<Vec<Product>> {
        let recommendations = self.get_scored_recommendations(client_id, limit)?;
        Ok(recommendations
            .items
            .into_iter()
            .map(|scored| scored.product)
            .collect())
    }

    /// Same as [`get_recommendations`](Self::get_recommendations), keeping
    /// the scores and the strategy name.
    #[instrument(skip_all, fields(client_id = %client_id, limit = limit))]
    pub fn get_scored_recommendations(
        &self,
        client_id: &ClientId,
        limit: usize,
    ) -> Result<Recommendations> {
        let start_time = Instant::now();

        let snapshot = self.fetch_snapshot(client_id)?;
        info!(
            "Fetched {} products, {} history events, {} interactions for client {}",
            snapshot.products.len(),
            snapshot.history.len(),
            snapshot.all_interactions.len(),
            client_id
        );

        let mut rng = self.rng();
        let recommendations = engine::recommend(&snapshot.input(), limit, rng.as_mut());

        info!(
            "Selected {} recommendations for client {} via {} in {:.2?}",
            recommendations.items.len(),
            client_id,
            recommendations.strategy,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    fn fetch_snapshot(&self, client_id: &ClientId) -> Result<RequestSnapshot> {
        let history = self
            .source
            .fetch_interaction_history(client_id)
            .context("Failed to fetch interaction history")?;
        let products = self
            .source
            .fetch_catalog()
            .context("Failed to fetch catalog")?;
        let all_interactions = self
            .source
            .fetch_all_interactions()
            .context("Failed to fetch interaction log")?;
        let weights = self
            .source
            .fetch_weight_config()
            .context("Failed to fetch weight configuration")?;
        let profile = self
            .source
            .fetch_client_profile(client_id)
            .context("Failed to fetch client profile")?;

        Ok(RequestSnapshot {
            profile,
            history,
            products,
            all_interactions,
            weights,
        })
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::rng()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{ActionKind, CatalogIndex};

    fn build_test_index() -> Arc<CatalogIndex> {
        let mut index = CatalogIndex::new();
        index.insert_product(Product::new("A", "Toys")).unwrap();
        index.insert_product(Product::new("B", "Toys")).unwrap();
        index.insert_product(Product::new("C", "Books")).unwrap();
        index.insert_client(ClientProfile::new("fresh").with_interest("Toys"));
        index.insert_client(ClientProfile::new("regular"));
        index.insert_interaction(InteractionEvent::new("regular", "A", ActionKind::View, 1));
        index.insert_interaction(InteractionEvent::new("regular", "B", ActionKind::Purchase, 2));
        Arc::new(index)
    }

    #[test]
    fn test_cold_start_for_client_without_history() {
        let service = RecommendationService::new(build_test_index()).with_seed(9);
        let recs = service
            .get_scored_recommendations(&ClientId::from("fresh"), 10)
            .unwrap();
        assert_eq!(recs.strategy, "cold_start");
        let ids: Vec<&str> = recs.items.iter().map(|s| s.product.id.0.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_personalized_for_client_with_history() {
        let service = RecommendationService::new(build_test_index()).with_seed(9);
        let products = service
            .get_recommendations(&ClientId::from("regular"), 10)
            .unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_limit_is_respected() {
        let service = RecommendationService::new(build_test_index());
        let client = ClientId::from("regular");
        assert_eq!(service.get_recommendations(&client, 2).unwrap().len(), 2);
        assert!(service.get_recommendations(&client, 0).unwrap().is_empty());
    }

    #[test]
    fn test_seeded_service_is_reproducible() {
        let service = RecommendationService::new(build_test_index()).with_seed(1234);
        let client = ClientId::from("fresh");
        let first = service.get_scored_recommendations(&client, 10).unwrap();
        let second = service.get_scored_recommendations(&client, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_client_is_error() {
        let service = RecommendationService::new(build_test_index());
        let err = service
            .get_recommendations(&ClientId::from("ghost"), 5)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("client profile"));
    }
}
