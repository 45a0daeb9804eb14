//! Strategy for clients with interaction history.
//!
//! Content-based category affinity combined with global popularity, so that
//! inside a liked category the better-performing products come first.
//!
//! ## Algorithm
//! 1. Build a category affinity accumulator:
//!    - +2.0 for each declared interest
//!    - per history event on a catalog product: VIEW 1.0, ADD_TO_CART 2.5,
//!      PURCHASE 5.0, anything else 0.0
//! 2. Normalize the accumulator to sum to 1 (unless it sums to 0)
//! 3. Compute global popularity
//! 4. Purchased products score exactly -1.0; every other product scores
//!    `affinity[category] * 5.0 + popularity + noise`

use crate::popularity::compute_global_popularity;
use crate::traits::AnalysisStrategy;
use crate::types::{AnalysisInput, ScoreMap};
use catalog::{ActionKind, ClientProfile, InteractionEvent, Product, ProductId};
use rand::{Rng, RngCore};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Score given to products the client already bought
pub const PURCHASED_SCORE: f64 = -1.0;

const DECLARED_INTEREST_WEIGHT: f64 = 2.0;

/// Weight of one history event towards its product's category
fn affinity_weight(kind: &ActionKind) -> f64 {
    match kind {
        ActionKind::View => 1.0,
        ActionKind::AddToCart => 2.5,
        ActionKind::Purchase => 5.0,
        ActionKind::Review | ActionKind::Other(_) => 0.0,
    }
}

/// Per-category preference of one client, plus what they already own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryAffinity {
    pub categories: HashMap<String, f64>,
    pub purchased: HashSet<ProductId>,
}

impl CategoryAffinity {
    /// Accumulate raw (unnormalized) affinity from interests and history.
    ///
    /// History events for products missing from `products` are skipped
    /// entirely, including for the purchased set.
    pub fn accumulate(
        profile: &ClientProfile,
        history: &[InteractionEvent],
        products: &[Product],
    ) -> Self {
        let categories_by_product: HashMap<&ProductId, &str> = products
            .iter()
            .map(|p| (&p.id, p.category.as_str()))
            .collect();

        let mut affinity = Self::default();
        for interest in &profile.interests {
            *affinity.categories.entry(interest.clone()).or_insert(0.0) +=
                DECLARED_INTEREST_WEIGHT;
        }

        for event in history {
            let Some(&category) = categories_by_product.get(&event.product_id) else {
                continue;
            };
            if event.action == ActionKind::Purchase {
                affinity.purchased.insert(event.product_id.clone());
            }
            *affinity.categories.entry(category.to_string()).or_insert(0.0) +=
                affinity_weight(&event.action);
        }
        affinity
    }

    /// Scale the categories to sum to 1; an all-zero accumulator is kept.
    pub fn normalize(&mut self) {
        let total: f64 = self.categories.values().sum();
        if total > 0.0 {
            for value in self.categories.values_mut() {
                *value /= total;
            }
        }
    }

    pub fn get(&self, category: &str) -> f64 {
        self.categories.get(category).copied().unwrap_or(0.0)
    }
}

/// Category affinity plus popularity, for clients with history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalizedStrategy {
    /// Multiplier on the normalized category affinity
    affinity_scale: f64,
    /// Upper bound (exclusive) of the per-product noise
    noise: f64,
}

impl Default for PersonalizedStrategy {
    fn default() -> Self {
        Self {
            affinity_scale: 5.0,
            noise: 0.01,
        }
    }
}

impl PersonalizedStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the affinity multiplier (default: 5.0)
    pub fn with_affinity_scale(mut self, scale: f64) -> Self {
        self.affinity_scale = scale;
        self
    }

    /// Configure the noise amplitude (default: 0.01)
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }
}

impl AnalysisStrategy for PersonalizedStrategy {
    fn name(&self) -> &'static str {
        "personalized"
    }

    #[instrument(skip_all, fields(client_id = %input.profile.client_id, history = input.history.len()))]
    fn analyze(&self, input: &AnalysisInput<'_>, rng: &mut dyn RngCore) -> ScoreMap {
        let mut affinity = CategoryAffinity::accumulate(input.profile, input.history, input.products);
        affinity.normalize();

        let popularity =
            compute_global_popularity(input.products, input.all_interactions, input.weights);

        let mut scores = ScoreMap::with_capacity(input.products.len());
        for product in input.products {
            if affinity.purchased.contains(&product.id) {
                scores.insert(product.id.clone(), PURCHASED_SCORE);
                continue;
            }
            let relevance = affinity.get(&product.category) * self.affinity_scale;
            let quality = popularity.get(&product.id).copied().unwrap_or(0.0);
            let noise = rng.random::<f64>() * self.noise;
            scores.insert(product.id.clone(), relevance + quality + noise);
        }

        debug!(
            "Personalized scored {} products across {} categories, {} already purchased",
            scores.len(),
            affinity.categories.len(),
            affinity.purchased.len()
        );
        scores
    }
}
