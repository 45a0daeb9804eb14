//! Strategy for clients without any recorded interaction.
//!
//! Nothing is known about the client except the interests declared at
//! sign-up, so the ranking is global popularity nudged towards those
//! categories.
//!
//! ## Algorithm
//! 1. Seed every product with its global popularity
//! 2. Add a flat bonus to products in a declared interest category
//! 3. Add uniform noise in [0, noise) so repeated visits don't see a frozen list

use crate::popularity::compute_global_popularity;
use crate::traits::AnalysisStrategy;
use crate::types::{AnalysisInput, ScoreMap};
use rand::{Rng, RngCore};
use tracing::{debug, instrument};

/// Popularity plus declared interests, for cold-start clients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColdStartStrategy {
    /// Added to products in an interest category
    interest_bonus: f64,
    /// Upper bound (exclusive) of the per-product noise
    noise: f64,
}

impl Default for ColdStartStrategy {
    fn default() -> Self {
        Self {
            interest_bonus: 0.5,
            noise: 0.05,
        }
    }
}

impl ColdStartStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the interest bonus (default: 0.5)
    pub fn with_interest_bonus(mut self, bonus: f64) -> Self {
        self.interest_bonus = bonus;
        self
    }

    /// Configure the noise amplitude (default: 0.05)
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }
}

impl AnalysisStrategy for ColdStartStrategy {
    fn name(&self) -> &'static str {
        "cold_start"
    }

    #[instrument(skip_all, fields(client_id = %input.profile.client_id))]
    fn analyze(&self, input: &AnalysisInput<'_>, rng: &mut dyn RngCore) -> ScoreMap {
        let mut scores =
            compute_global_popularity(input.products, input.all_interactions, input.weights);

        // Catalog order, so a seeded rng gives every product the same draw
        let mut boosted = 0;
        for product in input.products {
            let Some(score) = scores.get_mut(&product.id) else {
                continue;
            };
            if input.profile.is_interested_in(&product.category) {
                *score += self.interest_bonus;
                boosted += 1;
            }
            *score += rng.random::<f64>() * self.noise;
        }

        debug!(
            "Cold-start scored {} products ({} matched declared interests)",
            scores.len(),
            boosted
        );
        scores
    }
}
