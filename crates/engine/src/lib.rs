//! # Engine Crate
//!
//! The product recommendation engine: pure functions from one client's
//! already-fetched inputs to a ranked product list.
//!
//! ## Components
//!
//! ### Popularity Scorer
//! Catalog-wide popularity from every client's interactions, weighted per
//! action kind and normalized to [0, 1].
//!
//! ### Cold-Start Strategy
//! For clients without history: popularity, a bonus for declared interests,
//! and a little noise.
//!
//! ### Personalized Strategy
//! For clients with history: category affinity dominates, popularity ranks
//! inside a category, already-purchased products sink to -1.0.
//!
//! ### Selection and Ranking
//! [`Strategy::select`] picks one of the two from the history, [`rank`]
//! stable-sorts the catalog by score and keeps the top N.
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{recommend, AnalysisInput};
//!
//! let input = AnalysisInput {
//!     profile: &profile,
//!     history: &history,
//!     products: &products,
//!     all_interactions: &log,
//!     weights: &weights,
//! };
//! let ranked = recommend(&input, 6, &mut rand::rng());
//! ```
//!
//! Nothing here touches storage or holds state between calls; the random
//! source is always injected.

pub mod types;
pub mod traits;
pub mod popularity;
pub mod strategies;
pub mod ranking;

// Re-export main types
pub use popularity::compute_global_popularity;
pub use ranking::rank;
pub use strategies::{ColdStartStrategy, PersonalizedStrategy, Strategy, PURCHASED_SCORE};
pub use traits::AnalysisStrategy;
pub use types::{AnalysisInput, ScoreMap, ScoredProduct};

use rand::RngCore;
use tracing::debug;

/// Ranked result of one recommendation run
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// Name of the strategy that produced the scores
    pub strategy: &'static str,
    pub items: Vec<ScoredProduct>,
}

/// Select a strategy, score every product and keep the top `limit`.
pub fn recommend(
    input: &AnalysisInput<'_>,
    limit: usize,
    rng: &mut dyn RngCore,
) -> Recommendations {
    let strategy = Strategy::select(input.history);
    let scores = strategy.analyze(input, rng);
    let items = rank(input.products.to_vec(), &scores, limit);
    debug!(
        "Strategy {} ranked {} of {} products",
        strategy.name(),
        items.len(),
        input.products.len()
    );
    Recommendations {
        strategy: strategy.name(),
        items,
    }
}
