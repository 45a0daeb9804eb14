//! Core trait for scoring strategies.

use crate::types::{AnalysisInput, ScoreMap};
use rand::RngCore;

/// Turns one client's inputs into a score for every catalog product.
///
/// ## Design Note
/// - `Send + Sync` so a strategy can be shared across request threads
/// - The random source is passed in, never owned, so tests can seed it
/// - Implementations must return an entry for every product in
///   `input.products`
pub trait AnalysisStrategy: Send + Sync {
    /// Returns the name of this strategy (for logging/explanations)
    fn name(&self) -> &'static str;

    /// Score every product for the client described by `input`.
    fn analyze(&self, input: &AnalysisInput<'_>, rng: &mut dyn RngCore) -> ScoreMap;
}
