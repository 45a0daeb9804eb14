//! Types shared by the scorer, the strategies and ranking.

use catalog::{ClientProfile, InteractionEvent, Product, ProductId, WeightConfig};
use std::collections::HashMap;

/// Score per product id; rebuilt for every request, never persisted.
///
/// Only the relative order of the values means anything.
pub type ScoreMap = HashMap<ProductId, f64>;

/// Everything a strategy needs for one request, already fetched.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub profile: &'a ClientProfile,
    /// This client's interactions
    pub history: &'a [InteractionEvent],
    pub products: &'a [Product],
    /// Interactions of every client
    pub all_interactions: &'a [InteractionEvent],
    /// Weight table resolved for this request
    pub weights: &'a WeightConfig,
}

/// A product with the score it was ranked by
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: f64,
}
