//! Global popularity scoring.
//!
//! ## Algorithm
//! 1. Every product starts at 0.0
//! 2. Each interaction with a catalog product adds the weight of its action
//!    kind (1.0 when the table has no entry for the kind)
//! 3. Scores are divided by the maximum when the maximum is positive
//!
//! The result lies in [0, 1] and the most-interacted product scores exactly
//! 1.0. An empty or irrelevant log leaves every score at 0.0.

use crate::types::ScoreMap;
use catalog::{InteractionEvent, Product, ProductId, WeightConfig};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Logs longer than this are accumulated on the rayon pool
const PARALLEL_THRESHOLD: usize = 16_384;

/// Compute the normalized popularity of every product in `products`.
#[instrument(skip_all, fields(products = products.len(), interactions = all_interactions.len()))]
pub fn compute_global_popularity(
    products: &[Product],
    all_interactions: &[InteractionEvent],
    weights: &WeightConfig,
) -> ScoreMap {
    let mut scores: ScoreMap = products.iter().map(|p| (p.id.clone(), 0.0)).collect();

    for (product_id, raw) in accumulate(&scores, all_interactions, weights) {
        if let Some(score) = scores.get_mut(product_id) {
            *score += raw;
        }
    }

    let max_score = scores.values().copied().fold(0.0_f64, f64::max);
    if max_score > 0.0 {
        for score in scores.values_mut() {
            *score /= max_score;
        }
    }

    debug!("Normalized popularity with max raw score {:.3}", max_score);
    scores
}

/// Sum weights per product, ignoring interactions outside the catalog
fn accumulate<'a>(
    scores: &ScoreMap,
    interactions: &'a [InteractionEvent],
    weights: &WeightConfig,
) -> HashMap<&'a ProductId, f64> {
    let add = |mut acc: HashMap<&'a ProductId, f64>, event: &'a InteractionEvent| {
        if scores.contains_key(&event.product_id) {
            *acc.entry(&event.product_id).or_insert(0.0) += weights.weight_for(&event.action);
        }
        acc
    };

    if interactions.len() < PARALLEL_THRESHOLD {
        return interactions.iter().fold(HashMap::new(), add);
    }

    interactions
        .par_iter()
        .fold(HashMap::new, add)
        .reduce(HashMap::new, |mut left, right| {
            for (id, value) in right {
                *left.entry(id).or_insert(0.0) += value;
            }
            left
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ActionKind;

    fn products() -> Vec<Product> {
        vec![
            Product::new("A", "Toys"),
            Product::new("B", "Toys"),
            Product::new("C", "Books"),
        ]
    }

    fn score(scores: &ScoreMap, id: &str) -> f64 {
        scores[&ProductId::from(id)]
    }

    #[test]
    fn test_empty_log_gives_all_zero() {
        let scores = compute_global_popularity(&products(), &[], &WeightConfig::default());
        assert_eq!(scores.len(), 3);
        assert!(scores.values().all(|&s| s == 0.0));
    }

    #[test]
    fn test_empty_catalog_gives_empty_map() {
        let log = vec![InteractionEvent::new("c1", "A", ActionKind::View, 0)];
        let scores = compute_global_popularity(&[], &log, &WeightConfig::default());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_view_and_purchase_scenario() {
        let log = vec![
            InteractionEvent::new("c1", "A", ActionKind::View, 0),
            InteractionEvent::new("c2", "B", ActionKind::Purchase, 1),
        ];
        let scores = compute_global_popularity(&products(), &log, &WeightConfig::default());

        assert!((score(&scores, "A") - 0.2).abs() < 1e-12);
        assert!((score(&scores, "B") - 1.0).abs() < 1e-12);
        assert_eq!(score(&scores, "C"), 0.0);
    }

    #[test]
    fn test_unknown_kind_counts_as_one() {
        let log = vec![
            InteractionEvent::new("c1", "A", ActionKind::Other("share".into()), 0),
            InteractionEvent::new("c1", "B", ActionKind::AddToCart, 0),
        ];
        let scores = compute_global_popularity(&products(), &log, &WeightConfig::default());
        assert!((score(&scores, "A") - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(score(&scores, "B"), 1.0);
    }

    #[test]
    fn test_interactions_outside_catalog_ignored() {
        let log = vec![
            InteractionEvent::new("c1", "Z", ActionKind::Purchase, 0),
            InteractionEvent::new("c1", "A", ActionKind::View, 0),
        ];
        let scores = compute_global_popularity(&products(), &log, &WeightConfig::default());
        assert_eq!(score(&scores, "A"), 1.0);
        assert!(!scores.contains_key(&ProductId::from("Z")));
    }

    #[test]
    fn test_zero_weights_leave_scores_at_zero() {
        let mut weights = WeightConfig::default();
        weights.set("view", 0.0);
        let log = vec![InteractionEvent::new("c1", "A", ActionKind::View, 0)];
        let scores = compute_global_popularity(&products(), &log, &weights);
        assert!(scores.values().all(|&s| s == 0.0));
    }

    #[test]
    fn test_purchase_weight_override_raises_purchased_product() {
        // A: one view + one purchase, B: one view only
        let log = vec![
            InteractionEvent::new("c1", "A", ActionKind::View, 0),
            InteractionEvent::new("c2", "A", ActionKind::Purchase, 0),
            InteractionEvent::new("c1", "B", ActionKind::View, 0),
        ];
        let default_scores = compute_global_popularity(&products(), &log, &WeightConfig::default());

        let mut boosted = WeightConfig::default();
        boosted.set("purchase", 100.0);
        let boosted_scores = compute_global_popularity(&products(), &log, &boosted);

        let default_gap = score(&default_scores, "A") - score(&default_scores, "B");
        let boosted_gap = score(&boosted_scores, "A") - score(&boosted_scores, "B");
        assert!(default_gap > 0.0);
        assert!(boosted_gap > default_gap);
    }

    #[test]
    fn test_large_log_matches_sequential_result() {
        let catalog: Vec<Product> = (0..50)
            .map(|i| Product::new(format!("p{}", i), "Any"))
            .collect();
        let log: Vec<InteractionEvent> = (0..PARALLEL_THRESHOLD * 2)
            .map(|i| {
                let kind = if i % 7 == 0 { ActionKind::Purchase } else { ActionKind::View };
                InteractionEvent::new("c", format!("p{}", i % 50), kind, i as i64)
            })
            .collect();

        let scores = compute_global_popularity(&catalog, &log, &WeightConfig::default());
        let max = scores.values().copied().fold(0.0_f64, f64::max);
        assert!((max - 1.0).abs() < 1e-12);
        assert!(scores.values().all(|&s| (0.0..=1.0).contains(&s)));
    }
}
