//! Turning a ScoreMap into the final product list.

use crate::types::{ScoreMap, ScoredProduct};
use catalog::Product;

/// Sort `products` by score, highest first, and keep the first `limit`.
///
/// The sort is stable, so equal scores keep catalog order. A product with no
/// entry in `scores` ranks as 0.0.
pub fn rank(products: Vec<Product>, scores: &ScoreMap, limit: usize) -> Vec<ScoredProduct> {
    let mut scored: Vec<ScoredProduct> = products
        .into_iter()
        .map(|product| {
            let score = scores.get(&product.id).copied().unwrap_or(0.0);
            ScoredProduct { product, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ProductId;

    fn catalog() -> Vec<Product> {
        ["p1", "p2", "p3", "p4", "p5"]
            .into_iter()
            .map(|id| Product::new(id, "Any"))
            .collect()
    }

    fn scores(values: &[(&str, f64)]) -> ScoreMap {
        values
            .iter()
            .map(|&(id, score)| (ProductId::from(id), score))
            .collect()
    }

    fn ids(ranked: &[ScoredProduct]) -> Vec<&str> {
        ranked.iter().map(|s| s.product.id.0.as_str()).collect()
    }

    #[test]
    fn test_rank_sorts_by_score_descending() {
        let map = scores(&[("p1", 0.2), ("p2", 0.9), ("p3", 0.5), ("p4", -1.0), ("p5", 0.1)]);
        let ranked = rank(catalog(), &map, 10);
        assert_eq!(ids(&ranked), vec!["p2", "p3", "p1", "p5", "p4"]);
        assert_eq!(ranked[0].score, 0.9);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let map = scores(&[("p1", 0.1), ("p2", 0.2), ("p3", 0.3), ("p4", 0.4), ("p5", 0.5)]);
        let ranked = rank(catalog(), &map, 3);
        assert_eq!(ids(&ranked), vec!["p5", "p4", "p3"]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let map = scores(&[("p1", 0.5), ("p2", 0.7), ("p3", 0.5), ("p4", 0.5), ("p5", 0.7)]);
        let ranked = rank(catalog(), &map, 10);
        assert_eq!(ids(&ranked), vec!["p2", "p5", "p1", "p3", "p4"]);
    }

    #[test]
    fn test_missing_scores_rank_as_zero() {
        let map = scores(&[("p3", 0.4), ("p4", -1.0)]);
        let ranked = rank(catalog(), &map, 10);
        assert_eq!(ids(&ranked), vec!["p3", "p1", "p2", "p5", "p4"]);
    }

    #[test]
    fn test_rank_handles_empty_input_and_zero_limit() {
        assert!(rank(Vec::new(), &ScoreMap::new(), 10).is_empty());
        assert!(rank(catalog(), &ScoreMap::new(), 0).is_empty());
    }
}
