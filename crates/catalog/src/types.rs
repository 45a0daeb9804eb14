//! Core domain types for the shop snapshot.
//!
//! These are the values the recommendation engine consumes: products, the
//! interaction log, client profiles and the action weight table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Unique identifier for a product
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

/// Unique identifier for a client (a shop customer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the shop catalog.
///
/// Only `id`, `category` and `price` matter to the engine; the rest is carried
/// so callers can render what they get back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Free-form category tag, matched verbatim against client interests
    pub category: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl Product {
    /// Minimal product with an empty name and zero price.
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: ProductId(id.into()),
            name: String::new(),
            category: category.into(),
            price: Decimal::ZERO,
            description: None,
            sku: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }
}

// =============================================================================
// Interactions
// =============================================================================

/// Kind of interaction a client had with a product.
///
/// The wire form is the lowercase name used as the key in the weight table.
/// `Other` keeps an unrecognised kind from an imported log instead of
/// rejecting the whole file; nothing in this workspace produces one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    View,
    AddToCart,
    Review,
    Purchase,
    Other(String),
}

impl ActionKind {
    /// Name used on the wire and in [`WeightConfig`]
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::View => "view",
            ActionKind::AddToCart => "add_to_cart",
            ActionKind::Review => "review",
            ActionKind::Purchase => "purchase",
            ActionKind::Other(name) => name,
        }
    }
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "view" => ActionKind::View,
            "add_to_cart" => ActionKind::AddToCart,
            "review" => ActionKind::Review,
            "purchase" => ActionKind::Purchase,
            _ => ActionKind::Other(value),
        }
    }
}

impl From<ActionKind> for String {
    fn from(value: ActionKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the append-only interaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub action: ActionKind,
    /// Unix timestamp (seconds) when the interaction happened
    #[serde(default)]
    pub timestamp: i64,
}

impl InteractionEvent {
    pub fn new(
        client_id: impl Into<String>,
        product_id: impl Into<String>,
        action: ActionKind,
        timestamp: i64,
    ) -> Self {
        Self {
            client_id: ClientId(client_id.into()),
            product_id: ProductId(product_id.into()),
            action,
            timestamp,
        }
    }
}

// =============================================================================
// Client profile
// =============================================================================

/// Interests a client declared at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub client_id: ClientId,
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

impl ClientProfile {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: ClientId(client_id.into()),
            interests: BTreeSet::new(),
        }
    }

    pub fn with_interest(mut self, category: impl Into<String>) -> Self {
        self.interests.insert(category.into());
        self
    }

    pub fn is_interested_in(&self, category: &str) -> bool {
        self.interests.contains(category)
    }
}

// =============================================================================
// Weight configuration
// =============================================================================

/// Weight used for an action kind that is missing from the table
pub const FALLBACK_WEIGHT: f64 = 1.0;

/// Weight of each action kind in the global popularity score.
///
/// Built from the defaults with the admin override table merged on top:
/// keys the overrides don't mention keep their default, keys the defaults
/// don't know are kept as given. Deserializing a table goes through the same
/// merge, so a partial object keeps the defaults for every key it omits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeightConfig {
    weights: BTreeMap<String, f64>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        let weights = [
            ("view", 1.0),
            ("add_to_cart", 3.0),
            ("review", 4.0),
            ("purchase", 5.0),
        ]
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight))
        .collect();
        Self { weights }
    }
}

impl WeightConfig {
    /// Defaults with `overrides` merged on top
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Self {
        let mut config = Self::default();
        for (name, &weight) in overrides {
            config.set(name.clone(), weight);
        }
        config
    }

    /// Weight for an action kind, [`FALLBACK_WEIGHT`] if the table lacks it
    pub fn weight_for(&self, kind: &ActionKind) -> f64 {
        self.get(kind.as_str()).unwrap_or(FALLBACK_WEIGHT)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, weight: f64) {
        self.weights.insert(name.into(), weight);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(name, &weight)| (name.as_str(), weight))
    }
}

impl From<HashMap<String, f64>> for WeightConfig {
    fn from(overrides: HashMap<String, f64>) -> Self {
        Self::with_overrides(&overrides)
    }
}

impl From<WeightConfig> for BTreeMap<String, f64> {
    fn from(config: WeightConfig) -> Self {
        config.weights
    }
}

/// A weight is usable if it is finite and not negative.
pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_wire_names() {
        for kind in [
            ActionKind::View,
            ActionKind::AddToCart,
            ActionKind::Review,
            ActionKind::Purchase,
        ] {
            let name = String::from(kind.clone());
            assert_eq!(ActionKind::from(name), kind);
        }
        assert_eq!(
            ActionKind::from("wishlist".to_string()),
            ActionKind::Other("wishlist".to_string())
        );
    }

    #[test]
    fn test_partial_weight_table_keeps_defaults() {
        let weights: WeightConfig = serde_json::from_str(r#"{"purchase": 100.0}"#).unwrap();
        assert_eq!(weights.weight_for(&ActionKind::Purchase), 100.0);
        assert_eq!(weights.weight_for(&ActionKind::AddToCart), 3.0);
        assert_eq!(weights.weight_for(&ActionKind::Review), 4.0);
        assert_eq!(weights.weight_for(&ActionKind::View), 1.0);

        let empty: WeightConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, WeightConfig::default());

        let json = serde_json::to_string(&weights).unwrap();
        assert!(json.contains(r#""add_to_cart":3.0"#));
    }

    #[test]
    fn test_interaction_deserializes_unknown_kind() {
        let json = r#"{"client_id":"c1","product_id":"p1","action":"share","timestamp":5}"#;
        let event: InteractionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, ActionKind::Other("share".to_string()));
        assert_eq!(event.timestamp, 5);
    }

    #[test]
    fn test_default_weights() {
        let weights = WeightConfig::default();
        assert_eq!(weights.weight_for(&ActionKind::View), 1.0);
        assert_eq!(weights.weight_for(&ActionKind::AddToCart), 3.0);
        assert_eq!(weights.weight_for(&ActionKind::Review), 4.0);
        assert_eq!(weights.weight_for(&ActionKind::Purchase), 5.0);
        assert_eq!(weights.weight_for(&ActionKind::Other("share".into())), 1.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert("purchase".to_string(), 100.0);
        overrides.insert("share".to_string(), 0.5);

        let weights = WeightConfig::with_overrides(&overrides);
        assert_eq!(weights.get("purchase"), Some(100.0));
        assert_eq!(weights.get("view"), Some(1.0));
        assert_eq!(weights.weight_for(&ActionKind::Other("share".into())), 0.5);
    }

    #[test]
    fn test_weight_validity() {
        assert!(is_valid_weight(0.0));
        assert!(is_valid_weight(2.5));
        assert!(!is_valid_weight(-1.0));
        assert!(!is_valid_weight(f64::NAN));
        assert!(!is_valid_weight(f64::INFINITY));
    }

    #[test]
    fn test_product_price_accepts_numbers_and_strings() {
        let json = r#"[{"id":"a","name":"A","category":"Toys","price":12.5},
                       {"id":"b","name":"B","category":"Toys","price":"3.10"}]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(products[0].price, Decimal::new(125, 1));
        assert_eq!(products[1].price, Decimal::new(310, 2));
    }
}
