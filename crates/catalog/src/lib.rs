//! # Catalog Crate
//!
//! This crate is the data layer behind the recommendation engine: it loads a
//! shop snapshot (products, clients, interaction log, weight overrides) and
//! serves it through the [`DataSource`] trait.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Product, InteractionEvent, ClientProfile, WeightConfig)
//! - **parser**: Parse the JSON snapshot files
//! - **index**: The in-memory [`CatalogIndex`] store
//! - **source**: The [`DataSource`] trait the engine's caller fetches from
//! - **error**: Error types for loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogIndex, ClientId, DataSource};
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_dir(Path::new("data/demo"))?;
//! let history = index.fetch_interaction_history(&ClientId::from("alice"))?;
//! println!("alice has {} interactions", history.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod source;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use index::CatalogIndex;
pub use source::DataSource;
pub use types::{
    // Identifiers
    ClientId,
    ProductId,
    // Core types
    ActionKind,
    ClientProfile,
    InteractionEvent,
    Product,
    WeightConfig,
    FALLBACK_WEIGHT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_index_creation() {
        let index = CatalogIndex::new();
        let (products, clients, interactions) = index.counts();

        assert_eq!(products, 0);
        assert_eq!(clients, 0);
        assert_eq!(interactions, 0);
    }

    #[test]
    fn test_empty_queries() {
        let index = CatalogIndex::new();

        assert!(index.get_product(&ProductId::from("p")).is_none());
        assert!(index.get_client(&ClientId::from("c")).is_none());
        assert!(index.client_history(&ClientId::from("c")).is_empty());
        assert!(index.get_products_by_category("Toys").is_empty());
        assert!(index.products().is_empty());
    }
}
