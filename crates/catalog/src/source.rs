//! The data layer seen by the recommendation engine.
//!
//! The engine never reaches into storage itself. Everything it needs for one
//! request is fetched through a [`DataSource`] up front, so the strategies
//! work on plain snapshots and stay testable without a live store.

use crate::error::{CatalogError, Result};
use crate::index::CatalogIndex;
use crate::types::*;

/// Read access to the shop data a recommendation request needs.
///
/// `Send + Sync` so one source can serve concurrent requests.
pub trait DataSource: Send + Sync {
    /// Whole catalog; its order is the tie-break order for ranking
    fn fetch_catalog(&self) -> Result<Vec<Product>>;

    /// Interactions of this client only
    fn fetch_interaction_history(&self, client_id: &ClientId) -> Result<Vec<InteractionEvent>>;

    /// Interactions of every client (used for popularity)
    fn fetch_all_interactions(&self) -> Result<Vec<InteractionEvent>>;

    /// Current weight table, defaults merged with any overrides.
    ///
    /// Called once per request so admin changes apply to the next one.
    fn fetch_weight_config(&self) -> Result<WeightConfig>;

    /// Declared interests of this client
    fn fetch_client_profile(&self, client_id: &ClientId) -> Result<ClientProfile>;
}

impl DataSource for CatalogIndex {
    fn fetch_catalog(&self) -> Result<Vec<Product>> {
        Ok(self.products().to_vec())
    }

    fn fetch_interaction_history(&self, client_id: &ClientId) -> Result<Vec<InteractionEvent>> {
        Ok(self.client_history(client_id))
    }

    fn fetch_all_interactions(&self) -> Result<Vec<InteractionEvent>> {
        Ok(self.all_interactions())
    }

    fn fetch_weight_config(&self) -> Result<WeightConfig> {
        Ok(self.resolved_weights())
    }

    fn fetch_client_profile(&self, client_id: &ClientId) -> Result<ClientProfile> {
        self.get_client(client_id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownClient(client_id.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_as_data_source() {
        let mut index = CatalogIndex::new();
        index.insert_product(Product::new("a", "Toys")).unwrap();
        index.insert_client(ClientProfile::new("alice").with_interest("Toys"));
        index.insert_interaction(InteractionEvent::new("alice", "a", ActionKind::View, 1));

        let source: &dyn DataSource = &index;
        assert_eq!(source.fetch_catalog().unwrap().len(), 1);
        assert_eq!(
            source
                .fetch_interaction_history(&ClientId::from("alice"))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(source.fetch_all_interactions().unwrap().len(), 1);
        assert_eq!(source.fetch_weight_config().unwrap(), WeightConfig::default());

        let profile = source.fetch_client_profile(&ClientId::from("alice")).unwrap();
        assert!(profile.is_interested_in("Toys"));
    }

    #[test]
    fn test_unknown_client_profile_is_error() {
        let index = CatalogIndex::new();
        let result = index.fetch_client_profile(&ClientId::from("ghost"));
        assert!(matches!(result, Err(CatalogError::UnknownClient(id)) if id == "ghost"));
    }

    #[test]
    fn test_weight_config_is_reread_each_fetch() {
        let index = CatalogIndex::new();
        assert_eq!(index.fetch_weight_config().unwrap().get("purchase"), Some(5.0));

        index.update_weights_json(r#"{"purchase": 100.0}"#).unwrap();
        assert_eq!(index.fetch_weight_config().unwrap().get("purchase"), Some(100.0));
    }
}
