//! In-memory catalog store.
//!
//! [`CatalogIndex`] holds one shop snapshot: the product catalog in load
//! order, client profiles, the interaction log and the admin weight
//! overrides. Products and clients are fixed once built; the interaction log
//! and the weight overrides can change while the index is shared, so they
//! sit behind `RwLock`s.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Interaction log plus a per-client position index into it
#[derive(Debug, Default)]
struct InteractionLog {
    events: Vec<InteractionEvent>,
    by_client: HashMap<ClientId, Vec<usize>>,
}

impl InteractionLog {
    fn push(&mut self, event: InteractionEvent) {
        let position = self.events.len();
        self.by_client
            .entry(event.client_id.clone())
            .or_default()
            .push(position);
        self.events.push(event);
    }

    fn history(&self, client_id: &ClientId) -> Vec<InteractionEvent> {
        self.by_client
            .get(client_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| self.events[position].clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The shop snapshot the recommendation engine reads from.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    /// Catalog in load order; this order breaks ranking ties
    products: Vec<Product>,
    product_positions: HashMap<ProductId, usize>,
    /// Products grouped by category, in catalog order
    category_index: HashMap<String, Vec<ProductId>>,
    clients: HashMap<ClientId, ClientProfile>,
    interactions: RwLock<InteractionLog>,
    weight_overrides: RwLock<HashMap<String, f64>>,
}

// Poisoning is ignored: writers only push one event or swap the whole table.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl CatalogIndex {
    /// Creates a new, empty CatalogIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot directory.
    ///
    /// Steps:
    /// 1. Parse products, clients and interactions in parallel
    /// 2. Insert products and clients (rejecting duplicate ids and bad prices)
    /// 3. Append the interaction log
    /// 4. Validate references
    /// 5. Install weight overrides from weights.json, if present
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading shop snapshot from {}", data_dir.display());

        let products_path = data_dir.join("products.json");
        let clients_path = data_dir.join("clients.json");
        let interactions_path = data_dir.join("interactions.json");
        let weights_path = data_dir.join("weights.json");

        let ((products, clients), interactions) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_products(&products_path),
                    || parser::parse_clients(&clients_path),
                )
            },
            || parser::parse_interactions(&interactions_path),
        );
        let products = products?;
        let clients = clients?;
        let interactions = interactions?;
        let overrides = parser::parse_weight_overrides(&weights_path)?;

        info!(
            "Parsed {} products, {} clients, {} interactions",
            products.len(),
            clients.len(),
            interactions.len()
        );

        let mut index = CatalogIndex::new();
        for product in products {
            index.insert_product(product)?;
        }
        for client in clients {
            index.insert_new_client(client)?;
        }
        for event in interactions {
            index.insert_interaction(event);
        }
        index.validate()?;
        index.replace_weight_overrides(overrides);

        info!("Shop snapshot loaded and validated");
        Ok(index)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Full catalog in load order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get_product(&self, id: &ProductId) -> Option<&Product> {
        self.product_positions
            .get(id)
            .map(|&position| &self.products[position])
    }

    /// All products tagged with `category`, in catalog order
    pub fn get_products_by_category(&self, category: &str) -> &[ProductId] {
        self.category_index
            .get(category)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_client(&self, id: &ClientId) -> Option<&ClientProfile> {
        self.clients.get(id)
    }

    /// Client ids in sorted order
    pub fn client_ids(&self) -> Vec<ClientId> {
        let mut ids: Vec<ClientId> = self.clients.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of one client's interactions, oldest first
    pub fn client_history(&self, client_id: &ClientId) -> Vec<InteractionEvent> {
        read(&self.interactions).history(client_id)
    }

    /// Snapshot of the whole interaction log
    pub fn all_interactions(&self) -> Vec<InteractionEvent> {
        read(&self.interactions).events.clone()
    }

    /// Products in the same category as `product_id`, excluding it.
    ///
    /// Unknown products have no similar products.
    pub fn similar_products(&self, product_id: &ProductId, limit: usize) -> Vec<&Product> {
        let Some(product) = self.get_product(product_id) else {
            return Vec::new();
        };
        self.get_products_by_category(&product.category)
            .iter()
            .filter(|id| *id != product_id)
            .filter_map(|id| self.get_product(id))
            .take(limit)
            .collect()
    }

    /// Current raw override table (without defaults merged in)
    pub fn weight_overrides(&self) -> HashMap<String, f64> {
        read(&self.weight_overrides).clone()
    }

    /// Defaults with the current overrides merged on top
    pub fn resolved_weights(&self) -> WeightConfig {
        WeightConfig::with_overrides(&read(&self.weight_overrides))
    }

    /// Get counts for debugging/validation: (products, clients, interactions)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.products.len(),
            self.clients.len(),
            read(&self.interactions).events.len(),
        )
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Add a product to the end of the catalog
    pub fn insert_product(&mut self, product: Product) -> Result<()> {
        if self.product_positions.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id.0));
        }
        if product.price < Decimal::ZERO {
            return Err(CatalogError::InvalidValue {
                field: format!("price of product {}", product.id),
                value: product.price.to_string(),
            });
        }
        self.category_index
            .entry(product.category.clone())
            .or_default()
            .push(product.id.clone());
        self.product_positions
            .insert(product.id.clone(), self.products.len());
        self.products.push(product);
        Ok(())
    }

    /// Add a client profile, rejecting an id that is already taken
    pub fn insert_new_client(&mut self, profile: ClientProfile) -> Result<()> {
        if self.clients.contains_key(&profile.client_id) {
            return Err(CatalogError::DuplicateClient(profile.client_id.0));
        }
        self.insert_client(profile);
        Ok(())
    }

    /// Insert or replace a client profile
    pub fn insert_client(&mut self, profile: ClientProfile) {
        self.clients.insert(profile.client_id.clone(), profile);
    }

    /// Append an event without checking its references
    pub fn insert_interaction(&self, event: InteractionEvent) {
        write(&self.interactions).push(event);
    }

    /// Append an event recorded by the shop, rejecting dangling references
    pub fn record_interaction(&self, event: InteractionEvent) -> Result<()> {
        self.check_references(&event)?;
        debug!(
            "Recording {} of {} by {}",
            event.action, event.product_id, event.client_id
        );
        self.insert_interaction(event);
        Ok(())
    }

    /// Replace the weight overrides from an admin-supplied JSON object.
    ///
    /// On any error the current overrides are left untouched.
    pub fn update_weights_json(&self, json: &str) -> Result<()> {
        match parser::parse_weight_overrides_str(json, "weight update") {
            Ok(overrides) => {
                info!("Updating {} algorithm weight overrides", overrides.len());
                self.replace_weight_overrides(overrides);
                Ok(())
            }
            Err(e) => {
                warn!("Rejected weight update: {}", e);
                Err(e)
            }
        }
    }

    pub fn replace_weight_overrides(&self, overrides: HashMap<String, f64>) {
        *write(&self.weight_overrides) = overrides;
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Check that every logged interaction references a known client and product
    pub fn validate(&self) -> Result<()> {
        for event in &read(&self.interactions).events {
            self.check_references(event)?;
        }
        Ok(())
    }

    fn check_references(&self, event: &InteractionEvent) -> Result<()> {
        if !self.clients.contains_key(&event.client_id) {
            return Err(CatalogError::MissingReference {
                entity: "Client".to_string(),
                id: event.client_id.0.clone(),
            });
        }
        if !self.product_positions.contains_key(&event.product_id) {
            return Err(CatalogError::MissingReference {
                entity: "Product".to_string(),
                id: event.product_id.0.clone(),
            });
        }
        Ok(())
    }
}
