//! # Recommender Crate
//!
//! Wires the catalog store to the engine.
//!
//! ## Flow
//!
//! ```text
//! get_recommendations(client, limit)
//!     ├─ fetch history, catalog, log, weights, profile   (DataSource)
//!     ├─ Strategy::select(history)                       (engine)
//!     ├─ analyze → ScoreMap                              (engine)
//!     └─ rank → top `limit` products                     (engine)
//! ```
//!
//! [`RecommenderConfig`] carries the caller-side policies (default limit,
//! listing and similar-products limits, noise seed, log filter).

pub mod config;
pub mod service;

pub use config::{ConfigError, RecommenderConfig};
pub use service::RecommendationService;
