//! Parser for the shop snapshot files.
//!
//! A snapshot directory holds plain JSON exports of the shop tables:
//! - products.json: array of products
//! - clients.json: array of client profiles (id + declared interests)
//! - interactions.json: array of interaction events
//! - weights.json (optional): object mapping action name to weight

use crate::error::{CatalogError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read a JSON file into `T`, tagging parse errors with the file name
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    parse_json(&content, &file_label(path))
}

fn parse_json<T: DeserializeOwned>(content: &str, file: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|source| CatalogError::ParseError {
        file: file.to_string(),
        source,
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the products.json file
pub fn parse_products(path: &Path) -> Result<Vec<Product>> {
    read_json(path)
}

/// Parse the clients.json file
pub fn parse_clients(path: &Path) -> Result<Vec<ClientProfile>> {
    read_json(path)
}

/// Parse the interactions.json file
pub fn parse_interactions(path: &Path) -> Result<Vec<InteractionEvent>> {
    read_json(path)
}

/// Parse the optional weights.json file.
///
/// A missing file means "no overrides", not an error.
pub fn parse_weight_overrides(path: &Path) -> Result<HashMap<String, f64>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    parse_weight_overrides_str(&content, &file_label(path))
}

/// Parse and validate a weight override object.
///
/// Shared by snapshot loading and the admin update path so both reject the
/// same inputs.
pub fn parse_weight_overrides_str(content: &str, file: &str) -> Result<HashMap<String, f64>> {
    let overrides: HashMap<String, f64> = parse_json(content, file)?;
    for (name, &weight) in &overrides {
        if !is_valid_weight(weight) {
            return Err(CatalogError::InvalidValue {
                field: format!("weight '{}'", name),
                value: weight.to_string(),
            });
        }
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_overrides_str() {
        let overrides =
            parse_weight_overrides_str(r#"{"purchase": 10, "view": 0.5}"#, "weights.json").unwrap();
        assert_eq!(overrides.get("purchase"), Some(&10.0));
        assert_eq!(overrides.get("view"), Some(&0.5));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = parse_weight_overrides_str(r#"{"view": -2.0}"#, "weights.json");
        assert!(matches!(result, Err(CatalogError::InvalidValue { .. })));
    }

    #[test]
    fn test_malformed_json_reports_file() {
        let result = parse_weight_overrides_str("{not json", "weights.json");
        match result {
            Err(CatalogError::ParseError { file, .. }) => assert_eq!(file, "weights.json"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_weights_file_is_empty() {
        let overrides = parse_weight_overrides(Path::new("does/not/exist.json")).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_missing_products_file_is_error() {
        let result = parse_products(Path::new("does/not/products.json"));
        assert!(matches!(result, Err(CatalogError::FileNotFound { .. })));
    }
}
