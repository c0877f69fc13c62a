use crate::api::models::QueryResponse;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// How a session was established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Password,
    ClientId,
}

/// Authenticated connection context
#[derive(Clone)]
pub struct Session {
    pub org_url: String,
    pub token: String,
    pub method: AuthMethod,
    pub username: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

// Keep the token out of debug logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("org_url", &self.org_url)
            .field("token", &"<redacted>")
            .field("method", &self.method)
            .field("username", &self.username)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Remote content item with its layers in service order
#[derive(Debug, Clone)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub item_type: String,
    pub owner: Option<String>,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: i64,
    pub name: String,
    /// Full layer endpoint, e.g. `.../FeatureServer/0`
    pub url: String,
}

/// Entry shown by the layer picker
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOption {
    pub label: String,
    /// Position in the item's layer list
    pub index: usize,
}

pub type Row = IndexMap<String, Value>;

/// Attribute rows of one query, one column per returned field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTable {
    pub layer_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Server stopped at its record limit; rows are incomplete
    pub truncated: bool,
}

impl FeatureTable {
    pub fn from_query(layer_name: &str, response: QueryResponse) -> Self {
        let mut columns: Vec<String> = response.fields.iter().map(|f| f.name.clone()).collect();

        let rows: Vec<Row> = response
            .features
            .into_iter()
            .map(|feature| feature.attributes)
            .collect();

        if columns.is_empty() {
            for row in &rows {
                for key in row.keys() {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        Self {
            layer_name: layer_name.to_string(),
            columns,
            rows,
            truncated: response.exceeded_transfer_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row`/`column`; missing attributes read as null
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).map(|r| r.get(column).unwrap_or(&Value::Null))
    }

    pub fn column(&self, column: &str) -> Vec<&Value> {
        self.rows
            .iter()
            .map(|r| r.get(column).unwrap_or(&Value::Null))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Feature, Field};
    use serde_json::json;

    fn feature(pairs: &[(&str, Value)]) -> Feature {
        Feature {
            attributes: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_from_query_uses_declared_fields() {
        let response = QueryResponse {
            fields: ["a", "b", "c"]
                .iter()
                .map(|name| Field {
                    name: name.to_string(),
                    field_type: None,
                    alias: None,
                })
                .collect(),
            features: vec![
                feature(&[("c", json!(3)), ("a", json!(1)), ("b", json!("x"))]),
                feature(&[("a", json!(4)), ("b", json!(null)), ("c", json!(6))]),
            ],
            exceeded_transfer_limit: false,
        };

        let table = FeatureTable::from_query("Roads", response);
        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "b"), Some(&json!("x")));
        assert_eq!(table.value(1, "b"), Some(&Value::Null));
        assert_eq!(table.column("a"), vec![&json!(1), &json!(4)]);
        assert!(!table.truncated);
    }

    #[test]
    fn test_from_query_without_fields_collects_keys() {
        let response = QueryResponse {
            fields: vec![],
            features: vec![
                feature(&[("name", json!("Main St"))]),
                feature(&[("name", json!("Oak Ave")), ("lanes", json!(2))]),
            ],
            exceeded_transfer_limit: true,
        };

        let table = FeatureTable::from_query("Roads", response);
        assert_eq!(table.columns, vec!["name", "lanes"]);
        assert_eq!(table.value(0, "lanes"), Some(&Value::Null));
        assert_eq!(table.value(5, "lanes"), None);
        assert!(table.truncated);
    }

    #[test]
    fn test_empty_query() {
        let response = QueryResponse {
            fields: vec![],
            features: vec![],
            exceeded_transfer_limit: false,
        };
        let table = FeatureTable::from_query("Empty", response);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session {
            org_url: "https://acme.maps.arcgis.com".to_string(),
            token: "secret-token".to_string(),
            method: AuthMethod::Password,
            username: Some("alice".to_string()),
            expires_at: None,
        };
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("alice"));
        assert!(!session.is_expired_at(Utc::now()));
    }
}
