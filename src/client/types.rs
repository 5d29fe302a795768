//! Admin API wire types and the per-pass name lookup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// A collection as the server reports it. Field definitions stay raw so they can be
/// pushed back exactly as received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteCollection {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, alias = "fields")]
    pub schema: Vec<Value>,
}

impl RemoteCollection {
    pub fn field_names(&self) -> HashSet<&str> {
        self.schema
            .iter()
            .filter_map(|f| f.get("name").and_then(Value::as_str))
            .collect()
    }

    /// Declared type of the remote field called `name`.
    pub fn field_type(&self, name: &str) -> Option<&str> {
        self.schema
            .iter()
            .find(|f| f.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|f| f.get("type"))
            .and_then(Value::as_str)
    }
}

/// One page of `GET /api/collections`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub items: Vec<RemoteCollection>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Server error envelope: `{ "code": 400, "message": "...", "data": { ... } }`.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Name → collection lookup, rebuilt from every listing and kept current with write responses.
#[derive(Clone, Debug, Default)]
pub struct RemoteIndex {
    by_name: HashMap<String, RemoteCollection>,
}

impl RemoteIndex {
    pub fn new(collections: Vec<RemoteCollection>) -> Self {
        RemoteIndex {
            by_name: collections.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RemoteCollection> {
        self.by_name.get(name)
    }

    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|c| c.id.as_str())
    }

    /// Insert or replace by name.
    pub fn upsert(&mut self, collection: RemoteCollection) {
        self.by_name.insert(collection.name.clone(), collection);
    }
}
