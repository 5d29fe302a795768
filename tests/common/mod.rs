//! In-memory admin API with failure injection and a call log.

#![allow(dead_code)]

use async_trait::async_trait;
use schema_provisioner::client::{AdminApi, CollectionPage, RemoteCollection};
use schema_provisioner::ApiError;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    List { page: u32 },
    Create { name: String },
    UpdateSchema { name: String },
    UpdateRules { name: String },
}

#[derive(Default)]
struct State {
    collections: Vec<RemoteCollection>,
    rules: HashMap<String, Value>,
    next_id: u64,
    page_size: u32,
    fail_listing: bool,
    list_calls_allowed: Option<usize>,
    list_calls: usize,
    reject_create: HashSet<String>,
    reject_schema: HashSet<String>,
    reject_rules: HashSet<String>,
    calls: Vec<Call>,
}

pub struct MemoryAdmin {
    state: Mutex<State>,
}

impl MemoryAdmin {
    pub fn new() -> Self {
        MemoryAdmin {
            state: Mutex::new(State {
                page_size: 2,
                ..State::default()
            }),
        }
    }

    /// Seed a remote collection with the given field names, all of type text unless given as `name:type`.
    pub fn with_collection(self, name: &str, kind: &str, fields: &[&str]) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            s.next_id += 1;
            let id = format!("seed{}", s.next_id);
            let schema = fields
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    let (fname, ftype) = f.split_once(':').unwrap_or((*f, "text"));
                    json!({"id": format!("{}_f{}", id, i), "system": false, "name": fname, "type": ftype, "required": false, "options": {}})
                })
                .collect();
            s.collections.push(RemoteCollection {
                id,
                name: name.to_string(),
                kind: kind.to_string(),
                schema,
            });
        }
        self
    }

    pub fn with_rules(self, name: &str, rules: Value) -> Self {
        self.state.lock().unwrap().rules.insert(name.to_string(), rules);
        self
    }

    pub fn reject_create(&self, name: &str) {
        self.state.lock().unwrap().reject_create.insert(name.to_string());
    }

    pub fn reject_schema_update(&self, name: &str) {
        self.state.lock().unwrap().reject_schema.insert(name.to_string());
    }

    pub fn reject_rules(&self, name: &str) {
        self.state.lock().unwrap().reject_rules.insert(name.to_string());
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    /// Serve the first `pages` list calls, then fail every later one.
    pub fn fail_listing_after(&self, pages: usize) {
        self.state.lock().unwrap().list_calls_allowed = Some(pages);
    }

    pub fn collection(&self, name: &str) -> Option<RemoteCollection> {
        self.state.lock().unwrap().collections.iter().find(|c| c.name == name).cloned()
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.state.lock().unwrap().collections.iter().map(|c| c.name.clone()).collect()
    }

    pub fn field_names(&self, name: &str) -> Vec<String> {
        self.collection(name)
            .map(|c| {
                c.schema
                    .iter()
                    .filter_map(|f| f["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn rules_of(&self, name: &str) -> Option<Value> {
        self.state.lock().unwrap().rules.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !matches!(c, Call::List { .. })).collect()
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Status {
        status: 400,
        message: message.to_string(),
        data: Some(json!({"name": {"code": "validation_failed", "message": "simulated rejection"}})),
    }
}

/// New relation fields must point at an existing collection id, as the real server enforces.
/// Fields that already carry an id were stored earlier and are not re-checked.
fn check_relations(collections: &[RemoteCollection], schema: &[Value]) -> Result<(), ApiError> {
    for f in schema {
        if f["type"] == "relation" && f.get("id").is_none() {
            let target = f["options"]["collectionId"].as_str().unwrap_or_default();
            if !collections.iter().any(|c| c.id == target) {
                return Err(rejected("Failed to load the collection."));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl AdminApi for MemoryAdmin {
    async fn list_collections(&self, page: u32, _per_page: u32) -> Result<CollectionPage, ApiError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(Call::List { page });
        s.list_calls += 1;
        let exhausted = s.list_calls_allowed.is_some_and(|n| s.list_calls > n);
        if s.fail_listing || exhausted {
            return Err(ApiError::status(502, "bad gateway"));
        }
        let size = s.page_size as usize;
        let total = s.collections.len();
        let total_pages = ((total + size - 1) / size).max(1) as u32;
        let items = s
            .collections
            .iter()
            .skip((page as usize - 1) * size)
            .take(size)
            .cloned()
            .collect();
        Ok(CollectionPage {
            page,
            per_page: s.page_size,
            total_items: total as u64,
            total_pages,
            items,
        })
    }

    async fn create_collection(&self, body: &Value) -> Result<RemoteCollection, ApiError> {
        let mut s = self.state.lock().unwrap();
        let name = body["name"].as_str().unwrap_or_default().to_string();
        s.calls.push(Call::Create { name: name.clone() });
        if s.reject_create.contains(&name) || s.collections.iter().any(|c| c.name == name) {
            return Err(rejected("Failed to create record."));
        }
        let schema = body["schema"].as_array().cloned().unwrap_or_default();
        check_relations(&s.collections, &schema)?;
        s.next_id += 1;
        let created = RemoteCollection {
            id: format!("col{}", s.next_id),
            name,
            kind: body["type"].as_str().unwrap_or("base").to_string(),
            schema,
        };
        s.collections.push(created.clone());
        Ok(created)
    }

    async fn update_collection(&self, id: &str, body: &Value) -> Result<RemoteCollection, ApiError> {
        let mut s = self.state.lock().unwrap();
        let Some(pos) = s.collections.iter().position(|c| c.id == id) else {
            return Err(ApiError::status(404, "The requested resource wasn't found."));
        };
        let name = s.collections[pos].name.clone();

        if let Some(schema) = body.get("schema").and_then(Value::as_array) {
            s.calls.push(Call::UpdateSchema { name: name.clone() });
            if s.reject_schema.contains(&name) {
                return Err(rejected("Failed to update record."));
            }
            check_relations(&s.collections, schema)?;
            s.collections[pos].schema = schema.clone();
        }
        if body.get("listRule").is_some() {
            s.calls.push(Call::UpdateRules { name: name.clone() });
            if s.reject_rules.contains(&name) {
                return Err(ApiError::status(500, "Something went wrong while processing your request."));
            }
            s.rules.insert(name, body.clone());
        }
        Ok(s.collections[pos].clone())
    }
}
