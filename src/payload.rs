//! Catalog → admin API request bodies.

use crate::client::RemoteIndex;
use crate::config::{AccessRules, CollectionSpec, FieldDefinition, FieldKind, RuleSlot};
use crate::error::PayloadError;
use serde_json::{json, Map, Value};

/// Field definition as the admin API expects it. Relation targets are looked up by name in `index`.
pub fn field_payload(field: &FieldDefinition, index: &RemoteIndex) -> Result<Value, PayloadError> {
    let options = match &field.kind {
        FieldKind::Text { min, max, pattern } => json!({
            "min": min,
            "max": max,
            "pattern": pattern.as_deref().unwrap_or(""),
        }),
        FieldKind::File {
            max_select,
            max_size,
            mime_types,
        } => json!({
            "maxSelect": max_select,
            "maxSize": max_size,
            "mimeTypes": mime_types,
            "thumbs": [],
            "protected": false,
        }),
        FieldKind::Select { max_select, values } => json!({
            "maxSelect": max_select,
            "values": values,
        }),
        FieldKind::Number { min, max, no_decimal } => json!({
            "min": min,
            "max": max,
            "noDecimal": no_decimal,
        }),
        FieldKind::Bool => json!({}),
        FieldKind::Relation {
            collection,
            max_select,
            cascade_delete,
        } => {
            let id = index.id_of(collection).ok_or_else(|| PayloadError::UnresolvedRelation {
                field: field.name.clone(),
                target: collection.clone(),
            })?;
            json!({
                "collectionId": id,
                "cascadeDelete": cascade_delete,
                "minSelect": null,
                "maxSelect": max_select,
                "displayFields": null,
            })
        }
    };
    Ok(json!({
        "name": field.name,
        "type": field.kind.type_name(),
        "required": field.required,
        "options": options,
    }))
}

/// Body for creating `spec` with its full field list. Rules are pushed separately.
pub fn create_payload(spec: &CollectionSpec, index: &RemoteIndex) -> Result<Value, PayloadError> {
    let schema = spec
        .fields
        .iter()
        .map(|f| field_payload(f, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({
        "name": spec.name,
        "type": spec.collection_type(),
        "schema": schema,
    }))
}

pub fn schema_payload(schema: &[Value]) -> Value {
    json!({ "schema": schema })
}

/// All five rule properties; undeclared slots are sent as null (superusers only).
pub fn rules_payload(rules: &AccessRules) -> Value {
    let mut body = Map::new();
    for slot in RuleSlot::ALL {
        let value = rules
            .get(slot)
            .map(|expr| Value::String(expr.to_string()))
            .unwrap_or(Value::Null);
        body.insert(slot.api_key().to_string(), value);
    }
    Value::Object(body)
}
