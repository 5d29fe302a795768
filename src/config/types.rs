//! Catalog types: collections, typed fields and access rules, matching the catalog JSON format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default upload limit for file fields (5 MiB), the admin UI default.
pub const DEFAULT_FILE_MAX_SIZE: u64 = 5_242_880;

fn one() -> u32 {
    1
}

fn default_max_size() -> u64 {
    DEFAULT_FILE_MAX_SIZE
}

/// Field type together with the options that are valid for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    File {
        #[serde(default = "one")]
        max_select: u32,
        #[serde(default = "default_max_size")]
        max_size: u64,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        mime_types: Vec<String>,
    },
    Select {
        #[serde(default = "one")]
        max_select: u32,
        values: Vec<String>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default)]
        no_decimal: bool,
    },
    /// The admin API's bool field takes no options, so there is no default value to carry.
    Bool,
    Relation {
        /// Catalog name of the target collection; resolved to a remote id when pushed.
        collection: String,
        #[serde(default = "one")]
        max_select: u32,
        #[serde(default)]
        cascade_delete: bool,
    },
}

impl FieldKind {
    /// Type name as used by the admin API.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::File { .. } => "file",
            FieldKind::Select { .. } => "select",
            FieldKind::Number { .. } => "number",
            FieldKind::Bool => "bool",
            FieldKind::Relation { .. } => "relation",
        }
    }

    pub fn relation_target(&self) -> Option<&str> {
        match self {
            FieldKind::Relation { collection, .. } => Some(collection.as_str()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDefinition {
            name: name.into(),
            required: false,
            kind,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Text {
                min: None,
                max: None,
                pattern: None,
            },
        )
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Number {
                min: None,
                max: None,
                no_decimal: false,
            },
        )
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn select(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(
            name,
            FieldKind::Select {
                max_select: 1,
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        )
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::File {
                max_select: 1,
                max_size: DEFAULT_FILE_MAX_SIZE,
                mime_types: Vec::new(),
            },
        )
    }

    /// Single relation to the catalog collection named `target`.
    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Relation {
                collection: target.into(),
                max_select: 1,
                cascade_delete: false,
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Upload limit in bytes. No effect on non-file fields.
    pub fn max_size(mut self, bytes: u64) -> Self {
        if let FieldKind::File { max_size, .. } = &mut self.kind {
            *max_size = bytes;
        }
        self
    }

    /// Maximum text length. No effect on non-text fields.
    pub fn max_len(mut self, len: u32) -> Self {
        if let FieldKind::Text { max, .. } = &mut self.kind {
            *max = Some(len);
        }
        self
    }
}

/// One of the five rule slots a collection carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSlot {
    List,
    View,
    Create,
    Update,
    Delete,
}

impl RuleSlot {
    pub const ALL: [RuleSlot; 5] = [
        RuleSlot::List,
        RuleSlot::View,
        RuleSlot::Create,
        RuleSlot::Update,
        RuleSlot::Delete,
    ];

    /// Collection property holding this rule (e.g. "listRule").
    pub fn api_key(self) -> &'static str {
        match self {
            RuleSlot::List => "listRule",
            RuleSlot::View => "viewRule",
            RuleSlot::Create => "createRule",
            RuleSlot::Update => "updateRule",
            RuleSlot::Delete => "deleteRule",
        }
    }
}

/// Declared rule expressions per slot. An empty expression opens the slot to everyone;
/// a slot that is not declared is locked to superusers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRules(BTreeMap<RuleSlot, String>);

impl AccessRules {
    pub fn new() -> Self {
        AccessRules(BTreeMap::new())
    }

    pub fn set(&mut self, slot: RuleSlot, expression: impl Into<String>) {
        self.0.insert(slot, expression.into());
    }

    pub fn get(&self, slot: RuleSlot) -> Option<&str> {
        self.0.get(&slot).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    /// Records of an auth collection are login identities.
    #[serde(default)]
    pub auth: bool,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub rules: AccessRules,
}

impl CollectionSpec {
    pub fn base(name: impl Into<String>) -> Self {
        CollectionSpec {
            name: name.into(),
            auth: false,
            fields: Vec::new(),
            rules: AccessRules::new(),
        }
    }

    pub fn auth(name: impl Into<String>) -> Self {
        CollectionSpec {
            auth: true,
            ..Self::base(name)
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn rule(mut self, slot: RuleSlot, expression: impl Into<String>) -> Self {
        self.rules.set(slot, expression);
        self
    }

    pub fn collection_type(&self) -> &'static str {
        if self.auth {
            "auth"
        } else {
            "base"
        }
    }
}

/// Desired schema, in declaration order. Collections are created in this order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub collections: Vec<CollectionSpec>,
}

impl Catalog {
    pub fn new(collections: Vec<CollectionSpec>) -> Self {
        Catalog { collections }
    }

    pub fn get(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.name == name)
    }
}
