//! Schema provisioner: reconcile declared collections, fields and access rules against a PocketBase admin API.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod reconcile;
pub mod report;
pub mod rules;
pub mod runner;

pub use client::{AdminApi, Credentials, HttpSession, RemoteCollection};
pub use config::{builtin_catalog, load_catalog, parse_catalog, validate, Catalog, CollectionSpec, FieldDefinition, FieldKind, RuleSlot};
pub use error::{ApiError, AppError, ConfigError};
pub use reconcile::{plan_collection, reconcile_collections};
pub use report::RunReport;
pub use rules::apply_rules;
pub use runner::{provision, run, RunMode};
