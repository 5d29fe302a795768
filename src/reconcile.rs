//! Bring remote collections up to the catalog: create what is absent, append missing fields.
//! Strictly additive: remote fields are never removed, renamed or modified.

use crate::client::{list_all_collections, AdminApi, RemoteCollection, RemoteIndex};
use crate::config::{Catalog, CollectionSpec, FieldDefinition};
use crate::error::{ApiError, ErrorDetail};
use crate::payload::{create_payload, field_payload, schema_payload};
use crate::report::{CollectionAction, CollectionOutcome, FieldDrift, PlannedChange, SkippedField, StepFailure};

/// What reconciliation would do for one collection, given its remote counterpart.
#[derive(Debug, PartialEq)]
pub enum CollectionPlan<'a> {
    Create,
    Extend {
        /// Declared fields absent remotely, in catalog order.
        missing: Vec<&'a FieldDefinition>,
        drift: Vec<FieldDrift>,
    },
    UpToDate {
        drift: Vec<FieldDrift>,
    },
}

/// Diff by field name only. Options of fields that exist remotely are not compared.
pub fn plan_collection<'a>(spec: &'a CollectionSpec, remote: Option<&RemoteCollection>) -> CollectionPlan<'a> {
    let Some(remote) = remote else {
        return CollectionPlan::Create;
    };
    let existing = remote.field_names();
    let missing: Vec<&FieldDefinition> = spec
        .fields
        .iter()
        .filter(|f| !existing.contains(f.name.as_str()))
        .collect();
    let drift: Vec<FieldDrift> = spec
        .fields
        .iter()
        .filter_map(|f| {
            let remote_type = remote.field_type(&f.name)?;
            (remote_type != f.kind.type_name()).then(|| FieldDrift {
                name: f.name.clone(),
                declared: f.kind.type_name().to_string(),
                remote: remote_type.to_string(),
            })
        })
        .collect();
    if missing.is_empty() {
        CollectionPlan::UpToDate { drift }
    } else {
        CollectionPlan::Extend { missing, drift }
    }
}

/// Plan every catalog entry against one listing without writing anything.
pub fn plan_catalog(catalog: &Catalog, index: &RemoteIndex) -> Vec<PlannedChange> {
    catalog
        .collections
        .iter()
        .map(|spec| match plan_collection(spec, index.get(&spec.name)) {
            CollectionPlan::Create => PlannedChange::Create {
                name: spec.name.clone(),
                fields: spec.fields.len(),
            },
            CollectionPlan::Extend { missing, .. } => PlannedChange::AddFields {
                name: spec.name.clone(),
                fields: missing.iter().map(|f| f.name.clone()).collect(),
            },
            CollectionPlan::UpToDate { .. } => PlannedChange::UpToDate { name: spec.name.clone() },
        })
        .collect()
}

/// Reconcile every collection in declaration order. Lists remote collections once; a listing
/// failure aborts the pass, any later failure is recorded for that collection only.
pub async fn reconcile_collections(
    api: &dyn AdminApi,
    catalog: &Catalog,
) -> Result<Vec<CollectionOutcome>, ApiError> {
    let mut index = RemoteIndex::new(list_all_collections(api).await?);
    let mut outcomes = Vec::with_capacity(catalog.collections.len());
    for spec in &catalog.collections {
        let result = reconcile_one(api, spec, &mut index).await;
        if let Err(e) = &result {
            tracing::error!(collection = %spec.name, error = %e, "reconcile failed");
        }
        outcomes.push(CollectionOutcome {
            name: spec.name.clone(),
            result,
        });
    }
    Ok(outcomes)
}

async fn reconcile_one(
    api: &dyn AdminApi,
    spec: &CollectionSpec,
    index: &mut RemoteIndex,
) -> Result<CollectionAction, StepFailure> {
    match plan_collection(spec, index.get(&spec.name)) {
        CollectionPlan::Create => create(api, spec, index).await,
        CollectionPlan::Extend { missing, drift } => {
            report_drift(spec, &drift);
            extend(api, spec, &missing, drift, index).await
        }
        CollectionPlan::UpToDate { drift } => {
            report_drift(spec, &drift);
            tracing::info!(collection = %spec.name, "up to date");
            Ok(CollectionAction::Unchanged { drift })
        }
    }
}

async fn create(
    api: &dyn AdminApi,
    spec: &CollectionSpec,
    index: &mut RemoteIndex,
) -> Result<CollectionAction, StepFailure> {
    let body = create_payload(spec, index).map_err(|e| StepFailure::InvalidPayload { message: e.to_string() })?;
    let created = api
        .create_collection(&body)
        .await
        .map_err(|e| StepFailure::CreateRejected {
            error: ErrorDetail::from(&e),
        })?;
    tracing::info!(collection = %spec.name, id = %created.id, fields = spec.fields.len(), "created");
    let id = created.id.clone();
    index.upsert(created);
    Ok(CollectionAction::Created {
        id,
        fields: spec.fields.len(),
    })
}

async fn extend(
    api: &dyn AdminApi,
    spec: &CollectionSpec,
    missing: &[&FieldDefinition],
    drift: Vec<FieldDrift>,
    index: &mut RemoteIndex,
) -> Result<CollectionAction, StepFailure> {
    let (id, mut schema) = match index.get(&spec.name) {
        Some(remote) => (remote.id.clone(), remote.schema.clone()),
        None => return Err(StepFailure::NotFound),
    };

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    for field in missing {
        match field_payload(field, index) {
            Ok(v) => {
                schema.push(v);
                added.push(field.name.clone());
            }
            Err(e) => {
                tracing::warn!(collection = %spec.name, field = %field.name, error = %e, "field not appended");
                skipped.push(SkippedField {
                    name: field.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if !added.is_empty() {
        let updated = api
            .update_collection(&id, &schema_payload(&schema))
            .await
            .map_err(|e| StepFailure::UpdateRejected {
                error: ErrorDetail::from(&e),
            })?;
        tracing::info!(collection = %spec.name, added = ?added, "fields appended");
        index.upsert(updated);
    }

    Ok(CollectionAction::Extended { added, skipped, drift })
}

fn report_drift(spec: &CollectionSpec, drift: &[FieldDrift]) {
    for d in drift {
        tracing::warn!(
            collection = %spec.name,
            field = %d.name,
            declared = %d.declared,
            remote = %d.remote,
            "remote field type differs from catalog; left unchanged"
        );
    }
}
