//! Push declared access rules once every collection exists.

use crate::client::{list_all_collections, AdminApi, RemoteIndex};
use crate::config::{Catalog, CollectionSpec};
use crate::error::ErrorDetail;
use crate::payload::rules_payload;
use crate::report::{RuleAction, RuleOutcome, StepFailure};

/// Re-list collections (fresh ids for anything created this run) and overwrite each
/// collection's five rule slots. Rules are always re-pushed, never diffed.
///
/// A failed re-listing does not abort the pass: it is recorded against every
/// collection with declared rules.
pub async fn apply_rules(api: &dyn AdminApi, catalog: &Catalog) -> Vec<RuleOutcome> {
    let listing = list_all_collections(api).await.map(RemoteIndex::new);
    if let Err(e) = &listing {
        tracing::error!(error = %e, "re-listing collections failed; no rules pushed");
    }
    let mut outcomes = Vec::with_capacity(catalog.collections.len());

    for spec in &catalog.collections {
        let result = if spec.rules.is_empty() {
            Ok(RuleAction::Skipped)
        } else {
            match &listing {
                Err(e) => Err(StepFailure::ListingFailed {
                    error: ErrorDetail::from(e),
                }),
                Ok(index) => push_rules(api, index, spec).await,
            }
        };
        if let Err(e) = &result {
            tracing::error!(collection = %spec.name, error = %e, "rules not applied");
        }
        outcomes.push(RuleOutcome {
            name: spec.name.clone(),
            result,
        });
    }

    outcomes
}

async fn push_rules(api: &dyn AdminApi, index: &RemoteIndex, spec: &CollectionSpec) -> Result<RuleAction, StepFailure> {
    let Some(remote) = index.get(&spec.name) else {
        return Err(StepFailure::NotFound);
    };
    match api.update_collection(&remote.id, &rules_payload(&spec.rules)).await {
        Ok(_) => {
            tracing::info!(collection = %spec.name, "rules applied");
            Ok(RuleAction::Applied {
                slots: spec.rules.len(),
            })
        }
        Err(e) => Err(StepFailure::RulesRejected {
            error: ErrorDetail::from(&e),
        }),
    }
}
