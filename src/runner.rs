//! One provisioning pass: session → reconcile → re-fetch → rules → report.

use crate::client::{list_all_collections, AdminApi, Credentials, HttpSession, RemoteIndex};
use crate::config::{validate, Catalog};
use crate::error::AppError;
use crate::reconcile::{plan_catalog, reconcile_collections};
use crate::report::RunReport;
use crate::rules::apply_rules;
use chrono::Utc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Apply,
    /// List remote collections and report planned changes; no writes.
    DryRun,
}

/// Run against an already authenticated session. Per-collection failures land in the
/// report; only catalog errors and a failed first listing are returned as `Err`.
pub async fn run(api: &dyn AdminApi, catalog: &Catalog, mode: RunMode) -> Result<RunReport, AppError> {
    validate(catalog)?;
    run_validated(api, catalog, mode).await
}

/// Validate, authenticate, then run. Authentication failure is fatal and happens before any listing.
pub async fn provision(credentials: &Credentials, catalog: &Catalog, mode: RunMode) -> Result<RunReport, AppError> {
    validate(catalog)?;
    let session = HttpSession::authenticate(credentials).await.map_err(AppError::Auth)?;
    run_validated(&session, catalog, mode).await
}

async fn run_validated(api: &dyn AdminApi, catalog: &Catalog, mode: RunMode) -> Result<RunReport, AppError> {
    let started_at = Utc::now();
    let mut report = RunReport {
        started_at,
        finished_at: started_at,
        collections: Vec::new(),
        rules: Vec::new(),
        planned: Vec::new(),
    };

    match mode {
        RunMode::DryRun => {
            let index = RemoteIndex::new(list_all_collections(api).await?);
            report.planned = plan_catalog(catalog, &index);
        }
        RunMode::Apply => {
            report.collections = reconcile_collections(api, catalog).await?;
            report.rules = apply_rules(api, catalog).await;
        }
    }

    report.finished_at = Utc::now();
    tracing::info!(
        collections = catalog.collections.len(),
        failures = report.failures(),
        "provisioning pass finished"
    );
    Ok(report)
}
