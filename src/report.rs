//! Per-collection outcomes and the run summary handed back to the caller.

use crate::error::{AppError, ErrorDetail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

/// Why one collection step did not complete.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepFailure {
    /// The create body could not be built (e.g. relation target missing remotely).
    InvalidPayload { message: String },
    CreateRejected { error: ErrorDetail },
    UpdateRejected { error: ErrorDetail },
    RulesRejected { error: ErrorDetail },
    /// Re-listing before the rule phase failed.
    ListingFailed { error: ErrorDetail },
    /// No remote collection with this name after reconciliation.
    NotFound,
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepFailure::InvalidPayload { message } => write!(f, "invalid payload: {}", message),
            StepFailure::CreateRejected { error } => write!(f, "create rejected: {}", error.message),
            StepFailure::UpdateRejected { error } => write!(f, "field update rejected: {}", error.message),
            StepFailure::RulesRejected { error } => write!(f, "rule update rejected: {}", error.message),
            StepFailure::ListingFailed { error } => write!(f, "re-listing failed: {}", error.message),
            StepFailure::NotFound => write!(f, "collection not found remotely"),
        }
    }
}

/// A missing field that could not be appended.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedField {
    pub name: String,
    pub reason: String,
}

/// A declared field whose remote type differs. Reported only; never pushed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDrift {
    pub name: String,
    pub declared: String,
    pub remote: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CollectionAction {
    Created {
        id: String,
        fields: usize,
    },
    Extended {
        added: Vec<String>,
        skipped: Vec<SkippedField>,
        drift: Vec<FieldDrift>,
    },
    Unchanged {
        drift: Vec<FieldDrift>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionOutcome {
    pub name: String,
    pub result: Result<CollectionAction, StepFailure>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    Applied { slots: usize },
    /// Nothing declared for this collection.
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub name: String,
    pub result: Result<RuleAction, StepFailure>,
}

/// What a dry run would do for one collection.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum PlannedChange {
    Create { name: String, fields: usize },
    AddFields { name: String, fields: Vec<String> },
    UpToDate { name: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub collections: Vec<CollectionOutcome>,
    pub rules: Vec<RuleOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub planned: Vec<PlannedChange>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.collections.iter().filter(|o| o.result.is_err()).count()
            + self.rules.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failures() > 0
    }

    /// `Err(AppError::Incomplete)` when any step failed.
    pub fn require_complete(&self) -> Result<(), AppError> {
        match self.failures() {
            0 => Ok(()),
            n => Err(AppError::Incomplete(n)),
        }
    }

    /// Fields that were declared missing but could not be appended.
    pub fn skipped_fields(&self) -> usize {
        self.collections
            .iter()
            .map(|o| match &o.result {
                Ok(CollectionAction::Extended { skipped, .. }) => skipped.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn created(&self) -> usize {
        self.count(|a| matches!(a, CollectionAction::Created { .. }))
    }

    pub fn extended(&self) -> usize {
        self.count(|a| matches!(a, CollectionAction::Extended { added, .. } if !added.is_empty()))
    }

    fn count(&self, pred: impl Fn(&CollectionAction) -> bool) -> usize {
        self.collections
            .iter()
            .filter(|o| o.result.as_ref().map(&pred).unwrap_or(false))
            .count()
    }

    /// Human-readable summary, one line per collection and rule push.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        for p in &self.planned {
            let _ = match p {
                PlannedChange::Create { name, fields } => {
                    writeln!(out, "plan  {}: create with {} field(s)", name, fields)
                }
                PlannedChange::AddFields { name, fields } => {
                    writeln!(out, "plan  {}: add {}", name, fields.join(", "))
                }
                PlannedChange::UpToDate { name } => writeln!(out, "plan  {}: up to date", name),
            };
        }
        for o in &self.collections {
            let _ = match &o.result {
                Ok(CollectionAction::Created { fields, .. }) => {
                    writeln!(out, "ok    {}: created with {} field(s)", o.name, fields)
                }
                Ok(CollectionAction::Extended { added, skipped, .. }) => {
                    let mut line = format!("ok    {}: added {}", o.name, added.len());
                    if !skipped.is_empty() {
                        line.push_str(&format!(", skipped {}", skipped.len()));
                    }
                    writeln!(out, "{}", line)
                }
                Ok(CollectionAction::Unchanged { drift }) if !drift.is_empty() => {
                    writeln!(out, "warn  {}: {} field(s) differ in type", o.name, drift.len())
                }
                Ok(CollectionAction::Unchanged { .. }) => writeln!(out, "ok    {}: up to date", o.name),
                Err(e) => writeln!(out, "FAIL  {}: {}", o.name, e),
            };
        }
        for r in &self.rules {
            let _ = match &r.result {
                Ok(RuleAction::Applied { slots }) => writeln!(out, "ok    {} rules: {} slot(s) set", r.name, slots),
                Ok(RuleAction::Skipped) => writeln!(out, "skip  {} rules: none declared", r.name),
                Err(e) => writeln!(out, "FAIL  {} rules: {}", r.name, e),
            };
        }
        let elapsed = self.finished_at - self.started_at;
        let _ = writeln!(
            out,
            "done in {}ms: {} created, {} extended, {} failure(s)",
            elapsed.num_milliseconds(),
            self.created(),
            self.extended(),
            self.failures()
        );
        out
    }
}
