//! Sheet version migrations.
//!
//! A sheet stores the last version it was upgraded to in `version`. Opening
//! it runs every newer step in order and records each version reached, so a
//! failed step is retried on the next open without repeating earlier ones.

mod steps;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use mythcraft_domain::SheetValue;
use serde::{Deserialize, Serialize};

use crate::dispatch::{DispatchReport, RuleError, SheetContext};

pub use steps::{ActionModifiers, AttackAndSkillModifiers, CriticalRangeRename, InitiativeBonusModifier};

/// Attribute holding the sheet's schema version.
pub const VERSION_ATTRIBUTE: &str = "version";

// =============================================================================
// Versions
// =============================================================================

/// A sheet schema version such as `1.21`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetVersion(f64);

impl SheetVersion {
    /// Version assumed for sheets that never recorded one.
    pub const INITIAL: SheetVersion = SheetVersion(1.0);

    pub const fn new(version: f64) -> Self {
        Self(version)
    }

    /// Read a stored `version`. Missing, unparsable or pre-1 values count
    /// as [`SheetVersion::INITIAL`].
    pub fn from_stored(raw: &str) -> Self {
        SheetValue::parse(raw)
            .as_f64()
            .filter(|version| *version >= Self::INITIAL.0)
            .map_or(Self::INITIAL, Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for SheetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.0.total_cmp(&other.0))
    }
}

impl fmt::Display for SheetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Steps
// =============================================================================

/// One upgrade, applied to sheets older than its version.
///
/// Steps write through the sheet context like any edit, so derived values
/// follow. A step must leave an already-upgraded sheet unchanged.
pub trait MigrationStep: Send + Sync {
    fn version(&self) -> SheetVersion;

    fn describe(&self) -> &'static str;

    fn apply(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError>;
}

/// What one open did to the version.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRun {
    pub from: SheetVersion,
    pub to: SheetVersion,
    pub applied: Vec<SheetVersion>,
}

impl MigrationRun {
    fn unchanged(version: SheetVersion) -> Self {
        Self {
            from: version,
            to: version,
            applied: Vec::new(),
        }
    }
}

/// Result of opening a sheet.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// Version found on the sheet.
    pub from: SheetVersion,
    /// Version recorded after the last successful step.
    pub to: SheetVersion,
    pub applied: Vec<SheetVersion>,
    pub report: DispatchReport,
}

impl MigrationOutcome {
    pub fn new(run: MigrationRun, report: DispatchReport) -> Self {
        Self {
            from: run.from,
            to: run.to,
            applied: run.applied,
            report,
        }
    }

    pub fn was_current(&self) -> bool {
        self.applied.is_empty() && self.report.is_clean()
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Ordered migration steps.
#[derive(Clone)]
pub struct MigrationChain {
    steps: Vec<Arc<dyn MigrationStep>>,
}

impl MigrationChain {
    /// A chain of `steps`, ordered by version.
    pub fn new(mut steps: Vec<Arc<dyn MigrationStep>>) -> Self {
        steps.sort_by(|a, b| a.version().0.total_cmp(&b.version().0));
        Self { steps }
    }

    /// The sheet's published upgrade history.
    pub fn standard() -> Self {
        Self::new(vec![
            Arc::new(AttackAndSkillModifiers),
            Arc::new(InitiativeBonusModifier),
            Arc::new(CriticalRangeRename),
            Arc::new(ActionModifiers),
        ])
    }

    /// Version a fully upgraded sheet carries.
    pub fn latest(&self) -> SheetVersion {
        self.steps
            .last()
            .map_or(SheetVersion::INITIAL, |step| step.version())
    }

    pub fn versions(&self) -> Vec<SheetVersion> {
        self.steps.iter().map(|step| step.version()).collect()
    }

    /// Upgrade the sheet behind `ctx`. Stops at the first failing step,
    /// recording the failure; the version stays at the last step reached.
    pub fn run(&self, ctx: &mut SheetContext<'_>) -> MigrationRun {
        let stored = match ctx.get(VERSION_ATTRIBUTE) {
            Ok(stored) => stored,
            Err(error) => {
                tracing::warn!(error = %error, "Could not read sheet version");
                ctx.record_failure(VERSION_ATTRIBUTE, &error);
                return MigrationRun::unchanged(SheetVersion::INITIAL);
            }
        };
        let from = SheetVersion::from_stored(&stored);
        let latest = self.latest();
        if from >= latest {
            tracing::debug!(version = %from, "Sheet is up to date");
            return MigrationRun::unchanged(from);
        }

        let mut run = MigrationRun::unchanged(from);
        for step in self.steps.iter().filter(|step| step.version() > from) {
            let version = step.version();
            tracing::info!(from = %run.to, to = %version, step = step.describe(), "Sheet is updating");

            let result = step
                .apply(ctx)
                .and_then(|()| ctx.set_silent(VERSION_ATTRIBUTE, version.to_string()));
            if let Err(error) = result {
                tracing::warn!(version = %version, error = %error, "Migration step failed");
                ctx.record_failure(format!("{VERSION_ATTRIBUTE} {version}"), &error);
                break;
            }
            run.to = version;
            run.applied.push(version);
        }

        tracing::info!(from = %run.from, to = %run.to, latest = %latest, "Sheet migration finished");
        run
    }
}

impl fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationChain")
            .field("versions", &self.versions())
            .finish()
    }
}
