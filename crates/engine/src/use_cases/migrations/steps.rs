//! The published upgrade steps.

use mythcraft_domain::game_rules::initiative_total;
use mythcraft_domain::game_rules::modifiers::{
    MODIFIER_ACTIVE_FIELD, MODIFIER_ATTRIBUTE_FIELD, MODIFIER_SOURCE_FIELD, MODIFIER_VALUE_FIELD,
};
use mythcraft_domain::Section;

use crate::dispatch::{RuleError, SheetContext};
use crate::infrastructure::ports::AttributeUpdate;
use crate::use_cases::derivations::{CRITICAL_FAIL, CRITICAL_HIT, INITIATIVE};

use super::{MigrationStep, SheetVersion};

const LEGACY_BONUS_FIELD: &str = "bonus";

/// Copy each record's legacy `bonus` into `modifier`, leaving records that
/// already have a modifier alone.
fn copy_legacy_bonus(ctx: &mut SheetContext<'_>, sections: &[Section]) -> Result<(), RuleError> {
    let mut update = AttributeUpdate::new();
    for section in sections {
        let rows = ctx.rows(section)?;
        let names: Vec<String> = rows
            .iter()
            .flat_map(|row| [row.field(LEGACY_BONUS_FIELD), row.field(MODIFIER_VALUE_FIELD)])
            .collect();
        let values = ctx.get_attrs(&names)?;
        let read = |name: String| values.get(&name).cloned().unwrap_or_default();

        for row in &rows {
            if !read(row.field(MODIFIER_VALUE_FIELD)).trim().is_empty() {
                continue;
            }
            let bonus = read(row.field(LEGACY_BONUS_FIELD));
            let modifier = if bonus.trim().is_empty() {
                "0".to_string()
            } else {
                bonus
            };
            update.insert(row.field(MODIFIER_VALUE_FIELD), modifier);
        }
    }

    if !update.is_empty() {
        tracing::debug!(records = update.len(), "Copied legacy bonuses");
        ctx.set_attrs(update)?;
    }
    Ok(())
}

// =============================================================================
// 1.1
// =============================================================================

/// Attack and skill bonuses became modifiers; initiative became derived.
pub struct AttackAndSkillModifiers;

impl MigrationStep for AttackAndSkillModifiers {
    fn version(&self) -> SheetVersion {
        SheetVersion::new(1.1)
    }

    fn describe(&self) -> &'static str {
        "attack and skill bonuses to modifiers"
    }

    fn apply(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        copy_legacy_bonus(ctx, &[Section::Attacks, Section::Skills])?;
        let values = ctx.values(&["initiative_bonus", "awareness"])?;
        ctx.set(INITIATIVE, initiative_total(&values).to_string())
    }
}

// =============================================================================
// 1.2
// =============================================================================

const INITIATIVE_MIGRATION_SOURCE: &str = "version 1.2";

/// The combat tab's initiative bonus input moved into a modifier record.
pub struct InitiativeBonusModifier;

impl MigrationStep for InitiativeBonusModifier {
    fn version(&self) -> SheetVersion {
        SheetVersion::new(1.2)
    }

    fn describe(&self) -> &'static str {
        "initiative bonus to a modifier record"
    }

    fn apply(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let raw = ctx.get("initiative_bonus")?;
        let values = ctx.values(&["initiative_bonus"])?;
        if values.int("initiative_bonus") <= 0 {
            return Ok(());
        }

        let rows = ctx.rows(&Section::Modifiers)?;
        let sources: Vec<String> = rows.iter().map(|row| row.field(MODIFIER_SOURCE_FIELD)).collect();
        let existing = ctx.get_attrs(&sources)?;
        if existing.values().any(|source| source == INITIATIVE_MIGRATION_SOURCE) {
            tracing::debug!("Initiative modifier already migrated");
            return Ok(());
        }

        let row = ctx.create_row(&Section::Modifiers)?;
        ctx.set_attrs(AttributeUpdate::from([
            (row.field(MODIFIER_ATTRIBUTE_FIELD), INITIATIVE.to_string()),
            (row.field(MODIFIER_VALUE_FIELD), raw.trim().to_string()),
            (row.field(MODIFIER_ACTIVE_FIELD), "on".to_string()),
            (row.field(MODIFIER_SOURCE_FIELD), INITIATIVE_MIGRATION_SOURCE.to_string()),
            (row.field("toggle_edit"), "false".to_string()),
            (
                row.field("description"),
                "Migrated from initiative bonus input in combat tab.".to_string(),
            ),
        ]))?;
        tracing::info!(row = %row, bonus = %raw, "Moved initiative bonus into a modifier");
        Ok(())
    }
}

// =============================================================================
// 1.21
// =============================================================================

/// `critical_range` was split into critical hit and critical fail ranges.
pub struct CriticalRangeRename;

const RENAMES: [(&str, &str); 2] = [
    ("critical_range", CRITICAL_HIT),
    ("critical_range_base", "critical_hit_base"),
];
const DEFAULT_CRITICAL_HIT: &str = "20";
const DEFAULT_CRITICAL_FAIL: &str = "1";

impl MigrationStep for CriticalRangeRename {
    fn version(&self) -> SheetVersion {
        SheetVersion::new(1.21)
    }

    fn describe(&self) -> &'static str {
        "critical range to critical hit and fail"
    }

    fn apply(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let names = [
            "critical_range",
            "critical_range_base",
            CRITICAL_HIT,
            "critical_hit_base",
            "critical_fail_base",
            CRITICAL_FAIL,
        ];
        let values = ctx.get_attrs(&names)?;
        let blank = |name: &str| values.get(name).map_or(true, |value| value.trim().is_empty());

        let mut update = AttributeUpdate::new();
        for (old, new) in RENAMES {
            if !blank(old) {
                let value = values.get(old).cloned().unwrap_or_default();
                update.insert(new.to_string(), value);
                update.insert(old.to_string(), String::new());
            } else if blank(new) {
                update.insert(new.to_string(), DEFAULT_CRITICAL_HIT.to_string());
            }
        }
        for name in ["critical_fail_base", CRITICAL_FAIL] {
            if blank(name) {
                update.insert(name.to_string(), DEFAULT_CRITICAL_FAIL.to_string());
            }
        }

        if !update.is_empty() {
            ctx.set_attrs(update)?;
        }
        Ok(())
    }
}

// =============================================================================
// 1.3
// =============================================================================

/// Creature action bonuses became modifiers.
pub struct ActionModifiers;

impl MigrationStep for ActionModifiers {
    fn version(&self) -> SheetVersion {
        SheetVersion::new(1.3)
    }

    fn describe(&self) -> &'static str {
        "action bonuses to modifiers"
    }

    fn apply(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        copy_legacy_bonus(ctx, &[Section::Actions])
    }
}
