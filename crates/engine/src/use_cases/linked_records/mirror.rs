//! Field mirroring between linked records.

use mythcraft_domain::{RowRef, Section};

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};

use super::LINK_FIELD;

/// Which fields of a group are kept equal.
#[derive(Debug, Clone, Copy)]
enum MirroredFields {
    AllExcept(&'static [&'static str]),
    Only(&'static [&'static str]),
}

impl MirroredFields {
    fn includes(&self, field: &str) -> bool {
        match self {
            Self::AllExcept(excluded) => !excluded.contains(&field),
            Self::Only(fields) => fields.contains(&field),
        }
    }
}

/// Sections whose linked records share some fields.
#[derive(Debug, Clone, Copy)]
struct MirrorGroup {
    sections: &'static [Section],
    fields: MirroredFields,
}

impl MirrorGroup {
    fn covers(&self, from: &Section, to: &Section, field: &str) -> bool {
        from != to
            && self.sections.contains(from)
            && self.sections.contains(to)
            && self.fields.includes(field)
    }
}

const MIRROR_GROUPS: [MirrorGroup; 4] = [
    MirrorGroup {
        sections: &[Section::Attacks, Section::Spells],
        fields: MirroredFields::AllExcept(&[LINK_FIELD]),
    },
    MirrorGroup {
        sections: &[Section::Abilities, Section::Favorites, Section::Talents],
        fields: MirroredFields::Only(&["name", "tags", "description"]),
    },
    MirrorGroup {
        sections: &[Section::Attacks, Section::Inventory],
        fields: MirroredFields::Only(&["name"]),
    },
    MirrorGroup {
        sections: &[Section::Talents, Section::ReactiveActions],
        fields: MirroredFields::Only(&["name", "description", "ap"]),
    },
];

/// Copies a changed field to the record named by the source's link.
///
/// Writes are silent, so the partner's own mirror never fires and nothing
/// is written back.
pub struct MirrorRule;

fn mirrored_sections() -> Vec<Section> {
    let mut sections: Vec<Section> = MIRROR_GROUPS
        .iter()
        .flat_map(|group| group.sections.iter().cloned())
        .collect();
    sections.sort();
    sections.dedup();
    sections
}

impl SheetRule for MirrorRule {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn triggers(&self) -> Vec<Trigger> {
        mirrored_sections().into_iter().map(Trigger::Section).collect()
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        let (Some(row), Some(field)) = (event.row(), event.field()) else {
            return Ok(());
        };
        if field == LINK_FIELD {
            return Ok(());
        }

        let Some(target) = RowRef::from_link(&ctx.get(&row.field(LINK_FIELD))?) else {
            return Ok(());
        };
        if !MIRROR_GROUPS
            .iter()
            .any(|group| group.covers(&row.section, &target.section, &field))
        {
            return Ok(());
        }
        if !ctx.row_exists(&target)? {
            tracing::debug!(row = %row, target = %target, "Ignoring orphaned link");
            return Ok(());
        }

        ctx.set_silent(target.field(&field), event.new_value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use std::sync::Arc;

    fn mirror_sheet(pairs: &[(&str, &str)]) -> TestSheet {
        sheet_with(vec![Arc::new(MirrorRule)], pairs)
    }

    #[test]
    fn attack_changes_reach_the_linked_spell_once() {
        let mut sheet = mirror_sheet(&[
            ("repeating_attacks_-a1_name", "Firebolt"),
            ("repeating_attacks_-a1_link", "repeating_spells_-s1"),
            ("repeating_spells_-s1_name", "Firebolt"),
            ("repeating_spells_-s1_link", "repeating_attacks_-a1"),
        ]);

        let report = sheet.player_edit(&[("repeating_attacks_-a1_damage", "2d6")]);

        assert_eq!(sheet.get("repeating_spells_-s1_damage"), "2d6");
        assert_eq!(report.changes.len(), 2);
        assert_eq!(report.changes_to("repeating_spells_-s1_damage").count(), 1);
    }

    #[test]
    fn only_group_fields_are_mirrored() {
        let mut sheet = mirror_sheet(&[
            ("repeating_talents_-t1_link", "repeating_favorites_-f1"),
            ("repeating_favorites_-f1_name", "Old"),
        ]);

        sheet.player_edit(&[
            ("repeating_talents_-t1_name", "Keen Eye"),
            ("repeating_talents_-t1_ap", "2"),
        ]);

        assert_eq!(sheet.get("repeating_favorites_-f1_name"), "Keen Eye");
        assert_eq!(sheet.get("repeating_favorites_-f1_ap"), "");
    }

    #[test]
    fn attack_and_inventory_share_only_the_name() {
        let mut sheet = mirror_sheet(&[
            ("repeating_inventory_-i1_link", "repeating_attacks_-a1"),
            ("repeating_attacks_-a1_name", "Dagger"),
        ]);

        sheet.player_edit(&[
            ("repeating_inventory_-i1_name", "Silver Dagger"),
            ("repeating_inventory_-i1_weight", "1"),
        ]);

        assert_eq!(sheet.get("repeating_attacks_-a1_name"), "Silver Dagger");
        assert_eq!(sheet.get("repeating_attacks_-a1_weight"), "");
    }

    #[test]
    fn orphaned_and_foreign_links_are_ignored() {
        let mut sheet = mirror_sheet(&[
            ("repeating_attacks_-a1_link", "repeating_spells_-gone"),
            ("repeating_skills_-k1_name", "Stealth"),
            ("repeating_inventory_-i1_link", "repeating_skills_-k1"),
        ]);

        let report = sheet.player_edit(&[
            ("repeating_attacks_-a1_name", "Orphan"),
            ("repeating_inventory_-i1_name", "Rope"),
        ]);

        assert!(report.is_clean());
        assert_eq!(report.changes.len(), 2);
        assert_eq!(sheet.get("repeating_skills_-k1_name"), "Stealth");
    }

    #[test]
    fn link_edits_are_not_mirrored() {
        let mut sheet = mirror_sheet(&[("repeating_spells_-s1_name", "Ward")]);
        sheet.player_edit(&[("repeating_attacks_-a1_link", "repeating_spells_-s1")]);
        assert_eq!(sheet.get("repeating_spells_-s1_link"), "");
    }
}
