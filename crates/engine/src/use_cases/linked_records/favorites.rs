//! Favorite toggle: pins abilities and talents to the favorites section.

use mythcraft_domain::{RowRef, Section, SheetValue};

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};
use crate::infrastructure::ports::AttributeUpdate;

use super::LINK_FIELD;

pub const TOGGLE_FAVORITE_FIELD: &str = "toggle_favorite";

/// Fields copied onto a new favorite.
const FAVORITE_FIELDS: [&str; 3] = ["name", "description", "tags"];

pub struct FavoriteToggleRule;

fn add_favorite(ctx: &mut SheetContext<'_>, source: &RowRef) -> Result<(), RuleError> {
    if let Some(existing) = RowRef::from_link(&ctx.get(&source.field(LINK_FIELD))?) {
        if existing.section == Section::Favorites && ctx.row_exists(&existing)? {
            tracing::debug!(row = %source, favorite = %existing, "Already a favorite");
            return Ok(());
        }
    }

    let names: Vec<String> = FAVORITE_FIELDS.iter().map(|field| source.field(field)).collect();
    let values = ctx.get_attrs(&names)?;

    let favorite = ctx.create_row(&Section::Favorites)?;
    let mut update: AttributeUpdate = FAVORITE_FIELDS
        .iter()
        .map(|field| {
            let value = values.get(&source.field(field)).cloned().unwrap_or_default();
            (favorite.field(field), value)
        })
        .collect();
    update.insert(favorite.field("toggle_edit"), "false".to_string());
    update.insert(favorite.field(LINK_FIELD), source.prefix());
    update.insert(source.field(LINK_FIELD), favorite.prefix());

    ctx.set_attrs_silent(update)?;
    tracing::info!(row = %source, favorite = %favorite, "Added favorite");
    Ok(())
}

fn remove_favorite(ctx: &mut SheetContext<'_>, source: &RowRef) -> Result<(), RuleError> {
    let link_name = source.field(LINK_FIELD);
    let link = ctx.get(&link_name)?;
    let Some(favorite) = RowRef::from_link(&link) else {
        return Ok(());
    };
    if favorite.section != Section::Favorites {
        return Ok(());
    }

    if ctx.row_exists(&favorite)? {
        ctx.remove_row(&favorite)?;
        tracing::info!(row = %source, favorite = %favorite, "Removed favorite");
    }
    ctx.set_silent(link_name, "")
}

impl SheetRule for FavoriteToggleRule {
    fn name(&self) -> &'static str {
        "favorite_toggle"
    }

    fn triggers(&self) -> Vec<Trigger> {
        vec![
            Trigger::section_field(Section::Abilities, TOGGLE_FAVORITE_FIELD),
            Trigger::section_field(Section::Talents, TOGGLE_FAVORITE_FIELD),
        ]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        let Some(source) = event.row() else {
            return Ok(());
        };
        if SheetValue::parse(&event.new_value).is_set() {
            add_favorite(ctx, &source)
        } else {
            remove_favorite(ctx, &source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use std::sync::Arc;

    const ABILITY: [(&str, &str); 3] = [
        ("repeating_abilities_-b1_name", "Second Wind"),
        ("repeating_abilities_-b1_description", "Recover stamina."),
        ("repeating_abilities_-b1_tags", "rest"),
    ];

    fn favorite_sheet() -> TestSheet {
        sheet_with(vec![Arc::new(FavoriteToggleRule)], &ABILITY)
    }

    fn favorites(sheet: &TestSheet) -> Vec<RowRef> {
        use crate::infrastructure::ports::AttributeStore;
        sheet
            .store()
            .section_row_ids(&Section::Favorites)
            .unwrap()
            .into_iter()
            .map(|id| RowRef::new(Section::Favorites, id))
            .collect()
    }

    #[test]
    fn toggling_on_creates_a_linked_favorite() {
        let mut sheet = favorite_sheet();
        sheet.player_edit(&[("repeating_abilities_-b1_toggle_favorite", "on")]);

        let favorites = favorites(&sheet);
        assert_eq!(favorites.len(), 1);
        let favorite = &favorites[0];
        assert_eq!(sheet.get(&favorite.field("name")), "Second Wind");
        assert_eq!(sheet.get(&favorite.field("description")), "Recover stamina.");
        assert_eq!(sheet.get(&favorite.field("tags")), "rest");
        assert_eq!(sheet.get(&favorite.field("toggle_edit")), "false");
        assert_eq!(sheet.get(&favorite.field("link")), "repeating_abilities_-b1");
        assert_eq!(sheet.get("repeating_abilities_-b1_link"), favorite.prefix());
    }

    #[test]
    fn toggling_on_twice_keeps_one_favorite() {
        let mut sheet = favorite_sheet();
        sheet.player_edit(&[("repeating_abilities_-b1_toggle_favorite", "on")]);
        sheet.player_edit(&[("repeating_abilities_-b1_toggle_favorite", "true")]);
        assert_eq!(favorites(&sheet).len(), 1);
    }

    #[test]
    fn toggling_off_removes_the_favorite_and_the_link() {
        let mut sheet = favorite_sheet();
        sheet.player_edit(&[("repeating_abilities_-b1_toggle_favorite", "on")]);
        let favorite = favorites(&sheet).remove(0);

        sheet.player_edit(&[("repeating_abilities_-b1_toggle_favorite", "0")]);

        assert!(favorites(&sheet).is_empty());
        assert_eq!(sheet.get(&favorite.field("name")), "");
        assert_eq!(sheet.get("repeating_abilities_-b1_link"), "");
        assert_eq!(sheet.get("repeating_abilities_-b1_name"), "Second Wind");
    }

    #[test]
    fn links_to_other_sections_are_left_alone() {
        let mut sheet = sheet_with(
            vec![Arc::new(FavoriteToggleRule)],
            &[
                ("repeating_talents_-t1_link", "repeating_reactive-actions_-r1"),
                ("repeating_reactive-actions_-r1_name", "Parry"),
            ],
        );
        sheet.player_edit(&[("repeating_talents_-t1_toggle_favorite", "0")]);

        assert_eq!(sheet.get("repeating_talents_-t1_link"), "repeating_reactive-actions_-r1");
        assert_eq!(sheet.get("repeating_reactive-actions_-r1_name"), "Parry");
    }
}
