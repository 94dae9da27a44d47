//! Derived attribute rules.
//!
//! Each rule reads its inputs, calls the matching formula in
//! `mythcraft_domain::game_rules`, and writes the result with notification
//! so dependent rules see it.

mod action_points;
mod attribute_budget;
mod critical;
mod defenses;
mod luck;
mod modifiers;

pub use action_points::{ActionPointsRule, ACTION_POINTS_PER_ROUND};
pub use attribute_budget::{
    attribute_budget_inputs, attribute_validation, AttributeBudgetRule, ATTRIBUTE_CAP, ATTRIBUTE_POINTS_REMAINING,
    ATTRIBUTE_POINTS_SPENT,
};
pub use critical::{CriticalFailRule, CriticalHitRule, CRITICAL_FAIL, CRITICAL_HIT};
pub use defenses::{DefenseRule, InitiativeRule, INITIATIVE};
pub use luck::{LuckRule, CRITICAL_DAMAGE_BONUS, LUCK_NEGATIVE_MODIFIER, LUCK_POINTS};
pub use modifiers::ModifierAggregationRule;
