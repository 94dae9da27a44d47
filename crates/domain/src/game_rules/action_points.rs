//! Action points per round.

use serde::{Deserialize, Serialize};

/// Action points a character gets before coordination is applied.
pub const BASE_ACTION_POINTS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPointStats {
    pub base_ap: i32,
    pub bonus_from_cor: i32,
    pub total_ap: i32,
}

/// Coordination bonus: half (rounded down) when non-negative, -1 for -1/-2,
/// -2 at -3 or below.
pub fn coordination_bonus(coordination: i32) -> i32 {
    match coordination {
        c if c >= 0 => c / 2,
        -1 | -2 => -1,
        _ => -2,
    }
}

pub fn action_points(coordination: i32) -> ActionPointStats {
    action_points_with(coordination, None, 0)
}

/// Action points with an explicit base (from the sheet) and a flat modifier.
/// The total never drops below zero.
pub fn action_points_with(coordination: i32, base: Option<i32>, modifier: i32) -> ActionPointStats {
    let base_ap = base.unwrap_or(BASE_ACTION_POINTS);
    let bonus_from_cor = coordination_bonus(coordination);
    ActionPointStats {
        base_ap,
        bonus_from_cor,
        total_ap: base_ap
            .saturating_add(bonus_from_cor)
            .saturating_add(modifier)
            .max(0),
    }
}
