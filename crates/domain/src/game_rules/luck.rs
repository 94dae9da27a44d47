//! Luck-derived stats.

use serde::{Deserialize, Serialize};

/// Luck at or above this narrows the critical range to 19-20.
pub const LUCK_CRIT_TIER_ONE: i32 = 6;
/// Luck at or above this narrows the critical range to 18-20.
pub const LUCK_CRIT_TIER_TWO: i32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckStats {
    /// Luck points available per session.
    pub luck_points: i32,
    /// Negative luck removes the ability to land critical hits.
    pub can_crit: bool,
    pub crit_damage_bonus: i32,
    /// Lowest natural d20 roll that counts as a critical hit.
    pub crit_range_start: i32,
    /// Penalty applied to every d20 roll while luck is negative.
    pub d20_modifier_from_luck: i32,
}

pub fn luck_stats(luck: i32) -> LuckStats {
    LuckStats {
        luck_points: if luck > 0 { luck / 2 } else { 0 },
        can_crit: luck >= 0,
        crit_damage_bonus: if luck >= 1 { luck } else { 0 },
        crit_range_start: crit_range_start(luck),
        d20_modifier_from_luck: if luck < 0 { luck } else { 0 },
    }
}

/// How far luck pushes the critical hit threshold down.
pub fn crit_range_reduction(luck: i32) -> i32 {
    if luck >= LUCK_CRIT_TIER_TWO {
        2
    } else if luck >= LUCK_CRIT_TIER_ONE {
        1
    } else {
        0
    }
}

fn crit_range_start(luck: i32) -> i32 {
    20 - crit_range_reduction(luck)
}
