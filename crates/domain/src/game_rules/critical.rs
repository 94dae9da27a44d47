//! Critical hit and critical fail ranges.
//!
//! Both are stored as comparison text usable in a roll formula:
//! `critical_hit = ">19"`, `critical_fail = "<1"`. A disabled critical hit
//! is stored as `"0"`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::luck::crit_range_reduction;

pub const CRITICAL_HIT_MIN: i32 = 16;
pub const CRITICAL_HIT_MAX: i32 = 20;
pub const CRITICAL_FAIL_MIN: i32 = 1;

/// Used when `critical_hit_base` has never been set.
pub const DEFAULT_CRITICAL_HIT_BASE: i32 = 20;
/// Used when `critical_fail_base` has never been set.
pub const DEFAULT_CRITICAL_FAIL_BASE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CriticalHit {
    /// Negative luck: the character cannot crit.
    Disabled,
    /// Natural rolls at or above this value crit.
    Range(i32),
}

impl CriticalHit {
    pub fn to_attr_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CriticalHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "0"),
            Self::Range(n) => write!(f, ">{n}"),
        }
    }
}

/// Whether a stored `critical_hit` allows crits. A sheet that has never
/// derived one can crit.
pub fn critical_hit_enabled(stored: &str) -> bool {
    stored.trim() != "0"
}

pub fn critical_hit_range(luck: i32, base: i32, modifier: i32) -> CriticalHit {
    if luck < 0 {
        return CriticalHit::Disabled;
    }
    let hit = base
        .saturating_sub(crit_range_reduction(luck))
        .saturating_add(modifier);
    CriticalHit::Range(hit.clamp(CRITICAL_HIT_MIN, CRITICAL_HIT_MAX))
}

pub fn critical_fail_range(base: i32, modifier: i32) -> i32 {
    base.saturating_add(modifier).max(CRITICAL_FAIL_MIN)
}

pub fn format_critical_fail(value: i32) -> String {
    format!("<{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_luck_disables() {
        let hit = critical_hit_range(-1, 20, 0);
        assert_eq!(hit, CriticalHit::Disabled);
        assert_eq!(hit.to_attr_string(), "0");
    }

    #[test]
    fn stored_range_reports_whether_crits_are_enabled() {
        assert!(critical_hit_enabled(">19"));
        assert!(critical_hit_enabled(""));
        assert!(!critical_hit_enabled(&CriticalHit::Disabled.to_attr_string()));
    }

    #[test]
    fn luck_reduces_threshold() {
        assert_eq!(critical_hit_range(0, 20, 0), CriticalHit::Range(20));
        assert_eq!(critical_hit_range(6, 20, 0), CriticalHit::Range(19));
        assert_eq!(critical_hit_range(12, 20, 0), CriticalHit::Range(18));
        assert_eq!(critical_hit_range(12, 20, -1).to_attr_string(), ">17");
    }

    #[test]
    fn hit_always_within_bounds() {
        for luck in -5..=20 {
            for base in 0..=25 {
                for modifier in -6..=6 {
                    match critical_hit_range(luck, base, modifier) {
                        CriticalHit::Disabled => assert!(luck < 0),
                        CriticalHit::Range(n) => {
                            assert!((CRITICAL_HIT_MIN..=CRITICAL_HIT_MAX).contains(&n))
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn fail_never_below_one() {
        assert_eq!(critical_fail_range(1, 0), 1);
        assert_eq!(critical_fail_range(1, -3), 1);
        assert_eq!(critical_fail_range(1, 2), 3);
        assert_eq!(format_critical_fail(critical_fail_range(2, 0)), "<2");
    }

    #[test]
    fn extreme_inputs_clamp_instead_of_overflowing() {
        assert_eq!(critical_hit_range(0, i32::MAX, 1), CriticalHit::Range(20));
        assert_eq!(critical_hit_range(12, i32::MIN, -1), CriticalHit::Range(16));
        assert_eq!(critical_hit_range(i32::MAX, 20, i32::MAX), CriticalHit::Range(20));
        assert_eq!(critical_hit_range(i32::MIN, i32::MAX, 0), CriticalHit::Disabled);

        assert_eq!(critical_fail_range(i32::MAX, 1), i32::MAX);
        assert_eq!(critical_fail_range(i32::MIN, -1), 1);
        assert_eq!(critical_fail_range(1, i32::MIN), 1);
    }
}
