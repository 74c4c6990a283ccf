//! Pure point-resolution math for ledger logs.
//!
//! A log's value is its action's base points plus the signed value of its
//! modification, if one exists. The default "Bonus"/"Discount" catalog
//! actions carry zero base points, so for ad-hoc grants the modification
//! alone determines the value; for named catalog actions the modification
//! is an adjustment on top of the base.

use serde::{Deserialize, Serialize};

/// Reserved catalog action name for ad-hoc positive grants.
pub const BONUS_ACTION_NAME: &str = "Bonus";

/// Reserved catalog action name for ad-hoc negative grants.
pub const DISCOUNT_ACTION_NAME: &str = "Discount";

/// The two modification kinds. A bonus adds points, a discount removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationKind {
    Bonus,
    Discount,
}

impl std::str::FromStr for ModificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bonus" => Ok(ModificationKind::Bonus),
            "discount" => Ok(ModificationKind::Discount),
            other => Err(format!("unknown modification kind: {other}")),
        }
    }
}

impl ModificationKind {
    /// Kind implied by the sign of an ad-hoc point amount.
    pub fn from_sign(points: i64) -> Self {
        if points >= 0 {
            ModificationKind::Bonus
        } else {
            ModificationKind::Discount
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationKind::Bonus => "bonus",
            ModificationKind::Discount => "discount",
        }
    }
}

/// Signed delta of a modification: `+value` for bonus, `-value` for discount.
pub fn signed_value(kind: ModificationKind, value: i64) -> i64 {
    match kind {
        ModificationKind::Bonus => value,
        ModificationKind::Discount => -value,
    }
}

/// Effective point value of one log occurrence.
///
/// `modification` is `None` when the log has no amendment. The default
/// Bonus/Discount actions have `action_points == 0`, which makes the
/// modification's signed value authoritative for those logs without needing
/// a separate resolution mode.
pub fn effective_points(action_points: i64, modification: Option<(ModificationKind, i64)>) -> i64 {
    action_points
        + modification
            .map(|(kind, value)| signed_value(kind, value))
            .unwrap_or(0)
}
