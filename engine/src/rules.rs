use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::units::{Hex, Unit, Weapon};

/// Read-only query surface over the battlefield rule system (abilities,
/// terrain, time of day, rosters). The combat core never answers these
/// questions itself; it aggregates the percentages it gets back.
///
/// Every method takes its full context explicitly; nothing is stashed on the
/// weapon between calls, so the same weapon can be queried for many
/// hypothetical engagements in a row.
pub trait RulesQuery {
    /// Damage multiplier percent applied to blows from `weapon` landing on
    /// `unit` (100 = neutral, below 100 resistant, above 100 vulnerable).
    /// `unit_is_attacker` distinguishes attack and retaliation resistances.
    fn resistance(&self, unit: &Unit, weapon: &Weapon, unit_is_attacker: bool) -> i32;

    /// Time-of-day damage bonus percent for `unit` (negative for a lawful
    /// unit at night, and so on). Implementations handle the fearless flag.
    fn time_of_day_bonus(&self, unit: &Unit) -> i32;

    /// Leadership damage bonus percent from an adjacent higher-level leader.
    fn leadership_bonus(&self, unit: &Unit, at: Hex) -> i32;

    /// Terrain defense percent of `unit` standing at `at`: its chance to be
    /// missed before weapon accuracy.
    fn defense(&self, unit: &Unit, at: Hex) -> i32;

    /// Whether the positional backstab condition holds for an attacker at
    /// `attacker_at` striking a defender at `defender_at`.
    fn backstab(&self, attacker_at: Hex, defender_at: Hex) -> bool;
}

fn neutral_resistance() -> i32 {
    100
}

/// Per-unit modifier block for [`StaticRules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SideModifiers {
    /// Incoming-damage multiplier percent against any weapon.
    #[serde(default = "neutral_resistance")]
    pub resistance: i32,
    /// Time-of-day damage bonus percent (before the fearless clamp).
    #[serde(default)]
    pub time_of_day: i32,
    /// Leadership damage bonus percent.
    #[serde(default)]
    pub leadership: i32,
    /// Terrain defense percent at the unit's hex.
    #[serde(default)]
    pub defense: i32,
}

impl Default for SideModifiers {
    fn default() -> Self {
        Self {
            resistance: 100,
            time_of_day: 0,
            leadership: 0,
            defense: 0,
        }
    }
}

/// Flat-percentage rules, keyed by unit name. Enough for scenarios, tests and
/// the CLI preview; a real battlefield supplies its own [`RulesQuery`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StaticRules {
    #[serde(default)]
    pub units: IndexMap<String, SideModifiers>,
    /// Whether the positional backstab condition holds for the attacker.
    #[serde(default)]
    pub backstab: bool,
}

impl StaticRules {
    fn side(&self, unit: &Unit) -> SideModifiers {
        self.units.get(&unit.name).copied().unwrap_or_default()
    }
}

impl RulesQuery for StaticRules {
    fn resistance(&self, unit: &Unit, _weapon: &Weapon, _unit_is_attacker: bool) -> i32 {
        self.side(unit).resistance
    }

    fn time_of_day_bonus(&self, unit: &Unit) -> i32 {
        let bonus = self.side(unit).time_of_day;
        if unit.fearless { bonus.max(0) } else { bonus }
    }

    fn leadership_bonus(&self, unit: &Unit, _at: Hex) -> i32 {
        self.side(unit).leadership
    }

    fn defense(&self, unit: &Unit, _at: Hex) -> i32 {
        self.side(unit).defense
    }

    fn backstab(&self, _attacker_at: Hex, _defender_at: Hex) -> bool {
        self.backstab
    }
}
