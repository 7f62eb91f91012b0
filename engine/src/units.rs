use serde::{Deserialize, Serialize};

/// Axial hex coordinate. Adjacency and facing semantics live behind the
/// rules-query seam; this crate only passes positions through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Lawful,
    #[default]
    Neutral,
    Chaotic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Range {
    Melee,
    Ranged,
}

/// How a damage-modifier special changes the base damage of its weapon.
/// `Multiply` is a percentage (150 = +50%). All modifiers are resolved into a
/// single flat damage value before any simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageModifier {
    Add(i32),
    Multiply(i32),
    Set(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    /// Forces the engagement to run for many rounds instead of one.
    Berserk,
    /// Holder strikes before the opponent regardless of who attacked.
    Firststrike,
    /// Blow count scales linearly with current hp between the two bounds.
    Swarm { min_blows: i32, max_blows: i32 },
    /// Heals the striker on a damaging hit.
    Drain { percent: i32, constant: i32 },
    /// A hit halves the target's damage for the rest of the fight.
    Slow,
    /// A hit leaves the target poisoned (damage-over-time happens elsewhere).
    Poison,
    /// A killing hit petrifies the target instead of slaying it.
    Petrify,
    /// A killing hit converts the target into `unit_type`.
    Plague { unit_type: String },
    /// Damage doubles when the positional backstab condition holds.
    Backstab,
    /// Weapon cannot currently be used.
    Disable,
    /// Flat damage modifier (resolved before simulation).
    Damage(DamageModifier),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Weapon {
    pub name: String,
    pub damage: i32,
    pub strikes: i32,
    pub range: Range,
    /// Added to the chance to hit, after terrain defense.
    #[serde(default)]
    pub accuracy: i32,
    #[serde(default)]
    pub specials: Vec<Special>,
}

impl Weapon {
    pub fn is_disabled(&self) -> bool {
        self.specials.iter().any(|s| matches!(s, Special::Disable))
    }

    pub fn has_berserk(&self) -> bool {
        self.specials.iter().any(|s| matches!(s, Special::Berserk))
    }

    pub fn has_firststrike(&self) -> bool {
        self.specials.iter().any(|s| matches!(s, Special::Firststrike))
    }

    pub fn has_backstab(&self) -> bool {
        self.specials.iter().any(|s| matches!(s, Special::Backstab))
    }

    pub fn slows(&self) -> bool {
        self.specials.iter().any(|s| matches!(s, Special::Slow))
    }

    pub fn poisons(&self) -> bool {
        self.specials.iter().any(|s| matches!(s, Special::Poison))
    }

    pub fn petrifies(&self) -> bool {
        self.specials.iter().any(|s| matches!(s, Special::Petrify))
    }

    /// `(percent, constant)` of the drain special, if present.
    pub fn drain(&self) -> Option<(i32, i32)> {
        self.specials.iter().find_map(|s| match s {
            Special::Drain { percent, constant } => Some((*percent, *constant)),
            _ => None,
        })
    }

    /// `(min_blows, max_blows)` of the swarm special, if present.
    pub fn swarm(&self) -> Option<(i32, i32)> {
        self.specials.iter().find_map(|s| match s {
            Special::Swarm {
                min_blows,
                max_blows,
            } => Some((*min_blows, *max_blows)),
            _ => None,
        })
    }

    pub fn plague(&self) -> Option<&str> {
        self.specials.iter().find_map(|s| match s {
            Special::Plague { unit_type } => Some(unit_type.as_str()),
            _ => None,
        })
    }

    pub fn damage_modifiers(&self) -> impl Iterator<Item = DamageModifier> + '_ {
        self.specials.iter().filter_map(|s| match s {
            Special::Damage(m) => Some(*m),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Unit {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub fearless: bool,
    /// Pre-existing statuses at battle start.
    #[serde(default)]
    pub poisoned: bool,
    #[serde(default)]
    pub slowed: bool,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
}

impl Unit {
    pub fn weapon(&self, index: usize) -> Option<&Weapon> {
        self.weapons.get(index)
    }
}
