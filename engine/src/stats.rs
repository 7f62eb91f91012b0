use serde::{Deserialize, Serialize};

/// Round cap while berserk is in effect. Changing this changes game balance,
/// not just implementation.
pub const BERSERK_ROUNDS: u32 = 30;

/// Flat combat parameters for one side of an engagement, fully resolved from
/// unit, weapon, terrain and time-of-day state. Immutable once built; the
/// simulation only ever reads these numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CombatantStats {
    /// Index into the owning unit's weapon list; `None` means this side
    /// cannot fight back.
    pub weapon: Option<usize>,
    pub is_attacker: bool,
    pub hp: i32,
    pub max_hp: i32,
    /// Per-blow damage at battle start (already halved if starting slowed).
    pub damage: i32,
    /// Per-blow damage once slowed, derived from the unslowed value so
    /// repeated slows never compound.
    pub slow_damage: i32,
    /// Integer percentage in [0, 100].
    pub chance_to_hit: i32,
    /// Blow count at the current hp.
    pub num_blows: i32,
    /// Swarm bounds used to recompute blows when hp changes mid-battle.
    /// Equal to `num_blows` on both ends when swarm is inactive.
    pub swarm_min: i32,
    pub swarm_max: i32,
    /// Full exchanges to simulate: 1, or [`BERSERK_ROUNDS`] under berserk.
    pub rounds: u32,
    pub slows: bool,
    pub drains: bool,
    pub petrifies: bool,
    pub plagues: bool,
    pub poisons: bool,
    pub backstab_pos: bool,
    pub swarm: bool,
    pub firststrike: bool,
    pub disable: bool,
    pub is_poisoned: bool,
    pub is_slowed: bool,
    pub drain_percent: i32,
    pub drain_constant: i32,
    pub plague_type: Option<String>,
}

impl CombatantStats {
    /// Stats for a side with no usable weapon. Not an error: the simulation
    /// consumes this as a first-class cannot-fight state.
    pub fn unarmed(hp: i32, max_hp: i32, is_attacker: bool, rounds: u32) -> Self {
        let hp = hp.clamp(0, max_hp);
        Self {
            weapon: None,
            is_attacker,
            hp,
            max_hp,
            damage: 0,
            slow_damage: 0,
            chance_to_hit: 0,
            num_blows: 0,
            swarm_min: 0,
            swarm_max: 0,
            rounds,
            slows: false,
            drains: false,
            petrifies: false,
            plagues: false,
            poisons: false,
            backstab_pos: false,
            swarm: false,
            firststrike: false,
            disable: false,
            is_poisoned: false,
            is_slowed: false,
            drain_percent: 0,
            drain_constant: 0,
            plague_type: None,
        }
    }

    /// Blow count at `hp`, from the swarm bounds.
    pub fn blows_at(&self, hp: i32) -> i32 {
        swarm_blows(self.swarm_min, self.swarm_max, hp, self.max_hp)
    }

    /// Healing gained by this side from one damaging blow of `damage`.
    pub fn drain_amount(&self, damage: i32) -> i32 {
        if !self.drains || damage <= 0 {
            return 0;
        }
        if self.drain_percent == 0 && self.drain_constant == 0 {
            return 0;
        }
        (self.drain_constant + damage * self.drain_percent / 100).clamp(0, damage)
    }
}

/// Blow count interpolated linearly between the swarm bounds by hp fraction.
/// Integer floor division throughout: the exact values feed expected-damage
/// comparisons and must not drift.
pub fn swarm_blows(min_blows: i32, max_blows: i32, hp: i32, max_hp: i32) -> i32 {
    if max_hp <= 0 || hp >= max_hp {
        max_blows
    } else if max_blows < min_blows {
        min_blows - (min_blows - max_blows) * hp / max_hp
    } else {
        min_blows + (max_blows - min_blows) * hp / max_hp
    }
}

/// Scale `base` damage by `numerator/denominator` percent-style, rounding
/// half up, without ever dropping nonzero damage to zero.
pub fn round_damage(base: i32, numerator: i32, denominator: i32) -> i32 {
    if base == 0 {
        return 0;
    }
    let scaled =
        (i64::from(base) * i64::from(numerator) + i64::from(denominator) / 2) / i64::from(denominator);
    scaled.max(1) as i32
}
