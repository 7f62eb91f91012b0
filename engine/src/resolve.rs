use tracing::debug;

use crate::rules::RulesQuery;
use crate::stats::{BERSERK_ROUNDS, CombatantStats, round_damage, swarm_blows};
use crate::units::{DamageModifier, Hex, Unit, Weapon};

/// Resolve the flat combat parameters for one side of an engagement.
///
/// `weapon` is the index into `unit`'s weapon list, or `None` for a side that
/// cannot fight back (it still takes blows). `opponent_weapon` matters for
/// berserk, which extends the engagement regardless of which side carries it.
///
/// Pure function of its inputs: resolving twice from identical state yields
/// identical records.
pub fn resolve_stats<R: RulesQuery>(
    unit: &Unit,
    at: Hex,
    weapon: Option<usize>,
    opponent: &Unit,
    opponent_at: Hex,
    opponent_weapon: Option<&Weapon>,
    is_attacker: bool,
    rules: &R,
) -> CombatantStats {
    // Out-of-range hp is a caller bug; clamp rather than propagate it into
    // the probability tables.
    let hp = unit.hp.clamp(0, unit.max_hp);
    let rounds = if weapon.and_then(|i| unit.weapon(i)).is_some_and(Weapon::has_berserk)
        || opponent_weapon.is_some_and(Weapon::has_berserk)
    {
        BERSERK_ROUNDS
    } else {
        1
    };

    let Some(w) = weapon.and_then(|i| unit.weapon(i)) else {
        return CombatantStats::unarmed(hp, unit.max_hp, is_attacker, rounds);
    };

    let disable = w.is_disabled();
    let backstab_pos = is_attacker && w.has_backstab() && rules.backstab(at, opponent_at);
    let damage = resolve_damage(unit, at, w, opponent, backstab_pos, is_attacker, rules);
    // Half rounded up, always from the unslowed value so slows never compound.
    let slow_damage = (damage + 1) / 2;
    let damage = if unit.slowed { slow_damage } else { damage };

    let chance_to_hit =
        (100 - rules.defense(opponent, opponent_at) + w.accuracy).clamp(0, 100);

    let swarm = w.swarm();
    // Zeroed bounds for a disabled weapon keep the simulation from ever
    // recomputing blows back above zero.
    let (swarm_min, swarm_max) = if disable {
        (0, 0)
    } else {
        swarm.unwrap_or((w.strikes, w.strikes))
    };
    let num_blows = swarm_blows(swarm_min, swarm_max, hp, unit.max_hp);

    let (drain_percent, drain_constant) = w.drain().unwrap_or((0, 0));

    let stats = CombatantStats {
        weapon,
        is_attacker,
        hp,
        max_hp: unit.max_hp,
        damage,
        slow_damage,
        chance_to_hit,
        num_blows,
        swarm_min,
        swarm_max,
        rounds,
        slows: w.slows(),
        drains: w.drain().is_some(),
        petrifies: w.petrifies(),
        plagues: w.plague().is_some(),
        poisons: w.poisons(),
        backstab_pos,
        swarm: swarm.is_some(),
        firststrike: w.has_firststrike(),
        disable,
        is_poisoned: unit.poisoned,
        is_slowed: unit.slowed,
        drain_percent,
        drain_constant,
        plague_type: w.plague().map(str::to_owned),
    };
    debug!(
        unit = %unit.name,
        weapon = %w.name,
        damage = stats.damage,
        blows = stats.num_blows,
        chance = stats.chance_to_hit,
        "resolved combatant"
    );
    stats
}

/// Collapse weapon specials, backstab and the combined percentage modifiers
/// (resistance x time of day x leadership) into one per-blow damage value.
fn resolve_damage<R: RulesQuery>(
    unit: &Unit,
    at: Hex,
    weapon: &Weapon,
    opponent: &Unit,
    backstab_pos: bool,
    is_attacker: bool,
    rules: &R,
) -> i32 {
    // Specials first: last `set` replaces the base, `add`s sum, `multiply`
    // percentages compound.
    let mut base = weapon.damage;
    let mut adds = 0;
    let mut mult: i64 = 100;
    for modifier in weapon.damage_modifiers() {
        match modifier {
            DamageModifier::Set(v) => base = v,
            DamageModifier::Add(v) => adds += v,
            DamageModifier::Multiply(p) => mult = mult * i64::from(p) / 100,
        }
    }
    let mut damage = ((i64::from(base + adds) * mult) / 100).max(0) as i32;

    if backstab_pos {
        damage *= 2;
    }

    // One combined percentage: opponent resistance times the additive time of
    // day and leadership bonuses.
    let resistance = rules.resistance(opponent, weapon, !is_attacker);
    let tod = rules.time_of_day_bonus(unit);
    let leadership = rules.leadership_bonus(unit, at);
    round_damage(damage, resistance * (100 + tod + leadership), 10_000)
}
