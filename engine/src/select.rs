use std::cell::OnceCell;

use tracing::debug;

use crate::prediction::{FightOutcome, HpDistribution, SideOutcome, predict};
use crate::resolve::resolve_stats;
use crate::rules::RulesQuery;
use crate::stats::CombatantStats;
use crate::units::{Hex, Unit};

/// One attacker/defender weapon pairing, with its fight outcome computed
/// lazily on first access and shared by callers asking for both sides.
#[derive(Debug, Clone)]
pub struct Engagement {
    attacker: CombatantStats,
    defender: CombatantStats,
    prior_defender: Option<HpDistribution>,
    outcome: OnceCell<FightOutcome>,
}

impl Engagement {
    /// Build from pre-resolved stats. This is the caching entry point: a
    /// planner that re-uses one unit's stats across many hypothetical
    /// engagements owns those stats and hands in clones.
    pub fn from_stats(
        attacker: CombatantStats,
        defender: CombatantStats,
        prior_defender: Option<HpDistribution>,
    ) -> Self {
        Self {
            attacker,
            defender,
            prior_defender,
            outcome: OnceCell::new(),
        }
    }

    /// Build from raw game state. `attacker_weapon`/`defender_weapon` of
    /// `None` mean "pick the best", using `harm_weight` for the attacker's
    /// ranking.
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: RulesQuery>(
        attacker: &Unit,
        attacker_at: Hex,
        attacker_weapon: Option<usize>,
        defender: &Unit,
        defender_at: Hex,
        defender_weapon: Option<usize>,
        harm_weight: f64,
        prior_defender: Option<&HpDistribution>,
        rules: &R,
    ) -> Self {
        let attacker_weapon = match attacker_weapon {
            Some(i) => Some(i),
            None => {
                match choose_attacker_weapon(
                    attacker,
                    attacker_at,
                    defender,
                    defender_at,
                    harm_weight,
                    prior_defender,
                    rules,
                ) {
                    Some((_, engagement)) => return engagement,
                    None => None,
                }
            }
        };
        let defender_weapon = attacker_weapon.and_then(|i| {
            defender_weapon.or_else(|| {
                choose_defender_weapon(
                    attacker,
                    attacker_at,
                    defender,
                    defender_at,
                    i,
                    prior_defender,
                    rules,
                )
            })
        });
        let a_stats = resolve_stats(
            attacker,
            attacker_at,
            attacker_weapon,
            defender,
            defender_at,
            defender_weapon.and_then(|i| defender.weapon(i)),
            true,
            rules,
        );
        let d_stats = resolve_stats(
            defender,
            defender_at,
            defender_weapon,
            attacker,
            attacker_at,
            attacker_weapon.and_then(|i| attacker.weapon(i)),
            false,
            rules,
        );
        Self::from_stats(a_stats, d_stats, prior_defender.cloned())
    }

    pub fn attacker_stats(&self) -> &CombatantStats {
        &self.attacker
    }

    pub fn defender_stats(&self) -> &CombatantStats {
        &self.defender
    }

    pub fn outcome(&self) -> &FightOutcome {
        self.outcome
            .get_or_init(|| predict(&self.attacker, &self.defender, self.prior_defender.as_ref()))
    }

    pub fn attacker_outcome(&self) -> &SideOutcome {
        &self.outcome().attacker
    }

    pub fn defender_outcome(&self) -> &SideOutcome {
        &self.outcome().defender
    }

    /// Expected hp the defender loses (its starting mean minus its final
    /// mean, prior distribution included).
    pub fn expected_inflicted(&self) -> f64 {
        let start = match &self.prior_defender {
            Some(prior) => prior.expected_hp(),
            None => f64::from(self.defender.hp.clamp(0, self.defender.max_hp)),
        };
        start - self.defender_outcome().dist.expected_hp()
    }

    /// Expected hp the attacker loses (negative when drain heals past the
    /// starting value on average).
    pub fn expected_taken(&self) -> f64 {
        f64::from(self.attacker.hp.clamp(0, self.attacker.max_hp))
            - self.attacker_outcome().dist.expected_hp()
    }

    /// Attacker-side rating: inflicted minus `harm_weight` times taken.
    /// `harm_weight` 0 is pure aggression, 1 weighs own losses equally.
    pub fn rating(&self, harm_weight: f64) -> f64 {
        self.expected_inflicted() - harm_weight * self.expected_taken()
    }

    /// Whether this engagement is strictly preferable for the attacker over
    /// `other`. Ties rank neither above the other, so first-enumerated wins.
    pub fn better_attack(&self, other: &Engagement, harm_weight: f64) -> bool {
        better_combat(self, other, harm_weight)
    }
}

/// Compare two already-simulated engagements for the attacker; usable across
/// different attacker/defender pairs, not just weapon choices on one pair.
pub fn better_combat(a: &Engagement, b: &Engagement, harm_weight: f64) -> bool {
    a.rating(harm_weight) > b.rating(harm_weight)
}

/// Pick the attacker's best weapon against `defender`, pairing each candidate
/// with the defender's best counter and ranking by expected value under
/// `harm_weight`. Returns the weapon index and its simulated engagement, or
/// `None` when no weapon is usable.
pub fn choose_attacker_weapon<R: RulesQuery>(
    attacker: &Unit,
    attacker_at: Hex,
    defender: &Unit,
    defender_at: Hex,
    harm_weight: f64,
    prior_defender: Option<&HpDistribution>,
    rules: &R,
) -> Option<(usize, Engagement)> {
    let mut best: Option<(usize, Engagement, f64)> = None;
    for (i, weapon) in attacker.weapons.iter().enumerate() {
        if weapon.is_disabled() {
            continue;
        }
        let counter = choose_defender_weapon(
            attacker,
            attacker_at,
            defender,
            defender_at,
            i,
            prior_defender,
            rules,
        );
        let a_stats = resolve_stats(
            attacker,
            attacker_at,
            Some(i),
            defender,
            defender_at,
            counter.and_then(|c| defender.weapon(c)),
            true,
            rules,
        );
        let d_stats = resolve_stats(
            defender,
            defender_at,
            counter,
            attacker,
            attacker_at,
            Some(weapon),
            false,
            rules,
        );
        let engagement = Engagement::from_stats(a_stats, d_stats, prior_defender.cloned());
        let score = engagement.rating(harm_weight);
        debug!(weapon = %weapon.name, counter = ?counter, score, "attack candidate");
        if best.as_ref().is_none_or(|(_, _, s)| score > *s) {
            best = Some((i, engagement, score));
        }
    }
    best.map(|(i, engagement, _)| (i, engagement))
}

/// Pick the defender's counter-weapon against a specific attacking weapon:
/// only weapons at the attacking range qualify, and the pick minimizes the
/// defender's expected net loss. `None` is the legal cannot-retaliate state.
pub fn choose_defender_weapon<R: RulesQuery>(
    attacker: &Unit,
    attacker_at: Hex,
    defender: &Unit,
    defender_at: Hex,
    attacker_weapon: usize,
    prior_defender: Option<&HpDistribution>,
    rules: &R,
) -> Option<usize> {
    let attack = attacker.weapon(attacker_weapon)?;
    let mut best: Option<(usize, f64)> = None;
    for (i, weapon) in defender.weapons.iter().enumerate() {
        if weapon.is_disabled() || weapon.range != attack.range {
            continue;
        }
        let a_stats = resolve_stats(
            attacker,
            attacker_at,
            Some(attacker_weapon),
            defender,
            defender_at,
            Some(weapon),
            true,
            rules,
        );
        let d_stats = resolve_stats(
            defender,
            defender_at,
            Some(i),
            attacker,
            attacker_at,
            Some(attack),
            false,
            rules,
        );
        let engagement = Engagement::from_stats(a_stats, d_stats, prior_defender.cloned());
        // Negated net loss from the defender's side: hp it expects to give
        // back minus hp it expects to lose. Maximizing this minimizes loss.
        let score = engagement.expected_taken() - engagement.expected_inflicted();
        debug!(weapon = %weapon.name, score, "retaliation candidate");
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}
