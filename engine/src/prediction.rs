use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::stats::CombatantStats;

/// Hp a petrified victim is held at: the sentinel keeps the statue out of the
/// death bucket while the `petrified` scalar carries the real story.
const PETRIFIED_HP: i32 = 1;

/// Exact probability mass function over post-engagement hitpoints.
/// Index 0 is death. `untouched` is the mass of outcomes where this side was
/// never hit; it is not re-derivable from the array once drain can push hp
/// back above the pre-battle value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HpDistribution {
    pub probs: Vec<f64>,
    pub untouched: f64,
}

impl HpDistribution {
    pub fn point_mass(hp: i32, max_hp: i32) -> Self {
        let max_hp = max_hp.max(0);
        let mut probs = vec![0.0; max_hp as usize + 1];
        probs[hp.clamp(0, max_hp) as usize] = 1.0;
        Self {
            probs,
            untouched: 1.0,
        }
    }

    pub fn chance_of(&self, hp: i32) -> f64 {
        usize::try_from(hp)
            .ok()
            .and_then(|i| self.probs.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn death_chance(&self) -> f64 {
        self.probs[0]
    }

    pub fn expected_hp(&self) -> f64 {
        self.probs
            .iter()
            .enumerate()
            .map(|(hp, p)| hp as f64 * p)
            .sum()
    }

    /// Should be 1.0 within floating-point tolerance; exposed so callers and
    /// tests can assert the branching stayed exhaustive.
    pub fn total_mass(&self) -> f64 {
        self.probs.iter().sum()
    }
}

/// One side's view of a finished engagement: the hp distribution plus the
/// status probabilities carried alongside it (not encoded in the hp index).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SideOutcome {
    pub dist: HpDistribution,
    /// Mass of outcomes leaving this side alive and poisoned.
    pub poisoned: f64,
    /// Mass of outcomes leaving this side alive and slowed.
    pub slowed: f64,
    /// Mass of outcomes where this side was petrified.
    pub petrified: f64,
    /// Mass of outcomes where this side died to a plague weapon and converts
    /// instead of dying outright.
    pub plagued: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FightOutcome {
    pub attacker: SideOutcome,
    pub defender: SideOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Side {
    Attacker,
    Defender,
}

/// Joint state of one probability branch. Merging identical branches in the
/// state maps is the memoization that keeps the walk tractable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Branch {
    a_hp: i32,
    d_hp: i32,
    a_slowed: bool,
    d_slowed: bool,
    a_touched: bool,
    d_touched: bool,
    a_petrified: bool,
    d_petrified: bool,
    a_plagued: bool,
    d_plagued: bool,
}

impl Branch {
    /// A settled branch takes no further part in the exchange: one side is
    /// dead or petrified, so no blow can move hp again.
    fn settled(&self) -> bool {
        self.a_hp == 0 || self.d_hp == 0 || self.a_petrified || self.d_petrified
    }
}

/// Compute the exact post-engagement hp distributions for both sides.
///
/// `prior_defender`, when supplied, seeds the defender's starting hp from an
/// earlier attack in the same turn instead of a point mass.
pub fn predict(
    attacker: &CombatantStats,
    defender: &CombatantStats,
    prior_defender: Option<&HpDistribution>,
) -> FightOutcome {
    let a_hp = attacker.hp.clamp(0, attacker.max_hp);
    let seed = Branch {
        a_hp,
        d_hp: 0,
        a_slowed: attacker.is_slowed,
        d_slowed: defender.is_slowed,
        a_touched: false,
        d_touched: false,
        a_petrified: false,
        d_petrified: false,
        a_plagued: false,
        d_plagued: false,
    };

    let mut live: IndexMap<Branch, f64> = IndexMap::new();
    let mut done: IndexMap<Branch, f64> = IndexMap::new();
    let mut insert = |branch: Branch, p: f64, live: &mut IndexMap<Branch, f64>, done: &mut IndexMap<Branch, f64>| {
        let slot = if branch.settled() { done } else { live };
        *slot.entry(branch).or_insert(0.0) += p;
    };
    match prior_defender {
        None => {
            let branch = Branch {
                d_hp: defender.hp.clamp(0, defender.max_hp),
                ..seed
            };
            insert(branch, 1.0, &mut live, &mut done);
        }
        Some(prior) => {
            for (hp, p) in prior.probs.iter().enumerate() {
                if *p > 0.0 {
                    let branch = Branch {
                        d_hp: (hp as i32).clamp(0, defender.max_hp),
                        ..seed
                    };
                    insert(branch, *p, &mut live, &mut done);
                }
            }
        }
    }

    let rounds = attacker.rounds.max(defender.rounds);
    for round in 0..rounds {
        if live.is_empty() {
            break;
        }
        live = fight_round(attacker, defender, live, &mut done);
        trace!(round, live = live.len(), settled = done.len(), "round complete");
    }
    for (branch, p) in live {
        *done.entry(branch).or_insert(0.0) += p;
    }

    FightOutcome {
        attacker: marginalize(&done, Side::Attacker, attacker, defender),
        defender: marginalize(&done, Side::Defender, defender, attacker),
    }
}

/// After `just_struck` swings, the opponent takes over if it has blows left,
/// otherwise the same side keeps swinging.
fn next_side(just_struck: Side, a_left: i32, d_left: i32) -> Side {
    match just_struck {
        Side::Attacker if d_left > 0 => Side::Defender,
        Side::Attacker => Side::Attacker,
        Side::Defender if a_left > 0 => Side::Attacker,
        Side::Defender => Side::Defender,
    }
}

/// One full exchange: blow counts fixed per branch at round start from the
/// swarm bounds and live hp, then blow-by-blow hit/miss branching in strike
/// order until every branch has spent its blows or settled.
fn fight_round(
    attacker: &CombatantStats,
    defender: &CombatantStats,
    live: IndexMap<Branch, f64>,
    done: &mut IndexMap<Branch, f64>,
) -> IndexMap<Branch, f64> {
    let first = if defender.firststrike && !attacker.firststrike {
        Side::Defender
    } else {
        Side::Attacker
    };

    // In-round key: branch, blows left per side, and whose swing is next.
    let mut work: IndexMap<(Branch, i32, i32, Side), f64> = IndexMap::new();
    let mut out: IndexMap<Branch, f64> = IndexMap::new();

    for (branch, p) in live {
        let a_left = attacker.blows_at(branch.a_hp).max(0);
        let d_left = defender.blows_at(branch.d_hp).max(0);
        if a_left == 0 && d_left == 0 {
            *out.entry(branch).or_insert(0.0) += p;
            continue;
        }
        let turn = match first {
            Side::Attacker if a_left > 0 => Side::Attacker,
            Side::Defender if d_left > 0 => Side::Defender,
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        };
        *work.entry((branch, a_left, d_left, turn)).or_insert(0.0) += p;
    }

    // Every step spends exactly one blow, so equal-depth states merge.
    while !work.is_empty() {
        let mut next: IndexMap<(Branch, i32, i32, Side), f64> = IndexMap::new();
        for ((branch, a_left, d_left, turn), p) in work {
            let striker = match turn {
                Side::Attacker => attacker,
                Side::Defender => defender,
            };
            let (a_left, d_left) = match turn {
                Side::Attacker => (a_left - 1, d_left),
                Side::Defender => (a_left, d_left - 1),
            };
            let follow = next_side(turn, a_left, d_left);
            let p_hit = f64::from(striker.chance_to_hit) / 100.0;

            let mut push = |branch: Branch, p: f64, next: &mut IndexMap<(Branch, i32, i32, Side), f64>| {
                if branch.settled() {
                    *done.entry(branch).or_insert(0.0) += p;
                } else if a_left == 0 && d_left == 0 {
                    *out.entry(branch).or_insert(0.0) += p;
                } else {
                    *next.entry((branch, a_left, d_left, follow)).or_insert(0.0) += p;
                }
            };

            if p_hit < 1.0 {
                push(branch, p * (1.0 - p_hit), &mut next);
            }
            if p_hit > 0.0 {
                push(landed_blow(turn, striker, branch), p * p_hit, &mut next);
            }
        }
        work = next;
    }
    out
}

/// Branch state after `side` lands one blow: damage (slowed value when the
/// striker's branch says so), drain, slow/touch flags, and terminal effects
/// once the target reaches 0.
fn landed_blow(side: Side, striker: &CombatantStats, branch: Branch) -> Branch {
    let mut hit = branch;
    match side {
        Side::Attacker => {
            let dmg = if branch.a_slowed {
                striker.slow_damage
            } else {
                striker.damage
            };
            hit.d_hp = (branch.d_hp - dmg).max(0);
            hit.d_touched = true;
            if striker.slows {
                hit.d_slowed = true;
            }
            hit.a_hp = (branch.a_hp + striker.drain_amount(dmg)).min(striker.max_hp);
            if hit.d_hp == 0 {
                if striker.petrifies {
                    hit.d_petrified = true;
                    hit.d_hp = PETRIFIED_HP;
                } else if striker.plagues {
                    hit.d_plagued = true;
                }
            }
        }
        Side::Defender => {
            let dmg = if branch.d_slowed {
                striker.slow_damage
            } else {
                striker.damage
            };
            hit.a_hp = (branch.a_hp - dmg).max(0);
            hit.a_touched = true;
            if striker.slows {
                hit.a_slowed = true;
            }
            hit.d_hp = (branch.d_hp + striker.drain_amount(dmg)).min(striker.max_hp);
            if hit.a_hp == 0 {
                if striker.petrifies {
                    hit.a_petrified = true;
                    hit.a_hp = PETRIFIED_HP;
                } else if striker.plagues {
                    hit.a_plagued = true;
                }
            }
        }
    }
    hit
}

fn marginalize(
    done: &IndexMap<Branch, f64>,
    side: Side,
    own: &CombatantStats,
    opponent: &CombatantStats,
) -> SideOutcome {
    let max_hp = own.max_hp.max(0);
    let mut probs = vec![0.0; max_hp as usize + 1];
    let mut untouched = 0.0;
    let mut poisoned = 0.0;
    let mut slowed = 0.0;
    let mut petrified = 0.0;
    let mut plagued = 0.0;

    for (branch, p) in done {
        let (hp, is_slowed, touched, is_petrified, is_plagued) = match side {
            Side::Attacker => (
                branch.a_hp,
                branch.a_slowed,
                branch.a_touched,
                branch.a_petrified,
                branch.a_plagued,
            ),
            Side::Defender => (
                branch.d_hp,
                branch.d_slowed,
                branch.d_touched,
                branch.d_petrified,
                branch.d_plagued,
            ),
        };
        probs[hp.clamp(0, max_hp) as usize] += p;
        if !touched {
            untouched += p;
        }
        if is_petrified {
            petrified += p;
        }
        if is_plagued {
            plagued += p;
        }
        let alive = hp > 0 && !is_petrified;
        if alive && is_slowed {
            slowed += p;
        }
        if alive && (own.is_poisoned || (touched && opponent.poisons)) {
            poisoned += p;
        }
    }

    SideOutcome {
        dist: HpDistribution { probs, untouched },
        poisoned,
        slowed,
        petrified,
        plagued,
    }
}
