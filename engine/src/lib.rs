//! Exact combat outcome prediction for two-unit engagements.
//!
//! Raw unit/weapon/battlefield state is flattened into [`CombatantStats`],
//! fed through an exact dynamic-programming simulation of the exchange
//! ([`predict`]), and ranked by the weapon-selection layer ([`Engagement`]).
//! Everything is deterministic, in-memory arithmetic: the same inputs always
//! yield the same distributions, so UI previews and AI planning agree.

pub mod content;
pub mod prediction;
pub mod resolve;
pub mod rules;
pub mod scenario;
pub mod select;
pub mod stats;
pub mod units;

pub use prediction::{FightOutcome, HpDistribution, SideOutcome, predict};
pub use resolve::resolve_stats;
pub use rules::{RulesQuery, SideModifiers, StaticRules};
pub use scenario::{Placed, Scenario, ScenarioError, load_scenario};
pub use select::{Engagement, better_combat, choose_attacker_weapon, choose_defender_weapon};
pub use stats::{BERSERK_ROUNDS, CombatantStats, round_damage, swarm_blows};
pub use units::{Alignment, DamageModifier, Hex, Range, Special, Unit, Weapon};
