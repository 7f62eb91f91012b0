use engine::{CombatantStats, Engagement, better_combat, predict, swarm_blows};
use proptest::prelude::*;

fn side(is_attacker: bool) -> impl Strategy<Value = CombatantStats> {
    (
        1..=12i32,
        0..=6i32,
        0..=8i32,
        0..=3i32,
        0..=100i32,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            move |(hp, extra, damage, blows, chance, slows, drains, poisons)| CombatantStats {
                weapon: (blows > 0).then_some(0),
                is_attacker,
                hp,
                max_hp: hp + extra,
                damage,
                slow_damage: (damage + 1) / 2,
                chance_to_hit: chance,
                num_blows: blows,
                swarm_min: blows,
                swarm_max: blows,
                rounds: 1,
                slows,
                drains,
                petrifies: false,
                plagues: false,
                poisons,
                backstab_pos: false,
                swarm: false,
                firststrike: false,
                disable: false,
                is_poisoned: false,
                is_slowed: false,
                drain_percent: if drains { 50 } else { 0 },
                drain_constant: 0,
                plague_type: None,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn distributions_always_sum_to_one(a in side(true), d in side(false)) {
        let outcome = predict(&a, &d, None);
        prop_assert!((outcome.attacker.dist.total_mass() - 1.0).abs() < 1e-6);
        prop_assert!((outcome.defender.dist.total_mass() - 1.0).abs() < 1e-6);
        for p in outcome.defender.dist.probs.iter().chain(outcome.attacker.dist.probs.iter()) {
            prop_assert!(*p >= 0.0 && *p <= 1.0 + 1e-9);
        }
        prop_assert!(outcome.attacker.dist.untouched <= 1.0 + 1e-9);
        prop_assert!(outcome.defender.poisoned <= 1.0 + 1e-9);
    }

    #[test]
    fn prediction_is_deterministic(a in side(true), d in side(false)) {
        prop_assert_eq!(predict(&a, &d, None), predict(&a, &d, None));
    }

    #[test]
    fn swarm_blows_hits_max_at_full_health(min in 0..=6i32, max in 0..=6i32, max_hp in 1..=40i32) {
        prop_assert_eq!(swarm_blows(min, max, max_hp, max_hp), max);
    }

    #[test]
    fn swarm_blows_is_monotonic(min in 0..=6i32, max in 0..=6i32, max_hp in 1..=40i32) {
        let mut last = swarm_blows(min, max, 0, max_hp);
        for hp in 1..=max_hp {
            let next = swarm_blows(min, max, hp, max_hp);
            if max >= min {
                prop_assert!(next >= last);
            } else {
                prop_assert!(next <= last);
            }
            last = next;
        }
    }

    #[test]
    fn better_combat_is_antisymmetric(
        a1 in side(true), d1 in side(false),
        a2 in side(true), d2 in side(false),
        weight in 0.0..=1.0f64,
    ) {
        let e1 = Engagement::from_stats(a1, d1, None);
        let e2 = Engagement::from_stats(a2, d2, None);
        prop_assert!(!(better_combat(&e1, &e2, weight) && better_combat(&e2, &e1, weight)));
        if (e1.rating(weight) - e2.rating(weight)).abs() > 0.0 {
            prop_assert!(better_combat(&e1, &e2, weight) ^ better_combat(&e2, &e1, weight));
        }
    }
}
