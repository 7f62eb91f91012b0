use engine::{
    Alignment, Engagement, Hex, Range, Special, StaticRules, Unit, Weapon, better_combat,
    choose_attacker_weapon, choose_defender_weapon,
};

fn weapon(name: &str, damage: i32, strikes: i32, range: Range, specials: Vec<Special>) -> Weapon {
    Weapon {
        name: name.to_string(),
        damage,
        strikes,
        range,
        accuracy: 0,
        specials,
    }
}

fn unit(name: &str, hp: i32, max_hp: i32, weapons: Vec<Weapon>) -> Unit {
    Unit {
        name: name.to_string(),
        hp,
        max_hp,
        level: 1,
        alignment: Alignment::Neutral,
        fearless: false,
        poisoned: false,
        slowed: false,
        weapons,
    }
}

fn hexes() -> (Hex, Hex) {
    (Hex::new(0, 0), Hex::new(1, 0))
}

#[test]
fn attacker_prefers_the_higher_scoring_weapon() {
    let attacker = unit(
        "fighter",
        20,
        20,
        vec![
            weapon("knife", 2, 1, Range::Melee, vec![]),
            weapon("sword", 10, 1, Range::Melee, vec![]),
        ],
    );
    let defender = unit("dummy", 30, 30, vec![]);
    let (a_at, d_at) = hexes();
    let rules = StaticRules::default();
    let (index, engagement) =
        choose_attacker_weapon(&attacker, a_at, &defender, d_at, 0.5, None, &rules)
            .expect("usable weapon");
    assert_eq!(index, 1);
    assert_eq!(engagement.attacker_stats().damage, 10);
}

#[test]
fn harm_weight_trades_damage_against_risk() {
    // The sword hits harder but eats a 9-damage counter; the bow is safe.
    let attacker = unit(
        "archer",
        20,
        20,
        vec![
            weapon("sword", 8, 1, Range::Melee, vec![]),
            weapon("bow", 4, 1, Range::Ranged, vec![]),
        ],
    );
    let defender = unit("grunt", 30, 30, vec![weapon("axe", 9, 1, Range::Melee, vec![])]);
    let (a_at, d_at) = hexes();
    let rules = StaticRules::default();

    let (aggressive, _) =
        choose_attacker_weapon(&attacker, a_at, &defender, d_at, 0.0, None, &rules).unwrap();
    assert_eq!(aggressive, 0);

    let (careful, engagement) =
        choose_attacker_weapon(&attacker, a_at, &defender, d_at, 1.0, None, &rules).unwrap();
    assert_eq!(careful, 1);
    // No melee retaliation against a bow.
    assert_eq!(engagement.defender_stats().weapon, None);
    assert_eq!(engagement.attacker_outcome().dist.untouched, 1.0);
}

#[test]
fn ties_keep_the_first_enumerated_weapon() {
    let attacker = unit(
        "twin",
        20,
        20,
        vec![
            weapon("left blade", 5, 2, Range::Melee, vec![]),
            weapon("right blade", 5, 2, Range::Melee, vec![]),
        ],
    );
    let defender = unit("dummy", 30, 30, vec![]);
    let (a_at, d_at) = hexes();
    let (index, _) =
        choose_attacker_weapon(&attacker, a_at, &defender, d_at, 0.5, None, &StaticRules::default())
            .unwrap();
    assert_eq!(index, 0);
}

#[test]
fn disabled_weapons_are_never_enumerated() {
    let attacker = unit(
        "saboteur",
        20,
        20,
        vec![
            weapon("broken ballista", 20, 3, Range::Ranged, vec![Special::Disable]),
            weapon("knife", 3, 1, Range::Melee, vec![]),
        ],
    );
    let defender = unit("dummy", 30, 30, vec![]);
    let (a_at, d_at) = hexes();
    let (index, _) =
        choose_attacker_weapon(&attacker, a_at, &defender, d_at, 0.5, None, &StaticRules::default())
            .unwrap();
    assert_eq!(index, 1);
}

#[test]
fn weaponless_attacker_has_no_choice() {
    let attacker = unit("captive", 20, 20, vec![]);
    let defender = unit("dummy", 30, 30, vec![]);
    let (a_at, d_at) = hexes();
    assert!(
        choose_attacker_weapon(&attacker, a_at, &defender, d_at, 0.5, None, &StaticRules::default())
            .is_none()
    );
}

#[test]
fn defender_counter_minimizes_its_net_loss() {
    let attacker = unit("fighter", 20, 20, vec![weapon("sword", 5, 2, Range::Melee, vec![])]);
    let defender = unit(
        "guard",
        30,
        30,
        vec![
            weapon("dagger", 2, 1, Range::Melee, vec![]),
            weapon("mace", 6, 2, Range::Melee, vec![]),
        ],
    );
    let (a_at, d_at) = hexes();
    let counter =
        choose_defender_weapon(&attacker, a_at, &defender, d_at, 0, None, &StaticRules::default());
    assert_eq!(counter, Some(1));
}

#[test]
fn defender_counters_only_at_the_attacking_range() {
    let attacker = unit("archer", 20, 20, vec![weapon("bow", 4, 2, Range::Ranged, vec![])]);
    let defender = unit("grunt", 30, 30, vec![weapon("axe", 9, 1, Range::Melee, vec![])]);
    let (a_at, d_at) = hexes();
    let counter =
        choose_defender_weapon(&attacker, a_at, &defender, d_at, 0, None, &StaticRules::default());
    assert_eq!(counter, None);
}

#[test]
fn engagement_auto_select_matches_explicit_choice() {
    let attacker = unit(
        "fighter",
        20,
        20,
        vec![
            weapon("knife", 2, 1, Range::Melee, vec![]),
            weapon("sword", 10, 1, Range::Melee, vec![]),
        ],
    );
    let defender = unit("grunt", 30, 30, vec![weapon("axe", 9, 1, Range::Melee, vec![])]);
    let (a_at, d_at) = hexes();
    let rules = StaticRules::default();
    let auto = Engagement::new(&attacker, a_at, None, &defender, d_at, None, 0.5, None, &rules);
    let (index, chosen) =
        choose_attacker_weapon(&attacker, a_at, &defender, d_at, 0.5, None, &rules).unwrap();
    assert_eq!(auto.attacker_stats().weapon, Some(index));
    assert_eq!(auto.outcome(), chosen.outcome());
}

#[test]
fn better_attack_is_antisymmetric_and_tie_stable() {
    let defender = unit("grunt", 30, 30, vec![weapon("axe", 9, 1, Range::Melee, vec![])]);
    let strong = unit("champion", 20, 20, vec![weapon("sword", 10, 2, Range::Melee, vec![])]);
    let weak = unit("militia", 20, 20, vec![weapon("club", 3, 1, Range::Melee, vec![])]);
    let (a_at, d_at) = hexes();
    let rules = StaticRules::default();
    let good = Engagement::new(&strong, a_at, Some(0), &defender, d_at, None, 0.5, None, &rules);
    let poor = Engagement::new(&weak, a_at, Some(0), &defender, d_at, None, 0.5, None, &rules);

    assert!(good.better_attack(&poor, 0.5));
    assert!(!poor.better_attack(&good, 0.5));
    assert!(better_combat(&good, &poor, 0.5));

    // A genuine tie ranks neither above the other.
    let twin = Engagement::new(&strong, a_at, Some(0), &defender, d_at, None, 0.5, None, &rules);
    assert!(!good.better_attack(&twin, 0.5));
    assert!(!twin.better_attack(&good, 0.5));
}

#[test]
fn degenerate_engagement_is_a_genuine_tie() {
    let attacker = unit("pacifist", 20, 20, vec![]);
    let defender = unit("statue", 30, 30, vec![]);
    let (a_at, d_at) = hexes();
    let rules = StaticRules::default();
    let a = Engagement::new(&attacker, a_at, None, &defender, d_at, None, 1.0, None, &rules);
    let b = Engagement::new(&attacker, a_at, None, &defender, d_at, None, 1.0, None, &rules);
    assert!(!a.better_attack(&b, 1.0));
    assert!(!b.better_attack(&a, 1.0));
    assert_eq!(a.attacker_outcome().dist.chance_of(20), 1.0);
}
