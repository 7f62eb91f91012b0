use engine::{Engagement, Scenario, ScenarioError, content::builtin_scenarios, load_scenario};

#[test]
fn builtin_scenario_parses_and_predicts() {
    let text = builtin_scenarios()["border_skirmish"];
    let s = Scenario::from_json(text).expect("builtin scenario is valid");
    assert_eq!(s.attacker.unit.name, "Elvish Fighter");
    assert_eq!(s.attacker.unit.weapons.len(), 2);

    let engagement = Engagement::new(
        &s.attacker.unit,
        s.attacker.at,
        None,
        &s.defender.unit,
        s.defender.at,
        None,
        s.harm_weight,
        None,
        &s.rules,
    );
    assert!(engagement.attacker_stats().weapon.is_some());
    let outcome = engagement.outcome();
    assert!((outcome.attacker.dist.total_mass() - 1.0).abs() < 1e-6);
    assert!((outcome.defender.dist.total_mass() - 1.0).abs() < 1e-6);
}

#[test]
fn invalid_hitpoints_are_rejected() {
    let text = r#"{
        "attacker": { "unit": { "name": "broken", "hp": 40, "max_hp": 30 }, "at": { "q": 0, "r": 0 } },
        "defender": { "unit": { "name": "fine", "hp": 10, "max_hp": 10 }, "at": { "q": 1, "r": 0 } }
    }"#;
    let err = Scenario::from_json(text).expect_err("hp above max must fail");
    assert!(matches!(
        err.downcast_ref::<ScenarioError>(),
        Some(ScenarioError::InvalidHitpoints { hp: 40, max_hp: 30, .. })
    ));
}

#[test]
fn negative_damage_is_rejected() {
    let text = r#"{
        "attacker": {
            "unit": {
                "name": "odd",
                "hp": 10,
                "max_hp": 10,
                "weapons": [ { "name": "antisword", "damage": -2, "strikes": 1, "range": "melee" } ]
            },
            "at": { "q": 0, "r": 0 }
        },
        "defender": { "unit": { "name": "fine", "hp": 10, "max_hp": 10 }, "at": { "q": 1, "r": 0 } }
    }"#;
    let err = Scenario::from_json(text).expect_err("negative damage must fail");
    assert!(matches!(
        err.downcast_ref::<ScenarioError>(),
        Some(ScenarioError::NegativeDamage { .. })
    ));
}

#[test]
fn missing_file_reports_the_path() {
    let err = load_scenario(std::path::Path::new("definitely/not/here.json"))
        .expect_err("missing file must fail");
    assert!(format!("{:#}", err).contains("definitely/not/here.json"));
}
