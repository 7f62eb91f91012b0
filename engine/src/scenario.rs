use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::StaticRules;
use crate::units::{Hex, Special, Unit};

/// Data-validation failures in scenario content. The combat math itself never
/// raises these; malformed content is rejected before it gets that far.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("unit '{name}' has invalid hitpoints {hp}/{max_hp}")]
    InvalidHitpoints { name: String, hp: i32, max_hp: i32 },
    #[error("weapon '{weapon}' of unit '{name}' has negative damage")]
    NegativeDamage { name: String, weapon: String },
    #[error("weapon '{weapon}' of unit '{name}' has negative strikes")]
    NegativeStrikes { name: String, weapon: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Placed {
    pub unit: Unit,
    pub at: Hex,
}

fn default_harm_weight() -> f64 {
    0.5
}

/// A self-contained engagement setup: two placed units, flat rules, and the
/// attacker's risk weight. Loaded from JSON by the CLI and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Scenario {
    pub attacker: Placed,
    pub defender: Placed,
    #[serde(default)]
    pub rules: StaticRules,
    #[serde(default = "default_harm_weight")]
    pub harm_weight: f64,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self> {
        let scenario: Scenario =
            serde_json::from_str(text).context("failed to parse scenario JSON")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> std::result::Result<(), ScenarioError> {
        for placed in [&self.attacker, &self.defender] {
            validate_unit(&placed.unit)?;
        }
        Ok(())
    }
}

fn validate_unit(unit: &Unit) -> std::result::Result<(), ScenarioError> {
    if unit.max_hp <= 0 || unit.hp < 0 || unit.hp > unit.max_hp {
        return Err(ScenarioError::InvalidHitpoints {
            name: unit.name.clone(),
            hp: unit.hp,
            max_hp: unit.max_hp,
        });
    }
    for weapon in &unit.weapons {
        if weapon.damage < 0 {
            return Err(ScenarioError::NegativeDamage {
                name: unit.name.clone(),
                weapon: weapon.name.clone(),
            });
        }
        let swarm_negative = weapon.specials.iter().any(|s| {
            matches!(s, Special::Swarm { min_blows, max_blows } if *min_blows < 0 || *max_blows < 0)
        });
        if weapon.strikes < 0 || swarm_negative {
            return Err(ScenarioError::NegativeStrikes {
                name: unit.name.clone(),
                weapon: weapon.name.clone(),
            });
        }
    }
    Ok(())
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario JSON: {}", path.display()))?;
    Scenario::from_json(&text)
        .with_context(|| format!("failed to load scenario: {}", path.display()))
}
