use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{
    CombatantStats, Engagement, FightOutcome, Scenario, SideOutcome, Unit,
    content::builtin_scenarios, load_scenario,
};
use serde::Serialize;

#[derive(Subcommand)]
enum Cmd {
    /// Pick weapons for both sides and print the exact outcome distributions
    Predict {
        /// Path to a scenario JSON file (overrides --scenario)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Built-in scenario name
        #[arg(long, default_value = "border_skirmish")]
        scenario: String,
        /// Override the scenario's harm weight (0 = pure aggression,
        /// 1 = weigh own losses equally)
        #[arg(long)]
        harm_weight: Option<f64>,
        /// Emit the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print a scenario (built-in or file) as pretty JSON
    Dump {
        /// Path to a scenario JSON file (overrides --scenario)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Built-in scenario name
        #[arg(long, default_value = "border_skirmish")]
        scenario: String,
    },
}

#[derive(Parser)]
#[command(name = "hexfray")]
#[command(about = "Combat outcome prediction harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Serialize)]
struct Report<'a> {
    attacker_weapon: Option<&'a str>,
    defender_weapon: Option<&'a str>,
    outcome: &'a FightOutcome,
}

fn load(file: Option<&PathBuf>, scenario: &str) -> Result<Scenario> {
    match file {
        Some(path) => load_scenario(path),
        None => {
            let text = builtin_scenarios()
                .get(scenario)
                .copied()
                .with_context(|| format!("unknown built-in scenario '{}'", scenario))?;
            Scenario::from_json(text)
        }
    }
}

fn weapon_name<'a>(unit: &'a Unit, stats: &CombatantStats) -> Option<&'a str> {
    stats
        .weapon
        .and_then(|i| unit.weapon(i))
        .map(|w| w.name.as_str())
}

fn print_side(role: &str, name: &str, stats: &CombatantStats, out: &SideOutcome) {
    println!(
        "[{}][{}] kill {:.1}%  expected hp {:.1}/{}  untouched {:.1}%",
        role,
        name,
        out.dist.death_chance() * 100.0,
        out.dist.expected_hp(),
        stats.max_hp,
        out.dist.untouched * 100.0
    );
    for (label, p) in [
        ("poisoned", out.poisoned),
        ("slowed", out.slowed),
        ("petrified", out.petrified),
        ("plagued", out.plagued),
    ] {
        if p > 0.0 {
            println!("[{}][{}] {} {:.1}%", role, name, label, p * 100.0);
        }
    }
    for (hp, p) in out.dist.probs.iter().enumerate().rev() {
        if *p < 1e-9 {
            continue;
        }
        let bar = "#".repeat((p * 40.0).round() as usize);
        println!("  hp {:>3} {:>6.2}% {}", hp, p * 100.0, bar);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Predict {
            file,
            scenario,
            harm_weight,
            json,
        } => {
            let mut s = load(file.as_ref(), &scenario)?;
            if let Some(w) = harm_weight {
                s.harm_weight = w;
            }
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
            let attacker_weapon = weapon_name(&s.attacker.unit, engagement.attacker_stats());
            let defender_weapon = weapon_name(&s.defender.unit, engagement.defender_stats());
            if json {
                let report = Report {
                    attacker_weapon,
                    defender_weapon,
                    outcome: engagement.outcome(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "[FIGHT] {} ({}) vs {} ({})",
                    s.attacker.unit.name,
                    attacker_weapon.unwrap_or("no usable weapon"),
                    s.defender.unit.name,
                    defender_weapon.unwrap_or("no retaliation"),
                );
                print_side(
                    "ATTACKER",
                    &s.attacker.unit.name,
                    engagement.attacker_stats(),
                    engagement.attacker_outcome(),
                );
                print_side(
                    "DEFENDER",
                    &s.defender.unit.name,
                    engagement.defender_stats(),
                    engagement.defender_outcome(),
                );
            }
        }
        Cmd::Dump { file, scenario } => {
            let s = load(file.as_ref(), &scenario)?;
            println!("{}", serde_json::to_string_pretty(&s)?);
        }
    }
    Ok(())
}
