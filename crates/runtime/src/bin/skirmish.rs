//! Headless skirmish: two small teams trading skills on the authoritative
//! simulation while a mirror follows along.
//!
//! Usage: `skirmish [DATA_DIR]`. Without a data directory the bundled
//! content is used. Log verbosity follows `RUST_LOG` (default `info`).

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use realm_content::{ContentFactory, SkillCatalog};
use realm_core::{Character, CharacterId, CombatConfig, SkillState, TeamId, Tick};
use runtime::{Command, FlareOnHit, Lifesteal, RuntimeConfig, Simulation, SkillMirror, Thorns};

const STEP: Tick = Tick(50);
const DURATION: Tick = Tick(12_000);

fn main() -> Result<()> {
    setup_logging();

    let (combat, catalog) = load_content()?;
    let mut sim = Simulation::new(RuntimeConfig::default().with_combat(combat));
    let mut mirror = sim.mirror();

    let roster = spawn_roster(&mut sim, &catalog)?;

    let mut elapsed = Tick::ZERO;
    while elapsed < DURATION {
        for &actor in &roster {
            drive(&mut sim, &mirror, actor)?;
        }
        sim.process_remote_commands();
        resolve_casts(&mut sim, &roster)?;
        sim.advance(STEP);
        mirror.sync();
        drain_alerts(&mut sim, &roster)?;
        elapsed = elapsed + STEP;
    }

    for &id in &roster {
        if let Some(character) = sim.character(id) {
            tracing::info!(
                character = %id,
                team = %character.team,
                health = character.health.current,
                flare = character.flare.current,
                alive = character.is_alive(),
                "Final state"
            );
        }
        for slot in 0..character_skill_count(&sim, id) {
            if let Some(view) = mirror.get(id, slot) {
                println!("{}", serde_json::to_string(&(id, slot, view))?);
            }
        }
    }

    for notice in sim.take_interrupts() {
        tracing::info!(
            owner = %notice.owner,
            slot = notice.slot,
            reason = %notice.reason,
            "Interrupted cast"
        );
    }
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn load_content() -> Result<(CombatConfig, SkillCatalog)> {
    match std::env::args().nth(1) {
        Some(dir) => {
            let factory = ContentFactory::new(&dir);
            let combat = factory.load_config()?;
            let catalog = factory.load_skills()?;
            tracing::info!(data_dir = %dir, skills = catalog.len(), "Content loaded");
            Ok((combat, catalog))
        }
        None => {
            let content = ContentFactory::bundled()?;
            tracing::info!(skills = content.1.len(), "Bundled content loaded");
            Ok(content)
        }
    }
}

fn spawn_roster(sim: &mut Simulation, catalog: &SkillCatalog) -> Result<Vec<CharacterId>> {
    let placements = [
        (1, 0, Vec3::new(0.0, 0.0, 0.0), Vec3::X),
        (2, 0, Vec3::new(0.0, 300.0, 0.0), Vec3::X),
        (3, 1, Vec3::new(600.0, 0.0, 0.0), Vec3::NEG_X),
        (4, 1, Vec3::new(600.0, 300.0, 0.0), Vec3::NEG_X),
    ];

    let mut roster = Vec::new();
    for (id, team, position, facing) in placements {
        let character = Character::new(CharacterId(id), TeamId(team), position)
            .with_health(400.0)
            .with_facing(facing)
            .with_upgrade_points(3);
        let id = sim.spawn(character)?;

        for definition in catalog.iter() {
            sim.grant_skill(id, Arc::clone(definition))?;
        }
        roster.push(id);
    }

    sim.attach_mod(CharacterId(1), Arc::new(Lifesteal { ratio: 0.2 }))?;
    sim.attach_mod(CharacterId(3), Arc::new(Thorns { ratio: 0.25 }))?;
    sim.attach_mod(CharacterId(4), Arc::new(FlareOnHit { amount: 5.0 }))?;

    // Spend points through the same path players use.
    for &id in &roster {
        for slot in 0..character_skill_count(sim, id) {
            let _ = sim.execute(id, Command::UpgradeSkill { slot });
        }
    }
    Ok(roster)
}

/// One scripted decision for `actor`: retarget, then fire whatever is ready.
fn drive(sim: &mut Simulation, mirror: &SkillMirror, actor: CharacterId) -> Result<()> {
    let Some(target) = sim.needs_new_command(actor) else {
        return Ok(());
    };
    let aim = sim
        .character(target)
        .map(|c| c.position)
        .context("selected target vanished")?;

    let ready = (0..character_skill_count(sim, actor))
        .find(|&slot| sim.skill(actor, slot).is_some_and(|skill| skill.is_ready()));
    let Some(slot) = ready else {
        return Ok(());
    };
    let command = Command::UseSkill {
        slot,
        aim,
        target: Some(target),
    };

    // Even-numbered characters play as remote clients.
    if actor.0 % 2 == 0 {
        mirror.request(actor, command)?;
    } else {
        let _ = sim.execute(actor, command);
    }
    Ok(())
}

/// Completes every cast still performing (the cast animation ended).
fn resolve_casts(sim: &mut Simulation, roster: &[CharacterId]) -> Result<()> {
    for &actor in roster {
        for slot in 0..character_skill_count(sim, actor) {
            let performing = sim
                .skill(actor, slot)
                .is_some_and(|skill| skill.state() == SkillState::Performing);
            if performing {
                sim.perform_skill(actor, slot)?;
            }
        }
    }
    Ok(())
}

/// Logs and clears the ally alerts each character received this step.
fn drain_alerts(sim: &mut Simulation, roster: &[CharacterId]) -> Result<()> {
    for &id in roster {
        if sim.character(id).is_none() {
            continue;
        }
        for alert in sim.take_help_requests(id)? {
            tracing::debug!(
                ally = %id,
                victim = %alert.victim,
                damager = %alert.damager,
                "Call for help"
            );
        }
    }
    Ok(())
}

fn character_skill_count(sim: &Simulation, id: CharacterId) -> u8 {
    sim.character(id).map(|c| c.skills.len() as u8).unwrap_or(0)
}
