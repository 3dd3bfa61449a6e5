use std::sync::Arc;

use glam::Vec3;
use realm_core::{
    Character, CharacterId, DamageCauser, DamageEvent, DamageType, InterruptReason,
    SkillDefinition, SkillEffect, SkillError, SkillState, TeamId, Tick,
};
use runtime::{Command, CommandError, RuntimeConfig, Simulation};

const CASTER: CharacterId = CharacterId(1);

fn sim() -> Simulation {
    Simulation::new(RuntimeConfig::default().with_sensing(false))
}

/// Full-rank skill with a 2s cooldown.
fn bolt() -> Arc<SkillDefinition> {
    Arc::new(SkillDefinition::new("Bolt", 4, 2.0, 6.0).with_initial_points(4))
}

fn caster(sim: &mut Simulation, definition: Arc<SkillDefinition>) -> u8 {
    sim.spawn(Character::new(CASTER, TeamId(0), Vec3::ZERO))
        .unwrap();
    sim.grant_skill(CASTER, definition).unwrap()
}

fn use_skill(slot: u8) -> Command {
    Command::UseSkill {
        slot,
        aim: Vec3::X,
        target: None,
    }
}

fn cast(sim: &mut Simulation, slot: u8) {
    sim.execute(CASTER, use_skill(slot)).unwrap();
    sim.perform_skill(CASTER, slot).unwrap();
}

fn state(sim: &Simulation, slot: u8) -> SkillState {
    sim.skill(CASTER, slot).unwrap().state()
}

fn spawn_at(sim: &mut Simulation, id: u32, team: u8, position: Vec3) -> CharacterId {
    sim.spawn(Character::new(CharacterId(id), TeamId(team), position))
        .unwrap()
}

fn kill(sim: &mut Simulation, id: CharacterId) {
    let event = DamageEvent::new(
        1000.0,
        DamageType::Physical,
        None,
        DamageCauser::Environment,
        id,
    );
    assert!(sim.apply_damage(event).killed);
}

fn targeted(slot: u8, target: CharacterId) -> Command {
    Command::UseSkill {
        slot,
        aim: Vec3::X,
        target: Some(target),
    }
}

/// Skill state, flare, facing and auto-attack target of the caster.
fn caster_view(sim: &Simulation, slot: u8) -> (SkillState, f32, Vec3, Option<CharacterId>) {
    let caster = sim.character(CASTER).unwrap();
    (
        state(sim, slot),
        caster.flare.current,
        caster.facing,
        caster.current_target(),
    )
}

fn costly() -> Arc<SkillDefinition> {
    Arc::new(
        SkillDefinition::new("Jab", 1, 1.0, 1.0)
            .with_initial_points(1)
            .with_cost(30.0),
    )
}

#[test]
fn cooldown_elapses_on_the_simulation_clock() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());

    sim.execute(CASTER, use_skill(slot)).unwrap();
    assert_eq!(state(&sim, slot), SkillState::Performing);

    let cooldown = sim.perform_skill(CASTER, slot).unwrap();
    assert_eq!(cooldown, Tick(2000));
    assert_eq!(state(&sim, slot), SkillState::OnCooldown);

    sim.advance(Tick(1999));
    assert_eq!(state(&sim, slot), SkillState::OnCooldown);
    assert!(sim.skill(CASTER, slot).unwrap().cooldown_remaining(sim.now()) > 0.0);

    sim.advance(Tick(1));
    assert_eq!(state(&sim, slot), SkillState::Ready);
    assert_eq!(sim.skill(CASTER, slot).unwrap().cooldown_remaining(sim.now()), 0.0);
}

#[test]
fn despawned_owner_mid_cooldown_never_transitions() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());
    let mut mirror = sim.mirror();

    cast(&mut sim, slot);
    assert_eq!(sim.pending_timers(), 1);
    mirror.sync();
    assert_eq!(mirror.state(CASTER, slot), Some(SkillState::OnCooldown));

    sim.despawn(CASTER).unwrap();
    assert_eq!(sim.pending_timers(), 0);

    sim.advance(Tick(5000));
    assert!(sim.character(CASTER).is_none());
    // Only the tombstone arrives; no Ready transition follows it.
    assert_eq!(mirror.sync(), 1);
    assert_eq!(mirror.state(CASTER, slot), None);
    assert_eq!(mirror.sync(), 0);
}

#[test]
fn reset_cancels_running_cooldown() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());
    cast(&mut sim, slot);

    assert_eq!(sim.reset_skill(CASTER, slot).unwrap(), SkillState::Ready);
    assert_eq!(sim.pending_timers(), 0);

    sim.execute(CASTER, use_skill(slot)).unwrap();
    sim.advance(Tick(5000));
    assert_eq!(state(&sim, slot), SkillState::Performing);
}

#[test]
fn state_override_cancels_cooldown_it_leaves() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());
    cast(&mut sim, slot);

    sim.set_skill_state(CASTER, slot, SkillState::Ready).unwrap();
    assert_eq!(sim.pending_timers(), 0);

    sim.execute(CASTER, use_skill(slot)).unwrap();
    sim.advance(Tick(3000));
    assert_eq!(state(&sim, slot), SkillState::Performing);
}

#[test]
fn forcing_cooldown_arms_a_timer() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());

    sim.set_skill_state(CASTER, slot, SkillState::OnCooldown).unwrap();
    assert_eq!(sim.pending_timers(), 1);

    sim.advance(Tick(2000));
    assert_eq!(state(&sim, slot), SkillState::Ready);
}

#[test]
fn disable_mid_cooldown_lands_in_disabled_then_reenables_ready() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());
    cast(&mut sim, slot);

    sim.disable_skill(CASTER, slot).unwrap();
    assert_eq!(state(&sim, slot), SkillState::Disabled);

    sim.advance(Tick(2000));
    assert_eq!(state(&sim, slot), SkillState::Disabled);
    assert_eq!(sim.reenable_skill(CASTER, slot).unwrap(), SkillState::Ready);
}

#[test]
fn reenable_resumes_remaining_cooldown() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());
    cast(&mut sim, slot);

    sim.disable_skill(CASTER, slot).unwrap();
    sim.advance(Tick(500));
    assert_eq!(sim.reenable_skill(CASTER, slot).unwrap(), SkillState::OnCooldown);

    sim.advance(Tick(1500));
    assert_eq!(state(&sim, slot), SkillState::Ready);
}

#[test]
fn interrupt_returns_to_ready_or_cools_down() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());
    let sticky = sim
        .grant_skill(
            CASTER,
            Arc::new(
                SkillDefinition::new("Sticky", 2, 1.0, 1.0)
                    .with_initial_points(1)
                    .with_auto_cooldown_on_interrupt(true),
            ),
        )
        .unwrap();

    sim.execute(CASTER, use_skill(slot)).unwrap();
    sim.execute(CASTER, use_skill(sticky)).unwrap();

    let notices = sim.interrupt_all(CASTER, InterruptReason::CrowdControlled);
    assert_eq!(notices.len(), 2);
    assert_eq!(state(&sim, slot), SkillState::Ready);
    assert_eq!(state(&sim, sticky), SkillState::OnCooldown);
    assert_eq!(sim.take_interrupts().len(), 2);

    // Outside Performing an interrupt is a no-op.
    let notice = sim
        .interrupt_skill(CASTER, slot, InterruptReason::Damaged)
        .unwrap();
    assert!(notice.is_none());
    assert_eq!(state(&sim, slot), SkillState::Ready);
}

#[test]
fn use_skill_rejections_leave_state_untouched() {
    let mut sim = sim();
    let slot = caster(
        &mut sim,
        Arc::new(
            SkillDefinition::new("Costly", 1, 1.0, 1.0)
                .with_initial_points(1)
                .with_cost(150.0),
        ),
    );

    let err = sim.execute(CASTER, use_skill(slot)).unwrap_err();
    assert!(matches!(err, CommandError::InsufficientFlare { .. }));
    assert_eq!(state(&sim, slot), SkillState::Ready);
    assert_eq!(sim.character(CASTER).unwrap().flare.current, 100.0);

    let err = sim.execute(CASTER, use_skill(7)).unwrap_err();
    assert_eq!(err, CommandError::UnknownSkill { actor: CASTER, slot: 7 });

    let err = sim.execute(CharacterId(42), use_skill(0)).unwrap_err();
    assert_eq!(err, CommandError::UnknownCharacter(CharacterId(42)));
}

#[test]
fn activation_pays_cost_and_rejects_while_cooling_down() {
    let mut sim = sim();
    let slot = caster(
        &mut sim,
        Arc::new(
            SkillDefinition::new("Nova", 1, 3.0, 3.0)
                .with_initial_points(1)
                .with_cost(40.0)
                .with_auto_perform(true),
        ),
    );

    sim.execute(CASTER, use_skill(slot)).unwrap();
    assert_eq!(state(&sim, slot), SkillState::OnCooldown);
    assert_eq!(sim.character(CASTER).unwrap().flare.current, 60.0);

    let err = sim.execute(CASTER, use_skill(slot)).unwrap_err();
    assert_eq!(
        err,
        CommandError::Skill(SkillError::InvalidStateTransition {
            operation: "activate",
            state: SkillState::OnCooldown,
        })
    );
    assert_eq!(sim.character(CASTER).unwrap().flare.current, 60.0);
}

#[test]
fn upgrades_follow_skew_and_spend_points() {
    let mut sim = sim();
    sim.spawn(Character::new(CASTER, TeamId(0), Vec3::ZERO).with_upgrade_points(3))
        .unwrap();
    let a = sim
        .grant_skill(CASTER, Arc::new(SkillDefinition::new("A", 4, 1.0, 2.0)))
        .unwrap();
    let b = sim
        .grant_skill(CASTER, Arc::new(SkillDefinition::new("B", 4, 1.0, 2.0)))
        .unwrap();

    sim.execute(CASTER, Command::UpgradeSkill { slot: a }).unwrap();
    assert_eq!(state(&sim, a), SkillState::Ready);
    sim.execute(CASTER, Command::UpgradeSkill { slot: a }).unwrap();

    let err = sim.execute(CASTER, Command::UpgradeSkill { slot: a }).unwrap_err();
    assert_eq!(err, CommandError::UpgradeNotAllowed { slot: a });

    sim.execute(CASTER, Command::UpgradeSkill { slot: b }).unwrap();
    let err = sim.execute(CASTER, Command::UpgradeSkill { slot: b }).unwrap_err();
    assert_eq!(err, CommandError::NoUpgradePoints(CASTER));

    assert_eq!(sim.skill(CASTER, a).unwrap().points(), 2);
    assert_eq!(sim.skill(CASTER, b).unwrap().points(), 1);
}

#[test]
fn use_skill_rejects_teammate_target() {
    let mut sim = sim();
    let slot = caster(&mut sim, costly());
    let ally = spawn_at(&mut sim, 2, 0, Vec3::new(0.0, 200.0, 0.0));
    let before = caster_view(&sim, slot);

    let err = sim.execute(CASTER, targeted(slot, ally)).unwrap_err();
    assert_eq!(err, CommandError::InvalidTarget { actor: CASTER, target: ally });
    assert_eq!(caster_view(&sim, slot), before);
    assert_eq!(before.0, SkillState::Ready);
    assert_eq!(before.1, 100.0);
}

#[test]
fn use_skill_rejects_dead_target() {
    let mut sim = sim();
    let slot = caster(&mut sim, costly());
    let enemy = spawn_at(&mut sim, 2, 1, Vec3::new(0.0, 200.0, 0.0));
    kill(&mut sim, enemy);
    let before = caster_view(&sim, slot);

    let err = sim.execute(CASTER, targeted(slot, enemy)).unwrap_err();
    assert_eq!(err, CommandError::InvalidTarget { actor: CASTER, target: enemy });
    assert_eq!(caster_view(&sim, slot), before);
}

#[test]
fn move_or_attack_rejects_teammate_and_dead_targets() {
    let mut sim = sim();
    let slot = caster(&mut sim, costly());
    let ally = spawn_at(&mut sim, 2, 0, Vec3::new(100.0, 0.0, 0.0));
    let enemy = spawn_at(&mut sim, 3, 1, Vec3::new(300.0, 0.0, 0.0));
    let corpse = spawn_at(&mut sim, 4, 1, Vec3::new(500.0, 0.0, 0.0));
    kill(&mut sim, corpse);

    sim.execute(
        CASTER,
        Command::MoveOrAttack {
            point: Vec3::ZERO,
            target: Some(enemy),
        },
    )
    .unwrap();
    let before = caster_view(&sim, slot);
    assert_eq!(before.3, Some(enemy));

    for target in [ally, corpse] {
        let err = sim
            .execute(
                CASTER,
                Command::MoveOrAttack {
                    point: Vec3::ZERO,
                    target: Some(target),
                },
            )
            .unwrap_err();
        assert_eq!(err, CommandError::InvalidTarget { actor: CASTER, target });
        assert_eq!(caster_view(&sim, slot), before);
    }
}

#[test]
fn dead_actor_commands_are_rejected() {
    let mut sim = sim();
    let slot = caster(&mut sim, costly());
    let enemy = spawn_at(&mut sim, 2, 1, Vec3::new(300.0, 0.0, 0.0));
    kill(&mut sim, CASTER);
    let before = caster_view(&sim, slot);

    let commands = [
        targeted(slot, enemy),
        use_skill(slot),
        Command::MoveOrAttack {
            point: Vec3::ZERO,
            target: Some(enemy),
        },
        Command::MoveOrAttack {
            point: Vec3::new(50.0, 0.0, 0.0),
            target: None,
        },
        Command::AimSkill {
            slot,
            aim: Vec3::Y,
            target: None,
        },
        Command::ClearMove,
        Command::ClearAttack,
    ];
    for command in commands {
        let err = sim.execute(CASTER, command).unwrap_err();
        assert_eq!(err, CommandError::ActorDead(CASTER), "{command:?}");
        assert_eq!(caster_view(&sim, slot), before);
    }
    assert_eq!(sim.character(CASTER).unwrap().move_destination(), None);
}

#[test]
fn aim_while_performing_redirects_the_strike() {
    let mut sim = sim();
    let slot = caster(
        &mut sim,
        Arc::new(
            SkillDefinition::new("Lance", 1, 2.0, 2.0)
                .with_initial_points(1)
                .with_effect(SkillEffect::SphereStrike {
                    range: 500.0,
                    radius: 20.0,
                    damage_min: 30.0,
                    damage_max: 30.0,
                    damage_type: DamageType::Magical,
                }),
        ),
    );
    let east = spawn_at(&mut sim, 2, 1, Vec3::new(300.0, 0.0, 0.0));
    let north = spawn_at(&mut sim, 3, 1, Vec3::new(0.0, 300.0, 0.0));
    let ally = spawn_at(&mut sim, 4, 0, Vec3::new(-300.0, 0.0, 0.0));

    sim.execute(CASTER, targeted(slot, east)).unwrap();
    assert_eq!(state(&sim, slot), SkillState::Performing);
    assert_eq!(sim.character(CASTER).unwrap().facing, Vec3::X);

    let err = sim
        .execute(
            CASTER,
            Command::AimSkill {
                slot,
                aim: Vec3::ZERO,
                target: Some(ally),
            },
        )
        .unwrap_err();
    assert_eq!(err, CommandError::InvalidTarget { actor: CASTER, target: ally });
    assert_eq!(sim.character(CASTER).unwrap().facing, Vec3::X);

    sim.execute(
        CASTER,
        Command::AimSkill {
            slot,
            aim: Vec3::ZERO,
            target: Some(north),
        },
    )
    .unwrap();
    assert_eq!(sim.character(CASTER).unwrap().facing, Vec3::Y);
    assert_eq!(state(&sim, slot), SkillState::Performing);

    sim.perform_skill(CASTER, slot).unwrap();
    assert_eq!(sim.character(north).unwrap().health.current, 70.0);
    assert_eq!(sim.character(east).unwrap().health.current, 100.0);
}

#[test]
fn aim_outside_performing_is_rejected() {
    let mut sim = sim();
    let slot = caster(&mut sim, bolt());

    let aim = Command::AimSkill {
        slot,
        aim: Vec3::Y,
        target: None,
    };
    let err = sim.execute(CASTER, aim).unwrap_err();
    assert_eq!(
        err,
        CommandError::Skill(SkillError::InvalidStateTransition {
            operation: "aim",
            state: SkillState::Ready,
        })
    );

    cast(&mut sim, slot);
    let err = sim.execute(CASTER, aim).unwrap_err();
    assert_eq!(
        err,
        CommandError::Skill(SkillError::InvalidStateTransition {
            operation: "aim",
            state: SkillState::OnCooldown,
        })
    );
    assert_eq!(sim.character(CASTER).unwrap().facing, Vec3::X);
}

#[test]
fn clear_commands_drop_move_and_attack_directives() {
    let mut sim = sim();
    caster(&mut sim, bolt());
    let enemy = spawn_at(&mut sim, 2, 1, Vec3::new(300.0, 0.0, 0.0));

    let point = Vec3::new(0.0, 400.0, 0.0);
    sim.execute(CASTER, Command::MoveOrAttack { point, target: None })
        .unwrap();
    assert_eq!(sim.character(CASTER).unwrap().move_destination(), Some(point));
    sim.execute(CASTER, Command::ClearMove).unwrap();
    assert_eq!(sim.character(CASTER).unwrap().move_destination(), None);

    sim.execute(
        CASTER,
        Command::MoveOrAttack {
            point: Vec3::ZERO,
            target: Some(enemy),
        },
    )
    .unwrap();
    assert_eq!(sim.character(CASTER).unwrap().current_target(), Some(enemy));
    sim.execute(CASTER, Command::ClearAttack).unwrap();
    assert_eq!(sim.character(CASTER).unwrap().current_target(), None);
    assert!(sim.character(CASTER).unwrap().is_idle());

    // Clearing nothing is accepted.
    sim.execute(CASTER, Command::ClearAttack).unwrap();
}
