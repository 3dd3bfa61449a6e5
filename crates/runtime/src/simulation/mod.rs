//! Authoritative combat simulation.
//!
//! [`Simulation`] owns the world roster, the timer queue and every
//! per-character targeting controller. All state changes happen on the
//! caller's thread through `&mut self`: commands, damage, administrative
//! skill operations and [`Simulation::advance`], which fires due timers in
//! `(fire_at, handle)` order. Observable skill state is pushed to mirrors
//! through the [`SnapshotPublisher`] after each of these.

mod commands;
mod damage;
mod skills;

pub use damage::DamageOutcome;

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec3;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, trace};

use realm_core::{
    CallForHelp, Character, CharacterId, CombatConfig, CooldownElapsed, FiredTimer, Mod, Skill,
    SkillDefinition, SkillInterrupted, TargetingController, Tick, TimerQueue, World,
};

use crate::commands::RemoteCommand;
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::mods::ModDispatcher;
use crate::replication::{CommandForwarder, SkillDelta, SkillMirror, SnapshotPublisher};
use crate::sensing::{PawnSensor, SensingSweep};

/// Payload of every timer armed on the simulation clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Cooldown(CooldownElapsed),
    Sensing(SensingSweep),
}

impl From<CooldownElapsed> for TimerEvent {
    fn from(event: CooldownElapsed) -> Self {
        Self::Cooldown(event)
    }
}

impl From<SensingSweep> for TimerEvent {
    fn from(event: SensingSweep) -> Self {
        Self::Sensing(event)
    }
}

/// Aim captured when a non-auto-perform skill is activated.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingCast {
    aim: Vec3,
    target: Option<CharacterId>,
}

/// The authoritative side of a match.
pub struct Simulation {
    config: RuntimeConfig,
    world: World,
    timers: TimerQueue<TimerEvent>,
    controllers: BTreeMap<CharacterId, TargetingController>,
    sensor: PawnSensor,
    mods: ModDispatcher,
    publisher: SnapshotPublisher,
    command_tx: mpsc::Sender<RemoteCommand>,
    command_rx: mpsc::Receiver<RemoteCommand>,
    pending_casts: BTreeMap<(CharacterId, u8), PendingCast>,
    interrupts: Vec<SkillInterrupted>,
}

impl Simulation {
    pub fn new(config: RuntimeConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let sensor = PawnSensor::new(config.combat.sensing);
        let publisher = SnapshotPublisher::new(config.snapshot_buffer_size);

        Self {
            config,
            world: World::new(),
            timers: TimerQueue::new(),
            controllers: BTreeMap::new(),
            sensor,
            mods: ModDispatcher::new(),
            publisher,
            command_tx,
            command_rx,
            pending_casts: BTreeMap::new(),
            interrupts: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn combat(&self) -> &CombatConfig {
        &self.config.combat
    }

    pub fn now(&self) -> Tick {
        self.timers.now()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.world.get(id)
    }

    pub fn skill(&self, id: CharacterId, slot: u8) -> Option<&Skill> {
        self.world.get(id)?.skills.get(slot)
    }

    pub fn controller(&self, id: CharacterId) -> Option<&TargetingController> {
        self.controllers.get(&id)
    }

    /// Timers still waiting to fire (cooldowns and sensing sweeps).
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Total mod handler failures isolated so far.
    pub fn mod_failures(&self) -> u64 {
        self.mods.failures()
    }

    /// Drains the cosmetic interrupt notices raised since the last call.
    pub fn take_interrupts(&mut self) -> Vec<SkillInterrupted> {
        std::mem::take(&mut self.interrupts)
    }

    /// Drains the ally alerts `id` has received, oldest first.
    pub fn take_help_requests(&mut self, id: CharacterId) -> Result<Vec<CallForHelp>> {
        let character = self
            .world
            .get_mut(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        Ok(character.take_help_requests())
    }

    // ========================================================================
    // Roster
    // ========================================================================

    /// Adds a character and starts sensing on its behalf.
    pub fn spawn(&mut self, character: Character) -> Result<CharacterId> {
        let id = self.world.spawn(character)?;
        self.controllers
            .insert(id, TargetingController::new(id, self.config.combat.sensing));
        if self.config.enable_sensing {
            self.sensor.start(id, &mut self.timers);
        }

        info!(target: "runtime::sim", character = %id, "Character spawned");
        self.publish_snapshots();
        Ok(id)
    }

    /// Removes a character, cancelling every timer it owns.
    ///
    /// Controllers still holding it as a candidate drop it on their next
    /// re-evaluation.
    pub fn despawn(&mut self, id: CharacterId) -> Result<Character> {
        let character = self
            .world
            .get_mut(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        character.skills.teardown(&mut self.timers);

        self.sensor.stop(id, &mut self.timers);
        self.controllers.remove(&id);
        let tombstones = self.publisher.forget(id);
        self.pending_casts.retain(|(owner, _), _| *owner != id);

        let removed = self
            .world
            .despawn(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        info!(
            target: "runtime::sim",
            character = %id,
            tombstones,
            "Character despawned"
        );
        Ok(removed)
    }

    /// Moves a character without issuing a command (scripted placement).
    pub fn teleport(&mut self, id: CharacterId, position: Vec3) -> Result<()> {
        let character = self
            .world
            .get_mut(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        character.position = position;
        Ok(())
    }

    /// Grants a new skill to `owner`, returning its slot.
    pub fn grant_skill(&mut self, owner: CharacterId, definition: Arc<SkillDefinition>) -> Result<u8> {
        let character = self
            .world
            .get_mut(owner)
            .ok_or(RuntimeError::UnknownCharacter(owner))?;
        let name = definition.name.clone();
        let slot = character
            .skills
            .add(owner, definition)
            .map_err(|source| RuntimeError::SkillSetFull { owner, source })?;

        debug!(target: "runtime::sim", character = %owner, slot, skill = %name, "Skill granted");
        self.publish_snapshots();
        Ok(slot)
    }

    /// Appends a mod to `owner`'s mod list.
    pub fn attach_mod(&mut self, owner: CharacterId, m: Arc<dyn Mod>) -> Result<usize> {
        let character = self
            .world
            .get_mut(owner)
            .ok_or(RuntimeError::UnknownCharacter(owner))?;
        debug!(target: "runtime::mods", character = %owner, mod_name = m.name(), "Mod attached");
        Ok(character.mods.attach(m))
    }

    /// Removes the first mod called `name` from `owner`.
    pub fn detach_mod(&mut self, owner: CharacterId, name: &str) -> Result<Option<Arc<dyn Mod>>> {
        let character = self
            .world
            .get_mut(owner)
            .ok_or(RuntimeError::UnknownCharacter(owner))?;
        Ok(character.mods.detach_named(name))
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Advances the clock by `dt`, firing every timer that falls due.
    pub fn advance(&mut self, dt: Tick) {
        let deadline = self.timers.now() + dt;
        while let Some(fired) = self.timers.next_due(deadline) {
            self.on_timer(fired);
        }
        self.timers.settle(deadline);
        self.publish_snapshots();
    }

    fn on_timer(&mut self, fired: FiredTimer<TimerEvent>) {
        match fired.payload {
            TimerEvent::Cooldown(CooldownElapsed { key }) => {
                let finished = self
                    .world
                    .get_mut(key.owner)
                    .and_then(|character| character.skills.get_mut(key.slot))
                    .map(|skill| (skill.cooldown_finished(fired.handle), skill.state()));

                match finished {
                    Some((true, state)) => debug!(
                        target: "runtime::sim",
                        character = %key.owner,
                        slot = key.slot,
                        %state,
                        at = %fired.fire_at,
                        "Cooldown elapsed"
                    ),
                    _ => trace!(
                        target: "runtime::sim",
                        character = %key.owner,
                        slot = key.slot,
                        handle = fired.handle.raw(),
                        "Stale cooldown timer ignored"
                    ),
                }
            }
            TimerEvent::Sensing(SensingSweep { observer }) => {
                let Some(controller) = self.controllers.get_mut(&observer) else {
                    trace!(target: "runtime::sensing", observer = %observer, "Sweep for missing observer");
                    return;
                };
                self.sensor
                    .on_sweep_fired(fired.handle, &self.world, controller, &mut self.timers);
            }
        }
    }

    // ========================================================================
    // Targeting
    // ========================================================================

    /// Called when `actor` has no outstanding directive: picks the nearest
    /// sensed enemy and makes it the auto-attack target (or stops attacking).
    pub fn needs_new_command(&mut self, actor: CharacterId) -> Option<CharacterId> {
        if !self.world.get(actor)?.is_alive() {
            return None;
        }
        let controller = self.controllers.get_mut(&actor)?;
        let target = controller.reevaluate(&mut self.world);

        debug!(
            target: "runtime::sim",
            character = %actor,
            selected = ?target,
            candidates = controller.candidates().len(),
            "Target re-evaluated"
        );
        target
    }

    /// Runs a sensing sweep for `observer` right away.
    pub fn sense_now(&mut self, observer: CharacterId) -> usize {
        match self.controllers.get_mut(&observer) {
            Some(controller) => self.sensor.sweep(&self.world, controller),
            None => 0,
        }
    }

    // ========================================================================
    // Replication
    // ========================================================================

    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<SkillDelta> {
        self.publisher.subscribe()
    }

    pub fn command_forwarder(&self) -> CommandForwarder {
        CommandForwarder::new(self.command_tx.clone())
    }

    /// Creates a read-only remote view wired to this simulation.
    pub fn mirror(&self) -> SkillMirror {
        SkillMirror::new(self.subscribe_snapshots(), self.command_forwarder())
    }

    /// Executes every command forwarded by mirrors. Returns how many were
    /// accepted.
    pub fn process_remote_commands(&mut self) -> usize {
        let mut accepted = 0;
        while let Ok(RemoteCommand { actor, command }) = self.command_rx.try_recv() {
            if self.execute(actor, command).is_ok() {
                accepted += 1;
            }
        }
        accepted
    }

    /// Pushes changed `(state, cooldown_remaining)` pairs to mirrors.
    fn publish_snapshots(&mut self) {
        let now = self.timers.now();
        for character in self.world.iter() {
            for skill in character.skills.iter() {
                if let Some(key) = skill.key() {
                    self.publisher.publish(key, skill.snapshot(now));
                }
            }
        }
    }
}
