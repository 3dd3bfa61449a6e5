//! Per-skill state machine: readiness, cooldown, interruption and ranks.

use std::sync::Arc;

use glam::Vec3;

use crate::skill::{InterruptReason, SkillDefinition, SkillError, SkillInterrupted, SkillState};
use crate::state::{CharacterId, Tick};
use crate::timer::{TimerHandle, TimerQueue};

/// Identifies a skill by its owner and slot in the owner's skill list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillKey {
    pub owner: CharacterId,
    pub slot: u8,
}

impl SkillKey {
    pub fn new(owner: CharacterId, slot: u8) -> Self {
        Self { owner, slot }
    }
}

/// Timer payload armed by a skill when its cooldown starts.
///
/// The simulation converts it into its own timer event type and hands it back
/// to [`Skill::cooldown_finished`] together with the fired handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownElapsed {
    pub key: SkillKey,
}

/// Read-only view of the fields mirrored to non-authoritative observers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSnapshot {
    pub state: SkillState,
    /// Seconds until the cooldown elapses; zero when no cooldown runs.
    pub cooldown_remaining: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActiveCooldown {
    handle: TimerHandle,
    started_at: Tick,
    ends_at: Tick,
}

/// A character-owned skill instance.
///
/// # Invariants
///
/// - `state == OnCooldown` implies an armed cooldown with time remaining
/// - `Performing` is only entered from `Ready`
/// - `NoOwner` is only held before [`Skill::initialize`] and never re-entered
///
/// Operations attempted from a forbidden state return
/// [`SkillError::InvalidStateTransition`] and change nothing.
#[derive(Clone, Debug)]
pub struct Skill {
    definition: Arc<SkillDefinition>,
    state: SkillState,
    key: Option<SkillKey>,
    points: u32,
    after_cooldown_state: SkillState,
    cooldown: Option<ActiveCooldown>,
}

impl Skill {
    /// Creates an unowned skill.
    pub fn new(definition: Arc<SkillDefinition>) -> Self {
        Self {
            definition,
            state: SkillState::NoOwner,
            key: None,
            points: 0,
            after_cooldown_state: SkillState::Ready,
            cooldown: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn state(&self) -> SkillState {
        self.state
    }

    pub fn key(&self) -> Option<SkillKey> {
        self.key
    }

    pub fn owner(&self) -> Option<CharacterId> {
        self.key.map(|key| key.owner)
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn points_max(&self) -> u32 {
        self.definition.points_max
    }

    pub fn cost(&self) -> f32 {
        self.definition.cost
    }

    pub fn after_cooldown_state(&self) -> SkillState {
        self.after_cooldown_state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SkillState::Ready
    }

    /// Handle of the running cooldown timer, if any.
    pub fn cooldown_handle(&self) -> Option<TimerHandle> {
        self.cooldown.map(|cd| cd.handle)
    }

    /// Seconds left on the running cooldown, zero if none runs.
    pub fn cooldown_remaining(&self, now: Tick) -> f32 {
        self.cooldown
            .map(|cd| now.until(cd.ends_at).as_secs())
            .unwrap_or(0.0)
    }

    /// Fraction of the running cooldown already elapsed, in `[0, 1]`.
    ///
    /// Returns 1.0 when no cooldown runs.
    pub fn cooldown_progress(&self, now: Tick) -> f32 {
        let Some(cd) = self.cooldown else {
            return 1.0;
        };
        let total = (cd.ends_at - cd.started_at).0;
        if total == 0 {
            return 1.0;
        }
        let elapsed = cd.started_at.until(now).0.min(total);
        elapsed as f32 / total as f32
    }

    pub fn snapshot(&self, now: Tick) -> SkillSnapshot {
        SkillSnapshot {
            state: self.state,
            cooldown_remaining: self.cooldown_remaining(now),
        }
    }

    /// Interpolates between `min` and `max` by rank (`points / points_max`).
    ///
    /// With `increasing` the result grows from `min` at zero points to `max`
    /// at full rank; otherwise it shrinks from `max` to `min`. The rank ratio
    /// is clamped to `[0, 1]`.
    pub fn level_scale(&self, min: f32, max: f32, increasing: bool) -> f32 {
        let ratio = if self.definition.points_max == 0 {
            0.0
        } else {
            (self.points as f32 / self.definition.points_max as f32).clamp(0.0, 1.0)
        };

        if increasing {
            min + (max - min) * ratio
        } else {
            max - (max - min) * ratio
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Binds the skill to its owner and grants the initial points.
    pub fn initialize(&mut self, key: SkillKey) -> Result<SkillState, SkillError> {
        if self.state != SkillState::NoOwner {
            return Err(SkillError::transition("initialize", self.state));
        }

        self.key = Some(key);
        self.points = self.definition.initial_points.min(self.definition.points_max);
        self.state = if self.points > 0 {
            SkillState::Ready
        } else {
            SkillState::NotLearned
        };
        Ok(self.state)
    }

    /// Enters `Performing`. Cost must already have been checked by the caller.
    pub fn activate(&mut self) -> Result<(), SkillError> {
        if self.state != SkillState::Ready {
            return Err(SkillError::transition("activate", self.state));
        }
        self.state = SkillState::Performing;
        Ok(())
    }

    /// Starts (or restarts) the cooldown and hands over to `after` once it
    /// elapses.
    ///
    /// `manual` overrides the rank-scaled duration when it is non-negative.
    /// A zero-length cooldown switches to `after` immediately without arming
    /// a timer. Returns the armed duration.
    pub fn start_cooldown<E>(
        &mut self,
        timers: &mut TimerQueue<E>,
        manual: Option<f32>,
        after: SkillState,
    ) -> Result<Tick, SkillError>
    where
        E: From<CooldownElapsed>,
    {
        let Some(key) = self.key else {
            return Err(SkillError::transition("start cooldown", self.state));
        };
        if !after.is_valid_after_cooldown() {
            return Err(SkillError::InvalidAfterCooldownState(after));
        }

        self.cancel_cooldown(timers);

        let seconds = match manual {
            Some(seconds) if seconds >= 0.0 => seconds,
            _ => self.level_scale(
                self.definition.cooldown_min,
                self.definition.cooldown_max,
                false,
            ),
        };
        let duration = Tick::from_secs(seconds);

        if duration == Tick::ZERO {
            self.state = after;
            self.after_cooldown_state = SkillState::Ready;
            return Ok(Tick::ZERO);
        }

        let started_at = timers.now();
        let handle = timers.schedule_after(duration, CooldownElapsed { key }.into());
        self.cooldown = Some(ActiveCooldown {
            handle,
            started_at,
            ends_at: started_at + duration,
        });
        self.after_cooldown_state = after;
        self.state = SkillState::OnCooldown;
        Ok(duration)
    }

    /// Ends a performance and starts the cooldown back to `Ready`.
    pub fn skill_finished<E>(
        &mut self,
        timers: &mut TimerQueue<E>,
        manual: Option<f32>,
    ) -> Result<Tick, SkillError>
    where
        E: From<CooldownElapsed>,
    {
        if self.state != SkillState::Performing {
            return Err(SkillError::transition("finish", self.state));
        }
        self.start_cooldown(timers, manual, SkillState::Ready)
    }

    /// Handles a fired cooldown timer.
    ///
    /// Returns false without touching anything if `handle` is not the
    /// skill's current cooldown (cancelled, reset, or superseded).
    pub fn cooldown_finished(&mut self, handle: TimerHandle) -> bool {
        match self.cooldown {
            Some(cd) if cd.handle == handle => {
                self.cooldown = None;
                self.state = self.after_cooldown_state;
                self.after_cooldown_state = SkillState::Ready;
                true
            }
            _ => false,
        }
    }

    /// Interrupts a performing skill.
    ///
    /// Outside `Performing` this is a no-op returning `Ok(None)`. Otherwise
    /// the skill either starts its cooldown (`auto_cooldown_on_interrupt`) or
    /// returns to `Ready`, and the cosmetic notice is returned for observers.
    pub fn interrupt<E>(
        &mut self,
        timers: &mut TimerQueue<E>,
        reason: InterruptReason,
        aim: Vec3,
        target: Option<CharacterId>,
    ) -> Result<Option<SkillInterrupted>, SkillError>
    where
        E: From<CooldownElapsed>,
    {
        if self.state != SkillState::Performing {
            return Ok(None);
        }
        let Some(key) = self.key else {
            return Ok(None);
        };

        if self.definition.auto_cooldown_on_interrupt {
            self.skill_finished(timers, None)?;
        } else {
            self.state = SkillState::Ready;
        }

        Ok(Some(SkillInterrupted {
            owner: key.owner,
            slot: key.slot,
            reason,
            aim,
            target,
            resulting_state: self.state,
        }))
    }

    /// Forcibly disables the skill.
    ///
    /// A running cooldown keeps ticking but will hand over to `Disabled`.
    pub fn disable(&mut self) -> Result<(), SkillError> {
        if !self.state.can_disable() {
            return Err(SkillError::transition("disable", self.state));
        }
        if self.cooldown.is_some() {
            self.after_cooldown_state = SkillState::Disabled;
        }
        self.state = SkillState::Disabled;
        Ok(())
    }

    /// Lifts a disable, resuming any cooldown that is still running.
    pub fn reenable(&mut self, now: Tick) -> Result<SkillState, SkillError> {
        if self.state != SkillState::Disabled {
            return Err(SkillError::transition("re-enable", self.state));
        }

        self.after_cooldown_state = SkillState::Ready;
        self.state = if self.cooldown_remaining(now) > 0.0 {
            SkillState::OnCooldown
        } else if self.points == 0 {
            SkillState::NotLearned
        } else {
            SkillState::Ready
        };
        Ok(self.state)
    }

    /// Administrative override of the state.
    ///
    /// Timers are left alone: callers forcing `OnCooldown` or leaving it are
    /// responsible for arming or cancelling the cooldown themselves (see
    /// [`Skill::start_cooldown`] and [`Skill::reset`]). `NoOwner` can never be
    /// re-entered, and an unowned skill cannot be overridden.
    pub fn set_state(&mut self, state: SkillState) -> Result<(), SkillError> {
        if self.state == SkillState::NoOwner || state == SkillState::NoOwner {
            return Err(SkillError::transition("override state", self.state));
        }
        self.state = state;
        Ok(())
    }

    /// Administrative reset: cancels any cooldown and returns to the resting
    /// state for the current rank.
    pub fn reset<E>(&mut self, timers: &mut TimerQueue<E>) -> Result<SkillState, SkillError> {
        if self.state == SkillState::NoOwner {
            return Err(SkillError::transition("reset", self.state));
        }
        self.cancel_cooldown(timers);
        self.after_cooldown_state = SkillState::Ready;
        self.state = if self.points > 0 {
            SkillState::Ready
        } else {
            SkillState::NotLearned
        };
        Ok(self.state)
    }

    /// Cancels outstanding timers before the skill is dropped.
    pub fn teardown<E>(&mut self, timers: &mut TimerQueue<E>) {
        self.cancel_cooldown(timers);
    }

    /// Adds one point, learning the skill on its first point.
    pub fn add_point(&mut self) -> Result<u32, SkillError> {
        if self.state == SkillState::NoOwner {
            return Err(SkillError::transition("add point", self.state));
        }
        if self.points >= self.definition.points_max {
            return Err(SkillError::MaxPointsReached {
                max: self.definition.points_max,
            });
        }

        self.points += 1;
        if self.points == 1 && self.state == SkillState::NotLearned {
            self.state = SkillState::Ready;
        }
        Ok(self.points)
    }

    /// Cancels the running cooldown timer without changing the state.
    ///
    /// Pairs with [`Skill::set_state`] for overrides that leave `OnCooldown`.
    /// Returns false if no cooldown was running.
    pub fn cancel_cooldown<E>(&mut self, timers: &mut TimerQueue<E>) -> bool {
        match self.cooldown.take() {
            Some(cd) => {
                timers.cancel(cd.handle);
                self.after_cooldown_state = SkillState::Ready;
                true
            }
            None => false,
        }
    }

    pub fn has_cooldown(&self) -> bool {
        self.cooldown.is_some()
    }
}
