//! Character state consumed by skills, targeting and mods.

use arrayvec::ArrayVec;
use glam::Vec3;

use crate::mods::ModList;
use crate::skill::SkillSet;
use crate::state::{CharacterId, ResourceMeter, TeamId};

bitflags::bitflags! {
    /// Trace channels a character's collision volume responds to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CollisionChannels: u8 {
        const PAWN = 1 << 0;
        const VISIBILITY = 1 << 1;
        const PROJECTILE = 1 << 2;
    }
}

impl Default for CollisionChannels {
    fn default() -> Self {
        Self::all()
    }
}

/// Anything the targeting and spatial layers can reason about.
pub trait Targetable {
    fn id(&self) -> CharacterId;
    fn team(&self) -> TeamId;
    fn is_alive(&self) -> bool;
    fn location(&self) -> Vec3;
}

/// Whether `other` is a living member of another team than `observer`.
pub fn is_hostile<T: Targetable + ?Sized>(observer: &T, other: &T) -> bool {
    other.is_alive() && other.team() != observer.team()
}

const HELP_REQUEST_CAPACITY: usize = 8;

/// Alert received from a damaged teammate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallForHelp {
    pub victim: CharacterId,
    pub damager: CharacterId,
}

/// A combatant in the world roster.
#[derive(Clone, Debug)]
pub struct Character {
    pub id: CharacterId,
    pub team: TeamId,
    pub health: ResourceMeter,
    /// Resource paid to activate skills.
    pub flare: ResourceMeter,
    pub position: Vec3,
    /// Planar unit vector the character is looking along.
    pub facing: Vec3,
    pub collision_radius: f32,
    pub channels: CollisionChannels,
    /// Unspent points available for skill upgrades.
    pub upgrade_points: u32,
    pub skills: SkillSet,
    pub mods: ModList,
    auto_attack_target: Option<CharacterId>,
    move_destination: Option<Vec3>,
    help_requests: ArrayVec<CallForHelp, HELP_REQUEST_CAPACITY>,
}

impl Character {
    pub const DEFAULT_COLLISION_RADIUS: f32 = 42.0;
    /// Alerts kept until drained; older ones are dropped first.
    pub const MAX_HELP_REQUESTS: usize = HELP_REQUEST_CAPACITY;

    pub fn new(id: CharacterId, team: TeamId, position: Vec3) -> Self {
        Self {
            id,
            team,
            health: ResourceMeter::full(100.0),
            flare: ResourceMeter::full(100.0),
            position,
            facing: Vec3::X,
            collision_radius: Self::DEFAULT_COLLISION_RADIUS,
            channels: CollisionChannels::default(),
            upgrade_points: 0,
            skills: SkillSet::new(),
            mods: ModList::new(),
            auto_attack_target: None,
            move_destination: None,
            help_requests: ArrayVec::new(),
        }
    }

    pub fn with_health(mut self, maximum: f32) -> Self {
        self.health = ResourceMeter::full(maximum);
        self
    }

    pub fn with_flare(mut self, maximum: f32) -> Self {
        self.flare = ResourceMeter::full(maximum);
        self
    }

    pub fn with_facing(mut self, facing: Vec3) -> Self {
        self.facing = planar_unit(facing).unwrap_or(Vec3::X);
        self
    }

    pub fn with_upgrade_points(mut self, points: u32) -> Self {
        self.upgrade_points = points;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn is_enemy_of(&self, other: &Character) -> bool {
        self.team != other.team
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn current_target(&self) -> Option<CharacterId> {
        self.auto_attack_target
    }

    /// Starts (or retargets) the auto-attack cycle.
    pub fn set_current_target(&mut self, target: CharacterId) {
        self.auto_attack_target = Some(target);
        self.move_destination = None;
    }

    pub fn stop_auto_attack(&mut self) {
        self.auto_attack_target = None;
    }

    pub fn move_destination(&self) -> Option<Vec3> {
        self.move_destination
    }

    pub fn stop_moving(&mut self) {
        self.move_destination = None;
    }

    /// Issues a plain move, dropping any auto-attack target.
    pub fn move_to(&mut self, point: Vec3) {
        self.auto_attack_target = None;
        self.move_destination = Some(point);
        if let Some(dir) = planar_unit(point - self.position) {
            self.facing = dir;
        }
    }

    /// Whether the character has nothing to do.
    pub fn is_idle(&self) -> bool {
        self.auto_attack_target.is_none() && self.move_destination.is_none()
    }

    // ========================================================================
    // Combat
    // ========================================================================

    /// Removes health, returning the amount actually lost.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.health.drain(amount)
    }

    /// Handles an alert from a damaged teammate.
    ///
    /// The alert is always recorded, evicting the oldest one when the buffer
    /// is full. An idle, living character additionally adopts the damager as
    /// its auto-attack target. Returns whether the target was adopted.
    pub fn receive_call_for_help(&mut self, victim: CharacterId, damager: CharacterId) -> bool {
        if self.help_requests.is_full() {
            self.help_requests.remove(0);
        }
        self.help_requests.push(CallForHelp { victim, damager });

        if self.is_alive() && self.is_idle() && damager != self.id {
            self.set_current_target(damager);
            return true;
        }
        false
    }

    pub fn help_requests(&self) -> &[CallForHelp] {
        &self.help_requests
    }

    /// Drains the recorded alerts, oldest first.
    pub fn take_help_requests(&mut self) -> Vec<CallForHelp> {
        self.help_requests.drain(..).collect()
    }
}

impl Targetable for Character {
    fn id(&self) -> CharacterId {
        self.id
    }

    fn team(&self) -> TeamId {
        self.team
    }

    fn is_alive(&self) -> bool {
        Character::is_alive(self)
    }

    fn location(&self) -> Vec3 {
        self.position
    }
}

/// Normalized planar (XY) direction, or `None` for a zero vector.
pub fn planar_unit(v: Vec3) -> Option<Vec3> {
    Vec3::new(v.x, v.y, 0.0).try_normalize()
}
