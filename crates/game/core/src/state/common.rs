use std::fmt;

use glam::Vec3;

/// Unique identifier for any character tracked in the world roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team index. Characters sharing a team never target each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team{}", self.0)
    }
}

/// Simulation time in milliseconds since the simulation started.
///
/// Timers are scheduled on whole milliseconds so that firing order is exact
/// and reproducible; gameplay-facing durations are expressed in seconds and
/// converted at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Converts a duration in seconds to ticks, rounding to the nearest
    /// millisecond. Negative and non-finite inputs collapse to zero.
    pub fn from_secs(seconds: f32) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self::ZERO;
        }
        Self((seconds * 1000.0).round() as u64)
    }

    pub fn as_secs(self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// Ticks from `self` until `later`, or zero if `later` already passed.
    pub fn until(self, later: Tick) -> Tick {
        Tick(later.0.saturating_sub(self.0))
    }
}

impl std::ops::Add<Tick> for Tick {
    type Output = Tick;
    fn add(self, rhs: Tick) -> Tick {
        Tick(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub<Tick> for Tick {
    type Output = Tick;
    fn sub(self, rhs: Tick) -> Tick {
        Tick(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Squared distance on the ground plane (Z is ignored).
#[inline]
pub fn planar_distance_sq(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Health-like meter tracked per character.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: f32,
    pub maximum: f32,
}

impl ResourceMeter {
    pub fn new(current: f32, maximum: f32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: f32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Removes up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let removed = amount.max(0.0).min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding the maximum.
    pub fn restore(&mut self, amount: f32) -> f32 {
        let added = amount.max(0.0).min(self.maximum - self.current);
        self.current += added;
        added
    }
}
