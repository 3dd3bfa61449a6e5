//! A character's ordered skill list and the upgrade distribution policy.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::skill::{Skill, SkillDefinition, SkillError, SkillKey, SkillState};
use crate::state::CharacterId;
use crate::timer::TimerQueue;

/// Returned when a character already owns the maximum number of skills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("character already owns {} skills", CombatConfig::MAX_SKILLS)]
pub struct SkillSetFull;

/// Ordered, bounded list of the skills a character owns.
///
/// Slot numbers are positions in this list and never change once a skill
/// is added.
#[derive(Clone, Debug, Default)]
pub struct SkillSet {
    skills: ArrayVec<Skill, { CombatConfig::MAX_SKILLS }>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a skill from `definition`, binds it to `owner` and appends
    /// it, returning its slot.
    pub fn add(
        &mut self,
        owner: CharacterId,
        definition: Arc<SkillDefinition>,
    ) -> Result<u8, SkillSetFull> {
        if self.skills.is_full() {
            return Err(SkillSetFull);
        }
        let slot = self.skills.len() as u8;
        let mut skill = Skill::new(definition);
        let bound = skill.initialize(SkillKey::new(owner, slot));
        debug_assert!(bound.is_ok(), "fresh skill failed to bind: {bound:?}");
        self.skills.push(skill);
        Ok(slot)
    }

    pub fn get(&self, slot: u8) -> Option<&Skill> {
        self.skills.get(usize::from(slot))
    }

    pub fn get_mut(&mut self, slot: u8) -> Option<&mut Skill> {
        self.skills.get_mut(usize::from(slot))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Skill> {
        self.skills.iter_mut()
    }

    /// Slots of skills currently performing.
    pub fn performing(&self) -> impl Iterator<Item = u8> + '_ {
        self.skills
            .iter()
            .enumerate()
            .filter(|(_, skill)| skill.state() == SkillState::Performing)
            .map(|(slot, _)| slot as u8)
    }

    /// Lowest point count among every skill except `slot`.
    pub fn min_sibling_points(&self, slot: u8) -> Option<u32> {
        self.skills
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != usize::from(slot))
            .map(|(_, skill)| skill.points())
            .min()
    }

    /// Whether the skill in `slot` may receive another point.
    ///
    /// Refused at full rank, and when the skill already leads the
    /// least-upgraded sibling by more than `skew` points, so a single skill
    /// cannot be rushed while the others stay at zero.
    pub fn can_upgrade(&self, slot: u8, skew: u32) -> bool {
        let Some(skill) = self.get(slot) else {
            return false;
        };
        if skill.points() >= skill.points_max() {
            return false;
        }

        match self.min_sibling_points(slot) {
            Some(min) => skill.points() <= min.saturating_add(skew),
            None => true,
        }
    }

    /// Adds a point to `slot` if the distribution policy allows it.
    pub fn upgrade(&mut self, slot: u8, skew: u32) -> Result<Option<u32>, SkillError> {
        if !self.can_upgrade(slot, skew) {
            return Ok(None);
        }
        match self.get_mut(slot) {
            Some(skill) => skill.add_point().map(Some),
            None => Ok(None),
        }
    }

    /// Cancels every outstanding cooldown timer (owner destroyed).
    pub fn teardown<E>(&mut self, timers: &mut TimerQueue<E>) {
        for skill in &mut self.skills {
            skill.teardown(timers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: CharacterId = CharacterId(1);

    fn set_with_points(points: &[u32]) -> SkillSet {
        let mut set = SkillSet::new();
        for (index, &initial) in points.iter().enumerate() {
            let def = SkillDefinition::new(format!("skill{index}"), 4, 1.0, 5.0)
                .with_initial_points(initial);
            set.add(OWNER, Arc::new(def)).unwrap();
        }
        set
    }

    #[test]
    fn add_binds_slots_in_order() {
        let set = set_with_points(&[0, 1]);
        assert_eq!(set.get(0).unwrap().key(), Some(SkillKey::new(OWNER, 0)));
        assert_eq!(set.get(1).unwrap().key(), Some(SkillKey::new(OWNER, 1)));
        assert_eq!(set.get(0).unwrap().state(), SkillState::NotLearned);
        assert_eq!(set.get(1).unwrap().state(), SkillState::Ready);
    }

    #[test]
    fn add_rejects_beyond_capacity() {
        let mut set = set_with_points(&[0; CombatConfig::MAX_SKILLS]);
        let def = Arc::new(SkillDefinition::new("extra", 1, 0.0, 0.0));
        assert_eq!(set.add(OWNER, def), Err(SkillSetFull));
    }

    #[test]
    fn upgrade_allowed_within_skew() {
        let set = set_with_points(&[1, 0, 0]);
        assert!(set.can_upgrade(0, 1));
        assert!(set.can_upgrade(1, 1));
    }

    #[test]
    fn upgrade_refused_beyond_skew() {
        let set = set_with_points(&[2, 0, 1]);
        assert!(!set.can_upgrade(0, 1));
        assert!(set.can_upgrade(0, 2));
        assert!(set.can_upgrade(1, 1));
    }

    #[test]
    fn upgrade_refused_at_full_rank() {
        let set = set_with_points(&[4, 4]);
        assert!(!set.can_upgrade(0, 10));
    }

    #[test]
    fn lone_skill_only_bounded_by_max() {
        let mut set = set_with_points(&[3]);
        assert!(set.can_upgrade(0, 0));
        assert_eq!(set.upgrade(0, 0).unwrap(), Some(4));
        assert_eq!(set.upgrade(0, 0).unwrap(), None);
    }

    #[test]
    fn unknown_slot_cannot_upgrade() {
        let set = set_with_points(&[0]);
        assert!(!set.can_upgrade(3, 1));
    }
}
