use glam::Vec3;

use crate::state::{Character, CharacterId, TeamId, planar_distance_sq};

/// Errors raised while editing the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("character {0} is already in the world")]
    DuplicateCharacter(CharacterId),
}

/// Roster of every character in the simulation, in spawn order.
///
/// Doubles as the spatial index for radius queries; iteration order is spawn
/// order so every query is deterministic.
#[derive(Clone, Debug, Default)]
pub struct World {
    characters: Vec<Character>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, character: Character) -> Result<CharacterId, WorldError> {
        if self.contains(character.id) {
            return Err(WorldError::DuplicateCharacter(character.id));
        }
        let id = character.id;
        self.characters.push(character);
        Ok(id)
    }

    /// Removes a character. References held elsewhere become invalid.
    pub fn despawn(&mut self, id: CharacterId) -> Option<Character> {
        let index = self.characters.iter().position(|c| c.id == id)?;
        Some(self.characters.remove(index))
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.characters.iter().any(|c| c.id == id)
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        self.characters.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Ids of `team` members within `radius` (planar, inclusive) of `center`.
    pub fn team_within(&self, team: TeamId, center: Vec3, radius: f32) -> Vec<CharacterId> {
        let radius_sq = radius * radius;
        self.characters
            .iter()
            .filter(|c| c.team == team && planar_distance_sq(c.position, center) <= radius_sq)
            .map(|c| c.id)
            .collect()
    }
}
