use crate::config::SensingConfig;
use crate::state::{CharacterId, Targetable, World, is_hostile, planar_distance_sq};

/// Per-character auto-targeting state.
#[derive(Clone, Debug)]
pub struct TargetingController {
    owner: CharacterId,
    sensing: SensingConfig,
    /// Sensed enemies in first-sensed order. Never contains duplicates.
    candidates: Vec<CharacterId>,
    current: Option<CharacterId>,
}

impl TargetingController {
    pub fn new(owner: CharacterId, sensing: SensingConfig) -> Self {
        Self {
            owner,
            sensing,
            candidates: Vec::new(),
            current: None,
        }
    }

    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    pub fn sensing(&self) -> &SensingConfig {
        &self.sensing
    }

    pub fn candidates(&self) -> &[CharacterId] {
        &self.candidates
    }

    /// Result of the last re-evaluation.
    pub fn current_target(&self) -> Option<CharacterId> {
        self.current
    }

    /// Offers a sensed pawn as a candidate.
    ///
    /// Accepted only if it resolves to a living character on another team.
    /// Returns whether the candidate list grew.
    pub fn on_sensed(&mut self, world: &World, pawn: CharacterId) -> bool {
        let Some(owner) = world.get(self.owner) else {
            return false;
        };
        let Some(sensed) = world.get(pawn) else {
            return false;
        };
        if !is_hostile(owner, sensed) {
            return false;
        }
        if self.candidates.contains(&pawn) {
            return false;
        }

        self.candidates.push(pawn);
        true
    }

    /// Picks the nearest valid candidate and applies it to the owner.
    ///
    /// Candidates that no longer resolve, are dead, or sit outside the
    /// sensing radius are dropped. Ties on squared planar distance go to the
    /// candidate sensed first. With no survivor the owner stops
    /// auto-attacking.
    pub fn reevaluate(&mut self, world: &mut World) -> Option<CharacterId> {
        let Some(origin) = world.get(self.owner).map(|c| c.position) else {
            self.candidates.clear();
            self.current = None;
            return None;
        };
        let radius_sq = self.sensing.radius_sq();

        let mut best: Option<(CharacterId, f32)> = None;
        self.candidates.retain(|&id| {
            let Some(candidate) = world.get(id) else {
                return false;
            };
            if !candidate.is_alive() {
                return false;
            }
            let dist_sq = planar_distance_sq(origin, candidate.location());
            if dist_sq > radius_sq {
                return false;
            }

            if best.is_none_or(|(_, best_sq)| dist_sq < best_sq) {
                best = Some((id, dist_sq));
            }
            true
        });

        self.current = best.map(|(id, _)| id);
        if let Some(owner) = world.get_mut(self.owner) {
            match self.current {
                Some(target) => owner.set_current_target(target),
                None => owner.stop_auto_attack(),
            }
        }
        self.current
    }

    /// Drops every candidate, e.g. when the owner respawns.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.current = None;
    }
}
