use crate::config::SensingConfig;
use crate::state::{CharacterId, World, planar_distance_sq, planar_unit};

/// Characters `observer` can currently perceive.
///
/// A pawn is perceived when it lies within the sensing radius (planar,
/// inclusive) and inside the peripheral angle centred on the observer's
/// facing. Teams and health are not checked here; the controller filters.
pub fn sense_pawns(world: &World, observer: CharacterId, sensing: &SensingConfig) -> Vec<CharacterId> {
    let Some(eye) = world.get(observer) else {
        return Vec::new();
    };
    let radius_sq = sensing.radius_sq();
    let min_cos = sensing.min_view_cosine();
    let facing = planar_unit(eye.facing).unwrap_or(glam::Vec3::X);

    world
        .iter()
        .filter(|pawn| pawn.id != observer)
        .filter(|pawn| planar_distance_sq(eye.position, pawn.position) <= radius_sq)
        .filter(|pawn| match planar_unit(pawn.position - eye.position) {
            Some(dir) => facing.dot(dir) >= min_cos,
            None => true,
        })
        .map(|pawn| pawn.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::state::{Character, TeamId};

    #[test]
    fn sees_front_half_within_radius() {
        let mut world = World::new();
        world
            .spawn(Character::new(CharacterId(1), TeamId(0), Vec3::ZERO).with_facing(Vec3::X))
            .unwrap();
        let spots = [(2, 500.0, 0.0), (3, -500.0, 0.0), (4, 0.0, 900.0), (5, 1200.0, 0.0)];
        for (id, x, y) in spots {
            world
                .spawn(Character::new(CharacterId(id), TeamId(1), Vec3::new(x, y, 0.0)))
                .unwrap();
        }

        let seen = sense_pawns(&world, CharacterId(1), &SensingConfig::default());
        assert_eq!(seen, vec![CharacterId(2), CharacterId(4)]);
    }

    #[test]
    fn narrow_angle_excludes_flank() {
        let mut world = World::new();
        world
            .spawn(Character::new(CharacterId(1), TeamId(0), Vec3::ZERO))
            .unwrap();
        world
            .spawn(Character::new(CharacterId(2), TeamId(1), Vec3::new(100.0, 100.0, 0.0)))
            .unwrap();

        let sensing = SensingConfig {
            peripheral_angle_deg: 60.0,
            ..SensingConfig::default()
        };
        assert!(sense_pawns(&world, CharacterId(1), &sensing).is_empty());
    }
}
