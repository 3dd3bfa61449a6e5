use crate::state::{CharacterId, World};

/// Alerts the victim's team that it is under attack.
///
/// Only fires when `damager` is an enemy of `victim`. Every character on the
/// victim's team within `radius` of the victim (planar, inclusive, victim
/// included) receives the alert synchronously, in roster order. Returns the
/// notified characters.
pub fn call_for_help(
    world: &mut World,
    victim: CharacterId,
    damager: CharacterId,
    radius: f32,
) -> Vec<CharacterId> {
    let (Some(victim_char), Some(damager_char)) = (world.get(victim), world.get(damager)) else {
        return Vec::new();
    };
    if !victim_char.is_enemy_of(damager_char) {
        return Vec::new();
    }

    let allies = world.team_within(victim_char.team, victim_char.position, radius);
    for &ally in &allies {
        if let Some(character) = world.get_mut(ally) {
            character.receive_call_for_help(victim, damager);
        }
    }
    allies
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::config::CombatConfig;
    use crate::state::{Character, TeamId};

    const VICTIM: CharacterId = CharacterId(1);
    const DAMAGER: CharacterId = CharacterId(9);

    fn world() -> World {
        let mut world = World::new();
        let spots = [(1, 0.0), (2, 700.0), (3, 711.0), (4, 500.0)];
        for (id, y) in spots {
            world
                .spawn(Character::new(CharacterId(id), TeamId(0), Vec3::new(0.0, y, 0.0)))
                .unwrap();
        }
        world
            .spawn(Character::new(DAMAGER, TeamId(1), Vec3::new(100.0, 0.0, 0.0)))
            .unwrap();
        world
    }

    #[test]
    fn notifies_team_within_alert_radius() {
        let mut world = world();
        let notified = call_for_help(
            &mut world,
            VICTIM,
            DAMAGER,
            CombatConfig::DEFAULT_ALERT_RADIUS,
        );

        assert_eq!(notified, vec![VICTIM, CharacterId(2), CharacterId(4)]);
        assert_eq!(world.get(CharacterId(2)).unwrap().help_requests().len(), 1);
        assert!(world.get(CharacterId(3)).unwrap().help_requests().is_empty());
        assert_eq!(
            world.get(CharacterId(4)).unwrap().current_target(),
            Some(DAMAGER)
        );
        assert!(world.get(DAMAGER).unwrap().help_requests().is_empty());
    }

    #[test]
    fn friendly_damage_raises_no_alert() {
        let mut world = world();
        let notified = call_for_help(&mut world, VICTIM, CharacterId(2), 710.0);
        assert!(notified.is_empty());
        assert!(world.get(CharacterId(4)).unwrap().help_requests().is_empty());
    }

    #[test]
    fn each_call_notifies_again() {
        let mut world = world();
        call_for_help(&mut world, VICTIM, DAMAGER, 710.0);
        call_for_help(&mut world, VICTIM, DAMAGER, 710.0);
        assert_eq!(world.get(CharacterId(2)).unwrap().help_requests().len(), 2);
    }
}
