//! Swept-volume queries against character collision spheres.
//!
//! Characters are modelled as spheres of `collision_radius` centred on their
//! position. Dead characters have no collision.

use glam::Vec3;

use crate::state::{CharacterId, CollisionChannels, World};

/// Number of spheres used to approximate a cone.
pub const CONE_TRACE_STEPS: usize = 5;

/// Ratio between a cone's base radius and its height.
pub const CONE_RADIUS_RATIO: f32 = 0.5;

/// A character touched by a trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    pub character: CharacterId,
    /// Position along the sweep in `[0, 1]` where contact begins.
    pub fraction: f32,
    /// Sweep centre at the moment of contact.
    pub location: Vec3,
}

/// Sweeps a sphere of `radius` from `start` to `end`.
///
/// Returns every character responding to `channel` that the sphere touches,
/// ordered by sweep fraction (ties keep roster order). `ignore` is never hit.
pub fn sphere_trace(
    world: &World,
    ignore: Option<CharacterId>,
    start: Vec3,
    end: Vec3,
    radius: f32,
    channel: CollisionChannels,
) -> Vec<TraceHit> {
    let mut hits: Vec<TraceHit> = world
        .iter()
        .filter(|c| Some(c.id) != ignore && c.is_alive() && c.channels.intersects(channel))
        .filter_map(|c| {
            sweep_fraction(start, end, radius + c.collision_radius, c.position).map(|fraction| {
                TraceHit {
                    character: c.id,
                    fraction,
                    location: start.lerp(end, fraction),
                }
            })
        })
        .collect();

    hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
    hits
}

/// Approximates a cone of `height` along `dir` with a line of spheres.
///
/// The cone is split into [`CONE_TRACE_STEPS`] segments; each is swept with a
/// sphere whose radius grows linearly to `height * CONE_RADIUS_RATIO` at the
/// base. Returns unique characters in first-hit order.
pub fn cone_trace(
    world: &World,
    ignore: Option<CharacterId>,
    start: Vec3,
    dir: Vec3,
    height: f32,
    channel: CollisionChannels,
) -> Vec<CharacterId> {
    let Some(dir) = dir.try_normalize() else {
        return Vec::new();
    };
    if !(height > 0.0) {
        return Vec::new();
    }

    let step_len = height / CONE_TRACE_STEPS as f32;
    let mut found = Vec::new();

    for step in 0..CONE_TRACE_STEPS {
        let seg_start = start + dir * (step_len * step as f32);
        let seg_end = start + dir * (step_len * (step + 1) as f32);
        let radius = step_len * (step + 1) as f32 * CONE_RADIUS_RATIO;

        for hit in sphere_trace(world, ignore, seg_start, seg_end, radius, channel) {
            if !found.contains(&hit.character) {
                found.push(hit.character);
            }
        }
    }
    found
}

/// Earliest `t` in `[0, 1]` where a point moving `start -> end` comes within
/// `reach` of `target`.
fn sweep_fraction(start: Vec3, end: Vec3, reach: f32, target: Vec3) -> Option<f32> {
    let reach_sq = reach * reach;
    let offset = start - target;
    if offset.length_squared() <= reach_sq {
        return Some(0.0);
    }

    let delta = end - start;
    let a = delta.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * offset.dot(delta);
    let c = offset.length_squared() - reach_sq;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (0.0..=1.0).contains(&t).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Character, TeamId};

    fn spawn(world: &mut World, id: u32, x: f32, y: f32) {
        let mut c = Character::new(CharacterId(id), TeamId(1), Vec3::new(x, y, 0.0));
        c.collision_radius = 10.0;
        world.spawn(c).unwrap();
    }

    #[test]
    fn sphere_trace_orders_by_fraction() {
        let mut world = World::new();
        spawn(&mut world, 1, 80.0, 0.0);
        spawn(&mut world, 2, 30.0, 5.0);
        spawn(&mut world, 3, 50.0, 100.0);

        let hits = sphere_trace(
            &world,
            None,
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
            5.0,
            CollisionChannels::PAWN,
        );
        let ids: Vec<_> = hits.iter().map(|h| h.character).collect();
        assert_eq!(ids, vec![CharacterId(2), CharacterId(1)]);
        assert!(hits[0].fraction < hits[1].fraction);
    }

    #[test]
    fn sphere_trace_skips_ignored_dead_and_other_channels() {
        let mut world = World::new();
        spawn(&mut world, 1, 20.0, 0.0);
        spawn(&mut world, 2, 40.0, 0.0);
        spawn(&mut world, 3, 60.0, 0.0);
        world.get_mut(CharacterId(2)).unwrap().take_damage(1000.0);
        world.get_mut(CharacterId(3)).unwrap().channels = CollisionChannels::VISIBILITY;

        let hits = sphere_trace(
            &world,
            Some(CharacterId(1)),
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
            1.0,
            CollisionChannels::PAWN,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn start_overlap_reports_zero_fraction() {
        let mut world = World::new();
        spawn(&mut world, 1, 0.0, 0.0);

        let hits = sphere_trace(
            &world,
            None,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(100.0, 0.0, 0.0),
            1.0,
            CollisionChannels::PAWN,
        );
        assert_eq!(hits[0].fraction, 0.0);
    }

    #[test]
    fn cone_widens_towards_base() {
        let mut world = World::new();
        // Near the apex and off-axis: outside the narrow tip.
        spawn(&mut world, 1, 10.0, 60.0);
        // Near the base and equally far off-axis: inside the wide end.
        spawn(&mut world, 2, 180.0, 60.0);
        spawn(&mut world, 3, 100.0, 0.0);

        let found = cone_trace(
            &world,
            None,
            Vec3::ZERO,
            Vec3::X,
            200.0,
            CollisionChannels::PAWN,
        );
        assert_eq!(found, vec![CharacterId(3), CharacterId(2)]);
    }

    #[test]
    fn cone_with_zero_direction_hits_nothing() {
        let mut world = World::new();
        spawn(&mut world, 1, 0.0, 0.0);
        assert!(cone_trace(&world, None, Vec3::ZERO, Vec3::ZERO, 100.0, CollisionChannels::PAWN).is_empty());
    }
}
