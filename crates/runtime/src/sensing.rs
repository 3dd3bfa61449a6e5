//! Periodic pawn sensing feeding the targeting controllers.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use realm_core::targeting::sense_pawns;
use realm_core::{
    CharacterId, SensingConfig, TargetingController, Tick, TimerHandle, TimerQueue, World,
};

/// Timer payload for one observer's next sensing sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensingSweep {
    pub observer: CharacterId,
}

/// Schedules sensing sweeps on the simulation timer and reports what each
/// observer perceives to its controller.
#[derive(Debug)]
pub struct PawnSensor {
    config: SensingConfig,
    sweeps: BTreeMap<CharacterId, TimerHandle>,
}

impl PawnSensor {
    pub fn new(config: SensingConfig) -> Self {
        Self {
            config,
            sweeps: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SensingConfig {
        &self.config
    }

    /// Sweep period, never shorter than one tick.
    pub fn interval(&self) -> Tick {
        Tick::from_secs(self.config.interval_secs).max(Tick(1))
    }

    /// Starts periodic sweeps for `observer`, replacing any running schedule.
    pub fn start<E>(&mut self, observer: CharacterId, timers: &mut TimerQueue<E>)
    where
        E: From<SensingSweep>,
    {
        self.stop(observer, timers);
        let handle = timers.schedule_after(self.interval(), SensingSweep { observer }.into());
        self.sweeps.insert(observer, handle);
    }

    /// Stops sweeping for `observer`. Returns false if no sweep was scheduled.
    pub fn stop<E>(&mut self, observer: CharacterId, timers: &mut TimerQueue<E>) -> bool {
        match self.sweeps.remove(&observer) {
            Some(handle) => timers.cancel(handle),
            None => false,
        }
    }

    pub fn is_sensing(&self, observer: CharacterId) -> bool {
        self.sweeps.contains_key(&observer)
    }

    /// Runs one sweep immediately. Returns how many new candidates the
    /// controller accepted.
    pub fn sweep(&self, world: &World, controller: &mut TargetingController) -> usize {
        let observer = controller.owner();
        let accepted = sense_pawns(world, observer, &self.config)
            .into_iter()
            .filter(|&pawn| controller.on_sensed(world, pawn))
            .count();

        if accepted > 0 {
            debug!(
                target: "runtime::sensing",
                observer = %observer,
                accepted,
                candidates = controller.candidates().len(),
                "New targets sensed"
            );
        }
        accepted
    }

    /// Handles a fired sweep timer and re-arms the next one.
    ///
    /// A handle that no longer matches the observer's schedule is ignored.
    pub fn on_sweep_fired<E>(
        &mut self,
        handle: TimerHandle,
        world: &World,
        controller: &mut TargetingController,
        timers: &mut TimerQueue<E>,
    ) -> Option<usize>
    where
        E: From<SensingSweep>,
    {
        let observer = controller.owner();
        if self.sweeps.get(&observer) != Some(&handle) {
            trace!(
                target: "runtime::sensing",
                observer = %observer,
                handle = handle.raw(),
                "Stale sensing sweep ignored"
            );
            return None;
        }

        let accepted = self.sweep(world, controller);
        let next = timers.schedule_after(self.interval(), SensingSweep { observer }.into());
        self.sweeps.insert(observer, next);
        Some(accepted)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use realm_core::{Character, TeamId};

    use super::*;

    fn world() -> World {
        let mut world = World::new();
        world
            .spawn(Character::new(CharacterId(1), TeamId(0), Vec3::ZERO))
            .unwrap();
        world
            .spawn(Character::new(CharacterId(2), TeamId(1), Vec3::new(300.0, 0.0, 0.0)))
            .unwrap();
        world
    }

    #[test]
    fn sweep_reschedules_itself() {
        let world = world();
        let mut timers: TimerQueue<SensingSweep> = TimerQueue::new();
        let mut sensor = PawnSensor::new(SensingConfig::default());
        let mut controller = TargetingController::new(CharacterId(1), SensingConfig::default());

        sensor.start(CharacterId(1), &mut timers);
        let fired = timers.next_due(Tick(250)).unwrap();
        assert_eq!(fired.payload.observer, CharacterId(1));

        let accepted = sensor.on_sweep_fired(fired.handle, &world, &mut controller, &mut timers);
        assert_eq!(accepted, Some(1));
        assert_eq!(controller.candidates(), &[CharacterId(2)]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn stopped_sensor_ignores_fired_handle() {
        let world = world();
        let mut timers: TimerQueue<SensingSweep> = TimerQueue::new();
        let mut sensor = PawnSensor::new(SensingConfig::default());
        let mut controller = TargetingController::new(CharacterId(1), SensingConfig::default());

        sensor.start(CharacterId(1), &mut timers);
        let handle = timers.next_due(Tick(250)).unwrap().handle;
        assert!(!sensor.stop(CharacterId(1), &mut timers));
        assert!(!sensor.is_sensing(CharacterId(1)));

        assert_eq!(
            sensor.on_sweep_fired(handle, &world, &mut controller, &mut timers),
            None
        );
        assert!(timers.is_empty());
    }
}
