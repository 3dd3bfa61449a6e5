//! One-shot timer queue driving every scheduled callback in the simulation.
//!
//! Timers are ordered by `(fire_at, handle)`, so timers due at the same tick
//! fire in the order they were armed. Cancelling a timer removes its payload;
//! the stale heap entry is skipped when it reaches the front, which makes
//! firing a cancelled timer a guaranteed no-op.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::state::Tick;

/// Cancellation token for a scheduled timer.
///
/// Handles are never reused, so a handle held by a destroyed or reset owner
/// can be compared safely against a fired timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A timer whose fire time has been reached.
#[derive(Clone, Debug, PartialEq)]
pub struct FiredTimer<E> {
    pub handle: TimerHandle,
    pub fire_at: Tick,
    pub payload: E,
}

/// Priority queue of `(fire_at, handle, payload)` with a simulation clock.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Tick,
    next_handle: u64,
    heap: BinaryHeap<Reverse<(Tick, TimerHandle)>>,
    live: BTreeMap<TimerHandle, (Tick, E)>,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now: Tick::ZERO,
            next_handle: 1,
            heap: BinaryHeap::new(),
            live: BTreeMap::new(),
        }
    }

    /// Current simulation time as seen by the queue.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Arms a one-shot timer firing `delay` after the current time.
    pub fn schedule_after(&mut self, delay: Tick, payload: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        let fire_at = self.now + delay;
        self.heap.push(Reverse((fire_at, handle)));
        self.live.insert(handle, (fire_at, payload));
        handle
    }

    /// Cancels a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.live.remove(&handle).is_some()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Absolute fire time of an active timer.
    pub fn fire_time(&self, handle: TimerHandle) -> Option<Tick> {
        self.live.get(&handle).map(|(fire_at, _)| *fire_at)
    }

    /// Time left until an active timer fires.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Tick> {
        self.fire_time(handle).map(|fire_at| self.now.until(fire_at))
    }

    /// Number of live (not yet fired, not cancelled) timers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Pops the earliest live timer due at or before `deadline`.
    ///
    /// The clock moves forward to the timer's fire time, so callbacks that
    /// re-arm timers schedule relative to the moment they fired. Call
    /// [`TimerQueue::settle`] once nothing more is due.
    pub fn next_due(&mut self, deadline: Tick) -> Option<FiredTimer<E>> {
        while let Some(Reverse((fire_at, handle))) = self.heap.peek().copied() {
            if fire_at > deadline {
                return None;
            }
            self.heap.pop();

            // Cancelled timers leave their heap entry behind.
            let Some((_, payload)) = self.live.remove(&handle) else {
                continue;
            };

            self.now = self.now.max(fire_at);
            return Some(FiredTimer {
                handle,
                fire_at,
                payload,
            });
        }
        None
    }

    /// Moves the clock to `deadline` after all due timers were drained.
    pub fn settle(&mut self, deadline: Tick) {
        self.now = self.now.max(deadline);
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
