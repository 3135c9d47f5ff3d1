//! Timers on the simulation clock
//!
//! Every timer carries the generation of the match that scheduled it. The
//! orchestrator bumps the generation on every match transition, so an event
//! fired for an older generation is stale and must be ignored by the caller.

use crate::catalog::AbilityKind;

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second of the run countdown elapsed
    Countdown,
    /// Time to run the collision resolver
    ResolverPoll,
    /// A timed ability ran out; `token` identifies the activation
    AbilityExpired { kind: AbilityKind, token: u64 },
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub generation: u64,
    pub event: TimerEvent,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    generation: u64,
    due_tick: u64,
    /// Re-arm interval for repeating timers
    period: Option<u64>,
    event: TimerEvent,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    /// Fire once, `delay` ticks after `now`
    pub fn schedule_once(
        &mut self,
        now: u64,
        delay: u64,
        generation: u64,
        event: TimerEvent,
    ) -> TimerId {
        let id = self.allocate_id();
        self.timers.push(Timer {
            id,
            generation,
            due_tick: now + delay.max(1),
            period: None,
            event,
        });
        id
    }

    /// Fire every `period` ticks, first at `now + period`
    pub fn schedule_repeating(
        &mut self,
        now: u64,
        period: u64,
        generation: u64,
        event: TimerEvent,
    ) -> TimerId {
        let id = self.allocate_id();
        let period = period.max(1);
        self.timers.push(Timer {
            id,
            generation,
            due_tick: now + period,
            period: Some(period),
            event,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Drop every timer belonging to `generation`, returning how many went
    pub fn cancel_generation(&mut self, generation: u64) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.generation != generation);
        before - self.timers.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Collect all timers due at or before `now`, ordered by due tick then id.
    /// Repeating timers are re-armed; one-shot timers are removed.
    pub fn poll(&mut self, now: u64) -> Vec<Fired> {
        let mut due: Vec<(u64, Fired)> = Vec::new();

        for timer in &mut self.timers {
            // A repeating timer can owe several firings after a long gap
            while timer.due_tick <= now {
                due.push((
                    timer.due_tick,
                    Fired {
                        id: timer.id,
                        generation: timer.generation,
                        event: timer.event,
                    },
                ));
                match timer.period {
                    Some(period) => timer.due_tick += period,
                    None => break,
                }
            }
        }
        self.timers
            .retain(|t| t.period.is_some() || t.due_tick > now);

        due.sort_by_key(|(tick, fired)| (*tick, fired.id));
        due.into_iter().map(|(_, fired)| fired).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut s = Scheduler::new();
        let id = s.schedule_once(0, 3, 1, TimerEvent::Countdown);
        assert!(s.poll(2).is_empty());
        let fired = s.poll(3);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert!(s.poll(10).is_empty());
        assert!(!s.is_scheduled(id));
    }

    #[test]
    fn test_repeating_rearms() {
        let mut s = Scheduler::new();
        s.schedule_repeating(0, 6, 1, TimerEvent::ResolverPoll);
        assert_eq!(s.poll(6).len(), 1);
        assert!(s.poll(11).is_empty());
        assert_eq!(s.poll(12).len(), 1);
        // Catch-up after a gap
        assert_eq!(s.poll(30).len(), 3);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let id = s.schedule_repeating(0, 1, 1, TimerEvent::Countdown);
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(s.poll(5).is_empty());
    }

    #[test]
    fn test_cancel_generation_leaves_others() {
        let mut s = Scheduler::new();
        s.schedule_repeating(0, 1, 1, TimerEvent::Countdown);
        s.schedule_once(0, 1, 1, TimerEvent::ResolverPoll);
        s.schedule_once(0, 1, 2, TimerEvent::ResolverPoll);
        assert_eq!(s.cancel_generation(1), 2);
        let fired = s.poll(1);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].generation, 2);
    }

    #[test]
    fn test_poll_orders_by_due_then_id() {
        let mut s = Scheduler::new();
        let late = s.schedule_once(0, 5, 1, TimerEvent::Countdown);
        let early = s.schedule_once(0, 2, 1, TimerEvent::ResolverPoll);
        let fired = s.poll(5);
        assert_eq!(fired.iter().map(|f| f.id).collect::<Vec<_>>(), vec![early, late]);
    }
}
