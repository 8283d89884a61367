//! Deferred effects against the simulation clock.
//!
//! Effects that fire "N seconds later" are queued here instead of being
//! tracked by ad-hoc counters. The clock only moves when the simulation
//! ticks, so a paused or throttled client does not lose timers.

use crate::projectile::SlotHandle;

/// Something to do at a later time. Every effect is checked against the
/// current state when it fires, so a stale one is a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    ExpireProjectile(SlotHandle),
    /// The local actor may shoot and move again
    EndShooting,
    RespawnEnemy(usize),
    RespawnLocalActor,
    /// One second of the respawn countdown has elapsed
    CountdownStep,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: f64,
    seq: u64,
    effect: Deferred,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    pending: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }

    pub fn schedule(&mut self, delay: f64, effect: Deferred) {
        let entry = Entry {
            due: self.now + delay.max(0.0),
            seq: self.next_seq,
            effect,
        };
        self.next_seq += 1;
        self.pending.push(entry);
    }

    /// Removes and returns every effect due by now, earliest first. Effects
    /// due at the same instant come out in the order they were scheduled.
    pub fn drain_due(&mut self) -> Vec<Deferred> {
        let now = self.now;
        let (mut due, pending): (Vec<Entry>, Vec<Entry>) =
            self.pending.drain(..).partition(|e| e.due <= now);
        self.pending = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.effect).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, Deferred::EndShooting);

        scheduler.advance(0.5);
        assert!(scheduler.drain_due().is_empty());

        scheduler.advance(0.5);
        assert_eq!(scheduler.drain_due(), vec![Deferred::EndShooting]);
        assert_eq!(scheduler.pending_len(), 0);
    }

    #[test]
    fn test_order_is_due_then_schedule() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2.0, Deferred::RespawnLocalActor);
        scheduler.schedule(1.0, Deferred::CountdownStep);
        scheduler.schedule(2.0, Deferred::RespawnEnemy(4));

        scheduler.advance(3.0);
        assert_eq!(
            scheduler.drain_due(),
            vec![
                Deferred::CountdownStep,
                Deferred::RespawnLocalActor,
                Deferred::RespawnEnemy(4),
            ]
        );
    }

    #[test]
    fn test_ignores_bad_dt() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(-1.0);
        scheduler.advance(f64::NAN);
        assert_eq!(scheduler.now(), 0.0);
    }
}
