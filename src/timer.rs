#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    pub timer: TimerId,
    pub owner: String,
    pub at: u64, // virtual ms
}

#[derive(Debug, Clone)]
struct Interval {
    id: TimerId,
    owner: String,
    period: u64,
    next_due: u64,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: u64,
    next_id: u64,
    intervals: Vec<Interval>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fires every `period_ms` (at least 1) from now on, on behalf of `owner`.
    pub fn set_interval(&mut self, owner: &str, period_ms: u64) -> TimerId {
        let period = period_ms.max(1);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval {
            id,
            owner: owner.to_string(),
            period,
            next_due: self.now + period,
        });
        id
    }

    pub fn clear(&mut self, timer: TimerId) {
        self.intervals.retain(|i| i.id != timer);
    }

    pub fn is_active(&self, timer: TimerId) -> bool {
        self.intervals.iter().any(|i| i.id == timer)
    }

    pub fn active_count(&self) -> usize {
        self.intervals.len()
    }

    /// Pops the earliest interval due at or before `deadline`, moving the
    /// clock to its due time and rescheduling it.
    ///
    /// Callers dispatch each firing before asking for the next one, so a
    /// timer cleared by a handler never fires afterwards.
    pub fn pop_due(&mut self, deadline: u64) -> Option<Fired> {
        let interval = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due <= deadline)
            .min_by_key(|i| (i.next_due, i.id))?;
        let at = interval.next_due;
        interval.next_due += interval.period;
        let fired = Fired { timer: interval.id, owner: interval.owner.clone(), at };
        self.now = at;
        Some(fired)
    }

    pub fn settle(&mut self, deadline: u64) {
        self.now = self.now.max(deadline);
    }

    /// Advances by `elapsed_ms`, collecting every firing in order.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<Fired> {
        let deadline = self.now + elapsed_ms;
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(deadline) {
            fired.push(f);
        }
        self.settle(deadline);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_period_boundaries() {
        let mut timers = TimerQueue::new();
        let t = timers.set_interval("a", 3000);
        assert!(timers.advance(2999).is_empty());
        let fired = timers.advance(1);
        assert_eq!(fired, vec![Fired { timer: t, owner: "a".into(), at: 3000 }]);
        assert_eq!(timers.now(), 3000);
    }

    #[test]
    fn long_advance_fires_repeatedly_in_order() {
        let mut timers = TimerQueue::new();
        timers.set_interval("slow", 300);
        timers.set_interval("fast", 100);
        let owners: Vec<String> = timers.advance(300).into_iter().map(|f| f.owner).collect();
        assert_eq!(owners, vec!["fast", "fast", "slow", "fast"]);
        assert_eq!(timers.now(), 300);
    }

    #[test]
    fn cleared_timer_stops_firing() {
        let mut timers = TimerQueue::new();
        let t = timers.set_interval("a", 10);
        assert_eq!(timers.advance(25).len(), 2);
        timers.clear(t);
        assert!(!timers.is_active(t));
        assert!(timers.advance(100).is_empty());
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut timers = TimerQueue::new();
        timers.set_interval("a", 0);
        assert_eq!(timers.advance(3).len(), 3);
    }
}
