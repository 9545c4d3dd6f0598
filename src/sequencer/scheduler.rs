// Timer queue - Cooperative timer scheduling
//
// The host "call me back after N ms" facility, made explicit so that
// cancellation semantics are testable without a live timer system. Sessions
// schedule one-shot and repeating entries and receive opaque cancellable
// handles; the owner pumps the queue with the current time (wall clock in
// production, synthetic time in tests) and handles the tasks that come due.
//
// Entries due at the same instant fire in insertion order, mirroring the
// ordering a host event queue would give two timers armed for the same
// deadline.

/// Opaque handle for a scheduled entry. Owned by the session that created
/// it; cancelling an unknown or already-fired handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct TimerEntry<T> {
    id: TimerId,
    due_ms: f64,
    /// Re-arm interval for repeating entries, None for one-shots
    repeat_ms: Option<f64>,
    /// Insertion order, used to break ties between equal deadlines
    seq: u64,
    task: T,
}

/// Queue of pending timer callbacks, keyed by deadline in milliseconds.
///
/// Time never advances on its own: `pop_due` moves the internal clock
/// forward to the deadline of the entry it fires, so tasks scheduled while
/// handling a fire are relative to the fire time, not the pump time.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: f64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<TimerEntry<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 1,
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    /// Current queue time in milliseconds (the last pumped instant)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Schedule a one-shot entry `delay_ms` from the current queue time
    pub fn schedule_once(&mut self, delay_ms: f64, task: T) -> TimerId {
        self.push(self.now_ms + delay_ms, None, task)
    }

    /// Schedule a repeating entry firing every `interval_ms`
    ///
    /// The first fire is one interval from now. The interval must be
    /// positive; a zero interval would pump forever.
    pub fn schedule_every(&mut self, interval_ms: f64, task: T) -> TimerId {
        assert!(interval_ms > 0.0, "repeat interval must be positive");
        self.push(self.now_ms + interval_ms, Some(interval_ms), task)
    }

    fn push(&mut self, due_ms: f64, repeat_ms: Option<f64>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(TimerEntry {
            id,
            due_ms,
            repeat_ms,
            seq,
            task,
        });
        id
    }

    /// Cancel a pending entry. No-op if the handle is unknown (e.g. a
    /// one-shot that already fired).
    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Whether a handle is still pending
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of pending entries
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Number of pending repeating entries
    pub fn pending_repeating(&self) -> usize {
        self.entries.iter().filter(|e| e.repeat_ms.is_some()).count()
    }

    /// Fire the earliest entry due at or before `now_ms`, if any.
    ///
    /// Repeating entries re-arm relative to their own deadline (no drift).
    /// When nothing is due the queue time is advanced to `now_ms` and None
    /// is returned. Callers pump in a loop until None.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<T>
    where
        T: Clone,
    {
        let due_index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i);

        match due_index {
            Some(i) => {
                let fired_at = self.entries[i].due_ms;
                if fired_at > self.now_ms {
                    self.now_ms = fired_at;
                }
                match self.entries[i].repeat_ms {
                    Some(interval) => {
                        let task = self.entries[i].task.clone();
                        self.entries[i].due_ms += interval;
                        Some(task)
                    }
                    None => Some(self.entries.swap_remove(i).task),
                }
            }
            None => {
                if now_ms > self.now_ms {
                    self.now_ms = now_ms;
                }
                None
            }
        }
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
