// Pattern sequencer - Looped scheduling of drum pattern events
//
// Plays one pattern at a time. Each measure, every pattern event is armed
// as a one-shot at `offset_beats * beat_ms`; a repeating measure timer
// re-arms the next measure while the loop is active. Cancellation is
// cooperative: stopping cancels the measure timer and bumps the
// generation, and one-shots already in the queue are dropped when they
// come due because their generation no longer matches.

use crate::sequencer::TimerTask;
use crate::sequencer::pattern::{Instrument, Pattern};
use crate::sequencer::scheduler::{TimerId, TimerQueue};

#[derive(Debug)]
struct ActiveLoop {
    pattern: Pattern,
    measure_timer: TimerId,
}

/// Schedules the events of one looping pattern
#[derive(Debug)]
pub struct PatternSequencer {
    active: Option<ActiveLoop>,
    generation: u64,
}

impl PatternSequencer {
    pub fn new() -> Self {
        Self {
            active: None,
            generation: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the looping pattern, if any
    pub fn playing_id(&self) -> Option<&'static str> {
        self.active.as_ref().map(|l| l.pattern.id())
    }

    /// Start looping a pattern at its own tempo, replacing any current loop
    pub fn play(&mut self, pattern: &Pattern, timers: &mut TimerQueue<TimerTask>) {
        self.stop(timers);
        self.generation += 1;

        self.schedule_measure(pattern, timers);
        let measure_timer = timers.schedule_every(
            pattern.tempo().pattern_measure_ms(),
            TimerTask::MeasureElapsed {
                generation: self.generation,
            },
        );
        self.active = Some(ActiveLoop {
            pattern: pattern.clone(),
            measure_timer,
        });
    }

    /// Stop the loop. Idempotent; queued event one-shots die on the
    /// generation check when they come due.
    pub fn stop(&mut self, timers: &mut TimerQueue<TimerTask>) {
        if let Some(active) = self.active.take() {
            timers.cancel(active.measure_timer);
        }
        self.generation += 1;
    }

    /// Handle the measure boundary: arm the next measure's events
    pub fn on_measure_elapsed(&mut self, generation: u64, timers: &mut TimerQueue<TimerTask>) {
        if generation != self.generation {
            return;
        }
        if let Some(active) = self.active.take() {
            self.schedule_measure(&active.pattern, timers);
            self.active = Some(active);
        }
    }

    /// Handle an event fire. Returns the instrument to trigger, or None
    /// for stale fires.
    pub fn on_event(&self, generation: u64, instrument: Instrument) -> Option<Instrument> {
        if self.active.is_some() && generation == self.generation {
            Some(instrument)
        } else {
            None
        }
    }

    fn schedule_measure(&self, pattern: &Pattern, timers: &mut TimerQueue<TimerTask>) {
        let beat_ms = pattern.tempo().beat_interval_ms();
        for event in pattern.events() {
            timers.schedule_once(
                event.offset_beats * beat_ms,
                TimerTask::PatternHit {
                    generation: self.generation,
                    instrument: event.instrument,
                },
            );
        }
    }
}

impl Default for PatternSequencer {
    fn default() -> Self {
        Self::new()
    }
}
