// Beat clock - Periodic beat scheduling for the metronome
//
// Owns a repeating timer entry in the shared queue and tracks the beat
// index modulo the meter. A generation counter ties fires to the clock
// run that armed them; fires from a superseded run are dropped at
// handling time, so stop and restart never need to race the queue.

use crate::sequencer::TimerTask;
use crate::sequencer::scheduler::{TimerId, TimerQueue};
use crate::sequencer::timeline::{Tempo, TimeSignature};

/// One metronome beat, as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatTick {
    /// Index within the measure, 0-based
    pub beat_index: u32,
    /// Beat 0 of every measure is the accent
    pub is_accent: bool,
}

/// Periodic beat scheduler
///
/// The clock never touches audio itself; it reports `BeatTick`s and the
/// session decides what to do with them.
#[derive(Debug)]
pub struct BeatClock {
    tempo: Tempo,
    time_signature: TimeSignature,
    beat_index: u32,
    running: bool,
    /// Bumped on every stop or restart; fires carrying an older value
    /// belong to a superseded run and are ignored.
    generation: u64,
    timer: Option<TimerId>,
}

impl BeatClock {
    pub fn new() -> Self {
        Self {
            tempo: Tempo::default(),
            time_signature: TimeSignature::default(),
            beat_index: 0,
            running: false,
            generation: 0,
            timer: None,
        }
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Index of the most recently reported beat
    pub fn beat_index(&self) -> u32 {
        self.beat_index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start the clock. Returns the immediate beat-0 tick; subsequent
    /// ticks arrive through the timer queue every beat interval.
    ///
    /// Callers check `is_running` first; starting an already-running
    /// clock is handled one level up as a no-op.
    pub fn start(&mut self, timers: &mut TimerQueue<TimerTask>) -> BeatTick {
        self.generation += 1;
        self.beat_index = 0;
        self.running = true;
        self.arm(timers);
        BeatTick {
            beat_index: 0,
            is_accent: true,
        }
    }

    /// Stop the clock and reset the beat index. Idempotent.
    pub fn stop(&mut self, timers: &mut TimerQueue<TimerTask>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        self.generation += 1;
        self.beat_index = 0;
        self.running = false;
    }

    /// Handle a beat fire from the timer queue.
    ///
    /// Returns None for stale fires (older generation or stopped clock).
    pub fn on_timer(&mut self, generation: u64) -> Option<BeatTick> {
        if !self.running || generation != self.generation {
            return None;
        }
        self.beat_index = (self.beat_index + 1) % u32::from(self.time_signature.beats_per_measure());
        Some(BeatTick {
            beat_index: self.beat_index,
            is_accent: self.beat_index == 0,
        })
    }

    /// Change tempo. While running this is a full restart: the index
    /// resets and the immediate beat-0 tick is re-emitted (returned).
    pub fn set_tempo(
        &mut self,
        bpm: f64,
        timers: &mut TimerQueue<TimerTask>,
    ) -> Option<BeatTick> {
        self.tempo.set_bpm(bpm);
        if self.running {
            self.stop(timers);
            Some(self.start(timers))
        } else {
            None
        }
    }

    /// Change meter. While running the beat index resets and the timer
    /// re-arms at the current tempo, without an immediate tick.
    pub fn set_time_signature(
        &mut self,
        time_signature: TimeSignature,
        timers: &mut TimerQueue<TimerTask>,
    ) {
        self.time_signature = time_signature;
        self.beat_index = 0;
        if self.running {
            if let Some(id) = self.timer.take() {
                timers.cancel(id);
            }
            self.generation += 1;
            self.arm(timers);
        }
    }

    fn arm(&mut self, timers: &mut TimerQueue<TimerTask>) {
        let task = TimerTask::Beat {
            generation: self.generation,
        };
        self.timer = Some(timers.schedule_every(self.tempo.beat_interval_ms(), task));
    }
}

impl Default for BeatClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump(clock: &mut BeatClock, timers: &mut TimerQueue<TimerTask>, now_ms: f64) -> Vec<BeatTick> {
        let mut ticks = Vec::new();
        while let Some(task) = timers.pop_due(now_ms) {
            if let TimerTask::Beat { generation } = task {
                if let Some(tick) = clock.on_timer(generation) {
                    ticks.push(tick);
                }
            }
        }
        ticks
    }

    #[test]
    fn test_start_emits_immediate_accent() {
        let mut timers = TimerQueue::new();
        let mut clock = BeatClock::new();

        let first = clock.start(&mut timers);
        assert_eq!(first.beat_index, 0);
        assert!(first.is_accent);
        assert!(clock.is_running());
        assert_eq!(timers.pending_repeating(), 1);
    }

    #[test]
    fn test_accent_cycle_in_four_four() {
        let mut timers = TimerQueue::new();
        let mut clock = BeatClock::new();

        clock.start(&mut timers);
        // 120 BPM default, one beat every 500 ms; seven more beats
        let ticks = pump(&mut clock, &mut timers, 3500.0);
        let indices: Vec<u32> = ticks.iter().map(|t| t.beat_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 0, 1, 2, 3]);
        assert!(ticks[3].is_accent);
        assert!(!ticks[4].is_accent);
    }

    #[test]
    fn test_stop_resets_and_suppresses_stale_fires() {
        let mut timers = TimerQueue::new();
        let mut clock = BeatClock::new();

        clock.start(&mut timers);
        pump(&mut clock, &mut timers, 1000.0);
        let stale_generation = clock.generation();
        clock.stop(&mut timers);

        assert!(!clock.is_running());
        assert_eq!(clock.beat_index(), 0);
        assert_eq!(timers.pending(), 0);
        // A fire queued before the stop is ignored
        assert_eq!(clock.on_timer(stale_generation), None);

        // Idempotent
        clock.stop(&mut timers);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_set_tempo_while_running_restarts() {
        let mut timers = TimerQueue::new();
        let mut clock = BeatClock::new();

        clock.start(&mut timers);
        pump(&mut clock, &mut timers, 1000.0);
        assert_eq!(clock.beat_index(), 2);

        let tick = clock.set_tempo(80.0, &mut timers);
        assert_eq!(
            tick,
            Some(BeatTick {
                beat_index: 0,
                is_accent: true
            })
        );
        assert_eq!(clock.tempo().bpm(), 80.0);
        assert_eq!(clock.beat_index(), 0);
        assert_eq!(timers.pending_repeating(), 1);

        // Next fire is one 80 BPM interval (750 ms) after the restart
        let ticks = pump(&mut clock, &mut timers, 1000.0 + 750.0);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].beat_index, 1);
    }

    #[test]
    fn test_set_tempo_while_stopped_just_stores() {
        let mut timers = TimerQueue::new();
        let mut clock = BeatClock::new();

        assert_eq!(clock.set_tempo(90.0, &mut timers), None);
        assert_eq!(clock.tempo().bpm(), 90.0);
        assert!(!clock.is_running());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_set_time_signature_resets_index_without_tick() {
        let mut timers = TimerQueue::new();
        let mut clock = BeatClock::new();

        clock.start(&mut timers);
        pump(&mut clock, &mut timers, 1000.0);
        assert_eq!(clock.beat_index(), 2);

        clock.set_time_signature(TimeSignature::three_four(), &mut timers);
        assert_eq!(clock.beat_index(), 0);
        assert!(clock.is_running());
        assert_eq!(timers.pending_repeating(), 1);

        // Indices now cycle modulo 3
        let ticks = pump(&mut clock, &mut timers, 1000.0 + 4.0 * 500.0);
        let indices: Vec<u32> = ticks.iter().map(|t| t.beat_index).collect();
        assert_eq!(indices, vec![1, 2, 0, 1]);
    }
}
