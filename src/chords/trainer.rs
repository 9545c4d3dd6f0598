// Chord trainer - Timed random chord flashcards
//
// Flashes a random chord from the current category on a repeating timer.
// The set of candidate chords is captured at start; changing the library
// category while training does not change the rotation until a restart.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::chords::library::ChordLibrary;
use crate::sequencer::TimerTask;
use crate::sequencer::scheduler::{TimerId, TimerQueue};

/// Default flash interval in milliseconds
pub const DEFAULT_SPEED_MS: f64 = 2000.0;

pub struct ChordTrainer {
    running: bool,
    speed_ms: f64,
    /// Bumped on stop/restart; fires carrying an older value are ignored
    generation: u64,
    timer: Option<TimerId>,
    current: Option<&'static str>,
    /// Chord ids captured from the library category at start
    candidates: Vec<&'static str>,
    rng: SmallRng,
}

impl ChordTrainer {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Deterministic construction for tests
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            running: false,
            speed_ms: DEFAULT_SPEED_MS,
            generation: 0,
            timer: None,
            current: None,
            candidates: Vec::new(),
            rng,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    /// Chord id currently flashed, if training
    pub fn current(&self) -> Option<&'static str> {
        self.current
    }

    /// Start training on the library's current category. No-op when
    /// already running or when the category offers fewer than 2 chords.
    pub fn start(&mut self, library: &mut ChordLibrary, timers: &mut TimerQueue<TimerTask>) {
        if self.running {
            return;
        }
        let candidates: Vec<&'static str> = ChordLibrary::chords_in(library.category())
            .iter()
            .map(|c| c.id)
            .collect();
        if candidates.len() < 2 {
            return;
        }

        self.candidates = candidates;
        self.generation += 1;
        self.running = true;
        self.flash_random(library);
        self.timer = Some(timers.schedule_every(
            self.speed_ms,
            TimerTask::TrainerTick {
                generation: self.generation,
            },
        ));
    }

    /// Stop training. Idempotent; clears the flashed chord.
    pub fn stop(&mut self, timers: &mut TimerQueue<TimerTask>) {
        if !self.running {
            return;
        }
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        self.generation += 1;
        self.running = false;
        self.current = None;
    }

    pub fn toggle(&mut self, library: &mut ChordLibrary, timers: &mut TimerQueue<TimerTask>) {
        if self.running {
            self.stop(timers);
        } else {
            self.start(library, timers);
        }
    }

    /// Handle a trainer interval fire
    pub fn on_timer(
        &mut self,
        generation: u64,
        library: &mut ChordLibrary,
    ) -> Option<&'static str> {
        if !self.running || generation != self.generation {
            return None;
        }
        self.flash_random(library);
        self.current
    }

    /// Change the flash interval. Restarts the rotation while running.
    pub fn set_speed(
        &mut self,
        speed_ms: f64,
        library: &mut ChordLibrary,
        timers: &mut TimerQueue<TimerTask>,
    ) {
        self.speed_ms = speed_ms;
        if self.running {
            self.stop(timers);
            self.start(library, timers);
        }
    }

    fn flash_random(&mut self, library: &mut ChordLibrary) {
        let index = self.rng.gen_range(0..self.candidates.len());
        let id = self.candidates[index];
        self.current = Some(id);
        // The flash also drives the library selection
        library.select(id);
    }
}

impl Default for ChordTrainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chords::library::ChordCategory;

    fn trainer() -> ChordTrainer {
        ChordTrainer::with_rng(SmallRng::seed_from_u64(7))
    }

    fn pump(
        trainer: &mut ChordTrainer,
        library: &mut ChordLibrary,
        timers: &mut TimerQueue<TimerTask>,
        now_ms: f64,
    ) -> Vec<&'static str> {
        let mut flashed = Vec::new();
        while let Some(task) = timers.pop_due(now_ms) {
            if let TimerTask::TrainerTick { generation } = task {
                if let Some(id) = trainer.on_timer(generation, library) {
                    flashed.push(id);
                }
            }
        }
        flashed
    }

    #[test]
    fn test_start_flashes_immediately() {
        let mut timers = TimerQueue::new();
        let mut library = ChordLibrary::new();
        let mut trainer = trainer();

        trainer.start(&mut library, &mut timers);
        assert!(trainer.is_running());

        let current = trainer.current().expect("a chord is flashed at start");
        // The flash drives the library selection
        assert_eq!(library.selected().id, current);
        assert_eq!(timers.pending_repeating(), 1);
    }

    #[test]
    fn test_flashes_on_interval() {
        let mut timers = TimerQueue::new();
        let mut library = ChordLibrary::new();
        let mut trainer = trainer();

        trainer.start(&mut library, &mut timers);
        let flashed = pump(&mut trainer, &mut library, &mut timers, 6000.0);

        // Default 2000 ms interval: fires at 2000, 4000, 6000
        assert_eq!(flashed.len(), 3);
        let beginner_ids: Vec<&str> = ChordLibrary::chords_in(ChordCategory::Beginner)
            .iter()
            .map(|c| c.id)
            .collect();
        for id in flashed {
            assert!(beginner_ids.contains(&id));
        }
    }

    #[test]
    fn test_stop_clears_and_suppresses() {
        let mut timers = TimerQueue::new();
        let mut library = ChordLibrary::new();
        let mut trainer = trainer();

        trainer.start(&mut library, &mut timers);
        trainer.stop(&mut timers);

        assert!(!trainer.is_running());
        assert_eq!(trainer.current(), None);
        assert!(pump(&mut trainer, &mut library, &mut timers, 10_000.0).is_empty());

        // Idempotent
        trainer.stop(&mut timers);
    }

    #[test]
    fn test_set_speed_restarts_interval() {
        let mut timers = TimerQueue::new();
        let mut library = ChordLibrary::new();
        let mut trainer = trainer();

        trainer.start(&mut library, &mut timers);
        trainer.set_speed(1000.0, &mut library, &mut timers);
        assert!(trainer.is_running());
        assert_eq!(trainer.speed_ms(), 1000.0);

        let flashed = pump(&mut trainer, &mut library, &mut timers, 3000.0);
        assert_eq!(flashed.len(), 3);
    }

    #[test]
    fn test_set_speed_while_stopped_just_stores() {
        let mut timers = TimerQueue::new();
        let mut library = ChordLibrary::new();
        let mut trainer = trainer();

        trainer.set_speed(5000.0, &mut library, &mut timers);
        assert!(!trainer.is_running());
        assert_eq!(trainer.speed_ms(), 5000.0);
        assert_eq!(timers.pending(), 0);
    }
}
