// Sessions - Top-level playback state machines
//
// `MetronomeSession` and `BackingTrackSession` wrap the beat clock and
// pattern sequencer and decide which tones reach the synth. `Studio`
// aggregates both, plus the chord library and trainer, owns the shared
// timer queue and pumps it once per UI frame.

use crate::chords::library::{ChordCategory, ChordLibrary};
use crate::chords::trainer::ChordTrainer;
use crate::sequencer::TimerTask;
use crate::sequencer::beat_clock::{BeatClock, BeatTick};
use crate::sequencer::pattern::{Instrument, Pattern, PatternLibrary};
use crate::sequencer::pattern_sequencer::PatternSequencer;
use crate::sequencer::scheduler::TimerQueue;
use crate::sequencer::timeline::{Tempo, TimeSignature};
use crate::synth::{Tone, ToneSink};

/// The metronome: a beat clock that clicks
#[derive(Debug, Default)]
pub struct MetronomeSession {
    clock: BeatClock,
}

impl MetronomeSession {
    pub fn new() -> Self {
        Self {
            clock: BeatClock::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn tempo(&self) -> Tempo {
        self.clock.tempo()
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.clock.time_signature()
    }

    /// Index of the most recent beat, for the indicator dots
    pub fn current_beat(&self) -> u32 {
        self.clock.beat_index()
    }

    /// Start clicking. Beat 0 sounds immediately. No-op when running.
    pub fn start(&mut self, timers: &mut TimerQueue<TimerTask>, sink: &mut dyn ToneSink) {
        if self.clock.is_running() {
            return;
        }
        let tick = self.clock.start(timers);
        sink.play(Tone::Click {
            accent: tick.is_accent,
        });
    }

    pub fn stop(&mut self, timers: &mut TimerQueue<TimerTask>) {
        self.clock.stop(timers);
    }

    pub fn toggle(&mut self, timers: &mut TimerQueue<TimerTask>, sink: &mut dyn ToneSink) {
        if self.clock.is_running() {
            self.stop(timers);
        } else {
            self.start(timers, sink);
        }
    }

    /// Change tempo. While running the metronome restarts and the beat-0
    /// click sounds immediately.
    pub fn set_bpm(
        &mut self,
        bpm: f64,
        timers: &mut TimerQueue<TimerTask>,
        sink: &mut dyn ToneSink,
    ) {
        if let Some(tick) = self.clock.set_tempo(bpm, timers) {
            sink.play(Tone::Click {
                accent: tick.is_accent,
            });
        }
    }

    /// Change meter. Resets the beat position, never starts or stops.
    pub fn set_time_signature(
        &mut self,
        time_signature: TimeSignature,
        timers: &mut TimerQueue<TimerTask>,
    ) {
        self.clock.set_time_signature(time_signature, timers);
    }

    /// Handle a beat fire: advance the clock and click
    pub fn on_timer(
        &mut self,
        generation: u64,
        sink: &mut dyn ToneSink,
    ) -> Option<BeatTick> {
        let tick = self.clock.on_timer(generation)?;
        sink.play(Tone::Click {
            accent: tick.is_accent,
        });
        Some(tick)
    }
}

/// The backing tracks: one looping pattern at a time
pub struct BackingTrackSession {
    sequencer: PatternSequencer,
    library: PatternLibrary,
    /// Linear gain in [0, 1], stored from a 0-100 percent control
    volume: f32,
}

impl BackingTrackSession {
    pub fn new() -> Self {
        Self {
            sequencer: PatternSequencer::new(),
            library: PatternLibrary::builtin(),
            volume: 0.7,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn active_track(&self) -> Option<&'static str> {
        self.sequencer.playing_id()
    }

    pub fn tracks(&self) -> &[Pattern] {
        self.library.patterns()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Store a 0-100 percent volume as linear gain. Applies to the next
    /// synthesized sound, not to already-playing ones.
    pub fn set_volume_percent(&mut self, percent: f32) {
        self.volume = percent / 100.0;
    }

    /// Start looping a track, replacing whichever was playing. Unknown
    /// ids are no-ops.
    pub fn play(&mut self, track_id: &str, timers: &mut TimerQueue<TimerTask>) {
        let Some(pattern) = self.library.get(track_id) else {
            return;
        };
        self.sequencer.play(pattern, timers);
    }

    /// Stop the loop. Idempotent.
    pub fn stop(&mut self, timers: &mut TimerQueue<TimerTask>) {
        self.sequencer.stop(timers);
    }

    pub fn on_measure_elapsed(&mut self, generation: u64, timers: &mut TimerQueue<TimerTask>) {
        self.sequencer.on_measure_elapsed(generation, timers);
    }

    /// Handle an event fire: synthesize the hit at the session volume
    pub fn on_event(
        &mut self,
        generation: u64,
        instrument: Instrument,
        sink: &mut dyn ToneSink,
    ) {
        let Some(instrument) = self.sequencer.on_event(generation, instrument) else {
            return;
        };
        let volume = self.volume;
        let tone = match instrument {
            Instrument::Kick => Tone::Kick { volume },
            Instrument::Snare => Tone::Snare { volume },
            Instrument::Hihat => Tone::Hihat { volume },
        };
        sink.play(tone);
    }
}

impl Default for BackingTrackSession {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole practice room: metronome, backing tracks, chords, trainer
/// and the timer queue they share. All methods run on the UI thread; the
/// frame loop calls `tick` with the current wall time.
pub struct Studio {
    timers: TimerQueue<TimerTask>,
    metronome: MetronomeSession,
    backing: BackingTrackSession,
    chords: ChordLibrary,
    trainer: ChordTrainer,
    sink: Box<dyn ToneSink>,
}

impl Studio {
    pub fn new(sink: Box<dyn ToneSink>) -> Self {
        Self {
            timers: TimerQueue::new(),
            metronome: MetronomeSession::new(),
            backing: BackingTrackSession::new(),
            chords: ChordLibrary::new(),
            trainer: ChordTrainer::new(),
            sink,
        }
    }

    /// Trainer with a caller-provided RNG, for deterministic tests
    #[cfg(test)]
    fn with_trainer(sink: Box<dyn ToneSink>, trainer: ChordTrainer) -> Self {
        Self {
            trainer,
            ..Self::new(sink)
        }
    }

    /// Pump the timer queue up to `now_ms`, handling every task that came
    /// due since the last tick.
    pub fn tick(&mut self, now_ms: f64) {
        while let Some(task) = self.timers.pop_due(now_ms) {
            match task {
                TimerTask::Beat { generation } => {
                    self.metronome.on_timer(generation, self.sink.as_mut());
                }
                TimerTask::PatternHit {
                    generation,
                    instrument,
                } => {
                    self.backing
                        .on_event(generation, instrument, self.sink.as_mut());
                }
                TimerTask::MeasureElapsed { generation } => {
                    self.backing.on_measure_elapsed(generation, &mut self.timers);
                }
                TimerTask::TrainerTick { generation } => {
                    self.trainer.on_timer(generation, &mut self.chords);
                }
            }
        }
    }

    // --- Metronome ---

    pub fn metronome(&self) -> &MetronomeSession {
        &self.metronome
    }

    pub fn toggle_metronome(&mut self) {
        self.metronome.toggle(&mut self.timers, self.sink.as_mut());
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.metronome
            .set_bpm(bpm, &mut self.timers, self.sink.as_mut());
    }

    pub fn set_time_signature(&mut self, beats_per_measure: u8) {
        self.metronome
            .set_time_signature(TimeSignature::new(beats_per_measure), &mut self.timers);
    }

    // --- Backing tracks ---

    pub fn backing(&self) -> &BackingTrackSession {
        &self.backing
    }

    pub fn play_track(&mut self, track_id: &str) {
        self.backing.play(track_id, &mut self.timers);
    }

    pub fn stop_track(&mut self) {
        self.backing.stop(&mut self.timers);
    }

    pub fn set_track_volume(&mut self, percent: f32) {
        self.backing.set_volume_percent(percent);
    }

    // --- Chords ---

    pub fn chords(&self) -> &ChordLibrary {
        &self.chords
    }

    pub fn set_chord_category(&mut self, category: ChordCategory) {
        self.chords.set_category(category);
    }

    pub fn select_chord(&mut self, id: &str) {
        self.chords.select(id);
    }

    pub fn play_chord(&mut self, arpeggio: bool) {
        self.chords.play(arpeggio, self.sink.as_mut());
    }

    // --- Trainer ---

    pub fn trainer(&self) -> &ChordTrainer {
        &self.trainer
    }

    pub fn toggle_trainer(&mut self) {
        self.trainer.toggle(&mut self.chords, &mut self.timers);
    }

    pub fn set_trainer_speed(&mut self, speed_ms: f64) {
        self.trainer
            .set_speed(speed_ms, &mut self.chords, &mut self.timers);
    }
}
