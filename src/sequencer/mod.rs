// Sequencer module - Musical scheduling
//
// Everything time-related lives here: tempo and meter arithmetic, the
// cooperative timer queue, the metronome beat clock, the looping pattern
// sequencer and the sessions that tie them to the synth.

pub mod beat_clock;
pub mod pattern;
pub mod pattern_sequencer;
pub mod scheduler;
pub mod session;
pub mod timeline;

pub use beat_clock::{BeatClock, BeatTick};
pub use pattern::{Instrument, Pattern, PatternEvent, PatternLibrary};
pub use pattern_sequencer::PatternSequencer;
pub use scheduler::{TimerId, TimerQueue};
pub use session::{BackingTrackSession, MetronomeSession, Studio};
pub use timeline::{MAX_BPM, MIN_BPM, Tempo, TimeSignature};

/// Work item carried by the shared timer queue.
///
/// Tasks are plain values: each carries the generation of the session run
/// that armed it, and the owner drops fires whose generation no longer
/// matches. No closures, no shared callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerTask {
    /// Metronome beat boundary
    Beat { generation: u64 },
    /// One pattern event coming due
    PatternHit {
        generation: u64,
        instrument: Instrument,
    },
    /// Pattern measure boundary, time to arm the next measure
    MeasureElapsed { generation: u64 },
    /// Chord trainer interval elapsed
    TrainerTick { generation: u64 },
}
