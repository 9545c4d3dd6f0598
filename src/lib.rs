// Guitar Studio - Library exports for tests

pub mod audio;
pub mod chords;
pub mod messaging;
pub mod sequencer;
pub mod synth;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::engine::{AudioEngine, AudioError};
pub use chords::{ChordCategory, ChordLibrary, ChordTrainer};
pub use messaging::channels::{
    CommandToneSink, create_command_channel, create_notification_channel,
};
pub use sequencer::{
    BackingTrackSession, BeatClock, MetronomeSession, PatternLibrary, Studio, Tempo,
    TimeSignature, TimerQueue,
};
pub use synth::{Tone, ToneSink};
pub use synth::voice_manager::VoiceManager;
