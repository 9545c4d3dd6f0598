// Synth module - Percussive and plucked tone synthesis
//
// Everything here renders inside the real-time audio callback. Voices are
// pre-allocated and triggering is fire-and-forget: there is no error path
// and no handle to a playing tone.

pub mod envelope;
pub mod filter;
pub mod oscillator;
pub mod voice;
pub mod voice_manager;

pub use envelope::{ENVELOPE_FLOOR, ExponentialRamp, PercussiveEnvelope};
pub use filter::BiquadHighpass;
pub use oscillator::{Oscillator, SimpleOscillator, Waveform};
pub use voice::Voice;
pub use voice_manager::VoiceManager;

/// One sound to synthesize. Volumes are linear gains in [0, 1], clamped
/// at the synthesis edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    /// Metronome click: 1000 Hz accented, 800 Hz regular
    Click { accent: bool },
    /// Kick drum: sine sweeping 150 Hz down to 50 Hz
    Kick { volume: f32 },
    /// Snare: high-passed noise plus a short 200 Hz body tone
    Snare { volume: f32 },
    /// Closed hi-hat: short high-passed noise burst
    Hihat { volume: f32 },
    /// Plucked string: triangle wave with a fast attack and long decay
    Pluck {
        frequency: f32,
        /// Seconds before the pluck sounds (arpeggio stagger)
        start_delay: f32,
        /// Decay time in seconds
        sustain: f32,
    },
}

/// Destination for synthesized tones.
///
/// Production pushes commands onto the audio ringbuffer; tests record the
/// tones instead. Implementations never fail: a full buffer or a missing
/// audio device drops the tone silently.
pub trait ToneSink {
    fn play(&mut self, tone: Tone);
}

/// Sink that discards every tone. Used when no audio device exists.
#[derive(Debug, Default)]
pub struct NullToneSink;

impl ToneSink for NullToneSink {
    fn play(&mut self, _tone: Tone) {}
}
