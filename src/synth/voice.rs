// Voice - One playing tone
//
// A voice is either an oscillator (optionally pitch-swept) or a filtered
// noise source, shaped by a percussive envelope. Triggering reconfigures
// the voice in place: no allocation happens on the audio thread.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::synth::envelope::{ExponentialRamp, PercussiveEnvelope};
use crate::synth::filter::BiquadHighpass;
use crate::synth::oscillator::{Oscillator, SimpleOscillator, Waveform};

#[derive(Debug, Clone)]
enum VoiceSource {
    Oscillator {
        oscillator: SimpleOscillator,
        /// Per-sample frequency sweep (the kick's 150 -> 50 Hz drop)
        sweep: Option<ExponentialRamp>,
    },
    Noise {
        rng: SmallRng,
        filter: BiquadHighpass,
    },
}

pub struct Voice {
    sample_rate: f32,
    source: VoiceSource,
    envelope: PercussiveEnvelope,
    /// Samples to stay silent before the tone sounds (arpeggio stagger)
    delay_remaining: u32,
    active: bool,
    age: u64,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            source: VoiceSource::Oscillator {
                oscillator: SimpleOscillator::new(Waveform::Sine, sample_rate),
                sweep: None,
            },
            envelope: PercussiveEnvelope::new(0.0, 0.0, 0.01, sample_rate),
            delay_remaining: 0,
            active: false,
            age: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    /// Start an oscillator tone. `sweep_to` moves the frequency
    /// exponentially from `frequency` to the target over the given
    /// duration.
    #[allow(clippy::too_many_arguments)]
    pub fn start_oscillator(
        &mut self,
        waveform: Waveform,
        frequency: f32,
        sweep_to: Option<(f32, f32)>,
        peak: f32,
        attack_s: f32,
        decay_s: f32,
        delay_s: f32,
        age: u64,
    ) {
        let mut oscillator = SimpleOscillator::new(waveform, self.sample_rate);
        oscillator.set_frequency(frequency);
        let sweep = sweep_to
            .map(|(target, duration_s)| ExponentialRamp::new(frequency, target, duration_s, self.sample_rate));

        self.source = VoiceSource::Oscillator { oscillator, sweep };
        self.envelope = PercussiveEnvelope::new(peak, attack_s, decay_s, self.sample_rate);
        self.delay_remaining = (delay_s * self.sample_rate) as u32;
        self.active = true;
        self.age = age;
    }

    /// Start a filtered-noise tone
    pub fn start_noise(&mut self, cutoff_hz: f32, peak: f32, decay_s: f32, age: u64) {
        self.source = VoiceSource::Noise {
            // SmallRng seeded from the age counter: cheap, no syscall on
            // the audio thread, and two bursts never share a sequence
            rng: SmallRng::seed_from_u64(age),
            filter: BiquadHighpass::new(cutoff_hz, self.sample_rate),
        };
        self.envelope = PercussiveEnvelope::new(peak, 0.0, decay_s, self.sample_rate);
        self.delay_remaining = 0;
        self.active = true;
        self.age = age;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }
        if self.delay_remaining > 0 {
            self.delay_remaining -= 1;
            return 0.0;
        }

        let amplitude = self.envelope.next();
        let sample = match &mut self.source {
            VoiceSource::Oscillator { oscillator, sweep } => {
                if let Some(sweep) = sweep {
                    oscillator.set_frequency(sweep.next());
                }
                oscillator.next_sample()
            }
            VoiceSource::Noise { rng, filter } => filter.process(rng.gen_range(-1.0f32..1.0)),
        };

        if self.envelope.is_finished() {
            self.active = false;
        }

        sample * amplitude
    }
}
