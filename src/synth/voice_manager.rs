// Voice Manager - Polyphony handling
//
// Fixed pool of pre-allocated voices, mixed by summing. When the pool is
// exhausted the oldest voice is stolen. The tone recipes live here: one
// `Tone` value maps to one or two configured voices.

use crate::synth::Tone;
use crate::synth::oscillator::Waveform;
use crate::synth::voice::Voice;

const MAX_VOICES: usize = 32;

/// Accented metronome click frequency
pub const CLICK_ACCENT_HZ: f32 = 1000.0;
/// Regular metronome click frequency
pub const CLICK_REGULAR_HZ: f32 = 800.0;

pub struct VoiceManager {
    voices: [Voice; MAX_VOICES],
    /// Incremented on every trigger, used for stealing priority
    age_counter: u64,
}

impl VoiceManager {
    pub fn new(sample_rate: f32) -> Self {
        // Pre-allocate all voices
        let voices = std::array::from_fn(|_| Voice::new(sample_rate));

        Self {
            voices,
            age_counter: 0,
        }
    }

    /// Fire-and-forget: synthesize one tone. Out-of-range volumes are
    /// clamped here, at the synthesis edge.
    pub fn trigger(&mut self, tone: Tone) {
        match tone {
            Tone::Click { accent } => {
                let frequency = if accent { CLICK_ACCENT_HZ } else { CLICK_REGULAR_HZ };
                let voice = self.allocate();
                voice.0.start_oscillator(Waveform::Sine, frequency, None, 0.5, 0.0, 0.1, 0.0, voice.1);
            }
            Tone::Kick { volume } => {
                let volume = volume.clamp(0.0, 1.0);
                let voice = self.allocate();
                voice.0.start_oscillator(
                    Waveform::Sine,
                    150.0,
                    Some((50.0, 0.1)),
                    volume,
                    0.0,
                    0.3,
                    0.0,
                    voice.1,
                );
            }
            Tone::Snare { volume } => {
                let volume = volume.clamp(0.0, 1.0);
                // Noise body
                let voice = self.allocate();
                voice.0.start_noise(1000.0, volume * 0.5, 0.15, voice.1);
                // Short 200 Hz thump underneath
                let voice = self.allocate();
                voice
                    .0
                    .start_oscillator(Waveform::Sine, 200.0, None, volume * 0.3, 0.0, 0.1, 0.0, voice.1);
            }
            Tone::Hihat { volume } => {
                let volume = volume.clamp(0.0, 1.0);
                let voice = self.allocate();
                voice.0.start_noise(7000.0, volume * 0.3, 0.05, voice.1);
            }
            Tone::Pluck {
                frequency,
                start_delay,
                sustain,
            } => {
                let voice = self.allocate();
                voice.0.start_oscillator(
                    Waveform::Triangle,
                    frequency,
                    None,
                    0.15,
                    0.02,
                    sustain,
                    start_delay.max(0.0),
                    voice.1,
                );
            }
        }
    }

    /// Find a free voice, stealing the oldest one when the pool is full.
    /// Returns the voice together with its new age stamp.
    fn allocate(&mut self) -> (&mut Voice, u64) {
        self.age_counter = self.age_counter.wrapping_add(1);
        let age = self.age_counter;

        let index = match self.voices.iter().position(|v| !v.is_active()) {
            Some(free) => free,
            None => {
                // Steal the oldest (lowest age) voice
                self.voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, v)| v.age())
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            }
        };
        (&mut self.voices[index], age)
    }

    /// Mix all the active voices
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.voices.iter_mut().map(|v| v.next_sample()).sum()
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    #[test]
    fn test_single_voice_tones() {
        let mut vm = VoiceManager::new(SAMPLE_RATE);
        assert_eq!(vm.active_voice_count(), 0);

        vm.trigger(Tone::Click { accent: true });
        assert_eq!(vm.active_voice_count(), 1);

        vm.trigger(Tone::Hihat { volume: 0.7 });
        assert_eq!(vm.active_voice_count(), 2);

        vm.trigger(Tone::Kick { volume: 0.7 });
        assert_eq!(vm.active_voice_count(), 3);
    }

    #[test]
    fn test_snare_uses_two_voices() {
        let mut vm = VoiceManager::new(SAMPLE_RATE);
        vm.trigger(Tone::Snare { volume: 0.7 });
        assert_eq!(vm.active_voice_count(), 2);
    }

    #[test]
    fn test_voices_expire() {
        let mut vm = VoiceManager::new(SAMPLE_RATE);
        vm.trigger(Tone::Hihat { volume: 0.7 });

        // The hi-hat burst decays over 50 ms
        for _ in 0..(0.1 * SAMPLE_RATE) as u32 {
            vm.next_sample();
        }
        assert_eq!(vm.active_voice_count(), 0);
    }

    #[test]
    fn test_pool_exhaustion_steals_oldest() {
        let mut vm = VoiceManager::new(SAMPLE_RATE);

        // Long plucks fill the whole pool
        for _ in 0..MAX_VOICES {
            vm.trigger(Tone::Pluck {
                frequency: 110.0,
                start_delay: 0.0,
                sustain: 2.0,
            });
        }
        assert_eq!(vm.active_voice_count(), MAX_VOICES);

        // One more still triggers, count stays at the cap
        vm.trigger(Tone::Click { accent: false });
        assert_eq!(vm.active_voice_count(), MAX_VOICES);
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        let mut vm = VoiceManager::new(SAMPLE_RATE);
        vm.trigger(Tone::Kick { volume: 5.0 });

        // Peak amplitude stays within the clamped envelope
        let mut peak = 0.0f32;
        for _ in 0..1000 {
            peak = peak.max(vm.next_sample().abs());
        }
        assert!(peak <= 1.0, "peak: {}", peak);
    }

    #[test]
    fn test_mixed_output_is_finite() {
        let mut vm = VoiceManager::new(SAMPLE_RATE);
        vm.trigger(Tone::Snare { volume: 0.8 });
        vm.trigger(Tone::Kick { volume: 0.8 });
        vm.trigger(Tone::Click { accent: true });

        for _ in 0..10000 {
            assert!(vm.next_sample().is_finite());
        }
    }
}
