// Oscillators - Waveform generators

use std::f32::consts::PI;

pub trait Oscillator {
    fn next_sample(&mut self) -> f32;
    fn set_frequency(&mut self, freq: f32);
    fn reset(&mut self);
}

/// The waveforms the practice tones need: sine for clicks and drum
/// bodies, triangle for plucked strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

#[derive(Clone, Debug)]
pub struct SimpleOscillator {
    waveform: Waveform,
    phase: f32,
    phase_increment: f32,
    sample_rate: f32,
}

impl SimpleOscillator {
    pub fn new(waveform: Waveform, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            phase_increment: 0.0,
            sample_rate,
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }
}

impl Oscillator for SimpleOscillator {
    fn next_sample(&mut self) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => (self.phase * 2.0 * PI).sin(),
            Waveform::Triangle => {
                if self.phase < 0.5 {
                    (self.phase * 4.0) - 1.0
                } else {
                    3.0 - (self.phase * 4.0)
                }
            }
        };

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    fn set_frequency(&mut self, freq: f32) {
        self.phase_increment = freq / self.sample_rate;
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;
    const EPSILON: f32 = 0.001;

    #[test]
    fn test_oscillator_frequency() {
        let mut osc = SimpleOscillator::new(Waveform::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        // Phase increment is freq / sample_rate
        let expected_increment = 440.0 / SAMPLE_RATE;
        assert!((osc.phase_increment - expected_increment).abs() < EPSILON);
    }

    #[test]
    fn test_sine_starts_at_zero() {
        let mut osc = SimpleOscillator::new(Waveform::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        // sin(0) = 0
        let first_sample = osc.next_sample();
        assert!(first_sample.abs() < EPSILON, "first sample: {}", first_sample);
    }

    #[test]
    fn test_sine_amplitude() {
        let mut osc = SimpleOscillator::new(Waveform::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        for _ in 0..1000 {
            let sample = osc.next_sample();
            assert!((-1.0..=1.0).contains(&sample), "sample {} out of range", sample);
        }
    }

    #[test]
    fn test_triangle_wave_range() {
        let mut osc = SimpleOscillator::new(Waveform::Triangle, SAMPLE_RATE);
        osc.set_frequency(82.41);

        for _ in 0..1000 {
            let sample = osc.next_sample();
            assert!(
                (-1.0..=1.0).contains(&sample),
                "triangle sample out of range: {}",
                sample
            );
        }
    }

    #[test]
    fn test_phase_wrapping() {
        let mut osc = SimpleOscillator::new(Waveform::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        for _ in 0..10000 {
            osc.next_sample();
            assert!(
                osc.phase >= 0.0 && osc.phase < 1.0,
                "phase out of range: {}",
                osc.phase
            );
        }
    }

    #[test]
    fn test_reset() {
        let mut osc = SimpleOscillator::new(Waveform::Sine, SAMPLE_RATE);
        osc.set_frequency(440.0);

        for _ in 0..100 {
            osc.next_sample();
        }
        assert!(osc.phase > 0.0);

        osc.reset();
        assert_eq!(osc.phase, 0.0);
    }
}
