// Filters - High-pass biquad for noise shaping
//
// RBJ cookbook high-pass, Butterworth Q. The snare and hi-hat run their
// white noise through this to move the energy up the spectrum.

use std::f32::consts::PI;

/// Second-order high-pass filter (direct form I)
#[derive(Debug, Clone)]
pub struct BiquadHighpass {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadHighpass {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        // Butterworth response
        let q = std::f32::consts::FRAC_1_SQRT_2;
        let omega = 2.0 * PI * cutoff_hz / sample_rate;
        let (sin_omega, cos_omega) = omega.sin_cos();
        let alpha = sin_omega / (2.0 * q);

        let a0 = 1.0 + alpha;
        let b0 = ((1.0 + cos_omega) / 2.0) / a0;
        let b1 = (-(1.0 + cos_omega)) / a0;
        let b2 = b0;
        let a1 = (-2.0 * cos_omega) / a0;
        let a2 = (1.0 - alpha) / a0;

        Self {
            b0,
            b1,
            b2,
            a1,
            a2,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const SAMPLE_RATE: f32 = 44100.0;

    /// RMS of the filter output for a sine at `freq`
    fn response_at(filter: &mut BiquadHighpass, freq: f32) -> f32 {
        filter.reset();
        let samples = 4410;
        let mut sum_squares = 0.0f32;
        for n in 0..samples {
            let x = (2.0 * PI * freq * n as f32 / SAMPLE_RATE).sin();
            let y = filter.process(x);
            // Skip the transient at the start
            if n > 1000 {
                sum_squares += y * y;
            }
        }
        (sum_squares / (samples - 1001) as f32).sqrt()
    }

    #[test]
    fn test_highpass_attenuates_low_frequencies() {
        let mut filter = BiquadHighpass::new(1000.0, SAMPLE_RATE);

        let low = response_at(&mut filter, 100.0);
        let high = response_at(&mut filter, 8000.0);

        // 100 Hz sits well below the 1 kHz cutoff and gets crushed
        assert!(low < 0.1, "low response: {}", low);
        // 8 kHz passes nearly unity (sine RMS is ~0.707)
        assert!(high > 0.6, "high response: {}", high);
    }

    #[test]
    fn test_output_is_finite() {
        let mut filter = BiquadHighpass::new(7000.0, SAMPLE_RATE);
        for n in 0..10000 {
            let x = if n % 2 == 0 { 1.0 } else { -1.0 };
            assert!(filter.process(x).is_finite());
        }
    }
}
