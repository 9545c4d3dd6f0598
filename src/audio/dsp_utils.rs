// DSP utilities - Audio hygiene and smoothing
//
// The small set of functions that keep the real-time callback clean:
// denormal flushing, output saturation and parameter smoothing.

/// Flush denormals to zero
///
/// Denormal numbers (very close to 0) can cause serious CPU slowdowns on
/// some processors. Threshold: 1e-15, far below the numeric noise floor
/// of a 32-bit float signal.
#[inline]
pub fn flush_denormals_to_zero(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Soft clipping with tanh
///
/// Gently limits the output into [-1, 1] without hard distortion. Near 0
/// the curve is quasi-linear, so quiet signals pass uncolored; summed
/// voices saturate smoothly instead of wrapping.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    x.tanh()
}

/// 1-pole smoother (first-order low-pass)
///
/// Smooths abrupt parameter changes to avoid clicks and pops.
///
/// Formula: y[n] = y[n-1] + a * (x[n] - y[n-1])
/// where a controls the convergence speed.
pub struct OnePoleSmoother {
    current: f32,
    coefficient: f32,
}

impl OnePoleSmoother {
    /// `time_constant_ms` is the time to reach ~63% of the target
    pub fn new(initial_value: f32, time_constant_ms: f32, sample_rate: f32) -> Self {
        let time_constant_samples = time_constant_ms * 0.001 * sample_rate;
        let coefficient = 1.0 / time_constant_samples;

        Self {
            current: initial_value,
            // Clamp to stay stable for tiny time constants
            coefficient: coefficient.min(1.0),
        }
    }

    /// Advance one sample toward `target`
    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        self.current += self.coefficient * (target - self.current);
        self.current = flush_denormals_to_zero(self.current);
        self.current
    }

    /// Jump to a value without smoothing
    #[inline]
    pub fn reset(&mut self, value: f32) {
        self.current = value;
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }
}
