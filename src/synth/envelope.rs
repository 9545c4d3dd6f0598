// Envelopes - Exponential ramps and percussive amplitude shapes
//
// All decays are exponential toward a floor of 0.001, never exactly zero.
// An exponential ramp cannot reach zero anyway; the floor keeps the
// per-sample coefficient well defined and lets a voice detect the end of
// its decay.

/// Where exponential decays land. Inaudible but strictly positive.
pub const ENVELOPE_FLOOR: f32 = 0.001;

/// Exponential ramp between two positive values over a fixed duration.
///
/// Used both for amplitude decays and for the kick's pitch sweep. The
/// value after the ramp holds at the target.
#[derive(Debug, Clone)]
pub struct ExponentialRamp {
    current: f32,
    target: f32,
    coefficient: f32,
    remaining_samples: u32,
}

impl ExponentialRamp {
    /// Ramp from `from` to `to` over `duration_s` seconds. Both endpoints
    /// must be strictly positive.
    pub fn new(from: f32, to: f32, duration_s: f32, sample_rate: f32) -> Self {
        debug_assert!(from > 0.0 && to > 0.0, "exponential ramp endpoints must be > 0");
        let samples = (duration_s * sample_rate).max(1.0) as u32;
        Self {
            current: from,
            target: to,
            coefficient: (to / from).powf(1.0 / samples as f32),
            remaining_samples: samples,
        }
    }

    /// Current value without advancing
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Advance one sample and return the new value
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.remaining_samples > 0 {
            self.current *= self.coefficient;
            self.remaining_samples -= 1;
            if self.remaining_samples == 0 {
                // Land exactly on the target, the powf coefficient only
                // gets us within rounding of it
                self.current = self.target;
            }
        }
        self.current
    }

    pub fn is_done(&self) -> bool {
        self.remaining_samples == 0
    }
}

/// Percussive amplitude shape: optional linear attack up to a peak, then
/// exponential decay to the floor.
#[derive(Debug, Clone)]
pub struct PercussiveEnvelope {
    attack_remaining: u32,
    attack_step: f32,
    level: f32,
    decay: ExponentialRamp,
}

impl PercussiveEnvelope {
    /// `peak` is clamped up to the envelope floor so the decay ramp stays
    /// well defined even for a zero-volume trigger.
    pub fn new(peak: f32, attack_s: f32, decay_s: f32, sample_rate: f32) -> Self {
        let peak = peak.max(ENVELOPE_FLOOR);
        let attack_samples = (attack_s * sample_rate) as u32;
        let attack_step = if attack_samples > 0 {
            peak / attack_samples as f32
        } else {
            0.0
        };
        Self {
            attack_remaining: attack_samples,
            attack_step,
            level: if attack_samples > 0 { 0.0 } else { peak },
            decay: ExponentialRamp::new(peak, ENVELOPE_FLOOR, decay_s, sample_rate),
        }
    }

    /// Advance one sample and return the amplitude
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.attack_remaining > 0 {
            self.level += self.attack_step;
            self.attack_remaining -= 1;
            self.level
        } else {
            self.decay.next()
        }
    }

    /// True once the decay has reached the floor
    pub fn is_finished(&self) -> bool {
        self.attack_remaining == 0 && self.decay.is_done()
    }
}
