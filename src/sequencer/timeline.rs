// Timeline - Musical time representation
// Tempo and meter, plus the beat/measure interval arithmetic used by the
// beat clock and pattern sequencer.

use std::fmt;

/// Lowest tempo the app accepts.
pub const MIN_BPM: f64 = 40.0;
/// Highest tempo the app accepts.
pub const MAX_BPM: f64 = 220.0;

/// Number of beats a backing-track pattern is authored against.
/// Patterns always assume a 4-beat measure, independent of the metronome's
/// time signature.
pub const BEATS_PER_PATTERN_MEASURE: f64 = 4.0;

/// Tempo in BPM (Beats Per Minute)
///
/// Out-of-range values are silently clamped to [40, 220] at assignment,
/// never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Creates a new tempo, clamping to the valid range
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
        }
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Set BPM value, clamping to the valid range
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Duration of one beat in milliseconds
    pub fn beat_interval_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    /// Duration of one 4-beat pattern measure in milliseconds
    pub fn pattern_measure_ms(&self) -> f64 {
        self.beat_interval_ms() * BEATS_PER_PATTERN_MEASURE
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} BPM", self.bpm)
    }
}

/// Time signature, reduced to what the metronome needs: beats per measure.
/// Beat 0 of every measure is the accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    beats_per_measure: u8,
}

impl TimeSignature {
    /// Creates a new time signature
    pub fn new(beats_per_measure: u8) -> Self {
        assert!(beats_per_measure > 0, "beats per measure must be > 0");
        Self { beats_per_measure }
    }

    /// Common 4/4 time signature
    pub fn four_four() -> Self {
        Self::new(4)
    }

    /// Common 3/4 time signature (waltz)
    pub fn three_four() -> Self {
        Self::new(3)
    }

    /// Number of beats per measure
    pub fn beats_per_measure(&self) -> u8 {
        self.beats_per_measure
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/4", self.beats_per_measure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_intervals() {
        let tempo = Tempo::new(120.0);
        assert_eq!(tempo.bpm(), 120.0);
        assert_eq!(tempo.beat_duration_seconds(), 0.5);
        assert_eq!(tempo.beat_interval_ms(), 500.0);
        assert_eq!(tempo.pattern_measure_ms(), 2000.0);
    }

    #[test]
    fn test_tempo_clamps_silently() {
        // Out-of-range input is clamped, not rejected
        assert_eq!(Tempo::new(39.0).bpm(), 40.0);
        assert_eq!(Tempo::new(221.0).bpm(), 220.0);
        assert_eq!(Tempo::new(-10.0).bpm(), 40.0);
        assert_eq!(Tempo::new(120.0).bpm(), 120.0);

        let mut tempo = Tempo::default();
        tempo.set_bpm(1000.0);
        assert_eq!(tempo.bpm(), 220.0);
        tempo.set_bpm(0.0);
        assert_eq!(tempo.bpm(), 40.0);
    }

    #[test]
    fn test_time_signature() {
        let ts = TimeSignature::four_four();
        assert_eq!(ts.beats_per_measure(), 4);

        let waltz = TimeSignature::three_four();
        assert_eq!(waltz.beats_per_measure(), 3);
        assert_eq!(waltz.to_string(), "3/4");
    }

    #[test]
    fn test_pattern_measure_ignores_meter() {
        // The pattern measure is always 4 beats, even at 80 BPM in 3/4
        let tempo = Tempo::new(80.0);
        assert_eq!(tempo.pattern_measure_ms(), 3000.0);
    }
}
