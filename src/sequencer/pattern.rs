// Pattern - Rhythmic templates for the backing tracks
//
// A pattern is an immutable, named list of percussion hits at fractional
// beat offsets within a 4-beat measure. Patterns are defined once at
// startup and never mutated; the sequencer replays one in a loop.

use crate::sequencer::timeline::{BEATS_PER_PATTERN_MEASURE, Tempo};

/// Percussion instrument kinds a pattern can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Kick,
    Snare,
    Hihat,
}

/// One hit within a pattern measure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternEvent {
    /// Offset within the measure, in beats. Always in [0, 4); several
    /// events may share one offset (simultaneous hits).
    pub offset_beats: f64,
    pub instrument: Instrument,
}

/// A named drum pattern with its fixed playback tempo
#[derive(Debug, Clone)]
pub struct Pattern {
    id: &'static str,
    name: &'static str,
    tempo: Tempo,
    events: Vec<PatternEvent>,
}

impl Pattern {
    fn new(id: &'static str, name: &'static str, bpm: f64, events: Vec<PatternEvent>) -> Self {
        debug_assert!(
            events
                .iter()
                .all(|e| (0.0..BEATS_PER_PATTERN_MEASURE).contains(&e.offset_beats)),
            "pattern event offsets must lie within the 4-beat measure"
        );
        Self {
            id,
            name,
            tempo: Tempo::new(bpm),
            events,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The tempo this pattern always plays at
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn events(&self) -> &[PatternEvent] {
        &self.events
    }
}

/// The built-in backing tracks, looked up by string id.
///
/// Unknown ids resolve to None and callers treat that as a no-op.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
}

impl PatternLibrary {
    /// The four synthesized backing tracks
    pub fn builtin() -> Self {
        use Instrument::{Hihat, Kick, Snare};

        let hit = |offset_beats: f64, instrument: Instrument| PatternEvent {
            offset_beats,
            instrument,
        };

        let patterns = vec![
            // Kick on 1 and 3, snare on 2 and 4, hi-hat on all eighths
            Pattern::new(
                "rock",
                "Rock Groove",
                120.0,
                vec![
                    hit(0.0, Kick),
                    hit(0.0, Hihat),
                    hit(0.5, Hihat),
                    hit(1.0, Snare),
                    hit(1.0, Hihat),
                    hit(1.5, Hihat),
                    hit(2.0, Kick),
                    hit(2.0, Hihat),
                    hit(2.5, Hihat),
                    hit(3.0, Snare),
                    hit(3.0, Hihat),
                    hit(3.5, Hihat),
                ],
            ),
            // Swung hi-hats on the back third of each beat
            Pattern::new(
                "blues",
                "Blues Shuffle",
                80.0,
                vec![
                    hit(0.0, Kick),
                    hit(0.0, Hihat),
                    hit(0.66, Hihat),
                    hit(1.0, Snare),
                    hit(1.0, Hihat),
                    hit(1.66, Hihat),
                    hit(2.0, Kick),
                    hit(2.0, Hihat),
                    hit(2.66, Hihat),
                    hit(3.0, Snare),
                    hit(3.0, Hihat),
                    hit(3.66, Hihat),
                ],
            ),
            // Double-kick sixteenths under backbeat snares
            Pattern::new(
                "metal",
                "Metal Riff",
                140.0,
                vec![
                    hit(0.0, Kick),
                    hit(0.0, Hihat),
                    hit(0.25, Kick),
                    hit(0.5, Hihat),
                    hit(0.75, Kick),
                    hit(1.0, Snare),
                    hit(1.0, Kick),
                    hit(1.5, Hihat),
                    hit(1.75, Kick),
                    hit(2.0, Kick),
                    hit(2.0, Hihat),
                    hit(2.25, Kick),
                    hit(2.5, Hihat),
                    hit(2.75, Kick),
                    hit(3.0, Snare),
                    hit(3.0, Kick),
                    hit(3.5, Hihat),
                    hit(3.75, Kick),
                ],
            ),
            // Syncopated kicks around the backbeat
            Pattern::new(
                "funk",
                "Funk Groove",
                100.0,
                vec![
                    hit(0.0, Kick),
                    hit(0.0, Hihat),
                    hit(0.5, Hihat),
                    hit(0.75, Kick),
                    hit(1.0, Snare),
                    hit(1.0, Hihat),
                    hit(1.5, Hihat),
                    hit(2.0, Hihat),
                    hit(2.5, Kick),
                    hit(2.5, Hihat),
                    hit(3.0, Snare),
                    hit(3.0, Hihat),
                    hit(3.25, Kick),
                    hit(3.5, Hihat),
                ],
            ),
        ];

        Self { patterns }
    }

    /// Look up a pattern by id
    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    /// All patterns, in display order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}
