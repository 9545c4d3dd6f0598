// Chord library - Reference data and playback
//
// Strings are indexed 0 (low E) to 5 (high E). Fret 0 = open, -1 = muted.
// Fingers: 1=index, 2=middle, 3=ring, 4=pinky, 0=open.

use crate::synth::{Tone, ToneSink};

/// Standard tuning, low E to high E, in Hz
pub const STRING_FREQUENCIES: [f32; 6] = [82.41, 110.00, 146.83, 196.00, 246.94, 329.63];

/// Pluck decay when the whole chord is strummed at once
pub const STRUM_SUSTAIN_S: f32 = 2.0;
/// Pluck decay when arpeggiated
pub const ARPEGGIO_SUSTAIN_S: f32 = 1.5;
/// Stagger between strings in an arpeggio
pub const ARPEGGIO_STAGGER_S: f32 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordCategory {
    Beginner,
    Intermediate,
    Barre,
}

impl ChordCategory {
    pub const ALL: [ChordCategory; 3] = [
        ChordCategory::Beginner,
        ChordCategory::Intermediate,
        ChordCategory::Barre,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChordCategory::Beginner => "Beginner",
            ChordCategory::Intermediate => "Intermediate",
            ChordCategory::Barre => "Barre",
        }
    }
}

/// One chord voicing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordShape {
    pub id: &'static str,
    pub name: &'static str,
    pub frets: [i8; 6],
    pub fingers: [u8; 6],
    pub notes: &'static [&'static str],
    pub tip: &'static str,
    /// Fret the index finger barres, for barre chords
    pub barre_start: Option<u8>,
}

impl ChordShape {
    /// Human-readable list of the fingers the voicing uses
    pub fn finger_summary(&self) -> String {
        const FINGER_NAMES: [&str; 5] = ["open", "index", "middle", "ring", "pinky"];
        let mut used: Vec<&str> = Vec::new();
        for &finger in &self.fingers {
            if finger > 0 {
                let name = FINGER_NAMES[finger as usize];
                if !used.contains(&name) {
                    used.push(name);
                }
            }
        }
        if used.is_empty() {
            "all open".to_string()
        } else {
            used.join(", ")
        }
    }

    /// Pluck frequency of one string: the open-string frequency raised by
    /// a semitone per fret
    pub fn string_frequency(&self, string_index: usize) -> Option<f32> {
        let fret = self.frets[string_index];
        if fret < 0 {
            return None;
        }
        Some(STRING_FREQUENCIES[string_index] * 2.0f32.powf(f32::from(fret) / 12.0))
    }
}

macro_rules! chord {
    ($id:literal, $name:literal, $frets:expr, $fingers:expr, $notes:expr, $tip:literal) => {
        ChordShape {
            id: $id,
            name: $name,
            frets: $frets,
            fingers: $fingers,
            notes: &$notes,
            tip: $tip,
            barre_start: None,
        }
    };
    ($id:literal, $name:literal, $frets:expr, $fingers:expr, $notes:expr, $tip:literal, $barre:literal) => {
        ChordShape {
            id: $id,
            name: $name,
            frets: $frets,
            fingers: $fingers,
            notes: &$notes,
            tip: $tip,
            barre_start: Some($barre),
        }
    };
}

static BEGINNER_CHORDS: [ChordShape; 8] = [
    chord!(
        "C",
        "C Major",
        [-1, 3, 2, 0, 1, 0],
        [0, 3, 2, 0, 1, 0],
        ["C", "E", "G", "C", "E"],
        "Keep your fingers curved and close to the frets"
    ),
    chord!(
        "G",
        "G Major",
        [3, 2, 0, 0, 0, 3],
        [2, 1, 0, 0, 0, 3],
        ["G", "B", "D", "G", "B", "G"],
        "Use your pinky for the high E string"
    ),
    chord!(
        "D",
        "D Major",
        [-1, -1, 0, 2, 3, 2],
        [0, 0, 0, 1, 3, 2],
        ["D", "A", "D", "F#"],
        "Only strum the top 4 strings"
    ),
    chord!(
        "Em",
        "E Minor",
        [0, 2, 2, 0, 0, 0],
        [0, 2, 3, 0, 0, 0],
        ["E", "B", "E", "G", "B", "E"],
        "One of the easiest chords - great for beginners!"
    ),
    chord!(
        "Am",
        "A Minor",
        [-1, 0, 2, 2, 1, 0],
        [0, 0, 2, 3, 1, 0],
        ["A", "E", "A", "C", "E"],
        "Similar shape to E major, just moved up one string"
    ),
    chord!(
        "E",
        "E Major",
        [0, 2, 2, 1, 0, 0],
        [0, 2, 3, 1, 0, 0],
        ["E", "B", "E", "G#", "B", "E"],
        "A powerful open chord, great for rock!"
    ),
    chord!(
        "A",
        "A Major",
        [-1, 0, 2, 2, 2, 0],
        [0, 0, 1, 2, 3, 0],
        ["A", "E", "A", "C#", "E"],
        "Keep fingers close together on the 2nd fret"
    ),
    chord!(
        "Dm",
        "D Minor",
        [-1, -1, 0, 2, 3, 1],
        [0, 0, 0, 2, 3, 1],
        ["D", "A", "D", "F"],
        "Only strum the top 4 strings"
    ),
];

static INTERMEDIATE_CHORDS: [ChordShape; 8] = [
    chord!(
        "F",
        "F Major",
        [1, 3, 3, 2, 1, 1],
        [1, 3, 4, 2, 1, 1],
        ["F", "A", "C", "F", "A", "F"],
        "Mini barre chord - press strings 1 & 2 with index finger"
    ),
    chord!(
        "B7",
        "B7",
        [-1, 2, 1, 2, 0, 2],
        [0, 2, 1, 3, 0, 4],
        ["B", "F#", "B", "D#", "A"],
        "Common in blues progressions"
    ),
    chord!(
        "G7",
        "G7",
        [3, 2, 0, 0, 0, 1],
        [3, 2, 0, 0, 0, 1],
        ["G", "B", "D", "G", "B", "F"],
        "Adds tension that resolves to C"
    ),
    chord!(
        "C7",
        "C7",
        [-1, 3, 2, 3, 1, 0],
        [0, 3, 2, 4, 1, 0],
        ["C", "E", "Bb", "C", "E"],
        "Great for blues and jazz"
    ),
    chord!(
        "Am7",
        "A Minor 7",
        [-1, 0, 2, 0, 1, 0],
        [0, 0, 2, 0, 1, 0],
        ["A", "E", "G", "C", "E"],
        "Smooth jazzy sound"
    ),
    chord!(
        "Em7",
        "E Minor 7",
        [0, 2, 0, 0, 0, 0],
        [0, 2, 0, 0, 0, 0],
        ["E", "B", "D", "G", "B", "E"],
        "Super easy - just one finger!"
    ),
    chord!(
        "Dsus4",
        "D Suspended 4",
        [-1, -1, 0, 2, 3, 3],
        [0, 0, 0, 1, 2, 3],
        ["D", "A", "D", "G"],
        "Creates tension, wants to resolve to D"
    ),
    chord!(
        "Asus2",
        "A Suspended 2",
        [-1, 0, 2, 2, 0, 0],
        [0, 0, 1, 2, 0, 0],
        ["A", "E", "A", "B", "E"],
        "Open, dreamy sound"
    ),
];

static BARRE_CHORDS: [ChordShape; 8] = [
    chord!(
        "Bm",
        "B Minor",
        [-1, 2, 4, 4, 3, 2],
        [0, 1, 3, 4, 2, 1],
        ["B", "F#", "B", "D", "F#"],
        "Barre the 2nd fret with your index finger",
        2
    ),
    chord!(
        "F#m",
        "F# Minor",
        [2, 4, 4, 2, 2, 2],
        [1, 3, 4, 1, 1, 1],
        ["F#", "C#", "F#", "A", "C#", "F#"],
        "Full barre chord based on Em shape",
        2
    ),
    chord!(
        "Bb",
        "Bb Major",
        [-1, 1, 3, 3, 3, 1],
        [0, 1, 2, 3, 4, 1],
        ["Bb", "F", "Bb", "D", "F"],
        "A shape barre chord at 1st fret",
        1
    ),
    chord!(
        "C#m",
        "C# Minor",
        [-1, 4, 6, 6, 5, 4],
        [0, 1, 3, 4, 2, 1],
        ["C#", "G#", "C#", "E", "G#"],
        "Am shape moved up 4 frets",
        4
    ),
    chord!(
        "Eb",
        "Eb Major",
        [-1, 6, 5, 3, 4, 3],
        [0, 4, 3, 1, 2, 1],
        ["Eb", "Bb", "Eb", "G", "Bb"],
        "C shape barre chord",
        3
    ),
    chord!(
        "G#m",
        "G# Minor",
        [4, 6, 6, 4, 4, 4],
        [1, 3, 4, 1, 1, 1],
        ["G#", "D#", "G#", "B", "D#", "G#"],
        "Em shape at 4th fret",
        4
    ),
    chord!(
        "Cm",
        "C Minor",
        [-1, 3, 5, 5, 4, 3],
        [0, 1, 3, 4, 2, 1],
        ["C", "G", "C", "Eb", "G"],
        "Am shape at 3rd fret",
        3
    ),
    chord!(
        "D#",
        "D# Major",
        [-1, 6, 8, 8, 8, 6],
        [0, 1, 2, 3, 4, 1],
        ["D#", "A#", "D#", "G", "A#"],
        "A shape at 6th fret",
        6
    ),
];

/// Chord reference with the current category and selection
#[derive(Debug)]
pub struct ChordLibrary {
    category: ChordCategory,
    selected: &'static ChordShape,
}

impl ChordLibrary {
    /// Starts on the first beginner chord, like the category buttons do
    pub fn new() -> Self {
        Self {
            category: ChordCategory::Beginner,
            selected: &BEGINNER_CHORDS[0],
        }
    }

    /// All chords of one category, in display order
    pub fn chords_in(category: ChordCategory) -> &'static [ChordShape] {
        match category {
            ChordCategory::Beginner => &BEGINNER_CHORDS,
            ChordCategory::Intermediate => &INTERMEDIATE_CHORDS,
            ChordCategory::Barre => &BARRE_CHORDS,
        }
    }

    pub fn category(&self) -> ChordCategory {
        self.category
    }

    pub fn selected(&self) -> &'static ChordShape {
        self.selected
    }

    /// Switch category and select its first chord
    pub fn set_category(&mut self, category: ChordCategory) {
        self.category = category;
        self.selected = &Self::chords_in(category)[0];
    }

    /// Select a chord by id within the current category. Unknown ids are
    /// no-ops.
    pub fn select(&mut self, id: &str) {
        if let Some(chord) = Self::chords_in(self.category).iter().find(|c| c.id == id) {
            self.selected = chord;
        }
    }

    /// Play the selected chord: one pluck per sounded string, muted
    /// strings skipped. An arpeggio staggers the strings 80 ms apart,
    /// high string first.
    pub fn play(&self, arpeggio: bool, sink: &mut dyn ToneSink) {
        let sustain = if arpeggio {
            ARPEGGIO_SUSTAIN_S
        } else {
            STRUM_SUSTAIN_S
        };
        for string_index in 0..6 {
            let Some(frequency) = self.selected.string_frequency(string_index) else {
                continue;
            };
            let start_delay = if arpeggio {
                (5 - string_index) as f32 * ARPEGGIO_STAGGER_S
            } else {
                0.0
            };
            sink.play(Tone::Pluck {
                frequency,
                start_delay,
                sustain,
            });
        }
    }
}

impl Default for ChordLibrary {
    fn default() -> Self {
        Self::new()
    }
}
