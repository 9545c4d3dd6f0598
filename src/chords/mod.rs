// Chords module - Chord reference library and flashcard trainer

pub mod library;
pub mod trainer;

pub use library::{ChordCategory, ChordLibrary, ChordShape, STRING_FREQUENCIES};
pub use trainer::ChordTrainer;
