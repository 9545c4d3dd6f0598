// Command types - Communication UI -> Audio

use crate::synth::Tone;

#[derive(Debug, Clone, Copy)]
pub enum Command {
    PlayTone(Tone),
}
