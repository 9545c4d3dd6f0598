//! End-to-end practice session tests
//!
//! Drives a full `Studio` through a recording tone sink and synthetic
//! time, checking the observable sound sequence rather than internal
//! state: click cadence and accents, pattern event timing, track
//! exclusivity, cooperative cancellation and chord playback.

use guitar_studio::sequencer::Studio;
use guitar_studio::synth::{Tone, ToneSink};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct RecordingSink(Rc<RefCell<Vec<Tone>>>);

impl ToneSink for RecordingSink {
    fn play(&mut self, tone: Tone) {
        self.0.borrow_mut().push(tone);
    }
}

fn studio() -> (Studio, Rc<RefCell<Vec<Tone>>>) {
    let sink = RecordingSink::default();
    let tones = sink.0.clone();
    (Studio::new(Box::new(sink)), tones)
}

fn click_accents(tones: &[Tone]) -> Vec<bool> {
    tones
        .iter()
        .filter_map(|t| match t {
            Tone::Click { accent } => Some(*accent),
            _ => None,
        })
        .collect()
}

fn count_hihats(tones: &[Tone]) -> usize {
    tones
        .iter()
        .filter(|t| matches!(t, Tone::Hihat { .. }))
        .count()
}

/// Two full 4/4 measures at the default 120 BPM click as
/// accent-weak-weak-weak, twice.
#[test]
fn test_metronome_accent_cycle() {
    let (mut studio, tones) = studio();

    studio.toggle_metronome();
    studio.tick(3500.0);

    assert_eq!(
        click_accents(&tones.borrow()),
        vec![true, false, false, false, true, false, false, false]
    );
}

/// Changing tempo mid-measure restarts from an accented beat 0 and the
/// following beats arrive at the new interval.
#[test]
fn test_tempo_change_restarts_the_measure() {
    let (mut studio, tones) = studio();

    studio.toggle_metronome();
    studio.tick(1000.0); // beats 0, 1, 2

    studio.set_bpm(60.0);
    assert_eq!(studio.metronome().current_beat(), 0);
    let accents = click_accents(&tones.borrow());
    assert_eq!(accents, vec![true, false, false, true]);

    // At 60 BPM the next beat is a full second later
    studio.tick(1999.0);
    assert_eq!(click_accents(&tones.borrow()).len(), 4);
    studio.tick(2000.0);
    assert_eq!(click_accents(&tones.borrow()).len(), 5);
}

/// 3/4 keeps the metronome running, resets the position and accents
/// every third beat from then on.
#[test]
fn test_waltz_time() {
    let (mut studio, tones) = studio();

    studio.toggle_metronome();
    studio.set_time_signature(3);
    studio.tick(3000.0); // 6 more beats at 500 ms

    assert_eq!(
        click_accents(&tones.borrow()),
        vec![true, false, false, true, false, false, true]
    );
}

/// The rock groove's off-beat hi-hat lands exactly half a beat (250 ms at
/// 120 BPM) into the measure, and again one measure later.
#[test]
fn test_rock_groove_event_timing() {
    let (mut studio, tones) = studio();

    studio.play_track("rock");

    studio.tick(0.0);
    let at_zero = count_hihats(&tones.borrow());
    assert_eq!(at_zero, 1, "beat 0 carries one hi-hat");

    studio.tick(249.0);
    assert_eq!(count_hihats(&tones.borrow()), at_zero);
    studio.tick(250.0);
    assert_eq!(count_hihats(&tones.borrow()), at_zero + 1);

    // Second measure, same offset
    studio.tick(2249.0);
    let before_loop = count_hihats(&tones.borrow());
    studio.tick(2250.0);
    assert_eq!(count_hihats(&tones.borrow()), before_loop + 1);
}

/// Starting a second track before the first ever sounds replaces it
/// completely: only the new track's events fire.
#[test]
fn test_track_exclusivity() {
    let (mut studio, tones) = studio();

    studio.play_track("rock");
    studio.play_track("funk");
    assert_eq!(studio.backing().active_track(), Some("funk"));

    // One funk measure at 100 BPM is 2400 ms and carries 14 events
    studio.tick(2399.0);
    assert_eq!(tones.borrow().len(), 14);
}

/// Stop cancels the loop and silences the one-shots already queued.
#[test]
fn test_stop_discards_in_flight_events() {
    let (mut studio, tones) = studio();

    studio.play_track("metal");
    studio.stop_track();
    studio.tick(60_000.0);

    assert!(tones.borrow().is_empty());
    assert_eq!(studio.backing().active_track(), None);
}

/// The track volume control scales the next sounds, stored as v/100.
#[test]
fn test_volume_scales_next_hits() {
    let (mut studio, tones) = studio();

    studio.set_track_volume(30.0);
    studio.play_track("blues");
    studio.tick(0.0);

    let volumes: Vec<f32> = tones
        .borrow()
        .iter()
        .filter_map(|t| match t {
            Tone::Kick { volume } | Tone::Hihat { volume } => Some(*volume),
            _ => None,
        })
        .collect();
    assert!(!volumes.is_empty());
    assert!(volumes.iter().all(|v| (*v - 0.3).abs() < 1e-6));
}

/// Metronome and backing track are independent sessions: stopping the
/// track leaves the click running.
#[test]
fn test_metronome_survives_track_stop() {
    let (mut studio, tones) = studio();

    studio.toggle_metronome();
    studio.play_track("rock");
    studio.tick(1000.0);
    studio.stop_track();

    let clicks_so_far = click_accents(&tones.borrow()).len();
    studio.tick(2000.0);

    assert!(studio.metronome().is_running());
    assert!(click_accents(&tones.borrow()).len() > clicks_so_far);
}

/// A strummed C major sounds five strings at once; the arpeggio staggers
/// six E-minor strings 80 ms apart, high string first.
#[test]
fn test_chord_playback() {
    let (mut studio, tones) = studio();

    studio.play_chord(false);
    {
        let tones = tones.borrow();
        assert_eq!(tones.len(), 5);
        for tone in tones.iter() {
            match tone {
                Tone::Pluck { start_delay, .. } => assert_eq!(*start_delay, 0.0),
                other => panic!("expected a pluck, got {:?}", other),
            }
        }
    }

    tones.borrow_mut().clear();
    studio.select_chord("Em");
    studio.play_chord(true);

    let delays: Vec<f32> = tones
        .borrow()
        .iter()
        .map(|t| match t {
            Tone::Pluck { start_delay, .. } => *start_delay,
            other => panic!("expected a pluck, got {:?}", other),
        })
        .collect();
    assert_eq!(delays.len(), 6);
    assert!((delays[0] - 0.4).abs() < 1e-6, "low E waits the longest");
    assert_eq!(delays[5], 0.0, "high E sounds immediately");
}

/// The trainer flashes a chord immediately, keeps flashing on its
/// interval, and every flash drives the library selection.
#[test]
fn test_trainer_drives_selection() {
    let (mut studio, _tones) = studio();

    studio.toggle_trainer();
    let first = studio.trainer().current().expect("immediate flash");
    assert_eq!(studio.chords().selected().id, first);

    studio.tick(10_000.0);
    let later = studio.trainer().current().expect("still flashing");
    assert_eq!(studio.chords().selected().id, later);

    studio.toggle_trainer();
    assert_eq!(studio.trainer().current(), None);
}
