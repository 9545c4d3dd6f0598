// Main UI app
//
// Thin shell over `Studio`: every frame computes the wall-clock time,
// pumps the timer queue and redraws the panels from session state. No
// scheduling logic lives here.

use crate::audio::parameters::AtomicF32;
use crate::chords::library::{ChordCategory, ChordLibrary};
use crate::messaging::channels::NotificationConsumer;
use crate::messaging::notification::{Notification, NotificationLevel};
use crate::sequencer::session::Studio;
use eframe::egui;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Trainer speeds offered in the UI, in milliseconds
const TRAINER_SPEEDS_MS: [f64; 4] = [1000.0, 2000.0, 3000.0, 5000.0];

pub struct StudioApp {
    studio: Studio,
    started_at: Instant,
    /// Master output volume shared with the audio callback, None when no
    /// audio device exists
    master_volume_atomic: Option<AtomicF32>,
    master_volume_ui: f32,
    track_volume_ui: f32,
    notification_rx: Option<NotificationConsumer>,
    notification_queue: VecDeque<Notification>,
    max_notifications: usize,
}

impl StudioApp {
    pub fn new(
        studio: Studio,
        master_volume_atomic: Option<AtomicF32>,
        notification_rx: Option<NotificationConsumer>,
    ) -> Self {
        let master_volume_ui = master_volume_atomic.as_ref().map_or(0.8, |v| v.get());

        Self {
            studio,
            started_at: Instant::now(),
            master_volume_atomic,
            master_volume_ui,
            track_volume_ui: 70.0,
            notification_rx,
            notification_queue: VecDeque::new(),
            max_notifications: 10,
        }
    }

    /// Milliseconds since the app started, the time base the timer queue
    /// is pumped with
    fn now_ms(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64() * 1000.0
    }

    fn update_notifications(&mut self) {
        let Some(rx) = self.notification_rx.as_mut() else {
            return;
        };
        while let Some(notification) = ringbuf::traits::Consumer::try_pop(rx) {
            self.notification_queue.push_back(notification);
            if self.notification_queue.len() > self.max_notifications {
                self.notification_queue.pop_front();
            }
        }
    }

    fn draw_metronome(&mut self, ui: &mut egui::Ui) {
        ui.heading("Metronome");
        ui.add_space(4.0);

        let running = self.studio.metronome().is_running();
        let label = if running { "Stop" } else { "Start" };
        if ui.button(label).clicked() {
            self.studio.toggle_metronome();
        }

        // BPM slider plus nudge buttons
        let mut bpm = self.studio.metronome().tempo().bpm();
        ui.horizontal(|ui| {
            if ui.button("-5").clicked() {
                self.studio.set_bpm(bpm - 5.0);
            }
            if ui
                .add(egui::Slider::new(&mut bpm, 40.0..=220.0).text("BPM"))
                .changed()
            {
                self.studio.set_bpm(bpm);
            }
            if ui.button("+5").clicked() {
                self.studio.set_bpm(bpm + 5.0);
            }
        });

        // Time signature selector
        let beats = self.studio.metronome().time_signature().beats_per_measure();
        ui.horizontal(|ui| {
            ui.label("Time signature:");
            for option in [3u8, 4, 6] {
                if ui
                    .selectable_label(beats == option, format!("{}/4", option))
                    .clicked()
                {
                    self.studio.set_time_signature(option);
                }
            }
        });

        // Beat indicator dots, accent first
        let current = self.studio.metronome().current_beat();
        ui.horizontal(|ui| {
            for slot in 0..u32::from(beats) {
                let lit = running && slot == current;
                let color = if lit && slot == 0 {
                    egui::Color32::from_rgb(233, 69, 96)
                } else if lit {
                    egui::Color32::from_rgb(255, 200, 87)
                } else {
                    egui::Color32::DARK_GRAY
                };
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 7.0, color);
            }
        });
    }

    fn draw_backing_tracks(&mut self, ui: &mut egui::Ui) {
        ui.heading("Backing Tracks");
        ui.add_space(4.0);

        let active = self.studio.backing().active_track();
        let tracks: Vec<(&'static str, String)> = self
            .studio
            .backing()
            .tracks()
            .iter()
            .map(|p| (p.id(), format!("{} · {:.0} BPM", p.name(), p.tempo().bpm())))
            .collect();

        ui.horizontal_wrapped(|ui| {
            for (id, label) in &tracks {
                let is_active = active == Some(*id);
                if ui.selectable_label(is_active, label).clicked() {
                    if is_active {
                        self.studio.stop_track();
                    } else {
                        self.studio.play_track(id);
                    }
                }
            }
        });

        ui.horizontal(|ui| {
            if ui
                .add(egui::Slider::new(&mut self.track_volume_ui, 0.0..=100.0).text("Volume"))
                .changed()
            {
                self.studio.set_track_volume(self.track_volume_ui);
            }
            if ui.button("Stop").clicked() {
                self.studio.stop_track();
            }
        });
    }

    fn draw_chords(&mut self, ui: &mut egui::Ui) {
        ui.heading("Chords");
        ui.add_space(4.0);

        let category = self.studio.chords().category();
        ui.horizontal(|ui| {
            for option in ChordCategory::ALL {
                if ui
                    .selectable_label(category == option, option.label())
                    .clicked()
                {
                    self.studio.set_chord_category(option);
                }
            }
        });

        let selected_id = self.studio.chords().selected().id;
        ui.horizontal_wrapped(|ui| {
            for chord in ChordLibrary::chords_in(category) {
                if ui
                    .selectable_label(selected_id == chord.id, chord.id)
                    .clicked()
                {
                    self.studio.select_chord(chord.id);
                }
            }
        });

        let chord = self.studio.chords().selected();
        ui.add_space(4.0);
        ui.label(egui::RichText::new(chord.name).strong());
        ui.label(format!("Fingers: {}", chord.finger_summary()));
        ui.label(format!("Notes: {}", chord.notes.join(" ")));
        if let Some(fret) = chord.barre_start {
            ui.label(format!("Barre at fret {}", fret));
        }
        ui.label(egui::RichText::new(chord.tip).italics());

        ui.horizontal(|ui| {
            if ui.button("Strum").clicked() {
                self.studio.play_chord(false);
            }
            if ui.button("Arpeggio").clicked() {
                self.studio.play_chord(true);
            }
        });
    }

    fn draw_trainer(&mut self, ui: &mut egui::Ui) {
        ui.heading("Chord Trainer");
        ui.add_space(4.0);

        let running = self.studio.trainer().is_running();
        let label = if running { "Stop Training" } else { "Start Training" };
        ui.horizontal(|ui| {
            if ui.button(label).clicked() {
                self.studio.toggle_trainer();
            }

            let speed = self.studio.trainer().speed_ms();
            egui::ComboBox::from_label("Speed")
                .selected_text(format!("{:.0} ms", speed))
                .show_ui(ui, |ui| {
                    for option in TRAINER_SPEEDS_MS {
                        if ui
                            .selectable_label(speed == option, format!("{:.0} ms", option))
                            .clicked()
                        {
                            self.studio.set_trainer_speed(option);
                        }
                    }
                });
        });

        let current = self.studio.trainer().current().unwrap_or("-");
        ui.label(egui::RichText::new(current).size(32.0).strong());
    }

    fn draw_master_volume(&mut self, ui: &mut egui::Ui) {
        let Some(atomic) = &self.master_volume_atomic else {
            ui.colored_label(egui::Color32::YELLOW, "No audio device - running silent");
            return;
        };
        if ui
            .add(egui::Slider::new(&mut self.master_volume_ui, 0.0..=1.0).text("Master"))
            .changed()
        {
            atomic.set(self.master_volume_ui);
        }
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        for notification in self
            .notification_queue
            .iter()
            .rev()
            .filter(|n| n.is_recent(5000))
            .take(3)
        {
            let color = match notification.level {
                NotificationLevel::Info => egui::Color32::LIGHT_GREEN,
                NotificationLevel::Warning => egui::Color32::YELLOW,
                NotificationLevel::Error => egui::Color32::LIGHT_RED,
            };
            ui.colored_label(color, &notification.message);
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pump the scheduling core with wall time before drawing
        let now_ms = self.now_ms();
        self.studio.tick(now_ms);
        self.update_notifications();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Guitar Studio");
            ui.separator();

            egui::Grid::new("panels").num_columns(2).show(ui, |ui| {
                ui.vertical(|ui| {
                    self.draw_metronome(ui);
                    ui.add_space(12.0);
                    self.draw_backing_tracks(ui);
                });
                ui.vertical(|ui| {
                    self.draw_chords(ui);
                    ui.add_space(12.0);
                    self.draw_trainer(ui);
                });
                ui.end_row();
            });

            ui.separator();
            self.draw_master_volume(ui);
            self.draw_status(ui);
        });

        // Keep pumping between interactions; 4 ms keeps sub-beat events
        // close to their deadlines
        ctx.request_repaint_after(Duration::from_millis(4));
    }
}
