use guitar_studio::ui::app::StudioApp;
use guitar_studio::{
    AudioEngine, CommandToneSink, Studio, create_command_channel, create_notification_channel,
};
use guitar_studio::synth::NullToneSink;
use guitar_studio::synth::ToneSink;
use std::sync::{Arc, Mutex};

// Ringbuffer capacities. Tones are sparse (a handful per beat at most),
// so a small command buffer already covers seconds of backlog.
const COMMAND_RINGBUFFER_CAPACITY: usize = 256;
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 64;

fn main() {
    let (command_tx, command_rx) = create_command_channel(COMMAND_RINGBUFFER_CAPACITY);
    let (notification_tx, notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    // A missing audio device is not fatal: the studio runs with a silent
    // sink and the UI shows a notice instead. The engine must outlive
    // run_native, its drop tears the stream down.
    let (_audio_engine, sink, master_volume): (_, Box<dyn ToneSink>, _) =
        match AudioEngine::new(command_rx, notification_tx) {
            Ok(engine) => {
                let volume = engine.volume.clone();
                (
                    Some(engine),
                    Box::new(CommandToneSink::new(command_tx)) as Box<dyn ToneSink>,
                    Some(volume),
                )
            }
            Err(e) => {
                eprintln!("Audio unavailable: {}", e);
                (None, Box::new(NullToneSink) as Box<dyn ToneSink>, None)
            }
        };

    let studio = Studio::new(sink);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 620.0])
            .with_title("Guitar Studio"),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "Guitar Studio",
        native_options,
        Box::new(|_cc| {
            let app = StudioApp::new(studio, master_volume, Some(notification_rx));
            Ok(Box::new(app))
        }),
    );
}
