// Audio engine - Real-time CPAL callback
//
// # Format support
//
// The engine supports the common output sample formats:
// - **F32**: 32-bit float (native, no conversion)
// - **I16**: signed 16-bit integer (common on Windows/WASAPI)
// - **U16**: unsigned 16-bit integer (less common)
//
// The device's preferred format is detected via `sample_format()` and the
// matching stream type is built. All synthesis happens in f32; conversion
// to the device format happens at the buffer edge through cpal's
// `FromSample<f32>` trait, without allocation.
//
// # Callback rules
//
// The audio callback is a sacred zone: no allocations, no I/O, no
// blocking locks. Shared state is reached through `try_lock`, falling
// back to silence when the UI thread holds the lock.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::audio::dsp_utils::{OnePoleSmoother, flush_denormals_to_zero, soft_clip};
use crate::audio::parameters::AtomicF32;
use crate::messaging::channels::{CommandConsumer, NotificationProducer};
use crate::messaging::command::Command;
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::synth::voice_manager::VoiceManager;

/// Default master output level
const DEFAULT_MASTER_VOLUME: f32 = 0.8;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoDevice,
    #[error("failed to query the output configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format: {0:?} (supported: F32, I16, U16)")]
    UnsupportedFormat(SampleFormat),
    #[error("failed to build the audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start the audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    sample_rate: f32,
    /// Master output volume, shared with the UI thread
    pub volume: AtomicF32,
}

impl AudioEngine {
    pub fn new(
        command_rx: CommandConsumer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        // Master volume shared between the UI slider and the callback
        let volume = AtomicF32::new(DEFAULT_MASTER_VOLUME);
        let volume_clone = volume.clone();

        // Voice pool, pre-allocated outside the callback
        let voice_manager = Arc::new(Mutex::new(VoiceManager::new(sample_rate)));

        // 10 ms volume smoothing to avoid zipper noise
        let volume_smoother = Arc::new(Mutex::new(OnePoleSmoother::new(
            DEFAULT_MASTER_VOLUME,
            10.0,
            sample_rate,
        )));

        let command_rx = Arc::new(Mutex::new(command_rx));
        let notification_tx_err = notification_tx.clone();

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                command_rx,
                voice_manager,
                volume_clone,
                volume_smoother,
                notification_tx_err,
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                command_rx,
                voice_manager,
                volume_clone,
                volume_smoother,
                notification_tx_err,
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                command_rx,
                voice_manager,
                volume_clone,
                volume_smoother,
                notification_tx_err,
            ),
            other => return Err(AudioError::UnsupportedFormat(other)),
        }?;

        stream.play()?;

        if let Ok(mut tx) = notification_tx.try_lock() {
            let notif = Notification::info(
                NotificationCategory::Audio,
                format!("Audio connected: {} Hz", sample_rate),
            );
            let _ = ringbuf::traits::Producer::try_push(&mut *tx, notif);
        }

        Ok(Self {
            _device: device,
            _stream: stream,
            sample_rate,
            volume,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Build an output stream for any supported sample type. The callback
    /// generates f32 and converts at the buffer edge.
    #[allow(clippy::too_many_arguments)]
    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        command_rx: Arc<Mutex<CommandConsumer>>,
        voice_manager: Arc<Mutex<VoiceManager>>,
        volume: AtomicF32,
        volume_smoother: Arc<Mutex<OnePoleSmoother>>,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // ========== SACRED ZONE ==========
                // No allocations, No I/O, No blocking locks

                // Drain pending tone commands into the voice pool
                if let Ok(mut rx) = command_rx.try_lock() {
                    if let Ok(mut vm) = voice_manager.try_lock() {
                        while let Some(cmd) = ringbuf::traits::Consumer::try_pop(&mut *rx) {
                            match cmd {
                                Command::PlayTone(tone) => vm.trigger(tone),
                            }
                        }
                    }
                }

                // Generate audio samples
                if let Ok(mut vm) = voice_manager.try_lock() {
                    if let Ok(mut smoother) = volume_smoother.try_lock() {
                        for frame in data.chunks_mut(channels) {
                            let target_volume = volume.get();
                            let smoothed_volume = smoother.process(target_volume);

                            let mut sample = vm.next_sample();
                            sample = flush_denormals_to_zero(sample);
                            sample *= smoothed_volume;
                            sample = soft_clip(sample);

                            write_mono_to_interleaved_frame(sample, frame);
                        }
                    } else {
                        // Fallback without smoothing, still better than silence
                        let current_volume = volume.get();
                        for frame in data.chunks_mut(channels) {
                            let mut sample = vm.next_sample();
                            sample = flush_denormals_to_zero(sample);
                            sample *= current_volume;
                            sample = soft_clip(sample);

                            write_mono_to_interleaved_frame(sample, frame);
                        }
                    }
                } else {
                    // Fallback: silence if the lock is contended
                    for sample in data.iter_mut() {
                        *sample = Sample::from_sample::<f32>(0.0);
                    }
                }
                // ========== SACRED ZONE END ==========
            },
            move |err| {
                // Error callback runs outside the audio callback, I/O is fine
                eprintln!("Audio stream error: {}", err);

                if let Ok(mut tx) = notification_tx.try_lock() {
                    let notif = Notification::error(
                        NotificationCategory::Audio,
                        format!("Audio stream error: {}", err),
                    );
                    let _ = ringbuf::traits::Producer::try_push(&mut *tx, notif);
                }
            },
            None,
        )?;

        Ok(stream)
    }
}

/// Write one mono sample to every channel of an interleaved frame,
/// converting f32 to the device format.
#[inline]
fn write_mono_to_interleaved_frame<T>(sample: f32, frame: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    let converted = T::from_sample(sample);
    for channel_sample in frame.iter_mut() {
        *channel_sample = converted;
    }
}
