// Communication channels lock-free

use crate::messaging::command::Command;
use crate::messaging::notification::Notification;
use crate::synth::{Tone, ToneSink};
use ringbuf::{HeapRb, traits::Split};

pub type CommandProducer = ringbuf::HeapProd<Command>;
pub type CommandConsumer = ringbuf::HeapCons<Command>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<Command>::new(capacity);
    rb.split()
}

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}

/// Tone sink backed by the command ringbuffer.
///
/// A full buffer drops the tone silently; synthesis has no error path and
/// a missed click is better than a blocked UI thread.
pub struct CommandToneSink {
    command_tx: CommandProducer,
}

impl CommandToneSink {
    pub fn new(command_tx: CommandProducer) -> Self {
        Self { command_tx }
    }
}

impl ToneSink for CommandToneSink {
    fn play(&mut self, tone: Tone) {
        let _ = ringbuf::traits::Producer::try_push(&mut self.command_tx, Command::PlayTone(tone));
    }
}
