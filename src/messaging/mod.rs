// Messaging module - Lock-free UI <-> audio communication

pub mod channels;
pub mod command;
pub mod notification;

pub use channels::{
    CommandConsumer, CommandProducer, CommandToneSink, NotificationConsumer, NotificationProducer,
    create_command_channel, create_notification_channel,
};
pub use command::Command;
pub use notification::{Notification, NotificationCategory, NotificationLevel};
