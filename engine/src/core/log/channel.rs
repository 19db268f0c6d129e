use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{Level, LevelFilter, Metadata, Record};

/// A single formatted log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// A `log::Log` implementation that forwards records over a channel.
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: LevelFilter,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A dropped receiver just means nobody is listening anymore.
            let _ = self.sender.try_send(LogMessage {
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>, level: LevelFilter) -> Self {
        Self { sender, level }
    }

    pub fn with_receiver(level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender, level), receiver)
    }
}
