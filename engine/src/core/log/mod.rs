//! Log forwarding for hosts that draw the simulation.
//!
//! The engine logs through the `log` facade. A host without a terminal (a windowed front end, a
//! debug overlay) installs the [`ChannelLogger`] and drains [`LogMessage`]s from the returned
//! receiver once per frame.

mod channel;

pub use channel::{ChannelLogger, LogMessage};

use crossbeam::channel::Receiver;
use log::{LevelFilter, SetLoggerError};

/// Install a [`ChannelLogger`] as the global logger and return the receiving end.
///
/// Fails if another global logger was already installed.
pub fn init(level: LevelFilter) -> Result<Receiver<LogMessage>, SetLoggerError> {
    let (logger, receiver) = ChannelLogger::with_receiver(level);
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(receiver)
}
