//! `log` facade backend writing to the serial console.

use log::{info, Level, LevelFilter, Metadata, Record, SetLoggerError};

use crate::serial_println;

static LOGGER: SerialLogger = SerialLogger;

/// Route `log` records at or above `level` to the serial console.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);

    info!("logging initialized at {}", level);
    Ok(())
}

pub struct SerialLogger;

impl SerialLogger {
    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[1;31m",
            Level::Warn => "\x1b[1;33m",
            Level::Info => "\x1b[1;94m",
            Level::Debug => "\x1b[1;30m",
            Level::Trace => "\x1b[1;90m",
        }
    }
}

impl log::Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            serial_println!(
                "{}{:5}\x1b[0m [{}] {}",
                Self::color(record.level()),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
