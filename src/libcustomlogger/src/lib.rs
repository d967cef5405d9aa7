//! custom logger

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct Logger {
    max_level: LevelFilter,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = Local::now();
            let now_time = now.format("%Y/%m/%d %H:%M:%S");
            println!("{} {} {}", now_time, record.level(), record.args());
        }
    }
    fn flush(&self) {}
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger { max_level: level }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_respects_max_level() {
        let logger = Logger {
            max_level: LevelFilter::Warn,
        };
        assert!(logger.enabled(&Metadata::builder().level(log::Level::Error).build()));
        assert!(logger.enabled(&Metadata::builder().level(log::Level::Warn).build()));
        assert!(!logger.enabled(&Metadata::builder().level(log::Level::Info).build()));
    }
}
