use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};

/// Timestamped log lines on stderr, so stdout stays free for results
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    /// `-v` shows info, `-vv` debug, `-vvv` and above trace
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        eprintln!(
            "{} {} [{}] {}",
            Local::now().format("%H:%M:%S%.3f"),
            tag,
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(StderrLogger::from_verbosity(0).level, LevelFilter::Warn);
        assert_eq!(StderrLogger::from_verbosity(1).level, LevelFilter::Info);
        assert_eq!(StderrLogger::from_verbosity(2).level, LevelFilter::Debug);
        assert_eq!(StderrLogger::from_verbosity(9).level, LevelFilter::Trace);
    }

    #[test]
    fn test_install_once() {
        let quiet = StderrLogger::from_verbosity(0);
        assert!(!quiet.enabled(&Metadata::builder().level(Level::Info).build()));

        StderrLogger::from_verbosity(1).init().unwrap();
        assert_eq!(log::max_level(), LevelFilter::Info);

        let err = StderrLogger::from_verbosity(1).init().unwrap_err();
        let wrapped = anyhow::Error::new(err).context("Failed to install logger");
        assert!(wrapped.to_string().contains("install logger"));
    }
}
