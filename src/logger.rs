use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, OnceLock};

static LOGGER: OnceLock<Logger> = OnceLock::new();

// oldest entries are dropped past this
const BUFFER_LIMIT: usize = 256;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
}

/// Keeps log records in memory until the screen collects them
///
/// The terminal is in raw mode and fully redrawn, so records are never
/// printed directly.
pub struct Logger {
    buffer: Mutex<Vec<LogEntry>>,
}

impl Logger {
    fn new() -> Self {
        Logger {
            buffer: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, level: Level, message: String) {
        if let Ok(mut buffer) = self.buffer.lock() {
            if buffer.len() == BUFFER_LIMIT {
                buffer.remove(0);
            }
            buffer.push(LogEntry { level, message });
        }
    }

    fn collect(&self) -> Vec<LogEntry> {
        match self.buffer.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(_) => Vec::new(),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.add(record.level(), format!("{}", record.args()));
        }
    }

    fn flush(&self) {}
}

pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    let logger = LOGGER.get_or_init(Logger::new);
    log::set_logger(logger).map_err(|e| anyhow::anyhow!("failed to init logger: {}", e))?;
    log::set_max_level(level);
    Ok(())
}

/// Takes every record logged since the last call
pub fn collect_logs() -> Vec<LogEntry> {
    LOGGER.get().map(|l| l.collect()).unwrap_or_default()
}
