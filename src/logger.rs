use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

static LOGGER: FileLogger = FileLogger;

/// Writes `log` records to the file opened by [`init`]. The terminal UI owns
/// stdout, so nothing is printed.
struct FileLogger;

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut guard) = LOG_FILE.lock() else {
            return;
        };
        if let Some(file) = guard.as_mut() {
            let _ = writeln!(
                file,
                "[{}] {:<5} {}: {}",
                chrono::Utc::now().timestamp(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock()
            && let Some(file) = guard.as_mut()
        {
            let _ = file.flush();
        }
    }
}

/// Opens `path` for appending and installs the file logger. Calling it again
/// swaps the file; the logger itself is only installed once.
pub fn init(path: &Path, level: LevelFilter) {
    if let Ok(mut guard) = LOG_FILE.lock()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(path)
    {
        *guard = Some(file);
    }

    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
