//! Diagnostic log: `tracing` events written to a day-rotating file.
//!
//! The active file is `<dir>/tubelist.log`; rotated copies are
//! `tubelist.log.1` (yesterday's) up to `tubelist.log.14`. Rotation happens
//! lazily on the first write of a new calendar day.

use std::{
    fmt, fs,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Local, NaiveDate};
use tracing::{Level, Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::{
    FmtSubscriber,
    fmt::{MakeWriter, format::Writer, time::FormatTime},
};

use crate::utils::{SharedClock, SystemClock};

pub const LOG_FILE_NAME: &str = "tubelist.log";
pub const MAX_BACKUPS: usize = 14;

/// File sink for the fmt subscriber. Each event is one `write`, which
/// rotates first when the active file was last touched on another day.
#[derive(Clone)]
pub struct RotatingLog {
    dir: PathBuf,
    clock: SharedClock,
}

impl fmt::Debug for RotatingLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingLog").field("dir", &self.dir).finish()
    }
}

impl RotatingLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: SharedClock) -> Self {
        RotatingLog {
            dir: dir.into(),
            clock,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    pub fn backup_path(&self, slot: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", LOG_FILE_NAME, slot))
    }

    fn append(&self, buf: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let active = self.path();

        if let Some(modified) = last_modified_date(&active)? {
            if modified != self.clock.now().date_naive() {
                self.rotate()?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&active)?
            .write_all(buf)
    }

    fn rotate(&self) -> io::Result<()> {
        let oldest = self.backup_path(MAX_BACKUPS);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for n in (1..MAX_BACKUPS).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }

        fs::rename(self.path(), self.backup_path(1))
    }
}

pub struct LogWriter {
    log: RotatingLog,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingLog {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter { log: self.clone() }
    }
}

/// Event timestamps taken from the same clock that drives rotation.
#[derive(Clone)]
pub struct ClockTime(SharedClock);

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", self.0.now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Subscriber writing plain lines (`<timestamp> <LEVEL> <message>`) to `log`.
/// Write failures are reported on stderr by the subscriber and never reach
/// the code that emitted the event.
pub fn subscriber(log: RotatingLog) -> impl Subscriber + Send + Sync + 'static {
    let timer = ClockTime(log.clock.clone());
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_timer(timer)
        .with_writer(log)
        .finish()
}

/// Installs the file subscriber for the whole process.
pub fn init(dir: impl Into<PathBuf>) -> Result<(), SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber(RotatingLog::new(dir)))
}

fn last_modified_date(path: &Path) -> io::Result<Option<NaiveDate>> {
    match fs::metadata(path) {
        Ok(meta) => {
            let modified: DateTime<Local> = meta.modified()?.into();
            Ok(Some(modified.date_naive()))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
