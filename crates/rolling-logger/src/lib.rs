//! Rolling Logger
//!
//! Writes `tracing` (and bridged `log`) output to `<log_dir>/<app_name>.log`,
//! rolling the file over to `<app_name>.log.1` once it passes a size cap.
//! The most recent lines are also kept in a circular buffer so the app can
//! show them without touching the file system.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<RollingLog> = OnceLock::new();

/// Size cap for the live file and capacity of the in-memory buffer
#[derive(Debug, Clone, Copy)]
pub struct RollingOptions {
    pub max_bytes: u64,
    pub buffer_lines: usize,
}

impl Default for RollingOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

struct RollingState {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    recent: VecDeque<String>,
    capacity: usize,
    partial: String,
}

impl RollingState {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.roll()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        self.remember(buf);
        Ok(())
    }

    fn roll(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let rolled = rolled_path(&self.path);
        if rolled.exists() {
            fs::remove_file(&rolled)?;
        }
        fs::rename(&self.path, &rolled)?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.capacity == 0 {
                continue;
            }
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent
                .push_back(line.trim_end_matches(['\n', '\r']).to_string());
        }
    }
}

/// Last `capacity` lines already in the file, so a new process can show history
fn tail_lines(path: &Path, capacity: usize) -> io::Result<VecDeque<String>> {
    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);
    let mut recent = VecDeque::with_capacity(capacity);
    for line in text.lines() {
        if recent.len() == capacity {
            recent.pop_front();
        }
        if capacity > 0 {
            recent.push_back(line.to_string());
        }
    }
    Ok(recent)
}

/// Handle to a rolling log file, cheap to clone
#[derive(Clone)]
pub struct RollingLog {
    state: Arc<Mutex<RollingState>>,
}

impl RollingLog {
    pub fn open(log_dir: &Path, app_name: &str, options: RollingOptions) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!("{app_name}.log"));
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        let recent = tail_lines(&path, options.buffer_lines)?;

        Ok(Self {
            state: Arc::new(Mutex::new(RollingState {
                path,
                file,
                written,
                max_bytes: options.max_bytes,
                recent,
                capacity: options.buffer_lines,
                partial: String::new(),
            })),
        })
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.state.lock().ok().map(|state| state.path.clone())
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.recent.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut RollingState) -> io::Result<T>) -> io::Result<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log state poisoned"))?;
        f(&mut state)
    }
}

/// Per-event writer handed out to the fmt subscriber
pub struct RollingWriter {
    log: RollingLog,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log.with_state(|state| state.write_bytes(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.log.with_state(|state| state.file.flush())
    }
}

impl<'a> MakeWriter<'a> for RollingLog {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter { log: self.clone() }
    }
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn rolled_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

/// Install the global subscriber with default options
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, RollingOptions::default())
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logger_with(
    log_dir: PathBuf,
    app_name: &str,
    options: RollingOptions,
) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let log = RollingLog::open(&log_dir, app_name, options)
        .map_err(|e| format!("Failed to open log file: {}", e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_timer(LocalTimer)
        .with_writer(log.clone())
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    let path = log.path();
    let _ = LOGGER.set(log);
    tracing::info!(target: "rolling_logger", "Logging to {:?}", path);
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    if LOGGER.get().is_some() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

pub fn info(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::info!("{}", message);
    Ok(())
}

pub fn warn(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::warn!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::error!("{}", message);
    Ok(())
}

/// Recent lines from the global logger, empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingLog::recent_lines).unwrap_or_default()
}

/// Path of the live log file, if initialized
pub fn log_path() -> Option<PathBuf> {
    LOGGER.get().and_then(RollingLog::path)
}
