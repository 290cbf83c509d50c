//! Logging setup and runtime-adjustable log destinations.
//!
//! `tracing` events are formatted by a `tracing-subscriber` fmt layer whose writer
//! is a `LogOutputs` handle. The handle fans each formatted event out to stdout
//! and to any number of extra writers, such as the timestamped file created by
//! `set_output_folder`. Destinations can be changed while the server runs; all
//! changes and all writes go through one mutex, so an event is never split
//! between two destination sets.

use std::{
    backtrace::Backtrace,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use tracing::{Level, Metadata};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::server::error::AppError;

/// Destinations written by the log subscriber.
pub struct OutputSet {
    console: bool,
    colors: bool,
    writers: Vec<Box<dyn Write + Send>>,
    files: Vec<PathBuf>,
}

impl OutputSet {
    pub fn logs_to_console(&self) -> bool {
        self.console
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Number of destinations besides the console.
    pub fn writer_count(&self) -> usize {
        self.writers.len()
    }

    /// Log files opened by `set_output_folder`.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn write_event(&mut self, level: Option<Level>, event: &[u8]) {
        if self.console {
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            let _ = match (self.colors, level) {
                (true, Some(level)) => stdout.write_all(&colorize(level, event)),
                _ => stdout.write_all(event),
            };
        }

        for writer in &mut self.writers {
            let _ = writer.write_all(event);
            let _ = writer.flush();
        }
    }
}

/// Cloneable handle to the shared output set; implements `MakeWriter`.
#[derive(Clone)]
pub struct LogOutputs {
    inner: Arc<Mutex<OutputSet>>,
}

impl Default for LogOutputs {
    fn default() -> Self {
        Self::new()
    }
}

impl LogOutputs {
    /// Creates outputs writing to the console only, without colors.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(OutputSet {
                console: true,
                colors: false,
                writers: Vec::new(),
                files: Vec::new(),
            })),
        }
    }

    /// Locks the output set for inspection; logging blocks while the guard lives.
    pub fn lock(&self) -> MutexGuard<'_, OutputSet> {
        self.inner.lock()
    }

    pub fn set_colors(&self, colors: bool) {
        self.inner.lock().colors = colors;
    }

    pub fn set_log_to_console(&self, console: bool) {
        self.inner.lock().console = console;
    }

    /// Replaces every extra destination with `writer`.
    pub fn set_output(&self, writer: Box<dyn Write + Send>) {
        let mut outputs = self.inner.lock();
        flush_all(&mut outputs.writers);
        outputs.writers = vec![writer];
        outputs.files.clear();
    }

    /// Adds a destination next to the existing ones.
    pub fn add_output(&self, writer: Box<dyn Write + Send>) {
        self.inner.lock().writers.push(writer);
    }

    /// Opens `{folder}/{app}_{YYYY-MM-DD_HH-MM-SS}.log` and adds it as a destination.
    ///
    /// # Arguments
    /// - `folder` - Directory for log files, created if missing
    /// - `app` - File name prefix
    /// - `append` - Append to an existing file of the same name instead of truncating it
    ///
    /// # Returns
    /// - `Ok(PathBuf)` - Path of the opened file
    /// - `Err(io::Error)` - Folder or file could not be created
    pub fn set_output_folder(
        &self,
        folder: impl AsRef<Path>,
        app: &str,
        append: bool,
    ) -> io::Result<PathBuf> {
        let folder = folder.as_ref();
        fs::create_dir_all(folder)?;

        let stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let path = folder.join(format!("{app}_{stamp}.log"));

        let file: File = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)?;

        let mut outputs = self.inner.lock();
        outputs.writers.push(Box::new(file));
        outputs.files.push(path.clone());

        Ok(path)
    }

    /// Flushes and drops every extra destination. Console output continues.
    pub fn close(&self) {
        let mut outputs = self.inner.lock();
        flush_all(&mut outputs.writers);
        outputs.writers.clear();
        outputs.files.clear();
    }
}

fn flush_all(writers: &mut [Box<dyn Write + Send>]) {
    for writer in writers {
        let _ = writer.flush();
    }
}

/// Buffers one formatted event and hands it to the output set when dropped.
pub struct EventWriter {
    outputs: Arc<Mutex<OutputSet>>,
    level: Option<Level>,
    buf: Vec<u8>,
}

impl Write for EventWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        if !self.buf.is_empty() {
            self.outputs.lock().write_event(self.level, &self.buf);
        }
    }
}

impl<'a> MakeWriter<'a> for LogOutputs {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter {
            outputs: self.inner.clone(),
            level: None,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        EventWriter {
            outputs: self.inner.clone(),
            level: Some(*meta.level()),
            buf: Vec::new(),
        }
    }
}

fn colorize(level: Level, event: &[u8]) -> Vec<u8> {
    let code: &[u8] = match level {
        Level::ERROR => b"\x1b[31m",
        Level::WARN => b"\x1b[33m",
        Level::INFO => b"\x1b[32m",
        Level::DEBUG => b"\x1b[34m",
        Level::TRACE => b"\x1b[35m",
    };

    let (body, newline) = match event.strip_suffix(b"\n") {
        Some(body) => (body, true),
        None => (event, false),
    };

    let mut colored = Vec::with_capacity(event.len() + 10);
    colored.extend_from_slice(code);
    colored.extend_from_slice(body);
    colored.extend_from_slice(b"\x1b[0m");
    if newline {
        colored.push(b'\n');
    }
    colored
}

/// Installs the global subscriber writing through `outputs`.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing(outputs: LogOutputs) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(outputs),
        )
        .try_init()
        .map_err(|e| AppError::InternalError(format!("failed to install log subscriber: {e}")))
}

/// Logs `err`, its source chain and a captured backtrace at error level.
pub fn log_error_stack(err: &(dyn std::error::Error + 'static)) {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }

    tracing::error!("{}\n{}", chain, Backtrace::force_capture());
}
