use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing::Level;

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(&'static Mutex<File>),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new() -> Self {
        match LOG_FILE.get() {
            Some(file) => DelegatingWriter {
                inner: DelegatingInner::File(file),
            },
            None => DelegatingWriter {
                inner: DelegatingInner::Stderr(io::stderr()),
            },
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(f) => f
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(f) => f
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new()
    }
}

/// Install the global subscriber. Output goes to the log file when one was
/// registered with [`init_with_file`], otherwise to stderr. Later calls are
/// no-ops.
pub fn init_default() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(LOG_FILE.get().is_none())
        .try_init();
}

/// Append log output to `path`. The terminal host uses this since anything
/// written to stderr would land on top of the desktop.
pub fn init_with_file(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if LOG_FILE.set(Mutex::new(file)).is_err() {
        return Err(io::Error::other("log file already configured"));
    }
    init_default();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk-wm.log");
        init_with_file(&path).unwrap();
        tracing::info!(window_id = 7, "opened window");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("opened window"));
        assert!(text.contains("window_id=7"));
        assert!(init_with_file(&path).is_err());
    }
}
