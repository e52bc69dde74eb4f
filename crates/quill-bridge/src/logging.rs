//! Forwarding of log records and panic messages to the host.

use std::ffi::{CString, c_char};
use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub type WriteLogFn = unsafe extern "C" fn(level: u32, message: *const c_char, length: usize);
pub type PanicFn = unsafe extern "C" fn(message: *const c_char);

/// Level numbering of the host's `writeLog`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl From<Level> for HostLogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => HostLogLevel::Error,
            Level::Warn => HostLogLevel::Warn,
            Level::Info => HostLogLevel::Info,
            Level::Debug | Level::Trace => HostLogLevel::Debug,
        }
    }
}

/// `log` backend that writes every record through the host callback.
pub struct HostLogSink {
    write: WriteLogFn,
    max_level: LevelFilter,
}

impl HostLogSink {
    pub fn new(write: WriteLogFn, max_level: LevelFilter) -> Self {
        Self { write, max_level }
    }
}

impl Log for HostLogSink {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format!("[{}] {}", record.target(), record.args());
        let level = HostLogLevel::from(record.level()) as u32;
        // SAFETY: the host reads `length` bytes during the call and keeps no reference.
        unsafe { (self.write)(level, message.as_ptr().cast(), message.len()) }
    }

    fn flush(&self) {}
}

/// Route the `log` facade to the host. Fails if a logger is already set.
pub fn install_host_logger(write: WriteLogFn, max_level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(HostLogSink::new(write, max_level)))?;
    log::set_max_level(max_level);
    Ok(())
}

/// Level filter from a config or environment string; `Info` when absent or
/// unrecognised.
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level {
        Some(name) => LevelFilter::from_str(name.trim()).unwrap_or_else(|_| {
            log::warn!("unknown log level {name:?}, using info");
            LevelFilter::Info
        }),
        None => LevelFilter::Info,
    }
}

/// Report panics to the host before the previous hook runs.
///
/// Invariant violations inside an exported function abort the process, so
/// this is the host's only chance to see the message.
pub fn install_panic_forwarder(panic_fn: PanicFn) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let message = info.to_string().replace('\0', " ");
        if let Ok(message) = CString::new(message) {
            // SAFETY: NUL terminated and alive for the call.
            unsafe { panic_fn(message.as_ptr()) };
        }
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::slice;

    thread_local! {
        static RECEIVED: RefCell<Vec<(u32, String)>> = const { RefCell::new(Vec::new()) };
    }

    unsafe extern "C" fn capture(level: u32, message: *const c_char, length: usize) {
        let bytes = unsafe { slice::from_raw_parts(message.cast::<u8>(), length) };
        let text = String::from_utf8_lossy(bytes).into_owned();
        RECEIVED.with(|r| r.borrow_mut().push((level, text)));
    }

    #[test]
    fn sink_maps_levels_and_filters() {
        let sink = HostLogSink::new(capture, LevelFilter::Info);

        sink.log(
            &Record::builder()
                .level(Level::Warn)
                .target("quill")
                .args(format_args!("careful"))
                .build(),
        );
        sink.log(
            &Record::builder()
                .level(Level::Debug)
                .target("quill")
                .args(format_args!("hidden"))
                .build(),
        );

        let received = RECEIVED.with(|r| r.take());
        assert_eq!(received, vec![(2, "[quill] careful".to_string())]);
    }

    #[test]
    fn trace_maps_to_debug() {
        assert_eq!(HostLogLevel::from(Level::Trace), HostLogLevel::Debug);
        assert_eq!(HostLogLevel::from(Level::Error) as u32, 3);
    }

    #[test]
    fn parse_level_defaults_to_info() {
        assert_eq!(parse_level(None), LevelFilter::Info);
        assert_eq!(parse_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" WARN ")), LevelFilter::Warn);
        assert_eq!(parse_level(Some("loud")), LevelFilter::Info);
    }
}
