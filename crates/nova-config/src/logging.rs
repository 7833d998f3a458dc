use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, Once, OnceLock};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Nova crates, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr (in addition to the in-memory buffer).
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Number of log lines kept in memory for bug reports.
    #[serde(default = "LoggingConfig::default_buffer_lines")]
    #[schemars(range(min = 1))]
    pub buffer_lines: usize,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    fn default_buffer_lines() -> usize {
        2_000
    }

    fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" | "none" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    pub(crate) fn validate_level(&self) -> Result<(), String> {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(&directives)
            .map(|_| ())
            .map_err(|err| format!("invalid level `{directives}`: {err}"))
    }

    /// The effective filter: `level` merged with `RUST_LOG` when that is set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let configured = Self::normalize_level_directives(&self.level);
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let fallback = || {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        };

        match env_directives {
            Some(env) => tracing_subscriber::EnvFilter::try_new(format!("{configured},{env}"))
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&env))
                .unwrap_or_else(|_| fallback()),
            None => tracing_subscriber::EnvFilter::try_new(&configured).unwrap_or_else(|_| fallback()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            buffer_lines: Self::default_buffer_lines(),
        }
    }
}

/// Ring buffer of the most recent log lines.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    inner: Mutex<VecDeque<String>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(VecDeque::with_capacity(capacity.min(8_192))),
        }
    }

    pub fn push_line(&self, line: String) {
        let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        if inner.len() == self.capacity {
            inner.pop_front();
        }
        inner.push_back(line);
    }

    pub fn last_lines(&self, n: usize) -> Vec<String> {
        let inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        inner.iter().rev().take(n).cloned().rev().collect()
    }
}

#[derive(Clone)]
pub(crate) struct LogBufferMakeWriter {
    buffer: Arc<LogBuffer>,
}

impl<'a> MakeWriter<'a> for LogBufferMakeWriter {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            buffer: self.buffer.clone(),
            bytes: Vec::new(),
        }
    }
}

pub(crate) struct LogBufferWriter {
    buffer: Arc<LogBuffer>,
    bytes: Vec<u8>,
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        if self.bytes.is_empty() {
            return;
        }

        let text = String::from_utf8_lossy(&self.bytes);
        for line in text.split_terminator('\n') {
            let line = line.trim_end_matches('\r');
            if !line.is_empty() {
                self.buffer.push_line(line.to_owned());
            }
        }
    }
}

static TRACING_INIT: Once = Once::new();
static GLOBAL_LOG_BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

pub fn global_log_buffer() -> Arc<LogBuffer> {
    GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(LoggingConfig::default_buffer_lines())))
        .clone()
}

/// Initializes structured `tracing` logging.
///
/// Safe to call multiple times; only the first call installs a global
/// subscriber. Every call returns the global in-memory log buffer.
pub fn init_tracing(config: &LoggingConfig) -> Arc<LogBuffer> {
    let buffer = GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(config.buffer_lines)))
        .clone();

    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let mut make_writer = BoxMakeWriter::new(LogBufferMakeWriter {
            buffer: buffer.clone(),
        });
        if config.stderr {
            // `TestWriter` goes through the stdlib print machinery so `cargo test`
            // captures it; release binaries write straight to stderr.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(std::io::stderr));
            }
        }

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(make_writer)
            .with_ansi(false)
            .with_target(true);

        let result = if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        };

        if result.is_err() {
            // Another subscriber is already installed (e.g. by an embedding host).
            buffer.push_line("nova: global tracing subscriber already installed".to_owned());
        }
    });

    buffer
}
