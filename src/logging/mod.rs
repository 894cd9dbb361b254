//! Logging infrastructure - structured tracing throughout the runtime
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log levels per module
//! - Zero-cost when disabled
//! - Console output (compact or JSON) plus an optional log file

use once_cell::sync::OnceCell;
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Keeps the background file writer alive for the life of the process
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Enable file logging
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // PYHOST_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level_str) = std::env::var("PYHOST_LOG_LEVEL") {
            config.level = level_str.parse().unwrap_or(Level::INFO);
        }

        // PYHOST_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("PYHOST_LOG_FILE") {
            config.file_output = true;
            config.log_path = Some(path);
        }

        config.json_format = std::env::var("PYHOST_LOG_JSON").is_ok();
        config.show_spans = std::env::var("PYHOST_LOG_SPANS").is_ok();

        config
    }

    /// Create debug config (verbose logging)
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: true,
        }
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("pyhost={}", config.level.as_str().to_lowercase()))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let mut layers: Vec<BoxedLayer> = Vec::new();

        let console = fmt::layer()
            .with_writer(io::stderr)
            .with_span_events(span_events.clone())
            .with_target(true)
            .with_thread_ids(cfg!(debug_assertions))
            .with_line_number(cfg!(debug_assertions));
        if config.json_format {
            layers.push(console.json().boxed());
        } else {
            layers.push(console.compact().boxed());
        }

        if let Some(path) = config.log_path.as_deref().filter(|_| config.file_output) {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| OsStr::new("pyhost.log"));

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            FILE_GUARD.set(guard).ok();

            layers.push(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_span_events(span_events)
                    .boxed(),
            );
        }

        tracing_subscriber::registry()
            .with(env_filter)
            .with(layers)
            .try_init()
            .ok(); // Another subscriber may already be installed
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Native call events
// ============================================================================

/// Log a static native call
#[inline]
pub fn log_native_call(method: &str, positional: usize, keywords: usize) {
    use tracing::debug;
    debug!(
        event = "native_call",
        method,
        positional,
        keywords,
        "Static native method called"
    );
}

/// Log a static native return
#[inline]
pub fn log_native_return(method: &str) {
    use tracing::trace;
    trace!(
        event = "native_return",
        method,
        "Static native method returned"
    );
}

/// Log a native method that raised
pub fn log_native_error(method: &str, error: &str) {
    use tracing::warn;
    warn!(
        event = "native_error",
        method,
        error,
        "Static native method raised"
    );
}

/// Log a call rejected by access checks
pub fn log_access_denied(method: &str) {
    use tracing::error;
    error!(
        event = "access_denied",
        method,
        "Illegal access to static native method"
    );
}

/// Log runtime initialization
pub fn log_runtime_init() {
    use tracing::info;
    info!(event = "runtime_init", "pyhost runtime initializing");
}

/// Log runtime shutdown
pub fn log_runtime_shutdown() {
    use tracing::info;
    info!(event = "runtime_shutdown", "pyhost runtime shutting down");
}

/// Performance tracking utilities
pub mod perf {
    use std::time::{Duration, Instant};
    use tracing::debug;

    /// Track operation duration (returns guard that logs on drop)
    #[must_use]
    pub fn track(operation: &str) -> PerformanceGuard {
        PerformanceGuard {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub struct PerformanceGuard {
        operation: String,
        start: Instant,
    }

    impl PerformanceGuard {
        pub fn operation(&self) -> &str {
            &self.operation
        }

        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }
    }

    impl Drop for PerformanceGuard {
        fn drop(&mut self) {
            let elapsed = self.start.elapsed();
            debug!(
                operation = %self.operation,
                duration_us = elapsed.as_micros() as u64,
                "operation completed"
            );
        }
    }
}
