//! pyhost - static native call bridge for a dynamic-object runtime
//!
//! Host (Rust) static methods are wrapped as callable runtime values. The
//! interpreter applies them like any other callable; host failures come back
//! as the runtime's own `RuntimeError`.

pub mod config;
pub mod errors;
pub mod interop;
pub mod logging;
pub mod objects;

// Re-export core types
pub use config::{ConfigError, InteropConfig, LoggingConfig, RuntimeConfig};
pub use errors::{ExceptionKind, NativeCallFailure, PyException, PyResult};
pub use interop::{
    BoundMethod, Callable, Closure, HostMethod, Invoke, KeywordArguments, PositionalArguments,
    StaticNativeCallable, Visibility,
};
pub use objects::{DynamicValue, HostType, Payload};

/// Runtime initialization from environment settings
pub fn init() {
    logging::init();
    logging::log_runtime_init();
    interop::init();
}

/// Runtime initialization from a loaded configuration
pub fn init_with_config(config: &RuntimeConfig) {
    logging::init_with_config(config.log_config());
    logging::log_runtime_init();
    interop::init();
}

/// Runtime cleanup
pub fn cleanup() {
    logging::log_runtime_shutdown();
}
