//! Interoperability - call static host methods from the dynamic runtime
//!
//! Design: host methods become ordinary callables, failures become runtime exceptions
//!
//! Architecture:
//! - `method.rs` - Resolved host method references and the host call convention
//! - `callable.rs` - Callable capability (`Invoke`) and the tagged `Callable` enum
//! - `native.rs` - `StaticNativeCallable`, the bridge itself
//! - `marshal.rs` - Host ↔ dynamic value conversions for method bodies

mod method;
mod callable;
mod native;
mod marshal;

pub use method::{HostCallError, HostFn, HostMethod, HostMethodBuilder, Visibility};
pub use callable::{
    BoundMethod, Callable, Closure, ClosureFn, Invoke, KeywordArguments, PositionalArguments,
};
pub use native::StaticNativeCallable;
pub use marshal::{arg, FromDynamic, IntoDynamic};

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

static STATS: Lazy<StatsState> = Lazy::new(StatsState::new);

struct StatsState {
    calls_made: AtomicUsize,
    access_errors: AtomicUsize,
    target_errors: AtomicUsize,
    per_method: DashMap<String, u64>,
}

impl StatsState {
    fn new() -> Self {
        Self {
            calls_made: AtomicUsize::new(0),
            access_errors: AtomicUsize::new(0),
            target_errors: AtomicUsize::new(0),
            per_method: DashMap::new(),
        }
    }
}

/// How a native call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallOutcome {
    Returned,
    AccessDenied,
    Raised,
}

pub(crate) fn record_call(method: &str, outcome: CallOutcome) {
    STATS.calls_made.fetch_add(1, Ordering::Relaxed);
    match outcome {
        CallOutcome::Returned => {}
        CallOutcome::AccessDenied => {
            STATS.access_errors.fetch_add(1, Ordering::Relaxed);
        }
        CallOutcome::Raised => {
            STATS.target_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
    *STATS.per_method.entry(method.to_string()).or_insert(0) += 1;
}

/// Initialize interop subsystem
pub fn init() {
    Lazy::force(&STATS);
    debug!("interop subsystem initialized");
}

/// Get interop statistics
pub fn stats() -> InteropStats {
    InteropStats {
        calls_made: STATS.calls_made.load(Ordering::Relaxed),
        access_errors: STATS.access_errors.load(Ordering::Relaxed),
        target_errors: STATS.target_errors.load(Ordering::Relaxed),
    }
}

/// Number of invocations recorded for `owner.name`
pub fn method_calls(qualified_name: &str) -> u64 {
    STATS
        .per_method
        .get(qualified_name)
        .map(|count| *count)
        .unwrap_or(0)
}

/// Clear all counters
pub fn reset_stats() {
    STATS.calls_made.store(0, Ordering::Relaxed);
    STATS.access_errors.store(0, Ordering::Relaxed);
    STATS.target_errors.store(0, Ordering::Relaxed);
    STATS.per_method.clear();
}

/// Interop statistics for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteropStats {
    pub calls_made: usize,
    pub access_errors: usize,
    pub target_errors: usize,
}
