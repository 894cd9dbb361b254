//! Static native callables
//!
//! Exposes a resolved static host method as a callable runtime value.
//! Arguments go through untouched; host failures come back as `RuntimeError`.

use std::sync::Arc;

use tracing::debug_span;

use super::callable::{Callable, Invoke, KeywordArguments};
use super::method::{HostCallError, HostMethod};
use super::{record_call, CallOutcome};
use crate::config::InteropConfig;
use crate::errors::{NativeCallFailure, PyException, PyResult};
use crate::logging::{
    log_access_denied, log_native_call, log_native_error, log_native_return, perf,
};
use crate::objects::DynamicValue;

/// Callable wrapper around a static (receiver-less) host method
#[derive(Debug, Clone)]
pub struct StaticNativeCallable {
    method: Arc<HostMethod>,
    config: InteropConfig,
}

impl StaticNativeCallable {
    /// Wrap `method` with default interop settings
    pub fn new(method: HostMethod) -> PyResult<Self> {
        Self::with_config(method, InteropConfig::default())
    }

    /// Wrap `method`; fails with `TypeError` if it takes a receiver
    pub fn with_config(method: HostMethod, config: InteropConfig) -> PyResult<Self> {
        if !method.is_static() {
            return Err(PyException::type_error(format!(
                "cannot wrap {} as a static native callable: method takes a receiver",
                method
            )));
        }

        Ok(Self {
            method: Arc::new(method),
            config,
        })
    }

    #[inline]
    pub fn method(&self) -> &HostMethod {
        &self.method
    }

    #[inline]
    pub fn config(&self) -> &InteropConfig {
        &self.config
    }

    /// Both wrappers hold the same method handle
    pub fn same_method(&self, other: &StaticNativeCallable) -> bool {
        Arc::ptr_eq(&self.method, &other.method)
    }

    /// The runtime value whose payload is this method
    pub fn into_value(self) -> DynamicValue {
        Callable::NativeStaticMethod(self).into_value()
    }

    fn record(&self, qualified: &str, outcome: CallOutcome) {
        if self.config.track_stats {
            record_call(qualified, outcome);
        }
    }
}

impl Invoke for StaticNativeCallable {
    fn invoke(&self, args: &[DynamicValue], kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
        let qualified = self.method.qualified_name();
        let _span = debug_span!("native_call", method = %qualified).entered();
        let _timer = perf::track(&qualified);
        log_native_call(&qualified, args.len(), kwargs.len());

        let outcome = if self.config.catch_panics {
            self.method.call_catching(args, kwargs)
        } else {
            self.method.call(args, kwargs)
        };

        match outcome {
            Ok(value) => {
                self.record(&qualified, CallOutcome::Returned);
                log_native_return(&qualified);
                Ok(value)
            }
            Err(HostCallError::Access { method }) => {
                self.record(&qualified, CallOutcome::AccessDenied);
                log_access_denied(&method);
                Err(PyException::native_call_failed(NativeCallFailure::IllegalAccess { method }))
            }
            Err(HostCallError::Target { cause }) => {
                self.record(&qualified, CallOutcome::Raised);
                log_native_error(&qualified, &cause.to_string());
                Err(PyException::native_call_failed(NativeCallFailure::TargetRaised {
                    cause: Box::new(cause),
                }))
            }
        }
    }

    fn name(&self) -> String {
        self.method.qualified_name()
    }
}
