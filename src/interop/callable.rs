//! Callable capability
//!
//! Everything the interpreter can apply to arguments is a `Callable`.
//! Dispatch is a match over the variants; each variant implements `Invoke`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::native::StaticNativeCallable;
use crate::errors::PyResult;
use crate::objects::{DynamicValue, HostType, Payload};

/// Ordered positional arguments
pub type PositionalArguments = SmallVec<[DynamicValue; 4]>;

/// Keyword arguments by name
pub type KeywordArguments = HashMap<String, DynamicValue>;

/// Contract shared by every invokable runtime value
pub trait Invoke {
    fn invoke(&self, args: &[DynamicValue], kwargs: &KeywordArguments) -> PyResult<DynamicValue>;

    /// Name used in reprs and diagnostics
    fn name(&self) -> String;
}

/// Interpreter-provided function body
pub type ClosureFn = dyn Fn(&[DynamicValue], &KeywordArguments) -> PyResult<DynamicValue> + Send + Sync;

/// A function implemented by the interpreter itself
#[derive(Clone)]
pub struct Closure {
    name: Arc<str>,
    body: Arc<ClosureFn>,
}

impl Closure {
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[DynamicValue], &KeywordArguments) -> PyResult<DynamicValue> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            body: Arc::new(body),
        }
    }
}

impl Invoke for Closure {
    fn invoke(&self, args: &[DynamicValue], kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
        (self.body)(args, kwargs)
    }

    fn name(&self) -> String {
        self.name.to_string()
    }
}

/// A callable with a receiver bound in front of its positional arguments
#[derive(Clone)]
pub struct BoundMethod {
    receiver: Arc<DynamicValue>,
    function: Arc<Callable>,
}

impl BoundMethod {
    pub fn new(receiver: DynamicValue, function: Callable) -> Self {
        Self {
            receiver: Arc::new(receiver),
            function: Arc::new(function),
        }
    }

    #[inline]
    pub fn receiver(&self) -> &DynamicValue {
        &self.receiver
    }

    #[inline]
    pub fn function(&self) -> &Callable {
        &self.function
    }
}

impl Invoke for BoundMethod {
    fn invoke(&self, args: &[DynamicValue], kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
        let mut full: PositionalArguments = SmallVec::with_capacity(args.len() + 1);
        full.push((*self.receiver).clone());
        full.extend(args.iter().cloned());
        self.function.invoke(&full, kwargs)
    }

    fn name(&self) -> String {
        self.function.name()
    }
}

/// Every invokable variant the interpreter knows about
#[derive(Clone)]
pub enum Callable {
    NativeStaticMethod(StaticNativeCallable),
    BoundMethod(BoundMethod),
    Closure(Closure),
}

impl Callable {
    /// Runtime type name of the callable
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NativeStaticMethod(_) => "builtin_function_or_method",
            Self::BoundMethod(_) => "method",
            Self::Closure(_) => "function",
        }
    }

    /// Identity comparison: same wrapped target, same receiver
    pub fn same_target(&self, other: &Callable) -> bool {
        match (self, other) {
            (Self::NativeStaticMethod(a), Self::NativeStaticMethod(b)) => a.same_method(b),
            (Self::BoundMethod(a), Self::BoundMethod(b)) => {
                a.receiver == b.receiver && a.function.same_target(&b.function)
            }
            (Self::Closure(a), Self::Closure(b)) => Arc::ptr_eq(&a.body, &b.body),
            _ => false,
        }
    }

    /// Wrap as a runtime value
    pub fn into_value(self) -> DynamicValue {
        let host_type = match &self {
            Self::NativeStaticMethod(_) => HostType::of::<super::HostMethod>(),
            Self::BoundMethod(_) => HostType::of::<BoundMethod>(),
            Self::Closure(_) => HostType::of::<Closure>(),
        };
        DynamicValue::new(Payload::Callable(self), host_type)
    }
}

impl Invoke for Callable {
    fn invoke(&self, args: &[DynamicValue], kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
        match self {
            Self::NativeStaticMethod(native) => native.invoke(args, kwargs),
            Self::BoundMethod(bound) => bound.invoke(args, kwargs),
            Self::Closure(closure) => closure.invoke(args, kwargs),
        }
    }

    fn name(&self) -> String {
        match self {
            Self::NativeStaticMethod(native) => native.name(),
            Self::BoundMethod(bound) => bound.name(),
            Self::Closure(closure) => closure.name(),
        }
    }
}

impl From<StaticNativeCallable> for Callable {
    fn from(native: StaticNativeCallable) -> Self {
        Self::NativeStaticMethod(native)
    }
}

impl From<BoundMethod> for Callable {
    fn from(bound: BoundMethod) -> Self {
        Self::BoundMethod(bound)
    }
}

impl From<Closure> for Callable {
    fn from(closure: Closure) -> Self {
        Self::Closure(closure)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.type_name(), self.name())
    }
}
