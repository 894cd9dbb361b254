//! Exception hierarchy at the runtime boundary
//!
//! `ExceptionKind` is the sum type of exception classes the runtime knows
//! about. Native-call failures always surface as `RuntimeError`, with the
//! host-level failure kept in `NativeCallFailure`.

use std::fmt;

/// Result of any operation that may raise into the dynamic runtime
pub type PyResult<T> = Result<T, PyException>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    BaseException,
    Exception,
    ArithmeticError,
    ZeroDivisionError,
    AttributeError,
    LookupError,
    IndexError,
    KeyError,
    NameError,
    RuntimeError,
    NotImplementedError,
    SystemError,
    TypeError,
    ValueError,
}

impl ExceptionKind {
    /// Direct base class, `None` for the root
    pub const fn parent(self) -> Option<ExceptionKind> {
        match self {
            Self::BaseException => None,
            Self::Exception => Some(Self::BaseException),
            Self::ArithmeticError
            | Self::AttributeError
            | Self::LookupError
            | Self::NameError
            | Self::RuntimeError
            | Self::SystemError
            | Self::TypeError
            | Self::ValueError => Some(Self::Exception),
            Self::ZeroDivisionError => Some(Self::ArithmeticError),
            Self::IndexError | Self::KeyError => Some(Self::LookupError),
            Self::NotImplementedError => Some(Self::RuntimeError),
        }
    }

    /// `issubclass(self, other)`
    pub fn is_subclass_of(self, other: ExceptionKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::BaseException => "BaseException",
            Self::Exception => "Exception",
            Self::ArithmeticError => "ArithmeticError",
            Self::ZeroDivisionError => "ZeroDivisionError",
            Self::AttributeError => "AttributeError",
            Self::LookupError => "LookupError",
            Self::IndexError => "IndexError",
            Self::KeyError => "KeyError",
            Self::NameError => "NameError",
            Self::RuntimeError => "RuntimeError",
            Self::NotImplementedError => "NotImplementedError",
            Self::SystemError => "SystemError",
            Self::TypeError => "TypeError",
            Self::ValueError => "ValueError",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a static native call failed
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCallFailure {
    /// Target not accessible from the calling context
    IllegalAccess { method: String },
    /// Target raised while executing
    TargetRaised { cause: Box<PyException> },
}

impl fmt::Display for NativeCallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalAccess { method } => {
                write!(f, "Illegal access to host static method {}", method)
            }
            Self::TargetRaised { cause } => write!(f, "{}", cause),
        }
    }
}

/// A raised exception
#[derive(Debug, Clone, PartialEq)]
pub struct PyException {
    kind: ExceptionKind,
    message: String,
    native: Option<NativeCallFailure>,
}

impl PyException {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            native: None,
        }
    }

    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::RuntimeError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::TypeError, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::ValueError, message)
    }

    /// The `RuntimeError` raised when a static native call fails.
    ///
    /// The message is the flattened failure text; the structured failure
    /// (and with it the original exception) stays reachable.
    pub fn native_call_failed(failure: NativeCallFailure) -> Self {
        Self {
            kind: ExceptionKind::RuntimeError,
            message: failure.to_string(),
            native: Some(failure),
        }
    }

    #[inline]
    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `isinstance(self, kind)`
    pub fn is_instance(&self, kind: ExceptionKind) -> bool {
        self.kind.is_subclass_of(kind)
    }

    pub fn native_failure(&self) -> Option<&NativeCallFailure> {
        self.native.as_ref()
    }

    /// Exception raised by the native target, if that is why this one exists
    pub fn cause(&self) -> Option<&PyException> {
        match &self.native {
            Some(NativeCallFailure::TargetRaised { cause }) => Some(cause),
            _ => None,
        }
    }
}

impl fmt::Display for PyException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for PyException {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(ExceptionKind::KeyError.is_subclass_of(ExceptionKind::LookupError));
        assert!(ExceptionKind::NotImplementedError.is_subclass_of(ExceptionKind::RuntimeError));
        assert!(ExceptionKind::ValueError.is_subclass_of(ExceptionKind::BaseException));
        assert!(!ExceptionKind::ValueError.is_subclass_of(ExceptionKind::RuntimeError));
        assert_eq!(ExceptionKind::BaseException.parent(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PyException::value_error("bad").to_string(), "ValueError: bad");
        assert_eq!(PyException::new(ExceptionKind::KeyError, "").to_string(), "KeyError");
    }

    #[test]
    fn test_native_call_failed_keeps_cause() {
        let cause = PyException::value_error("bad");
        let err = PyException::native_call_failed(NativeCallFailure::TargetRaised {
            cause: Box::new(cause.clone()),
        });

        assert_eq!(err.kind(), ExceptionKind::RuntimeError);
        assert_eq!(err.message(), "ValueError: bad");
        assert_eq!(err.cause(), Some(&cause));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_illegal_access_message() {
        let err = PyException::native_call_failed(NativeCallFailure::IllegalAccess {
            method: "private static demo.Secret.hidden(*args, **kwargs)".to_string(),
        });
        assert_eq!(
            err.message(),
            "Illegal access to host static method private static demo.Secret.hidden(*args, **kwargs)"
        );
        assert!(err.cause().is_none());
    }
}
