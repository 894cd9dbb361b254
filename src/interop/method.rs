//! Resolved host method references
//!
//! A `HostMethod` is what method resolution hands to the bridge: the owner,
//! the name, access information and the host body. `call` is the host-level
//! call convention; its failure type never crosses into the dynamic runtime.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::callable::KeywordArguments;
use crate::errors::{ExceptionKind, PyException, PyResult};
use crate::objects::DynamicValue;

/// Host method body
pub type HostFn = dyn Fn(&[DynamicValue], &KeywordArguments) -> PyResult<DynamicValue> + Send + Sync;

/// Declared visibility of a host member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Package => "package",
            Self::Private => "private",
        })
    }
}

/// Host-level call failures
#[derive(Debug, Clone)]
pub enum HostCallError {
    /// Member not accessible from the calling context
    Access { method: String },
    /// Member raised during execution
    Target { cause: PyException },
}

impl fmt::Display for HostCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access { method } => write!(f, "cannot access {}", method),
            Self::Target { cause } => write!(f, "invocation target raised {}", cause),
        }
    }
}

impl std::error::Error for HostCallError {}

/// Resolved reference to a host method
#[derive(Clone)]
pub struct HostMethod {
    owner: String,
    name: String,
    visibility: Visibility,
    accessible: bool,
    is_static: bool,
    body: Arc<HostFn>,
}

impl HostMethod {
    /// Public static method
    pub fn new<F>(owner: impl Into<String>, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[DynamicValue], &KeywordArguments) -> PyResult<DynamicValue> + Send + Sync + 'static,
    {
        Self::builder(owner, name).body(body)
    }

    pub fn builder(owner: impl Into<String>, name: impl Into<String>) -> HostMethodBuilder {
        HostMethodBuilder {
            owner: owner.into(),
            name: name.into(),
            visibility: Visibility::Public,
            accessible: false,
            is_static: true,
        }
    }

    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// `owner.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }

    /// Public members, or members whose access checks were overridden
    #[inline]
    pub fn is_accessible(&self) -> bool {
        self.visibility == Visibility::Public || self.accessible
    }

    /// Call the method with no receiver
    pub fn call(
        &self,
        args: &[DynamicValue],
        kwargs: &KeywordArguments,
    ) -> Result<DynamicValue, HostCallError> {
        if !self.is_accessible() {
            return Err(HostCallError::Access {
                method: self.to_string(),
            });
        }

        (self.body)(args, kwargs).map_err(|cause| HostCallError::Target { cause })
    }

    /// Like `call`, but a panic in the body is reported as a raised `SystemError`
    pub fn call_catching(
        &self,
        args: &[DynamicValue],
        kwargs: &KeywordArguments,
    ) -> Result<DynamicValue, HostCallError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.call(args, kwargs))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{} panicked", self.qualified_name())
                };
                Err(HostCallError::Target {
                    cause: PyException::new(ExceptionKind::SystemError, message),
                })
            }
        }
    }
}

impl fmt::Display for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.visibility)?;
        if self.is_static {
            f.write_str("static ")?;
        }
        write!(f, "{}.{}(*args, **kwargs)", self.owner, self.name)
    }
}

impl fmt::Debug for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMethod")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("accessible", &self.accessible)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

/// Builder for host methods with non-default access information
#[derive(Debug, Clone)]
pub struct HostMethodBuilder {
    owner: String,
    name: String,
    visibility: Visibility,
    accessible: bool,
    is_static: bool,
}

impl HostMethodBuilder {
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Override access checks for non-public members
    pub fn accessible(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }

    /// Mark the method as taking an implicit receiver
    pub fn instance(mut self) -> Self {
        self.is_static = false;
        self
    }

    pub fn body<F>(self, body: F) -> HostMethod
    where
        F: Fn(&[DynamicValue], &KeywordArguments) -> PyResult<DynamicValue> + Send + Sync + 'static,
    {
        HostMethod {
            owner: self.owner,
            name: self.name,
            visibility: self.visibility,
            accessible: self.accessible,
            is_static: self.is_static,
            body: Arc::new(body),
        }
    }
}
