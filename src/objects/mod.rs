//! Object system - unified representation for all runtime values
//!
//! Design: one tagged value type flows through the whole runtime:
//! - Scalars stored inline (None, bool, int, float)
//! - Shared payloads behind `Arc` so clones are cheap
//! - Callables stored as a tagged variant, dispatched by match
//! - Every value remembers the host type its payload originated from

mod host_type;

pub use host_type::HostType;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{ExceptionKind, PyException, PyResult};
use crate::interop::{Callable, Invoke, KeywordArguments};

/// Payload of a dynamic value
#[derive(Clone)]
pub enum Payload {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Arc<Vec<DynamicValue>>),
    Dict(Arc<BTreeMap<String, DynamicValue>>),
    Callable(Callable),
    /// Host object with no dynamic-side representation
    Opaque(Arc<dyn Any + Send + Sync>),
}

/// Tagged runtime value: a payload plus the host type it came from
#[derive(Clone)]
pub struct DynamicValue {
    payload: Payload,
    host_type: HostType,
}

impl DynamicValue {
    /// Build a value from an explicit payload and host type
    #[inline]
    pub fn new(payload: Payload, host_type: HostType) -> Self {
        Self { payload, host_type }
    }

    #[inline]
    pub fn none() -> Self {
        Self::new(Payload::None, HostType::of::<()>())
    }

    #[inline]
    pub fn from_bool(val: bool) -> Self {
        Self::new(Payload::Bool(val), HostType::of::<bool>())
    }

    #[inline]
    pub fn from_int(val: i64) -> Self {
        Self::new(Payload::Int(val), HostType::of::<i64>())
    }

    #[inline]
    pub fn from_float(val: f64) -> Self {
        Self::new(Payload::Float(val), HostType::of::<f64>())
    }

    pub fn from_str(val: &str) -> Self {
        Self::new(Payload::Str(Arc::from(val)), HostType::of::<String>())
    }

    pub fn from_list(items: Vec<DynamicValue>) -> Self {
        Self::new(Payload::List(Arc::new(items)), HostType::of::<Vec<DynamicValue>>())
    }

    pub fn from_dict(entries: BTreeMap<String, DynamicValue>) -> Self {
        Self::new(
            Payload::Dict(Arc::new(entries)),
            HostType::of::<BTreeMap<String, DynamicValue>>(),
        )
    }

    /// Snapshot of a keyword mapping as a dict value
    pub fn from_kwargs(kwargs: &KeywordArguments) -> Self {
        Self::from_dict(kwargs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Wrap an arbitrary host object
    pub fn opaque<T: Any + Send + Sync>(val: T) -> Self {
        Self::new(Payload::Opaque(Arc::new(val)), HostType::of::<T>())
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Host type the payload originated from
    #[inline]
    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self.payload, Payload::None)
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self.payload, Payload::Callable(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(i) => Some(i),
            Payload::Bool(b) => Some(b as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.payload {
            Payload::Float(f) => Some(f),
            Payload::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DynamicValue]> {
        match &self.payload {
            Payload::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match &self.payload {
            Payload::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match &self.payload {
            Payload::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.payload {
            Payload::Opaque(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Python truthiness
    pub fn is_truthy(&self) -> bool {
        match &self.payload {
            Payload::None => false,
            Payload::Bool(b) => *b,
            Payload::Int(i) => *i != 0,
            Payload::Float(f) => *f != 0.0,
            Payload::Str(s) => !s.is_empty(),
            Payload::List(items) => !items.is_empty(),
            Payload::Dict(entries) => !entries.is_empty(),
            Payload::Callable(_) | Payload::Opaque(_) => true,
        }
    }

    /// Name of the value's type as the dynamic runtime sees it
    pub fn type_name(&self) -> &'static str {
        match &self.payload {
            Payload::None => "NoneType",
            Payload::Bool(_) => "bool",
            Payload::Int(_) => "int",
            Payload::Float(_) => "float",
            Payload::Str(_) => "str",
            Payload::List(_) => "list",
            Payload::Dict(_) => "dict",
            Payload::Callable(c) => c.type_name(),
            Payload::Opaque(_) => self.host_type.short_name(),
        }
    }

    /// Apply this value to arguments
    pub fn call(&self, args: &[DynamicValue], kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
        match &self.payload {
            Payload::Callable(callable) => callable.invoke(args, kwargs),
            _ => Err(PyException::new(
                ExceptionKind::TypeError,
                format!("'{}' object is not callable", self.type_name()),
            )),
        }
    }

    /// `repr()` form
    pub fn repr(&self) -> String {
        match &self.payload {
            Payload::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            _ => self.to_string(),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        format!("{:?}", f)
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::None => f.write_str("None"),
            Payload::Bool(true) => f.write_str("True"),
            Payload::Bool(false) => f.write_str("False"),
            Payload::Int(i) => write!(f, "{}", i),
            Payload::Float(x) => f.write_str(&format_float(*x)),
            Payload::Str(s) => f.write_str(s),
            Payload::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.repr())?;
                }
                f.write_str("]")
            }
            Payload::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{}': {}", key, value.repr())?;
                }
                f.write_str("}")
            }
            Payload::Callable(c) => write!(f, "<{} {}>", c.type_name(), c.name()),
            Payload::Opaque(_) => write!(f, "<{} object>", self.host_type.short_name()),
        }
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamicValue({} as {})", self.repr(), self.host_type.name())
    }
}

impl PartialEq for DynamicValue {
    fn eq(&self, other: &Self) -> bool {
        match (&self.payload, &other.payload) {
            (Payload::None, Payload::None) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::Float(a), Payload::Float(b)) => a == b,
            (Payload::Int(a), Payload::Float(b)) | (Payload::Float(b), Payload::Int(a)) => {
                (*a as f64) == *b
            }
            (Payload::Str(a), Payload::Str(b)) => a == b,
            (Payload::List(a), Payload::List(b)) => a == b,
            (Payload::Dict(a), Payload::Dict(b)) => a == b,
            (Payload::Callable(a), Payload::Callable(b)) => a.same_target(b),
            (Payload::Opaque(a), Payload::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for DynamicValue {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_host_types() {
        assert!(DynamicValue::from_int(5).host_type().is::<i64>());
        assert!(DynamicValue::from_float(1.5).host_type().is::<f64>());
        assert!(DynamicValue::from_str("x").host_type().is::<String>());
        assert!(DynamicValue::none().host_type().is::<()>());
    }

    #[test]
    fn test_display_matches_python() {
        assert_eq!(DynamicValue::none().to_string(), "None");
        assert_eq!(DynamicValue::from_bool(true).to_string(), "True");
        assert_eq!(DynamicValue::from_float(2.0).to_string(), "2.0");
        assert_eq!(DynamicValue::from_float(f64::NAN).to_string(), "nan");

        let list = DynamicValue::from_list(vec![
            DynamicValue::from_int(1),
            DynamicValue::from_str("a"),
        ]);
        assert_eq!(list.to_string(), "[1, 'a']");
    }

    #[test]
    fn test_numeric_equality_across_kinds() {
        assert_eq!(DynamicValue::from_int(2), DynamicValue::from_float(2.0));
        assert_ne!(DynamicValue::from_int(2), DynamicValue::from_str("2"));
    }

    #[test]
    fn test_opaque_roundtrip() {
        #[derive(Debug, PartialEq)]
        struct Point(i32, i32);

        let value = DynamicValue::opaque(Point(1, 2));
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point(1, 2)));
        assert!(value.host_type().is::<Point>());
        assert_eq!(value.type_name(), "Point");
        assert_eq!(value, value.clone());
    }

    #[test]
    fn test_calling_non_callable() {
        let err = DynamicValue::from_int(3)
            .call(&[], &KeywordArguments::new())
            .unwrap_err();
        assert_eq!(err.kind(), ExceptionKind::TypeError);
        assert_eq!(err.message(), "'int' object is not callable");
    }

    #[test]
    fn test_truthiness() {
        assert!(!DynamicValue::none().is_truthy());
        assert!(!DynamicValue::from_str("").is_truthy());
        assert!(DynamicValue::from_list(vec![DynamicValue::none()]).is_truthy());
    }
}
