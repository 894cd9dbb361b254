//! Type marshaling - host ↔ dynamic value conversions
//!
//! Helpers for host method bodies. The bridge itself never converts
//! arguments; bodies read what they need with `FromDynamic`.

use crate::errors::{PyException, PyResult};
use crate::objects::DynamicValue;

/// Convert a host value into a dynamic value
pub trait IntoDynamic {
    fn into_dynamic(self) -> DynamicValue;
}

/// Read a host value out of a dynamic value
pub trait FromDynamic: Sized {
    /// Runtime type name expected by this conversion (for error messages)
    const TYPE_NAME: &'static str;

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self>;
}

fn mismatch<T: FromDynamic>(value: &DynamicValue) -> PyException {
    PyException::type_error(format!("expected {}, got {}", T::TYPE_NAME, value.type_name()))
}

/// Positional argument `index`, converted to `T`
pub fn arg<T: FromDynamic>(args: &[DynamicValue], index: usize) -> PyResult<T> {
    match args.get(index) {
        Some(value) => T::from_dynamic(value),
        None => Err(PyException::type_error(format!(
            "missing required positional argument {} (got {})",
            index,
            args.len()
        ))),
    }
}

impl IntoDynamic for DynamicValue {
    #[inline]
    fn into_dynamic(self) -> DynamicValue {
        self
    }
}

impl IntoDynamic for () {
    #[inline]
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::none()
    }
}

impl IntoDynamic for bool {
    #[inline]
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::from_bool(self)
    }
}

impl IntoDynamic for i64 {
    #[inline]
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::from_int(self)
    }
}

impl IntoDynamic for f64 {
    #[inline]
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::from_float(self)
    }
}

impl IntoDynamic for String {
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::from_str(&self)
    }
}

impl IntoDynamic for &str {
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::from_str(self)
    }
}

impl<T: IntoDynamic> IntoDynamic for Vec<T> {
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::from_list(self.into_iter().map(IntoDynamic::into_dynamic).collect())
    }
}

impl<T: IntoDynamic> IntoDynamic for Option<T> {
    fn into_dynamic(self) -> DynamicValue {
        match self {
            Some(v) => v.into_dynamic(),
            None => DynamicValue::none(),
        }
    }
}

impl FromDynamic for DynamicValue {
    const TYPE_NAME: &'static str = "object";

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self> {
        Ok(value.clone())
    }
}

impl FromDynamic for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromDynamic for i64 {
    const TYPE_NAME: &'static str = "int";

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self> {
        value.as_int().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromDynamic for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self> {
        value.as_float().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromDynamic for String {
    const TYPE_NAME: &'static str = "str";

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl<T: FromDynamic> FromDynamic for Vec<T> {
    const TYPE_NAME: &'static str = "list";

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self> {
        value
            .as_list()
            .ok_or_else(|| mismatch::<Self>(value))?
            .iter()
            .map(T::from_dynamic)
            .collect()
    }
}

impl<T: FromDynamic> FromDynamic for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_dynamic(value: &DynamicValue) -> PyResult<Self> {
        if value.is_none() {
            Ok(None)
        } else {
            T::from_dynamic(value).map(Some)
        }
    }
}
