//! Host type descriptors
//!
//! Every dynamic value remembers which host type its payload came from. This
//! is the Rust side of the boundary: a `TypeId` plus a readable name.

use std::any::{type_name, TypeId};
use std::fmt;

/// Descriptor of the host type a payload originated from
#[derive(Clone, Copy, Eq)]
pub struct HostType {
    id: TypeId,
    name: &'static str,
}

impl HostType {
    /// Descriptor for host type `T`
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified host type name
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the host type name, generic arguments dropped
    /// (`alloc::vec::Vec<i64>` -> `Vec`)
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(idx) => &base[idx + 2..],
            None => base,
        }
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for HostType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for HostType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostType({})", self.name)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_type_identity() {
        assert_eq!(HostType::of::<i64>(), HostType::of::<i64>());
        assert_ne!(HostType::of::<i64>(), HostType::of::<f64>());
        assert!(HostType::of::<String>().is::<String>());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(HostType::of::<String>().short_name(), "String");
        assert_eq!(HostType::of::<i64>().short_name(), "i64");
    }

    #[test]
    fn test_short_name_generic() {
        assert_eq!(HostType::of::<Vec<String>>().short_name(), "Vec");
        assert_eq!(
            HostType::of::<std::collections::BTreeMap<String, i64>>().short_name(),
            "BTreeMap"
        );
    }
}
