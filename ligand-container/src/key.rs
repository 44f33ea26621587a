//! Type identification keys.
//!
//! [`TypeKey`] identifies a type within the container: the declared type
//! of a binding, the runtime type of an object, the type of an injection
//! site. It pairs a [`TypeId`] with the type's name for diagnostics.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use ligand_support::rendering::simple_type_name;

/// Identifies a type in the container.
///
/// Unsized types are allowed, so trait objects can be binding keys.
///
/// # Examples
/// ```
/// use ligand_container::key::TypeKey;
///
/// let key = TypeKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key.simple_name(), "String");
///
/// trait Engine {}
/// let key = TypeKey::of::<dyn Engine>();
/// assert!(key.type_name().contains("Engine"));
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeKey {
    /// Creates a key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of this type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the fully qualified type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name without module paths.
    pub fn simple_name(&self) -> String {
        simple_type_name(self.type_name)
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

// Type names are not guaranteed unique, so only the TypeId takes part.
impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.type_name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gearbox;

    #[test]
    fn key_of_type() {
        let key = TypeKey::of::<Gearbox>();
        assert!(key.type_name().contains("Gearbox"));
        assert_eq!(key.simple_name(), "Gearbox");
        assert!(key.is::<Gearbox>());
        assert!(!key.is::<String>());
    }

    #[test]
    fn key_equality() {
        assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<i32>());
    }

    #[test]
    fn key_in_hashmap() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TypeKey::of::<String>(), "string");
        map.insert(TypeKey::of::<i32>(), "i32");
        assert_eq!(map.get(&TypeKey::of::<String>()), Some(&"string"));
        assert_eq!(map.get(&TypeKey::of::<bool>()), None);
    }

    #[test]
    fn trait_object_key() {
        trait Wheel {}
        let key = TypeKey::of::<dyn Wheel>();
        assert_eq!(key.simple_name(), "dyn Wheel");
        assert_ne!(key, TypeKey::of::<Gearbox>());
    }
}
