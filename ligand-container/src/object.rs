//! Type-erased instances.
//!
//! An [`Object`] is what flows through the resolution engine: a shared
//! value together with the descriptor of its runtime type, so the engine
//! can walk its members and view it as any of its supertypes.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::descriptor::{Injectable, TypeDescriptor, describe, describe_opaque};
use crate::error::{LigandError, Result};
use crate::key::TypeKey;

/// A shared, type-erased instance with its runtime type.
///
/// Cloning is cheap and yields a handle to the same instance.
#[derive(Clone)]
pub struct Object {
    value: Arc<dyn Any + Send + Sync>,
    descriptor: Arc<TypeDescriptor>,
    addr: usize,
}

impl Object {
    /// Wraps an instance of a described type.
    pub fn new<T: Injectable>(value: Arc<T>) -> Self {
        let addr = Arc::as_ptr(&value) as *const () as usize;
        Self {
            value,
            descriptor: describe::<T>(),
            addr,
        }
    }

    /// Wraps a value whose type has no descriptor, such as a trait object
    /// or a plain configuration struct.
    pub fn opaque<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        let addr = Arc::as_ptr(&value) as *const () as usize;
        Self {
            value: Arc::new(value),
            descriptor: describe_opaque::<T>(),
            addr,
        }
    }

    /// The runtime type of the instance.
    #[inline]
    pub fn type_key(&self) -> TypeKey {
        self.descriptor.key()
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Views the instance as `U`: its own type, an implemented interface,
    /// or any ancestor.
    pub fn cast<U: ?Sized + 'static>(&self) -> Option<Arc<U>> {
        self.descriptor
            .cast(self, TypeId::of::<U>())?
            .downcast::<Arc<U>>()
            .ok()
            .map(|boxed| *boxed)
    }

    /// Like [`cast`](Self::cast), failing with [`LigandError::TypeMismatch`].
    pub fn expect_cast<U: ?Sized + 'static>(&self) -> Result<Arc<U>> {
        self.cast::<U>().ok_or(LigandError::TypeMismatch {
            expected: TypeKey::of::<U>(),
            actual: self.type_key(),
        })
    }

    pub fn is_instance_of(&self, key: &TypeKey) -> bool {
        self.descriptor.is_assignable_to(key)
    }

    /// Whether both handles point at the same instance.
    pub fn same_instance(&self, other: &Object) -> bool {
        self.addr == other.addr && self.type_key() == other.type_key()
    }

    pub(crate) fn raw(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.value
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.type_key())
            .field("addr", &format_args!("{:#x}", self.addr))
            .finish()
    }
}

/// Arguments handed to a constructor, one slot per declared parameter.
///
/// A `None` slot is an explicit null argument.
#[derive(Debug)]
pub struct Arguments {
    owner: TypeKey,
    values: Vec<Option<Object>>,
}

impl Arguments {
    pub(crate) fn new(owner: TypeKey, values: Vec<Option<Object>>) -> Self {
        Self { owner, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The argument at `index`, failing on a null slot.
    pub fn get<P: ?Sized + 'static>(&self, index: usize) -> Result<Arc<P>> {
        self.get_nullable::<P>(index)?.ok_or(LigandError::MissingArgument {
            key: self.owner,
            index,
        })
    }

    /// The argument at `index`, `None` for a null slot.
    pub fn get_nullable<P: ?Sized + 'static>(&self, index: usize) -> Result<Option<Arc<P>>> {
        match self.values.get(index) {
            None => Err(LigandError::MissingArgument {
                key: self.owner,
                index,
            }),
            Some(None) => Ok(None),
            Some(Some(object)) => object.expect_cast::<P>().map(Some),
        }
    }

    pub fn object(&self, index: usize) -> Option<&Object> {
        self.values.get(index).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Animal, Dog, Named, Puppy};

    #[test]
    fn cast_to_own_type_and_ancestors() {
        let puppy = Object::new(Arc::new(Puppy::new("Rex")));
        assert!(puppy.cast::<Puppy>().is_some());
        assert_eq!(puppy.cast::<Dog>().unwrap().base.sound, "yip");
        assert_eq!(puppy.cast::<Animal>().unwrap().sound, "yip");
        assert!(puppy.cast::<String>().is_none());
    }

    #[test]
    fn cast_to_interface_through_ancestor() {
        let dog = Object::new(Arc::new(Dog::new()));
        let named: Arc<dyn Named> = dog.cast::<dyn Named>().unwrap();
        assert_eq!(named.name(), "woof");
        assert!(dog.is_instance_of(&TypeKey::of::<dyn Named>()));
    }

    #[test]
    fn opaque_values_cast_to_their_own_type() {
        let config = Object::opaque(Arc::new(String::from("postgres://localhost")));
        assert_eq!(config.cast::<String>().unwrap().as_str(), "postgres://localhost");
        assert!(config.cast::<i32>().is_none());

        let named: Arc<dyn Named> = Arc::new(Animal::new("woof"));
        let object = Object::opaque(named.clone());
        assert_eq!(object.type_key(), TypeKey::of::<dyn Named>());
        assert!(Arc::ptr_eq(&object.cast::<dyn Named>().unwrap(), &named));
    }

    #[test]
    fn same_instance_tracks_identity() {
        let shared = Arc::new(Dog::new());
        let a = Object::new(shared.clone());
        let b = Object::new(shared);
        let c = Object::new(Arc::new(Dog::new()));
        assert!(a.same_instance(&b));
        assert!(!a.same_instance(&c));
    }

    #[test]
    fn arguments_report_nulls_and_mismatches() {
        let args = Arguments::new(
            TypeKey::of::<Dog>(),
            vec![Some(Object::new(Arc::new(Dog::new()))), None],
        );
        assert!(args.get::<Animal>(0).is_ok());
        assert!(matches!(args.get::<Dog>(1), Err(LigandError::MissingArgument { index: 1, .. })));
        assert!(args.get_nullable::<Dog>(1).unwrap().is_none());
        assert!(matches!(args.get::<Puppy>(0), Err(LigandError::TypeMismatch { .. })));
        assert!(matches!(args.get::<Dog>(5), Err(LigandError::MissingArgument { index: 5, .. })));
    }
}
