//! Bindings — a declared type paired with its provider.
//!
//! Two bindings are equal when their declared types are equal; providers
//! are not compared. Registering a binding for a type that is already
//! bound therefore replaces the earlier one.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::Context;
use crate::descriptor::{Injectable, Target};
use crate::error::{BoxError, LigandError};
use crate::module::Binder;
use crate::object::Object;
use crate::provider::{FactoryProvider, InstanceProvider, Provider, SingletonProvider};

#[derive(Clone)]
pub struct Binding {
    declared: Target,
    provider: Provider,
}

impl Binding {
    pub fn new(declared: Target, provider: Provider) -> Self {
        Self { declared, provider }
    }

    /// The declared type, used as the lookup key.
    pub fn key(&self) -> crate::key::TypeKey {
        self.declared.key()
    }

    pub fn target(&self) -> &Target {
        &self.declared
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Whether this binding can serve a request for `target`.
    ///
    /// Either side may be the supertype: a binding of an interface serves
    /// requests for its implementors, and a binding of a concrete type
    /// serves requests for its supertypes.
    pub fn is_compatible_with(&self, target: &Target) -> bool {
        if self.key() == target.key() {
            return true;
        }
        let requested_is_subtype = target
            .descriptor()
            .is_some_and(|descriptor| descriptor.is_assignable_to(&self.key()));
        requested_is_subtype || self.is_assignable_to(&target.key())
    }

    /// Whether the declared type is assignable to `key`.
    pub fn is_assignable_to(&self, key: &crate::key::TypeKey) -> bool {
        self.key() == *key
            || self
                .declared
                .descriptor()
                .is_some_and(|descriptor| descriptor.is_assignable_to(key))
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Binding {}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key())
            .field("provider", &self.provider)
            .finish()
    }
}

/// Declares the binding of one type; every terminal method commits it to
/// the module being configured.
///
/// Created by [`Binder::bind`] or [`Binder::bind_opaque`].
pub struct BindingBuilder<'a, T: ?Sized> {
    binder: &'a mut Binder,
    declared: Target,
    wrap: fn(Arc<T>) -> Object,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<'a, T: ?Sized + Send + Sync + 'static> BindingBuilder<'a, T> {
    pub(crate) fn new(binder: &'a mut Binder, declared: Target, wrap: fn(Arc<T>) -> Object) -> Self {
        Self {
            binder,
            declared,
            wrap,
            _marker: PhantomData,
        }
    }

    /// Binds to one pre-built instance of a described type.
    pub fn to_instance<U: Injectable>(self, instance: Arc<U>) {
        self.to_provider(Provider::Instance(InstanceProvider::new(Object::new(instance))));
    }

    /// Binds to one pre-built value of the declared type.
    pub fn to_value(self, value: impl Into<Arc<T>>) {
        let object = (self.wrap)(value.into());
        self.to_provider(Provider::Instance(InstanceProvider::new(object)));
    }

    /// Binds to a lazily constructed singleton of `U`.
    pub fn to_singleton<U: Injectable>(self) {
        self.to_provider(Provider::Singleton(SingletonProvider::new::<U>()));
    }

    /// Binds to a singleton of `U` built at injector bootstrap; field and
    /// method injection run in the later bootstrap passes.
    pub fn to_eager_singleton<U: Injectable>(self) {
        self.to_provider(Provider::Singleton(SingletonProvider::new::<U>().eager().deferred(true)));
    }

    /// Binds to a singleton of `U` built and fully injected in the first
    /// bootstrap pass.
    pub fn to_eager_singleton_injected<U: Injectable>(self) {
        self.to_provider(Provider::Singleton(SingletonProvider::new::<U>().eager().deferred(false)));
    }

    /// Binds to a function called on every request.
    pub fn to_factory<F>(self, factory: F)
    where
        F: Fn(&Context) -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let wrap = self.wrap;
        let key = self.declared.key();
        self.to_provider(Provider::Factory(FactoryProvider::new(move |ctx: &Context| {
            factory(ctx)
                .map(wrap)
                .map_err(|source| LigandError::construction(key, source))
        })));
    }

    /// Binds to a function producing type-erased objects.
    pub fn to_object_factory<F>(self, factory: F)
    where
        F: Fn(&Context) -> crate::error::Result<Object> + Send + Sync + 'static,
    {
        self.to_provider(Provider::Factory(FactoryProvider::new(factory)));
    }

    pub fn to_provider(self, provider: Provider) {
        self.binder.insert(Binding::new(self.declared, provider));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Animal, Dog, Named, Owner, Puppy};
    use crate::key::TypeKey;

    fn singleton<T: Injectable>() -> Binding {
        Binding::new(Target::of::<T>(), Provider::Singleton(SingletonProvider::new::<T>()))
    }

    #[test]
    fn equality_ignores_provider() {
        let a = singleton::<Dog>();
        let b = Binding::new(
            Target::of::<Dog>(),
            Provider::Instance(InstanceProvider::new(Object::new(Arc::new(Dog::new())))),
        );
        assert_eq!(a, b);
        assert_ne!(a, singleton::<Owner>());
    }

    #[test]
    fn compatibility_in_both_directions() {
        let dog = singleton::<Dog>();
        // bound subtype serves a supertype request
        assert!(dog.is_compatible_with(&Target::of::<Animal>()));
        assert!(dog.is_compatible_with(&Target::opaque::<dyn Named>()));
        // bound supertype serves a subtype request
        assert!(dog.is_compatible_with(&Target::of::<Puppy>()));
        assert!(!dog.is_compatible_with(&Target::of::<Owner>()));

        let named = Binding::new(
            Target::opaque::<dyn Named>(),
            Provider::Singleton(SingletonProvider::new::<Dog>()),
        );
        assert!(named.is_compatible_with(&Target::of::<Animal>()));
        assert!(!named.is_compatible_with(&Target::of::<Owner>()));
    }

    #[test]
    fn assignability_of_declared_type() {
        let puppy = singleton::<Puppy>();
        assert!(puppy.is_assignable_to(&TypeKey::of::<Dog>()));
        assert!(!singleton::<Animal>().is_assignable_to(&TypeKey::of::<Dog>()));
    }
}
