//! Providers — how a bound type is produced.
//!
//! - [`InstanceProvider`] hands out one pre-built object
//! - [`SingletonProvider`] constructs once and caches, optionally eagerly
//! - [`FactoryProvider`] calls a user function on every request

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::context::Context;
use crate::descriptor::{Injectable, Target, TypeDescriptor};
use crate::error::Result;
use crate::object::Object;

type FactoryFn = Arc<dyn Fn(&Context) -> Result<Object> + Send + Sync>;

/// Resolution strategy of a binding.
///
/// Cloning a provider shares its state: a cloned singleton provider
/// keeps returning the same instance.
#[derive(Clone)]
pub enum Provider {
    Instance(InstanceProvider),
    Singleton(SingletonProvider),
    Factory(FactoryProvider),
}

impl Provider {
    /// Produces an instance, running injection where the variant does.
    pub fn provide(&self, ctx: &Context) -> Result<Object> {
        match self {
            Provider::Instance(provider) => Ok(provider.provide()),
            Provider::Singleton(provider) => provider.provide(ctx),
            Provider::Factory(provider) => provider.provide(ctx),
        }
    }

    /// Produces an instance without the field and method injection phase.
    pub fn provide_without_injecting(&self, ctx: &Context) -> Result<Object> {
        match self {
            Provider::Instance(provider) => Ok(provider.provide()),
            Provider::Singleton(provider) => provider.provide_without_injecting(ctx),
            Provider::Factory(provider) => provider.provide(ctx),
        }
    }

    /// The descriptor of the instances this provider produces, when known
    /// without producing one.
    pub fn implementation(&self) -> Option<Arc<TypeDescriptor>> {
        match self {
            Provider::Instance(provider) => Some(Arc::clone(provider.object.descriptor())),
            Provider::Singleton(provider) => provider.target.descriptor(),
            Provider::Factory(_) => None,
        }
    }

    pub fn as_singleton(&self) -> Option<&SingletonProvider> {
        match self {
            Provider::Singleton(provider) => Some(provider),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Provider::Instance(_) => "instance",
            Provider::Singleton(_) => "singleton",
            Provider::Factory(_) => "factory",
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Instance(provider) => provider.fmt(f),
            Provider::Singleton(provider) => provider.fmt(f),
            Provider::Factory(provider) => provider.fmt(f),
        }
    }
}

// ═══════════════════════════════════════════
// Instance
// ═══════════════════════════════════════════

#[derive(Clone)]
pub struct InstanceProvider {
    object: Object,
}

impl InstanceProvider {
    pub fn new(object: Object) -> Self {
        Self { object }
    }

    pub fn provide(&self) -> Object {
        self.object.clone()
    }
}

impl fmt::Debug for InstanceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceProvider")
            .field("object", &self.object)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Singleton
// ═══════════════════════════════════════════

#[derive(Clone)]
pub struct SingletonProvider {
    target: Target,
    eager: bool,
    deferred: bool,
    slot: Arc<OnceCell<Object>>,
}

impl SingletonProvider {
    /// A lazy singleton of `U`, constructed on first request.
    pub fn new<U: Injectable>() -> Self {
        Self {
            target: Target::of::<U>(),
            eager: false,
            deferred: false,
            slot: Arc::new(OnceCell::new()),
        }
    }

    /// Constructs at injector build time instead of on first use.
    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }

    /// With [`eager`](Self::eager): inject fields and methods in the
    /// later bootstrap passes rather than right after construction.
    pub fn deferred(mut self, deferred: bool) -> Self {
        self.deferred = deferred;
        self
    }

    pub fn is_eager(&self) -> bool {
        self.eager
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The cached instance, if one was constructed already.
    pub fn instance(&self) -> Option<Object> {
        self.slot.get().cloned()
    }

    pub fn provide(&self, ctx: &Context) -> Result<Object> {
        if let Some(object) = self.slot.get() {
            return Ok(object.clone());
        }
        let object = ctx.injector().construct_target(&self.target, ctx, true)?;
        Ok(self.store(object))
    }

    pub fn provide_without_injecting(&self, ctx: &Context) -> Result<Object> {
        if let Some(object) = self.slot.get() {
            return Ok(object.clone());
        }
        let object = ctx.injector().construct_target(&self.target, ctx, false)?;
        Ok(self.store(object))
    }

    // The constructor runs without holding the cell, so a racing thread
    // may build a second instance; only the first one stored is kept.
    fn store(&self, object: Object) -> Object {
        let stored = self.slot.get_or_init(|| {
            debug!(key = %self.target.key(), "Singleton instantiated");
            object
        });
        stored.clone()
    }
}

impl fmt::Debug for SingletonProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonProvider")
            .field("target", &self.target.key())
            .field("eager", &self.eager)
            .field("deferred", &self.deferred)
            .field("instantiated", &self.slot.get().is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Factory
// ═══════════════════════════════════════════

#[derive(Clone)]
pub struct FactoryProvider {
    factory: FactoryFn,
}

impl FactoryProvider {
    pub fn new(factory: impl Fn(&Context) -> Result<Object> + Send + Sync + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }

    pub fn provide(&self, ctx: &Context) -> Result<Object> {
        (self.factory)(ctx)
    }
}

impl fmt::Debug for FactoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryProvider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Dog;
    use crate::injector::Injector;
    use crate::key::TypeKey;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn ctx(injector: &Injector) -> Context {
        Context::direct(injector, TypeKey::of::<Dog>())
    }

    #[test]
    fn instance_provider_returns_same_object() {
        let injector = Injector::new(vec![]);
        let object = Object::new(Arc::new(Dog::new()));
        let provider = Provider::Instance(InstanceProvider::new(object.clone()));

        assert!(provider.provide(&ctx(&injector)).unwrap().same_instance(&object));
        assert!(
            provider
                .provide_without_injecting(&ctx(&injector))
                .unwrap()
                .same_instance(&object)
        );
        assert!(provider.implementation().unwrap().key() == TypeKey::of::<Dog>());
    }

    #[test]
    fn singleton_provider_caches() {
        let injector = Injector::new(vec![]);
        let provider = SingletonProvider::new::<Dog>();
        assert!(provider.instance().is_none());

        let a = provider.provide(&ctx(&injector)).unwrap();
        let b = provider.provide(&ctx(&injector)).unwrap();
        assert!(a.same_instance(&b));

        // Clones share the slot.
        let c = provider.clone().provide_without_injecting(&ctx(&injector)).unwrap();
        assert!(a.same_instance(&c));
    }

    #[test]
    fn singleton_without_injecting_leaves_fields_empty() {
        let injector = Injector::new(vec![]);
        let provider = SingletonProvider::new::<Dog>();
        let dog = provider
            .provide_without_injecting(&ctx(&injector))
            .unwrap()
            .cast::<Dog>()
            .unwrap();
        assert!(!dog.owner.is_set());
    }

    #[test]
    fn factory_provider_runs_every_time() {
        let injector = Injector::new(vec![]);
        let calls = Arc::new(AtomicU32::new(0));
        let provider = Provider::Factory(FactoryProvider::new({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Object::new(Arc::new(Dog::new())))
            }
        }));

        let a = provider.provide(&ctx(&injector)).unwrap();
        let b = provider.provide(&ctx(&injector)).unwrap();
        assert!(!a.same_instance(&b));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(provider.implementation().is_none());
    }
}
