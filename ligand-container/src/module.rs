//! Modules — groups of related bindings.
//!
//! A [`Module`] declares bindings into a [`Binder`] once, when the
//! injector that owns it is built.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use ligand_container::module::{Binder, Module};
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock(u64);
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { self.0 }
//! }
//!
//! struct ClockModule;
//!
//! impl Module for ClockModule {
//!     fn configure(&self, binder: &mut Binder) {
//!         binder
//!             .bind_opaque::<dyn Clock>()
//!             .to_value(Arc::new(FixedClock(42)) as Arc<dyn Clock>);
//!     }
//! }
//!
//! let mut binder = Binder::new();
//! ClockModule.configure(&mut binder);
//! assert_eq!(binder.len(), 1);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::binding::{Binding, BindingBuilder};
use crate::descriptor::{Injectable, Target};
use crate::object::Object;

/// A set of related bindings.
///
/// Split bindings by domain: one module for persistence, one for
/// messaging, and so on. Child injectors take their own modules.
pub trait Module: Send + Sync {
    /// Declare this module's bindings. Called once per injector build.
    fn configure(&self, binder: &mut Binder);

    /// Human-readable name for diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A module defined by a closure.
pub struct FnModule<F> {
    configure: F,
}

impl<F> FnModule<F>
where
    F: Fn(&mut Binder) + Send + Sync,
{
    pub fn new(configure: F) -> Self {
        Self { configure }
    }
}

impl<F> Module for FnModule<F>
where
    F: Fn(&mut Binder) + Send + Sync,
{
    fn configure(&self, binder: &mut Binder) {
        (self.configure)(binder);
    }
}

/// Shorthand for an [`FnModule`] behind an `Arc`.
pub fn module_fn<F>(configure: F) -> Arc<dyn Module>
where
    F: Fn(&mut Binder) + Send + Sync + 'static,
{
    Arc::new(FnModule::new(configure))
}

/// Ordered set of bindings collected while a module is configured.
#[derive(Debug, Default)]
pub struct Binder {
    bindings: Vec<Binding>,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a binding for a described type.
    pub fn bind<T: Injectable>(&mut self) -> BindingBuilder<'_, T> {
        BindingBuilder::new(self, Target::of::<T>(), Object::new::<T>)
    }

    /// Starts a binding for a type without a descriptor, such as a trait
    /// object or a plain value.
    pub fn bind_opaque<T: ?Sized + Send + Sync + 'static>(&mut self) -> BindingBuilder<'_, T> {
        BindingBuilder::new(self, Target::opaque::<T>(), Object::opaque::<T>)
    }

    /// Adds `binding`, replacing any binding with the same declared type.
    pub fn insert(&mut self, binding: Binding) {
        let before = self.bindings.len();
        self.bindings.retain(|existing| existing != &binding);
        let replaced = self.bindings.len() != before;

        debug!(key = %binding.key(), provider = binding.provider().kind_name(), replaced, "Bound type");
        self.bindings.push(binding);
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
