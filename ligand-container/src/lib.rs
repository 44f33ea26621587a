//! Resolution engine for Ligand DI.
//!
//! Types describe themselves through [`Injectable`](descriptor::Injectable);
//! modules bind them; an [`Injector`](injector::Injector) resolves,
//! constructs and wires them.

pub mod binding;
pub mod config;
mod constructor;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod inject;
pub mod injector;
pub mod key;
pub mod lifecycle;
pub mod module;
pub mod object;
pub mod provider;
mod registry;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{BoxError, LigandError, Result};
pub use injector::{Injector, InjectorBuilder};
pub use key::TypeKey;

pub mod prelude {
    pub use crate::binding::{Binding, BindingBuilder};
    pub use crate::config::InjectorConfig;
    pub use crate::context::{Context, SiteKind};
    pub use crate::descriptor::{Constructor, Injectable, Mark, Marks, Target, TypeDescriptor, describe};
    pub use crate::error::{BoxError, LigandError, Result};
    pub use crate::inject::Inject;
    pub use crate::injector::{Injector, InjectorBuilder};
    pub use crate::key::TypeKey;
    pub use crate::lifecycle::{LifecycleReport, Phase};
    pub use crate::module::{Binder, FnModule, Module, module_fn};
    pub use crate::object::{Arguments, Object};
    pub use crate::provider::Provider;
}
