//! # The Injector — heart of Ligand
//!
//! Resolves bound and unbound types into fully wired object graphs and
//! runs their lifecycle hooks.
//!
//! # Architecture
//! ```text
//! InjectorBuilder ──build()──> Injector ──child()──> Injector
//!       │                         │
//!   modules ──configure()──> bindings ──provide()──> Provider
//! ```
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use ligand_container::prelude::*;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { 42 }
//! }
//!
//! struct Scheduler {
//!     clock: Inject<dyn Clock>,
//! }
//!
//! impl Injectable for Scheduler {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Scheduler>()
//!             .constructor(Constructor::new(|_| Ok(Scheduler { clock: Inject::empty() })))
//!             .inject_opaque::<dyn Clock>("clock", |s| &s.clock)
//!             .build()
//!     }
//! }
//!
//! let injector = Injector::builder()
//!     .module(FnModule::new(|binder: &mut Binder| {
//!         binder
//!             .bind_opaque::<dyn Clock>()
//!             .to_value(Arc::new(FixedClock) as Arc<dyn Clock>);
//!         binder.bind::<Scheduler>().to_singleton::<Scheduler>();
//!     }))
//!     .build();
//!
//! let scheduler = injector.provide::<Scheduler>().expect("Failed to provide");
//! assert_eq!(scheduler.clock.get().map(|c| c.now()), Some(42));
//! ```

use std::fmt;
use std::sync::Arc;

use ligand_support::Logger;
use ligand_support::rendering::suggest_similar;
use once_cell::sync::OnceCell;
use tracing::{debug, info, instrument, trace};

use crate::binding::Binding;
use crate::config::InjectorConfig;
use crate::constructor::{select_best_match, select_injectable};
use crate::context::{Context, SiteKind};
use crate::descriptor::{Injectable, Mark, Target, TypeDescriptor, describe};
use crate::error::{CircularDependencyError, LigandError, NotBoundError, Result};
use crate::key::TypeKey;
use crate::lifecycle::{LifecycleReport, Phase};
use crate::module::{Binder, Module};
use crate::object::Object;
use crate::provider::{FactoryProvider, Provider, SingletonProvider};
use crate::registry::BindingSet;

// ═══════════════════════════════════════════
// InjectorBuilder
// ═══════════════════════════════════════════

/// Builds an [`Injector`] from modules.
///
/// # Examples
/// ```rust,ignore
/// let injector = Injector::builder()
///     .module(PersistenceModule)
///     .module(MessagingModule)
///     .max_depth(64)
///     .build();
/// ```
pub struct InjectorBuilder {
    parent: Option<Injector>,
    modules: Vec<Arc<dyn Module>>,
    config: InjectorConfig,
}

impl InjectorBuilder {
    fn new(parent: Option<Injector>, config: InjectorConfig) -> Self {
        Self {
            parent,
            modules: Vec::new(),
            config,
        }
    }

    /// Add a module.
    pub fn module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// Add shared modules, in order.
    pub fn modules(mut self, modules: impl IntoIterator<Item = Arc<dyn Module>>) -> Self {
        self.modules.extend(modules);
        self
    }

    pub fn config(mut self, config: InjectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Longest resolution chain before failing with
    /// [`LigandError::DepthExceeded`].
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Whether eager singletons are built by [`build`](Self::build).
    pub fn eager_bootstrap(mut self, enabled: bool) -> Self {
        self.config.eager_bootstrap = enabled;
        self
    }

    /// Configure every module and bootstrap the injector.
    ///
    /// Bootstrap is best-effort: failures are logged and collected in
    /// [`Injector::bootstrap_report`], they never abort the build.
    #[instrument(skip(self), name = "injector_build", fields(modules = self.modules.len(), child = self.parent.is_some()))]
    pub fn build(self) -> Injector {
        info!("Building injector");

        let mut own = BindingSet::new();
        for module in &self.modules {
            let mut binder = Binder::new();
            module.configure(&mut binder);
            debug!(module = module.name(), bindings = binder.len(), "Configured module");
            for binding in binder.into_bindings() {
                own.insert(binding);
            }
        }

        let inherited = match &self.parent {
            Some(parent) => parent.inner.bindings.clone(),
            None => builtin_bindings(),
        };
        let bindings = inherited.overlay(own.iter().cloned());

        let injector = Injector {
            inner: Arc::new(InjectorInner {
                parent: self.parent,
                modules: self.modules,
                own,
                bindings,
                config: self.config,
                bootstrap: OnceCell::new(),
            }),
        };

        if injector.inner.config.eager_bootstrap {
            let report = injector.bootstrap();
            // fresh cell
            injector.inner.bootstrap.set(report).ok();
        }

        info!(bindings = injector.inner.bindings.len(), "Injector built ✓");
        injector
    }
}

impl fmt::Debug for InjectorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorBuilder")
            .field("modules", &self.modules.len())
            .field("child", &self.parent.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Bindings every root injector starts with: the resolving injector
/// itself and a [`Logger`] named after the requesting type.
fn builtin_bindings() -> BindingSet {
    let injector = Binding::new(
        Target::opaque::<Injector>(),
        Provider::Factory(FactoryProvider::new(|ctx: &Context| {
            Ok(Object::opaque(Arc::new(ctx.injector().clone())))
        })),
    );
    let logger = Binding::new(
        Target::opaque::<Logger>(),
        Provider::Factory(FactoryProvider::new(|ctx: &Context| {
            Ok(Object::opaque(Arc::new(Logger::new(ctx.declaring_type().simple_name()))))
        })),
    );
    [injector, logger].into_iter().collect()
}

// ═══════════════════════════════════════════
// Injector
// ═══════════════════════════════════════════

struct InjectorInner {
    parent: Option<Injector>,
    modules: Vec<Arc<dyn Module>>,
    own: BindingSet,
    bindings: BindingSet,
    config: InjectorConfig,
    bootstrap: OnceCell<LifecycleReport>,
}

/// Thread-safe dependency injector.
///
/// Cloning is cheap and yields a handle to the same injector. Created by
/// [`InjectorBuilder::build`] or [`Injector::child`].
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

impl Injector {
    /// Create a builder for a root injector.
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new(None, InjectorConfig::default())
    }

    /// Build a root injector from `modules` with the default config.
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self::builder().modules(modules).build()
    }

    // ── Hierarchy ──

    /// Build a child injector. Its own bindings override this injector's.
    pub fn child(&self, modules: Vec<Arc<dyn Module>>) -> Injector {
        self.child_builder().modules(modules).build()
    }

    /// A builder for a child injector, starting from this one's config.
    pub fn child_builder(&self) -> InjectorBuilder {
        InjectorBuilder::new(Some(self.clone()), self.inner.config.clone())
    }

    pub fn parent(&self) -> Option<&Injector> {
        self.inner.parent.as_ref()
    }

    /// Modules of the whole ancestry, parent-first.
    pub fn modules(&self) -> Vec<Arc<dyn Module>> {
        let mut modules = self.inner.parent.as_ref().map(Injector::modules).unwrap_or_default();
        modules.extend(self.inner.modules.iter().cloned());
        modules
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.inner.config
    }

    /// The outcome of the eager bootstrap, `None` when it was disabled.
    pub fn bootstrap_report(&self) -> Option<&LifecycleReport> {
        self.inner.bootstrap.get()
    }

    /// Whether both handles refer to the same injector.
    pub fn ptr_eq(&self, other: &Injector) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Bindings ──

    /// Effective bindings: built-ins, then the ancestry's, then this
    /// injector's own.
    pub fn bindings(&self) -> &[Binding] {
        self.inner.bindings.as_slice()
    }

    /// Effective bindings whose declared type is assignable to `T`.
    pub fn bindings_of<T: ?Sized + 'static>(&self) -> Vec<&Binding> {
        self.inner.bindings.assignable_to(TypeKey::of::<T>()).collect()
    }

    /// The provider of the binding that serves `T`.
    ///
    /// # Errors
    /// [`LigandError::NoBindingFound`] when no binding is compatible.
    pub fn get_provider<T: Injectable>(&self) -> Result<&Provider> {
        self.provider_for(&Target::of::<T>())
    }

    pub fn provider_for(&self, target: &Target) -> Result<&Provider> {
        self.inner
            .bindings
            .find(target)
            .map(Binding::provider)
            .ok_or_else(|| self.not_bound(target.key(), None))
    }

    // ── Resolution ──

    /// Resolve `T` through its binding, or construct it when unbound.
    ///
    /// ```rust,ignore
    /// let service: Arc<UserService> = injector.provide()?;
    /// ```
    pub fn provide<T: Injectable>(&self) -> Result<Arc<T>> {
        self.provide_with::<T>(&Context::direct(self, TypeKey::of::<T>()))
    }

    /// Resolve a type that can only come from a binding, such as a
    /// trait object.
    pub fn provide_opaque<T: ?Sized + 'static>(&self) -> Result<Arc<T>> {
        self.provide_opaque_with::<T>(&Context::direct(self, TypeKey::of::<T>()))
    }

    /// Resolve `T` on behalf of the site `ctx` describes.
    pub fn provide_with<T: Injectable>(&self, ctx: &Context) -> Result<Arc<T>> {
        self.provide_object(&Target::of::<T>(), ctx)?.expect_cast::<T>()
    }

    pub fn provide_opaque_with<T: ?Sized + 'static>(&self, ctx: &Context) -> Result<Arc<T>> {
        self.provide_object(&Target::opaque::<T>(), ctx)?.expect_cast::<T>()
    }

    /// Resolve `target` on behalf of the site `ctx` describes.
    ///
    /// An instance of exactly the target type still being injected further
    /// up the same resolution chain is returned as is, so field cycles
    /// resolve. Supertype requests go through the bindings.
    pub fn provide_object(&self, target: &Target, ctx: &Context) -> Result<Object> {
        let key = target.key();

        if let Some(object) = ctx.chain().in_flight_instance(&key) {
            trace!(key = %key, "Reusing in-flight instance");
            return Ok(object.clone());
        }

        if ctx.depth() >= self.inner.config.max_depth {
            return Err(LigandError::DepthExceeded {
                key,
                depth: ctx.depth(),
            });
        }
        let ctx = ctx.descend();

        if let Some(binding) = self.inner.bindings.find(target) {
            trace!(key = %key, bound = %binding.key(), provider = binding.provider().kind_name(), "Providing");
            return binding.provider().provide(&ctx);
        }

        match target.descriptor() {
            Some(descriptor) => {
                trace!(key = %key, "Constructing unbound type");
                self.construct_object(&descriptor, &[], &ctx, true)
            }
            None => {
                let required_by = (ctx.kind() != SiteKind::Direct).then_some(ctx.declaring_type());
                Err(self.not_bound(key, required_by))
            }
        }
    }

    // ── Construction ──

    /// Construct a new `T` with the strict constructor, then run its
    /// post-construct hooks and inject it. Bindings for `T` are ignored.
    pub fn construct<T: Injectable>(&self) -> Result<Arc<T>> {
        self.construct_with::<T>(Vec::new())
    }

    /// Construct a new `T` with the constructor that best fits `args`.
    ///
    /// A `None` argument is an explicit null. An empty list selects the
    /// strict constructor.
    pub fn construct_with<T: Injectable>(&self, args: Vec<Option<Object>>) -> Result<Arc<T>> {
        let ctx = Context::direct(self, TypeKey::of::<T>());
        self.construct_object(&describe::<T>(), &args, &ctx, true)?
            .expect_cast::<T>()
    }

    /// Like [`construct_with`](Self::construct_with), without field and
    /// post-inject method injection.
    pub fn construct_without_injecting<T: Injectable>(&self, args: Vec<Option<Object>>) -> Result<Arc<T>> {
        let ctx = Context::direct(self, TypeKey::of::<T>());
        self.construct_object(&describe::<T>(), &args, &ctx, false)?
            .expect_cast::<T>()
    }

    /// Construct an instance of the type `descriptor` describes.
    ///
    /// # Errors
    /// - [`LigandError::CircularDependency`] when the chain of `ctx` is
    ///   already resolving a constructor of the same type
    /// - constructor selection and resolution errors of its parameters
    pub fn construct_object(
        &self,
        descriptor: &Arc<TypeDescriptor>,
        args: &[Option<Object>],
        ctx: &Context,
        inject: bool,
    ) -> Result<Object> {
        let key = descriptor.key();

        if ctx.chain().is_constructing(&key) {
            let mut chain = ctx.chain().constructing_path();
            chain.push(key);
            return Err(LigandError::CircularDependency(CircularDependencyError { chain }));
        }

        let constructor = if args.is_empty() {
            select_injectable(descriptor)?
        } else {
            select_best_match(descriptor, args)?
        };

        let chain = ctx.chain().constructing(key);
        let mut values = Vec::with_capacity(constructor.params().len());
        for (index, param) in constructor.params().iter().enumerate() {
            let explicit = args.get(index).filter(|_| !param.marks().contains(Mark::Inject));
            let value = match explicit {
                Some(value) => value.clone(),
                None => {
                    let site = ctx.site(key, None, SiteKind::Constructor, param.name(), param.marks(), chain.clone());
                    Some(self.provide_object(param.target(), &site)?)
                }
            };
            values.push(value);
        }

        let object = constructor.invoke(values)?;
        debug!(key = %key, "Constructed");

        for method in object.descriptor().declared_methods() {
            if method.is_marked(Mark::PostConstruct) {
                method.invoke(&object)?;
            }
        }

        if inject {
            self.inject_fields_in(&object, ctx)?;
            self.inject_methods_in(&object)?;
        }
        Ok(object)
    }

    /// Construct the type behind `target`, which must carry a descriptor.
    pub(crate) fn construct_target(&self, target: &Target, ctx: &Context, inject: bool) -> Result<Object> {
        let descriptor = target
            .descriptor()
            .ok_or_else(|| self.not_bound(target.key(), Some(ctx.declaring_type())))?;
        self.construct_object(&descriptor, &[], ctx, inject)
    }

    // ── Injection ──

    /// Inject the fields of `instance`, then run its post-inject methods.
    pub fn inject<T: Injectable>(&self, instance: &Arc<T>) -> Result<()> {
        self.inject_object(&Object::new(Arc::clone(instance)))
    }

    pub fn inject_object(&self, object: &Object) -> Result<()> {
        let ctx = Context::direct(self, object.type_key());
        self.inject_fields_in(object, &ctx)?;
        self.inject_methods_in(object)
    }

    /// Resolve and assign every field marked for injection, inherited
    /// ones included.
    pub fn inject_fields(&self, object: &Object) -> Result<()> {
        self.inject_fields_in(object, &Context::direct(self, object.type_key()))
    }

    /// Run every post-inject method, declared ones first.
    pub fn inject_methods(&self, object: &Object) -> Result<()> {
        self.inject_methods_in(object)
    }

    fn inject_fields_in(&self, object: &Object, ctx: &Context) -> Result<()> {
        let chain = ctx.chain().injecting(object);
        for field in object.descriptor().fields() {
            let site = ctx.site(
                object.type_key(),
                Some(object.clone()),
                SiteKind::Field,
                field.name(),
                field.marks(),
                chain.clone(),
            );
            let value = self.provide_object(field.target(), &site)?;
            field.assign(object, value)?;
            trace!(key = %object.type_key(), field = field.name(), "Injected field");
        }
        Ok(())
    }

    fn inject_methods_in(&self, object: &Object) -> Result<()> {
        for method in object.descriptor().methods() {
            if method.is_marked(Mark::PostInject) {
                trace!(key = %object.type_key(), method = method.name(), "Running post-inject method");
                method.invoke(object)?;
            }
        }
        Ok(())
    }

    // ── Lifecycle ──

    #[instrument(skip(self), name = "injector_bootstrap")]
    fn bootstrap(&self) -> LifecycleReport {
        let mut report = LifecycleReport::new();
        let ctx = Context::root(self, TypeKey::of::<Injector>(), SiteKind::Eager, "eager");

        let eager: Vec<(TypeKey, &SingletonProvider)> = self
            .inner
            .own
            .iter()
            .filter_map(|binding| {
                binding
                    .provider()
                    .as_singleton()
                    .filter(|singleton| singleton.is_eager())
                    .map(|singleton| (binding.key(), singleton))
            })
            .collect();

        // Every eager singleton gets an instance before any field injection.
        let mut deferred = Vec::new();
        for (key, singleton) in &eager {
            if singleton.is_deferred() {
                let built = singleton.provide_without_injecting(&ctx);
                if let Some(object) = report.track(*key, Phase::EagerConstruction, built) {
                    deferred.push((*key, object));
                }
            } else {
                report.track(*key, Phase::EagerConstruction, singleton.provide(&ctx));
            }
        }

        for (key, object) in &deferred {
            report.track(*key, Phase::EagerFieldInjection, self.inject_fields_in(object, &ctx));
        }

        for (key, object) in &deferred {
            report.track(*key, Phase::EagerMethodInjection, self.inject_methods_in(object));
        }

        for binding in self.inner.own.iter() {
            if let Provider::Instance(provider) = binding.provider() {
                report.track(binding.key(), Phase::EagerInstance, Ok(provider.provide()));
            }
        }

        info!(
            eager = eager.len(),
            completed = report.completed(),
            failed = report.failures().len(),
            "Bootstrap finished"
        );
        report
    }

    /// Run the pre-destroy methods of every instance bound in this
    /// injector.
    ///
    /// Bindings inherited from the parent are left alone. A failing hook
    /// is recorded and the remaining hooks still run.
    #[instrument(skip(self), name = "injector_destroy")]
    pub fn destroy(&self) -> LifecycleReport {
        let mut report = LifecycleReport::new();

        let own = self
            .inner
            .bindings
            .iter()
            .filter(|binding| self.inner.own.contains(&binding.key()));

        for binding in own {
            let key = binding.key();
            let declared = binding
                .provider()
                .implementation()
                .or_else(|| binding.target().descriptor());
            let Some(declared) = declared else {
                continue;
            };
            if !declared.methods().iter().any(|method| method.is_marked(Mark::PreDestroy)) {
                continue;
            }

            let ctx = Context::root(self, key, SiteKind::Method, "destroy");
            let object = match binding.provider().provide(&ctx) {
                Ok(object) => object,
                Err(error) => {
                    report.record(key, Phase::PreDestroy, error);
                    continue;
                }
            };

            for method in object.descriptor().methods() {
                if method.is_marked(Mark::PreDestroy) {
                    debug!(key = %key, method = method.name(), "Running pre-destroy method");
                    report.track(key, Phase::PreDestroy, method.invoke(&object));
                }
            }
        }

        info!(completed = report.completed(), failed = report.failures().len(), "Injector destroyed");
        report
    }

    // ── Internal ──

    fn not_bound(&self, requested: TypeKey, required_by: Option<TypeKey>) -> LigandError {
        let names: Vec<&'static str> = self.inner.bindings.iter().map(|b| b.key().type_name()).collect();
        let suggestions = suggest_similar(requested.type_name(), &names, 3)
            .into_iter()
            .filter_map(|name| {
                self.inner
                    .bindings
                    .iter()
                    .map(Binding::key)
                    .find(|key| key.type_name() == name)
            })
            .collect();

        LigandError::NoBindingFound(NotBoundError {
            requested,
            required_by,
            suggestions,
        })
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("bindings", &self.inner.bindings.len())
            .field("own", &self.inner.own.len())
            .field("modules", &self.inner.modules.len())
            .field("child", &self.inner.parent.is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
