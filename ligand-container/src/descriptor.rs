//! Type descriptors — the metadata the resolution engine works from.
//!
//! A [`TypeDescriptor`] lists what the container may do with a type: its
//! constructors and their parameters, the fields marked for injection,
//! the lifecycle methods, and how the type relates to its supertypes.
//! Descriptors are declared once per type through [`Injectable`] and
//! cached in a process-wide registry by [`describe`].
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use ligand_container::descriptor::{Constructor, Injectable, TypeDescriptor, describe};
//! use ligand_container::inject::Inject;
//!
//! struct Engine;
//!
//! impl Injectable for Engine {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Engine>()
//!             .constructor(Constructor::new(|_| Ok(Engine)))
//!             .build()
//!     }
//! }
//!
//! struct Car {
//!     engine: Inject<Engine>,
//! }
//!
//! impl Injectable for Car {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Car>()
//!             .constructor(Constructor::new(|_| Ok(Car { engine: Inject::empty() })))
//!             .inject::<Engine>("engine", |car| &car.engine)
//!             .build()
//!     }
//! }
//!
//! let car = describe::<Car>();
//! assert_eq!(car.fields().len(), 1);
//! assert_eq!(car.fields()[0].name(), "engine");
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::trace;

use crate::error::{BoxError, LigandError, Result};
use crate::inject::Inject;
use crate::key::TypeKey;
use crate::object::{Arguments, Object};

/// A concrete type the container knows how to build and wire.
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Declares the type's constructors, injected fields and hooks.
    fn descriptor() -> TypeDescriptor;
}

type CastFn = Arc<dyn Fn(&Object) -> Option<Box<dyn Any>> + Send + Sync>;
type UpcastFn = Arc<dyn Fn(&Object) -> Option<Object> + Send + Sync>;
type ApplyFn = Arc<dyn Fn(&Object, Object) -> Result<()> + Send + Sync>;
type HookFn = Arc<dyn Fn(&Object) -> std::result::Result<(), BoxError> + Send + Sync>;
type BuildFn = Arc<dyn Fn(&Arguments) -> std::result::Result<Object, BoxError> + Send + Sync>;
type DescribeFn = fn() -> Arc<TypeDescriptor>;

// ═══════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════

static DESCRIBED: Lazy<DashMap<TypeId, Arc<TypeDescriptor>>> = Lazy::new(DashMap::new);
static OPAQUE: Lazy<DashMap<TypeId, Arc<TypeDescriptor>>> = Lazy::new(DashMap::new);

/// Returns the descriptor of `T`, building it on first use.
pub fn describe<T: Injectable>() -> Arc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    if let Some(found) = DESCRIBED.get(&id) {
        return Arc::clone(found.value());
    }

    // Built without holding a map guard: descriptors of supertypes are
    // described recursively from inside `T::descriptor()`.
    let built = Arc::new(T::descriptor());
    trace!(key = %built.key, fields = built.fields.len(), "Described type");
    let entry = DESCRIBED.entry(id).or_insert(built);
    Arc::clone(entry.value())
}

/// Returns the descriptor used for values of a type without one.
pub(crate) fn describe_opaque<T: ?Sized + Send + Sync + 'static>() -> Arc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    if let Some(found) = OPAQUE.get(&id) {
        return Arc::clone(found.value());
    }
    let entry = OPAQUE
        .entry(id)
        .or_insert_with(|| Arc::new(TypeDescriptor::opaque::<T>()));
    Arc::clone(entry.value())
}

// ═══════════════════════════════════════════
// Marks
// ═══════════════════════════════════════════

/// A metadata mark on a constructor, parameter, field or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Constructor chosen in strict mode, parameter always resolved,
    /// or field populated by injection.
    Inject,
    /// Run right after the constructor returns.
    PostConstruct,
    /// Run after all fields have been injected.
    PostInject,
    /// Run by [`Injector::destroy`](crate::injector::Injector::destroy).
    PreDestroy,
}

impl Mark {
    const ALL: [Mark; 4] = [Mark::Inject, Mark::PostConstruct, Mark::PostInject, Mark::PreDestroy];

    const fn bit(self) -> u8 {
        match self {
            Mark::Inject => 1,
            Mark::PostConstruct => 1 << 1,
            Mark::PostInject => 1 << 2,
            Mark::PreDestroy => 1 << 3,
        }
    }
}

/// A set of [`Mark`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Marks(u8);

impl Marks {
    pub const NONE: Marks = Marks(0);

    pub const fn with(self, mark: Mark) -> Self {
        Marks(self.0 | mark.bit())
    }

    pub const fn contains(self, mark: Mark) -> bool {
        self.0 & mark.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Mark> {
        Mark::ALL.into_iter().filter(move |mark| self.contains(*mark))
    }
}

impl From<Mark> for Marks {
    fn from(mark: Mark) -> Self {
        Marks::NONE.with(mark)
    }
}

impl<const N: usize> From<[Mark; N]> for Marks {
    fn from(marks: [Mark; N]) -> Self {
        marks.into_iter().fold(Marks::NONE, Marks::with)
    }
}

impl fmt::Debug for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ═══════════════════════════════════════════
// Target
// ═══════════════════════════════════════════

/// A type that can be requested from an injector.
///
/// Targets created with [`Target::of`] carry the type's descriptor, so an
/// unbound request can fall back to constructing the type. Opaque targets
/// (trait objects, plain values) can only be satisfied by a binding.
#[derive(Clone, Copy)]
pub struct Target {
    key: TypeKey,
    describe: Option<DescribeFn>,
}

impl Target {
    pub fn of<T: Injectable>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            describe: Some(describe::<T> as DescribeFn),
        }
    }

    pub fn opaque<T: ?Sized + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            describe: None,
        }
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn descriptor(&self) -> Option<Arc<TypeDescriptor>> {
        self.describe.map(|describe| describe())
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.describe.is_none()
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("key", &self.key)
            .field("opaque", &self.is_opaque())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Members
// ═══════════════════════════════════════════

/// A constructor parameter.
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    name: &'static str,
    target: Target,
    marks: Marks,
}

impl ParamDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn marks(&self) -> Marks {
        self.marks
    }
}

/// A constructor of a described type.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    owner: TypeKey,
    params: Vec<ParamDescriptor>,
    marks: Marks,
    build: BuildFn,
}

impl ConstructorDescriptor {
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    pub fn marks(&self) -> Marks {
        self.marks
    }

    pub fn is_injectable(&self) -> bool {
        self.marks.contains(Mark::Inject)
    }

    /// Calls the constructor with fully prepared arguments.
    pub fn invoke(&self, values: Vec<Option<Object>>) -> Result<Object> {
        let args = Arguments::new(self.owner, values);
        (self.build)(&args).map_err(|source| LigandError::construction(self.owner, source))
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("marks", &self.marks)
            .finish()
    }
}

/// A field populated by injection.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    declared_in: TypeKey,
    target: Target,
    marks: Marks,
    apply: ApplyFn,
}

impl FieldDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type that declares the field (an ancestor for inherited fields).
    pub fn declared_in(&self) -> TypeKey {
        self.declared_in
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn marks(&self) -> Marks {
        self.marks
    }

    /// Stores `value` into the field of `owner`.
    pub fn assign(&self, owner: &Object, value: Object) -> Result<()> {
        (self.apply)(owner, value)
    }

    fn lifted(&self, upcast: &UpcastFn) -> Self {
        let upcast = Arc::clone(upcast);
        let inner = Arc::clone(&self.apply);
        let declared_in = self.declared_in;
        Self {
            apply: Arc::new(move |owner: &Object, value: Object| -> Result<()> {
                let base = upcast(owner).ok_or(LigandError::TypeMismatch {
                    expected: declared_in,
                    actual: owner.type_key(),
                })?;
                inner(&base, value)
            }),
            ..self.clone()
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declared_in", &self.declared_in)
            .field("target", &self.target.key)
            .finish()
    }
}

/// A zero-argument method carrying lifecycle marks.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: &'static str,
    declared_in: TypeKey,
    marks: Marks,
    invoke: HookFn,
}

impl MethodDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared_in(&self) -> TypeKey {
        self.declared_in
    }

    pub fn marks(&self) -> Marks {
        self.marks
    }

    pub fn is_marked(&self, mark: Mark) -> bool {
        self.marks.contains(mark)
    }

    /// Invokes the method on `owner`.
    pub fn invoke(&self, owner: &Object) -> Result<()> {
        (self.invoke)(owner).map_err(|source| LigandError::invocation(self.declared_in, self.name, source))
    }

    fn lifted(&self, upcast: &UpcastFn) -> Self {
        let upcast = Arc::clone(upcast);
        let inner = Arc::clone(&self.invoke);
        let declared_in = self.declared_in;
        Self {
            invoke: Arc::new(move |owner: &Object| -> std::result::Result<(), BoxError> {
                let base = upcast(owner).ok_or(LigandError::TypeMismatch {
                    expected: declared_in,
                    actual: owner.type_key(),
                })?;
                inner(&base)
            }),
            ..self.clone()
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("declared_in", &self.declared_in)
            .field("marks", &self.marks)
            .finish()
    }
}

struct Superclass {
    descriptor: Arc<TypeDescriptor>,
    upcast: UpcastFn,
}

struct Interface {
    key: TypeKey,
    cast: CastFn,
}

// ═══════════════════════════════════════════
// TypeDescriptor
// ═══════════════════════════════════════════

/// Everything the container knows about one type.
pub struct TypeDescriptor {
    key: TypeKey,
    identity: CastFn,
    superclass: Option<Superclass>,
    interfaces: Vec<Interface>,
    constructors: Vec<ConstructorDescriptor>,
    declared_methods: Vec<MethodDescriptor>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Starts describing the concrete type `T`.
    pub fn builder<T: Injectable>() -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder {
            superclass: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn opaque<T: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            identity: Arc::new(|object: &Object| {
                object
                    .raw()
                    .downcast_ref::<Arc<T>>()
                    .map(|inner| Box::new(Arc::clone(inner)) as Box<dyn Any>)
            }),
            superclass: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            declared_methods: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// The descriptor of the declared superclass, if any.
    pub fn superclass(&self) -> Option<&Arc<TypeDescriptor>> {
        self.superclass.as_ref().map(|sup| &sup.descriptor)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.interfaces.iter().map(|interface| interface.key)
    }

    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Injectable fields, declared ones first, then inherited ones.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Marked methods, declared ones first, then inherited ones.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Marked methods declared on this type only.
    pub fn declared_methods(&self) -> &[MethodDescriptor] {
        &self.declared_methods
    }

    /// Inheritance distance from this type up to `key`.
    ///
    /// 0 for the type itself, +1 per superclass hop. An interface declared
    /// at superclass depth `d` is at distance `d + 1`. `None` when this
    /// type is not assignable to `key`.
    pub fn distance_to(&self, key: &TypeKey) -> Option<u32> {
        let mut level = Some(self);
        let mut depth = 0;
        while let Some(descriptor) = level {
            if descriptor.key == *key {
                return Some(depth);
            }
            if descriptor.interfaces.iter().any(|interface| interface.key == *key) {
                return Some(depth + 1);
            }
            level = descriptor.superclass.as_ref().map(|sup| sup.descriptor.as_ref());
            depth += 1;
        }
        None
    }

    pub fn is_assignable_to(&self, key: &TypeKey) -> bool {
        self.distance_to(key).is_some()
    }

    /// Views `object` (whose runtime type is this one) as the type `id`,
    /// returning a boxed `Arc<U>`.
    pub(crate) fn cast(&self, object: &Object, id: TypeId) -> Option<Box<dyn Any>> {
        if self.key.type_id() == id {
            return (self.identity)(object);
        }
        if let Some(interface) = self.interfaces.iter().find(|i| i.key.type_id() == id) {
            return (interface.cast)(object);
        }
        let sup = self.superclass.as_ref()?;
        let base = (sup.upcast)(object)?;
        sup.descriptor.cast(&base, id)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("superclass", &self.superclass().map(|sup| sup.key))
            .field("interfaces", &self.interfaces().collect::<Vec<_>>())
            .field("constructors", &self.constructors.len())
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Builders
// ═══════════════════════════════════════════

/// Declares a constructor of `T`.
///
/// The closure receives the prepared [`Arguments`], one slot per declared
/// parameter, in declaration order.
pub struct Constructor<T> {
    params: Vec<ParamDescriptor>,
    marks: Marks,
    build: BuildFn,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Constructor<T> {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&Arguments) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            marks: Marks::NONE,
            build: Arc::new(move |args: &Arguments| -> std::result::Result<Object, BoxError> {
                build(args).map(|value| Object::new(Arc::new(value)))
            }),
            _marker: PhantomData,
        }
    }

    /// Marks this constructor as the one strict resolution must use.
    pub fn injectable(mut self) -> Self {
        self.marks = self.marks.with(Mark::Inject);
        self
    }

    /// Appends a parameter of a described type.
    pub fn param<P: Injectable>(self, name: &'static str) -> Self {
        self.push_param(name, Target::of::<P>(), Marks::NONE)
    }

    /// Appends a parameter that can only be satisfied by a binding.
    pub fn param_opaque<P: ?Sized + 'static>(self, name: &'static str) -> Self {
        self.push_param(name, Target::opaque::<P>(), Marks::NONE)
    }

    /// Appends a parameter that is always resolved, even when explicit
    /// arguments are supplied.
    pub fn inject_param<P: Injectable>(self, name: &'static str) -> Self {
        self.push_param(name, Target::of::<P>(), Mark::Inject.into())
    }

    pub fn inject_param_opaque<P: ?Sized + 'static>(self, name: &'static str) -> Self {
        self.push_param(name, Target::opaque::<P>(), Mark::Inject.into())
    }

    fn push_param(mut self, name: &'static str, target: Target, marks: Marks) -> Self {
        self.params.push(ParamDescriptor { name, target, marks });
        self
    }
}

/// Builds a [`TypeDescriptor`] for `T`.
pub struct TypeDescriptorBuilder<T> {
    superclass: Option<Superclass>,
    interfaces: Vec<Interface>,
    constructors: Vec<ConstructorDescriptor>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> TypeDescriptorBuilder<T> {
    /// Declares `S` as the superclass of `T`.
    ///
    /// `upcast` returns the `S` part of a `T`. Fields and methods of `S`
    /// (and its own ancestors) become members of `T`.
    pub fn extends<S: Injectable>(mut self, upcast: impl Fn(Arc<T>) -> Arc<S> + Send + Sync + 'static) -> Self {
        self.superclass = Some(Superclass {
            descriptor: describe::<S>(),
            upcast: Arc::new(move |object: &Object| {
                object
                    .raw()
                    .clone()
                    .downcast::<T>()
                    .ok()
                    .map(|value| Object::new(upcast(value)))
            }),
        });
        self
    }

    /// Declares that `T` can be viewed as `I`, typically a trait object.
    pub fn implements<I: ?Sized + 'static>(mut self, cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Self {
        self.interfaces.push(Interface {
            key: TypeKey::of::<I>(),
            cast: Arc::new(move |object: &Object| {
                object
                    .raw()
                    .clone()
                    .downcast::<T>()
                    .ok()
                    .map(|value| Box::new(cast(value)) as Box<dyn Any>)
            }),
        });
        self
    }

    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(ConstructorDescriptor {
            owner: TypeKey::of::<T>(),
            params: constructor.params,
            marks: constructor.marks,
            build: constructor.build,
        });
        self
    }

    /// Declares an injected field of a described type.
    pub fn inject<F: Injectable>(self, name: &'static str, field: impl Fn(&T) -> &Inject<F> + Send + Sync + 'static) -> Self {
        self.push_field(name, Target::of::<F>(), field)
    }

    /// Declares an injected field that can only be satisfied by a binding.
    pub fn inject_opaque<F: ?Sized + Send + Sync + 'static>(
        self,
        name: &'static str,
        field: impl Fn(&T) -> &Inject<F> + Send + Sync + 'static,
    ) -> Self {
        self.push_field(name, Target::opaque::<F>(), field)
    }

    pub fn post_construct(
        self,
        name: &'static str,
        hook: impl Fn(&T) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.method(name, Mark::PostConstruct, hook)
    }

    pub fn post_inject(
        self,
        name: &'static str,
        hook: impl Fn(&T) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.method(name, Mark::PostInject, hook)
    }

    pub fn pre_destroy(
        self,
        name: &'static str,
        hook: impl Fn(&T) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.method(name, Mark::PreDestroy, hook)
    }

    /// Declares a zero-argument method with any combination of marks.
    pub fn method(
        mut self,
        name: &'static str,
        marks: impl Into<Marks>,
        hook: impl Fn(&T) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.push(MethodDescriptor {
            name,
            declared_in: TypeKey::of::<T>(),
            marks: marks.into(),
            invoke: Arc::new(move |object: &Object| -> std::result::Result<(), BoxError> {
                let owner = downcast_owner::<T>(object)?;
                hook(&*owner)
            }),
        });
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let mut fields = self.fields.clone();
        let mut methods = self.methods.clone();
        if let Some(sup) = &self.superclass {
            fields.extend(sup.descriptor.fields.iter().map(|field| field.lifted(&sup.upcast)));
            methods.extend(sup.descriptor.methods.iter().map(|method| method.lifted(&sup.upcast)));
        }

        TypeDescriptor {
            key: TypeKey::of::<T>(),
            identity: Arc::new(|object: &Object| {
                object
                    .raw()
                    .clone()
                    .downcast::<T>()
                    .ok()
                    .map(|value| Box::new(value) as Box<dyn Any>)
            }),
            superclass: self.superclass,
            interfaces: self.interfaces,
            constructors: self.constructors,
            declared_methods: self.methods,
            fields,
            methods,
        }
    }

    fn push_field<F: ?Sized + Send + Sync + 'static>(
        mut self,
        name: &'static str,
        target: Target,
        field: impl Fn(&T) -> &Inject<F> + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            declared_in: TypeKey::of::<T>(),
            target,
            marks: Mark::Inject.into(),
            apply: Arc::new(move |object: &Object, value: Object| -> Result<()> {
                let owner = downcast_owner::<T>(object)?;
                let value = value.expect_cast::<F>()?;
                field(&*owner).set(value);
                Ok(())
            }),
        });
        self
    }
}

fn downcast_owner<T: Injectable>(object: &Object) -> Result<Arc<T>> {
    object
        .raw()
        .clone()
        .downcast::<T>()
        .map_err(|_| LigandError::TypeMismatch {
            expected: TypeKey::of::<T>(),
            actual: object.type_key(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Animal, Dog, Named, Puppy};

    #[test]
    fn describe_is_cached() {
        let a = describe::<Dog>();
        let b = describe::<Dog>();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn marks_set_operations() {
        let marks = Marks::from([Mark::PostInject, Mark::PreDestroy]);
        assert!(marks.contains(Mark::PostInject));
        assert!(marks.contains(Mark::PreDestroy));
        assert!(!marks.contains(Mark::Inject));
        assert_eq!(marks.iter().count(), 2);
        assert!(Marks::NONE.is_empty());
    }

    #[test]
    fn inheritance_distance() {
        let puppy = describe::<Puppy>();
        assert_eq!(puppy.distance_to(&TypeKey::of::<Puppy>()), Some(0));
        assert_eq!(puppy.distance_to(&TypeKey::of::<Dog>()), Some(1));
        assert_eq!(puppy.distance_to(&TypeKey::of::<Animal>()), Some(2));
        // Animal implements Named directly
        assert_eq!(puppy.distance_to(&TypeKey::of::<dyn Named>()), Some(3));
        assert_eq!(puppy.distance_to(&TypeKey::of::<String>()), None);

        let animal = describe::<Animal>();
        assert!(!animal.is_assignable_to(&TypeKey::of::<Dog>()));
    }

    #[test]
    fn inherited_members_are_flattened() {
        let dog = describe::<Dog>();
        let own: Vec<_> = dog.fields().iter().map(|f| f.declared_in()).collect();
        assert_eq!(own.first(), Some(&TypeKey::of::<Dog>()));
        assert_eq!(own.last(), Some(&TypeKey::of::<Animal>()));

        // Declared methods first, then the ancestor's.
        let methods: Vec<_> = dog.methods().iter().map(|m| m.name()).collect();
        assert_eq!(methods.first(), Some(&"wag"));
        assert!(methods.contains(&"breathe"));
        assert!(dog.declared_methods().iter().all(|m| m.declared_in() == TypeKey::of::<Dog>()));
    }

    #[test]
    fn constructor_metadata() {
        let dog = describe::<Dog>();
        assert_eq!(dog.constructors().len(), 1);
        assert!(dog.constructors()[0].params().is_empty());
        assert!(!dog.constructors()[0].is_injectable());
    }
}
