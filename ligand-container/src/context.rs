//! Injection-site descriptors.
//!
//! A [`Context`] tells a provider who is asking and where: the declaring
//! type, the requesting instance, the kind and name of the site. It also
//! carries the [`ResolutionChain`] of the call it belongs to, which is how
//! cycles are detected without any shared state on the injector.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::{Injectable, Marks, Target};
use crate::error::Result;
use crate::injector::Injector;
use crate::key::TypeKey;
use crate::object::Object;

/// The kind of injection site a resolution was requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Field,
    Method,
    Constructor,
    /// Eager singleton bootstrap.
    Eager,
    /// A request made directly by user code.
    Direct,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteKind::Field => write!(f, "field"),
            SiteKind::Method => write!(f, "method"),
            SiteKind::Constructor => write!(f, "constructor"),
            SiteKind::Eager => write!(f, "eager"),
            SiteKind::Direct => write!(f, "direct"),
        }
    }
}

struct ChainLink {
    key: TypeKey,
    object: Option<Object>,
    next: Option<Arc<ChainLink>>,
}

/// The in-flight construction and injection records of one resolution.
///
/// Immutable and shared by value: pushing returns a new chain, so sibling
/// branches of a resolution never see each other's records.
#[derive(Clone, Default)]
pub struct ResolutionChain {
    head: Option<Arc<ChainLink>>,
    len: usize,
}

impl ResolutionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Records that the constructor of `key` is being resolved.
    pub(crate) fn constructing(&self, key: TypeKey) -> Self {
        self.push(key, None)
    }

    /// Records that the members of `object` are being injected.
    pub(crate) fn injecting(&self, object: &Object) -> Self {
        self.push(object.type_key(), Some(object.clone()))
    }

    /// The newest in-flight instance whose runtime type is exactly `key`.
    ///
    /// Supertypes never match: a field asking for an interface its owner
    /// implements goes through the bindings like any other request.
    pub fn in_flight_instance(&self, key: &TypeKey) -> Option<&Object> {
        self.links()
            .filter(|link| link.key == *key)
            .find_map(|link| link.object.as_ref())
    }

    /// Whether a constructor of `key` is currently being resolved.
    pub fn is_constructing(&self, key: &TypeKey) -> bool {
        self.links().any(|link| link.object.is_none() && link.key == *key)
    }

    /// Types whose constructors are in flight, outermost first.
    pub fn constructing_path(&self) -> Vec<TypeKey> {
        let mut path: Vec<TypeKey> = self
            .links()
            .filter(|link| link.object.is_none())
            .map(|link| link.key)
            .collect();
        path.reverse();
        path
    }

    fn push(&self, key: TypeKey, object: Option<Object>) -> Self {
        Self {
            head: Some(Arc::new(ChainLink {
                key,
                object,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    fn links(&self) -> impl Iterator<Item = &ChainLink> {
        std::iter::successors(self.head.as_deref(), |link| link.next.as_deref())
    }
}

impl fmt::Debug for ResolutionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.links().map(|link| (link.key, link.object.is_some())))
            .finish()
    }
}

/// Immutable description of one injection site.
#[derive(Clone)]
pub struct Context {
    pub(crate) declaring_type: TypeKey,
    pub(crate) requester: Option<Object>,
    pub(crate) injector: Injector,
    pub(crate) kind: SiteKind,
    pub(crate) name: &'static str,
    pub(crate) metadata: Marks,
    pub(crate) chain: ResolutionChain,
    pub(crate) depth: usize,
}

impl Context {
    /// A context for a request made directly by user code on behalf of
    /// `declaring_type`.
    pub fn direct(injector: &Injector, declaring_type: TypeKey) -> Self {
        Self::root(injector, declaring_type, SiteKind::Direct, "direct")
    }

    pub(crate) fn root(injector: &Injector, declaring_type: TypeKey, kind: SiteKind, name: &'static str) -> Self {
        Self {
            declaring_type,
            requester: None,
            injector: injector.clone(),
            kind,
            name,
            metadata: Marks::NONE,
            chain: ResolutionChain::new(),
            depth: 0,
        }
    }

    /// A site nested under this one, sharing its injector and depth.
    pub(crate) fn site(
        &self,
        declaring_type: TypeKey,
        requester: Option<Object>,
        kind: SiteKind,
        name: &'static str,
        metadata: Marks,
        chain: ResolutionChain,
    ) -> Self {
        Self {
            declaring_type,
            requester,
            injector: self.injector.clone(),
            kind,
            name,
            metadata,
            chain,
            depth: self.depth,
        }
    }

    /// The same site, one resolution step deeper.
    pub(crate) fn descend(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    pub fn declaring_type(&self) -> TypeKey {
        self.declaring_type
    }

    pub fn requester(&self) -> Option<&Object> {
        self.requester.as_ref()
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    pub fn kind(&self) -> SiteKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn metadata(&self) -> Marks {
        self.metadata
    }

    pub fn chain(&self) -> &ResolutionChain {
        &self.chain
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Resolves `T` from within this site, keeping the resolution chain.
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.injector.provide_with::<T>(self)
    }

    pub fn resolve_opaque<T: ?Sized + 'static>(&self) -> Result<Arc<T>> {
        self.injector.provide_opaque_with::<T>(self)
    }

    pub fn resolve_object(&self, target: &Target) -> Result<Object> {
        self.injector.provide_object(target, self)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("declaring_type", &self.declaring_type)
            .field("requester", &self.requester.as_ref().map(Object::type_key))
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field("depth", &self.depth)
            .field("chain", &self.chain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Animal, Dog, Named, Owner};

    #[test]
    fn chain_is_persistent() {
        let root = ResolutionChain::new();
        let a = root.constructing(TypeKey::of::<Dog>());
        let b = a.constructing(TypeKey::of::<Owner>());

        assert!(root.is_empty());
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
        assert!(!a.is_constructing(&TypeKey::of::<Owner>()));
        assert!(b.is_constructing(&TypeKey::of::<Owner>()));
        assert_eq!(b.constructing_path(), vec![TypeKey::of::<Dog>(), TypeKey::of::<Owner>()]);
    }

    #[test]
    fn in_flight_instances_match_the_exact_type_only() {
        let dog = Object::new(Arc::new(Dog::new()));
        let chain = ResolutionChain::new()
            .constructing(TypeKey::of::<Owner>())
            .injecting(&dog);

        let found = chain.in_flight_instance(&TypeKey::of::<Dog>()).unwrap();
        assert!(found.same_instance(&dog));
        assert!(chain.in_flight_instance(&TypeKey::of::<Animal>()).is_none());
        assert!(chain.in_flight_instance(&TypeKey::of::<dyn Named>()).is_none());
        assert!(chain.in_flight_instance(&TypeKey::of::<Owner>()).is_none());
        // An injecting record never counts as a constructor in flight.
        assert!(!chain.is_constructing(&TypeKey::of::<Dog>()));
    }

    #[test]
    fn site_kind_display() {
        assert_eq!(SiteKind::Field.to_string(), "field");
        assert_eq!(SiteKind::Eager.to_string(), "eager");
    }
}
