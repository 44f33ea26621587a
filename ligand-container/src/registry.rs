//! Binding registry — the bindings visible to one injector.
//!
//! The set is populated while the injector is built and immutable
//! afterwards. Order is insertion order: inherited bindings first, then
//! each module's bindings in module order.

use tracing::{debug, trace};

use crate::binding::Binding;
use crate::descriptor::Target;
use crate::key::TypeKey;

#[derive(Debug, Clone, Default)]
pub(crate) struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `binding`, replacing any binding with the same declared type.
    ///
    /// A replaced binding keeps no position: the new one goes to the end.
    pub fn insert(&mut self, binding: Binding) {
        let before = self.bindings.len();
        self.bindings.retain(|existing| existing != &binding);
        if self.bindings.len() != before {
            debug!(key = %binding.key(), "Overriding binding");
        }
        self.bindings.push(binding);
    }

    /// A copy of this set with `bindings` inserted on top.
    pub fn overlay(&self, bindings: impl IntoIterator<Item = Binding>) -> Self {
        let mut merged = self.clone();
        for binding in bindings {
            merged.insert(binding);
        }
        merged
    }

    /// The binding that serves `target`: an exact match on the declared
    /// type first, otherwise the first compatible binding.
    pub fn find(&self, target: &Target) -> Option<&Binding> {
        let key = target.key();
        if let Some(exact) = self.bindings.iter().find(|binding| binding.key() == key) {
            return Some(exact);
        }
        let compatible = self.bindings.iter().find(|binding| binding.is_compatible_with(target));
        if let Some(binding) = compatible {
            trace!(requested = %key, bound = %binding.key(), "Using compatible binding");
        }
        compatible
    }

    /// Every binding whose declared type is assignable to `key`.
    pub fn assignable_to(&self, key: TypeKey) -> impl Iterator<Item = &Binding> + '_ {
        self.bindings.iter().filter(move |binding| binding.is_assignable_to(&key))
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.bindings.iter().any(|binding| binding.key() == *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn as_slice(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

impl FromIterator<Binding> for BindingSet {
    fn from_iter<I: IntoIterator<Item = Binding>>(iter: I) -> Self {
        BindingSet::new().overlay(iter)
    }
}
