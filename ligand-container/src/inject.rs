//! Injectable field cells.
//!
//! A field marked for injection is declared as [`Inject<T>`]. The cell is
//! filled after construction, while the owner may already be shared, so
//! it uses interior mutability.
//!
//! Injecting two objects into each other creates an `Arc` cycle; such
//! graphs live as long as the process unless a pre-destroy hook clears one
//! side with [`Inject::take`].

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

pub struct Inject<T: ?Sized> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Inject<T> {
    pub fn empty() -> Self {
        Self { slot: RwLock::new(None) }
    }

    /// The injected value, if injection already happened.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Replaces the current value.
    pub fn set(&self, value: Arc<T>) {
        *self.slot.write() = Some(value);
    }

    pub fn take(&self) -> Option<Arc<T>> {
        self.slot.write().take()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let cell: Inject<String> = Inject::default();
        assert!(!cell.is_set());
        assert!(cell.get().is_none());
    }

    #[test]
    fn set_replaces_and_take_clears() {
        let cell = Inject::empty();
        cell.set(Arc::new(1u32));
        cell.set(Arc::new(2u32));
        assert_eq!(cell.get().as_deref(), Some(&2));
        assert_eq!(cell.take().as_deref(), Some(&2));
        assert!(!cell.is_set());
    }

    #[test]
    fn holds_trait_objects() {
        trait Wheel: Send + Sync {
            fn size(&self) -> u8;
        }
        struct Small;
        impl Wheel for Small {
            fn size(&self) -> u8 {
                14
            }
        }

        let cell: Inject<dyn Wheel> = Inject::empty();
        cell.set(Arc::new(Small));
        assert_eq!(cell.get().map(|w| w.size()), Some(14));
    }
}
