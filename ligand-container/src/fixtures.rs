//! Shared test types: a small animal hierarchy with injected fields and
//! lifecycle hooks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::descriptor::{Constructor, Injectable, TypeDescriptor};
use crate::inject::Inject;

pub trait Named: Send + Sync {
    fn name(&self) -> String;
}

pub struct Owner {
    pub name: String,
}

impl Owner {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Injectable for Owner {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Owner>()
            .constructor(Constructor::new(|_| Ok(Owner::new("nobody"))))
            .build()
    }
}

pub struct Animal {
    pub sound: String,
    pub keeper: Inject<Owner>,
    pub breaths: AtomicUsize,
}

impl Animal {
    pub fn new(sound: &str) -> Self {
        Self {
            sound: sound.to_string(),
            keeper: Inject::empty(),
            breaths: AtomicUsize::new(0),
        }
    }
}

impl Named for Animal {
    fn name(&self) -> String {
        self.sound.clone()
    }
}

impl Injectable for Animal {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Animal>()
            .implements::<dyn Named>(|animal: Arc<Animal>| animal as Arc<dyn Named>)
            .constructor(Constructor::new(|_| Ok(Animal::new("generic"))))
            .inject::<Owner>("keeper", |animal| &animal.keeper)
            .post_inject("breathe", |animal| {
                animal.breaths.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build()
    }
}

pub struct Dog {
    pub base: Arc<Animal>,
    pub owner: Inject<Owner>,
    pub wags: AtomicUsize,
}

impl Dog {
    pub fn new() -> Self {
        Self::with_sound("woof")
    }

    pub fn with_sound(sound: &str) -> Self {
        Self {
            base: Arc::new(Animal::new(sound)),
            owner: Inject::empty(),
            wags: AtomicUsize::new(0),
        }
    }
}

impl Injectable for Dog {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Dog>()
            .extends::<Animal>(|dog| Arc::clone(&dog.base))
            .constructor(Constructor::new(|_| Ok(Dog::new())))
            .inject::<Owner>("owner", |dog| &dog.owner)
            .post_inject("wag", |dog| {
                dog.wags.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build()
    }
}

pub struct Puppy {
    pub base: Arc<Dog>,
    pub name: String,
}

impl Puppy {
    pub fn new(name: &str) -> Self {
        Self {
            base: Arc::new(Dog::with_sound("yip")),
            name: name.to_string(),
        }
    }
}

impl Injectable for Puppy {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Puppy>()
            .extends::<Dog>(|puppy| Arc::clone(&puppy.base))
            .constructor(Constructor::new(|_| Ok(Puppy::new("Rex"))))
            .build()
    }
}
