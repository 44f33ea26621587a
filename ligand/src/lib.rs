//! # Ligand — runtime dependency injection for Rust
//!
//! Constructor, field and lifecycle-method injection driven by explicit
//! type descriptors, with modules, eager singletons and child injectors.
//!
//! ```rust
//! use std::sync::Arc;
//! use ligand::prelude::*;
//!
//! struct Database {
//!     url: Inject<String>,
//! }
//!
//! impl Injectable for Database {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Database>()
//!             .constructor(Constructor::new(|_| Ok(Database { url: Inject::empty() })))
//!             .inject_opaque::<String>("url", |db| &db.url)
//!             .build()
//!     }
//! }
//!
//! let injector = Injector::new(vec![module_fn(|binder| {
//!     binder.bind_opaque::<String>().to_value(String::from("postgres://localhost"));
//!     binder.bind::<Database>().to_eager_singleton::<Database>();
//! })]);
//!
//! let db = injector.provide::<Database>().unwrap();
//! assert_eq!(db.url.get().unwrap().as_str(), "postgres://localhost");
//! ```

pub use ligand_container::*;
pub use ligand_support::*;

pub mod prelude {
    pub use ligand_container::prelude::*;
    pub use ligand_support::Logger;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::prelude::*;

    trait Wheel: Send + Sync {
        fn size(&self) -> u8;
    }

    struct Alloy;

    impl Wheel for Alloy {
        fn size(&self) -> u8 {
            18
        }
    }

    struct Engine {
        starts: AtomicUsize,
        log: Inject<Logger>,
    }

    impl Injectable for Engine {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Engine>()
                .constructor(Constructor::new(|_| {
                    Ok(Engine {
                        starts: AtomicUsize::new(0),
                        log: Inject::empty(),
                    })
                }))
                .inject_opaque::<Logger>("log", |engine| &engine.log)
                .post_inject("start", |engine| {
                    engine.starts.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .pre_destroy("stop", |engine| {
                    engine.starts.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
                .build()
        }
    }

    struct Car {
        engine: Arc<Engine>,
        wheel: Inject<dyn Wheel>,
    }

    impl Injectable for Car {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Car>()
                .constructor(
                    Constructor::new(|args| {
                        Ok(Car {
                            engine: args.get::<Engine>(0)?,
                            wheel: Inject::empty(),
                        })
                    })
                    .param::<Engine>("engine")
                    .injectable(),
                )
                .inject_opaque::<dyn Wheel>("wheel", |car| &car.wheel)
                .build()
        }
    }

    struct GarageModule;

    impl Module for GarageModule {
        fn configure(&self, binder: &mut Binder) {
            binder.bind::<Engine>().to_eager_singleton::<Engine>();
            binder.bind_opaque::<dyn Wheel>().to_value(Arc::new(Alloy) as Arc<dyn Wheel>);
        }
    }

    #[test]
    fn wires_a_small_graph() {
        let _ = tracing_subscriber::fmt().with_env_filter("ligand=debug").with_test_writer().try_init();

        let injector = Injector::builder().module(GarageModule).build();
        assert!(injector.bootstrap_report().unwrap().is_success());

        let car = injector.provide::<Car>().unwrap();
        assert_eq!(car.wheel.get().unwrap().size(), 18);
        assert_eq!(car.engine.starts.load(Ordering::SeqCst), 1);
        assert_eq!(car.engine.log.get().unwrap().name(), "Engine");
        assert!(Arc::ptr_eq(&car.engine, &injector.provide::<Engine>().unwrap()));

        let report = injector.destroy();
        assert!(report.is_success());
        assert_eq!(car.engine.starts.load(Ordering::SeqCst), 0);
    }
}
