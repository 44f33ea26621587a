//! Wiring a small workshop with Ligand.
//!
//! Run with `RUST_LOG=ligand=debug` to watch bindings, bootstrap and
//! resolution.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ligand::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// === Define your traits and types ===

trait Paint: Send + Sync {
    fn color(&self) -> &str;
}

struct Lacquer(String);

impl Paint for Lacquer {
    fn color(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
struct Settings {
    bays: usize,
}

/// Shared by every mechanic; built at bootstrap.
struct Workshop {
    settings: Inject<Settings>,
    mechanics: Inject<Mechanic>,
    log: Inject<Logger>,
    open_bays: AtomicUsize,
}

impl Injectable for Workshop {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Workshop>()
            .constructor(Constructor::new(|_| {
                Ok(Workshop {
                    settings: Inject::empty(),
                    mechanics: Inject::empty(),
                    log: Inject::empty(),
                    open_bays: AtomicUsize::new(0),
                })
            }))
            .inject_opaque::<Settings>("settings", |w| &w.settings)
            .inject::<Mechanic>("mechanics", |w| &w.mechanics)
            .inject_opaque::<Logger>("log", |w| &w.log)
            .post_inject("open", |workshop| {
                let bays = workshop.settings.get().map(|s| s.bays).unwrap_or_default();
                workshop.open_bays.store(bays, Ordering::SeqCst);
                if let Some(log) = workshop.log.get() {
                    log.info(format!("opened {bays} bays"));
                }
                Ok(())
            })
            .pre_destroy("close", |workshop| {
                workshop.open_bays.store(0, Ordering::SeqCst);
                if let Some(log) = workshop.log.get() {
                    log.info("closed");
                }
                Ok(())
            })
            .build()
    }
}

/// Points back at the workshop: a field cycle resolved at bootstrap.
struct Mechanic {
    workshop: Inject<Workshop>,
}

impl Injectable for Mechanic {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Mechanic>()
            .constructor(Constructor::new(|_| Ok(Mechanic { workshop: Inject::empty() })))
            .inject::<Workshop>("workshop", |m| &m.workshop)
            .build()
    }
}

struct Car {
    paint: Arc<dyn Paint>,
    mechanic: Arc<Mechanic>,
}

impl Injectable for Car {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Car>()
            .constructor(
                Constructor::new(|args| {
                    Ok(Car {
                        paint: args.get::<dyn Paint>(0)?,
                        mechanic: args.get::<Mechanic>(1)?,
                    })
                })
                .param_opaque::<dyn Paint>("paint")
                .param::<Mechanic>("mechanic")
                .injectable(),
            )
            .build()
    }
}

// === Modules ===

struct WorkshopModule;

impl Module for WorkshopModule {
    fn configure(&self, binder: &mut Binder) {
        binder.bind_opaque::<Settings>().to_value(Settings { bays: 4 });
        binder.bind::<Workshop>().to_eager_singleton::<Workshop>();
        binder.bind::<Mechanic>().to_eager_singleton::<Mechanic>();
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ligand=info")))
        .init();

    let injector = Injector::builder().module(WorkshopModule).build();
    info!(report = %injector.bootstrap_report().map(ToString::to_string).unwrap_or_default(), "Bootstrap");

    // A child injector adds the paint shop without touching the workshop.
    let paint_shop = injector.child(vec![module_fn(|binder| {
        binder
            .bind_opaque::<dyn Paint>()
            .to_value(Arc::new(Lacquer("racing green".into())) as Arc<dyn Paint>);
    })]);

    let car = paint_shop.provide::<Car>()?;
    let workshop = car.mechanic.workshop.get();
    println!("🚗 Car painted {}", car.paint.color());
    println!(
        "🔧 Mechanic works in a workshop with {} open bays",
        workshop.map(|w| w.open_bays.load(Ordering::SeqCst)).unwrap_or_default()
    );

    // The parent cannot paint.
    match injector.provide::<Car>() {
        Ok(_) => println!("unexpected: parent built a car"),
        Err(err) => println!("❌ {err}"),
    }

    let report = injector.destroy();
    println!("🧹 {report}");
    Ok(())
}
