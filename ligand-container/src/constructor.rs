//! Constructor selection.
//!
//! Two modes:
//! - **strict** (no explicit arguments): the single constructor marked
//!   injectable, else the zero-argument one
//! - **best match** (explicit arguments): the constructor of matching
//!   arity whose parameters are closest to the runtime argument types

use tracing::trace;

use crate::descriptor::{ConstructorDescriptor, TypeDescriptor};
use crate::error::{LigandError, Result};
use crate::object::Object;

/// Picks the constructor strict resolution uses.
///
/// # Errors
/// - [`LigandError::AmbiguousConstructor`] when more than one constructor
///   is marked injectable
/// - [`LigandError::NoInjectableConstructor`] when none is marked and no
///   zero-argument constructor exists
pub(crate) fn select_injectable(descriptor: &TypeDescriptor) -> Result<&ConstructorDescriptor> {
    let key = descriptor.key();
    let marked: Vec<&ConstructorDescriptor> = descriptor
        .constructors()
        .iter()
        .filter(|constructor| constructor.is_injectable())
        .collect();

    match marked.as_slice() {
        [only] => Ok(*only),
        [] => descriptor
            .constructors()
            .iter()
            .find(|constructor| constructor.params().is_empty())
            .ok_or(LigandError::NoInjectableConstructor { key }),
        many => Err(LigandError::AmbiguousConstructor {
            key,
            count: many.len(),
        }),
    }
}

/// Picks the constructor that best fits `args`.
///
/// Candidates must take exactly `args.len()` parameters. Each argument
/// adds the inheritance distance from its runtime type to the parameter
/// type; a null argument adds nothing. The lowest total wins, the
/// earliest declared on ties.
pub(crate) fn select_best_match<'a>(
    descriptor: &'a TypeDescriptor,
    args: &[Option<Object>],
) -> Result<&'a ConstructorDescriptor> {
    let mut best: Option<(u32, &ConstructorDescriptor)> = None;

    for constructor in descriptor.constructors() {
        if constructor.params().len() != args.len() {
            continue;
        }
        let Some(score) = score(constructor, args) else {
            continue;
        };
        trace!(key = %descriptor.key(), score, "Candidate constructor");
        if best.is_none_or(|(best_score, _)| score < best_score) {
            best = Some((score, constructor));
        }
    }

    best.map(|(_, constructor)| constructor)
        .ok_or(LigandError::NoSuitableConstructor {
            key: descriptor.key(),
            arity: args.len(),
        })
}

/// Total distance of `args` to the parameters, `None` if any argument is
/// not assignable.
fn score(constructor: &ConstructorDescriptor, args: &[Option<Object>]) -> Option<u32> {
    constructor
        .params()
        .iter()
        .zip(args)
        .try_fold(0, |total, (param, arg)| match arg {
            None => Some(total),
            Some(object) => object
                .descriptor()
                .distance_to(&param.target().key())
                .map(|distance| total + distance),
        })
}
