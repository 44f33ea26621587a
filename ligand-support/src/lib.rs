//! # Ligand Support
//!
//! Shared utilities for the Ligand DI framework.
//!
//! This crate provides:
//! - Type name rendering for error messages and logger names
//! - The [`Logger`](logger::Logger) facility handed out by every injector

pub mod logger;
pub mod rendering;

pub use logger::Logger;
