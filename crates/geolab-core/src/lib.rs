//! Core types for backend-agnostic numerical primitives
//!
//! This crate provides the dispatch layer shared by every geolab backend:
//! a registry that maps `(operation, argument types)` to an implementation
//! and picks the most specific one at call time.
//!
//! # Architecture Overview
//!
//! 1. **Values** - [`Value`] wraps any backend-native object behind an `Arc`
//! 2. **Patterns** - [`TypePattern`] and [`Signature`] describe what an
//!    implementation accepts and order implementations by specificity
//! 3. **Registry** - [`DispatchRegistry`] stores entries and resolves calls
//! 4. **Catalogue** - [`Operation`] names the shared primitives and
//!    [`ops`] offers typed wrappers for each of them
//!
//! Backend crates implement [`Backend`] and register their native types.
//!
//! # Example
//!
//! ```rust
//! use geolab_core::{CallArgs, DispatchRegistry, Returned, Signature, TypePattern, Value};
//!
//! let registry = DispatchRegistry::new();
//! registry
//!     .register("double", Signature::new([TypePattern::of::<f64>()]), |args| {
//!         Ok(Returned::single(args.arg::<f64>(0)? * 2.0))
//!     })
//!     .unwrap();
//!
//! let out = registry
//!     .call("double", &CallArgs::new([Value::new(21.0f64)]))
//!     .unwrap()
//!     .into_value()
//!     .unwrap();
//! assert_eq!(*out.get::<f64>().unwrap(), 42.0);
//! ```

pub mod dtype;
pub mod error;
pub mod literal;
pub mod operation;
pub mod ops;
pub mod options;
pub mod pattern;
pub mod registry;
pub mod value;

// Re-export core types
pub use error::{Error, Result};

pub use dtype::{DType, Element};
pub use literal::Literal;
pub use operation::Operation;
pub use options::{normalize_axis, NormOrder, QrMode, Triangle};
pub use pattern::{Signature, TypeKey, TypePattern};
pub use registry::{Ambiguity, Backend, DispatchRegistry, Implementation};
pub use value::{CallArgs, Returned, Value};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ops, Backend, CallArgs, DType, DispatchRegistry, Literal, NormOrder, Operation, QrMode,
        Result, Returned, Signature, Triangle, TypeKey, TypePattern, Value,
    };

    pub use crate::error::Error;
}
