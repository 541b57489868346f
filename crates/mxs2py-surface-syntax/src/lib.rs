//! Surface-level MAXScript to Python translation.
//!
//! `mxs2py-surface-syntax` rewrites MAXScript into Python the way a careful
//! human would on a first pass: it maps syntax, not semantics. Host runtime
//! calls are routed through the `rt.` namespace of pymxs.
//!
//! # Architecture
//!
//! ```text
//!  source ──> lexer ──> normalize ──> Block engine ──> Tree ──> PythonWriter ──> text
//!                                        │
//!                                 IdentifierRegistry
//!                       (built-ins, user functions, renames)
//! ```
//!
//! The Block engine scans a flat buffer left to right and splices every
//! recognized construct (definitions, conditionals, calls, casts, arrays,
//! member chains) into a single node of the arena.
//!
//! # Example
//!
//! ```
//! use mxs2py_surface_syntax::{Classification, IdentifierRegistry, convert};
//!
//! let registry = IdentifierRegistry::new().with("print", Classification::BuiltinFunction);
//! let python = convert("if x > 0 then print x", &registry).unwrap();
//! assert_eq!(python, "if x > 0:\n\trt.print(x)");
//! ```
//!
//! # Failure
//!
//! Unbalanced brackets are absorbed and produce best-effort output. An
//! unknown `as` cast target aborts the conversion with
//! [`ConversionError::UnsupportedCast`]; any other failure is caught at
//! [`convert`] and reported as [`ConversionError::Internal`].

pub mod error;
pub mod input;
pub mod ir;
pub mod output;
pub mod registry;

pub use error::ConversionError;
pub use input::read_maxscript;
pub use ir::{CastType, Element, Node, NodeId, NodeKind, Tree};
pub use output::{PythonWriter, RenderOptions};
pub use registry::{Classification, IdentifierRegistry};

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Convert MAXScript source to Python with default rendering options.
pub fn convert(source: &str, registry: &IdentifierRegistry) -> Result<String, ConversionError> {
    convert_with(source, registry, &RenderOptions::default())
}

/// Convert MAXScript source to Python.
///
/// The registry is only read; classifications added between two calls take
/// effect on the second one.
pub fn convert_with(
    source: &str,
    registry: &IdentifierRegistry,
    options: &RenderOptions,
) -> Result<String, ConversionError> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        let tree = read_maxscript(source, registry)?;
        Ok(PythonWriter::emit(&tree, options))
    }));
    match result {
        Ok(converted) => converted,
        Err(payload) => {
            let err = ConversionError::from_panic(payload);
            tracing::error!(kind = err.kind(), error = %err, "conversion failed");
            Err(err)
        }
    }
}
