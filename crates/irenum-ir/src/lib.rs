//! In-memory IR for enumerated programs.
//!
//! The IR is deliberately small: a module holds functions, a function holds
//! typed parameters and a straight-line body of named operations closed by a
//! return. Values are arena handles, so parameters can be inserted at any
//! position without invalidating handles already held by the generator.
//!
//! Besides the data structures this crate provides the builder used to grow a
//! function at a cursor, the operation registry, a structural validator, the
//! textual printer and a lowering to WebAssembly.

pub mod types;
pub mod operation;
pub mod program;
pub mod builder;
pub mod registry;
pub mod validation;
pub mod printer;
pub mod compiler;

pub use types::Type;
pub use operation::{Operation, Return, Value};
pub use program::{Function, Module, ValueDef, ValueKind};
pub use builder::Builder;
pub use registry::{OpRegistry, OpSignature};
pub use validation::{validate_function, validate_module};
pub use compiler::{Compiler, CompilerConfig};
