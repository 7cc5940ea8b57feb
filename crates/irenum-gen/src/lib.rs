//! Enumeration of small IR programs.
//!
//! [`ProgramGenerator`] turns the answers of a [`Chooser`](irenum_guide::Chooser)
//! into one function: how many operations to emit, which kind each one is,
//! and for every operand whether to reuse a dominating value or to introduce
//! a new parameter (and where in the signature to put it). Driving the
//! generator with an [`ExhaustiveGuide`](irenum_guide::ExhaustiveGuide)
//! through [`enumerate`] yields every such program exactly once.

pub mod env;
pub mod generator;
pub mod driver;

pub use env::ValueEnvironment;
pub use generator::ProgramGenerator;
pub use driver::{enumerate, replay, DriverOptions, EnumerationSummary, GeneratedProgram};
