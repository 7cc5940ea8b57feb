//! The decision oracle seen by generators, and the guide that hands it out.

use irenum_core::Result;

use crate::path::DecisionPath;

/// Answers the decisions of a single run.
pub trait Chooser {
    /// Pick a value in `0..n`.
    ///
    /// `n == 1` is not a real decision: it always yields `0` and leaves no
    /// trace in the path. `n == 0` is an error.
    fn choose(&mut self, n: usize) -> Result<usize>;

    /// Decisions taken so far in this run
    fn path(&self) -> &DecisionPath;

    /// End the run and return its full decision path. Fails if the run made
    /// fewer decisions than the path it was seeded with.
    fn finish(self) -> Result<DecisionPath>
    where
        Self: Sized;
}

/// Produces one chooser per run until the decision space is exhausted.
pub trait Guide {
    type Chooser<'a>: Chooser
    where
        Self: 'a;

    /// `None` once every leaf has been handed out.
    fn make_chooser(&mut self) -> Option<Self::Chooser<'_>>;
}
