//! Systematic traversal of decision trees.
//!
//! A program generator consumes decisions through a [`Chooser`], one
//! `choose(n)` call at a time. The decision tree those calls describe is never
//! built up front: a [`Guide`] discovers it run by run. Each run replays a
//! pending path from the guide's frontier and then keeps answering `0` while
//! queueing every alternative it did not take, so that across all runs every
//! leaf is visited exactly once.
//!
//! ```
//! use irenum_guide::{Chooser, ExhaustiveGuide, Guide};
//!
//! let mut guide = ExhaustiveGuide::breadth_first();
//! let mut leaves = Vec::new();
//! while let Some(mut chooser) = guide.make_chooser() {
//!     let a = chooser.choose(2).unwrap();
//!     let b = chooser.choose(3).unwrap();
//!     leaves.push((a, b));
//!     chooser.finish().unwrap();
//! }
//! assert_eq!(leaves.len(), 6);
//! ```

pub mod path;
pub mod chooser;
pub mod exhaustive;
pub mod replay;

pub use path::{Decision, DecisionPath};
pub use chooser::{Chooser, Guide};
pub use exhaustive::{ExhaustiveGuide, FrontierChooser, GuideStats};
pub use replay::ReplayChooser;
