//! Exhaustive guide over a lazily discovered decision tree.

use std::collections::VecDeque;

use irenum_core::{Error, Result, SearchOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::chooser::{Chooser, Guide};
use crate::path::{Decision, DecisionPath};

/// Counters describing an enumeration so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideStats {
    /// Runs handed out (paths taken from the frontier)
    pub runs: u64,
    /// Decisions answered in fresh territory, i.e. first visits of a node
    pub fresh_decisions: u64,
    /// Paths pushed onto the frontier, excluding the root
    pub enqueued: u64,
    pub peak_frontier: usize,
    /// Length of the longest completed decision path
    pub deepest_path: usize,
}

/// Pending, unvisited subtrees
#[derive(Debug)]
struct Frontier {
    pending: VecDeque<DecisionPath>,
    order: SearchOrder,
    stats: GuideStats,
}

impl Frontier {
    fn new(order: SearchOrder) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(DecisionPath::root());
        Self {
            pending,
            order,
            stats: GuideStats {
                peak_frontier: 1,
                ..Default::default()
            },
        }
    }

    fn pop(&mut self) -> Option<DecisionPath> {
        match self.order {
            SearchOrder::BreadthFirst => self.pending.pop_front(),
            SearchOrder::DepthFirst => self.pending.pop_back(),
        }
    }

    /// Queue the alternatives `1..branches` of a decision taken at the end of `prefix`
    fn push_siblings(&mut self, prefix: &DecisionPath, branches: usize) {
        match self.order {
            SearchOrder::BreadthFirst => {
                for choice in 1..branches {
                    self.pending
                        .push_back(prefix.extended(Decision::new(choice, branches)));
                }
            }
            // Reversed so that the smallest alternative is popped first
            SearchOrder::DepthFirst => {
                for choice in (1..branches).rev() {
                    self.pending
                        .push_back(prefix.extended(Decision::new(choice, branches)));
                }
            }
        }
        self.stats.enqueued += (branches - 1) as u64;
        self.stats.peak_frontier = self.stats.peak_frontier.max(self.pending.len());
    }
}

/// Visits every leaf of the decision tree exactly once.
///
/// The tree must be finite and the code driven by the choosers must be
/// deterministic: the same prefix of answers must lead to the same sequence
/// of branch counts, otherwise replay fails with a consistency error.
#[derive(Debug)]
pub struct ExhaustiveGuide {
    frontier: Frontier,
}

impl ExhaustiveGuide {
    pub fn new(order: SearchOrder) -> Self {
        Self {
            frontier: Frontier::new(order),
        }
    }

    pub fn breadth_first() -> Self {
        Self::new(SearchOrder::BreadthFirst)
    }

    pub fn depth_first() -> Self {
        Self::new(SearchOrder::DepthFirst)
    }

    pub fn order(&self) -> SearchOrder {
        self.frontier.order
    }

    /// Number of paths waiting on the frontier
    pub fn pending(&self) -> usize {
        self.frontier.pending.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.frontier.pending.is_empty()
    }

    pub fn stats(&self) -> GuideStats {
        self.frontier.stats
    }
}

impl Default for ExhaustiveGuide {
    fn default() -> Self {
        Self::breadth_first()
    }
}

impl Guide for ExhaustiveGuide {
    type Chooser<'a> = FrontierChooser<'a>;

    fn make_chooser(&mut self) -> Option<FrontierChooser<'_>> {
        let seed = self.frontier.pop()?;
        self.frontier.stats.runs += 1;
        debug!(
            run = self.frontier.stats.runs,
            seed = %seed,
            pending = self.frontier.pending.len(),
            "Starting run"
        );

        Some(FrontierChooser {
            seed_len: seed.len(),
            path: seed,
            cursor: 0,
            frontier: &mut self.frontier,
        })
    }
}

/// Chooser of one exhaustive run. It replays its seed path, then answers `0`
/// to every further decision while queueing the other answers on the guide's
/// frontier.
#[derive(Debug)]
pub struct FrontierChooser<'g> {
    /// Seed followed by the fresh decisions of this run
    path: DecisionPath,
    seed_len: usize,
    cursor: usize,
    frontier: &'g mut Frontier,
}

impl FrontierChooser<'_> {
    /// True while decisions are still being replayed from the seed path
    pub fn is_replaying(&self) -> bool {
        self.cursor < self.seed_len
    }
}

impl Chooser for FrontierChooser<'_> {
    fn choose(&mut self, n: usize) -> Result<usize> {
        match n {
            0 => return Err(Error::EmptyChoice),
            1 => return Ok(0),
            _ => {}
        }

        if let Some(recorded) = self.path.get(self.cursor).filter(|_| self.is_replaying()) {
            if recorded.branches != n {
                return Err(Error::Consistency {
                    position: self.cursor,
                    expected: recorded.branches,
                    found: n,
                });
            }
            self.cursor += 1;
            trace!(choice = recorded.choice, branches = n, "Replayed decision");
            return Ok(recorded.choice);
        }

        self.frontier.push_siblings(&self.path, n);
        self.frontier.stats.fresh_decisions += 1;
        self.path.push(Decision::new(0, n));
        self.cursor += 1;
        trace!(branches = n, "Fresh decision");
        Ok(0)
    }

    fn path(&self) -> &DecisionPath {
        &self.path
    }

    fn finish(self) -> Result<DecisionPath> {
        if self.is_replaying() {
            return Err(Error::IncompleteReplay {
                consumed: self.cursor,
                recorded: self.seed_len,
            });
        }
        let stats = &mut self.frontier.stats;
        stats.deepest_path = stats.deepest_path.max(self.path.len());
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Drive `guide` to exhaustion with `body` as the decision procedure
    fn enumerate_all<F>(guide: &mut ExhaustiveGuide, mut body: F) -> Vec<Vec<usize>>
    where
        F: FnMut(&mut FrontierChooser<'_>) -> Vec<usize>,
    {
        let mut leaves = Vec::new();
        while let Some(mut chooser) = guide.make_chooser() {
            let leaf = body(&mut chooser);
            chooser.finish().unwrap();
            leaves.push(leaf);

            let stats = guide.stats();
            assert_eq!(
                guide.pending() as u64,
                1 + stats.enqueued - stats.runs,
                "frontier size must track enqueued paths minus started runs"
            );
        }
        leaves
    }

    #[test]
    fn test_fixed_tree() {
        let mut guide = ExhaustiveGuide::breadth_first();
        let leaves = enumerate_all(&mut guide, |c| {
            vec![c.choose(2).unwrap(), c.choose(3).unwrap()]
        });

        assert_eq!(leaves.len(), 6);
        let distinct: HashSet<_> = leaves.iter().cloned().collect();
        assert_eq!(distinct.len(), 6);
        assert!(guide.is_exhausted());
        assert!(guide.make_chooser().is_none());

        let stats = guide.stats();
        assert_eq!(stats.runs, 6);
        assert_eq!(stats.enqueued, 5);
        assert_eq!(stats.deepest_path, 2);
    }

    #[test]
    fn test_shape_depends_on_decisions() {
        // First decision fixes how many binary decisions follow: 1 + 2 + 4 leaves
        let mut guide = ExhaustiveGuide::depth_first();
        let leaves = enumerate_all(&mut guide, |c| {
            let count = c.choose(3).unwrap();
            let mut leaf = vec![count];
            for _ in 0..count {
                leaf.push(c.choose(2).unwrap());
            }
            leaf
        });
        assert_eq!(leaves.len(), 7);
        let distinct: HashSet<_> = leaves.iter().cloned().collect();
        assert_eq!(distinct.len(), 7);
    }

    #[test]
    fn test_single_branch_is_not_a_decision() {
        let mut guide = ExhaustiveGuide::breadth_first();
        let mut chooser = guide.make_chooser().unwrap();
        assert_eq!(chooser.choose(1).unwrap(), 0);
        assert_eq!(chooser.choose(1).unwrap(), 0);
        let path = chooser.finish().unwrap();

        assert!(path.is_empty());
        assert!(guide.is_exhausted());
        assert_eq!(guide.stats().fresh_decisions, 0);
    }

    #[test]
    fn test_empty_choice_is_an_error() {
        let mut guide = ExhaustiveGuide::breadth_first();
        let mut chooser = guide.make_chooser().unwrap();
        assert!(matches!(chooser.choose(0), Err(Error::EmptyChoice)));
    }

    #[test]
    fn test_breadth_first_order() {
        let mut guide = ExhaustiveGuide::breadth_first();
        let leaves = enumerate_all(&mut guide, |c| {
            vec![c.choose(2).unwrap(), c.choose(2).unwrap()]
        });
        assert_eq!(leaves, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn test_depth_first_order_is_lexicographic() {
        let mut guide = ExhaustiveGuide::depth_first();
        let leaves = enumerate_all(&mut guide, |c| {
            vec![c.choose(2).unwrap(), c.choose(3).unwrap()]
        });
        assert_eq!(
            leaves,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn test_branch_count_mismatch() {
        let mut guide = ExhaustiveGuide::breadth_first();

        let mut first = guide.make_chooser().unwrap();
        first.choose(2).unwrap();
        first.finish().unwrap();

        // The replayed run asks the first decision with a different width
        let mut second = guide.make_chooser().unwrap();
        assert!(second.is_replaying());
        match second.choose(3) {
            Err(Error::Consistency {
                position,
                expected,
                found,
            }) => {
                assert_eq!(position, 0);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected a consistency error, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_replay() {
        let mut guide = ExhaustiveGuide::breadth_first();

        let mut first = guide.make_chooser().unwrap();
        first.choose(2).unwrap();
        first.finish().unwrap();

        let second = guide.make_chooser().unwrap();
        assert!(matches!(
            second.finish(),
            Err(Error::IncompleteReplay {
                consumed: 0,
                recorded: 1
            })
        ));
    }

    #[test]
    fn test_finished_path_extends_seed() {
        let mut guide = ExhaustiveGuide::breadth_first();
        let mut first = guide.make_chooser().unwrap();
        first.choose(3).unwrap();
        first.finish().unwrap();

        let mut second = guide.make_chooser().unwrap();
        assert_eq!(second.choose(3).unwrap(), 1);
        assert_eq!(second.choose(2).unwrap(), 0);
        let path = second.finish().unwrap();
        assert_eq!(path.to_string(), "1/3,0/2");
    }
}
