//! Re-running a single recorded decision path.

use irenum_core::{Error, Result};
use tracing::trace;

use crate::chooser::Chooser;
use crate::path::{Decision, DecisionPath};

/// Replays a recorded path outside of any guide. Past the end of the path it
/// answers `0` without queueing alternatives, so replaying the path of a
/// finished run reproduces that run exactly.
#[derive(Debug, Clone)]
pub struct ReplayChooser {
    path: DecisionPath,
    seed_len: usize,
    cursor: usize,
}

impl ReplayChooser {
    pub fn new(seed: DecisionPath) -> Self {
        Self {
            seed_len: seed.len(),
            path: seed,
            cursor: 0,
        }
    }

    pub fn is_replaying(&self) -> bool {
        self.cursor < self.seed_len
    }
}

impl Chooser for ReplayChooser {
    fn choose(&mut self, n: usize) -> Result<usize> {
        match n {
            0 => return Err(Error::EmptyChoice),
            1 => return Ok(0),
            _ => {}
        }

        if self.is_replaying() {
            let recorded = self.path.decisions()[self.cursor];
            if recorded.branches != n {
                return Err(Error::Consistency {
                    position: self.cursor,
                    expected: recorded.branches,
                    found: n,
                });
            }
            self.cursor += 1;
            return Ok(recorded.choice);
        }

        trace!(branches = n, "Decision past the end of the replayed path");
        self.path.push(Decision::new(0, n));
        self.cursor += 1;
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
        Ok(self.path)
    }
}
