//! Decision paths: the address of a node in the decision tree.

use irenum_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One answered `choose(branches)` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub choice: usize,
    pub branches: usize,
}

impl Decision {
    pub fn new(choice: usize, branches: usize) -> Self {
        Self { choice, branches }
    }
}

/// Ordered decisions of one run. Only real decisions (`branches > 1`) are
/// recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionPath {
    decisions: Vec<Decision>,
}

impl DecisionPath {
    /// The empty path, addressing the root of the tree
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_decisions(decisions: Vec<Decision>) -> Self {
        Self { decisions }
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Decision> {
        self.decisions.get(index).copied()
    }

    pub fn push(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }

    /// Copy of this path with one more decision appended
    pub fn extended(&self, decision: Decision) -> Self {
        let mut decisions = Vec::with_capacity(self.decisions.len() + 1);
        decisions.extend_from_slice(&self.decisions);
        decisions.push(decision);
        Self { decisions }
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Just the choices, without branch counts
    pub fn choices(&self) -> Vec<usize> {
        self.decisions.iter().map(|d| d.choice).collect()
    }
}

/// `choice/branches` pairs separated by commas, e.g. `1/2,0/3`
impl fmt::Display for DecisionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.decisions.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}/{}", d.choice, d.branches)?;
        }
        Ok(())
    }
}

impl FromStr for DecisionPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::root());
        }

        let decisions = s
            .split(',')
            .map(|item| {
                let invalid = || Error::Config(format!("Invalid decision '{}'", item));
                let (choice, branches) = item.trim().split_once('/').ok_or_else(invalid)?;
                let choice: usize = choice.parse().map_err(|_| invalid())?;
                let branches: usize = branches.parse().map_err(|_| invalid())?;
                if branches < 2 || choice >= branches {
                    return Err(invalid());
                }
                Ok(Decision::new(choice, branches))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self { decisions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let path = DecisionPath::from_decisions(vec![Decision::new(1, 2), Decision::new(0, 3)]);
        assert_eq!(path.to_string(), "1/2,0/3");
        assert_eq!("1/2, 0/3".parse::<DecisionPath>().unwrap(), path);
        assert_eq!(path.choices(), vec![1, 0]);

        assert_eq!(DecisionPath::root().to_string(), "");
        assert!("".parse::<DecisionPath>().unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_decisions() {
        assert!("2/2".parse::<DecisionPath>().is_err());
        assert!("0/1".parse::<DecisionPath>().is_err());
        assert!("1".parse::<DecisionPath>().is_err());
        assert!("a/3".parse::<DecisionPath>().is_err());
    }

    #[test]
    fn test_extended_leaves_original() {
        let root = DecisionPath::root();
        let child = root.extended(Decision::new(1, 4));
        assert!(root.is_empty());
        assert_eq!(child.get(0), Some(Decision::new(1, 4)));
        assert_eq!(child.get(1), None);
    }
}
