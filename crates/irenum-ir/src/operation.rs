//! Operations and value handles.

use serde::{Deserialize, Serialize};

/// Handle to a value defined in a function: a parameter or an operation
/// result. Handles are indices into the function's value table and stay valid
/// when parameters are inserted in front of existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Value(pub u32);

impl Value {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A single operation in a function body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Fully qualified kind name, e.g. `arith.addi`
    pub name: String,
    pub operands: Vec<Value>,
    pub results: Vec<Value>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn with_operands(mut self, operands: Vec<Value>) -> Self {
        self.operands = operands;
        self
    }

    pub fn with_results(mut self, results: Vec<Value>) -> Self {
        self.results = results;
        self
    }

    /// Dialect prefix of the name (`arith` for `arith.addi`)
    pub fn dialect(&self) -> &str {
        self.name.split_once('.').map(|(d, _)| d).unwrap_or("")
    }
}

/// Function terminator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Return {
    pub operands: Vec<Value>,
}

impl Return {
    pub fn void() -> Self {
        Self::default()
    }

    pub fn with_operands(operands: Vec<Value>) -> Self {
        Self { operands }
    }
}
