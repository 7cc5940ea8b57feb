//! Configuration types for enumeration runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{OutputFormat, SearchOrder};
use crate::{Error, Result};

/// Parameters of the program generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum number of operations in one generated function
    pub fuel: usize,
    /// Symbol name of the generated function
    pub function_name: String,
    /// Make operation results available as operands of later operations
    pub reuse_results: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fuel: 2,
            function_name: "foo".to_string(),
            reuse_results: false,
        }
    }
}

/// One entry of the operation registry, with types spelled as in the IR text
/// (`i32`, `f64`, `index`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    pub operands: Vec<String>,
    pub results: Vec<String>,
}

impl OperationSpec {
    /// A two-operand, one-result operation over a single type
    pub fn binary(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            operands: vec![ty.to_string(), ty.to_string()],
            results: vec![ty.to_string()],
        }
    }
}

/// Where and how programs are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Output directory for per-file formats, or the file that text and JSON
    /// output go to instead of stdout
    pub path: Option<PathBuf>,
    /// Prefix every text program with its decision path
    pub print_paths: bool,
}

/// Top-level configuration of one enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    pub search_order: SearchOrder,
    /// Stop after this many programs
    pub max_programs: Option<u64>,
    /// Run the structural validator on every generated program
    pub validate: bool,
    pub generator: GeneratorConfig,
    /// Ordered operation registry; the order fixes the decision numbering
    pub operations: Vec<OperationSpec>,
    pub output: OutputConfig,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            search_order: SearchOrder::default(),
            max_programs: None,
            validate: true,
            generator: GeneratorConfig::default(),
            operations: vec![
                OperationSpec::binary("arith.addi", "i32"),
                OperationSpec::binary("arith.muli", "i32"),
            ],
            output: OutputConfig::default(),
        }
    }
}

impl EnumerationConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.check()?;
        Ok(config)
    }

    /// Reject configurations that cannot drive an enumeration
    pub fn check(&self) -> Result<()> {
        if self.operations.is_empty() && self.generator.fuel > 0 {
            return Err(Error::Config(
                "At least one operation is required when fuel is non-zero".to_string(),
            ));
        }

        if self.generator.function_name.is_empty() {
            return Err(Error::Config("Function name must not be empty".to_string()));
        }

        if self.output.format.is_per_file() && self.output.path.is_none() {
            return Err(Error::Config(format!(
                "Output format {:?} writes one file per program and needs an output directory",
                self.output.format
            )));
        }

        Ok(())
    }
}
