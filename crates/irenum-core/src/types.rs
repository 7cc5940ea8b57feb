//! Small shared enums used across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Order in which pending decision paths are taken from the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchOrder {
    /// FIFO frontier: runs diverge from earlier runs as late as possible first.
    #[default]
    BreadthFirst,
    /// LIFO frontier: leaves are produced in lexicographic order.
    DepthFirst,
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOrder::BreadthFirst => write!(f, "breadth-first"),
            SearchOrder::DepthFirst => write!(f, "depth-first"),
        }
    }
}

impl FromStr for SearchOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bfs" | "breadth-first" => Ok(SearchOrder::BreadthFirst),
            "dfs" | "depth-first" => Ok(SearchOrder::DepthFirst),
            other => Err(Error::Config(format!("Unknown search order '{}'", other))),
        }
    }
}

/// How generated programs are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Textual IR, one module after another.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// One bincode file per program.
    Bincode,
    /// One WebAssembly binary per program.
    Wasm,
}

impl OutputFormat {
    /// Formats that write one file per program and need an output directory.
    pub fn is_per_file(&self) -> bool {
        matches!(self, OutputFormat::Bincode | OutputFormat::Wasm)
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "mlir",
            OutputFormat::Json => "jsonl",
            OutputFormat::Bincode => "bin",
            OutputFormat::Wasm => "wasm",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "bincode" => Ok(OutputFormat::Bincode),
            "wasm" => Ok(OutputFormat::Wasm),
            other => Err(Error::Config(format!("Unknown output format '{}'", other))),
        }
    }
}
