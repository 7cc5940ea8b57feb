//! Value types.

use irenum_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag of an IR value. Only equality and ordering matter to the
/// generator; the variants exist so the printer and the WASM lowering can
/// spell them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// Signless integer of the given bit width
    Int(u32),
    /// IEEE float of the given bit width (16, 32 or 64)
    Float(u32),
    Index,
}

impl Type {
    pub const I1: Type = Type::Int(1);
    pub const I32: Type = Type::Int(32);
    pub const I64: Type = Type::Int(64);
    pub const F32: Type = Type::Float(32);
    pub const F64: Type = Type::Float(64);

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int(_) | Type::Index)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int(width) => write!(f, "i{}", width),
            Type::Float(width) => write!(f, "f{}", width),
            Type::Index => write!(f, "index"),
        }
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "index" {
            return Ok(Type::Index);
        }

        let invalid = || Error::Config(format!("Invalid type '{}'", s));

        if let Some(width) = s.strip_prefix('i') {
            let width: u32 = width.parse().map_err(|_| invalid())?;
            if width == 0 {
                return Err(invalid());
            }
            return Ok(Type::Int(width));
        }

        if let Some(width) = s.strip_prefix('f') {
            return match width.parse::<u32>() {
                Ok(w @ (16 | 32 | 64)) => Ok(Type::Float(w)),
                _ => Err(invalid()),
            };
        }

        Err(invalid())
    }
}
