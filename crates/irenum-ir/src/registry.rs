//! Registry of the operation kinds the generator may emit.

use irenum_core::{Error, OperationSpec, Result};
use serde::{Deserialize, Serialize};

use crate::types::Type;

/// Operand and result types of one operation kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpSignature {
    pub name: String,
    pub operand_types: Vec<Type>,
    pub result_types: Vec<Type>,
}

impl OpSignature {
    pub fn new(name: impl Into<String>, operand_types: Vec<Type>, result_types: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            operand_types,
            result_types,
        }
    }

    pub fn binary(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, vec![ty, ty], vec![ty])
    }

    pub fn num_operands(&self) -> usize {
        self.operand_types.len()
    }
}

/// Ordered, fixed set of operation kinds. The order is significant: the
/// generator picks kinds by index, so reordering the registry renumbers the
/// decision tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpRegistry {
    ops: Vec<OpSignature>,
}

impl OpRegistry {
    pub fn new(ops: Vec<OpSignature>) -> Result<Self> {
        for (i, op) in ops.iter().enumerate() {
            if ops[..i].iter().any(|other| other.name == op.name) {
                return Err(Error::Config(format!("Duplicate operation '{}'", op.name)));
            }
        }
        Ok(Self { ops })
    }

    /// `arith.addi` and `arith.muli` over `i32`
    pub fn arith() -> Self {
        Self {
            ops: vec![
                OpSignature::binary("arith.addi", Type::I32),
                OpSignature::binary("arith.muli", Type::I32),
            ],
        }
    }

    /// Build a registry from configuration entries, parsing their type names
    pub fn from_specs(specs: &[OperationSpec]) -> Result<Self> {
        let parse = |names: &[String]| -> Result<Vec<Type>> {
            names.iter().map(|n| n.parse::<Type>()).collect()
        };

        let ops = specs
            .iter()
            .map(|spec| {
                Ok(OpSignature::new(
                    spec.name.clone(),
                    parse(&spec.operands)?,
                    parse(&spec.results)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(ops)
    }

    pub fn get(&self, index: usize) -> Option<&OpSignature> {
        self.ops.get(index)
    }

    pub fn lookup(&self, name: &str) -> Option<&OpSignature> {
        self.ops.iter().find(|op| op.name == name)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpSignature> {
        self.ops.iter()
    }
}

impl Default for OpRegistry {
    fn default() -> Self {
        Self::arith()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arith_registry() {
        let registry = OpRegistry::arith();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).unwrap().name, "arith.addi");
        assert_eq!(registry.get(1).unwrap().num_operands(), 2);
        assert!(registry.get(2).is_none());
        assert_eq!(
            registry.lookup("arith.muli").unwrap().result_types,
            vec![Type::I32]
        );
    }

    #[test]
    fn test_from_specs() {
        let specs = vec![
            OperationSpec::binary("arith.addf", "f32"),
            OperationSpec {
                name: "arith.index_cast".to_string(),
                operands: vec!["i64".to_string()],
                results: vec!["index".to_string()],
            },
        ];
        let registry = OpRegistry::from_specs(&specs).unwrap();
        assert_eq!(registry.get(0).unwrap().operand_types, vec![Type::F32, Type::F32]);
        assert_eq!(registry.get(1).unwrap().result_types, vec![Type::Index]);
    }

    #[test]
    fn test_rejects_bad_specs() {
        let bad_type = vec![OperationSpec::binary("arith.addi", "int")];
        assert!(OpRegistry::from_specs(&bad_type).is_err());

        let duplicate = vec![
            OperationSpec::binary("arith.addi", "i32"),
            OperationSpec::binary("arith.addi", "i64"),
        ];
        assert!(OpRegistry::from_specs(&duplicate).is_err());
    }
}
