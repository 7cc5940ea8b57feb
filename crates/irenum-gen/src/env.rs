//! Values available as operands at the generation cursor.

use std::collections::BTreeMap;

use irenum_ir::{Type, Value};

/// Dominating values grouped by type.
///
/// Values are kept in the order they were generated, which for parameters is
/// not their positional order in the signature: a parameter inserted at
/// position 0 late in a run still comes last here. Generation only moves
/// forward, so nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct ValueEnvironment {
    values: BTreeMap<Type, Vec<Value>>,
}

impl ValueEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_value(&mut self, value: Value, ty: Type) {
        self.values.entry(ty).or_default().push(value);
    }

    pub fn values_of_type(&self, ty: Type) -> &[Value] {
        self.values.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of recorded values over all types
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_grouped_by_type_in_record_order() {
        let mut env = ValueEnvironment::new();
        assert!(env.values_of_type(Type::I32).is_empty());

        env.record_value(Value(3), Type::I32);
        env.record_value(Value(1), Type::I64);
        env.record_value(Value(0), Type::I32);

        assert_eq!(env.values_of_type(Type::I32), &[Value(3), Value(0)]);
        assert_eq!(env.values_of_type(Type::I64), &[Value(1)]);
        assert!(env.values_of_type(Type::F32).is_empty());
        assert_eq!(env.len(), 3);
    }
}
