//! Cursor-based construction of function bodies.

use irenum_core::{Error, Result};

use crate::operation::{Operation, Return, Value};
use crate::program::{Function, ValueKind};
use crate::types::Type;

/// Builds a function by inserting operations at a forward-moving cursor.
///
/// The cursor is an index into the body: new operations are inserted before
/// the operation currently at that index and the cursor then moves past them,
/// so consecutive insertions come out in call order.
pub struct Builder<'f> {
    func: &'f mut Function,
    cursor: usize,
}

impl<'f> Builder<'f> {
    pub fn at_start(func: &'f mut Function) -> Self {
        Self { func, cursor: 0 }
    }

    pub fn at_end(func: &'f mut Function) -> Self {
        let cursor = func.num_operations();
        Self { func, cursor }
    }

    pub fn function(&self) -> &Function {
        self.func
    }

    pub fn insertion_point(&self) -> usize {
        self.cursor
    }

    pub fn set_insertion_point(&mut self, position: usize) -> Result<()> {
        if position > self.func.num_operations() {
            return Err(Error::Builder(format!(
                "Insertion point {} past the end of a body with {} operations",
                position,
                self.func.num_operations()
            )));
        }
        self.cursor = position;
        Ok(())
    }

    /// Insert a parameter into the signature of the function being built
    pub fn insert_param(&mut self, index: usize, ty: Type) -> Result<Value> {
        self.func.insert_param(index, ty)
    }

    /// Create an operation at the cursor and return its result handles
    pub fn create_operation(
        &mut self,
        name: &str,
        operands: &[Value],
        result_types: &[Type],
    ) -> Result<Vec<Value>> {
        if let Some(unknown) = operands.iter().find(|v| self.func.value_def(**v).is_none()) {
            return Err(Error::Builder(format!(
                "Operand {:?} of '{}' is not defined in function '{}'",
                unknown, name, self.func.name
            )));
        }

        let results: Vec<Value> = result_types
            .iter()
            .map(|&ty| self.func.define_value(ty, ValueKind::Result))
            .collect();

        let op = Operation::new(name)
            .with_operands(operands.to_vec())
            .with_results(results.clone());
        self.func.insert_operation(self.cursor, op)?;
        self.cursor += 1;

        Ok(results)
    }

    /// Terminate the function. The cursor must be at the end of the body.
    pub fn create_return(&mut self, operands: &[Value]) -> Result<()> {
        if self.cursor != self.func.num_operations() {
            return Err(Error::Builder(format!(
                "Return must be the last operation, cursor is at {} of {}",
                self.cursor,
                self.func.num_operations()
            )));
        }
        if let Some(unknown) = operands.iter().find(|v| self.func.value_def(**v).is_none()) {
            return Err(Error::Builder(format!(
                "Return operand {:?} is not defined in function '{}'",
                unknown, self.func.name
            )));
        }
        self.func.set_terminator(Return::with_operands(operands.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_in_call_order() {
        let mut func = Function::new("foo");
        let mut builder = Builder::at_end(&mut func);
        let a = builder.insert_param(0, Type::I32).unwrap();

        let r0 = builder.create_operation("arith.addi", &[a, a], &[Type::I32]).unwrap();
        let r1 = builder.create_operation("arith.muli", &[a, r0[0]], &[Type::I32]).unwrap();
        builder.create_return(&[]).unwrap();

        assert_eq!(builder.insertion_point(), 2);
        assert_eq!(func.num_operations(), 2);
        assert_eq!(func.body()[0].name, "arith.addi");
        assert_eq!(func.body()[1].operands, vec![a, r0[0]]);
        assert_eq!(func.body()[1].results, r1);
        assert_eq!(func.value_def(r1[0]).unwrap().kind, ValueKind::Result);
        assert!(func.is_terminated());
    }

    #[test]
    fn test_insertion_point() {
        let mut func = Function::new("foo");
        let mut builder = Builder::at_start(&mut func);
        builder.create_operation("test.second", &[], &[]).unwrap();
        builder.set_insertion_point(0).unwrap();
        builder.create_operation("test.first", &[], &[]).unwrap();
        assert!(builder.set_insertion_point(5).is_err());

        // Return is only allowed at the end
        assert!(builder.create_return(&[]).is_err());
        builder.set_insertion_point(2).unwrap();
        builder.create_return(&[]).unwrap();

        let names: Vec<_> = func.body().iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, vec!["test.first", "test.second"]);
    }

    #[test]
    fn test_unknown_operand() {
        let mut func = Function::new("foo");
        let mut builder = Builder::at_end(&mut func);
        let result = builder.create_operation("arith.addi", &[Value(7)], &[Type::I32]);
        assert!(matches!(result, Err(Error::Builder(_))));
        assert_eq!(func.num_values(), 0);
    }
}
