//! Structural validation of generated programs.

use std::collections::HashSet;

use irenum_core::{Error, Result};

use crate::operation::Value;
use crate::program::{Function, Module, ValueKind};
use crate::registry::OpRegistry;

/// Validate every function of a module. When a registry is given, operand
/// and result types are checked against the registered signatures.
pub fn validate_module(module: &Module, registry: Option<&OpRegistry>) -> Result<()> {
    for func in &module.functions {
        validate_function(func, registry)?;
    }
    Ok(())
}

/// Check that every operand is defined before its use, that every value is
/// defined once and that the function is terminated.
pub fn validate_function(func: &Function, registry: Option<&OpRegistry>) -> Result<()> {
    let mut defined: HashSet<Value> = HashSet::new();

    for (pos, &param) in func.params().iter().enumerate() {
        match func.value_def(param) {
            Some(def) if def.kind == ValueKind::Param => {}
            _ => {
                return Err(Error::Validation(format!(
                    "Function '{}' parameter {} is not a parameter value",
                    func.name, pos
                )))
            }
        }
        if !defined.insert(param) {
            return Err(Error::Validation(format!(
                "Function '{}' lists parameter {:?} twice",
                func.name, param
            )));
        }
    }

    for (idx, op) in func.body().iter().enumerate() {
        for (slot, operand) in op.operands.iter().enumerate() {
            if !defined.contains(operand) {
                return Err(Error::Validation(format!(
                    "Function '{}' operation {} ('{}') operand {} uses {:?} before its definition",
                    func.name, idx, op.name, slot, operand
                )));
            }
        }

        if let Some(registry) = registry {
            let signature = registry.lookup(&op.name).ok_or_else(|| {
                Error::Validation(format!(
                    "Function '{}' operation {} has unregistered kind '{}'",
                    func.name, idx, op.name
                ))
            })?;

            let operand_types: Vec<_> = op.operands.iter().map(|&v| func.value_type(v)).collect();
            let expected: Vec<_> = signature.operand_types.iter().map(|&t| Some(t)).collect();
            if operand_types != expected {
                return Err(Error::Validation(format!(
                    "Function '{}' operation {} ('{}') has operand types {:?}, expected {:?}",
                    func.name, idx, op.name, operand_types, signature.operand_types
                )));
            }

            let result_types: Vec<_> = op.results.iter().map(|&v| func.value_type(v)).collect();
            let expected: Vec<_> = signature.result_types.iter().map(|&t| Some(t)).collect();
            if result_types != expected {
                return Err(Error::Validation(format!(
                    "Function '{}' operation {} ('{}') has result types {:?}, expected {:?}",
                    func.name, idx, op.name, result_types, signature.result_types
                )));
            }
        }

        for &result in &op.results {
            let is_result = func
                .value_def(result)
                .map(|def| def.kind == ValueKind::Result)
                .unwrap_or(false);
            if !is_result || !defined.insert(result) {
                return Err(Error::Validation(format!(
                    "Function '{}' operation {} redefines or misdeclares {:?}",
                    func.name, idx, result
                )));
            }
        }
    }

    let ret = func.terminator().ok_or_else(|| {
        Error::Validation(format!("Function '{}' has no terminator", func.name))
    })?;

    for operand in &ret.operands {
        if !defined.contains(operand) {
            return Err(Error::Validation(format!(
                "Function '{}' returns {:?} before its definition",
                func.name, operand
            )));
        }
    }

    let returned: Vec<_> = ret.operands.iter().map(|&v| func.value_type(v)).collect();
    let expected: Vec<_> = func.result_types().iter().map(|&t| Some(t)).collect();
    if returned != expected {
        return Err(Error::Validation(format!(
            "Function '{}' returns {:?}, signature declares {:?}",
            func.name,
            returned,
            func.result_types()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::types::Type;

    fn single_op_function() -> Function {
        let mut func = Function::new("foo");
        let mut builder = Builder::at_end(&mut func);
        let a = builder.insert_param(0, Type::I32).unwrap();
        let b = builder.insert_param(0, Type::I32).unwrap();
        builder.create_operation("arith.addi", &[a, b], &[Type::I32]).unwrap();
        builder.create_return(&[]).unwrap();
        func
    }

    #[test]
    fn test_validate_valid_function() {
        let func = single_op_function();
        assert!(validate_function(&func, None).is_ok());
        assert!(validate_function(&func, Some(&OpRegistry::arith())).is_ok());
    }

    #[test]
    fn test_validate_missing_terminator() {
        let mut func = Function::new("foo");
        Builder::at_end(&mut func)
            .insert_param(0, Type::I32)
            .unwrap();
        assert!(validate_function(&func, None).is_err());
    }

    #[test]
    fn test_validate_use_before_definition() {
        let mut func = Function::new("foo");
        let mut builder = Builder::at_end(&mut func);
        let a = builder.insert_param(0, Type::I32).unwrap();
        let r = builder.create_operation("arith.addi", &[a, a], &[Type::I32]).unwrap();
        // Insert a user of `r` in front of its definition
        builder.set_insertion_point(0).unwrap();
        builder.create_operation("arith.muli", &[r[0], a], &[Type::I32]).unwrap();
        builder.set_insertion_point(2).unwrap();
        builder.create_return(&[]).unwrap();

        let err = validate_function(&func, None).unwrap_err();
        assert!(err.to_string().contains("before its definition"));
    }

    #[test]
    fn test_validate_against_registry() {
        let mut func = Function::new("foo");
        let mut builder = Builder::at_end(&mut func);
        let a = builder.insert_param(0, Type::I64).unwrap();
        builder.create_operation("arith.addi", &[a, a], &[Type::I64]).unwrap();
        builder.create_operation("arith.subi", &[a, a], &[Type::I64]).unwrap();
        builder.create_return(&[]).unwrap();

        // Structurally fine, but neither the types nor `arith.subi` are registered
        assert!(validate_function(&func, None).is_ok());
        assert!(validate_function(&func, Some(&OpRegistry::arith())).is_err());
    }

    #[test]
    fn test_validate_return_types() {
        let mut func = Function::with_signature("foo", &[Type::I32], &[Type::I32]);
        let param = func.params()[0];
        let mut builder = Builder::at_end(&mut func);
        builder.create_return(&[]).unwrap();
        assert!(validate_function(&func, None).is_err());

        let mut func = Function::with_signature("foo", &[Type::I32], &[Type::I32]);
        Builder::at_end(&mut func).create_return(&[param]).unwrap();
        assert!(validate_function(&func, None).is_ok());
    }

    #[test]
    fn test_validate_module() {
        let mut module = Module::new();
        module.add_function(single_op_function());
        assert!(validate_module(&module, Some(&OpRegistry::arith())).is_ok());

        module.add_function(Function::new("unterminated"));
        assert!(validate_module(&module, None).is_err());
    }
}
