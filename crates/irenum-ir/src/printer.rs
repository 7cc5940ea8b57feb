//! Textual form of modules, in MLIR's generic operation syntax.

use std::collections::HashMap;
use std::fmt;

use crate::operation::Value;
use crate::program::{Function, Module, Visibility};
use crate::types::Type;

/// Print names: parameters by current position, results in body order
fn value_names(func: &Function) -> HashMap<Value, String> {
    let mut names = HashMap::new();
    for (pos, &param) in func.params().iter().enumerate() {
        names.insert(param, format!("%arg{}", pos));
    }
    let mut next = 0;
    for op in func.body() {
        for &result in &op.results {
            names.insert(result, format!("%{}", next));
            next += 1;
        }
    }
    names
}

fn type_list(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn result_list(types: &[Type]) -> String {
    match types {
        [single] => single.to_string(),
        _ => format!("({})", type_list(types)),
    }
}

impl Function {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        let names = value_names(self);
        let name_of = |v: &Value| {
            names
                .get(v)
                .cloned()
                .unwrap_or_else(|| format!("<undefined {}>", v.0))
        };
        let type_of = |v: &Value| {
            self.value_type(*v)
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string())
        };

        let params = self
            .params()
            .iter()
            .map(|p| format!("{}: {}", name_of(p), type_of(p)))
            .collect::<Vec<_>>()
            .join(", ");
        let visibility = match self.visibility {
            Visibility::Private => "private ",
            Visibility::Public => "",
        };
        write!(f, "{}func.func {}@{}({})", indent, visibility, self.name, params)?;
        if !self.result_types().is_empty() {
            write!(f, " -> {}", result_list(self.result_types()))?;
        }
        writeln!(f, " {{")?;

        for op in self.body() {
            write!(f, "{}  ", indent)?;
            if !op.results.is_empty() {
                let results: Vec<_> = op.results.iter().map(name_of).collect();
                write!(f, "{} = ", results.join(", "))?;
            }
            let operands: Vec<_> = op.operands.iter().map(name_of).collect();
            let operand_types: Vec<_> = op.operands.iter().map(type_of).collect();
            let result_types: Vec<_> = op.results.iter().map(type_of).collect();
            let results = if result_types.len() == 1 {
                result_types[0].clone()
            } else {
                format!("({})", result_types.join(", "))
            };
            writeln!(
                f,
                "\"{}\"({}) : ({}) -> {}",
                op.name,
                operands.join(", "),
                operand_types.join(", "),
                results
            )?;
        }

        if let Some(ret) = self.terminator() {
            write!(f, "{}  func.return", indent)?;
            if !ret.operands.is_empty() {
                let operands: Vec<_> = ret.operands.iter().map(name_of).collect();
                let types: Vec<_> = ret.operands.iter().map(type_of).collect();
                write!(f, " {} : {}", operands.join(", "), types.join(", "))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{}}}", indent)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, "")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {{")?;
        for func in &self.functions {
            func.fmt_indented(f, "  ")?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    #[test]
    fn test_print_empty_function() {
        let mut module = Module::new();
        let mut func = Function::new("foo");
        Builder::at_end(&mut func).create_return(&[]).unwrap();
        module.add_function(func);

        let expected = "module {\n  func.func private @foo() {\n    func.return\n  }\n}\n";
        assert_eq!(module.to_string(), expected);
    }

    #[test]
    fn test_print_uses_positional_param_names() {
        let mut func = Function::new("foo");
        let mut builder = Builder::at_end(&mut func);
        let first = builder.insert_param(0, Type::I32).unwrap();
        // The second parameter goes in front of the first one
        let second = builder.insert_param(0, Type::I32).unwrap();
        let r = builder.create_operation("arith.addi", &[first, second], &[Type::I32]).unwrap();
        builder.create_operation("arith.muli", &[r[0], first], &[Type::I32]).unwrap();
        builder.create_return(&[]).unwrap();

        let expected = "\
func.func private @foo(%arg0: i32, %arg1: i32) {
  %0 = \"arith.addi\"(%arg1, %arg0) : (i32, i32) -> i32
  %1 = \"arith.muli\"(%0, %arg1) : (i32, i32) -> i32
  func.return
}
";
        assert_eq!(func.to_string(), expected);
    }

    #[test]
    fn test_print_results_and_public() {
        let mut func = Function::with_signature("bar", &[Type::I64], &[Type::I64]);
        func.visibility = Visibility::Public;
        let p = func.params()[0];
        let mut builder = Builder::at_end(&mut func);
        builder.create_operation("test.effect", &[p], &[]).unwrap();
        builder.create_return(&[p]).unwrap();

        let expected = "\
func.func @bar(%arg0: i64) -> i64 {
  \"test.effect\"(%arg0) : (i64) -> ()
  func.return %arg0 : i64
}
";
        assert_eq!(func.to_string(), expected);
    }
}
