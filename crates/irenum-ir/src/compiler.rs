//! Lowering from the IR to WebAssembly.

use std::collections::HashMap;

use irenum_core::{Error, Result};
use wasm_encoder::{
    CodeSection, ExportKind, ExportSection, FunctionSection, Instruction as WI, TypeSection,
    ValType,
};

use crate::operation::{Operation, Value};
use crate::program::{Function, Module};
use crate::types::Type;

pub struct Compiler {
    config: CompilerConfig,
}

#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Export every function under its symbol name
    pub export_functions: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            export_functions: true,
        }
    }
}

fn val_type(ty: Type) -> Result<ValType> {
    match ty {
        Type::Int(32) => Ok(ValType::I32),
        Type::Int(64) | Type::Index => Ok(ValType::I64),
        Type::Float(32) => Ok(ValType::F32),
        Type::Float(64) => Ok(ValType::F64),
        other => Err(Error::Wasm(format!("Type {} has no WASM equivalent", other))),
    }
}

/// Numeric instruction implementing `name` on operands of type `ty`
fn numeric_instruction(name: &str, ty: ValType) -> Option<WI<'static>> {
    let inst = match (name, ty) {
        ("arith.addi", ValType::I32) => WI::I32Add,
        ("arith.subi", ValType::I32) => WI::I32Sub,
        ("arith.muli", ValType::I32) => WI::I32Mul,
        ("arith.divsi", ValType::I32) => WI::I32DivS,
        ("arith.divui", ValType::I32) => WI::I32DivU,
        ("arith.remsi", ValType::I32) => WI::I32RemS,
        ("arith.remui", ValType::I32) => WI::I32RemU,
        ("arith.andi", ValType::I32) => WI::I32And,
        ("arith.ori", ValType::I32) => WI::I32Or,
        ("arith.xori", ValType::I32) => WI::I32Xor,
        ("arith.shli", ValType::I32) => WI::I32Shl,
        ("arith.shrsi", ValType::I32) => WI::I32ShrS,
        ("arith.shrui", ValType::I32) => WI::I32ShrU,

        ("arith.addi", ValType::I64) => WI::I64Add,
        ("arith.subi", ValType::I64) => WI::I64Sub,
        ("arith.muli", ValType::I64) => WI::I64Mul,
        ("arith.divsi", ValType::I64) => WI::I64DivS,
        ("arith.divui", ValType::I64) => WI::I64DivU,
        ("arith.remsi", ValType::I64) => WI::I64RemS,
        ("arith.remui", ValType::I64) => WI::I64RemU,
        ("arith.andi", ValType::I64) => WI::I64And,
        ("arith.ori", ValType::I64) => WI::I64Or,
        ("arith.xori", ValType::I64) => WI::I64Xor,
        ("arith.shli", ValType::I64) => WI::I64Shl,
        ("arith.shrsi", ValType::I64) => WI::I64ShrS,
        ("arith.shrui", ValType::I64) => WI::I64ShrU,

        ("arith.addf", ValType::F32) => WI::F32Add,
        ("arith.subf", ValType::F32) => WI::F32Sub,
        ("arith.mulf", ValType::F32) => WI::F32Mul,
        ("arith.divf", ValType::F32) => WI::F32Div,
        ("arith.addf", ValType::F64) => WI::F64Add,
        ("arith.subf", ValType::F64) => WI::F64Sub,
        ("arith.mulf", ValType::F64) => WI::F64Mul,
        ("arith.divf", ValType::F64) => WI::F64Div,

        _ => return None,
    };
    Some(inst)
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn compile(&self, module: &Module) -> Result<Vec<u8>> {
        let mut wasm = wasm_encoder::Module::new();

        // One signature per function, in function order
        let mut types = TypeSection::new();
        for func in &module.functions {
            let params = func
                .param_types()
                .into_iter()
                .map(val_type)
                .collect::<Result<Vec<_>>>()?;
            let results = func
                .result_types()
                .iter()
                .map(|&t| val_type(t))
                .collect::<Result<Vec<_>>>()?;
            types.function(params, results);
        }
        wasm.section(&types);

        let mut functions = FunctionSection::new();
        for idx in 0..module.functions.len() {
            functions.function(idx as u32);
        }
        wasm.section(&functions);

        if self.config.export_functions {
            let mut exports = ExportSection::new();
            for (idx, func) in module.functions.iter().enumerate() {
                exports.export(&func.name, ExportKind::Func, idx as u32);
            }
            wasm.section(&exports);
        }

        let mut code = CodeSection::new();
        for func in &module.functions {
            let body = self.compile_function(func)?;
            code.function(&body);
        }
        wasm.section(&code);

        Ok(wasm.finish())
    }

    fn compile_function(&self, func: &Function) -> Result<wasm_encoder::Function> {
        // Parameters are locals 0..n by position, each operation result gets
        // a fresh local after them
        let mut locals: HashMap<Value, u32> = HashMap::new();
        for (pos, &param) in func.params().iter().enumerate() {
            locals.insert(param, pos as u32);
        }

        let mut declared = Vec::new();
        let mut next = func.num_params() as u32;
        for op in func.body() {
            for &result in &op.results {
                let ty = func
                    .value_type(result)
                    .ok_or_else(|| Error::Wasm(format!("Result {:?} has no type", result)))?;
                declared.push((1, val_type(ty)?));
                locals.insert(result, next);
                next += 1;
            }
        }

        let mut wasm_func = wasm_encoder::Function::new(declared);

        for op in func.body() {
            self.compile_operation(&mut wasm_func, func, op, &locals)?;
        }

        if let Some(ret) = func.terminator() {
            self.load_operands(&mut wasm_func, &ret.operands, &locals)?;
        }
        wasm_func.instruction(&WI::End);

        Ok(wasm_func)
    }

    fn compile_operation(
        &self,
        wasm_func: &mut wasm_encoder::Function,
        func: &Function,
        op: &Operation,
        locals: &HashMap<Value, u32>,
    ) -> Result<()> {
        let [result] = op.results.as_slice() else {
            return Err(Error::Wasm(format!(
                "Operation '{}' has {} results, only single-result operations are lowered",
                op.name,
                op.results.len()
            )));
        };

        let ty = func
            .value_type(*result)
            .ok_or_else(|| Error::Wasm(format!("Result of '{}' has no type", op.name)))?;
        let inst = match numeric_instruction(&op.name, val_type(ty)?) {
            Some(inst) if op.operands.len() == 2 => inst,
            _ => {
                tracing::warn!("Operation {} on {} not supported by the WASM lowering", op.name, ty);
                return Err(Error::Wasm(format!(
                    "Unsupported operation '{}' on {}",
                    op.name, ty
                )));
            }
        };

        self.load_operands(wasm_func, &op.operands, locals)?;
        wasm_func.instruction(&inst);
        wasm_func.instruction(&WI::LocalSet(locals[result]));

        Ok(())
    }

    fn load_operands(
        &self,
        wasm_func: &mut wasm_encoder::Function,
        operands: &[Value],
        locals: &HashMap<Value, u32>,
    ) -> Result<()> {
        for operand in operands {
            let local = locals
                .get(operand)
                .ok_or_else(|| Error::Wasm(format!("Operand {:?} is not a local", operand)))?;
            wasm_func.instruction(&WI::LocalGet(*local));
        }
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}
