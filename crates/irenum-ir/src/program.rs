//! Functions and modules.

use irenum_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::operation::{Operation, Return, Value};
use crate::types::Type;

/// Where a value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Param,
    Result,
}

/// Entry of a function's value table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDef {
    pub ty: Type,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

/// A function with a single straight-line block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub visibility: Visibility,
    /// Parameters in positional order
    params: Vec<Value>,
    result_types: Vec<Type>,
    body: Vec<Operation>,
    terminator: Option<Return>,
    /// Every value ever defined in this function, indexed by handle
    values: Vec<ValueDef>,
}

impl Function {
    /// Create a private function with no parameters, no results and an empty body
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Private,
            params: Vec::new(),
            result_types: Vec::new(),
            body: Vec::new(),
            terminator: None,
            values: Vec::new(),
        }
    }

    pub fn with_signature(name: impl Into<String>, params: &[Type], results: &[Type]) -> Self {
        let mut func = Self::new(name);
        for &ty in params {
            let value = func.define_value(ty, ValueKind::Param);
            func.params.push(value);
        }
        func.result_types = results.to_vec();
        func
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn param_types(&self) -> Vec<Type> {
        self.params
            .iter()
            .filter_map(|&p| self.value_type(p))
            .collect()
    }

    /// Current positional index of a parameter
    pub fn param_position(&self, value: Value) -> Option<usize> {
        self.params.iter().position(|&p| p == value)
    }

    pub fn result_types(&self) -> &[Type] {
        &self.result_types
    }

    pub fn body(&self) -> &[Operation] {
        &self.body
    }

    pub fn num_operations(&self) -> usize {
        self.body.len()
    }

    pub fn terminator(&self) -> Option<&Return> {
        self.terminator.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }

    pub fn value_def(&self, value: Value) -> Option<&ValueDef> {
        self.values.get(value.index())
    }

    pub fn value_type(&self, value: Value) -> Option<Type> {
        self.value_def(value).map(|def| def.ty)
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// Insert a new parameter of type `ty` at positional `index`, shifting the
    /// parameters at and after `index` one position to the right.
    pub fn insert_param(&mut self, index: usize, ty: Type) -> Result<Value> {
        if index > self.params.len() {
            return Err(Error::Builder(format!(
                "Parameter index {} out of range for function '{}' with {} parameters",
                index,
                self.name,
                self.params.len()
            )));
        }
        let value = self.define_value(ty, ValueKind::Param);
        self.params.insert(index, value);
        Ok(value)
    }

    pub(crate) fn define_value(&mut self, ty: Type, kind: ValueKind) -> Value {
        let value = Value(self.values.len() as u32);
        self.values.push(ValueDef { ty, kind });
        value
    }

    pub(crate) fn insert_operation(&mut self, position: usize, op: Operation) -> Result<()> {
        if position > self.body.len() {
            return Err(Error::Builder(format!(
                "Insertion point {} past the end of a body with {} operations",
                position,
                self.body.len()
            )));
        }
        self.body.insert(position, op);
        Ok(())
    }

    pub(crate) fn set_terminator(&mut self, ret: Return) -> Result<()> {
        if self.terminator.is_some() {
            return Err(Error::Builder(format!(
                "Function '{}' is already terminated",
                self.name
            )));
        }
        self.terminator = Some(ret);
        Ok(())
    }
}

/// A complete generated program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, function: Function) -> usize {
        self.functions.push(function);
        self.functions.len() - 1
    }

    pub fn get_function(&self, index: usize) -> Option<&Function> {
        self.functions.get(index)
    }

    pub fn get_function_mut(&mut self, index: usize) -> Option<&mut Function> {
        self.functions.get_mut(index)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn total_operations(&self) -> usize {
        self.functions.iter().map(|f| f.num_operations()).sum()
    }

    /// Serialize the module to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a module from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
