//! Mapping decision streams onto programs.

use irenum_core::{Error, GeneratorConfig, Result};
use irenum_guide::Chooser;
use irenum_ir::{Builder, Function, Module, OpRegistry, Type, Value};
use tracing::{debug, trace};

use crate::env::ValueEnvironment;

/// Per-run state: the decisions, the cursor, and what the cursor can see
struct GenerationState<'a, 'f, C: ?Sized> {
    chooser: &'a mut C,
    builder: Builder<'f>,
    env: ValueEnvironment,
}

/// Builds one function per run from the decisions of a chooser.
///
/// The decision stream of a run is, in order: the number of operations
/// (`0..=fuel`), then per operation its kind followed by its operands left to
/// right. An operand is either one of the dominating values of its type or a
/// new parameter, in which case the insertion position in the signature is a
/// further decision. Since the same answers always produce the same calls,
/// replaying a path reproduces the program.
pub struct ProgramGenerator<'r> {
    registry: &'r OpRegistry,
    config: GeneratorConfig,
}

impl<'r> ProgramGenerator<'r> {
    pub fn new(registry: &'r OpRegistry, config: GeneratorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &OpRegistry {
        self.registry
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the program selected by `chooser`'s answers
    pub fn generate<C: Chooser + ?Sized>(&self, chooser: &mut C) -> Result<Module> {
        let mut func = Function::new(self.config.function_name.as_str());
        {
            let mut state = GenerationState {
                chooser,
                builder: Builder::at_end(&mut func),
                env: ValueEnvironment::new(),
            };

            let num_ops = state.chooser.choose(self.config.fuel + 1)?;
            for _ in 0..num_ops {
                self.add_operation(&mut state)?;
            }
            state.builder.create_return(&[])?;
        }

        debug!(
            operations = func.num_operations(),
            params = func.num_params(),
            "Generated function"
        );

        let mut module = Module::new();
        module.add_function(func);
        Ok(module)
    }

    fn add_operation<C: Chooser + ?Sized>(&self, state: &mut GenerationState<'_, '_, C>) -> Result<()> {
        let op_index = state.chooser.choose(self.registry.len())?;
        let signature = self.registry.get(op_index).ok_or_else(|| {
            Error::Other(format!(
                "Operation index {} out of range for a registry of {}",
                op_index,
                self.registry.len()
            ))
        })?;

        let mut operands = Vec::with_capacity(signature.num_operands());
        for &ty in &signature.operand_types {
            operands.push(self.get_value(state, ty)?);
        }

        let results =
            state
                .builder
                .create_operation(&signature.name, &operands, &signature.result_types)?;
        trace!(op = %signature.name, ?operands, ?results, "Added operation");

        if self.config.reuse_results {
            for (&result, &ty) in results.iter().zip(&signature.result_types) {
                state.env.record_value(result, ty);
            }
        }

        Ok(())
    }

    /// Pick an operand of type `ty`: a dominating value, or a new parameter
    fn get_value<C: Chooser + ?Sized>(
        &self,
        state: &mut GenerationState<'_, '_, C>,
        ty: Type,
    ) -> Result<Value> {
        let available = state.env.values_of_type(ty).len();
        let choice = state.chooser.choose(available + 1)?;
        if choice < available {
            return Ok(state.env.values_of_type(ty)[choice]);
        }

        // Every position in the signature is a distinct program, which makes
        // this the widest decision of a run.
        let num_params = state.builder.function().num_params();
        let index = state.chooser.choose(num_params + 1)?;
        let param = state.builder.insert_param(index, ty)?;
        state.env.record_value(param, ty);
        trace!(%ty, index, "Introduced parameter");

        Ok(param)
    }
}
