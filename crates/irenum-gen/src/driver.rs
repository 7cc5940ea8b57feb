//! The enumeration loop: guide, generate, hand over, repeat.

use irenum_core::Result;
use irenum_guide::{Chooser, DecisionPath, Guide, ReplayChooser};
use irenum_ir::{validate_module, Module};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::generator::ProgramGenerator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverOptions {
    /// Stop after this many programs
    pub max_programs: Option<u64>,
    /// Validate each program against the generator's registry before handing it over
    pub validate: bool,
}

/// One enumerated program together with the decisions that produced it
#[derive(Debug, Clone)]
pub struct GeneratedProgram {
    /// Position in enumeration order, starting at 0
    pub index: u64,
    pub path: DecisionPath,
    pub module: Module,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationSummary {
    pub programs: u64,
    pub total_operations: u64,
    /// The guide ran out of work, as opposed to hitting `max_programs`
    pub exhausted: bool,
}

/// Generate programs until `guide` is exhausted or the program cap is hit,
/// passing each one to `visit`.
///
/// Any failed run stops the enumeration: skipping a program would silently
/// leave a hole in the enumerated space.
pub fn enumerate<G, F>(
    guide: &mut G,
    generator: &ProgramGenerator<'_>,
    options: &DriverOptions,
    mut visit: F,
) -> Result<EnumerationSummary>
where
    G: Guide,
    F: FnMut(GeneratedProgram) -> Result<()>,
{
    let mut summary = EnumerationSummary::default();
    info!(
        fuel = generator.config().fuel,
        operations = generator.registry().len(),
        "Starting enumeration"
    );

    loop {
        if options.max_programs.is_some_and(|max| summary.programs >= max) {
            info!(programs = summary.programs, "Program limit reached");
            break;
        }

        let Some(mut chooser) = guide.make_chooser() else {
            summary.exhausted = true;
            break;
        };

        let module = match generator.generate(&mut chooser) {
            Ok(module) => module,
            Err(e) => {
                error!(path = %chooser.path(), "Run {} failed: {}", summary.programs, e);
                return Err(e);
            }
        };
        let path = chooser.finish()?;

        if options.validate {
            if let Err(e) = validate_module(&module, Some(generator.registry())) {
                error!(path = %path, "Generated program is invalid: {}", e);
                return Err(e);
            }
        }

        debug!(index = summary.programs, path = %path, "Generated program");
        summary.total_operations += module.total_operations() as u64;
        visit(GeneratedProgram {
            index: summary.programs,
            path,
            module,
        })?;
        summary.programs += 1;
    }

    info!(
        programs = summary.programs,
        exhausted = summary.exhausted,
        "Enumeration finished"
    );
    Ok(summary)
}

/// Regenerate the single program addressed by `path`
pub fn replay(generator: &ProgramGenerator<'_>, path: DecisionPath) -> Result<GeneratedProgram> {
    let mut chooser = ReplayChooser::new(path);
    let module = generator.generate(&mut chooser)?;
    let path = chooser.finish()?;
    Ok(GeneratedProgram {
        index: 0,
        path,
        module,
    })
}
