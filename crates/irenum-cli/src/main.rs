//! Command-line driver: enumerate every program up to a fuel bound, or
//! regenerate a single one from its decision path.

mod output;
mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use irenum_core::{EnumerationConfig, OutputFormat, SearchOrder};
use irenum_gen::{enumerate, replay, DriverOptions, ProgramGenerator};
use irenum_guide::{DecisionPath, ExhaustiveGuide};
use irenum_ir::{validate_module, OpRegistry};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "irenum", version, about = "Enumerate all small IR programs up to a fuel bound")]
struct Args {
    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of operations per program
    #[arg(short, long)]
    fuel: Option<usize>,

    /// Frontier order: bfs or dfs
    #[arg(long)]
    order: Option<SearchOrder>,

    /// Stop after this many programs
    #[arg(long)]
    max_programs: Option<u64>,

    /// Let later operations use the results of earlier ones
    #[arg(long)]
    reuse_results: bool,

    /// Skip validating generated programs
    #[arg(long)]
    no_validate: bool,

    /// Name of the generated function
    #[arg(long)]
    function_name: Option<String>,

    /// Output format: text, json, bincode or wasm
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Output file (text, json) or directory (bincode, wasm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the decision path above each text program
    #[arg(long)]
    print_paths: bool,

    /// Regenerate only the program with this decision path, e.g. "1/2,0/2"
    #[arg(long)]
    replay: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_config(args: &Args) -> Result<EnumerationConfig> {
    let mut config = match &args.config {
        Some(path) => EnumerationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EnumerationConfig::default(),
    };

    if let Some(fuel) = args.fuel {
        config.generator.fuel = fuel;
    }
    if let Some(order) = args.order {
        config.search_order = order;
    }
    if let Some(max) = args.max_programs {
        config.max_programs = Some(max);
    }
    if args.reuse_results {
        config.generator.reuse_results = true;
    }
    if args.no_validate {
        config.validate = false;
    }
    if let Some(name) = &args.function_name {
        config.generator.function_name = name.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }
    if args.print_paths {
        config.output.print_paths = true;
    }

    config.check()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_logging(args.log_json)?;

    let config = load_config(&args)?;
    let registry = OpRegistry::from_specs(&config.operations).context("Invalid operation registry")?;
    let generator = ProgramGenerator::new(&registry, config.generator.clone());
    let mut sink = output::ProgramSink::new(&config.output)?;

    if let Some(path) = &args.replay {
        let path: DecisionPath = path.parse()?;
        info!(path = %path, "Replaying decision path");
        let program = replay(&generator, path)?;
        if config.validate {
            validate_module(&program.module, Some(&registry))?;
        }
        sink.emit(&program)?;
        sink.finish()?;
        return Ok(());
    }

    let mut guide = ExhaustiveGuide::new(config.search_order);
    let options = DriverOptions {
        max_programs: config.max_programs,
        validate: config.validate,
    };

    info!(
        fuel = config.generator.fuel,
        order = %config.search_order,
        reuse_results = config.generator.reuse_results,
        "Enumerating programs"
    );
    let summary = enumerate(&mut guide, &generator, &options, |program| sink.emit(&program))
        .context("Enumeration aborted")?;
    sink.finish()?;

    let stats = guide.stats();
    info!(
        programs = summary.programs,
        operations = summary.total_operations,
        exhausted = summary.exhausted,
        fresh_decisions = stats.fresh_decisions,
        peak_frontier = stats.peak_frontier,
        deepest_path = stats.deepest_path,
        "Done"
    );

    Ok(())
}
