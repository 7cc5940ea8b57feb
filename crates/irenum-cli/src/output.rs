//! Writing enumerated programs out.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use irenum_core::{Error, OutputConfig, OutputFormat, Result};
use irenum_gen::GeneratedProgram;
use irenum_ir::Compiler;
use serde_json::json;
use tracing::debug;

enum Target {
    Stream(Box<dyn Write>),
    Directory(PathBuf),
}

pub struct ProgramSink {
    format: OutputFormat,
    print_paths: bool,
    target: Target,
    compiler: Compiler,
}

impl ProgramSink {
    pub fn new(config: &OutputConfig) -> Result<Self> {
        let target = match (&config.path, config.format.is_per_file()) {
            (Some(dir), true) => {
                fs::create_dir_all(dir)?;
                Target::Directory(dir.clone())
            }
            (None, true) => {
                return Err(Error::Config(format!(
                    "Output format {:?} needs an output directory",
                    config.format
                )))
            }
            (Some(file), false) => Target::Stream(Box::new(BufWriter::new(File::create(file)?))),
            (None, false) => Target::Stream(Box::new(BufWriter::new(io::stdout().lock()))),
        };

        Ok(Self {
            format: config.format,
            print_paths: config.print_paths,
            target,
            compiler: Compiler::default(),
        })
    }

    pub fn emit(&mut self, program: &GeneratedProgram) -> Result<()> {
        match &mut self.target {
            Target::Stream(out) => match self.format {
                OutputFormat::Json => {
                    let line = json!({
                        "index": program.index,
                        "path": program.path.to_string(),
                        "module": program.module.to_json()?,
                        "text": program.module.to_string(),
                    });
                    writeln!(out, "{}", line)?;
                }
                _ => {
                    if self.print_paths {
                        writeln!(out, "// program {} path: {}", program.index, program.path)?;
                    }
                    write!(out, "{}", program.module)?;
                }
            },
            Target::Directory(dir) => {
                let bytes = match self.format {
                    OutputFormat::Wasm => self.compiler.compile(&program.module)?,
                    _ => program.module.to_bytes()?,
                };
                let file = dir.join(format!(
                    "program_{:06}.{}",
                    program.index,
                    self.format.file_extension()
                ));
                debug!(file = %file.display(), "Writing program");
                fs::write(file, bytes)?;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<()> {
        if let Target::Stream(mut out) = self.target {
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irenum_core::GeneratorConfig;
    use irenum_gen::{replay, ProgramGenerator};
    use irenum_ir::{Module, OpRegistry};

    fn sample_program() -> GeneratedProgram {
        let registry = OpRegistry::arith();
        let generator = ProgramGenerator::new(&registry, GeneratorConfig::default());
        replay(&generator, "1/3,1/2,0/2".parse().unwrap()).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("irenum-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_text_output_with_paths() {
        let dir = scratch_dir("text");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("programs.mlir");
        let config = OutputConfig {
            format: OutputFormat::Text,
            path: Some(file.clone()),
            print_paths: true,
        };

        let mut sink = ProgramSink::new(&config).unwrap();
        sink.emit(&sample_program()).unwrap();
        sink.finish().unwrap();

        let text = fs::read_to_string(&file).unwrap();
        assert!(text.starts_with("// program 0 path: 1/3,1/2,0/2\nmodule {\n"));
        assert!(text.contains("\"arith.muli\"(%arg0, %arg0)"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bincode_output_round_trips() {
        let dir = scratch_dir("bincode");
        let config = OutputConfig {
            format: OutputFormat::Bincode,
            path: Some(dir.clone()),
            print_paths: false,
        };

        let program = sample_program();
        let mut sink = ProgramSink::new(&config).unwrap();
        sink.emit(&program).unwrap();
        sink.finish().unwrap();

        let bytes = fs::read(dir.join("program_000000.bin")).unwrap();
        assert_eq!(Module::from_bytes(&bytes).unwrap(), program.module);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_per_file_format_needs_directory() {
        let config = OutputConfig {
            format: OutputFormat::Wasm,
            path: None,
            print_paths: false,
        };
        assert!(ProgramSink::new(&config).is_err());
    }
}
