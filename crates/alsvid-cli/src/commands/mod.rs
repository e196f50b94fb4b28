//! CLI command implementations.

pub mod simulate;
pub mod synth;
pub mod table;

use anyhow::{bail, Result};

use alsvid_ir::Circuit;
use alsvid_syrec::{parse_program_with_settings, Program, ReadProgramSettings};
use alsvid_synth::{CostAwareSynthesis, LineAwareSynthesis, SynthesisSettings};

/// Load and parse a SyReC source file.
pub fn load_program(input: &str, default_bitwidth: u32) -> Result<Program> {
    let source = std::fs::read_to_string(input)?;
    let settings = ReadProgramSettings { default_bitwidth };
    Ok(parse_program_with_settings(&source, &settings)?)
}

/// Run the selected synthesis backend.
pub fn run_backend(
    backend: &str,
    circuit: &mut Circuit,
    program: &Program,
    settings: &SynthesisSettings,
) -> Result<()> {
    let ok = match backend {
        "line-aware" => LineAwareSynthesis::synthesize(circuit, program, settings),
        "cost-aware" => CostAwareSynthesis::synthesize(circuit, program, settings),
        other => bail!("unknown backend '{other}' (expected line-aware or cost-aware)"),
    };
    if !ok {
        bail!("synthesis failed");
    }
    Ok(())
}

/// Derive the default output path by swapping the extension.
pub fn default_output(input: &str, extension: &str) -> String {
    let path = std::path::Path::new(input);
    path.with_extension(extension).to_string_lossy().into_owned()
}
