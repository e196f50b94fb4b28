//! SyReC synthesis command.

use anyhow::Result;
use console::style;
use serde::Serialize;

use alsvid_ir::Circuit;
use alsvid_qasm::write_qasm_file;
use alsvid_synth::SynthesisSettings;

use super::{default_output, load_program, run_backend};

#[derive(Serialize)]
struct SynthStats {
    backend: String,
    lines: u32,
    gates: usize,
    quantum_cost: u64,
    transistor_cost: u64,
}

/// Execute the synth command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    backend: &str,
    main_module: Option<String>,
    default_bitwidth: u32,
    stats: bool,
) -> Result<()> {
    println!(
        "{} Synthesizing {} ({})",
        style("→").cyan().bold(),
        style(input).green(),
        style(backend).yellow()
    );

    let program = load_program(input, default_bitwidth)?;

    let settings = SynthesisSettings {
        main_module,
        ..Default::default()
    };
    let mut circuit = Circuit::new();
    run_backend(backend, &mut circuit, &program, &settings)?;

    println!(
        "{} {} lines, {} gates, quantum cost {}",
        style("✓").green().bold(),
        circuit.lines(),
        circuit.num_gates(),
        circuit.quantum_cost()
    );

    if stats {
        let record = SynthStats {
            backend: backend.into(),
            lines: circuit.lines(),
            gates: circuit.num_gates(),
            quantum_cost: circuit.quantum_cost(),
            transistor_cost: circuit.transistor_cost(),
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    let output_path = output.map_or_else(|| default_output(input, "qasm"), String::from);
    write_qasm_file(&circuit, &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}
