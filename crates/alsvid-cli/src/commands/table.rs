//! PLA truth-table synthesis command.

use anyhow::{bail, Result};
use console::style;
use serde::Serialize;

use alsvid_dd::DdSynthesizer;
use alsvid_qasm::write_qasm_file;
use alsvid_tt::read_pla_file;

use super::default_output;

#[derive(Serialize)]
struct TableStats {
    mode: String,
    inputs: usize,
    outputs: usize,
    lines: u32,
    gates: usize,
}

/// Execute the table command.
pub fn execute(input: &str, output: Option<&str>, mode: &str, stats: bool) -> Result<()> {
    println!(
        "{} Synthesizing table {} ({})",
        style("→").cyan().bold(),
        style(input).green(),
        style(mode).yellow()
    );

    let mut tt = read_pla_file(input)?;
    tt.extend();
    let inputs = tt.n_inputs();
    let outputs = tt.n_outputs();

    let circuit = match mode {
        "coding" => DdSynthesizer::synthesize_coding_techniques(&tt, true),
        "coding-compact" => DdSynthesizer::synthesize_coding_techniques(&tt, false),
        "one-pass" => DdSynthesizer::synthesize_one_pass(&tt),
        other => bail!("unknown mode '{other}' (expected coding, coding-compact or one-pass)"),
    };

    println!(
        "{} {} lines, {} gates",
        style("✓").green().bold(),
        circuit.lines(),
        circuit.num_gates()
    );

    if stats {
        let record = TableStats {
            mode: mode.into(),
            inputs,
            outputs,
            lines: circuit.lines(),
            gates: circuit.num_gates(),
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    let output_path = output.map_or_else(|| default_output(input, "qasm"), String::from);
    write_qasm_file(&circuit, &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}
