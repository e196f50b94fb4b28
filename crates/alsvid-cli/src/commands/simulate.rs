//! Synthesize-and-simulate command.

use anyhow::{bail, Result};
use console::style;

use alsvid_ir::{simulate, Circuit};
use alsvid_synth::SynthesisSettings;

use super::{load_program, run_backend};

/// Execute the simulate command.
pub fn execute(input: &str, pattern: &str, backend: &str) -> Result<()> {
    let program = load_program(input, 32)?;

    let mut circuit = Circuit::new();
    run_backend(backend, &mut circuit, &program, &SynthesisSettings::default())?;

    let lines = circuit.lines() as usize;
    if pattern.len() != lines {
        bail!(
            "pattern has {} bits, circuit has {} lines (constants included)",
            pattern.len(),
            lines
        );
    }

    // the pattern is written most significant line first
    let mut bits = vec![false; lines];
    for (i, ch) in pattern.chars().enumerate() {
        bits[lines - 1 - i] = match ch {
            '0' => false,
            '1' => true,
            other => bail!("invalid pattern character '{other}'"),
        };
    }

    let result = simulate(&circuit, &bits)?;

    let rendered: String = (0..lines)
        .rev()
        .map(|i| if result[i] { '1' } else { '0' })
        .collect();
    println!("{} {}", style("→").cyan().bold(), rendered);

    for line in (0..lines).rev() {
        let garbage = if circuit.garbage()[line] { " (garbage)" } else { "" };
        println!(
            "  q[{line}] {} = {}{garbage}",
            circuit.outputs()[line],
            u8::from(result[line])
        );
    }

    Ok(())
}
