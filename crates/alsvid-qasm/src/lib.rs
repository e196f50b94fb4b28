//! OpenQASM 3 output for reversible circuits.
//!
//! Toffoli-family gates map to `x`/`cx`/`ccx`/`ctrl(k) @ x`, Fredkin
//! gates to `swap`/`cswap`/`ctrl(k) @ swap`. Ancilla and garbage line
//! metadata surfaces as comments, per-gate annotations as trailing
//! comments.

pub mod emitter;
pub mod error;

pub use emitter::emit;
pub use error::{QasmError, QasmResult};

/// Emit a circuit into a QASM file.
pub fn write_qasm_file(
    circuit: &alsvid_ir::Circuit,
    path: impl AsRef<std::path::Path>,
) -> QasmResult<()> {
    let qasm = emit(circuit)?;
    std::fs::write(path, qasm)?;
    Ok(())
}
