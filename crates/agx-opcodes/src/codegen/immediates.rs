//! Immediate flag rendering.

use std::fmt::Write as FmtWrite;

use crate::immediates::ImmediateBits;
use crate::schema::{OutputConfig, normalize};

/// Render the immediate-kind flag enumeration in allocation order.
pub fn render_immediates(
    output: &mut String,
    bits: &ImmediateBits,
    config: &OutputConfig,
) -> Result<(), std::fmt::Error> {
    writeln!(output, "/* Runtime accessible info on each defined opcode */")?;
    writeln!(output)?;

    // An enum without enumerants is not valid C
    if bits.is_empty() {
        writeln!(output, "/* No immediate kinds declared */")?;
        writeln!(output)?;
        return Ok(());
    }

    let constant_prefix = config.constant_prefix();
    writeln!(output, "enum {}_immediate {{", config.prefix)?;
    for (index, (kind, _)) in bits.iter().enumerate() {
        writeln!(
            output,
            "   {}_IMMEDIATE_{} = 1ull << {},",
            constant_prefix,
            normalize(kind),
            index
        )?;
    }
    writeln!(output, "}};")?;
    writeln!(output)?;

    Ok(())
}
