//! Opcode enumeration and info table declaration.

use std::fmt::Write as FmtWrite;

use crate::schema::{OutputConfig, normalize};
use crate::shapes::OPCODE_INFO_SHAPE;

/// Render the opcode enumeration.
///
/// Enumerant values follow input order and the trailing `*_NUM_OPCODES`
/// sentinel equals the number of opcodes.
pub fn render_opcodes(
    output: &mut String,
    opcodes: &[String],
    config: &OutputConfig,
) -> Result<(), std::fmt::Error> {
    let constant_prefix = config.constant_prefix();

    writeln!(output, "/* Listing of opcodes */")?;
    writeln!(output)?;
    writeln!(output, "enum {}_opcode {{", config.prefix)?;
    for (index, name) in opcodes.iter().enumerate() {
        writeln!(
            output,
            "   {}_OPCODE_{} = {},",
            constant_prefix,
            normalize(name),
            index
        )?;
    }
    writeln!(output, "   {}_NUM_OPCODES = {}", constant_prefix, opcodes.len())?;
    writeln!(output, "}};")?;
    writeln!(output)?;
    Ok(())
}

/// Declare the opcode info table. It is defined and populated elsewhere.
pub fn render_info_table(output: &mut String, config: &OutputConfig) -> Result<(), std::fmt::Error> {
    writeln!(
        output,
        "extern const {} {}_opcodes_info[{}_NUM_OPCODES];",
        OPCODE_INFO_SHAPE.c_name(&config.prefix),
        config.prefix,
        config.constant_prefix()
    )?;
    writeln!(output)?;
    Ok(())
}
