//! C header generation from the opcode schema.
//!
//! The header is assembled from fixed sections, always in this order:
//! - License comment, include guard, and includes
//! - Schedule class enumeration
//! - One enumeration and `*_as_str` reflection function per enum group
//! - Immediate-kind flag enumeration
//! - Encoding and opcode info record definitions
//! - Opcode enumeration with its count sentinel
//! - Declaration of the externally defined opcode info table

mod enums;
mod immediates;
mod opcodes;
mod records;

use std::fmt::Write as FmtWrite;

use thiserror::Error;
use tracing::debug;

use crate::immediates::ImmediateBits;
use crate::schema::{OpcodeSchema, OutputConfig};
use crate::validation::{SchemaError, validate};

pub use enums::render_enum_group;
pub use immediates::render_immediates;
pub use opcodes::{render_info_table, render_opcodes};
pub use records::{render_records, render_schedule_classes};

/// Errors that can occur during header generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to format header: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Generate the opcode header from a schema.
///
/// The schema is validated first; on failure nothing is rendered.
pub fn generate_header(schema: &OpcodeSchema) -> Result<String, GenerateError> {
    validate(schema)?;
    let bits = ImmediateBits::allocate(&schema.immediates)?;
    let config = &schema.output;

    let mut output = String::new();
    write_prologue(&mut output, config)?;

    render_schedule_classes(&mut output, config)?;

    for group in &schema.enums {
        debug!(group = %group.name, values = group.values.len(), "rendering enum group");
        render_enum_group(&mut output, group, config)?;
    }

    debug!(count = bits.len(), "rendering immediate flags");
    render_immediates(&mut output, &bits, config)?;

    render_records(&mut output, config)?;

    debug!(count = schema.opcodes.len(), "rendering opcode enumeration");
    render_opcodes(&mut output, &schema.opcodes, config)?;
    render_info_table(&mut output, config)?;

    write_epilogue(&mut output)?;

    debug!(bytes = output.len(), "generated header");
    Ok(output)
}

/// License comment, include guard, and includes.
fn write_prologue(output: &mut String, config: &OutputConfig) -> Result<(), std::fmt::Error> {
    if config.copyright.is_some() || config.license.is_some() {
        writeln!(output, "/*")?;
        if let Some(copyright) = &config.copyright {
            writeln!(output, " * {}", copyright)?;
        }
        if let Some(license) = &config.license {
            writeln!(output, " * SPDX-License-Identifier: {}", license)?;
        }
        writeln!(output, " */")?;
        writeln!(output)?;
    }

    writeln!(output, "/* This file is auto-generated from the opcode schema. Do not edit manually. */")?;
    writeln!(output)?;

    let guard = config.guard();
    writeln!(output, "#ifndef {}", guard)?;
    writeln!(output, "#define {}", guard)?;
    writeln!(output)?;

    if !config.system_includes.is_empty() || !config.includes.is_empty() {
        for include in &config.system_includes {
            writeln!(output, "#include <{}>", include)?;
        }
        for include in &config.includes {
            writeln!(output, "#include \"{}\"", include)?;
        }
        writeln!(output)?;
    }

    Ok(())
}

fn write_epilogue(output: &mut String) -> Result<(), std::fmt::Error> {
    writeln!(output, "#endif")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EnumGroup;

    #[test]
    fn test_prologue_default() {
        let mut output = String::new();
        write_prologue(&mut output, &OutputConfig::default()).unwrap();

        assert!(!output.contains("SPDX"), "No license comment unless configured");
        assert!(output.contains("#ifndef _AGX_OPCODES_\n#define _AGX_OPCODES_\n"));
        assert!(output.contains(
            "#include <stdbool.h>\n#include <stdint.h>\n#include \"util/macros.h\"\n"
        ));
    }

    #[test]
    fn test_prologue_license() {
        let config = OutputConfig {
            copyright: Some("Copyright 2021 Alyssa Rosenzweig".to_string()),
            license: Some("MIT".to_string()),
            ..OutputConfig::default()
        };
        let mut output = String::new();
        write_prologue(&mut output, &config).unwrap();

        assert!(output.starts_with(
            "/*\n * Copyright 2021 Alyssa Rosenzweig\n * SPDX-License-Identifier: MIT\n */\n"
        ));
    }

    #[test]
    fn test_generate_rejects_before_rendering() {
        let schema = OpcodeSchema::new(["add", "add"], ["imm16"], vec![]);
        let err = generate_header(&schema).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Schema(SchemaError::DuplicateOpcode(_))
        ));
    }

    #[test]
    fn test_section_order() {
        let schema = OpcodeSchema::new(
            ["add"],
            ["imm16"],
            vec![EnumGroup::new("size", [(0, "8")])],
        );
        let header = generate_header(&schema).unwrap();

        let positions: Vec<usize> = [
            "#ifndef _AGX_OPCODES_",
            "enum agx_schedule_class {",
            "enum agx_size {",
            "agx_size_as_str(enum agx_size x)",
            "enum agx_immediate {",
            "struct agx_encoding {",
            "struct agx_opcode_info {",
            "enum agx_opcode {",
            "extern const struct agx_opcode_info agx_opcodes_info[AGX_NUM_OPCODES];",
            "#endif",
        ]
        .iter()
        .map(|needle| header.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(header.ends_with("#endif\n"));
    }
}
