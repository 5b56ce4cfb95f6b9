//! Schedule class and record shape rendering.

use std::fmt::Write as FmtWrite;

use crate::schema::OutputConfig;
use crate::shapes::{ENCODING_SHAPE, OPCODE_INFO_SHAPE, RecordShape, ScheduleClass};

/// Render the fixed schedule class enumeration.
pub fn render_schedule_classes(
    output: &mut String,
    config: &OutputConfig,
) -> Result<(), std::fmt::Error> {
    writeln!(output, "enum {}_schedule_class {{", config.prefix)?;
    for class in ScheduleClass::ALL {
        writeln!(output, "   {},", class.enumerant(&config.prefix))?;
    }
    writeln!(output, "}};")?;
    writeln!(output)?;
    Ok(())
}

/// Render the encoding and opcode info struct definitions.
pub fn render_records(output: &mut String, config: &OutputConfig) -> Result<(), std::fmt::Error> {
    for shape in [&ENCODING_SHAPE, &OPCODE_INFO_SHAPE] {
        render_record(output, shape, &config.prefix)?;
    }
    Ok(())
}

fn render_record(
    output: &mut String,
    shape: &RecordShape,
    prefix: &str,
) -> Result<(), std::fmt::Error> {
    writeln!(output, "{} {{", shape.c_name(prefix))?;
    for field in shape.fields {
        writeln!(output, "   {};", field.declaration(prefix))?;
    }
    writeln!(output, "}};")?;
    writeln!(output)?;
    Ok(())
}
