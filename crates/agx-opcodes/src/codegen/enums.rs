//! Enum group rendering.

use std::fmt::Write as FmtWrite;

use crate::schema::{EnumGroup, OutputConfig};

/// Render an enum group as a C enumeration plus its reflection function.
///
/// The reflection function switches over every declared enumerant and sends
/// anything else to the unreachable macro instead of returning a default.
pub fn render_enum_group(
    output: &mut String,
    group: &EnumGroup,
    config: &OutputConfig,
) -> Result<(), std::fmt::Error> {
    let prefix = &config.prefix;
    let type_name = group.type_name(prefix);

    writeln!(output, "enum {} {{", type_name)?;
    for value in &group.values {
        writeln!(output, "   {} = {},", group.enumerant(prefix, value), value.key)?;
    }
    writeln!(output, "}};")?;
    writeln!(output)?;

    writeln!(output, "static inline const char *")?;
    writeln!(output, "{}(enum {} x)", group.as_str_name(prefix), type_name)?;
    writeln!(output, "{{")?;
    writeln!(output, "    switch (x) {{")?;
    for value in &group.values {
        writeln!(
            output,
            "    case {}: return \"{}\";",
            group.enumerant(prefix, value),
            value.label
        )?;
    }
    writeln!(output, "    default: {}(\"Nonexhaustive enum\");", config.unreachable)?;
    writeln!(output, "    }}")?;
    writeln!(output, "}}")?;
    writeln!(output)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(group: &EnumGroup) -> String {
        let mut output = String::new();
        render_enum_group(&mut output, group, &OutputConfig::default()).unwrap();
        output
    }

    #[test]
    fn test_render_enum_group() {
        let group = EnumGroup::new("size", [(0, "8"), (1, "16"), (2, "32")]);
        let expected = "\
enum agx_size {
   AGX_SIZE_8 = 0,
   AGX_SIZE_16 = 1,
   AGX_SIZE_32 = 2,
};

static inline const char *
agx_size_as_str(enum agx_size x)
{
    switch (x) {
    case AGX_SIZE_8: return \"8\";
    case AGX_SIZE_16: return \"16\";
    case AGX_SIZE_32: return \"32\";
    default: UNREACHABLE(\"Nonexhaustive enum\");
    }
}

";
        assert_eq!(render(&group), expected);
    }

    #[test]
    fn test_render_keeps_original_label() {
        let group = EnumGroup::new("sr", [(48, "thread_position_in_grid.x"), (0, "core_index")]);
        let output = render(&group);

        assert!(output.contains("   AGX_SR_THREAD_POSITION_IN_GRID_X = 48,\n"));
        assert!(output.contains(
            "    case AGX_SR_THREAD_POSITION_IN_GRID_X: return \"thread_position_in_grid.x\";\n"
        ));
        // Declaration order, not key order
        let x = output.find("AGX_SR_THREAD_POSITION_IN_GRID_X =").unwrap();
        let core = output.find("AGX_SR_CORE_INDEX =").unwrap();
        assert!(x < core);
    }

    #[test]
    fn test_render_custom_macro() {
        let group = EnumGroup::new("round", [(0, "rtz"), (1, "rte")]);
        let config = OutputConfig {
            prefix: "g13".to_string(),
            unreachable: "unreachable".to_string(),
            ..OutputConfig::default()
        };
        let mut output = String::new();
        render_enum_group(&mut output, &group, &config).unwrap();

        assert!(output.contains("enum g13_round {"));
        assert!(output.contains("   G13_ROUND_RTE = 1,"));
        assert!(output.contains("g13_round_as_str(enum g13_round x)"));
        assert!(output.contains("    default: unreachable(\"Nonexhaustive enum\");"));
    }

    #[test]
    fn test_render_deterministic() {
        let group = EnumGroup::new("dim", [(0, "1d"), (1, "1d_array"), (2, "2d")]);
        assert_eq!(render(&group), render(&group.clone()));
    }
}
