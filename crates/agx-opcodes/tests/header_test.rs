//! Test the header generated from the bundled opcode schema.

use agx_opcodes::{ImmediateBits, OpcodeSchema, ScheduleClass, generate_header};

fn default_header() -> (OpcodeSchema, String) {
    let schema = OpcodeSchema::load_default().expect("Failed to load schema");
    let header = generate_header(&schema).expect("Failed to generate header");
    (schema, header)
}

#[test]
fn test_license_and_guard() {
    let (_, header) = default_header();

    assert!(header.starts_with(
        "/*\n * Copyright 2021 Alyssa Rosenzweig\n * SPDX-License-Identifier: MIT\n */\n"
    ));
    assert!(header.contains("#ifndef _AGX_OPCODES_\n#define _AGX_OPCODES_\n"));
    assert!(header.ends_with("#endif\n"));
}

#[test]
fn test_every_opcode_listed() {
    let (schema, header) = default_header();

    for (index, name) in schema.opcodes.iter().enumerate() {
        let line = format!("   {} = {},\n", schema.opcode_enumerant(name), index);
        assert!(header.contains(&line), "missing {line:?}");
    }
    assert!(header.contains(&format!(
        "   AGX_NUM_OPCODES = {}\n",
        schema.opcodes.len()
    )));
    assert!(header.contains(
        "extern const struct agx_opcode_info agx_opcodes_info[AGX_NUM_OPCODES];"
    ));
}

#[test]
fn test_every_immediate_listed() {
    let (schema, header) = default_header();
    let bits = ImmediateBits::allocate(&schema.immediates).unwrap();

    for (index, (kind, bit)) in bits.iter().enumerate() {
        assert_eq!(bit, 1u64 << index);
        let line = format!("   AGX_IMMEDIATE_{} = 1ull << {},\n", kind.to_uppercase(), index);
        assert!(header.contains(&line), "missing {line:?}");
    }
}

#[test]
fn test_every_enum_reflected() {
    let (schema, header) = default_header();

    for group in &schema.enums {
        assert!(header.contains(&format!("enum {} {{", group.type_name("agx"))));
        assert!(header.contains(&format!(
            "{}(enum {} x)",
            group.as_str_name("agx"),
            group.type_name("agx")
        )));
        for value in &group.values {
            let case = format!(
                "    case {}: return \"{}\";\n",
                group.enumerant("agx", value),
                value.label
            );
            assert!(header.contains(&case), "missing {case:?}");
        }
    }

    // Dotted special register names keep their dots in the reflected string
    assert!(header.contains("    case AGX_SR_THREAD_POSITION_IN_GRID_X: return \"thread_position_in_grid.x\";\n"));
}

#[test]
fn test_schedule_classes() {
    let (_, header) = default_header();

    for class in ScheduleClass::ALL {
        assert!(header.contains(&format!("   {},\n", class.enumerant("agx"))));
    }
}

#[test]
fn test_json_schema_matches_toml() {
    let (schema, header) = default_header();

    let json = serde_json::to_string_pretty(&schema).unwrap();
    let reloaded = OpcodeSchema::from_json_str(&json).unwrap();
    assert_eq!(reloaded, schema);
    assert_eq!(generate_header(&reloaded).unwrap(), header);
}

#[test]
fn test_regenerate_is_identical() {
    let (_, first) = default_header();
    let (_, second) = default_header();
    assert_eq!(first, second);
}
