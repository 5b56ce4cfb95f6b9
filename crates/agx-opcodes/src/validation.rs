//! Schema validation.

use std::collections::HashSet;
use std::fmt;

use crate::immediates::ImmediateBits;
use crate::schema::{OpcodeSchema, OutputConfig, normalize};
use crate::shapes::{ENCODING_SHAPE, OPCODE_INFO_SHAPE, ScheduleClass};
use thiserror::Error;

/// Largest enum key that is a portable C enumeration constant (`INT_MAX`).
pub const MAX_ENUM_KEY: u64 = i32::MAX as u64;

/// What kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Opcode,
    Immediate,
    EnumGroup,
    EnumLabel,
    Prefix,
    Guard,
    Macro,
    Include,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameKind::Opcode => "opcode",
            NameKind::Immediate => "immediate",
            NameKind::EnumGroup => "enum group",
            NameKind::EnumLabel => "enum label",
            NameKind::Prefix => "prefix",
            NameKind::Guard => "include guard",
            NameKind::Macro => "macro",
            NameKind::Include => "include",
        })
    }
}

/// Errors that make a schema unusable for generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("too many immediate kinds: {count} (the mask holds fewer than {limit})")]
    TooManyImmediates { count: usize, limit: usize },

    #[error("duplicate immediate kind: {0}")]
    DuplicateImmediate(String),

    #[error("unknown immediate kind: {0}")]
    UnknownImmediate(String),

    #[error("schema declares no opcodes")]
    NoOpcodes,

    #[error("empty opcode name at position {0}")]
    EmptyOpcodeName(usize),

    #[error("duplicate opcode: {0}")]
    DuplicateOpcode(String),

    #[error("duplicate enum group: {0}")]
    DuplicateEnumGroup(String),

    #[error("enum group {0} declares no values")]
    EmptyEnumGroup(String),

    #[error("duplicate key {key} in enum {group}")]
    DuplicateEnumKey { group: String, key: u64 },

    #[error("key {key} in enum {group} exceeds INT_MAX")]
    EnumKeyOutOfRange { group: String, key: u64 },

    #[error("enum group {0} redefines a built-in type")]
    ReservedEnumGroup(String),

    #[error("symbol {0} is emitted more than once")]
    SymbolCollision(String),

    #[error("duplicate label {label:?} in enum {group} (normalizes to {normalized})")]
    DuplicateEnumLabel {
        group: String,
        label: String,
        normalized: String,
    },

    #[error("malformed {kind} name: {name:?}")]
    MalformedName { kind: NameKind, name: String },
}

/// True if the normalized name only uses identifier characters.
///
/// Leading digits are accepted: every schema name is emitted behind a prefix.
fn is_symbol_part(name: &str) -> bool {
    !name.is_empty()
        && normalize(name)
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// True if the name can stand alone as a C identifier.
fn is_identifier(name: &str) -> bool {
    is_symbol_part(name)
        && !name.contains('.')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

fn check(ok: bool, kind: NameKind, name: &str) -> Result<(), SchemaError> {
    if ok {
        Ok(())
    } else {
        Err(SchemaError::MalformedName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Validate a schema before anything is rendered.
///
/// Checks run in a fixed order and the first failure is returned:
/// - Immediate kinds: fewer than 64, well-formed, unique
/// - Opcodes: at least one, non-empty, well-formed, unique after upper-casing
/// - Enum groups: well-formed unique names, non-empty, unique keys, unique
///   normalized labels, keys no larger than `INT_MAX`
/// - Output settings: prefix, guard, and macro are C identifiers
/// - Emitted symbols: no C name is defined twice across sections
pub fn validate(schema: &OpcodeSchema) -> Result<(), SchemaError> {
    let bits = ImmediateBits::allocate(&schema.immediates)?;
    let mut kinds = HashSet::new();
    for (kind, _) in bits.iter() {
        check(
            is_symbol_part(kind) && !kind.contains('.'),
            NameKind::Immediate,
            kind,
        )?;
        if !kinds.insert(normalize(kind)) {
            return Err(SchemaError::DuplicateImmediate(kind.to_string()));
        }
    }

    validate_opcodes(&schema.opcodes)?;

    let mut groups = HashSet::new();
    for group in &schema.enums {
        check(
            is_symbol_part(&group.name) && !group.name.contains('.'),
            NameKind::EnumGroup,
            &group.name,
        )?;
        if !groups.insert(group.name.to_uppercase()) {
            return Err(SchemaError::DuplicateEnumGroup(group.name.clone()));
        }
        if group.values.is_empty() {
            return Err(SchemaError::EmptyEnumGroup(group.name.clone()));
        }

        let mut keys = HashSet::new();
        let mut labels = HashSet::new();
        for value in &group.values {
            if !keys.insert(value.key) {
                return Err(SchemaError::DuplicateEnumKey {
                    group: group.name.clone(),
                    key: value.key,
                });
            }
            if value.key > MAX_ENUM_KEY {
                return Err(SchemaError::EnumKeyOutOfRange {
                    group: group.name.clone(),
                    key: value.key,
                });
            }
            check(is_symbol_part(&value.label), NameKind::EnumLabel, &value.label)?;
            let normalized = value.symbol_suffix();
            if !labels.insert(normalized.clone()) {
                return Err(SchemaError::DuplicateEnumLabel {
                    group: group.name.clone(),
                    label: value.label.clone(),
                    normalized,
                });
            }
        }
    }

    validate_output(&schema.output)?;
    validate_symbols(schema)
}

fn claim(names: &mut HashSet<String>, name: String) -> Result<(), SchemaError> {
    if names.insert(name.clone()) {
        Ok(())
    } else {
        Err(SchemaError::SymbolCollision(name))
    }
}

/// Check every emitted name against every other, in header order.
///
/// Enum and struct tags share one C namespace; enumerants, functions, the
/// info table, and macros share the other.
fn validate_symbols(schema: &OpcodeSchema) -> Result<(), SchemaError> {
    let config = &schema.output;
    let prefix = &config.prefix;
    let constant_prefix = config.constant_prefix();

    let mut tags: HashSet<String> = [
        "schedule_class",
        "immediate",
        "opcode",
        ENCODING_SHAPE.name,
        OPCODE_INFO_SHAPE.name,
    ]
    .iter()
    .map(|name| format!("{prefix}_{name}"))
    .collect();
    for group in &schema.enums {
        if !tags.insert(group.type_name(prefix)) {
            return Err(SchemaError::ReservedEnumGroup(group.name.clone()));
        }
    }

    let mut names = HashSet::new();
    claim(&mut names, config.guard())?;
    claim(&mut names, config.unreachable.clone())?;
    claim(&mut names, format!("{prefix}_opcodes_info"))?;
    for class in ScheduleClass::ALL {
        claim(&mut names, class.enumerant(prefix))?;
    }
    for group in &schema.enums {
        claim(&mut names, group.as_str_name(prefix))?;
        for value in &group.values {
            claim(&mut names, group.enumerant(prefix, value))?;
        }
    }
    for kind in &schema.immediates {
        claim(&mut names, format!("{constant_prefix}_IMMEDIATE_{}", normalize(kind)))?;
    }
    for opcode in &schema.opcodes {
        claim(&mut names, schema.opcode_enumerant(opcode))?;
    }
    claim(&mut names, schema.sentinel())
}

fn validate_opcodes(opcodes: &[String]) -> Result<(), SchemaError> {
    if opcodes.is_empty() {
        return Err(SchemaError::NoOpcodes);
    }

    let mut seen = HashSet::new();
    for (index, name) in opcodes.iter().enumerate() {
        if name.is_empty() {
            return Err(SchemaError::EmptyOpcodeName(index));
        }
        check(
            is_symbol_part(name) && !name.contains('.'),
            NameKind::Opcode,
            name,
        )?;
        if !seen.insert(normalize(name)) {
            return Err(SchemaError::DuplicateOpcode(name.clone()));
        }
    }
    Ok(())
}

fn validate_output(config: &OutputConfig) -> Result<(), SchemaError> {
    check(is_identifier(&config.prefix), NameKind::Prefix, &config.prefix)?;
    let guard = config.guard();
    check(is_identifier(&guard), NameKind::Guard, &guard)?;
    check(
        is_identifier(&config.unreachable),
        NameKind::Macro,
        &config.unreachable,
    )?;

    for include in config.system_includes.iter().chain(&config.includes) {
        let ok = !include.is_empty()
            && !include.contains(|c: char| matches!(c, '<' | '>' | '"' | '\n' | '\r'));
        check(ok, NameKind::Include, include)?;
    }
    Ok(())
}
