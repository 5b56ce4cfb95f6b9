//! Fixed vocabulary and record layouts shared by every generated header.
//!
//! Nothing here comes from the schema: the schedule classes and the shape of
//! the per-opcode info record are part of the contract with the backend.

use std::fmt;

/// How an instruction interacts with the scheduler.
///
/// Declaration order is the emitted order, so `Invalid` is zero and a
/// zero-initialized info record is never mistaken for a real class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleClass {
    Invalid,
    None,
    Load,
    Store,
    Atomic,
    Coverage,
    Preload,
    Barrier,
}

impl ScheduleClass {
    pub const ALL: [ScheduleClass; 8] = [
        ScheduleClass::Invalid,
        ScheduleClass::None,
        ScheduleClass::Load,
        ScheduleClass::Store,
        ScheduleClass::Atomic,
        ScheduleClass::Coverage,
        ScheduleClass::Preload,
        ScheduleClass::Barrier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleClass::Invalid => "invalid",
            ScheduleClass::None => "none",
            ScheduleClass::Load => "load",
            ScheduleClass::Store => "store",
            ScheduleClass::Atomic => "atomic",
            ScheduleClass::Coverage => "coverage",
            ScheduleClass::Preload => "preload",
            ScheduleClass::Barrier => "barrier",
        }
    }

    /// Returns the enumerant symbol (e.g., "AGX_SCHEDULE_CLASS_LOAD").
    pub fn enumerant(self, prefix: &str) -> String {
        format!(
            "{}_SCHEDULE_CLASS_{}",
            prefix.to_uppercase(),
            self.as_str().to_uppercase()
        )
    }
}

impl fmt::Display for ScheduleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `uint64_t`
    U64,
    /// `unsigned`
    Unsigned,
    /// `bool`
    Bool,
    /// `const char *`
    CString,
    /// Nested encoding record
    Encoding,
    /// Schedule class enumeration
    ScheduleClass,
}

impl FieldType {
    /// Returns the C spelling of the type for the given symbol prefix.
    pub fn c_type(self, prefix: &str) -> String {
        match self {
            FieldType::U64 => "uint64_t".to_string(),
            FieldType::Unsigned => "unsigned".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::CString => "const char *".to_string(),
            FieldType::Encoding => ENCODING_SHAPE.c_name(prefix),
            FieldType::ScheduleClass => format!("enum {}_schedule_class", prefix),
        }
    }
}

/// One field of a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
    pub name: &'static str,
    pub ty: FieldType,
    /// Bit-field width, if the field is packed
    pub bits: Option<u8>,
}

impl FieldShape {
    const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            bits: None,
        }
    }

    const fn packed(name: &'static str, ty: FieldType, bits: u8) -> Self {
        Self {
            name,
            ty,
            bits: Some(bits),
        }
    }

    /// Returns the C member declaration without the trailing semicolon.
    pub fn declaration(&self, prefix: &str) -> String {
        let ty = self.ty.c_type(prefix);
        let sep = if ty.ends_with('*') { "" } else { " " };
        match self.bits {
            Some(bits) => format!("{ty}{sep}{} : {bits}", self.name),
            None => format!("{ty}{sep}{}", self.name),
        }
    }
}

/// Layout of a generated C struct. Shape only, never instance data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Struct name without the prefix
    pub name: &'static str,
    pub fields: &'static [FieldShape],
}

impl RecordShape {
    /// Returns the C type (e.g., "struct agx_encoding").
    pub fn c_name(&self, prefix: &str) -> String {
        format!("struct {}_{}", prefix, self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Physical encoding of an opcode: exact bits, short length, extensibility.
pub const ENCODING_SHAPE: RecordShape = RecordShape {
    name: "encoding",
    fields: &[
        FieldShape::new("exact", FieldType::U64),
        FieldShape::packed("length_short", FieldType::Unsigned, 4),
        FieldShape::packed("extensible", FieldType::Bool, 1),
    ],
};

/// Runtime-accessible info on each defined opcode.
pub const OPCODE_INFO_SHAPE: RecordShape = RecordShape {
    name: "opcode_info",
    fields: &[
        FieldShape::new("name", FieldType::CString),
        FieldShape::new("nr_srcs", FieldType::Unsigned),
        FieldShape::new("nr_dests", FieldType::Unsigned),
        FieldShape::new("immediates", FieldType::U64),
        FieldShape::new("encoding", FieldType::Encoding),
        FieldShape::new("schedule_class", FieldType::ScheduleClass),
        FieldShape::packed("is_float", FieldType::Bool, 1),
        FieldShape::packed("can_eliminate", FieldType::Bool, 1),
        FieldShape::packed("can_reorder", FieldType::Bool, 1),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_class_vocabulary() {
        assert_eq!(ScheduleClass::ALL.len(), 8);
        assert_eq!(ScheduleClass::ALL[0], ScheduleClass::Invalid);
        assert_eq!(ScheduleClass::Load.enumerant("agx"), "AGX_SCHEDULE_CLASS_LOAD");
        assert_eq!(ScheduleClass::Coverage.to_string(), "coverage");
    }

    #[test]
    fn test_field_declarations() {
        let name = OPCODE_INFO_SHAPE.field("name").unwrap();
        assert_eq!(name.declaration("agx"), "const char *name");

        let encoding = OPCODE_INFO_SHAPE.field("encoding").unwrap();
        assert_eq!(encoding.declaration("agx"), "struct agx_encoding encoding");

        let class = OPCODE_INFO_SHAPE.field("schedule_class").unwrap();
        assert_eq!(
            class.declaration("agx"),
            "enum agx_schedule_class schedule_class"
        );

        let length = ENCODING_SHAPE.field("length_short").unwrap();
        assert_eq!(length.declaration("agx"), "unsigned length_short : 4");
    }

    #[test]
    fn test_opcode_info_fields() {
        let names: Vec<_> = OPCODE_INFO_SHAPE.fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "name",
                "nr_srcs",
                "nr_dests",
                "immediates",
                "encoding",
                "schedule_class",
                "is_float",
                "can_eliminate",
                "can_reorder",
            ]
        );
    }
}
