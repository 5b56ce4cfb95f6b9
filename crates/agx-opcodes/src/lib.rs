//! Opcode metadata and C header generation for the AGX compiler backend.
//!
//! This crate turns a declarative opcode schema into the `agx_opcodes.h`
//! header read by the backend's scheduler, encoder and register allocator.
//!
//! # Schema format
//!
//! A schema is three ordered lists plus optional output settings:
//! - `opcodes`: opcode names; position is the enumerant value
//! - `immediates`: immediate-operand kinds; position is the flag bit
//! - `enums`: named groups of integer-keyed labels
//!
//! Example:
//! ```toml
//! opcodes = ["add", "mov"]
//! immediates = ["imm16"]
//!
//! [[enums]]
//! name = "size"
//! values = [{ key = 0, label = "8" }, { key = 1, label = "16" }]
//! ```
//!
//! Generation is a pure function of the schema: [`generate_header`] either
//! returns the complete header or a [`SchemaError`], never partial text.

pub mod codegen;
mod immediates;
pub mod schema;
mod shapes;
mod validation;

pub use codegen::{GenerateError, generate_header};
pub use immediates::{IMMEDIATE_MASK_BITS, ImmediateBits};
pub use schema::{EnumGroup, EnumValue, LoadError, OpcodeSchema, OutputConfig, ReflectionLookupError};
pub use shapes::{
    ENCODING_SHAPE, FieldShape, FieldType, OPCODE_INFO_SHAPE, RecordShape, ScheduleClass,
};
pub use validation::{MAX_ENUM_KEY, NameKind, SchemaError, validate};
