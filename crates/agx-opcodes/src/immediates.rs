//! Immediate-kind flag allocation.
//!
//! Each immediate kind owns one bit of a 64-bit mask, assigned by position:
//! the first kind gets bit 0, the second bit 1, and so on. The per-opcode
//! `immediates` field is the OR of the bits an opcode accepts.

use std::collections::HashSet;

use crate::validation::SchemaError;

/// Width of the immediates mask in `struct *_opcode_info`.
pub const IMMEDIATE_MASK_BITS: usize = u64::BITS as usize;

/// Bit assignment for an ordered list of immediate kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmediateBits {
    kinds: Vec<String>,
}

impl ImmediateBits {
    /// Assign bit `i` to the kind at position `i`.
    ///
    /// Fails when there are 64 or more kinds, or when a kind repeats.
    pub fn allocate<S: AsRef<str>>(kinds: &[S]) -> Result<Self, SchemaError> {
        if kinds.len() >= IMMEDIATE_MASK_BITS {
            return Err(SchemaError::TooManyImmediates {
                count: kinds.len(),
                limit: IMMEDIATE_MASK_BITS,
            });
        }

        let mut seen = HashSet::new();
        for kind in kinds {
            if !seen.insert(kind.as_ref()) {
                return Err(SchemaError::DuplicateImmediate(kind.as_ref().to_string()));
            }
        }

        Ok(Self {
            kinds: kinds.iter().map(|kind| kind.as_ref().to_string()).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Returns the bit index assigned to `kind`.
    pub fn bit_index(&self, kind: &str) -> Option<u32> {
        self.kinds
            .iter()
            .position(|k| k == kind)
            .map(|index| index as u32)
    }

    /// Returns the flag value assigned to `kind`.
    pub fn bit(&self, kind: &str) -> Option<u64> {
        self.bit_index(kind).map(|index| 1u64 << index)
    }

    /// Iterate kinds with their flag values, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| (kind.as_str(), 1u64 << index))
    }

    /// Union of every allocated bit.
    pub fn used_mask(&self) -> u64 {
        // len < 64, so the shift cannot overflow
        (1u64 << self.kinds.len()) - 1
    }

    /// OR together the flags of the selected kinds.
    pub fn mask<S: AsRef<str>>(&self, kinds: &[S]) -> Result<u64, SchemaError> {
        kinds.iter().try_fold(0u64, |mask, kind| {
            self.bit(kind.as_ref())
                .map(|bit| mask | bit)
                .ok_or_else(|| SchemaError::UnknownImmediate(kind.as_ref().to_string()))
        })
    }
}
