//! Core data types for synthraster

use serde::{Deserialize, Serialize};

/// Represents pixel data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Unsigned 8-bit integer
    U8,
    /// Signed 16-bit integer
    I16,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 32-bit integer
    I32,
    /// Unsigned 32-bit integer
    U32,
    /// 32-bit floating point
    F32,
    /// 64-bit floating point
    F64,
}

impl DataType {
    /// Returns the size in bytes for this data type
    pub fn size(&self) -> usize {
        match self {
            DataType::U8 => 1,
            DataType::U16 | DataType::I16 => 2,
            DataType::U32 | DataType::I32 | DataType::F32 => 4,
            DataType::F64 => 8,
        }
    }

    /// Returns the name of this data type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::U8 => "U8",
            DataType::I16 => "I16",
            DataType::U16 => "U16",
            DataType::I32 => "I32",
            DataType::U32 => "U32",
            DataType::F32 => "F32",
            DataType::F64 => "F64",
        }
    }

    /// Returns true for floating point types
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    /// Returns true for signed integer types
    pub fn is_signed(&self) -> bool {
        matches!(self, DataType::I16 | DataType::I32)
    }

    /// Returns the common type two operands are widened to before
    /// elementwise arithmetic.
    ///
    /// Floats win over integers of the same width; mixed-signedness
    /// integers widen until both ranges are representable (F64 once the
    /// 32-bit types are exhausted).
    pub fn promote(self, other: DataType) -> DataType {
        use DataType::*;

        if self == other {
            return self;
        }
        if self == F64 || other == F64 {
            return F64;
        }
        if self == F32 || other == F32 {
            return F32;
        }

        // Both integers from here on.
        if self.is_signed() == other.is_signed() {
            return if self.size() >= other.size() { self } else { other };
        }

        let (signed, unsigned) = if self.is_signed() {
            (self, other)
        } else {
            (other, self)
        };
        if signed.size() > unsigned.size() {
            signed
        } else {
            match unsigned {
                U8 | U16 => I32,
                _ => F64,
            }
        }
    }

    /// Promotion rule for division and power: always floating point.
    pub fn promote_float(self, other: DataType) -> DataType {
        let promoted = self.promote(other);
        if promoted.is_float() {
            promoted
        } else {
            DataType::F64
        }
    }
}
