//! Primitive host kinds: booleans and the numeric family.

use std::fmt;

/// Primitive host type kinds.
///
/// These are the value-representable kinds a script number or boolean can
/// be narrowed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 11] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Get the host name of this primitive type.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// True for every kind except `Bool`.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Bool)
    }

    /// True for the eight integer kinds.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint8
                | PrimitiveKind::Uint16
                | PrimitiveKind::Uint32
                | PrimitiveKind::Uint64
        )
    }

    /// True for `Float` and `Double`.
    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// Width of the kind in bytes.
    pub const fn size(self) -> usize {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::Int8 | PrimitiveKind::Uint8 => 1,
            PrimitiveKind::Int16 | PrimitiveKind::Uint16 => 2,
            PrimitiveKind::Int32 | PrimitiveKind::Uint32 | PrimitiveKind::Float => 4,
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => 8,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
