//! The type family: `Void`, `Scalar`, `Vector`, `Matrix`, `Struct`, `Array`.
//!
//! Types live in [`crate::context::Context`]'s type arena and are referenced
//! everywhere else by the `Copy` index [`TypeId`], never by pointer. This is
//! the arena-of-indices rendering of the source tool's raw-pointer type graph
//! (see DESIGN.md).

use crate::ast::DeclId;
use bitflags::bitflags;

/// Index into `Context`'s type arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

bitflags! {
    /// Qualifier bitmask: `Const`, `Volatile`, `In`, `Out`. `In|Out` expresses
    /// `inout`.
    #[derive(Default)]
    pub struct Qualifiers: u8 {
        const NONE     = 0b0000;
        const CONST    = 0b0001;
        const VOLATILE = 0b0010;
        const IN       = 0b0100;
        const OUT      = 0b1000;
    }
}

/// A type paired with its qualifier bitmask.
///
/// Equality is by interned type identity plus qualifier bits; `Ord` is
/// derived so qualified types can be used as memoization keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedType {
    pub ty: TypeId,
    pub qualifiers: Qualifiers,
}

impl QualifiedType {
    pub fn new(ty: TypeId) -> Self {
        QualifiedType {
            ty,
            qualifiers: Qualifiers::NONE,
        }
    }

    pub fn with_qualifiers(ty: TypeId, qualifiers: Qualifiers) -> Self {
        QualifiedType { ty, qualifiers }
    }

    pub fn is_const(&self) -> bool {
        self.qualifiers.contains(Qualifiers::CONST)
    }

    pub fn is_volatile(&self) -> bool {
        self.qualifiers.contains(Qualifiers::VOLATILE)
    }

    /// Returns a copy of this qualified type with `CONST` set, used when
    /// member/subscript access propagates constness from the parent.
    pub fn as_const(&self) -> Self {
        QualifiedType {
            ty: self.ty,
            qualifiers: self.qualifiers | Qualifiers::CONST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Boolean,
    Integer,
    FloatingPoint,
}

/// Input modifier derived from the `In`/`Out` qualifier bits on a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputModifier {
    In,
    Inout,
    Out,
}

impl InputModifier {
    pub fn from_qualifiers(q: Qualifiers) -> Self {
        match (q.contains(Qualifiers::IN), q.contains(Qualifiers::OUT)) {
            (_, true) if q.contains(Qualifiers::IN) => InputModifier::Inout,
            (_, true) => InputModifier::Out,
            _ => InputModifier::In,
        }
    }
}

/// One member of the closed type family.
///
/// `Struct` doubles as the representation for the built-in opaque types
/// (`string`, `Texture2D`, `Texture2DMS`, `SamplerState`): those are structs
/// with no member declarations that are nonetheless marked complete.
#[derive(Debug, Clone)]
pub enum Type {
    Void,
    Scalar {
        name: String,
        kind: ScalarKind,
        is_unsigned: bool,
    },
    Vector {
        name: String,
        component_type: TypeId,
        component_count: u8,
    },
    Matrix {
        name: String,
        component_type: TypeId,
        row_count: u8,
        column_count: u8,
    },
    Struct {
        name: String,
        member_declarations: Vec<DeclId>,
        /// `false` for a forward declaration (`struct Foo;`) that has not yet
        /// been given a body; such a type is *incomplete*.
        complete: bool,
        /// Opaque built-in structs (`string`, `Texture2D`, ...) never gain
        /// fields even once "complete", and are never user-redeclarable.
        opaque: bool,
    },
    Array {
        element_type: QualifiedType,
        size: u32,
    },
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Void => "void",
            Type::Scalar { name, .. } => name,
            Type::Vector { name, .. } => name,
            Type::Matrix { name, .. } => name,
            Type::Struct { name, .. } => name,
            Type::Array { .. } => "",
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Scalar { .. })
    }

    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            Type::Scalar {
                kind: ScalarKind::Boolean,
                ..
            }
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Type::Scalar {
                kind: ScalarKind::Integer,
                ..
            }
        )
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(
            self,
            Type::Scalar {
                kind: ScalarKind::FloatingPoint,
                ..
            }
        )
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Type::Vector { .. })
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, Type::Matrix { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct { .. })
    }

    /// A struct type is incomplete iff it has no body yet. All other kinds
    /// are always complete.
    pub fn is_complete(&self) -> bool {
        match self {
            Type::Struct { complete, .. } => *complete,
            _ => true,
        }
    }
}
