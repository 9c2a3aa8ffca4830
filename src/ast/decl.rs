//! Declarations: `Empty`, `Type`, `Field`, `Callable` (Function/Constructor/
//! Method), `Variable`, `Parameter`.

use super::{AttrId, ExprId, StmtId};
use crate::types::{InputModifier, QualifiedType, TypeId};

/// Index into `Context`'s declaration arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Auto,
    Extern,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Function,
    Constructor,
    Method,
}

#[derive(Debug, Clone)]
pub struct CallableDecl {
    pub callable_kind: CallableKind,
    pub storage_class: StorageClass,
    pub parameter_declarations: Vec<DeclId>,
    pub body: Option<StmtId>,
    /// Set for compiler-installed builtins (`discard`, struct constructors
    /// synthesized for built-in vector/matrix types, ...).
    pub is_builtin: bool,
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub storage_class: StorageClass,
    pub initializer: Option<ExprId>,
}

#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub input_modifier: InputModifier,
}

/// Variant-specific payload. See [`Decl`] for the fields every variant
/// shares.
#[derive(Debug, Clone)]
pub enum DeclKind {
    Empty,
    Type { ty: TypeId },
    Field,
    Callable(CallableDecl),
    Variable(VariableDecl),
    Parameter(ParameterDecl),
}

/// A declaration: one entry in a redeclaration chain, the root of every name
/// resolution lookup.
///
/// `name` is `None` only for `Constructor`s, which are unnamed members of a
/// struct. `first_declaration` always resolves (a fresh declaration's
/// `first_declaration` points at itself); `previous_declaration` and
/// `definition` are `None` until a later redeclaration fills them in.
#[derive(Debug, Clone)]
pub struct Decl {
    pub name: Option<String>,
    pub qualified_type: QualifiedType,
    pub first_declaration: DeclId,
    pub previous_declaration: Option<DeclId>,
    pub definition: Option<DeclId>,
    pub attributes: Vec<AttrId>,
    pub kind: DeclKind,
}

impl Decl {
    /// A declaration is lvalue-producing iff it is a Variable, or an
    /// in/inout Parameter (§3.3 invariant). Fields only produce lvalues when
    /// accessed through an lvalue expression — that rule lives in
    /// `parser/expr.rs`, not here.
    pub fn produces_lvalue(&self) -> bool {
        match &self.kind {
            DeclKind::Variable(_) => true,
            DeclKind::Parameter(p) => {
                matches!(p.input_modifier, InputModifier::In | InputModifier::Inout)
            }
            _ => false,
        }
    }

    pub fn as_callable(&self) -> Option<&CallableDecl> {
        match &self.kind {
            DeclKind::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_callable_mut(&mut self) -> Option<&mut CallableDecl> {
        match &mut self.kind {
            DeclKind::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableDecl> {
        match &self.kind {
            DeclKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<TypeId> {
        match &self.kind {
            DeclKind::Type { ty } => Some(*ty),
            _ => None,
        }
    }
}
