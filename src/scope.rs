//! `DeclarationScopes`: a stack of scopes used for name resolution, plus
//! overload resolution over that stack (§4.4.4, §4.5).

use crate::ast::decl::DeclKind;
use crate::ast::DeclId;
use crate::context::Context;
use crate::error::{ParseError, Position};
use crate::types::TypeId;

/// A stack of scopes, each a sequence of declarations in source order.
/// Lookup scans from innermost to outermost; within a scope, newest-first,
/// so a later declaration shadows an earlier one with the same name (§4.4).
pub struct Scopes {
    stack: Vec<Vec<DeclId>>,
}

impl Scopes {
    pub fn new() -> Self {
        Scopes {
            stack: vec![Vec::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.stack.push(Vec::new());
    }

    pub fn pop_scope(&mut self) {
        self.stack.pop();
    }

    /// Opens a new scope and returns a guard that closes it again when
    /// dropped — guaranteed on every exit path out of a compound statement or
    /// parameter list, including error paths, per §5's resource discipline.
    pub fn enter(&mut self) -> ScopeGuard<'_> {
        self.push_scope();
        ScopeGuard { scopes: self }
    }

    pub fn declare(&mut self, id: DeclId) {
        self.stack
            .last_mut()
            .expect("at least the root scope is always present")
            .push(id);
    }

    /// Does `name` already exist in the *innermost* scope? Used to detect
    /// redefinition-within-one-scope (§4.5).
    pub fn find_in_current_scope<'c>(&self, ctx: &'c Context, name: &str) -> Option<DeclId> {
        self.stack.last().and_then(|scope| {
            scope
                .iter()
                .rev()
                .find(|&&id| ctx.decl(id).name.as_deref() == Some(name))
                .copied()
        })
    }

    pub fn find_declaration(&self, ctx: &Context, name: &str) -> Option<DeclId> {
        for scope in self.stack.iter().rev() {
            if let Some(id) = scope
                .iter()
                .rev()
                .find(|&&id| ctx.decl(id).name.as_deref() == Some(name))
            {
                return Some(*id);
            }
        }
        None
    }

    pub fn find_type(&self, ctx: &Context, name: &str) -> Option<TypeId> {
        self.find_declaration(ctx, name)
            .and_then(|id| ctx.decl(id).as_type())
    }

    /// Every function declaration visible under `name`, deduplicated on
    /// `first_declaration` (so redeclarations of one entity count once).
    fn collect_function_candidates(&self, ctx: &Context, name: &str) -> Vec<DeclId> {
        let mut seen = Vec::new();
        let mut out = Vec::new();
        for scope in self.stack.iter().rev() {
            for &id in scope.iter().rev() {
                let decl = ctx.decl(id);
                if decl.name.as_deref() != Some(name) {
                    continue;
                }
                if decl.as_callable().is_none() {
                    continue;
                }
                let first = decl.first_declaration;
                if !seen.contains(&first) {
                    seen.push(first);
                    out.push(id);
                }
            }
        }
        out
    }
}

pub struct ScopeGuard<'s> {
    scopes: &'s mut Scopes,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.scopes.pop_scope();
    }
}

impl<'s> std::ops::Deref for ScopeGuard<'s> {
    type Target = Scopes;
    fn deref(&self) -> &Scopes {
        self.scopes
    }
}

impl<'s> std::ops::DerefMut for ScopeGuard<'s> {
    fn deref_mut(&mut self) -> &mut Scopes {
        self.scopes
    }
}

/// `true` iff `a` and `b` name the same type, or both are scalar types (the
/// "viable candidate" relaxation in §4.4.4: scalars interconvert freely).
fn argument_compatible(ctx: &Context, param_ty: TypeId, arg_ty: TypeId) -> bool {
    if param_ty == arg_ty {
        return true;
    }
    ctx.ty(param_ty).is_scalar() && ctx.ty(arg_ty).is_scalar()
}

/// `resolveFunctionDeclaration` (§4.4.4): collects every function
/// declaration in scope by `name`, discards arity mismatches, then picks the
/// unique viable candidate — falling back to a strict (exact parameter type)
/// match when more than one candidate is viable.
pub fn resolve_function_declaration(
    ctx: &Context,
    scopes: &Scopes,
    name: &str,
    argument_types: &[TypeId],
    pos: Position,
) -> Result<DeclId, ParseError> {
    let candidates = scopes.collect_function_candidates(ctx, name);

    let arity_ok: Vec<DeclId> = candidates
        .into_iter()
        .filter(|&id| {
            let callable = ctx.decl(id).as_callable().expect("filtered to callables");
            callable.parameter_declarations.len() == argument_types.len()
        })
        .collect();

    let viable: Vec<DeclId> = arity_ok
        .into_iter()
        .filter(|&id| {
            let callable = ctx.decl(id).as_callable().expect("filtered to callables");
            callable
                .parameter_declarations
                .iter()
                .zip(argument_types.iter())
                .all(|(&param_id, &arg_ty)| {
                    let param_ty = ctx.decl(param_id).qualified_type.ty;
                    argument_compatible(ctx, param_ty, arg_ty)
                })
        })
        .collect();

    match viable.len() {
        0 => Err(ParseError::NoMatchingFunction {
            name: name.to_string(),
            pos,
        }),
        1 => Ok(viable[0]),
        _ => {
            let strict: Vec<DeclId> = viable
                .iter()
                .copied()
                .filter(|&id| {
                    let callable = ctx.decl(id).as_callable().expect("filtered to callables");
                    callable
                        .parameter_declarations
                        .iter()
                        .zip(argument_types.iter())
                        .all(|(&param_id, &arg_ty)| ctx.decl(param_id).qualified_type.ty == arg_ty)
                })
                .collect();
            match strict.len() {
                1 => Ok(strict[0]),
                _ => Err(ParseError::AmbiguousCall {
                    name: name.to_string(),
                    pos,
                }),
            }
        }
    }
}

/// Constructors are resolved the same way as `§4.4.3` describes: exact match
/// against a struct's registered constructor parameter types. No arity-
/// mismatch/viability relaxation is attempted yet (left as future promotion
/// work, matching the source tool's own TODO).
pub fn resolve_constructor_declaration(
    ctx: &Context,
    struct_members: &[DeclId],
    argument_types: &[TypeId],
) -> Option<DeclId> {
    struct_members.iter().copied().find(|&id| {
        let decl = ctx.decl(id);
        match &decl.kind {
            DeclKind::Callable(c) if c.callable_kind == crate::ast::decl::CallableKind::Constructor => {
                c.parameter_declarations.len() == argument_types.len()
                    && c.parameter_declarations
                        .iter()
                        .zip(argument_types.iter())
                        .all(|(&p, &a)| ctx.decl(p).qualified_type.ty == a)
            }
            _ => false,
        }
    })
}
