//! Target-dialect emitters (§4.6, §6.4), grounded in
//! `original_source/osl/OutputHLSL.cpp`/`OutputMSL.cpp`/`OutputGLSL.hpp`: each
//! dialect walks the typed AST and renders target source text. No
//! type-checking is repeated here — the emitters trust the `Context` the
//! parser already validated.
//!
//! The three dialects share one recursive printer (`print_declaration`,
//! `print_statement`, `print_expression`, mirroring the source tool's
//! `printDeclaration`/`printStatement`/`printExpression`/`printConstruct`
//! quartet almost line for line); what differs between them is confined to
//! the small [`Dialect`] trait: built-in type spelling, a stage prologue, and
//! the per-semantic field/parameter decoration.

pub mod glsl;
pub mod hlsl;
pub mod msl;

pub use glsl::GlslEmitter;
pub use hlsl::HlslEmitter;
pub use msl::MslEmitter;

use std::borrow::Cow;

use crate::ast::attr::{Attr, AttrId, ProgramStage, Semantic};
use crate::ast::decl::{CallableKind, DeclKind};
use crate::ast::expr::{BinaryOperatorKind, ExprKind, Literal, SizeofOperand, UnaryOperatorKind};
use crate::ast::stmt::{Condition, ForInit, Stmt};
use crate::ast::{DeclId, ExprId, StmtId};
use crate::context::Context;
use crate::types::{QualifiedType, Type};

#[derive(Debug, Clone, Copy)]
struct Options {
    indentation: usize,
    pretty: bool,
}

impl Options {
    fn nested(self, delta: usize) -> Options {
        Options {
            indentation: self.indentation + delta,
            pretty: self.pretty,
        }
    }

    fn reset(self) -> Options {
        Options {
            indentation: 0,
            pretty: self.pretty,
        }
    }
}

fn indent(code: &mut String, opts: Options) {
    if opts.pretty {
        code.extend(std::iter::repeat(' ').take(opts.indentation));
    }
}

/// What distinguishes one target dialect from another (§4.6): built-in
/// type/function spelling and stage-entry-point boilerplate. Declaration,
/// statement and expression printing are otherwise shared.
pub trait Dialect {
    fn program(&self) -> ProgramStage;
    fn main_function(&self) -> &str;
    fn output_version(&self) -> Option<u32>;

    /// Maps a built-in type's canonical name to this dialect's spelling
    /// (e.g. `float4` → `vec4` in GLSL). Unknown names pass through
    /// unchanged, which is correct for user struct names.
    fn type_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    /// Text emitted once, before the first declaration (GLSL's `#version`
    /// line; empty for HLSL/MSL).
    fn prologue(&self, _pretty: bool) -> String {
        String::new()
    }

    /// Trailing decoration for a field or parameter carrying `semantic`
    /// (HLSL's `: SV_Position`, MSL's `[[attribute(0)]]`). Empty for GLSL,
    /// which expresses semantics as separate `in`/`out` globals instead of a
    /// per-field suffix (see DESIGN.md).
    fn semantic_suffix(&self, semantic: Semantic, index: Option<u32>) -> String {
        let _ = (semantic, index);
        String::new()
    }
}

/// `output(context, pretty) -> String` (§6.4): every [`Dialect`] gets this for
/// free.
pub trait Emitter {
    fn output(&self, ctx: &Context, pretty: bool) -> String;
}

impl<D: Dialect> Emitter for D {
    fn output(&self, ctx: &Context, pretty: bool) -> String {
        let mut code = self.prologue(pretty);
        let top = Options {
            indentation: 0,
            pretty,
        };
        for &id in ctx.user_declarations() {
            print_declaration(self, ctx, id, top, &mut code);
            let has_body = matches!(
                &ctx.decl(id).kind,
                DeclKind::Callable(c) if c.body.is_some()
            );
            if !has_body {
                code.push(';');
            }
            if pretty {
                code.push('\n');
            }
        }
        code
    }
}

fn semantic_of(ctx: &Context, attrs: &[AttrId]) -> Option<(Semantic, Option<u32>)> {
    attrs.iter().find_map(|&id| match ctx.attr(id) {
        Attr::Semantic { semantic, index } => Some((*semantic, *index)),
        Attr::Program(_) => None,
    })
}

/// `getPrintableTypeName`: `(prefix, suffix)` where `prefix` is the qualified
/// base type name and `suffix` is the array dimensions, peeled off
/// innermost-last just as the source tool's loop does.
fn printable_type_name<D: Dialect + ?Sized>(
    dialect: &D,
    ctx: &Context,
    qt: QualifiedType,
) -> (String, String) {
    use crate::types::Qualifiers;
    let mut prefix = String::new();
    if qt.qualifiers.contains(Qualifiers::VOLATILE) {
        prefix.push_str("volatile ");
    }
    if qt.qualifiers.contains(Qualifiers::CONST) {
        prefix.push_str("const ");
    }
    let mut ty = ctx.ty(qt.ty);
    let mut suffix = String::new();
    while let Type::Array { element_type, size } = ty {
        suffix = format!("[{}]{}", size, suffix);
        ty = ctx.ty(element_type.ty);
    }
    prefix.push_str(&dialect.type_name(ty.name()));
    (prefix, suffix)
}

fn print_declaration<D: Dialect + ?Sized>(
    dialect: &D,
    ctx: &Context,
    id: DeclId,
    opts: Options,
    code: &mut String,
) {
    indent(code, opts);
    let decl = ctx.decl(id);
    match &decl.kind {
        DeclKind::Empty => {}

        DeclKind::Type { ty } => {
            code.push_str("struct ");
            code.push_str(ctx.ty(*ty).name());
            if ctx.is_definition(id) {
                if opts.pretty {
                    code.push('\n');
                }
                code.push('{');
                if opts.pretty {
                    code.push('\n');
                }
                if let Type::Struct {
                    member_declarations,
                    ..
                } = ctx.ty(*ty)
                {
                    for &member in member_declarations {
                        print_declaration(dialect, ctx, member, opts.nested(4), code);
                        code.push(';');
                        if opts.pretty {
                            code.push('\n');
                        }
                    }
                }
                indent(code, opts);
                code.push('}');
            }
        }

        DeclKind::Field => {
            let (prefix, suffix) = printable_type_name(dialect, ctx, decl.qualified_type);
            code.push_str(&prefix);
            code.push(' ');
            code.push_str(decl.name.as_deref().unwrap_or(""));
            code.push_str(&suffix);
            if let Some((semantic, index)) = semantic_of(ctx, &decl.attributes) {
                code.push_str(&dialect.semantic_suffix(semantic, index));
            }
        }

        DeclKind::Callable(c) => {
            // Only free functions are re-emitted as top-level declarators;
            // constructors and methods print nothing here, matching the
            // source tool's `if (kind == Function)` guard — their effect is
            // visible through the calls/member accesses that reference them.
            if c.callable_kind == CallableKind::Function {
                let (prefix, suffix) = printable_type_name(dialect, ctx, decl.qualified_type);
                code.push_str(&prefix);
                code.push(' ');
                code.push_str(decl.name.as_deref().unwrap_or(""));
                code.push_str(&suffix);
                code.push('(');
                for (i, &param) in c.parameter_declarations.iter().enumerate() {
                    if i > 0 {
                        code.push(',');
                        if opts.pretty {
                            code.push(' ');
                        }
                    }
                    print_declaration(dialect, ctx, param, opts.reset(), code);
                }
                code.push(')');
                if let Some(body) = c.body {
                    if opts.pretty {
                        code.push('\n');
                    }
                    print_statement(dialect, ctx, body, opts, code);
                }
            }
        }

        DeclKind::Variable(v) => {
            let (prefix, suffix) = printable_type_name(dialect, ctx, decl.qualified_type);
            code.push_str(&prefix);
            code.push(' ');
            code.push_str(decl.name.as_deref().unwrap_or(""));
            code.push_str(&suffix);
            if let Some(init) = v.initializer {
                if opts.pretty {
                    code.push(' ');
                }
                code.push('=');
                if opts.pretty {
                    code.push(' ');
                }
                print_expression(dialect, ctx, init, opts.reset(), code);
            }
        }

        DeclKind::Parameter(_) => {
            let (prefix, suffix) = printable_type_name(dialect, ctx, decl.qualified_type);
            code.push_str(&prefix);
            code.push(' ');
            code.push_str(decl.name.as_deref().unwrap_or(""));
            code.push_str(&suffix);
        }
    }
}

fn print_condition<D: Dialect + ?Sized>(
    dialect: &D,
    ctx: &Context,
    condition: &Condition,
    opts: Options,
    code: &mut String,
) {
    match condition {
        Condition::Decl(id) => print_declaration(dialect, ctx, *id, opts, code),
        Condition::Expr(id) => print_expression(dialect, ctx, *id, opts, code),
    }
}

/// A non-compound statement body is reindented one level in; a compound body
/// keeps the caller's indentation (its own braces carry the nesting), exactly
/// as the source tool's repeated `body->getStatementKind() == Compound ?
/// options : options.indentation + 4` checks do.
fn print_body<D: Dialect + ?Sized>(
    dialect: &D,
    ctx: &Context,
    body: StmtId,
    opts: Options,
    code: &mut String,
) {
    if matches!(ctx.stmt(body), Stmt::Compound(_)) {
        print_statement(dialect, ctx, body, opts, code);
    } else {
        print_statement(dialect, ctx, body, opts.nested(4), code);
    }
}

fn print_statement<D: Dialect + ?Sized>(
    dialect: &D,
    ctx: &Context,
    id: StmtId,
    opts: Options,
    code: &mut String,
) {
    match ctx.stmt(id) {
        Stmt::Empty => {
            indent(code, opts);
            code.push(';');
        }

        Stmt::Expression(e) => {
            indent(code, opts);
            print_expression(dialect, ctx, *e, opts.reset(), code);
            code.push(';');
        }

        Stmt::Declaration(id) => {
            indent(code, opts);
            print_declaration(dialect, ctx, *id, opts.reset(), code);
            code.push(';');
        }

        Stmt::Compound(stmts) => {
            indent(code, opts);
            code.push('{');
            if opts.pretty {
                code.push('\n');
            }
            for &s in stmts {
                print_statement(dialect, ctx, s, opts.nested(4), code);
                if opts.pretty {
                    code.push('\n');
                }
            }
            indent(code, opts);
            code.push('}');
        }

        Stmt::If(s) => {
            indent(code, opts);
            code.push_str("if");
            if opts.pretty {
                code.push(' ');
            }
            code.push('(');
            print_condition(dialect, ctx, &s.condition, opts.reset(), code);
            code.push(')');
            if opts.pretty {
                code.push('\n');
            }
            print_body(dialect, ctx, s.body, opts, code);
            if let Some(else_body) = s.else_body {
                if opts.pretty {
                    code.push('\n');
                }
                indent(code, opts);
                code.push_str("else");
                if opts.pretty {
                    code.push('\n');
                }
                print_body(dialect, ctx, else_body, opts, code);
            }
        }

        Stmt::For(s) => {
            indent(code, opts);
            code.push_str("for");
            if opts.pretty {
                code.push(' ');
            }
            code.push('(');
            if let Some(init) = &s.initialization {
                match init {
                    ForInit::Decl(id) => print_declaration(dialect, ctx, *id, opts.reset(), code),
                    ForInit::Expr(id) => print_expression(dialect, ctx, *id, opts.reset(), code),
                }
            }
            code.push(';');
            if opts.pretty {
                code.push(' ');
            }
            if let Some(cond) = &s.condition {
                print_condition(dialect, ctx, cond, opts.reset(), code);
            }
            code.push(';');
            if opts.pretty {
                code.push(' ');
            }
            if let Some(inc) = s.increment {
                print_expression(dialect, ctx, inc, opts.reset(), code);
            }
            code.push(')');
            if opts.pretty {
                code.push('\n');
            }
            print_body(dialect, ctx, s.body, opts, code);
        }

        Stmt::Switch(s) => {
            indent(code, opts);
            code.push_str("switch");
            if opts.pretty {
                code.push(' ');
            }
            code.push('(');
            print_condition(dialect, ctx, &s.condition, opts.reset(), code);
            code.push(')');
            if opts.pretty {
                code.push('\n');
            }
            print_body(dialect, ctx, s.body, opts, code);
        }

        Stmt::Case(s) => {
            indent(code, opts);
            code.push_str("case ");
            print_expression(dialect, ctx, s.condition, opts.reset(), code);
            code.push(':');
            if opts.pretty {
                code.push('\n');
            }
            print_body(dialect, ctx, s.body, opts, code);
        }

        Stmt::Default { body } => {
            indent(code, opts);
            code.push_str("default:");
            if opts.pretty {
                code.push('\n');
            }
            print_body(dialect, ctx, *body, opts, code);
        }

        Stmt::While(s) => {
            indent(code, opts);
            code.push_str("while");
            if opts.pretty {
                code.push(' ');
            }
            code.push('(');
            print_condition(dialect, ctx, &s.condition, opts.reset(), code);
            code.push(')');
            if opts.pretty {
                code.push('\n');
            }
            print_body(dialect, ctx, s.body, opts, code);
        }

        Stmt::Do(s) => {
            indent(code, opts);
            code.push_str("do");
            if opts.pretty {
                code.push('\n');
            }
            if matches!(ctx.stmt(s.body), Stmt::Compound(_)) {
                print_statement(dialect, ctx, s.body, opts, code);
            } else {
                if !opts.pretty {
                    code.push(' ');
                }
                print_statement(dialect, ctx, s.body, opts.nested(4), code);
            }
            if opts.pretty {
                code.push('\n');
            }
            indent(code, opts);
            code.push_str("while");
            if opts.pretty {
                code.push(' ');
            }
            code.push('(');
            print_expression(dialect, ctx, s.condition, opts.reset(), code);
            code.push_str(");");
        }

        Stmt::Break => {
            indent(code, opts);
            code.push_str("break;");
        }

        Stmt::Continue => {
            indent(code, opts);
            code.push_str("continue;");
        }

        Stmt::Return(value) => {
            indent(code, opts);
            code.push_str("return");
            if let Some(v) = value {
                code.push(' ');
                print_expression(dialect, ctx, *v, opts.reset(), code);
            }
            code.push(';');
        }
    }
}

fn print_arg_list<D: Dialect + ?Sized>(
    dialect: &D,
    ctx: &Context,
    args: &[ExprId],
    opts: Options,
    code: &mut String,
) {
    for (i, &arg) in args.iter().enumerate() {
        if i > 0 {
            code.push(',');
            if opts.pretty {
                code.push(' ');
            }
        }
        print_expression(dialect, ctx, arg, opts, code);
    }
}

const SWIZZLE_LETTERS: [char; 4] = ['x', 'y', 'z', 'w'];

fn print_expression<D: Dialect + ?Sized>(
    dialect: &D,
    ctx: &Context,
    id: ExprId,
    opts: Options,
    code: &mut String,
) {
    indent(code, opts);
    let expr = ctx.expr(id);
    match &expr.kind {
        ExprKind::Literal(lit) => match lit {
            Literal::Boolean(b) => code.push_str(if *b { "true" } else { "false" }),
            Literal::Integer(v) => code.push_str(&v.to_string()),
            Literal::FloatingPoint(v) => code.push_str(&v.to_string()),
            Literal::String(s) => code.push_str(s),
        },

        ExprKind::DeclarationReference(decl_id) => {
            if let Some(name) = ctx.decl(*decl_id).name.as_deref() {
                code.push_str(name);
            }
        }

        ExprKind::Call(c) => {
            print_expression(dialect, ctx, c.declaration_reference, opts.reset(), code);
            code.push('(');
            print_arg_list(dialect, ctx, &c.arguments, opts.reset(), code);
            code.push(')');
        }

        ExprKind::Paren(inner) => {
            code.push('(');
            print_expression(dialect, ctx, *inner, opts.reset(), code);
            code.push(')');
        }

        ExprKind::Member(m) => {
            print_expression(dialect, ctx, m.expression, opts.reset(), code);
            code.push('.');
            code.push_str(ctx.decl(m.field_declaration).name.as_deref().unwrap_or(""));
        }

        ExprKind::ArraySubscript(a) => {
            print_expression(dialect, ctx, a.expression, opts.reset(), code);
            code.push('[');
            print_expression(dialect, ctx, a.subscript, opts.reset(), code);
            code.push(']');
        }

        ExprKind::UnaryOperator(u) => {
            let prefix = match u.operator_kind {
                UnaryOperatorKind::Negation => Some("!"),
                UnaryOperatorKind::Positive => Some("+"),
                UnaryOperatorKind::Negative => Some("-"),
                UnaryOperatorKind::PrefixIncrement => Some("++"),
                UnaryOperatorKind::PrefixDecrement => Some("--"),
                UnaryOperatorKind::PostfixIncrement | UnaryOperatorKind::PostfixDecrement => None,
            };
            if let Some(p) = prefix {
                code.push_str(p);
                print_expression(dialect, ctx, u.expression, opts.reset(), code);
            } else {
                print_expression(dialect, ctx, u.expression, opts.reset(), code);
                code.push_str(match u.operator_kind {
                    UnaryOperatorKind::PostfixIncrement => "++",
                    UnaryOperatorKind::PostfixDecrement => "--",
                    _ => unreachable!(),
                });
            }
        }

        ExprKind::BinaryOperator(b) => {
            print_expression(dialect, ctx, b.left_expression, opts.reset(), code);
            let is_comma = b.operator_kind == BinaryOperatorKind::Comma;
            if opts.pretty && !is_comma {
                code.push(' ');
            }
            code.push_str(match b.operator_kind {
                BinaryOperatorKind::Addition => "+",
                BinaryOperatorKind::Subtraction => "-",
                BinaryOperatorKind::Multiplication => "*",
                BinaryOperatorKind::Division => "/",
                BinaryOperatorKind::AdditionAssignment => "+=",
                BinaryOperatorKind::SubtractAssignment => "-=",
                BinaryOperatorKind::MultiplicationAssignment => "*=",
                BinaryOperatorKind::DivisionAssignment => "/=",
                BinaryOperatorKind::LessThan => "<",
                BinaryOperatorKind::LessThanEqual => "<=",
                BinaryOperatorKind::GreaterThan => ">",
                BinaryOperatorKind::GreaterThanEqual => ">=",
                BinaryOperatorKind::Equality => "==",
                BinaryOperatorKind::Inequality => "!=",
                BinaryOperatorKind::Assignment => "=",
                BinaryOperatorKind::Or => "||",
                BinaryOperatorKind::And => "&&",
                BinaryOperatorKind::Comma => ",",
                BinaryOperatorKind::Subscript => {
                    unreachable!("Subscript is represented as ArraySubscript, not BinaryOperator")
                }
            });
            if opts.pretty {
                code.push(' ');
            }
            print_expression(dialect, ctx, b.right_expression, opts.reset(), code);
        }

        ExprKind::TernaryOperator(t) => {
            print_expression(dialect, ctx, t.condition, opts.reset(), code);
            if opts.pretty {
                code.push(' ');
            }
            code.push('?');
            if opts.pretty {
                code.push(' ');
            }
            print_expression(dialect, ctx, t.left_expression, opts.reset(), code);
            if opts.pretty {
                code.push(' ');
            }
            code.push(':');
            if opts.pretty {
                code.push(' ');
            }
            print_expression(dialect, ctx, t.right_expression, opts.reset(), code);
        }

        ExprKind::TemporaryObject(t) => {
            let (prefix, _) = printable_type_name(dialect, ctx, expr.qualified_type);
            code.push_str(prefix.trim_start());
            code.push('(');
            print_arg_list(dialect, ctx, &t.parameters, opts.reset(), code);
            code.push(')');
        }

        ExprKind::InitializerList(items) => {
            code.push('{');
            print_arg_list(dialect, ctx, items, opts.reset(), code);
            code.push('}');
        }

        ExprKind::Cast(c) => {
            let (prefix, _) = printable_type_name(dialect, ctx, expr.qualified_type);
            code.push_str(prefix.trim_start());
            code.push('(');
            print_expression(dialect, ctx, c.expression, opts.reset(), code);
            code.push(')');
        }

        ExprKind::VectorInitialize(items) | ExprKind::MatrixInitialize(items) => {
            let (prefix, _) = printable_type_name(dialect, ctx, expr.qualified_type);
            code.push_str(prefix.trim_start());
            code.push('(');
            print_arg_list(dialect, ctx, items, opts.reset(), code);
            code.push(')');
        }

        ExprKind::VectorElement(v) => {
            print_expression(dialect, ctx, v.expression, opts.reset(), code);
            code.push('.');
            for &p in &v.positions {
                code.push(SWIZZLE_LETTERS[p as usize]);
            }
        }

        ExprKind::Sizeof(operand) => {
            code.push_str("sizeof(");
            match operand {
                SizeofOperand::Type(ty) => code.push_str(&dialect.type_name(ctx.ty(*ty).name())),
                SizeofOperand::Expression(e) => {
                    print_expression(dialect, ctx, *e, opts.reset(), code)
                }
            }
            code.push(')');
        }
    }
}
