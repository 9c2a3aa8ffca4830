//! Diagnostic dumps for `--print-tokens`/`--print-ast` (§4.7), grounded in
//! `original_source/src/Parser.cpp`'s `ASTContext::dump`/`dumpDeclaration`/
//! `dumpStatement`/`dumpExpression` quartet. Output is an indented tree, one
//! line per node, each line naming the node kind and its salient fields —
//! not meant to round-trip, only to let a human (or a test) see the shape of
//! what the front end produced.

use std::fmt::Write as _;

use crate::ast::attr::{Attr, Semantic};
use crate::ast::decl::{CallableKind, DeclKind};
use crate::ast::expr::{ExprKind, Literal, SizeofOperand};
use crate::ast::stmt::{Condition, ForInit, Stmt};
use crate::ast::DeclId;
use crate::context::Context;
use crate::token::Token;

/// One line per token: kind, lexeme, and position.
pub fn dump_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        let _ = writeln!(
            out,
            "{}:{}: {} {:?}",
            tok.line, tok.column, tok.kind, tok.lexeme
        );
    }
    out
}

/// The whole program's top-level declarations, indented by nesting depth.
pub fn dump_context(ctx: &Context) -> String {
    let mut out = String::new();
    for &id in ctx.declarations() {
        dump_declaration(ctx, id, 0, &mut out);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn semantic_name(semantic: Semantic) -> &'static str {
    match semantic {
        Semantic::Binormal => "Binormal",
        Semantic::BlendIndices => "BlendIndices",
        Semantic::BlendWeight => "BlendWeight",
        Semantic::Color => "Color",
        Semantic::Normal => "Normal",
        Semantic::Position => "Position",
        Semantic::PositionTransformed => "PositionTransformed",
        Semantic::PointSize => "PointSize",
        Semantic::Tangent => "Tangent",
        Semantic::TextureCoordinates => "TextureCoordinates",
    }
}

fn dump_declaration(ctx: &Context, id: DeclId, depth: usize, out: &mut String) {
    let decl = ctx.decl(id);
    indent(out, depth);

    match &decl.kind {
        DeclKind::Empty => {
            let _ = writeln!(out, "Empty");
        }

        DeclKind::Type { ty } => {
            let _ = write!(out, "Type, name: {}", ctx.ty(*ty).name());
            if let Some(prev) = decl.previous_declaration {
                let _ = write!(out, ", previous declaration: {}", prev.0);
            }
            if ctx.is_definition(id) {
                let _ = write!(out, ", definition: {}", id.0);
            }
            out.push('\n');
            if let crate::types::Type::Struct {
                member_declarations,
                ..
            } = ctx.ty(*ty)
            {
                for &member in member_declarations {
                    dump_declaration(ctx, member, depth + 1, out);
                }
            }
        }

        DeclKind::Field => {
            let _ = write!(
                out,
                "Field, name: {}, type: {}",
                decl.name.as_deref().unwrap_or(""),
                ctx.printable_name(decl.qualified_type)
            );
            if let Some((semantic, index)) = decl.attributes.iter().find_map(|&a| match ctx.attr(a) {
                Attr::Semantic { semantic, index } => Some((*semantic, *index)),
                Attr::Program(_) => None,
            }) {
                let _ = write!(out, ", semantic: {}", semantic_name(semantic));
                if let Some(n) = index {
                    let _ = write!(out, "({})", n);
                }
            }
            out.push('\n');
        }

        DeclKind::Callable(c) => {
            let kind_name = match c.callable_kind {
                CallableKind::Function => "Function",
                CallableKind::Constructor => "Constructor",
                CallableKind::Method => "Method",
            };
            let _ = write!(out, "{}", kind_name);
            if let Some(name) = &decl.name {
                let _ = write!(out, ", name: {}", name);
            }
            let _ = write!(
                out,
                ", result type: {}",
                ctx.printable_name(decl.qualified_type)
            );
            if let Some(program) = decl.attributes.iter().find_map(|&a| match ctx.attr(a) {
                Attr::Program(p) => Some(*p),
                Attr::Semantic { .. } => None,
            }) {
                let _ = write!(out, ", program: {:?}", program);
            }
            out.push('\n');
            for &param in &c.parameter_declarations {
                dump_declaration(ctx, param, depth + 1, out);
            }
            if let Some(body) = c.body {
                dump_statement(ctx, body, depth + 1, out);
            }
        }

        DeclKind::Variable(v) => {
            let _ = write!(
                out,
                "Variable, name: {}, type: {}",
                decl.name.as_deref().unwrap_or(""),
                ctx.printable_name(decl.qualified_type)
            );
            out.push('\n');
            if let Some(init) = v.initializer {
                dump_expression(ctx, init, depth + 1, out);
            }
        }

        DeclKind::Parameter(p) => {
            let _ = write!(
                out,
                "Parameter, name: {}, type: {}, input modifier: {:?}",
                decl.name.as_deref().unwrap_or(""),
                ctx.printable_name(decl.qualified_type),
                p.input_modifier
            );
            out.push('\n');
        }
    }
}

fn dump_statement(ctx: &Context, id: crate::ast::StmtId, depth: usize, out: &mut String) {
    indent(out, depth);
    match ctx.stmt(id) {
        Stmt::Empty => {
            let _ = writeln!(out, "Empty");
        }
        Stmt::Expression(e) => {
            let _ = writeln!(out, "Expression");
            dump_expression(ctx, *e, depth + 1, out);
        }
        Stmt::Declaration(d) => {
            let _ = writeln!(out, "Declaration");
            dump_declaration(ctx, *d, depth + 1, out);
        }
        Stmt::Compound(stmts) => {
            let _ = writeln!(out, "Compound");
            for &s in stmts {
                dump_statement(ctx, s, depth + 1, out);
            }
        }
        Stmt::If(s) => {
            let _ = writeln!(out, "If");
            dump_condition(ctx, &s.condition, depth + 1, out);
            dump_statement(ctx, s.body, depth + 1, out);
            if let Some(else_body) = s.else_body {
                dump_statement(ctx, else_body, depth + 1, out);
            }
        }
        Stmt::For(s) => {
            let _ = writeln!(out, "For");
            if let Some(init) = &s.initialization {
                match init {
                    ForInit::Decl(d) => dump_declaration(ctx, *d, depth + 1, out),
                    ForInit::Expr(e) => dump_expression(ctx, *e, depth + 1, out),
                }
            }
            if let Some(cond) = &s.condition {
                dump_condition(ctx, cond, depth + 1, out);
            }
            if let Some(inc) = s.increment {
                dump_expression(ctx, inc, depth + 1, out);
            }
            dump_statement(ctx, s.body, depth + 1, out);
        }
        Stmt::Switch(s) => {
            let _ = writeln!(out, "Switch");
            dump_condition(ctx, &s.condition, depth + 1, out);
            dump_statement(ctx, s.body, depth + 1, out);
        }
        Stmt::Case(s) => {
            let _ = writeln!(out, "Case");
            dump_expression(ctx, s.condition, depth + 1, out);
            dump_statement(ctx, s.body, depth + 1, out);
        }
        Stmt::Default { body } => {
            let _ = writeln!(out, "Default");
            dump_statement(ctx, *body, depth + 1, out);
        }
        Stmt::While(s) => {
            let _ = writeln!(out, "While");
            dump_condition(ctx, &s.condition, depth + 1, out);
            dump_statement(ctx, s.body, depth + 1, out);
        }
        Stmt::Do(s) => {
            let _ = writeln!(out, "Do");
            dump_statement(ctx, s.body, depth + 1, out);
            dump_expression(ctx, s.condition, depth + 1, out);
        }
        Stmt::Break => {
            let _ = writeln!(out, "Break");
        }
        Stmt::Continue => {
            let _ = writeln!(out, "Continue");
        }
        Stmt::Return(value) => {
            let _ = writeln!(out, "Return");
            if let Some(v) = value {
                dump_expression(ctx, *v, depth + 1, out);
            }
        }
    }
}

fn dump_condition(ctx: &Context, condition: &Condition, depth: usize, out: &mut String) {
    match condition {
        Condition::Decl(d) => dump_declaration(ctx, *d, depth, out),
        Condition::Expr(e) => dump_expression(ctx, *e, depth, out),
    }
}

fn dump_expression(ctx: &Context, id: crate::ast::ExprId, depth: usize, out: &mut String) {
    let expr = ctx.expr(id);
    indent(out, depth);
    let type_name = ctx.printable_name(expr.qualified_type);
    match &expr.kind {
        ExprKind::Literal(lit) => {
            let value = match lit {
                Literal::Boolean(b) => b.to_string(),
                Literal::Integer(v) => v.to_string(),
                Literal::FloatingPoint(v) => v.to_string(),
                Literal::String(s) => s.clone(),
            };
            let _ = writeln!(out, "Literal, value: {}, type: {}", value, type_name);
        }
        ExprKind::DeclarationReference(d) => {
            let _ = writeln!(
                out,
                "DeclarationReference, name: {}, type: {}",
                ctx.decl(*d).name.as_deref().unwrap_or(""),
                type_name
            );
        }
        ExprKind::Call(c) => {
            let _ = writeln!(out, "Call, type: {}", type_name);
            dump_expression(ctx, c.declaration_reference, depth + 1, out);
            for &arg in &c.arguments {
                dump_expression(ctx, arg, depth + 1, out);
            }
        }
        ExprKind::Paren(inner) => {
            let _ = writeln!(out, "Paren, type: {}", type_name);
            dump_expression(ctx, *inner, depth + 1, out);
        }
        ExprKind::Member(m) => {
            let _ = writeln!(
                out,
                "Member, field: {}, type: {}",
                ctx.decl(m.field_declaration).name.as_deref().unwrap_or(""),
                type_name
            );
            dump_expression(ctx, m.expression, depth + 1, out);
        }
        ExprKind::ArraySubscript(a) => {
            let _ = writeln!(out, "ArraySubscript, type: {}", type_name);
            dump_expression(ctx, a.expression, depth + 1, out);
            dump_expression(ctx, a.subscript, depth + 1, out);
        }
        ExprKind::UnaryOperator(u) => {
            let _ = writeln!(
                out,
                "UnaryOperator, operator: {:?}, type: {}",
                u.operator_kind, type_name
            );
            dump_expression(ctx, u.expression, depth + 1, out);
        }
        ExprKind::BinaryOperator(b) => {
            let _ = writeln!(
                out,
                "BinaryOperator, operator: {:?}, type: {}",
                b.operator_kind, type_name
            );
            dump_expression(ctx, b.left_expression, depth + 1, out);
            dump_expression(ctx, b.right_expression, depth + 1, out);
        }
        ExprKind::TernaryOperator(t) => {
            let _ = writeln!(out, "TernaryOperator, type: {}", type_name);
            dump_expression(ctx, t.condition, depth + 1, out);
            dump_expression(ctx, t.left_expression, depth + 1, out);
            dump_expression(ctx, t.right_expression, depth + 1, out);
        }
        ExprKind::TemporaryObject(t) => {
            let _ = writeln!(out, "TemporaryObject, type: {}", type_name);
            for &param in &t.parameters {
                dump_expression(ctx, param, depth + 1, out);
            }
        }
        ExprKind::InitializerList(items) => {
            let _ = writeln!(out, "InitializerList, type: {}", type_name);
            for &item in items {
                dump_expression(ctx, item, depth + 1, out);
            }
        }
        ExprKind::Cast(c) => {
            let _ = writeln!(out, "Cast, kind: {:?}, type: {}", c.cast_kind, type_name);
            dump_expression(ctx, c.expression, depth + 1, out);
        }
        ExprKind::VectorInitialize(items) => {
            let _ = writeln!(out, "VectorInitialize, type: {}", type_name);
            for &item in items {
                dump_expression(ctx, item, depth + 1, out);
            }
        }
        ExprKind::MatrixInitialize(items) => {
            let _ = writeln!(out, "MatrixInitialize, type: {}", type_name);
            for &item in items {
                dump_expression(ctx, item, depth + 1, out);
            }
        }
        ExprKind::VectorElement(v) => {
            let positions: String = v
                .positions
                .iter()
                .map(|&p| ['x', 'y', 'z', 'w'][p as usize])
                .collect();
            let _ = writeln!(
                out,
                "VectorElement, positions: {}, type: {}",
                positions, type_name
            );
            dump_expression(ctx, v.expression, depth + 1, out);
        }
        ExprKind::Sizeof(operand) => {
            let _ = writeln!(out, "Sizeof, type: {}", type_name);
            match operand {
                SizeofOperand::Type(ty) => {
                    indent(out, depth + 1);
                    let _ = writeln!(out, "Type, name: {}", ctx.ty(*ty).name());
                }
                SizeofOperand::Expression(e) => dump_expression(ctx, *e, depth + 1, out),
            }
        }
    }
}
