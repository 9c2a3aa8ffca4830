//! Statements.
//!
//! `If`/`While`/`Switch` condition positions accept either a declaration
//! (implicitly converted) or a plain expression (§3.6); [`Condition`] models
//! that choice. `Do` and `Case` always take a plain expression, matching the
//! source tool.

use super::{DeclId, ExprId};

/// Index into `Context`'s statement arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Decl(DeclId),
    Expr(ExprId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForInit {
    Decl(DeclId),
    Expr(ExprId),
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Condition,
    pub body: StmtId,
    pub else_body: Option<StmtId>,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub initialization: Option<ForInit>,
    pub condition: Option<Condition>,
    pub increment: Option<ExprId>,
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub condition: Condition,
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct CaseStmt {
    pub condition: ExprId,
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Condition,
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct DoStmt {
    pub condition: ExprId,
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Empty,
    Expression(ExprId),
    Declaration(DeclId),
    Compound(Vec<StmtId>),
    If(IfStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Case(CaseStmt),
    Default { body: StmtId },
    While(WhileStmt),
    Do(DoStmt),
    Break,
    Continue,
    Return(Option<ExprId>),
}
