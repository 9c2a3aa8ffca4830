//! The typed abstract syntax tree.
//!
//! Every polymorphic hierarchy from the source tool (`Declaration`,
//! `Statement`, `Expression`, `Attribute`) is rendered here as a closed `enum`
//! dispatched on by `match`, never a trait object — this mirrors the source's
//! hand-rolled RTTI and keeps the tree cheap to traverse (see DESIGN.md).
//!
//! Nodes reference each other by `Copy` index newtypes (`DeclId`, `StmtId`,
//! `ExprId`, `AttrId`, and [`crate::types::TypeId`]) into arenas owned by
//! [`crate::context::Context`], never by raw pointer.

pub mod attr;
pub mod decl;
pub mod expr;
pub mod stmt;

pub use attr::{Attr, AttrId, ProgramStage, Semantic};
pub use decl::{CallableKind, Decl, DeclId, DeclKind, StorageClass};
pub use expr::{Category, Expr, ExprId};
pub use stmt::{Stmt, StmtId};
