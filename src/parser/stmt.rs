//! Statement parsing (§4.4.5): the full statement grammar including the
//! `Condition`/`ForInit` "declaration-or-expression" positions.

use super::Parser;
use crate::ast::stmt::{CaseStmt, Condition, DoStmt, ForInit, ForStmt, IfStmt, Stmt, SwitchStmt, WhileStmt};
use crate::ast::StmtId;
use crate::error::{ParseError, ParseResult};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// `{ statement* }`, opening a fresh scope (§4.4 scope-stack discipline).
    pub(crate) fn parse_compound_statement(&mut self) -> ParseResult<StmtId> {
        self.expect(TokenKind::LeftBrace)?;
        let body = self.scoped(|p| {
            let mut stmts = Vec::new();
            while !p.check(TokenKind::RightBrace) {
                stmts.push(p.parse_statement()?);
            }
            Ok(stmts)
        })?;
        self.expect(TokenKind::RightBrace)?;
        Ok(self.ctx.alloc_stmt(Stmt::Compound(body)))
    }

    /// `true` iff the current position starts a declaration rather than an
    /// expression: a type keyword, `struct`, or an identifier bound to a
    /// type in the current scope stack.
    fn at_declaration_start(&self) -> bool {
        match self.peek().kind {
            TokenKind::Void
            | TokenKind::Bool
            | TokenKind::Int
            | TokenKind::Unsigned
            | TokenKind::Float
            | TokenKind::Struct
            | TokenKind::Const
            | TokenKind::Volatile => true,
            TokenKind::Identifier => self
                .scopes
                .find_type(self.ctx, &self.peek().lexeme)
                .is_some(),
            _ => false,
        }
    }

    fn parse_condition(&mut self) -> ParseResult<Condition> {
        if self.at_declaration_start() {
            Ok(Condition::Decl(self.parse_local_declaration_no_semi()?))
        } else {
            let e = self.parse_expression()?;
            Ok(Condition::Expr(e))
        }
    }

    /// Parses a single statement.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<StmtId> {
        match self.peek().kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(self.ctx.alloc_stmt(Stmt::Empty))
            }
            TokenKind::LeftBrace => self.parse_compound_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Case => self.parse_case_statement(),
            TokenKind::Default => self.parse_default_statement(),
            TokenKind::Break => {
                self.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(self.ctx.alloc_stmt(Stmt::Break))
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(self.ctx.alloc_stmt(Stmt::Continue))
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(self.ctx.alloc_stmt(Stmt::Return(value)))
            }
            TokenKind::Asm => Err(ParseError::UnsupportedFeature {
                what: "inline assembly ('asm') is not supported".into(),
                pos: self.pos(),
            }),
            TokenKind::Goto => Err(ParseError::UnsupportedFeature {
                what: "'goto' is not supported".into(),
                pos: self.pos(),
            }),
            TokenKind::Try | TokenKind::Catch | TokenKind::Throw => {
                Err(ParseError::UnsupportedFeature {
                    what: "exception handling ('try'/'catch'/'throw') is not supported".into(),
                    pos: self.pos(),
                })
            }
            _ if self.at_declaration_start() => {
                let id = self.parse_local_declaration()?;
                Ok(self.ctx.alloc_stmt(Stmt::Declaration(id)))
            }
            _ => {
                let e = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(self.ctx.alloc_stmt(Stmt::Expression(e)))
            }
        }
    }

    fn parse_if_statement(&mut self) -> ParseResult<StmtId> {
        self.advance();
        self.expect(TokenKind::LeftParenthesis)?;
        let (condition, body, else_body) = self.scoped(|p| {
            let condition = p.parse_condition()?;
            p.expect(TokenKind::RightParenthesis)?;
            let body = p.parse_statement()?;
            let else_body = if p.eat(TokenKind::Else).is_some() {
                Some(p.parse_statement()?)
            } else {
                None
            };
            Ok((condition, body, else_body))
        })?;
        Ok(self.ctx.alloc_stmt(Stmt::If(IfStmt {
            condition,
            body,
            else_body,
        })))
    }

    fn parse_for_statement(&mut self) -> ParseResult<StmtId> {
        self.advance();
        self.expect(TokenKind::LeftParenthesis)?;
        let (initialization, condition, increment, body) = self.scoped(|p| {
            let initialization = if p.check(TokenKind::Semicolon) {
                None
            } else if p.at_declaration_start() {
                Some(ForInit::Decl(p.parse_local_declaration_no_semi()?))
            } else {
                Some(ForInit::Expr(p.parse_expression()?))
            };
            p.expect(TokenKind::Semicolon)?;

            let condition = if p.check(TokenKind::Semicolon) {
                None
            } else {
                Some(p.parse_condition()?)
            };
            p.expect(TokenKind::Semicolon)?;

            let increment = if p.check(TokenKind::RightParenthesis) {
                None
            } else {
                Some(p.parse_expression()?)
            };
            p.expect(TokenKind::RightParenthesis)?;

            let body = p.parse_statement()?;
            Ok((initialization, condition, increment, body))
        })?;
        Ok(self.ctx.alloc_stmt(Stmt::For(ForStmt {
            initialization,
            condition,
            increment,
            body,
        })))
    }

    fn parse_while_statement(&mut self) -> ParseResult<StmtId> {
        self.advance();
        self.expect(TokenKind::LeftParenthesis)?;
        let (condition, body) = self.scoped(|p| {
            let condition = p.parse_condition()?;
            p.expect(TokenKind::RightParenthesis)?;
            let body = p.parse_statement()?;
            Ok((condition, body))
        })?;
        Ok(self.ctx.alloc_stmt(Stmt::While(WhileStmt { condition, body })))
    }

    fn parse_do_statement(&mut self) -> ParseResult<StmtId> {
        self.advance();
        let body = self.parse_statement()?;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LeftParenthesis)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParenthesis)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(self.ctx.alloc_stmt(Stmt::Do(DoStmt { condition, body })))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<StmtId> {
        self.advance();
        self.expect(TokenKind::LeftParenthesis)?;
        let (condition, body) = self.scoped(|p| {
            let condition = p.parse_condition()?;
            p.expect(TokenKind::RightParenthesis)?;
            let body = p.parse_statement()?;
            Ok((condition, body))
        })?;
        Ok(self.ctx.alloc_stmt(Stmt::Switch(SwitchStmt { condition, body })))
    }

    fn parse_case_statement(&mut self) -> ParseResult<StmtId> {
        self.advance();
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_statement()?;
        Ok(self.ctx.alloc_stmt(Stmt::Case(CaseStmt { condition, body })))
    }

    fn parse_default_statement(&mut self) -> ParseResult<StmtId> {
        self.advance();
        self.expect(TokenKind::Colon)?;
        let body = self.parse_statement()?;
        Ok(self.ctx.alloc_stmt(Stmt::Default { body }))
    }

    /// Like `parse_local_declaration`, but stops before the trailing `;` —
    /// used inside `if`/`while`/`switch`/`for` condition positions, whose
    /// grammar supplies the terminator itself (`)` or `;`).
    fn parse_local_declaration_no_semi(&mut self) -> ParseResult<crate::ast::DeclId> {
        let spec = self.parse_specifiers()?;
        let base_ty = self.parse_type_name()?;
        let more = self.parse_specifiers()?;
        let mut spec = spec;
        spec.is_const |= more.is_const;
        spec.is_volatile |= more.is_volatile;

        let name_tok = self.expect(TokenKind::Identifier)?;
        let name = name_tok.lexeme;
        let qt = crate::types::QualifiedType::with_qualifiers(base_ty, Self::qualifiers(&spec));
        let pos = self.pos();
        if self.ctx.ty(qt.ty).is_void() {
            return Err(ParseError::VoidTypeNotAllowed { pos });
        }
        let previous = self.scopes.find_in_current_scope(self.ctx, &name);
        let initializer = if self.eat(TokenKind::Assignment).is_some() {
            Some(self.parse_assignment_initializer(qt)?)
        } else {
            None
        };
        let attrs = super::attrs_from_specifiers(self.ctx, &spec);
        let decl_id = self.ctx.alloc_decl(crate::ast::Decl {
            name: Some(name),
            qualified_type: qt,
            first_declaration: crate::ast::DeclId(0),
            previous_declaration: previous,
            definition: None,
            attributes: attrs,
            kind: crate::ast::decl::DeclKind::Variable(crate::ast::decl::VariableDecl {
                storage_class: crate::ast::decl::StorageClass::Auto,
                initializer,
            }),
        });
        self.ctx.decl_mut(decl_id).first_declaration = match previous {
            Some(p) => self.ctx.decl(p).first_declaration,
            None => decl_id,
        };
        if initializer.is_some() {
            self.ctx.decl_mut(decl_id).definition = Some(decl_id);
        }
        self.scopes.declare(decl_id);
        Ok(decl_id)
    }
}
