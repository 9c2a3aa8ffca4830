//! Recursive-descent parser with integrated semantic analysis (§4.4).
//!
//! Each production both resolves identifiers/types and materialises the
//! corresponding AST node in the same pass — there is no separate semantic
//! analysis phase. A cursor over the token sequence only ever advances
//! forward; look-ahead of one or two tokens disambiguates a function
//! declaration from a variable declaration, a cast from a parenthesised
//! expression, and `[[` attribute openings.

mod decl;
mod expr;
mod stmt;

use crate::ast::attr::{Attr, ProgramStage, Semantic};
use crate::context::Context;
use crate::error::{ParseError, ParseResult, Position};
use crate::scope::Scopes;
use crate::token::{Token, TokenKind};

/// Specifiers accumulated while parsing one declaration (§4.4.1 step 1).
#[derive(Debug, Default, Clone)]
pub(crate) struct Specifiers {
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_extern: bool,
    pub is_static: bool,
    pub is_inline: bool,
    pub is_in: bool,
    pub is_out: bool,
    pub program_attr: Option<(ProgramStage, Position)>,
    pub semantic_attr: Option<(Semantic, Option<u32>, Position)>,
}

pub struct Parser<'a> {
    ctx: &'a mut Context,
    tokens: Vec<Token>,
    pos: usize,
    scopes: Scopes,
}

impl<'a> Parser<'a> {
    pub fn new(ctx: &'a mut Context, tokens: Vec<Token>) -> Self {
        Parser {
            ctx,
            tokens,
            pos: 0,
            scopes: Scopes::new(),
        }
    }

    // --- cursor primitives ---

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn pos(&self) -> Position {
        Position {
            line: self.peek().line,
            column: self.peek().column,
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Runs `f` inside a freshly pushed scope, popping it again on every exit
    /// path — including an `Err` return from `f` — matching the RAII
    /// discipline [`crate::scope::ScopeGuard`] documents, without holding a
    /// borrow of `self.scopes` across the rest of `self` for the closure's
    /// duration.
    pub(crate) fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.scopes.push_scope();
        let result = f(self);
        self.scopes.pop_scope();
        result
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.check(TokenKind::Eof) {
            Err(ParseError::UnexpectedEndOfFile {
                expected: kind.to_string(),
            })
        } else {
            let got = self.peek().clone();
            Err(ParseError::UnexpectedToken {
                expected: kind.to_string(),
                got: got.kind.to_string(),
                pos: self.pos(),
            })
        }
    }

    /// Parses `[[attribute]]` or `[[attribute(n)]]`, folding the result into
    /// `spec`. Enforces "at most one program-stage attribute" and "at most
    /// one semantic attribute" (§3.5 invariant).
    pub(crate) fn parse_attribute(&mut self, spec: &mut Specifiers) -> ParseResult<()> {
        let open_pos = self.pos();
        self.expect(TokenKind::DoubleLeftBracket)?;

        if self.check(TokenKind::Fragment) || self.check(TokenKind::Vertex) {
            let stage = if self.eat(TokenKind::Fragment).is_some() {
                ProgramStage::Fragment
            } else {
                self.advance();
                ProgramStage::Vertex
            };
            if spec.program_attr.is_some() {
                return Err(ParseError::DuplicateProgramAttribute { pos: open_pos });
            }
            spec.program_attr = Some((stage, open_pos));
        } else {
            let name_tok = self.expect(TokenKind::Identifier)?;
            let semantic = semantic_from_name(&name_tok.lexeme).ok_or_else(|| {
                ParseError::InvalidAttribute {
                    name: name_tok.lexeme.clone(),
                    pos: open_pos,
                }
            })?;
            let index = if self.eat(TokenKind::LeftParenthesis).is_some() {
                let n = self.expect(TokenKind::IntLiteral)?;
                self.expect(TokenKind::RightParenthesis)?;
                Some(n.lexeme.parse::<u32>().unwrap_or(0))
            } else {
                None
            };
            if spec.semantic_attr.is_some() {
                return Err(ParseError::DuplicateSemantic { pos: open_pos });
            }
            spec.semantic_attr = Some((semantic, index, open_pos));
        }

        self.expect(TokenKind::DoubleRightBracket)?;
        Ok(())
    }

    /// Parses the specifier loop of §4.4.1 step 1: `const`, `extern`,
    /// `inline`, `volatile`, `in`, `inout`, `out`, and `[[attribute]]` forms,
    /// in any order and any count, until none of those tokens remain.
    pub(crate) fn parse_specifiers(&mut self) -> ParseResult<Specifiers> {
        let mut spec = Specifiers::default();
        loop {
            match self.peek().kind {
                TokenKind::Const => {
                    self.advance();
                    spec.is_const = true;
                }
                TokenKind::Volatile => {
                    self.advance();
                    spec.is_volatile = true;
                }
                TokenKind::Extern => {
                    self.advance();
                    spec.is_extern = true;
                }
                TokenKind::Static => {
                    self.advance();
                    spec.is_static = true;
                }
                TokenKind::Inline => {
                    self.advance();
                    spec.is_inline = true;
                }
                TokenKind::In => {
                    self.advance();
                    spec.is_in = true;
                }
                TokenKind::Out => {
                    self.advance();
                    spec.is_out = true;
                }
                TokenKind::Inout => {
                    self.advance();
                    spec.is_in = true;
                    spec.is_out = true;
                }
                TokenKind::DoubleLeftBracket => {
                    self.parse_attribute(&mut spec)?;
                }
                _ => break,
            }
        }
        Ok(spec)
    }

    /// Drives the whole translation unit: parses declarations until the
    /// token stream is exhausted, appending each to the `Context`'s
    /// top-level sequence in source order (§4.4.1).
    pub fn parse_translation_unit(&mut self) -> ParseResult<()> {
        while !self.check(TokenKind::Eof) {
            if let Some(id) = self.parse_external_declaration()? {
                self.ctx.push_top_level(id);
            }
        }
        Ok(())
    }
}

fn semantic_from_name(name: &str) -> Option<Semantic> {
    Some(match name {
        "binormal" => Semantic::Binormal,
        "blendindices" => Semantic::BlendIndices,
        "blendweight" => Semantic::BlendWeight,
        "color" => Semantic::Color,
        "normal" => Semantic::Normal,
        "position" => Semantic::Position,
        "positiontransformed" => Semantic::PositionTransformed,
        "pointsize" => Semantic::PointSize,
        "tangent" => Semantic::Tangent,
        "texcoord" => Semantic::TextureCoordinates,
        _ => return None,
    })
}

pub(crate) fn attrs_from_specifiers(ctx: &mut Context, spec: &Specifiers) -> Vec<crate::ast::AttrId> {
    let mut out = Vec::new();
    if let Some((stage, _)) = spec.program_attr {
        out.push(ctx.alloc_attr(Attr::Program(stage)));
    }
    if let Some((semantic, index, _)) = spec.semantic_attr {
        out.push(ctx.alloc_attr(Attr::Semantic { semantic, index }));
    }
    out
}
