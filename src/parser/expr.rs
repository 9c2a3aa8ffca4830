//! Expression parsing: the full precedence tower, overload resolution
//! wiring, member/swizzle access, subscripting, casts and constructors
//! (§4.4.4, §3.4).

use super::Parser;
use crate::ast::decl::DeclKind;
use crate::ast::expr::{
    ArraySubscriptExpr, BinaryOperatorExpr, BinaryOperatorKind, CallExpr, CastExpr, CastKind,
    Category, Expr, ExprKind, Literal, MemberExpr, SizeofOperand, TemporaryObjectExpr,
    TernaryOperatorExpr, UnaryOperatorExpr, UnaryOperatorKind, VectorElementExpr,
};
use crate::ast::{DeclId, ExprId};
use crate::error::{ParseError, ParseResult, Position};
use crate::scope::resolve_constructor_declaration;
use crate::token::TokenKind;
use crate::types::{QualifiedType, Type, TypeId};

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> ParseResult<ExprId> {
        let mut left = self.parse_assignment_expression()?;
        while self.eat(TokenKind::Comma).is_some() {
            let right = self.parse_assignment_expression()?;
            let qt = self.ctx.expr(right).qualified_type;
            left = self.ctx.alloc_expr(Expr {
                qualified_type: qt,
                category: Category::Rvalue,
                kind: ExprKind::BinaryOperator(BinaryOperatorExpr {
                    operator_kind: BinaryOperatorKind::Comma,
                    left_expression: left,
                    right_expression: right,
                }),
            });
        }
        Ok(left)
    }

    /// Right-associative: `=`, `+=`, `-=`, `*=`, `/=`. Per §3.4, plain `=`
    /// yields Rvalue while the compound forms yield Lvalue — preserved
    /// verbatim from the source tool (Open Question 3).
    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<ExprId> {
        let left = self.parse_conditional_expression()?;
        let op = match self.peek().kind {
            TokenKind::Assignment => Some(BinaryOperatorKind::Assignment),
            TokenKind::PlusAssignment => Some(BinaryOperatorKind::AdditionAssignment),
            TokenKind::MinusAssignment => Some(BinaryOperatorKind::SubtractAssignment),
            TokenKind::MultiplyAssignment => Some(BinaryOperatorKind::MultiplicationAssignment),
            TokenKind::DivideAssignment => Some(BinaryOperatorKind::DivisionAssignment),
            _ => None,
        };
        let op = match op {
            Some(op) => op,
            None => return Ok(left),
        };
        let pos = self.pos();
        self.advance();

        let left_expr = self.ctx.expr(left);
        if !left_expr.is_lvalue() {
            return Err(ParseError::NotAssignable { pos });
        }
        if left_expr.qualified_type.is_const() {
            return Err(ParseError::AssignToConst { pos });
        }

        let right = self.parse_assignment_expression()?;
        let qt = self.ctx.expr(left).qualified_type;
        let rt = self.ctx.expr(right).qualified_type.ty;
        if qt.ty != rt && !(self.ctx.ty(qt.ty).is_scalar() && self.ctx.ty(rt).is_scalar()) {
            return Err(ParseError::UnsupportedFeature {
                what: format!(
                    "cannot assign '{}' to '{}'",
                    self.ctx.printable_name(QualifiedType::new(rt)),
                    self.ctx.printable_name(qt)
                ),
                pos,
            });
        }
        let category = if op.is_compound_assignment() {
            Category::Lvalue
        } else {
            Category::Rvalue
        };
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: qt,
            category,
            kind: ExprKind::BinaryOperator(BinaryOperatorExpr {
                operator_kind: op,
                left_expression: left,
                right_expression: right,
            }),
        }))
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<ExprId> {
        let condition = self.parse_logical_or_expression()?;
        if self.eat(TokenKind::Conditional).is_none() {
            return Ok(condition);
        }
        let pos = self.pos();
        if !self.ctx.ty(self.ctx.expr(condition).qualified_type.ty).is_boolean() {
            return Err(ParseError::NotABoolean { pos });
        }
        let left_expression = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let right_expression = self.parse_conditional_expression()?;
        let qt = self.ctx.expr(left_expression).qualified_type;
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: qt,
            category: Category::Rvalue,
            kind: ExprKind::TernaryOperator(TernaryOperatorExpr {
                condition,
                left_expression,
                right_expression,
            }),
        }))
    }

    fn parse_logical_or_expression(&mut self) -> ParseResult<ExprId> {
        let mut left = self.parse_logical_and_expression()?;
        while self.check(TokenKind::Or) {
            self.advance();
            let right = self.parse_logical_and_expression()?;
            left = self.build_logical(BinaryOperatorKind::Or, left, right)?;
        }
        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> ParseResult<ExprId> {
        let mut left = self.parse_equality_expression()?;
        while self.check(TokenKind::And) {
            self.advance();
            let right = self.parse_equality_expression()?;
            left = self.build_logical(BinaryOperatorKind::And, left, right)?;
        }
        Ok(left)
    }

    fn build_logical(&mut self, op: BinaryOperatorKind, left: ExprId, right: ExprId) -> ParseResult<ExprId> {
        let pos = self.pos();
        for &e in &[left, right] {
            if !self.ctx.ty(self.ctx.expr(e).qualified_type.ty).is_boolean() {
                return Err(ParseError::NotABoolean { pos });
            }
        }
        let bool_ty = self.ctx.builtins.bool_;
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: QualifiedType::new(bool_ty),
            category: Category::Rvalue,
            kind: ExprKind::BinaryOperator(BinaryOperatorExpr {
                operator_kind: op,
                left_expression: left,
                right_expression: right,
            }),
        }))
    }

    fn parse_equality_expression(&mut self) -> ParseResult<ExprId> {
        let mut left = self.parse_relational_expression()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Equal => BinaryOperatorKind::Equality,
                TokenKind::NotEq => BinaryOperatorKind::Inequality,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational_expression()?;
            let bool_ty = self.ctx.builtins.bool_;
            left = self.ctx.alloc_expr(Expr {
                qualified_type: QualifiedType::new(bool_ty),
                category: Category::Rvalue,
                kind: ExprKind::BinaryOperator(BinaryOperatorExpr {
                    operator_kind: op,
                    left_expression: left,
                    right_expression: right,
                }),
            });
        }
        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> ParseResult<ExprId> {
        let mut left = self.parse_additive_expression()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::LessThan => BinaryOperatorKind::LessThan,
                TokenKind::LessThanEqual => BinaryOperatorKind::LessThanEqual,
                TokenKind::GreaterThan => BinaryOperatorKind::GreaterThan,
                TokenKind::GreaterThanEqual => BinaryOperatorKind::GreaterThanEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive_expression()?;
            let bool_ty = self.ctx.builtins.bool_;
            left = self.ctx.alloc_expr(Expr {
                qualified_type: QualifiedType::new(bool_ty),
                category: Category::Rvalue,
                kind: ExprKind::BinaryOperator(BinaryOperatorExpr {
                    operator_kind: op,
                    left_expression: left,
                    right_expression: right,
                }),
            });
        }
        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> ParseResult<ExprId> {
        let mut left = self.parse_multiplicative_expression()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOperatorKind::Addition,
                TokenKind::Minus => BinaryOperatorKind::Subtraction,
                _ => break,
            };
            let pos = self.pos();
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = self.build_arithmetic(op, left, right, pos)?;
        }
        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> ParseResult<ExprId> {
        let mut left = self.parse_sizeof_or_unary_expression()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Multiply => BinaryOperatorKind::Multiplication,
                TokenKind::Divide => BinaryOperatorKind::Division,
                _ => break,
            };
            let pos = self.pos();
            self.advance();
            let right = self.parse_sizeof_or_unary_expression()?;
            left = self.build_arithmetic(op, left, right, pos)?;
        }
        Ok(left)
    }

    /// `true` iff the current token can start a bare type name (as opposed to
    /// an expression) inside a `sizeof(...)` operand.
    fn at_type_name_start(&self) -> bool {
        match self.peek().kind {
            TokenKind::Void
            | TokenKind::Bool
            | TokenKind::Int
            | TokenKind::Unsigned
            | TokenKind::Float
            | TokenKind::Struct => true,
            TokenKind::Identifier => self.scopes.find_type(self.ctx, &self.peek().lexeme).is_some(),
            _ => false,
        }
    }

    /// `sizeof(type)` or `sizeof(expression)`, yielding `unsigned int`
    /// (§4.4.3). Sits a notch above unary in the precedence tower, mirroring
    /// the source tool's dedicated `sizeof` production.
    fn parse_sizeof_expression(&mut self) -> ParseResult<ExprId> {
        let pos = self.pos();
        self.advance();
        self.expect(TokenKind::LeftParenthesis)?;
        let operand = if self.at_type_name_start() {
            let ty = self.parse_type_name()?;
            if self.ctx.ty(ty).is_void() {
                return Err(ParseError::VoidTypeNotAllowed { pos });
            }
            SizeofOperand::Type(ty)
        } else {
            SizeofOperand::Expression(self.parse_expression()?)
        };
        self.expect(TokenKind::RightParenthesis)?;
        let uint_ty = self.ctx.builtins.uint;
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: QualifiedType::new(uint_ty),
            category: Category::Rvalue,
            kind: ExprKind::Sizeof(operand),
        }))
    }

    fn parse_sizeof_or_unary_expression(&mut self) -> ParseResult<ExprId> {
        if self.check(TokenKind::Sizeof) {
            self.parse_sizeof_expression()
        } else {
            self.parse_unary_expression()
        }
    }

    /// Combines two operands into one arithmetic `BinaryOperator` node. The
    /// result type is the non-scalar operand's type when one side is a bare
    /// scalar (vector/matrix-by-scalar broadcast); otherwise both sides must
    /// name the same type.
    fn build_arithmetic(
        &mut self,
        op: BinaryOperatorKind,
        left: ExprId,
        right: ExprId,
        pos: Position,
    ) -> ParseResult<ExprId> {
        let lt = self.ctx.expr(left).qualified_type.ty;
        let rt = self.ctx.expr(right).qualified_type.ty;
        let result_ty = if lt == rt {
            lt
        } else if self.ctx.ty(lt).is_scalar() {
            rt
        } else if self.ctx.ty(rt).is_scalar() {
            lt
        } else {
            return Err(ParseError::UnsupportedFeature {
                what: format!(
                    "no arithmetic operator for '{}' and '{}'",
                    self.ctx.printable_name(QualifiedType::new(lt)),
                    self.ctx.printable_name(QualifiedType::new(rt))
                ),
                pos,
            });
        };
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: QualifiedType::new(result_ty),
            category: Category::Rvalue,
            kind: ExprKind::BinaryOperator(BinaryOperatorExpr {
                operator_kind: op,
                left_expression: left,
                right_expression: right,
            }),
        }))
    }

    fn parse_unary_expression(&mut self) -> ParseResult<ExprId> {
        if self.check(TokenKind::LeftParenthesis)
            && matches!(
                self.peek_at(1).kind,
                TokenKind::Bool | TokenKind::Int | TokenKind::Unsigned | TokenKind::Float
            )
        {
            return self.parse_c_style_cast();
        }
        if self.check(TokenKind::StaticCast) {
            return self.parse_static_cast();
        }
        if matches!(
            self.peek().kind,
            TokenKind::ConstCast | TokenKind::DynamicCast | TokenKind::ReinterpretCast
        ) {
            return Err(ParseError::UnsupportedFeature {
                what: format!(
                    "'{}' is not supported, pointers and references do not exist in this language",
                    self.peek().kind
                ),
                pos: self.pos(),
            });
        }

        let (kind, pos) = match self.peek().kind {
            TokenKind::Not => (Some(UnaryOperatorKind::Negation), self.pos()),
            TokenKind::Plus => (Some(UnaryOperatorKind::Positive), self.pos()),
            TokenKind::Minus => (Some(UnaryOperatorKind::Negative), self.pos()),
            TokenKind::Increment => (Some(UnaryOperatorKind::PrefixIncrement), self.pos()),
            TokenKind::Decrement => (Some(UnaryOperatorKind::PrefixDecrement), self.pos()),
            _ => (None, self.pos()),
        };
        let op_kind = match kind {
            Some(k) => k,
            None => return self.parse_postfix_expression(),
        };
        self.advance();
        let operand = self.parse_unary_expression()?;

        if matches!(
            op_kind,
            UnaryOperatorKind::PrefixIncrement | UnaryOperatorKind::PrefixDecrement
        ) && !self.ctx.expr(operand).is_lvalue()
        {
            return Err(ParseError::NotAssignable { pos });
        }
        if op_kind == UnaryOperatorKind::Negation
            && !self.ctx.ty(self.ctx.expr(operand).qualified_type.ty).is_boolean()
        {
            return Err(ParseError::NotABoolean { pos });
        }

        let qt = self.ctx.expr(operand).qualified_type;
        let category = match op_kind {
            UnaryOperatorKind::PrefixIncrement | UnaryOperatorKind::PrefixDecrement => Category::Lvalue,
            _ => Category::Rvalue,
        };
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: qt,
            category,
            kind: ExprKind::UnaryOperator(UnaryOperatorExpr {
                operator_kind: op_kind,
                expression: operand,
            }),
        }))
    }

    fn parse_c_style_cast(&mut self) -> ParseResult<ExprId> {
        self.advance();
        let target_ty = self.parse_type_name()?;
        self.expect(TokenKind::RightParenthesis)?;
        let expression = self.parse_unary_expression()?;
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: QualifiedType::new(target_ty),
            category: Category::Rvalue,
            kind: ExprKind::Cast(CastExpr {
                cast_kind: CastKind::CStyle,
                expression,
            }),
        }))
    }

    fn parse_static_cast(&mut self) -> ParseResult<ExprId> {
        self.advance();
        self.expect(TokenKind::LessThan)?;
        let target_ty = self.parse_type_name()?;
        self.expect(TokenKind::GreaterThan)?;
        self.expect(TokenKind::LeftParenthesis)?;
        let expression = self.parse_expression()?;
        self.expect(TokenKind::RightParenthesis)?;
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: QualifiedType::new(target_ty),
            category: Category::Rvalue,
            kind: ExprKind::Cast(CastExpr {
                cast_kind: CastKind::Static,
                expression,
            }),
        }))
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<ExprId> {
        let mut e = self.parse_primary_expression()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    e = self.parse_member_access(e)?;
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let pos = self.pos();
                    let subscript = self.parse_expression()?;
                    self.expect(TokenKind::RightBracket)?;
                    if !self.ctx.ty(self.ctx.expr(subscript).qualified_type.ty).is_integer() {
                        return Err(ParseError::NotAnInteger { pos });
                    }
                    e = self.build_subscript(e, subscript, pos)?;
                }
                TokenKind::Increment => {
                    let pos = self.pos();
                    self.advance();
                    if !self.ctx.expr(e).is_lvalue() {
                        return Err(ParseError::NotAssignable { pos });
                    }
                    let qt = self.ctx.expr(e).qualified_type;
                    e = self.ctx.alloc_expr(Expr {
                        qualified_type: qt,
                        category: Category::Rvalue,
                        kind: ExprKind::UnaryOperator(UnaryOperatorExpr {
                            operator_kind: UnaryOperatorKind::PostfixIncrement,
                            expression: e,
                        }),
                    });
                }
                TokenKind::Decrement => {
                    let pos = self.pos();
                    self.advance();
                    if !self.ctx.expr(e).is_lvalue() {
                        return Err(ParseError::NotAssignable { pos });
                    }
                    let qt = self.ctx.expr(e).qualified_type;
                    e = self.ctx.alloc_expr(Expr {
                        qualified_type: qt,
                        category: Category::Rvalue,
                        kind: ExprKind::UnaryOperator(UnaryOperatorExpr {
                            operator_kind: UnaryOperatorKind::PostfixDecrement,
                            expression: e,
                        }),
                    });
                }
                _ => break,
            }
        }
        Ok(e)
    }

    fn build_subscript(&mut self, e: ExprId, subscript: ExprId, pos: Position) -> ParseResult<ExprId> {
        let base_ty = self.ctx.expr(e).qualified_type.ty;
        let elem_qt = match self.ctx.ty(base_ty) {
            Type::Array { element_type, .. } => *element_type,
            Type::Vector { component_type, .. } => QualifiedType::new(*component_type),
            Type::Matrix {
                component_type,
                column_count,
                ..
            } => {
                let row_ty = self
                    .ctx
                    .find_vector_type(*component_type, *column_count)
                    .ok_or_else(|| ParseError::InvalidSubscript {
                        reason: "no row vector type registered for this matrix".into(),
                        pos,
                    })?;
                QualifiedType::new(row_ty)
            }
            _ => {
                return Err(ParseError::InvalidSubscript {
                    reason: format!(
                        "'{}' is not subscriptable",
                        self.ctx.printable_name(QualifiedType::new(base_ty))
                    ),
                    pos,
                })
            }
        };
        let category = if self.ctx.expr(e).is_lvalue() {
            Category::Lvalue
        } else {
            Category::Rvalue
        };
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: elem_qt,
            category,
            kind: ExprKind::ArraySubscript(ArraySubscriptExpr {
                expression: e,
                subscript,
            }),
        }))
    }

    /// `.` already consumed; dispatches to swizzle, field access, or method
    /// call depending on the base expression's type.
    fn parse_member_access(&mut self, e: ExprId) -> ParseResult<ExprId> {
        let pos = self.pos();
        let name_tok = self.expect(TokenKind::Identifier)?;
        let name = name_tok.lexeme;
        let base_ty = self.ctx.expr(e).qualified_type.ty;

        match self.ctx.ty(base_ty).clone() {
            Type::Vector { component_type, component_count, .. } => {
                let positions = swizzle_positions(&name, component_count).ok_or_else(|| {
                    ParseError::InvalidSwizzle {
                        swizzle: name.clone(),
                        pos,
                    }
                })?;
                let repeated = has_duplicate(&positions);
                let result_ty = if positions.len() == 1 {
                    component_type
                } else {
                    self.ctx
                        .find_vector_type(component_type, positions.len() as u8)
                        .ok_or_else(|| ParseError::InvalidSwizzle {
                            swizzle: name.clone(),
                            pos,
                        })?
                };
                let category = if repeated || !self.ctx.expr(e).is_lvalue() {
                    Category::Rvalue
                } else {
                    Category::Lvalue
                };
                let qt = if repeated {
                    QualifiedType::new(result_ty).as_const()
                } else {
                    QualifiedType::new(result_ty)
                };
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: qt,
                    category,
                    kind: ExprKind::VectorElement(VectorElementExpr { expression: e, positions }),
                }))
            }
            Type::Struct {
                member_declarations,
                name: struct_name,
                ..
            } => {
                if self.check(TokenKind::LeftParenthesis) {
                    self.advance();
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RightParenthesis)?;
                    let method = member_declarations
                        .iter()
                        .copied()
                        .find(|&id| self.ctx.decl(id).name.as_deref() == Some(name.as_str()))
                        .ok_or_else(|| ParseError::InvalidMember {
                            name: name.clone(),
                            type_name: struct_name.clone(),
                            pos,
                        })?;
                    let return_ty = self.ctx.decl(method).qualified_type;
                    let callee = self.ctx.alloc_expr(Expr {
                        qualified_type: return_ty,
                        category: Category::Rvalue,
                        kind: ExprKind::DeclarationReference(method),
                    });
                    Ok(self.ctx.alloc_expr(Expr {
                        qualified_type: return_ty,
                        category: Category::Rvalue,
                        kind: ExprKind::Call(CallExpr {
                            declaration_reference: callee,
                            arguments: args,
                        }),
                    }))
                } else {
                    let field = member_declarations
                        .iter()
                        .copied()
                        .find(|&id| {
                            matches!(self.ctx.decl(id).kind, DeclKind::Field)
                                && self.ctx.decl(id).name.as_deref() == Some(name.as_str())
                        })
                        .ok_or_else(|| ParseError::InvalidMember {
                            name: name.clone(),
                            type_name: struct_name.clone(),
                            pos,
                        })?;
                    let base_const = self.ctx.expr(e).qualified_type.is_const();
                    let mut qt = self.ctx.decl(field).qualified_type;
                    if base_const {
                        qt = qt.as_const();
                    }
                    let category = if self.ctx.expr(e).is_lvalue() {
                        Category::Lvalue
                    } else {
                        Category::Rvalue
                    };
                    Ok(self.ctx.alloc_expr(Expr {
                        qualified_type: qt,
                        category,
                        kind: ExprKind::Member(MemberExpr {
                            expression: e,
                            field_declaration: field,
                        }),
                    }))
                }
            }
            _ => Err(ParseError::InvalidMember {
                name,
                type_name: self.ctx.printable_name(QualifiedType::new(base_ty)),
                pos,
            }),
        }
    }

    pub(crate) fn parse_argument_list(&mut self) -> ParseResult<Vec<ExprId>> {
        let mut args = Vec::new();
        if self.check(TokenKind::RightParenthesis) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_assignment_expression()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        Ok(args)
    }

    fn parse_primary_expression(&mut self) -> ParseResult<ExprId> {
        let pos = self.pos();
        match self.peek().kind {
            TokenKind::IntLiteral => {
                let tok = self.advance();
                let v: i64 = tok.lexeme.parse().map_err(|_| ParseError::InvalidNumber {
                    reason: "integer literal out of range".into(),
                    pos,
                })?;
                let ty = self.ctx.builtins.int;
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(ty),
                    category: Category::Rvalue,
                    kind: ExprKind::Literal(Literal::Integer(v)),
                }))
            }
            TokenKind::FloatLiteral | TokenKind::DoubleLiteral => {
                let tok = self.advance();
                let v: f64 = tok
                    .lexeme
                    .trim_end_matches(['f', 'F'])
                    .parse()
                    .map_err(|_| ParseError::InvalidNumber {
                        reason: "float literal out of range".into(),
                        pos,
                    })?;
                let ty = self.ctx.builtins.float;
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(ty),
                    category: Category::Rvalue,
                    kind: ExprKind::Literal(Literal::FloatingPoint(v)),
                }))
            }
            TokenKind::StringLiteral => {
                let tok = self.advance();
                let ty = self.ctx.builtins.string;
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(ty),
                    category: Category::Rvalue,
                    kind: ExprKind::Literal(Literal::String(tok.lexeme)),
                }))
            }
            TokenKind::True | TokenKind::False => {
                let tok = self.advance();
                let ty = self.ctx.builtins.bool_;
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(ty),
                    category: Category::Rvalue,
                    kind: ExprKind::Literal(Literal::Boolean(tok.kind == TokenKind::True)),
                }))
            }
            TokenKind::LeftParenthesis => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParenthesis)?;
                let qt = self.ctx.expr(inner).qualified_type;
                let cat = self.ctx.expr(inner).category;
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: qt,
                    category: cat,
                    kind: ExprKind::Paren(inner),
                }))
            }
            TokenKind::Discard => {
                self.advance();
                if self.eat(TokenKind::LeftParenthesis).is_some() {
                    self.expect(TokenKind::RightParenthesis)?;
                }
                let decl_id = self.ctx.builtins.discard;
                let void_ty = self.ctx.builtins.void;
                let callee = self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(void_ty),
                    category: Category::Rvalue,
                    kind: ExprKind::DeclarationReference(decl_id),
                });
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(void_ty),
                    category: Category::Rvalue,
                    kind: ExprKind::Call(CallExpr {
                        declaration_reference: callee,
                        arguments: Vec::new(),
                    }),
                }))
            }
            TokenKind::Bool | TokenKind::Int | TokenKind::Unsigned | TokenKind::Float => {
                let ty = self.parse_type_name()?;
                self.expect(TokenKind::LeftParenthesis)?;
                let args = self.parse_argument_list()?;
                self.expect(TokenKind::RightParenthesis)?;
                if args.len() != 1 {
                    return Err(ParseError::UnsupportedFeature {
                        what: "a scalar cast takes exactly one argument".into(),
                        pos,
                    });
                }
                Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(ty),
                    category: Category::Rvalue,
                    kind: ExprKind::Cast(CastExpr {
                        cast_kind: CastKind::Functional,
                        expression: args[0],
                    }),
                }))
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                if self.check(TokenKind::LeftParenthesis) {
                    self.advance();
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RightParenthesis)?;
                    if let Some(ty) = self.scopes.find_type(self.ctx, &name) {
                        self.build_temporary_object(ty, args, pos)
                    } else {
                        let arg_types: Vec<TypeId> = args
                            .iter()
                            .map(|&a| self.ctx.expr(a).qualified_type.ty)
                            .collect();
                        let decl_id = crate::scope::resolve_function_declaration(
                            self.ctx,
                            &self.scopes,
                            &name,
                            &arg_types,
                            pos,
                        )?;
                        let return_qt = self.ctx.decl(decl_id).qualified_type;
                        let callee = self.ctx.alloc_expr(Expr {
                            qualified_type: return_qt,
                            category: Category::Rvalue,
                            kind: ExprKind::DeclarationReference(decl_id),
                        });
                        Ok(self.ctx.alloc_expr(Expr {
                            qualified_type: return_qt,
                            category: Category::Rvalue,
                            kind: ExprKind::Call(CallExpr {
                                declaration_reference: callee,
                                arguments: args,
                            }),
                        }))
                    }
                } else {
                    let decl_id = self
                        .scopes
                        .find_declaration(self.ctx, &name)
                        .ok_or(ParseError::UnknownIdentifier { name, pos })?;
                    let qt = self.ctx.decl(decl_id).qualified_type;
                    // §3.4: a reference expression is Lvalue only for Variable —
                    // Rvalue for Type and, by design, Parameter — even though a
                    // Parameter itself is lvalue-*producing* for assignment-target
                    // checks (§3.3's `produces_lvalue`, a declaration-level property
                    // this reference-expression category does not reuse).
                    let category = if matches!(self.ctx.decl(decl_id).kind, DeclKind::Variable(_)) {
                        Category::Lvalue
                    } else {
                        Category::Rvalue
                    };
                    Ok(self.ctx.alloc_expr(Expr {
                        qualified_type: qt,
                        category,
                        kind: ExprKind::DeclarationReference(decl_id),
                    }))
                }
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "an expression".into(),
                got: other.to_string(),
                pos,
            }),
        }
    }

    fn build_temporary_object(&mut self, ty: TypeId, args: Vec<ExprId>, pos: Position) -> ParseResult<ExprId> {
        match self.ctx.ty(ty).clone() {
            Type::Vector {
                component_type,
                component_count,
                name,
            } => self.build_vector_initializer(ty, component_type, component_count, args, &name, pos),
            Type::Matrix {
                component_type,
                row_count,
                column_count,
                name,
            } => self.build_matrix_initializer(ty, component_type, row_count, column_count, args, &name, pos),
            Type::Struct {
                member_declarations,
                complete,
                opaque,
                name,
            } => {
                if opaque || !complete {
                    return Err(ParseError::NoMatchingConstructor { type_name: name, pos });
                }
                let arg_types: Vec<TypeId> = args
                    .iter()
                    .map(|&a| self.ctx.expr(a).qualified_type.ty)
                    .collect();
                if let Some(ctor) = resolve_constructor_declaration(self.ctx, &member_declarations, &arg_types) {
                    return Ok(self.ctx.alloc_expr(Expr {
                        qualified_type: QualifiedType::new(ty),
                        category: Category::Rvalue,
                        kind: ExprKind::TemporaryObject(TemporaryObjectExpr {
                            constructor_declaration: Some(ctor),
                            parameters: args,
                        }),
                    }));
                }
                let fields: Vec<DeclId> = member_declarations
                    .iter()
                    .copied()
                    .filter(|&id| matches!(self.ctx.decl(id).kind, DeclKind::Field))
                    .collect();
                let matches_memberwise = fields.len() == args.len()
                    && fields
                        .iter()
                        .zip(arg_types.iter())
                        .all(|(&f, &a)| self.ctx.decl(f).qualified_type.ty == a);
                if matches_memberwise {
                    Ok(self.ctx.alloc_expr(Expr {
                        qualified_type: QualifiedType::new(ty),
                        category: Category::Rvalue,
                        kind: ExprKind::TemporaryObject(TemporaryObjectExpr {
                            constructor_declaration: None,
                            parameters: args,
                        }),
                    }))
                } else {
                    Err(ParseError::NoMatchingConstructor { type_name: name, pos })
                }
            }
            _ => Err(ParseError::UnsupportedFeature {
                what: format!(
                    "'{}' is not constructible",
                    self.ctx.printable_name(QualifiedType::new(ty))
                ),
                pos,
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_vector_initializer(
        &mut self,
        ty: TypeId,
        _component_type: TypeId,
        component_count: u8,
        args: Vec<ExprId>,
        name: &str,
        pos: Position,
    ) -> ParseResult<ExprId> {
        if args.len() == 1 {
            let at = self.ctx.expr(args[0]).qualified_type.ty;
            if at == ty || self.ctx.ty(at).is_scalar() {
                return Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(ty),
                    category: Category::Rvalue,
                    kind: ExprKind::VectorInitialize(args),
                }));
            }
        }
        let mut total = 0u32;
        for &a in &args {
            let at = self.ctx.expr(a).qualified_type.ty;
            total += match self.ctx.ty(at) {
                Type::Scalar { .. } => 1,
                Type::Vector { component_count, .. } => *component_count as u32,
                _ => {
                    return Err(ParseError::InvalidVectorInit {
                        type_name: name.to_string(),
                        reason: "arguments must be scalars or vectors".into(),
                        pos,
                    })
                }
            };
        }
        if total != component_count as u32 {
            return Err(ParseError::InvalidVectorInit {
                type_name: name.to_string(),
                reason: format!("expected {} components, got {}", component_count, total),
                pos,
            });
        }
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: QualifiedType::new(ty),
            category: Category::Rvalue,
            kind: ExprKind::VectorInitialize(args),
        }))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_matrix_initializer(
        &mut self,
        ty: TypeId,
        _component_type: TypeId,
        row_count: u8,
        column_count: u8,
        args: Vec<ExprId>,
        name: &str,
        pos: Position,
    ) -> ParseResult<ExprId> {
        let total_cells = row_count as u32 * column_count as u32;
        if args.len() == 1 {
            let at = self.ctx.expr(args[0]).qualified_type.ty;
            if at == ty || self.ctx.ty(at).is_scalar() {
                return Ok(self.ctx.alloc_expr(Expr {
                    qualified_type: QualifiedType::new(ty),
                    category: Category::Rvalue,
                    kind: ExprKind::MatrixInitialize(args),
                }));
            }
        }
        let mut total = 0u32;
        for &a in &args {
            let at = self.ctx.expr(a).qualified_type.ty;
            total += match self.ctx.ty(at) {
                Type::Scalar { .. } => 1,
                Type::Vector { component_count, .. } => *component_count as u32,
                Type::Matrix {
                    row_count, column_count, ..
                } => *row_count as u32 * *column_count as u32,
                _ => {
                    return Err(ParseError::InvalidMatrixInit {
                        type_name: name.to_string(),
                        reason: "arguments must be scalars, vectors, or matrices".into(),
                        pos,
                    })
                }
            };
        }
        if total != total_cells {
            return Err(ParseError::InvalidMatrixInit {
                type_name: name.to_string(),
                reason: format!("expected {} components, got {}", total_cells, total),
                pos,
            });
        }
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: QualifiedType::new(ty),
            category: Category::Rvalue,
            kind: ExprKind::MatrixInitialize(args),
        }))
    }

    /// Parses a brace-enclosed initializer list, used on the right of `=` in
    /// a declarator (§3.4 `InitializerList`; §9 Open Question 4 — element
    /// types are taken from each element's own expression, not unified
    /// against `qt` independently).
    pub(crate) fn parse_initializer_list(&mut self, qt: QualifiedType) -> ParseResult<ExprId> {
        self.expect(TokenKind::LeftBrace)?;
        let mut elems = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                elems.push(self.parse_assignment_expression()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(self.ctx.alloc_expr(Expr {
            qualified_type: qt,
            category: Category::Rvalue,
            kind: ExprKind::InitializerList(elems),
        }))
    }
}

/// Maps a swizzle suffix like `"xyz"` or `"rgba"` to 0-based component
/// indices, rejecting mixed letter sets, out-of-range indices, and overlong
/// (>4 component) swizzles.
fn swizzle_positions(name: &str, component_count: u8) -> Option<Vec<u8>> {
    if name.is_empty() || name.len() > 4 {
        return None;
    }
    const XYZW: &[u8] = b"xyzw";
    const RGBA: &[u8] = b"rgba";
    let bytes = name.as_bytes();
    let table = if XYZW.contains(&bytes[0]) {
        XYZW
    } else if RGBA.contains(&bytes[0]) {
        RGBA
    } else {
        return None;
    };
    let mut positions = Vec::with_capacity(bytes.len());
    for &b in bytes {
        let idx = table.iter().position(|&t| t == b)?;
        if idx as u8 >= component_count {
            return None;
        }
        positions.push(idx as u8);
    }
    Some(positions)
}

fn has_duplicate(positions: &[u8]) -> bool {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if positions[i] == positions[j] {
                return true;
            }
        }
    }
    false
}
