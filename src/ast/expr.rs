//! Expressions.
//!
//! Every expression carries a `{qualified_type, category}` pair (§3.4).
//! Category rules are enforced while building the tree in `parser/expr.rs`;
//! this module only holds the resulting shape.

use super::DeclId;
use crate::types::QualifiedType;

/// Index into `Context`'s expression arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Lvalue,
    Rvalue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperatorKind {
    Negation,         // !
    Positive,         // +
    Negative,         // -
    PrefixIncrement,  // ++x
    PrefixDecrement,  // --x
    PostfixIncrement, // x++
    PostfixDecrement, // x--
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    AdditionAssignment,
    SubtractAssignment,
    MultiplicationAssignment,
    DivisionAssignment,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Equality,
    Inequality,
    Assignment,
    Or,
    And,
    Comma,
    Subscript,
}

impl BinaryOperatorKind {
    /// Compound-assignment forms yield Lvalue; plain `=` yields Rvalue — an
    /// intentional inconsistency preserved from the source tool (Open
    /// Question 3; emitters must tolerate both).
    pub fn is_compound_assignment(&self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::AdditionAssignment
                | BinaryOperatorKind::SubtractAssignment
                | BinaryOperatorKind::MultiplicationAssignment
                | BinaryOperatorKind::DivisionAssignment
        )
    }

    pub fn is_assignment(&self) -> bool {
        self.is_compound_assignment() || matches!(self, BinaryOperatorKind::Assignment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    CStyle,
    Functional,
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    FloatingPoint(f64),
    String(String),
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub declaration_reference: ExprId,
    pub arguments: Vec<ExprId>,
}

#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub expression: ExprId,
    pub field_declaration: DeclId,
}

#[derive(Debug, Clone)]
pub struct ArraySubscriptExpr {
    pub expression: ExprId,
    pub subscript: ExprId,
}

#[derive(Debug, Clone)]
pub struct UnaryOperatorExpr {
    pub operator_kind: UnaryOperatorKind,
    pub expression: ExprId,
}

#[derive(Debug, Clone)]
pub struct BinaryOperatorExpr {
    pub operator_kind: BinaryOperatorKind,
    pub left_expression: ExprId,
    pub right_expression: ExprId,
}

#[derive(Debug, Clone)]
pub struct TernaryOperatorExpr {
    pub condition: ExprId,
    pub left_expression: ExprId,
    pub right_expression: ExprId,
}

#[derive(Debug, Clone)]
pub struct TemporaryObjectExpr {
    pub constructor_declaration: Option<DeclId>,
    pub parameters: Vec<ExprId>,
}

#[derive(Debug, Clone)]
pub struct CastExpr {
    pub cast_kind: CastKind,
    pub expression: ExprId,
}

#[derive(Debug, Clone)]
pub struct VectorElementExpr {
    /// The vector expression the swizzle is applied to.
    pub expression: ExprId,
    /// 0..4 component indices, one per swizzle letter, in source order.
    pub positions: Vec<u8>,
}

/// The operand of a `sizeof` expression: either a bare parenthesized type
/// name or a general expression (§4.4.3).
#[derive(Debug, Clone)]
pub enum SizeofOperand {
    Type(crate::types::TypeId),
    Expression(ExprId),
}

/// Variant-specific payload for one expression node.
#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    DeclarationReference(DeclId),
    Call(CallExpr),
    Paren(ExprId),
    Member(MemberExpr),
    ArraySubscript(ArraySubscriptExpr),
    UnaryOperator(UnaryOperatorExpr),
    BinaryOperator(BinaryOperatorExpr),
    TernaryOperator(TernaryOperatorExpr),
    TemporaryObject(TemporaryObjectExpr),
    InitializerList(Vec<ExprId>),
    Cast(CastExpr),
    VectorInitialize(Vec<ExprId>),
    VectorElement(VectorElementExpr),
    MatrixInitialize(Vec<ExprId>),
    Sizeof(SizeofOperand),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub qualified_type: QualifiedType,
    pub category: Category,
    pub kind: ExprKind,
}

impl Expr {
    pub fn is_lvalue(&self) -> bool {
        matches!(self.category, Category::Lvalue)
    }
}
