//! Token kinds and the keyword table.
//!
//! Mirrors the ~130-variant token kind enumeration of the source tool: literals,
//! a C/C++-like keyword subset, punctuation and operators (including the
//! alternative spellings `and`/`or`/`not`/`bitand`/etc.).

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // literals
    CharLiteral,
    IntLiteral,
    FloatLiteral,
    DoubleLiteral,
    StringLiteral,

    // keywords
    And,
    Asm,
    Auto,
    Bool,
    Break,
    Case,
    Catch,
    Char,
    Class,
    Const,
    ConstCast,
    Continue,
    Default,
    Delete,
    Do,
    Double,
    DynamicCast,
    Else,
    Enum,
    Explicit,
    Export,
    Extern,
    False,
    Float,
    For,
    Friend,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Mutable,
    Namespace,
    New,
    Noexcept,
    Not,
    NotEq,
    Nullptr,
    Operator,
    Or,
    Private,
    Protected,
    Public,
    Register,
    ReinterpretCast,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    StaticCast,
    Struct,
    Switch,
    Template,
    This,
    Throw,
    True,
    Try,
    Typedef,
    Typeid,
    Typename,
    Uniform,
    Union,
    Unsigned,
    Using,
    Varying,
    Virtual,
    Void,
    Volatile,
    WcharT,
    While,

    // shader-specific keywords, not present in plain C++
    In,
    Inout,
    Out,
    Fragment,
    Vertex,
    Discard,

    // punctuation
    LeftParenthesis,
    RightParenthesis,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    DoubleLeftBracket,
    DoubleRightBracket,
    Comma,
    Semicolon,
    Colon,

    // operators
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Increment,
    Decrement,
    Assignment,
    PlusAssignment,
    MinusAssignment,
    MultiplyAssignment,
    DivideAssignment,
    ModuloAssignment,
    BitwiseAndAssignment,
    BitwiseOrAssignment,
    BitwiseNotAssignment,
    BitwiseXorAssignment,
    ShiftRightAssignment,
    ShiftLeftAssignment,
    BitwiseAnd,
    BitwiseOr,
    BitwiseNot,
    BitwiseXor,
    ShiftRight,
    ShiftLeft,
    Equal,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    Conditional,
    Dot,
    Arrow,
    Ellipsis,

    Identifier,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexical token.
///
/// `line` and `column` are both 1-indexed; `lexeme` is the exact source slice
/// that produced this token. Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// The static keyword table, built once.
///
/// Includes both the canonical spelling (`&&`) and the alternative operator
/// spellings the original tool accepts (`and`).
pub static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    let mut m = HashMap::new();
    let entries: &[(&str, TokenKind)] = &[
        ("and", And),
        ("and_eq", BitwiseAndAssignment),
        ("asm", Asm),
        ("auto", Auto),
        ("bitand", BitwiseAnd),
        ("bitor", BitwiseOr),
        ("bool", Bool),
        ("break", Break),
        ("case", Case),
        ("catch", Catch),
        ("char", Char),
        ("class", Class),
        ("compl", BitwiseNot),
        ("const", Const),
        ("const_cast", ConstCast),
        ("continue", Continue),
        ("default", Default),
        ("delete", Delete),
        ("discard", Discard),
        ("do", Do),
        ("double", Double),
        ("dynamic_cast", DynamicCast),
        ("else", Else),
        ("enum", Enum),
        ("explicit", Explicit),
        ("export", Export),
        ("extern", Extern),
        ("false", False),
        ("float", Float),
        ("for", For),
        ("fragment", Fragment),
        ("friend", Friend),
        ("goto", Goto),
        ("if", If),
        ("in", In),
        ("inline", Inline),
        ("inout", Inout),
        ("int", Int),
        ("long", Long),
        ("mutable", Mutable),
        ("namespace", Namespace),
        ("new", New),
        ("noexcept", Noexcept),
        ("not", Not),
        ("not_eq", NotEq),
        ("nullptr", Nullptr),
        ("operator", Operator),
        ("or", Or),
        ("or_eq", BitwiseOrAssignment),
        ("out", Out),
        ("private", Private),
        ("protected", Protected),
        ("public", Public),
        ("register", Register),
        ("reinterpret_cast", ReinterpretCast),
        ("return", Return),
        ("short", Short),
        ("signed", Signed),
        ("sizeof", Sizeof),
        ("static", Static),
        ("static_cast", StaticCast),
        ("struct", Struct),
        ("switch", Switch),
        ("template", Template),
        ("this", This),
        ("throw", Throw),
        ("true", True),
        ("try", Try),
        ("typedef", Typedef),
        ("typeid", Typeid),
        ("typename", Typename),
        ("uniform", Uniform),
        ("union", Union),
        ("unsigned", Unsigned),
        ("using", Using),
        ("varying", Varying),
        ("vertex", Vertex),
        ("virtual", Virtual),
        ("void", Void),
        ("volatile", Volatile),
        ("wchar_t", WcharT),
        ("while", While),
        ("xor", BitwiseXor),
        ("xor_eq", BitwiseXorAssignment),
    ];
    for (s, k) in entries {
        m.insert(*s, *k);
    }
    m
});
