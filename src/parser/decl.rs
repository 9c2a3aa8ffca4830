//! Declaration parsing: top-level and block-scoped declarations, struct
//! bodies, constructors, methods, function/variable declarators (§4.4.1,
//! §4.4.2).

use super::{attrs_from_specifiers, Parser, Specifiers};
use crate::ast::decl::{
    CallableDecl, CallableKind, Decl, DeclKind, ParameterDecl, StorageClass, VariableDecl,
};
use crate::ast::DeclId;
use crate::error::{ParseError, ParseResult, Position};
use crate::token::TokenKind;
use crate::types::{InputModifier, QualifiedType, Qualifiers, Type, TypeId};

impl<'a> Parser<'a> {
    pub(crate) fn storage_class(spec: &Specifiers) -> StorageClass {
        if spec.is_extern {
            StorageClass::Extern
        } else if spec.is_static {
            StorageClass::Static
        } else {
            StorageClass::Auto
        }
    }

    pub(crate) fn qualifiers(spec: &Specifiers) -> Qualifiers {
        let mut q = Qualifiers::NONE;
        if spec.is_const {
            q |= Qualifiers::CONST;
        }
        if spec.is_volatile {
            q |= Qualifiers::VOLATILE;
        }
        if spec.is_in {
            q |= Qualifiers::IN;
        }
        if spec.is_out {
            q |= Qualifiers::OUT;
        }
        q
    }

    /// Resolves the base type named at the current position: a built-in
    /// keyword, a `struct` introduction, or a previously declared type name.
    pub(crate) fn parse_type_name(&mut self) -> ParseResult<TypeId> {
        let pos = self.pos();
        match self.peek().kind {
            TokenKind::Void => {
                self.advance();
                Ok(self.ctx.builtins.void)
            }
            TokenKind::Bool => {
                self.advance();
                Ok(self.ctx.builtins.bool_)
            }
            TokenKind::Int => {
                self.advance();
                Ok(self.ctx.builtins.int)
            }
            TokenKind::Unsigned => {
                self.advance();
                // `unsigned int` and bare `unsigned` name the same type.
                self.eat(TokenKind::Int);
                Ok(self.ctx.builtins.uint)
            }
            TokenKind::Float => {
                self.advance();
                Ok(self.ctx.builtins.float)
            }
            TokenKind::Struct => {
                self.advance();
                let (ty, _decl) = self.parse_struct_type()?;
                Ok(ty)
            }
            TokenKind::Double => Err(ParseError::UnsupportedFeature {
                what: "'double' is not supported, use 'float'".into(),
                pos,
            }),
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                self.scopes
                    .find_type(self.ctx, &name)
                    .ok_or(ParseError::UnknownType { name, pos })
            }
            _ => Err(ParseError::UnexpectedToken {
                expected: "a type".into(),
                got: self.peek().kind.to_string(),
                pos,
            }),
        }
    }

    /// Parses a `struct Name { ... }` or `struct Name;` introduction. The
    /// `struct` keyword itself must already have been consumed.
    ///
    /// Returns `(type, decl)`: the struct's `TypeId` and the `TypeDeclaration`
    /// that names it. Redeclaring a known, still-incomplete struct with a
    /// body completes it in place; redeclaring a complete struct with a body
    /// is a redefinition error. A bare re-mention with no body is a no-op
    /// that returns the existing pair.
    fn parse_struct_type(&mut self) -> ParseResult<(TypeId, DeclId)> {
        let name_tok = self.expect(TokenKind::Identifier)?;
        let pos = Position {
            line: name_tok.line,
            column: name_tok.column,
        };
        let name = name_tok.lexeme;

        if let Some(existing_decl) = self.scopes.find_in_current_scope(self.ctx, &name) {
            let existing_ty = self
                .ctx
                .decl(existing_decl)
                .as_type()
                .expect("name already bound to a type declaration");
            if self.check(TokenKind::LeftBrace) {
                if self.ctx.ty(existing_ty).is_complete() {
                    return Err(ParseError::Redefinition { name, pos });
                }
                self.parse_struct_body(existing_ty)?;
                self.ctx.decl_mut(existing_decl).definition = Some(existing_decl);
            }
            return Ok((existing_ty, existing_decl));
        }

        let ty = self.ctx.alloc_type(Type::Struct {
            name: name.clone(),
            member_declarations: Vec::new(),
            complete: false,
            opaque: false,
        });
        let decl_id = self.ctx.alloc_decl(Decl {
            name: Some(name),
            qualified_type: QualifiedType::new(ty),
            first_declaration: DeclId(0),
            previous_declaration: None,
            definition: None,
            attributes: Vec::new(),
            kind: DeclKind::Type { ty },
        });
        self.ctx.decl_mut(decl_id).first_declaration = decl_id;
        self.scopes.declare(decl_id);

        if self.check(TokenKind::LeftBrace) {
            self.parse_struct_body(ty)?;
            self.ctx.decl_mut(decl_id).definition = Some(decl_id);
        }

        Ok((ty, decl_id))
    }

    /// Parses `{ member... }`, filling in `struct_ty`'s member declarations
    /// and marking it complete. Each member is a field, a constructor (an
    /// unnamed declarator matching the struct's own name), or a method.
    /// Members are not pushed onto the name-resolution scope stack: member
    /// lookup goes through the type's `member_declarations`, not `Scopes`.
    fn parse_struct_body(&mut self, struct_ty: TypeId) -> ParseResult<()> {
        self.expect(TokenKind::LeftBrace)?;
        let struct_name = self.ctx.ty(struct_ty).name().to_string();

        let mut members = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            if self.eat(TokenKind::Semicolon).is_some() {
                continue;
            }

            if self.check(TokenKind::Identifier)
                && self.peek().lexeme == struct_name
                && self.peek_at(1).kind == TokenKind::LeftParenthesis
            {
                members.push(self.parse_constructor()?);
                continue;
            }

            let spec = self.parse_specifiers()?;
            let base_ty = self.parse_type_name()?;
            let mut spec = spec;
            let more = self.parse_specifiers()?;
            spec.is_const |= more.is_const;
            spec.is_volatile |= more.is_volatile;
            let qt = QualifiedType::with_qualifiers(base_ty, Self::qualifiers(&spec));

            if self.check(TokenKind::Operator) {
                return Err(ParseError::UnsupportedFeature {
                    what: "operator overloading is not supported".into(),
                    pos: self.pos(),
                });
            }
            let name_tok = self.expect(TokenKind::Identifier)?;
            let name = name_tok.lexeme;

            if self.check(TokenKind::LeftParenthesis) {
                members.push(self.parse_method(qt, name, &spec)?);
            } else {
                let qt = self.parse_array_suffix(qt)?;
                let more = self.parse_specifiers()?;
                spec.semantic_attr = spec.semantic_attr.or(more.semantic_attr);
                self.expect(TokenKind::Semicolon)?;

                if self.ctx.ty(qt.ty).is_void() {
                    return Err(ParseError::VoidTypeNotAllowed { pos: self.pos() });
                }
                if members.iter().any(|&id| self.ctx.decl(id).name.as_deref() == Some(name.as_str())) {
                    return Err(ParseError::Redefinition {
                        name,
                        pos: self.pos(),
                    });
                }
                let attrs = attrs_from_specifiers(self.ctx, &spec);
                let decl_id = self.ctx.alloc_decl(Decl {
                    name: Some(name),
                    qualified_type: qt,
                    first_declaration: DeclId(0),
                    previous_declaration: None,
                    definition: None,
                    attributes: attrs,
                    kind: DeclKind::Field,
                });
                self.ctx.decl_mut(decl_id).first_declaration = decl_id;
                members.push(decl_id);
            }
        }
        self.expect(TokenKind::RightBrace)?;

        if let Type::Struct {
            member_declarations,
            complete,
            ..
        } = self.ctx.ty_mut(struct_ty)
        {
            *member_declarations = members;
            *complete = true;
        }
        Ok(())
    }

    fn parse_constructor(&mut self) -> ParseResult<DeclId> {
        self.advance(); // the struct's own name
        self.expect(TokenKind::LeftParenthesis)?;
        let void_ty = self.ctx.builtins.void;

        let (params, body) = self.scoped(|p| {
            let params = p.parse_parameter_list()?;
            p.expect(TokenKind::RightParenthesis)?;
            let body = if p.check(TokenKind::LeftBrace) {
                Some(p.parse_compound_statement()?)
            } else {
                p.expect(TokenKind::Semicolon)?;
                None
            };
            Ok((params, body))
        })?;

        let decl_id = self.ctx.alloc_decl(Decl {
            name: None,
            qualified_type: QualifiedType::new(void_ty),
            first_declaration: DeclId(0),
            previous_declaration: None,
            definition: None,
            attributes: Vec::new(),
            kind: DeclKind::Callable(CallableDecl {
                callable_kind: CallableKind::Constructor,
                storage_class: StorageClass::Auto,
                parameter_declarations: params,
                body,
                is_builtin: false,
            }),
        });
        self.ctx.decl_mut(decl_id).first_declaration = decl_id;
        Ok(decl_id)
    }

    fn parse_method(&mut self, qt: QualifiedType, name: String, spec: &Specifiers) -> ParseResult<DeclId> {
        self.expect(TokenKind::LeftParenthesis)?;

        let (params, body) = self.scoped(|p| {
            let params = p.parse_parameter_list()?;
            p.expect(TokenKind::RightParenthesis)?;
            let body = if p.check(TokenKind::LeftBrace) {
                Some(p.parse_compound_statement()?)
            } else {
                p.expect(TokenKind::Semicolon)?;
                None
            };
            Ok((params, body))
        })?;

        let attrs = attrs_from_specifiers(self.ctx, spec);
        let decl_id = self.ctx.alloc_decl(Decl {
            name: Some(name),
            qualified_type: qt,
            first_declaration: DeclId(0),
            previous_declaration: None,
            definition: None,
            attributes: attrs,
            kind: DeclKind::Callable(CallableDecl {
                callable_kind: CallableKind::Method,
                storage_class: Self::storage_class(spec),
                parameter_declarations: params,
                body,
                is_builtin: false,
            }),
        });
        self.ctx.decl_mut(decl_id).first_declaration = decl_id;
        Ok(decl_id)
    }

    /// Parses zero or more `[N]` array-size suffixes onto `qt`, interning
    /// through `Context::get_array_type` (§3.2 invariant). Suffixes apply
    /// innermost-first: `float a[2][3]` is an array of 2 arrays of 3 floats.
    pub(crate) fn parse_array_suffix(&mut self, qt: QualifiedType) -> ParseResult<QualifiedType> {
        let mut dims = Vec::new();
        while self.eat(TokenKind::LeftBracket).is_some() {
            let pos = self.pos();
            let size_tok = self.expect(TokenKind::IntLiteral)?;
            let size: u32 = size_tok
                .lexeme
                .parse()
                .map_err(|_| ParseError::InvalidSubscript {
                    reason: "array size must be a non-negative integer literal".into(),
                    pos,
                })?;
            self.expect(TokenKind::RightBracket)?;
            dims.push(size);
        }
        let mut qt = qt;
        for size in dims.into_iter().rev() {
            let ty = self.ctx.get_array_type(qt, size);
            qt = QualifiedType::new(ty);
        }
        Ok(qt)
    }

    /// Parses one parameter list (already past `(`, stopping before `)`),
    /// declaring each parameter into the scope the caller has just opened.
    pub(crate) fn parse_parameter_list(&mut self) -> ParseResult<Vec<DeclId>> {
        let mut params = Vec::new();
        if self.check(TokenKind::RightParenthesis) {
            return Ok(params);
        }
        if self.check(TokenKind::Void) && self.peek_at(1).kind == TokenKind::RightParenthesis {
            self.advance();
            return Ok(params);
        }
        loop {
            let spec = self.parse_specifiers()?;
            let base_ty = self.parse_type_name()?;
            let more = self.parse_specifiers()?;
            let mut spec = spec;
            spec.is_const |= more.is_const;
            spec.is_volatile |= more.is_volatile;
            spec.is_in |= more.is_in;
            spec.is_out |= more.is_out;

            let qualifiers = Self::qualifiers(&spec);
            let qt = QualifiedType::with_qualifiers(base_ty, qualifiers);
            let name = self.eat(TokenKind::Identifier).map(|t| t.lexeme);
            let qt = self.parse_array_suffix(qt)?;

            if self.ctx.ty(qt.ty).is_void() {
                return Err(ParseError::VoidTypeNotAllowed { pos: self.pos() });
            }

            if let Some(n) = &name {
                if self.scopes.find_in_current_scope(self.ctx, n).is_some() {
                    return Err(ParseError::Redefinition {
                        name: n.clone(),
                        pos: self.pos(),
                    });
                }
            }

            let modifier = InputModifier::from_qualifiers(qualifiers);
            let decl_id = self.ctx.alloc_decl(Decl {
                name,
                qualified_type: qt,
                first_declaration: DeclId(0),
                previous_declaration: None,
                definition: None,
                attributes: Vec::new(),
                kind: DeclKind::Parameter(ParameterDecl {
                    input_modifier: modifier,
                }),
            });
            self.ctx.decl_mut(decl_id).first_declaration = decl_id;
            self.scopes.declare(decl_id);
            params.push(decl_id);

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        Ok(params)
    }

    /// Parses one external (top-level) declaration: §4.4.1 step 1. Returns
    /// the struct's own `TypeDeclaration` for a struct-only declaration, so
    /// the caller pushes it to `Context.top_level` in source order just like
    /// any other top-level declaration (§3.7) — `Some(id)` in every case.
    pub(crate) fn parse_external_declaration(&mut self) -> ParseResult<Option<DeclId>> {
        if self.check(TokenKind::Typedef) {
            return Err(ParseError::UnsupportedFeature {
                what: "'typedef' is not supported".into(),
                pos: self.pos(),
            });
        }
        let spec = self.parse_specifiers()?;
        let struct_only = self.check(TokenKind::Struct);
        let struct_decl = if struct_only {
            self.advance();
            Some(self.parse_struct_type()?)
        } else {
            None
        };
        let base_ty = match struct_decl {
            Some((ty, _)) => ty,
            None => self.parse_type_name()?,
        };

        if struct_only && self.check(TokenKind::Semicolon) {
            self.advance();
            let (_, decl_id) = struct_decl.expect("struct_only implies struct_decl");
            return Ok(Some(decl_id));
        }

        let more = self.parse_specifiers()?;
        let mut spec = spec;
        spec.is_const |= more.is_const;
        spec.is_volatile |= more.is_volatile;
        spec.is_extern |= more.is_extern;
        spec.is_static |= more.is_static;
        spec.is_inline |= more.is_inline;
        spec.program_attr = spec.program_attr.or(more.program_attr);
        spec.semantic_attr = spec.semantic_attr.or(more.semantic_attr);

        if self.check(TokenKind::Operator) {
            return Err(ParseError::UnsupportedFeature {
                what: "operator overloading is not supported".into(),
                pos: self.pos(),
            });
        }
        let name_tok = self.expect(TokenKind::Identifier)?;
        let name = name_tok.lexeme;

        if self.check(TokenKind::LeftParenthesis) {
            return self.parse_function(base_ty, name, &spec).map(Some);
        }

        let qt = QualifiedType::with_qualifiers(base_ty, Self::qualifiers(&spec));
        self.parse_variable_tail(qt, name, &spec).map(Some)
    }

    fn parse_function(&mut self, return_ty: TypeId, name: String, spec: &Specifiers) -> ParseResult<DeclId> {
        let decl_pos = self.pos();
        self.expect(TokenKind::LeftParenthesis)?;

        let (params, body) = self.scoped(|p| {
            let params = p.parse_parameter_list()?;
            p.expect(TokenKind::RightParenthesis)?;
            let body = if p.check(TokenKind::LeftBrace) {
                Some(p.parse_compound_statement()?)
            } else {
                p.expect(TokenKind::Semicolon)?;
                None
            };
            Ok((params, body))
        })?;

        let param_types: Vec<TypeId> = params
            .iter()
            .map(|&p| self.ctx.decl(p).qualified_type.ty)
            .collect();
        let previous = self.find_matching_function(&name, &param_types);

        if body.is_some() {
            if let Some(p) = previous {
                if self.ctx.is_definition(p) {
                    return Err(ParseError::Redefinition { name, pos: decl_pos });
                }
            }
        }

        let attrs = attrs_from_specifiers(self.ctx, spec);
        let decl_id = self.ctx.alloc_decl(Decl {
            name: Some(name),
            qualified_type: QualifiedType::new(return_ty),
            first_declaration: DeclId(0),
            previous_declaration: previous,
            definition: None,
            attributes: attrs,
            kind: DeclKind::Callable(CallableDecl {
                callable_kind: CallableKind::Function,
                storage_class: Self::storage_class(spec),
                parameter_declarations: params,
                body,
                is_builtin: false,
            }),
        });
        self.ctx.decl_mut(decl_id).first_declaration = match previous {
            Some(p) => self.ctx.decl(p).first_declaration,
            None => decl_id,
        };
        if self.ctx.decl(decl_id).as_callable().and_then(|c| c.body).is_some() {
            self.ctx.decl_mut(decl_id).definition = Some(decl_id);
        }
        self.scopes.declare(decl_id);
        Ok(decl_id)
    }

    /// Finds an existing declaration of `name` in scope with an identical
    /// parameter-type signature, used to thread the redeclaration chain
    /// (`previous_declaration`) through repeated prototypes and a later
    /// definition.
    fn find_matching_function(&self, name: &str, param_types: &[TypeId]) -> Option<DeclId> {
        let mut scope_id = self.scopes.find_declaration(self.ctx, name);
        while let Some(id) = scope_id {
            if let Some(c) = self.ctx.decl(id).as_callable() {
                let existing_types: Vec<TypeId> = c
                    .parameter_declarations
                    .iter()
                    .map(|&p| self.ctx.decl(p).qualified_type.ty)
                    .collect();
                if existing_types == param_types {
                    return Some(id);
                }
            }
            scope_id = self.ctx.decl(id).previous_declaration;
        }
        None
    }

    fn parse_variable_tail(&mut self, qt: QualifiedType, name: String, spec: &Specifiers) -> ParseResult<DeclId> {
        let pos = self.pos();
        let qt = self.parse_array_suffix(qt)?;

        if self.ctx.ty(qt.ty).is_void() {
            return Err(ParseError::VoidTypeNotAllowed { pos });
        }

        let previous = self.scopes.find_in_current_scope(self.ctx, &name);
        let initializer = if self.eat(TokenKind::Assignment).is_some() {
            Some(self.parse_assignment_initializer(qt)?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        if let Some(existing) = previous {
            if initializer.is_some() && self.ctx.is_definition(existing) {
                return Err(ParseError::Redefinition { name, pos });
            }
        }

        let attrs = attrs_from_specifiers(self.ctx, spec);
        let decl_id = self.ctx.alloc_decl(Decl {
            name: Some(name),
            qualified_type: qt,
            first_declaration: DeclId(0),
            previous_declaration: previous,
            definition: None,
            attributes: attrs,
            kind: DeclKind::Variable(VariableDecl {
                storage_class: Self::storage_class(spec),
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

    /// Parses the right-hand side of `=` in a variable declarator: either a
    /// single expression or a brace-enclosed initializer list (§3.4
    /// `InitializerList`, §9 Open Question 4 — element types are taken from
    /// context, not unified independently).
    pub(crate) fn parse_assignment_initializer(&mut self, qt: QualifiedType) -> ParseResult<crate::ast::ExprId> {
        if self.check(TokenKind::LeftBrace) {
            self.parse_initializer_list(qt)
        } else {
            self.parse_assignment_expression()
        }
    }

    /// Parses a local (block-scoped) declaration, reusing the top-level
    /// grammar minus the function-declarator case (local functions are not
    /// part of the language).
    pub(crate) fn parse_local_declaration(&mut self) -> ParseResult<DeclId> {
        let spec = self.parse_specifiers()?;
        let base_ty = self.parse_type_name()?;
        let more = self.parse_specifiers()?;
        let mut spec = spec;
        spec.is_const |= more.is_const;
        spec.is_volatile |= more.is_volatile;

        let name_tok = self.expect(TokenKind::Identifier)?;
        let name = name_tok.lexeme;
        let qt = QualifiedType::with_qualifiers(base_ty, Self::qualifiers(&spec));
        self.parse_variable_tail(qt, name, &spec)
    }
}
