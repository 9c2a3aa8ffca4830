//! The AST root: arenas, built-in construction, and interning tables.
//!
//! `Context` owns every `Type`, `Decl`, `Stmt`, `Expr` and `Attr` for the
//! lifetime of one compilation. Every cross-reference elsewhere in the tree is
//! a `Copy` index into one of these arenas (§3.7, §9 "arena ownership").

use std::collections::HashMap;

use crate::ast::{Attr, Decl, DeclId, DeclKind, Stmt, StmtId};
use crate::ast::expr::{Expr, ExprId};
use crate::ast::attr::AttrId;
use crate::ast::decl::{CallableDecl, CallableKind, StorageClass};
use crate::types::{QualifiedType, ScalarKind, Type, TypeId};

/// Canonical names and ids of the types the `Context` constructor installs
/// before the parser ever runs (§4.3).
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub void: TypeId,
    pub bool_: TypeId,
    pub int: TypeId,
    pub uint: TypeId,
    pub float: TypeId,
    pub float2: TypeId,
    pub float3: TypeId,
    pub float4: TypeId,
    pub float2x2: TypeId,
    pub float3x3: TypeId,
    pub float4x4: TypeId,
    pub string: TypeId,
    pub texture2d: TypeId,
    pub texture2dms: TypeId,
    pub sampler_state: TypeId,
    pub discard: DeclId,
}

pub struct Context {
    types: Vec<Type>,
    decls: Vec<Decl>,
    stmts: Vec<Stmt>,
    exprs: Vec<Expr>,
    attrs: Vec<Attr>,

    /// Source-order top-level declarations.
    top_level: Vec<DeclId>,

    /// Index into `top_level` where compiler-installed built-ins end and the
    /// parsed program begins. Emitters walk only the tail past this point —
    /// the built-in type/`discard` declarations exist for name resolution,
    /// not for re-emission.
    user_decls_start: usize,

    array_cache: HashMap<(QualifiedType, u32), TypeId>,

    pub builtins: Builtins,
}

impl Context {
    /// Allocates the singleton `void`, the scalar/vector/matrix/opaque-struct
    /// built-ins, and the `discard` built-in function, exactly as §4.3
    /// enumerates. The parser is run afterwards by `crate::compile`.
    pub fn new() -> Self {
        let mut ctx = Context {
            types: Vec::new(),
            decls: Vec::new(),
            stmts: Vec::new(),
            exprs: Vec::new(),
            attrs: Vec::new(),
            top_level: Vec::new(),
            user_decls_start: 0,
            array_cache: HashMap::new(),
            builtins: Builtins {
                void: TypeId(0),
                bool_: TypeId(0),
                int: TypeId(0),
                uint: TypeId(0),
                float: TypeId(0),
                float2: TypeId(0),
                float3: TypeId(0),
                float4: TypeId(0),
                float2x2: TypeId(0),
                float3x3: TypeId(0),
                float4x4: TypeId(0),
                string: TypeId(0),
                texture2d: TypeId(0),
                texture2dms: TypeId(0),
                sampler_state: TypeId(0),
                discard: DeclId(0),
            },
        };

        let void = ctx.alloc_type(Type::Void);

        let bool_ = ctx.alloc_scalar("bool", ScalarKind::Boolean, false);
        let int = ctx.alloc_scalar("int", ScalarKind::Integer, false);
        let uint = ctx.alloc_scalar("unsigned int", ScalarKind::Integer, true);
        let float = ctx.alloc_scalar("float", ScalarKind::FloatingPoint, false);

        ctx.declare_builtin_type("void", void);
        ctx.declare_builtin_type("bool", bool_);
        ctx.declare_builtin_type("int", int);
        ctx.declare_builtin_type("unsigned int", uint);
        ctx.declare_builtin_type("float", float);

        let float2 = ctx.alloc_type(Type::Vector {
            name: "float2".into(),
            component_type: float,
            component_count: 2,
        });
        let float3 = ctx.alloc_type(Type::Vector {
            name: "float3".into(),
            component_type: float,
            component_count: 3,
        });
        let float4 = ctx.alloc_type(Type::Vector {
            name: "float4".into(),
            component_type: float,
            component_count: 4,
        });
        ctx.declare_builtin_type("float2", float2);
        ctx.declare_builtin_type("float3", float3);
        ctx.declare_builtin_type("float4", float4);

        let float2x2 = ctx.alloc_type(Type::Matrix {
            name: "float2x2".into(),
            component_type: float,
            row_count: 2,
            column_count: 2,
        });
        let float3x3 = ctx.alloc_type(Type::Matrix {
            name: "float3x3".into(),
            component_type: float,
            row_count: 3,
            column_count: 3,
        });
        let float4x4 = ctx.alloc_type(Type::Matrix {
            name: "float4x4".into(),
            component_type: float,
            row_count: 4,
            column_count: 4,
        });
        ctx.declare_builtin_type("float2x2", float2x2);
        ctx.declare_builtin_type("float3x3", float3x3);
        ctx.declare_builtin_type("float4x4", float4x4);

        let string = ctx.alloc_opaque_struct("string");
        let texture2d = ctx.alloc_opaque_struct("Texture2D");
        let texture2dms = ctx.alloc_opaque_struct("Texture2DMS");
        let sampler_state = ctx.alloc_opaque_struct("SamplerState");
        ctx.declare_builtin_type("string", string);
        ctx.declare_builtin_type("Texture2D", texture2d);
        ctx.declare_builtin_type("Texture2DMS", texture2dms);
        ctx.declare_builtin_type("SamplerState", sampler_state);

        let discard_id = ctx.alloc_decl(Decl {
            name: Some("discard".into()),
            qualified_type: QualifiedType::new(void),
            first_declaration: DeclId(0),
            previous_declaration: None,
            definition: None,
            attributes: Vec::new(),
            kind: DeclKind::Callable(CallableDecl {
                callable_kind: CallableKind::Function,
                storage_class: StorageClass::Auto,
                parameter_declarations: Vec::new(),
                body: None,
                is_builtin: true,
            }),
        });
        ctx.fix_first_declaration(discard_id);
        ctx.top_level.push(discard_id);

        ctx.builtins = Builtins {
            void,
            bool_,
            int,
            uint,
            float,
            float2,
            float3,
            float4,
            float2x2,
            float3x3,
            float4x4,
            string,
            texture2d,
            texture2dms,
            sampler_state,
            discard: discard_id,
        };
        ctx.user_decls_start = ctx.top_level.len();

        ctx
    }

    fn alloc_scalar(&mut self, name: &str, kind: ScalarKind, is_unsigned: bool) -> TypeId {
        self.alloc_type(Type::Scalar {
            name: name.to_string(),
            kind,
            is_unsigned,
        })
    }

    fn alloc_opaque_struct(&mut self, name: &str) -> TypeId {
        self.alloc_type(Type::Struct {
            name: name.to_string(),
            member_declarations: Vec::new(),
            complete: true,
            opaque: true,
        })
    }

    /// Installs a paired `TypeDeclaration` for a built-in type in the root
    /// scope, mirroring step 2 of §4.3. The returned `DeclId` is pushed onto
    /// the top-level declaration sequence so the parser's root scope can see
    /// it via name resolution.
    fn declare_builtin_type(&mut self, name: &str, ty: TypeId) -> DeclId {
        let id = self.alloc_decl(Decl {
            name: Some(name.to_string()),
            qualified_type: QualifiedType::new(ty),
            first_declaration: DeclId(0),
            previous_declaration: None,
            definition: None,
            attributes: Vec::new(),
            kind: DeclKind::Type { ty },
        });
        self.fix_first_declaration(id);
        self.top_level.push(id);
        id
    }

    fn fix_first_declaration(&mut self, id: DeclId) {
        self.decls[id.0 as usize].first_declaration = id;
    }

    // --- arena allocation ---

    pub fn alloc_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn alloc_attr(&mut self, attr: Attr) -> AttrId {
        let id = AttrId(self.attrs.len() as u32);
        self.attrs.push(attr);
        id
    }

    pub fn push_top_level(&mut self, id: DeclId) {
        self.top_level.push(id);
    }

    // --- accessors ---

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn ty_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.0 as usize]
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0 as usize]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0 as usize]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    pub fn attr(&self, id: AttrId) -> &Attr {
        &self.attrs[id.0 as usize]
    }

    pub fn declarations(&self) -> &[DeclId] {
        &self.top_level
    }

    /// The declarations the program itself wrote, in source order — built-in
    /// type/`discard` declarations excluded. This is what emitters walk
    /// (§4.6, §6.4).
    pub fn user_declarations(&self) -> &[DeclId] {
        &self.top_level[self.user_decls_start..]
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// `true` iff `id` is its own `definition` — i.e. this declaration
    /// carries the complete body/initializer rather than merely forward
    /// declaring the entity.
    pub fn is_definition(&self, id: DeclId) -> bool {
        self.decl(id).definition == Some(id)
    }

    // --- interning ---

    /// Interning lookup over array types: requesting the same
    /// `(element_type, size)` pair always returns the same `TypeId` (§3.2
    /// invariant, §8.1 property 4).
    pub fn get_array_type(&mut self, element_type: QualifiedType, size: u32) -> TypeId {
        if let Some(id) = self.array_cache.get(&(element_type, size)) {
            return *id;
        }
        let id = self.alloc_type(Type::Array { element_type, size });
        self.array_cache.insert((element_type, size), id);
        id
    }

    /// Interning lookup over vector types, used by matrix subscripting to
    /// recover "the row vector of this component type and length" (§4.4.3).
    /// Built-in vectors are pre-populated by the constructor; this never
    /// fabricates a new vector type, since the language has no syntax for
    /// declaring one.
    pub fn find_vector_type(&self, component_type: TypeId, count: u8) -> Option<TypeId> {
        self.types.iter().enumerate().find_map(|(i, t)| match t {
            Type::Vector {
                component_type: ct,
                component_count,
                ..
            } if *ct == component_type && *component_count == count => Some(TypeId(i as u32)),
            _ => None,
        })
    }

    /// Human-readable type name, expanding array dimensions, matching
    /// `getPrintableName` from the source tool.
    pub fn printable_name(&self, qt: QualifiedType) -> String {
        use crate::types::Qualifiers;
        let mut result = String::new();
        if qt.qualifiers.contains(Qualifiers::VOLATILE) {
            result.push_str("volatile ");
        }
        if qt.qualifiers.contains(Qualifiers::CONST) {
            result.push_str("const ");
        }
        let mut ty = self.ty(qt.ty);
        if let Type::Array { .. } = ty {
            let mut dims = String::new();
            loop {
                match ty {
                    Type::Array { element_type, size } => {
                        dims.push_str(&format!("[{}]", size));
                        ty = self.ty(element_type.ty);
                    }
                    _ => break,
                }
            }
            result.push_str(ty.name());
            result.push_str(&dims);
        } else {
            result.push_str(ty.name());
        }
        result
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}
