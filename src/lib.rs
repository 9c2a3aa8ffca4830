//! Cross-compiler front end for a small C-like GPU shading language.
//!
//! [`compile`] runs the full pipeline — preprocess, tokenize, parse with
//! integrated semantic analysis — and hands back a populated [`Context`]
//! (the typed AST) or the first [`ParseError`] encountered. Downstream
//! dialect emitters (`emit::glsl`, `emit::hlsl`, `emit::msl`) walk that
//! `Context` to produce target source text.

pub mod ast;
pub mod context;
pub mod dump;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod preprocess;
pub mod scope;
pub mod token;
pub mod types;

pub use context::Context;
pub use error::{ParseError, ParseResult, Position};
pub use parser::Parser;
pub use token::Token;

/// Runs the full front-end pipeline over `source` and returns the resulting
/// typed AST, or the first error encountered at any stage.
pub fn compile(source: &str) -> ParseResult<Context> {
    let cleaned = preprocess::preprocess(source)?;
    let tokens = lexer::tokenize(&cleaned)?;
    let mut ctx = Context::new();
    {
        let mut parser = Parser::new(&mut ctx, tokens);
        parser.parse_translation_unit()?;
    }
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::decl::DeclKind;

    fn user_decls(ctx: &Context) -> Vec<&str> {
        ctx.declarations()
            .iter()
            .filter_map(|&id| {
                let decl = ctx.decl(id);
                match &decl.kind {
                    DeclKind::Type { .. } if decl.as_callable().is_none() => None,
                    _ => decl.name.as_deref(),
                }
            })
            .collect()
    }

    #[test]
    fn empty_statement() {
        let ctx = compile("void main() { ; }").expect("compiles");
        assert!(user_decls(&ctx).contains(&"main"));
    }

    #[test]
    fn variable_declaration_with_initializer() {
        let ctx = compile("void main() { float x = 1.0; }").expect("compiles");
        assert!(user_decls(&ctx).contains(&"main"));
    }

    #[test]
    fn if_else_if_else_chain() {
        let src = r#"
            int classify(int x) {
                if (x < 0) {
                    return -1;
                } else if (x == 0) {
                    return 0;
                } else {
                    return 1;
                }
            }
        "#;
        compile(src).expect("compiles");
    }

    #[test]
    fn switch_with_case_and_default() {
        let src = r#"
            int pick(int x) {
                switch (x) {
                    case 0:
                        return 10;
                    default:
                        return -1;
                }
            }
        "#;
        compile(src).expect("compiles");
    }

    #[test]
    fn swizzle_assignment() {
        let src = r#"
            void main() {
                float3 a = float3(1.0, 2.0, 3.0);
                float3 b = float3(0.0, 0.0, 0.0);
                b.xyz = a.xyz;
            }
        "#;
        compile(src).expect("compiles");
    }

    #[test]
    fn overloaded_function_dispatch() {
        let src = r#"
            float pick(float x) { return x; }
            int pick(int x) { return x; }
            void main() {
                float a = pick(1.0);
                int b = pick(1);
            }
        "#;
        compile(src).expect("compiles");
    }

    #[test]
    fn extern_variable() {
        let src = "extern float time;\nvoid main() { float t = time; }";
        compile(src).expect("compiles");
    }

    #[test]
    fn redefinition_is_an_error() {
        let src = "void f() {}\nvoid f() {}";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, ParseError::Redefinition { .. }));
    }

    #[test]
    fn undeclared_identifier_is_an_error() {
        let src = "void main() { float x = y; }";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, ParseError::UnknownIdentifier { .. }));
    }

    #[test]
    fn ambiguous_overload_is_an_error() {
        let src = r#"
            void f(float a, int b) {}
            void f(int a, float b) {}
            void main() { f(1, 1); }
        "#;
        let err = compile(src).unwrap_err();
        assert!(matches!(err, ParseError::AmbiguousCall { .. }));
    }

    #[test]
    fn struct_with_constructor_and_field_access() {
        let src = r#"
            struct Ray {
                float3 origin;
                float3 direction;
                Ray(float3 o, float3 d) {}
            };
            void main() {
                Ray r = Ray(float3(0.0, 0.0, 0.0), float3(0.0, 0.0, 1.0));
                float3 o = r.origin;
            }
        "#;
        compile(src).expect("compiles");
    }

    #[test]
    fn top_level_struct_is_registered_in_source_order() {
        let src = r#"
            struct Ray {
                float3 origin;
            };
            void main() {}
        "#;
        let ctx = compile(src).expect("compiles");
        let names: Vec<&str> = ctx
            .user_declarations()
            .iter()
            .filter_map(|&id| ctx.decl(id).name.as_deref())
            .collect();
        assert_eq!(names, vec!["Ray", "main"]);
    }

    #[test]
    fn parameter_reference_is_rvalue_not_assignable() {
        let src = "void f(in float x) { x = 1.0; }";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, ParseError::NotAssignable { .. }));
    }

    #[test]
    fn vertex_fragment_attributes_and_semantics() {
        let src = r#"
            struct VertexOutput {
                float4 position [[position]];
                float4 color [[color(0)]];
            };
            [[vertex]] VertexOutput vertexMain(float4 position) {
                VertexOutput result = VertexOutput(position, float4(1.0, 1.0, 1.0, 1.0));
                return result;
            }
            [[fragment]] float4 fragmentMain(float4 color) {
                return color;
            }
        "#;
        compile(src).expect("compiles");
    }
}
