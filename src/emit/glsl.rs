//! GLSL emitter, grounded in `original_source/osl/OutputGLSL.hpp`.
//!
//! GLSL has no built-in `float2`/`float3`/`float4`/`floatNxN` spelling — it
//! uses `vec2`/`vec3`/`vec4`/`matNxN` — so this is the one dialect where
//! [`Dialect::type_name`] actually rewrites anything. Vertex-channel
//! semantics (`position`, `normal`, ...) have no GLSL attribute syntax of
//! their own; GLSL expresses them as separate `in`/`out` globals instead of a
//! per-field suffix, which is out of scope here (see DESIGN.md) — fields
//! keep their semantic attribute for documentation but print with no
//! trailing decoration.

use std::borrow::Cow;

use super::Dialect;
use crate::ast::attr::ProgramStage;

pub struct GlslEmitter {
    program: ProgramStage,
    main_function: String,
    output_version: Option<u32>,
}

impl GlslEmitter {
    pub fn new(program: ProgramStage, main_function: impl Into<String>, output_version: Option<u32>) -> Self {
        GlslEmitter {
            program,
            main_function: main_function.into(),
            output_version,
        }
    }
}

impl Dialect for GlslEmitter {
    fn program(&self) -> ProgramStage {
        self.program
    }

    fn main_function(&self) -> &str {
        &self.main_function
    }

    fn output_version(&self) -> Option<u32> {
        self.output_version
    }

    fn type_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(match name {
            "float2" => "vec2",
            "float3" => "vec3",
            "float4" => "vec4",
            "float2x2" => "mat2",
            "float3x3" => "mat3",
            "float4x4" => "mat4",
            "unsigned int" => "uint",
            "Texture2D" | "Texture2DMS" => "sampler2D",
            other => return Cow::Borrowed(other),
        })
    }

    fn prologue(&self, pretty: bool) -> String {
        let version = self.output_version.unwrap_or(330);
        if pretty {
            format!("#version {}\n\n", version)
        } else {
            format!("#version {}\n", version)
        }
    }
}
