//! HLSL emitter, grounded in `original_source/osl/OutputHLSL.cpp`.
//!
//! `OutputHLSL.cpp`'s field-printing left semantic decoration as a bare
//! `// TODO: print semantics` with no implementation. [`HlslEmitter`] fills
//! that gap with the standard HLSL semantic names (documented as a
//! supplement in DESIGN.md, not carried over from the original, since there
//! was nothing there to carry).

use crate::ast::attr::{ProgramStage, Semantic};

use super::Dialect;

pub struct HlslEmitter {
    program: ProgramStage,
    main_function: String,
    output_version: Option<u32>,
}

impl HlslEmitter {
    pub fn new(program: ProgramStage, main_function: impl Into<String>, output_version: Option<u32>) -> Self {
        HlslEmitter {
            program,
            main_function: main_function.into(),
            output_version,
        }
    }
}

impl Dialect for HlslEmitter {
    fn program(&self) -> ProgramStage {
        self.program
    }

    fn main_function(&self) -> &str {
        &self.main_function
    }

    fn output_version(&self) -> Option<u32> {
        self.output_version
    }

    fn semantic_suffix(&self, semantic: Semantic, index: Option<u32>) -> String {
        let name = match semantic {
            Semantic::Binormal => "BINORMAL",
            Semantic::BlendIndices => "BLENDINDICES",
            Semantic::BlendWeight => "BLENDWEIGHT",
            Semantic::Color => "COLOR",
            Semantic::Normal => "NORMAL",
            Semantic::Position => "POSITION",
            Semantic::PositionTransformed => "SV_POSITION",
            Semantic::PointSize => "PSIZE",
            Semantic::Tangent => "TANGENT",
            Semantic::TextureCoordinates => "TEXCOORD",
        };
        match index {
            Some(n) => format!(" : {}{}", name, n),
            None => format!(" : {}", name),
        }
    }
}
