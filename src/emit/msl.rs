//! Metal Shading Language emitter, grounded in `original_source/osl/OutputMSL.cpp`.
//!
//! The original took semantic-to-attribute-index mappings as an
//! externally-supplied `std::map<Semantic, uint32_t>` and threw if a field's
//! semantic wasn't registered in it. Our parser already captures the
//! attribute index at the use site (`[[position(0)]]`), so there is nothing
//! external to supply — a field with a semantic but no explicit index
//! defaults to attribute 0, same as the original's single-argument
//! `[[position]]` form.

use crate::ast::attr::{ProgramStage, Semantic};

use super::Dialect;

pub struct MslEmitter {
    program: ProgramStage,
    main_function: String,
    output_version: Option<u32>,
}

impl MslEmitter {
    pub fn new(program: ProgramStage, main_function: impl Into<String>, output_version: Option<u32>) -> Self {
        MslEmitter {
            program,
            main_function: main_function.into(),
            output_version,
        }
    }
}

impl Dialect for MslEmitter {
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
        let _ = semantic;
        format!(" [[attribute({})]]", index.unwrap_or(0))
    }
}
