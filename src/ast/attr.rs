//! Attributes: program-stage markers and vertex-channel semantics.

/// Index into `Context`'s attribute arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramStage {
    Fragment,
    Vertex,
}

/// A vertex-channel semantic, mapping a field or parameter to a hardware
/// channel. `n` is the optional attribute channel index (`[[position(0)]]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Binormal,
    BlendIndices,
    BlendWeight,
    Color,
    Normal,
    Position,
    PositionTransformed,
    PointSize,
    Tangent,
    TextureCoordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Program(ProgramStage),
    Semantic { semantic: Semantic, index: Option<u32> },
}

impl Attr {
    pub fn is_program(&self) -> bool {
        matches!(self, Attr::Program(_))
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, Attr::Semantic { .. })
    }
}
