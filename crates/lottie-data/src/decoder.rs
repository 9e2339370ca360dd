use crate::error::Result;
use crate::identity::{IndexSource, RandomIndices};
use crate::model::AnimationDocument;
use crate::{dynamic, structured};
use std::fmt;

/// Which of the two decoders to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecodeStrategy {
    /// Serde schema, converted into the model.
    #[default]
    Structured,
    /// Untyped map walked key by key.
    Dynamic,
}

impl DecodeStrategy {
    pub const ALL: [DecodeStrategy; 2] = [DecodeStrategy::Structured, DecodeStrategy::Dynamic];

    pub fn name(&self) -> &'static str {
        match self {
            DecodeStrategy::Structured => "structured",
            DecodeStrategy::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn decode_structured(bytes: &[u8], indices: &mut dyn IndexSource) -> Result<AnimationDocument> {
    structured::decode(bytes, indices)
}

pub fn decode_dynamic(bytes: &[u8], indices: &mut dyn IndexSource) -> Result<AnimationDocument> {
    dynamic::decode(bytes, indices)
}

pub fn decode(
    bytes: &[u8],
    strategy: DecodeStrategy,
    indices: &mut dyn IndexSource,
) -> Result<AnimationDocument> {
    tracing::debug!(%strategy, bytes = bytes.len(), "decoding animation");
    match strategy {
        DecodeStrategy::Structured => decode_structured(bytes, indices),
        DecodeStrategy::Dynamic => decode_dynamic(bytes, indices),
    }
}

impl AnimationDocument {
    /// Decode with a fresh random [`IndexSource`].
    pub fn from_slice(bytes: &[u8], strategy: DecodeStrategy) -> Result<Self> {
        decode(bytes, strategy, &mut RandomIndices::new())
    }
}
