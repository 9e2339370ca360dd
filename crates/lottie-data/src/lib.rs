//! Lottie animation documents.
//!
//! Two independent decoders turn Lottie JSON into the same immutable
//! [`AnimationDocument`]: a serde schema ([`DecodeStrategy::Structured`]) and
//! a key-by-key map walk ([`DecodeStrategy::Dynamic`]). The [`equivalence`]
//! harness runs both and checks that they agree.
//!
//! ```no_run
//! use lottie_data::{AnimationDocument, DecodeStrategy};
//!
//! let bytes = std::fs::read("sticker.json").unwrap();
//! let doc = AnimationDocument::from_slice(&bytes, DecodeStrategy::default()).unwrap();
//! println!("{} layers at {} fps", doc.layers().len(), doc.framerate());
//! ```

pub mod accessor;
mod decoder;
pub mod defaults;
mod dynamic;
pub mod equivalence;
pub mod error;
pub mod identity;
pub mod model;
pub mod registry;
mod structured;

pub use decoder::{decode, decode_dynamic, decode_structured, DecodeStrategy};
pub use equivalence::{Equivalence, Harness, IndexComparison};
pub use error::{DecodeError, ErrorKind, JsonKind, Result};
pub use identity::{IndexSource, RandomIndices, SequentialIndices};
pub use model::AnimationDocument;
pub use registry::LayerType;
