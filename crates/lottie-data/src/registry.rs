//! Discriminator tables.
//!
//! Each family maps the integer `ty` tag of the source format to a closed set
//! of variants. Layers with a tag outside the table are excluded from the
//! document; styles, effects and effect values fall back to an `Unknown`
//! variant that keeps the shared fields.

use crate::error::DecodeError;

/// Concrete layer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    PreComp,
    Solid,
    Image,
    Null,
    Shape,
    Text,
    /// Layer kinds that only carry the base fields (audio, camera, data ...)
    Unknown,
}

pub const LAYER_FAMILY: &str = "layer";

/// Tags that decode as [`LayerType::Unknown`] instead of being dropped.
pub const FALLBACK_LAYER_TAGS: std::ops::RangeInclusive<i64> = 6..=15;

impl LayerType {
    /// Resolve a layer tag. Tags outside the table yield `UnrecognizedVariant`
    /// so the caller can exclude that single element.
    pub fn from_tag(tag: i64) -> Result<Self, DecodeError> {
        let ty = match tag {
            0 => LayerType::PreComp,
            1 => LayerType::Solid,
            2 => LayerType::Image,
            3 => LayerType::Null,
            4 => LayerType::Shape,
            5 => LayerType::Text,
            t if FALLBACK_LAYER_TAGS.contains(&t) => LayerType::Unknown,
            _ => {
                return Err(DecodeError::UnrecognizedVariant {
                    family: LAYER_FAMILY,
                    tag,
                })
            }
        };
        Ok(ty)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerType::PreComp => "precomp",
            LayerType::Solid => "solid",
            LayerType::Image => "image",
            LayerType::Null => "null",
            LayerType::Shape => "shape",
            LayerType::Text => "text",
            LayerType::Unknown => "unknown",
        }
    }
}

/// Layer style kinds (`sy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerStyleType {
    DropShadow,
    Unknown(i64),
}

impl LayerStyleType {
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            1 => LayerStyleType::DropShadow,
            other => LayerStyleType::Unknown(other),
        }
    }
}

/// Layer effect kinds (`ef`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerEffectType {
    DropShadow,
    Unknown(i64),
}

impl LayerEffectType {
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            25 => LayerEffectType::DropShadow,
            other => LayerEffectType::Unknown(other),
        }
    }
}

/// Control kinds inside an effect (`ef[].ef[]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectValueType {
    Slider,
    Angle,
    Color,
    Point,
    Checkbox,
    Group,
    Dropdown,
    Layer,
    Unknown(i64),
}

impl EffectValueType {
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            0 => EffectValueType::Slider,
            1 => EffectValueType::Angle,
            2 => EffectValueType::Color,
            3 => EffectValueType::Point,
            4 => EffectValueType::Checkbox,
            5 => EffectValueType::Group,
            7 => EffectValueType::Dropdown,
            10 => EffectValueType::Layer,
            other => EffectValueType::Unknown(other),
        }
    }
}
