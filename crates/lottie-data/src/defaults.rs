//! The one defaulting table both decoders read from.
//!
//! | Field                 | Default when absent or invalid       |
//! |-----------------------|--------------------------------------|
//! | layer `nm`            | [`LAYER_NAME`]                       |
//! | layer `ind`           | next value of the [`IndexSource`]    |
//! | `ddd`                 | [`CoordinateSpace::TwoD`]            |
//! | `bm`                  | [`BlendMode::Normal`]                |
//! | `sr`                  | [`TIME_STRETCH`]                     |
//! | `hd`                  | [`HIDDEN`]                           |
//! | `ks`                  | [`Transform::default`] (identity)    |
//! | `masksProperties`     | absent                               |
//! | `sy` / `ef`           | empty                                |
//! | mask `mode`           | [`MaskMode::Add`]                    |
//! | effect `en`           | [`EFFECT_ENABLED`]                   |
//! | marker `dr`           | [`MARKER_DURATION`]                  |
//! | image asset `u`       | [`IMAGE_DIRECTORY`]                  |
//!
//! [`IndexSource`]: crate::identity::IndexSource
//! [`CoordinateSpace::TwoD`]: crate::model::CoordinateSpace::TwoD
//! [`BlendMode::Normal`]: crate::model::BlendMode::Normal
//! [`Transform::default`]: crate::model::Transform
//! [`MaskMode::Add`]: crate::model::MaskMode::Add

pub const LAYER_NAME: &str = "Layer";
pub const STYLE_NAME: &str = "Style";
pub const EFFECT_NAME: &str = "Effect";
pub const EFFECT_VALUE_NAME: &str = "Value";

pub const TIME_STRETCH: f64 = 1.0;
pub const HIDDEN: bool = false;
pub const MASK_INVERTED: bool = false;

/// `en` value meaning "enabled"; anything else disables the effect.
pub const EFFECT_ENABLED: i64 = 1;

pub const MARKER_DURATION: f64 = 0.0;
pub const IMAGE_DIRECTORY: &str = "";
