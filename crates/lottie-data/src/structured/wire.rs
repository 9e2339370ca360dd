//! Serde schema of the source format.
//!
//! Every key is a [`Field`], so a struct always deserializes and the decision
//! between "required" and "defaulted" is made when converting to the model.

use crate::error::{DecodeError, JsonKind, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A value type of the wire schema.
pub(crate) trait Wire: DeserializeOwned {
    const EXPECTED: JsonKind;

    /// Shapes serde would otherwise coerce (derived structs accept arrays).
    fn admits(_value: &Value) -> bool {
        true
    }
}

/// One key of a wire object.
#[derive(Debug)]
pub(crate) enum Field<T> {
    Absent,
    Present(T),
    Invalid(JsonKind),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T: Wire> Field<T> {
    pub fn from_value(value: Value) -> Self {
        let found = JsonKind::of(&value);
        if !T::admits(&value) {
            return Field::Invalid(found);
        }
        match serde_json::from_value::<T>(value) {
            Ok(v) => Field::Present(v),
            Err(_) => Field::Invalid(found),
        }
    }

    pub fn require(self, key: &str) -> Result<T> {
        match self {
            Field::Present(v) => Ok(v),
            Field::Absent => Err(DecodeError::missing(key)),
            Field::Invalid(found) => Err(DecodeError::mismatch(key, T::EXPECTED, found)),
        }
    }

    pub fn soft(self) -> Option<T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent => None,
            Field::Invalid(found) => {
                tracing::trace!(expected = %T::EXPECTED, %found, "soft field replaced by default");
                None
            }
        }
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }
}

impl<'de, T: Wire> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Field::from_value(value))
    }
}

/// List element that never fails the enclosing list.
#[derive(Debug)]
pub(crate) struct Lenient<T>(pub Field<T>);

impl<'de, T: Wire> Deserialize<'de> for Lenient<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Lenient(Field::from_value(value)))
    }
}

impl<T: Wire> Wire for Lenient<T> {
    const EXPECTED: JsonKind = T::EXPECTED;
}

impl Wire for f64 {
    const EXPECTED: JsonKind = JsonKind::Number;
}

impl Wire for i64 {
    const EXPECTED: JsonKind = JsonKind::Integer;
}

impl Wire for bool {
    const EXPECTED: JsonKind = JsonKind::Boolean;
}

impl Wire for String {
    const EXPECTED: JsonKind = JsonKind::String;
}

/// Raw passthrough; any shape is accepted.
impl Wire for Value {
    const EXPECTED: JsonKind = JsonKind::Object;
}

impl<T: Wire> Wire for Vec<T> {
    const EXPECTED: JsonKind = JsonKind::Array;

    fn admits(value: &Value) -> bool {
        value.is_array()
    }
}

macro_rules! object_wire {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Wire for $ty {
                const EXPECTED: JsonKind = JsonKind::Object;

                fn admits(value: &Value) -> bool {
                    value.is_object()
                }
            }
        )*
    };
}

object_wire!(
    WireDocument,
    WireDocumentMeta,
    WireLayer,
    WireProperty,
    WireTransform,
    WirePosition,
    WireMask,
    WireLayerStyle,
    WireEffect,
    WireEffectValue,
    WireLayerMeta,
    WireMetaSettings,
    WireMetaSub,
    WireColorDeps,
    WireShapeItem,
    WireTextData,
    WireGlyph,
    WireGlyphData,
    WireFontList,
    WireFont,
    WireAsset,
    WireMarker,
);

// Document

#[derive(Debug, Deserialize)]
pub(crate) struct WireDocument {
    #[serde(default, rename = "v")]
    pub version: Field<String>,
    #[serde(default, rename = "ddd")]
    pub coordinate_space: Field<i64>,
    #[serde(default, rename = "ip")]
    pub start_frame: Field<f64>,
    #[serde(default, rename = "op")]
    pub end_frame: Field<f64>,
    #[serde(default, rename = "fr")]
    pub framerate: Field<f64>,
    #[serde(default, rename = "w")]
    pub width: Field<f64>,
    #[serde(default, rename = "h")]
    pub height: Field<f64>,
    #[serde(default)]
    pub layers: Field<Vec<Lenient<WireLayer>>>,
    #[serde(default, rename = "chars")]
    pub glyphs: Field<Vec<Lenient<WireGlyph>>>,
    #[serde(default)]
    pub fonts: Field<WireFontList>,
    #[serde(default)]
    pub assets: Field<Vec<Lenient<WireAsset>>>,
    #[serde(default)]
    pub markers: Field<Vec<Lenient<WireMarker>>>,
    #[serde(default)]
    pub meta: Field<WireDocumentMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDocumentMeta {
    #[serde(default, rename = "ct")]
    pub pack: Field<String>,
}

// Layers

/// All layer kinds share one flat record; kind-specific keys are picked by
/// the discriminator during conversion.
#[derive(Debug, Deserialize)]
pub(crate) struct WireLayer {
    #[serde(default)]
    pub ty: Field<i64>,
    #[serde(default, rename = "nm")]
    pub name: Field<String>,
    #[serde(default, rename = "ind")]
    pub index: Field<i64>,
    #[serde(default, rename = "ddd")]
    pub coordinate_space: Field<i64>,
    #[serde(default, rename = "ip")]
    pub in_frame: Field<f64>,
    #[serde(default, rename = "op")]
    pub out_frame: Field<f64>,
    #[serde(default, rename = "st")]
    pub start_time: Field<f64>,
    #[serde(default, rename = "ks")]
    pub transform: Field<WireTransform>,
    #[serde(default)]
    pub parent: Field<i64>,
    #[serde(default, rename = "bm")]
    pub blend_mode: Field<i64>,
    #[serde(default, rename = "masksProperties")]
    pub masks: Field<Vec<Lenient<WireMask>>>,
    #[serde(default, rename = "sr")]
    pub time_stretch: Field<f64>,
    #[serde(default, rename = "tt")]
    pub matte: Field<i64>,
    #[serde(default, rename = "hd")]
    pub hidden: Field<bool>,
    #[serde(default, rename = "sy")]
    pub styles: Field<Vec<Lenient<WireLayerStyle>>>,
    #[serde(default, rename = "ef")]
    pub effects: Field<Vec<Lenient<WireEffect>>>,
    #[serde(default)]
    pub meta: Field<WireLayerMeta>,

    // PreComp, Image
    #[serde(default, rename = "refId")]
    pub ref_id: Field<String>,
    // PreComp
    #[serde(default)]
    pub w: Field<f64>,
    #[serde(default)]
    pub h: Field<f64>,
    #[serde(default, rename = "tm")]
    pub time_remapping: Field<WireProperty>,
    // Solid
    #[serde(default, rename = "sc")]
    pub solid_color: Field<String>,
    #[serde(default, rename = "sw")]
    pub solid_width: Field<f64>,
    #[serde(default, rename = "sh")]
    pub solid_height: Field<f64>,
    // Shape
    #[serde(default)]
    pub shapes: Field<Vec<Lenient<WireShapeItem>>>,
    // Text
    #[serde(default, rename = "t")]
    pub text: Field<WireTextData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireProperty {
    #[serde(default, rename = "a")]
    pub animated: Field<i64>,
    #[serde(default, rename = "k")]
    pub value: Field<Value>,
    #[serde(default, rename = "ix")]
    pub index: Field<i64>,
    #[serde(default, rename = "x")]
    pub expression: Field<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTransform {
    #[serde(default, rename = "a")]
    pub anchor: Field<WireProperty>,
    #[serde(default, rename = "p")]
    pub position: Field<WirePosition>,
    #[serde(default, rename = "s")]
    pub scale: Field<WireProperty>,
    #[serde(default, rename = "r")]
    pub rotation: Field<WireProperty>,
    #[serde(default, rename = "rz")]
    pub rotation_z: Field<WireProperty>,
    #[serde(default, rename = "rx")]
    pub rotation_x: Field<WireProperty>,
    #[serde(default, rename = "ry")]
    pub rotation_y: Field<WireProperty>,
    #[serde(default, rename = "or")]
    pub orientation: Field<WireProperty>,
    #[serde(default, rename = "sk")]
    pub skew: Field<WireProperty>,
    #[serde(default, rename = "sa")]
    pub skew_axis: Field<WireProperty>,
    #[serde(default, rename = "o")]
    pub opacity: Field<WireProperty>,
}

/// `p` is either one property or, with `s: true`, separate `x`/`y`/`z`
/// properties. Both readings are kept; conversion picks one.
#[derive(Debug)]
pub(crate) struct WirePosition {
    pub split: WireSplitPosition,
    pub combined: Field<WireProperty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSplitPosition {
    #[serde(default, rename = "s")]
    pub separated: Field<bool>,
    #[serde(default)]
    pub x: Field<WireProperty>,
    #[serde(default)]
    pub y: Field<WireProperty>,
    #[serde(default)]
    pub z: Field<WireProperty>,
}

impl<'de> Deserialize<'de> for WirePosition {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let split = WireSplitPosition::deserialize(&raw).map_err(D::Error::custom)?;
        Ok(WirePosition {
            split,
            combined: Field::from_value(raw),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMask {
    #[serde(default)]
    pub mode: Field<String>,
    #[serde(default, rename = "inv")]
    pub inverted: Field<bool>,
    #[serde(default, rename = "nm")]
    pub name: Field<String>,
    #[serde(default, rename = "pt")]
    pub shape: Field<WireProperty>,
    #[serde(default, rename = "o")]
    pub opacity: Field<WireProperty>,
    #[serde(default, rename = "x")]
    pub expansion: Field<WireProperty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLayerStyle {
    #[serde(default)]
    pub ty: Field<i64>,
    #[serde(default, rename = "nm")]
    pub name: Field<String>,
    #[serde(default, rename = "c")]
    pub color: Field<WireProperty>,
    #[serde(default, rename = "o")]
    pub opacity: Field<WireProperty>,
    #[serde(default, rename = "a")]
    pub angle: Field<WireProperty>,
    #[serde(default, rename = "s")]
    pub size: Field<WireProperty>,
    #[serde(default, rename = "d")]
    pub distance: Field<WireProperty>,
    #[serde(default, rename = "ch")]
    pub spread: Field<WireProperty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEffect {
    #[serde(default)]
    pub ty: Field<i64>,
    #[serde(default, rename = "nm")]
    pub name: Field<String>,
    #[serde(default, rename = "en")]
    pub enabled: Field<i64>,
    #[serde(default, rename = "mn")]
    pub match_name: Field<String>,
    #[serde(default, rename = "ef")]
    pub values: Field<Vec<Lenient<WireEffectValue>>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEffectValue {
    #[serde(default)]
    pub ty: Field<i64>,
    #[serde(default, rename = "nm")]
    pub name: Field<String>,
    #[serde(default, rename = "v")]
    pub value: Field<WireProperty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLayerMeta {
    #[serde(default, rename = "cur")]
    pub kind: Field<String>,
    #[serde(default, rename = "st")]
    pub settings: Field<WireMetaSettings>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMetaSettings {
    #[serde(default)]
    pub sub: Field<WireMetaSub>,
    #[serde(default)]
    pub movable: Field<bool>,
    #[serde(default)]
    pub tintable: Field<bool>,
    #[serde(default)]
    pub monochrome: Field<bool>,
    #[serde(default)]
    pub add_lib: Field<bool>,
    #[serde(default)]
    pub pro: Field<bool>,
    #[serde(default)]
    pub lib_tint: Field<bool>,
    #[serde(default)]
    pub lib_col: Field<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMetaSub {
    #[serde(default, rename = "colorDeps")]
    pub color_deps: Field<WireColorDeps>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireColorDeps {
    #[serde(default)]
    pub value: Field<String>,
    #[serde(default, rename = "mn")]
    pub match_name: Field<String>,
    #[serde(default, rename = "nm")]
    pub display_name: Field<String>,
}

/// Shape items stay opaque apart from their header.
#[derive(Debug)]
pub(crate) struct WireShapeItem {
    pub head: WireShapeHead,
    pub raw: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireShapeHead {
    #[serde(default)]
    pub ty: Field<String>,
    #[serde(default, rename = "nm")]
    pub name: Field<String>,
    #[serde(default, rename = "hd")]
    pub hidden: Field<bool>,
}

impl<'de> Deserialize<'de> for WireShapeItem {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let head = WireShapeHead::deserialize(&raw).map_err(D::Error::custom)?;
        Ok(WireShapeItem { head, raw })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTextData {
    #[serde(default, rename = "d")]
    pub document: Field<WireProperty>,
    #[serde(default, rename = "a")]
    pub animators: Field<Vec<Value>>,
    #[serde(default, rename = "p")]
    pub path: Field<Value>,
    #[serde(default, rename = "m")]
    pub options: Field<Value>,
}

// Glyphs & fonts

#[derive(Debug, Deserialize)]
pub(crate) struct WireGlyph {
    #[serde(default, rename = "ch")]
    pub character: Field<String>,
    #[serde(default)]
    pub size: Field<f64>,
    #[serde(default, rename = "fFamily")]
    pub family: Field<String>,
    #[serde(default)]
    pub style: Field<String>,
    #[serde(default, rename = "w")]
    pub width: Field<f64>,
    #[serde(default)]
    pub data: Field<WireGlyphData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGlyphData {
    #[serde(default)]
    pub shapes: Field<Vec<Lenient<WireShapeItem>>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFontList {
    #[serde(default)]
    pub list: Field<Vec<Lenient<WireFont>>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFont {
    #[serde(default, rename = "fName")]
    pub name: Field<String>,
    #[serde(default, rename = "fFamily")]
    pub family: Field<String>,
    #[serde(default, rename = "fStyle")]
    pub style: Field<String>,
    #[serde(default)]
    pub ascent: Field<f64>,
    #[serde(default, rename = "fPath")]
    pub path: Field<String>,
}

// Assets & markers

/// Asset ids show up as strings or bare integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireAssetId {
    Text(String),
    Number(i64),
}

impl Wire for WireAssetId {
    const EXPECTED: JsonKind = JsonKind::String;
}

impl WireAssetId {
    pub fn into_string(self) -> String {
        match self {
            WireAssetId::Text(s) => s,
            WireAssetId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAsset {
    #[serde(default)]
    pub id: Field<WireAssetId>,
    #[serde(default)]
    pub layers: Field<Vec<Lenient<WireLayer>>>,
    #[serde(default, rename = "p")]
    pub name: Field<String>,
    #[serde(default, rename = "u")]
    pub directory: Field<String>,
    #[serde(default, rename = "w")]
    pub width: Field<f64>,
    #[serde(default, rename = "h")]
    pub height: Field<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMarker {
    #[serde(default, rename = "cm")]
    pub name: Field<String>,
    #[serde(default, rename = "tm")]
    pub frame: Field<f64>,
    #[serde(default, rename = "dr")]
    pub duration: Field<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_states() {
        let wire: WireMarker = serde_json::from_value(json!({ "cm": "intro", "tm": "x" })).unwrap();
        assert!(matches!(wire.name, Field::Present(ref n) if n == "intro"));
        assert!(matches!(wire.frame, Field::Invalid(JsonKind::String)));
        assert!(wire.duration.is_absent());
    }

    #[test]
    fn test_structs_reject_arrays() {
        let field = Field::<WireMarker>::from_value(json!(["intro", 0]));
        assert!(matches!(field, Field::Invalid(JsonKind::Array)));
    }

    #[test]
    fn test_lenient_elements_do_not_fail_the_list() {
        let list: Vec<Lenient<WireMarker>> =
            serde_json::from_value(json!([{ "cm": "a" }, 7, "b"])).unwrap();
        assert_eq!(list.len(), 3);
        assert!(matches!(list[0].0, Field::Present(_)));
        assert!(matches!(list[1].0, Field::Invalid(JsonKind::Integer)));
    }

    #[test]
    fn test_asset_id_accepts_integers() {
        let field = Field::<WireAssetId>::from_value(json!(12));
        let id = field.require("id").unwrap().into_string();
        assert_eq!(id, "12");
    }
}
