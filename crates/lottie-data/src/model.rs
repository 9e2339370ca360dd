use crate::registry::{EffectValueType, LayerEffectType, LayerType};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSpace {
    #[default]
    TwoD,
    ThreeD,
}

impl CoordinateSpace {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(CoordinateSpace::TwoD),
            1 => Some(CoordinateSpace::ThreeD),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub fn from_raw(raw: i64) -> Option<Self> {
        let mode = match raw {
            0 => BlendMode::Normal,
            1 => BlendMode::Multiply,
            2 => BlendMode::Screen,
            3 => BlendMode::Overlay,
            4 => BlendMode::Darken,
            5 => BlendMode::Lighten,
            6 => BlendMode::ColorDodge,
            7 => BlendMode::ColorBurn,
            8 => BlendMode::HardLight,
            9 => BlendMode::SoftLight,
            10 => BlendMode::Difference,
            11 => BlendMode::Exclusion,
            12 => BlendMode::Hue,
            13 => BlendMode::Saturation,
            14 => BlendMode::Color,
            15 => BlendMode::Luminosity,
            _ => return None,
        };
        Some(mode)
    }
}

/// Track matte mode (`tt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatteType {
    None,
    Add,
    Invert,
    Unknown,
}

impl MatteType {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(MatteType::None),
            1 => Some(MatteType::Add),
            2 => Some(MatteType::Invert),
            3 => Some(MatteType::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    #[default]
    Add,
    Subtract,
    Intersect,
    Lighten,
    Darken,
    Difference,
    None,
}

impl MaskMode {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(MaskMode::Add),
            "s" => Some(MaskMode::Subtract),
            "i" => Some(MaskMode::Intersect),
            "l" => Some(MaskMode::Lighten),
            "d" => Some(MaskMode::Darken),
            "f" => Some(MaskMode::Difference),
            "n" => Some(MaskMode::None),
            _ => None,
        }
    }
}

/// An animatable value. Keyframes stay in their source form (`k`); the
/// interpolation code downstream owns their meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub animated: bool,
    pub value: Value,
    pub index: Option<i64>,
    pub expression: Option<String>,
}

impl Property {
    pub fn fixed(value: Value) -> Self {
        Property {
            animated: false,
            value,
            index: None,
            expression: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    Combined(Property),
    Split {
        x: Property,
        y: Property,
        z: Option<Property>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub anchor: Property,
    pub position: Position,
    pub scale: Property,
    pub rotation: Property,
    pub rotation_x: Option<Property>,
    pub rotation_y: Option<Property>,
    pub orientation: Option<Property>,
    pub skew: Option<Property>,
    pub skew_axis: Option<Property>,
    pub opacity: Property,
}

impl Transform {
    pub fn identity_anchor() -> Property {
        Property::fixed(json!([0, 0, 0]))
    }

    pub fn identity_position() -> Position {
        Position::Combined(Property::fixed(json!([0, 0, 0])))
    }

    pub fn identity_scale() -> Property {
        Property::fixed(json!([100, 100, 100]))
    }

    pub fn identity_rotation() -> Property {
        Property::fixed(json!(0))
    }

    pub fn identity_opacity() -> Property {
        Property::fixed(json!(100))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            anchor: Self::identity_anchor(),
            position: Self::identity_position(),
            scale: Self::identity_scale(),
            rotation: Self::identity_rotation(),
            rotation_x: None,
            rotation_y: None,
            orientation: None,
            skew: None,
            skew_axis: None,
            opacity: Self::identity_opacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub mode: MaskMode,
    pub inverted: bool,
    pub name: Option<String>,
    pub shape: Property,
    pub opacity: Property,
    pub expansion: Property,
}

impl Mask {
    pub fn default_opacity() -> Property {
        Property::fixed(json!(100))
    }

    pub fn default_expansion() -> Property {
        Property::fixed(json!(0))
    }
}

// Styles & effects

#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub name: String,
    pub kind: LayerStyleKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerStyleKind {
    DropShadow(DropShadowStyle),
    Unknown { tag: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropShadowStyle {
    pub color: Property,
    pub opacity: Property,
    pub angle: Property,
    pub size: Property,
    pub distance: Property,
    pub spread: Option<Property>, // ch
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerEffect {
    pub name: String,
    pub effect_type: LayerEffectType,
    pub enabled: bool,
    pub match_name: Option<String>,
    pub values: Vec<EffectValue>,
}

impl LayerEffect {
    /// Value control by display name, e.g. "Opacity" on a drop shadow.
    pub fn value(&self, name: &str) -> Option<&EffectValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectValue {
    pub name: String,
    pub value_type: EffectValueType,
    pub value: Option<Property>,
}

// Vendor metadata attached to layers by the authoring plugin

#[derive(Debug, Clone, PartialEq)]
pub struct LayerMeta {
    pub kind: String, // cur
    pub settings: MetaSettings,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetaSettings {
    pub sub: Option<MetaSub>,
    pub movable: Option<bool>,
    pub tintable: Option<bool>,
    pub monochrome: Option<bool>,
    pub add_lib: Option<bool>,
    pub pro: Option<bool>,
    pub lib_tint: Option<bool>,
    pub lib_col: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetaSub {
    pub color_deps: Option<ColorDeps>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorDeps {
    pub value: String,
    pub match_name: String,
    pub display_name: String,
}

// Layers

/// Layer identity. Only `Generated` values may differ between two decodes of
/// the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerIndex {
    Declared(i64),
    Generated(i64),
}

impl LayerIndex {
    pub fn value(&self) -> i64 {
        match self {
            LayerIndex::Declared(v) | LayerIndex::Generated(v) => *v,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, LayerIndex::Generated(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub index: LayerIndex,
    pub coordinate_space: CoordinateSpace,
    pub in_frame: f64,
    pub out_frame: f64,
    pub start_time: f64,
    pub transform: Transform,
    pub parent: Option<i64>,
    pub blend_mode: BlendMode,
    pub masks: Option<Vec<Mask>>,
    pub time_stretch: f64,
    pub matte: Option<MatteType>,
    pub hidden: bool,
    pub styles: Vec<LayerStyle>,
    pub effects: Vec<LayerEffect>,
    pub meta: Option<LayerMeta>,
    pub kind: LayerKind,
}

impl Layer {
    pub fn layer_type(&self) -> LayerType {
        self.kind.layer_type()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    PreComp(PreCompContent),
    Solid(SolidContent),
    Image(ImageContent),
    Null,
    Shape(ShapeContent),
    Text(TextData),
    Unknown { tag: i64 },
}

impl LayerKind {
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerKind::PreComp(_) => LayerType::PreComp,
            LayerKind::Solid(_) => LayerType::Solid,
            LayerKind::Image(_) => LayerType::Image,
            LayerKind::Null => LayerType::Null,
            LayerKind::Shape(_) => LayerType::Shape,
            LayerKind::Text(_) => LayerType::Text,
            LayerKind::Unknown { .. } => LayerType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreCompContent {
    pub reference_id: String,
    pub width: f64,
    pub height: f64,
    pub time_remapping: Option<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolidContent {
    pub color: String, // hex, e.g. "#ff0000"
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    pub reference_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeContent {
    pub items: Vec<ShapeItem>,
}

/// One entry of a shape graph, kept in source form for the geometry code.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeItem {
    pub item_type: String, // ty: "gr", "rc", "fl", ...
    pub name: Option<String>,
    pub hidden: bool,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    pub document: Property,     // d
    pub animators: Vec<Value>,  // a
    pub path: Option<Value>,    // p
    pub options: Option<Value>, // m
}

// Document-level records

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub character: String,
    pub size: f64,
    pub family: String,
    pub style: String,
    pub width: f64,
    pub shapes: Vec<ShapeItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontList {
    pub fonts: Vec<Font>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub family: String,
    pub style: String,
    pub ascent: f64,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    PreComp(PreCompAsset),
    Image(ImageAsset),
}

impl Asset {
    pub fn id(&self) -> &str {
        match self {
            Asset::PreComp(a) => &a.id,
            Asset::Image(a) => &a.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreCompAsset {
    pub id: String,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub id: String,
    pub name: String,      // p
    pub directory: String, // u
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetLibrary {
    pub assets: Vec<Asset>,
}

impl AssetLibrary {
    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id() == id)
    }

    pub fn precomps(&self) -> impl Iterator<Item = &PreCompAsset> {
        self.assets.iter().filter_map(|a| match a {
            Asset::PreComp(p) => Some(p),
            Asset::Image(_) => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageAsset> {
        self.assets.iter().filter_map(|a| match a {
            Asset::Image(i) => Some(i),
            Asset::PreComp(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub frame: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentMeta {
    pub pack: Option<String>, // ct
}

/// Everything a decoder collects before the document is sealed.
pub(crate) struct DocumentParts {
    pub version: String,
    pub coordinate_space: CoordinateSpace,
    pub start_frame: f64,
    pub end_frame: f64,
    pub framerate: f64,
    pub width: f64,
    pub height: f64,
    pub layers: Vec<Layer>,
    pub glyphs: Option<Vec<Glyph>>,
    pub fonts: Option<FontList>,
    pub asset_library: Option<AssetLibrary>,
    pub markers: Option<Vec<Marker>>,
    pub meta: Option<DocumentMeta>,
}

/// A decoded animation. Immutable apart from [`replace_layers`](Self::replace_layers).
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDocument {
    version: String,
    coordinate_space: CoordinateSpace,
    start_frame: f64,
    end_frame: f64,
    framerate: f64,
    width: f64,
    height: f64,
    layers: Vec<Layer>,
    glyphs: Option<Vec<Glyph>>,
    fonts: Option<FontList>,
    asset_library: Option<AssetLibrary>,
    markers: Option<Vec<Marker>>,
    marker_map: Option<HashMap<String, Marker>>,
    meta: Option<DocumentMeta>,
}

impl From<DocumentParts> for AnimationDocument {
    fn from(parts: DocumentParts) -> Self {
        // Later duplicates overwrite earlier ones.
        let marker_map = parts.markers.as_ref().map(|markers| {
            let mut map = HashMap::with_capacity(markers.len());
            for marker in markers {
                map.insert(marker.name.clone(), marker.clone());
            }
            map
        });

        AnimationDocument {
            version: parts.version,
            coordinate_space: parts.coordinate_space,
            start_frame: parts.start_frame,
            end_frame: parts.end_frame,
            framerate: parts.framerate,
            width: parts.width,
            height: parts.height,
            layers: parts.layers,
            glyphs: parts.glyphs,
            fonts: parts.fonts,
            asset_library: parts.asset_library,
            markers: parts.markers,
            marker_map,
            meta: parts.meta,
        }
    }
}

impl AnimationDocument {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn coordinate_space(&self) -> CoordinateSpace {
        self.coordinate_space
    }

    pub fn start_frame(&self) -> f64 {
        self.start_frame
    }

    pub fn end_frame(&self) -> f64 {
        self.end_frame
    }

    pub fn duration_frames(&self) -> f64 {
        self.end_frame - self.start_frame
    }

    pub fn framerate(&self) -> f64 {
        self.framerate
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Swap the whole layer list, e.g. after post-processing. Returns the old list.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) -> Vec<Layer> {
        std::mem::replace(&mut self.layers, layers)
    }

    pub fn glyphs(&self) -> Option<&[Glyph]> {
        self.glyphs.as_deref()
    }

    pub fn fonts(&self) -> Option<&FontList> {
        self.fonts.as_ref()
    }

    pub fn asset_library(&self) -> Option<&AssetLibrary> {
        self.asset_library.as_ref()
    }

    pub fn markers(&self) -> Option<&[Marker]> {
        self.markers.as_deref()
    }

    pub fn marker_map(&self) -> Option<&HashMap<String, Marker>> {
        self.marker_map.as_ref()
    }

    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.marker_map.as_ref()?.get(name)
    }

    /// Marker names in document order; empty when there are no markers.
    pub fn marker_names(&self) -> Vec<&str> {
        self.markers
            .iter()
            .flatten()
            .map(|m| m.name.as_str())
            .collect()
    }

    pub fn meta(&self) -> Option<&DocumentMeta> {
        self.meta.as_ref()
    }

    /// Every layer in the document: top-level first, then each precomp
    /// asset's layers in library order.
    pub fn all_layers(&self) -> impl Iterator<Item = &Layer> {
        let nested = self
            .asset_library
            .iter()
            .flat_map(|lib| lib.precomps())
            .flat_map(|p| p.layers.iter());
        self.layers.iter().chain(nested)
    }

    /// Copy with every generated index zeroed. Comparisons of documents
    /// decoded with independent index sources go through this.
    pub fn with_generated_indices_erased(&self) -> Self {
        fn erase(layers: &mut [Layer]) {
            for layer in layers {
                if layer.index.is_generated() {
                    layer.index = LayerIndex::Generated(0);
                }
            }
        }

        let mut doc = self.clone();
        erase(&mut doc.layers);
        if let Some(lib) = doc.asset_library.as_mut() {
            for asset in &mut lib.assets {
                if let Asset::PreComp(p) = asset {
                    erase(&mut p.layers);
                }
            }
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(markers: Option<Vec<Marker>>) -> DocumentParts {
        DocumentParts {
            version: "5.7.0".into(),
            coordinate_space: CoordinateSpace::TwoD,
            start_frame: 0.0,
            end_frame: 60.0,
            framerate: 30.0,
            width: 512.0,
            height: 512.0,
            layers: Vec::new(),
            glyphs: None,
            fonts: None,
            asset_library: None,
            markers,
            meta: None,
        }
    }

    fn marker(name: &str, frame: f64) -> Marker {
        Marker {
            name: name.into(),
            frame,
            duration: 0.0,
        }
    }

    #[test]
    fn test_marker_map_last_write_wins() {
        let doc = AnimationDocument::from(parts(Some(vec![
            marker("a", 0.0),
            marker("b", 5.0),
            marker("a", 10.0),
        ])));

        let map = doc.marker_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"].frame, 10.0);
        assert_eq!(doc.marker_names(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_no_markers_means_no_map() {
        let doc = AnimationDocument::from(parts(None));
        assert!(doc.marker_map().is_none());
        assert!(doc.marker_names().is_empty());
        assert_eq!(doc.duration_frames(), 60.0);
    }

    #[test]
    fn test_empty_marker_list_keeps_empty_map() {
        let doc = AnimationDocument::from(parts(Some(Vec::new())));
        assert!(doc.marker_map().unwrap().is_empty());
    }

    #[test]
    fn test_model_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnimationDocument>();
        assert_send_sync::<Layer>();
    }

    #[test]
    fn test_blend_and_matte_tables() {
        assert_eq!(BlendMode::from_raw(15), Some(BlendMode::Luminosity));
        assert_eq!(BlendMode::from_raw(16), None);
        assert_eq!(MatteType::from_raw(2), Some(MatteType::Invert));
        assert_eq!(MatteType::from_raw(4), None);
        assert_eq!(MaskMode::from_code("s"), Some(MaskMode::Subtract));
        assert_eq!(CoordinateSpace::from_raw(2), None);
    }
}
