//! Schema-driven decoder.
//!
//! The source is deserialized into the [`wire`] schema by serde, then each
//! wire record is converted into the model, applying the shared defaulting
//! table.

mod wire;

use crate::defaults;
use crate::error::{DecodeError, JsonKind, Result};
use crate::identity::IndexSource;
use crate::model::*;
use crate::registry::{EffectValueType, LayerEffectType, LayerStyleType, LayerType};
use serde_json::Value;
use wire::*;

pub fn decode(bytes: &[u8], indices: &mut dyn IndexSource) -> Result<AnimationDocument> {
    let root: Value = serde_json::from_slice(bytes)?;
    let found = JsonKind::of(&root);
    let wire = match Field::<WireDocument>::from_value(root) {
        Field::Present(doc) => doc,
        _ => {
            return Err(DecodeError::malformed(format!(
                "root must be an object, found {found}"
            )))
        }
    };
    document(wire, indices)
}

fn document(wire: WireDocument, indices: &mut dyn IndexSource) -> Result<AnimationDocument> {
    let version = wire.version.require("v")?;
    let start_frame = wire.start_frame.require("ip")?;
    let end_frame = wire.end_frame.require("op")?;
    let framerate = wire.framerate.require("fr")?;
    let width = wire.width.require("w")?;
    let height = wire.height.require("h")?;
    let wire_layers = match wire.layers {
        Field::Present(layers) => layers,
        Field::Absent => return Err(DecodeError::missing("layers")),
        Field::Invalid(found) => {
            return Err(DecodeError::malformed(format!(
                "`layers` must be an array, found {found}"
            )))
        }
    };

    let coordinate_space = wire
        .coordinate_space
        .soft()
        .and_then(CoordinateSpace::from_raw)
        .unwrap_or_default();

    let layers = layer_list(wire_layers, "layers", indices);
    let glyphs = wire
        .glyphs
        .soft()
        .map(|list| each(list, "chars", glyph));
    let fonts = wire.fonts.soft().map(font_list);
    let asset_library = wire.assets.soft().map(|list| AssetLibrary {
        assets: each(list, "assets", |a| asset(a, indices)),
    });
    let markers = wire
        .markers
        .soft()
        .map(|list| each(list, "markers", marker));
    let meta = wire.meta.soft().map(|m| DocumentMeta {
        pack: m.pack.soft(),
    });

    tracing::debug!(
        layers = layers.len(),
        markers = markers.as_ref().map_or(0, Vec::len),
        "structured decode finished"
    );

    Ok(AnimationDocument::from(DocumentParts {
        version,
        coordinate_space,
        start_frame,
        end_frame,
        framerate,
        width,
        height,
        layers,
        glyphs,
        fonts,
        asset_library,
        markers,
        meta,
    }))
}

/// Convert every element, dropping the ones that fail.
fn each<W, T>(
    list: Vec<Lenient<W>>,
    key: &str,
    mut convert: impl FnMut(W) -> Result<T>,
) -> Vec<T>
where
    W: Wire,
{
    let mut out = Vec::with_capacity(list.len());
    for (i, Lenient(item)) in list.into_iter().enumerate() {
        let element = format!("{key}[{i}]");
        match item.require(&element).and_then(&mut convert) {
            Ok(value) => out.push(value),
            Err(err) => tracing::warn!(element = %element, %err, "dropping element"),
        }
    }
    out
}

fn layer_list(
    list: Vec<Lenient<WireLayer>>,
    key: &str,
    indices: &mut dyn IndexSource,
) -> Vec<Layer> {
    each(list, key, |l| layer(l, indices))
}

fn layer(wire: WireLayer, indices: &mut dyn IndexSource) -> Result<Layer> {
    let tag = wire.ty.require("ty")?;
    let layer_type = LayerType::from_tag(tag)?;

    let in_frame = wire.in_frame.require("ip")?;
    let out_frame = wire.out_frame.require("op")?;
    let start_time = wire.start_time.require("st")?;

    let name = wire
        .name
        .soft()
        .unwrap_or_else(|| defaults::LAYER_NAME.to_string());
    let coordinate_space = wire
        .coordinate_space
        .soft()
        .and_then(CoordinateSpace::from_raw)
        .unwrap_or_default();
    let transform = wire.transform.soft().map(transform).unwrap_or_default();
    let parent = wire.parent.soft();
    let blend_mode = wire
        .blend_mode
        .soft()
        .and_then(BlendMode::from_raw)
        .unwrap_or_default();
    let masks = wire.masks.soft().map(|list| each(list, "masksProperties", mask));
    let time_stretch = wire.time_stretch.soft().unwrap_or(defaults::TIME_STRETCH);
    let matte = wire.matte.soft().and_then(MatteType::from_raw);
    let hidden = wire.hidden.soft().unwrap_or(defaults::HIDDEN);
    let styles = wire
        .styles
        .soft()
        .map(|list| each(list, "sy", style))
        .unwrap_or_default();
    let effects = wire
        .effects
        .soft()
        .map(|list| each(list, "ef", effect))
        .unwrap_or_default();
    let meta = wire.meta.soft().and_then(layer_meta);

    // Drawn once the base fields validate; a variant failure below still
    // consumes the index.
    let index = match wire.index.soft() {
        Some(declared) => LayerIndex::Declared(declared),
        None => LayerIndex::Generated(indices.next_index()),
    };

    let kind = match layer_type {
        LayerType::PreComp => LayerKind::PreComp(PreCompContent {
            reference_id: wire.ref_id.require("refId")?,
            width: wire.w.require("w")?,
            height: wire.h.require("h")?,
            time_remapping: soft_property(wire.time_remapping),
        }),
        LayerType::Solid => LayerKind::Solid(SolidContent {
            color: wire.solid_color.require("sc")?,
            width: wire.solid_width.require("sw")?,
            height: wire.solid_height.require("sh")?,
        }),
        LayerType::Image => LayerKind::Image(ImageContent {
            reference_id: wire.ref_id.require("refId")?,
        }),
        LayerType::Null => LayerKind::Null,
        LayerType::Shape => LayerKind::Shape(ShapeContent {
            items: each(wire.shapes.require("shapes")?, "shapes", shape_item),
        }),
        LayerType::Text => LayerKind::Text(text_data(wire.text.require("t")?)?),
        LayerType::Unknown => LayerKind::Unknown { tag },
    };

    Ok(Layer {
        name,
        index,
        coordinate_space,
        in_frame,
        out_frame,
        start_time,
        transform,
        parent,
        blend_mode,
        masks,
        time_stretch,
        matte,
        hidden,
        styles,
        effects,
        meta,
        kind,
    })
}

fn property(wire: WireProperty) -> Result<Property> {
    Ok(Property {
        value: wire.value.require("k")?,
        animated: wire.animated.soft() == Some(1),
        index: wire.index.soft(),
        expression: wire.expression.soft(),
    })
}

fn soft_property(field: Field<WireProperty>) -> Option<Property> {
    field.soft().and_then(|p| property(p).ok())
}

fn transform(wire: WireTransform) -> Transform {
    let rotation = soft_property(wire.rotation)
        .or_else(|| soft_property(wire.rotation_z))
        .unwrap_or_else(Transform::identity_rotation);

    Transform {
        anchor: soft_property(wire.anchor).unwrap_or_else(Transform::identity_anchor),
        position: wire
            .position
            .soft()
            .and_then(position)
            .unwrap_or_else(Transform::identity_position),
        scale: soft_property(wire.scale).unwrap_or_else(Transform::identity_scale),
        rotation,
        rotation_x: soft_property(wire.rotation_x),
        rotation_y: soft_property(wire.rotation_y),
        orientation: soft_property(wire.orientation),
        skew: soft_property(wire.skew),
        skew_axis: soft_property(wire.skew_axis),
        opacity: soft_property(wire.opacity).unwrap_or_else(Transform::identity_opacity),
    }
}

fn position(wire: WirePosition) -> Option<Position> {
    let WirePosition { split, combined } = wire;
    if split.separated.soft() == Some(true) {
        if let (Some(x), Some(y)) = (soft_property(split.x), soft_property(split.y)) {
            return Some(Position::Split {
                x,
                y,
                z: soft_property(split.z),
            });
        }
    }
    soft_property(combined).map(Position::Combined)
}

fn mask(wire: WireMask) -> Result<Mask> {
    Ok(Mask {
        shape: property(wire.shape.require("pt")?)?,
        mode: wire
            .mode
            .soft()
            .and_then(|code| MaskMode::from_code(&code))
            .unwrap_or_default(),
        inverted: wire.inverted.soft().unwrap_or(defaults::MASK_INVERTED),
        name: wire.name.soft(),
        opacity: soft_property(wire.opacity).unwrap_or_else(Mask::default_opacity),
        expansion: soft_property(wire.expansion).unwrap_or_else(Mask::default_expansion),
    })
}

fn style(wire: WireLayerStyle) -> Result<LayerStyle> {
    let style_type = LayerStyleType::from_tag(wire.ty.require("ty")?);
    let name = wire
        .name
        .soft()
        .unwrap_or_else(|| defaults::STYLE_NAME.to_string());
    let kind = match style_type {
        LayerStyleType::DropShadow => LayerStyleKind::DropShadow(DropShadowStyle {
            color: property(wire.color.require("c")?)?,
            opacity: property(wire.opacity.require("o")?)?,
            angle: property(wire.angle.require("a")?)?,
            size: property(wire.size.require("s")?)?,
            distance: property(wire.distance.require("d")?)?,
            spread: soft_property(wire.spread),
        }),
        LayerStyleType::Unknown(tag) => LayerStyleKind::Unknown { tag },
    };
    Ok(LayerStyle { name, kind })
}

fn effect(wire: WireEffect) -> Result<LayerEffect> {
    let effect_type = LayerEffectType::from_tag(wire.ty.require("ty")?);
    let enabled = wire.enabled.soft().unwrap_or(defaults::EFFECT_ENABLED);
    Ok(LayerEffect {
        name: wire
            .name
            .soft()
            .unwrap_or_else(|| defaults::EFFECT_NAME.to_string()),
        effect_type,
        enabled: enabled == defaults::EFFECT_ENABLED,
        match_name: wire.match_name.soft(),
        values: wire
            .values
            .soft()
            .map(|list| each(list, "ef", effect_value))
            .unwrap_or_default(),
    })
}

fn effect_value(wire: WireEffectValue) -> Result<EffectValue> {
    Ok(EffectValue {
        value_type: EffectValueType::from_tag(wire.ty.require("ty")?),
        name: wire
            .name
            .soft()
            .unwrap_or_else(|| defaults::EFFECT_VALUE_NAME.to_string()),
        value: soft_property(wire.value),
    })
}

fn layer_meta(wire: WireLayerMeta) -> Option<LayerMeta> {
    let kind = wire.kind.soft()?;
    let settings = wire.settings.soft()?;
    Some(LayerMeta {
        kind,
        settings: MetaSettings {
            sub: settings.sub.soft().map(|sub| MetaSub {
                color_deps: sub.color_deps.soft().and_then(|deps| {
                    Some(ColorDeps {
                        value: deps.value.soft()?,
                        match_name: deps.match_name.soft()?,
                        display_name: deps.display_name.soft()?,
                    })
                }),
            }),
            movable: settings.movable.soft(),
            tintable: settings.tintable.soft(),
            monochrome: settings.monochrome.soft(),
            add_lib: settings.add_lib.soft(),
            pro: settings.pro.soft(),
            lib_tint: settings.lib_tint.soft(),
            lib_col: settings.lib_col.soft(),
        },
    })
}

fn shape_item(wire: WireShapeItem) -> Result<ShapeItem> {
    let WireShapeItem { head, raw } = wire;
    Ok(ShapeItem {
        item_type: head.ty.require("ty")?,
        name: head.name.soft(),
        hidden: head.hidden.soft().unwrap_or(defaults::HIDDEN),
        raw,
    })
}

fn text_data(wire: WireTextData) -> Result<TextData> {
    Ok(TextData {
        document: property(wire.document.require("d")?)?,
        animators: wire.animators.soft().unwrap_or_default(),
        path: wire.path.soft(),
        options: wire.options.soft(),
    })
}

fn glyph(wire: WireGlyph) -> Result<Glyph> {
    Ok(Glyph {
        character: wire.character.require("ch")?,
        size: wire.size.require("size")?,
        family: wire.family.require("fFamily")?,
        style: wire.style.require("style")?,
        width: wire.width.require("w")?,
        shapes: wire
            .data
            .soft()
            .and_then(|data| data.shapes.soft())
            .map(|list| each(list, "shapes", shape_item))
            .unwrap_or_default(),
    })
}

fn font_list(wire: WireFontList) -> FontList {
    FontList {
        fonts: wire
            .list
            .soft()
            .map(|list| each(list, "list", font))
            .unwrap_or_default(),
    }
}

fn font(wire: WireFont) -> Result<Font> {
    Ok(Font {
        name: wire.name.require("fName")?,
        family: wire.family.require("fFamily")?,
        style: wire.style.require("fStyle")?,
        ascent: wire.ascent.require("ascent")?,
        path: wire.path.soft(),
    })
}

fn asset(wire: WireAsset, indices: &mut dyn IndexSource) -> Result<Asset> {
    let id = wire.id.require("id")?.into_string();
    if !wire.layers.is_absent() {
        let layers = wire.layers.require("layers")?;
        return Ok(Asset::PreComp(PreCompAsset {
            layers: layer_list(layers, "layers", indices),
            id,
        }));
    }
    Ok(Asset::Image(ImageAsset {
        id,
        name: wire.name.require("p")?,
        directory: wire
            .directory
            .soft()
            .unwrap_or_else(|| defaults::IMAGE_DIRECTORY.to_string()),
        width: wire.width.require("w")?,
        height: wire.height.require("h")?,
    }))
}

fn marker(wire: WireMarker) -> Result<Marker> {
    Ok(Marker {
        name: wire.name.require("cm")?,
        frame: wire.frame.require("tm")?,
        duration: wire.duration.soft().unwrap_or(defaults::MARKER_DURATION),
    })
}
