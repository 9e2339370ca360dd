use super::decode_each;
use crate::accessor::{FieldAccess, JsonMap};
use crate::defaults;
use crate::error::Result;
use crate::identity::IndexSource;
use crate::model::*;
use crate::registry::{EffectValueType, LayerEffectType, LayerStyleType, LayerType};
use serde_json::Value;

pub(crate) fn decode_layers(
    values: &[Value],
    key: &str,
    indices: &mut dyn IndexSource,
) -> Vec<Layer> {
    decode_each(values, key, |layer| decode_layer(layer, indices))
}

fn decode_layer(map: &JsonMap, indices: &mut dyn IndexSource) -> Result<Layer> {
    let tag: i64 = map.required("ty")?;
    let layer_type = LayerType::from_tag(tag)?;

    let in_frame: f64 = map.required("ip")?;
    let out_frame: f64 = map.required("op")?;
    let start_time: f64 = map.required("st")?;

    let name = map
        .optional("nm")
        .unwrap_or_else(|| defaults::LAYER_NAME.to_string());
    let coordinate_space = map
        .optional::<i64>("ddd")
        .and_then(CoordinateSpace::from_raw)
        .unwrap_or_default();
    let transform = map
        .optional::<&JsonMap>("ks")
        .map(decode_transform)
        .unwrap_or_default();
    let parent = map.optional("parent");
    let blend_mode = map
        .optional::<i64>("bm")
        .and_then(BlendMode::from_raw)
        .unwrap_or_default();
    let masks = map
        .optional::<&[Value]>("masksProperties")
        .map(|values| decode_each(values, "masksProperties", decode_mask));
    let time_stretch = map.optional("sr").unwrap_or(defaults::TIME_STRETCH);
    let matte = map.optional::<i64>("tt").and_then(MatteType::from_raw);
    let hidden = map.optional("hd").unwrap_or(defaults::HIDDEN);
    let styles = map
        .optional::<&[Value]>("sy")
        .map(|values| decode_each(values, "sy", decode_style))
        .unwrap_or_default();
    let effects = map
        .optional::<&[Value]>("ef")
        .map(|values| decode_each(values, "ef", decode_effect))
        .unwrap_or_default();
    let meta = map.optional::<&JsonMap>("meta").and_then(decode_layer_meta);

    // Drawn once the base fields validate; a variant failure below still
    // consumes the index.
    let index = match map.optional("ind") {
        Some(declared) => LayerIndex::Declared(declared),
        None => LayerIndex::Generated(indices.next_index()),
    };

    let kind = match layer_type {
        LayerType::PreComp => LayerKind::PreComp(PreCompContent {
            reference_id: map.required("refId")?,
            width: map.required("w")?,
            height: map.required("h")?,
            time_remapping: soft_property(map, "tm"),
        }),
        LayerType::Solid => LayerKind::Solid(SolidContent {
            color: map.required("sc")?,
            width: map.required("sw")?,
            height: map.required("sh")?,
        }),
        LayerType::Image => LayerKind::Image(ImageContent {
            reference_id: map.required("refId")?,
        }),
        LayerType::Null => LayerKind::Null,
        LayerType::Shape => LayerKind::Shape(ShapeContent {
            items: decode_each(map.required("shapes")?, "shapes", decode_shape_item),
        }),
        LayerType::Text => LayerKind::Text(decode_text_data(map.required("t")?)?),
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

fn decode_property(map: &JsonMap) -> Result<Property> {
    Ok(Property {
        value: map.raw("k")?.clone(),
        animated: map.optional::<i64>("a") == Some(1),
        index: map.optional("ix"),
        expression: map.optional("x"),
    })
}

/// A property that falls back to `None` when absent or unreadable.
fn soft_property(map: &JsonMap, key: &str) -> Option<Property> {
    map.optional::<&JsonMap>(key)
        .and_then(|property| decode_property(property).ok())
}

fn decode_transform(map: &JsonMap) -> Transform {
    let rotation = soft_property(map, "r")
        .or_else(|| soft_property(map, "rz"))
        .unwrap_or_else(Transform::identity_rotation);

    Transform {
        anchor: soft_property(map, "a").unwrap_or_else(Transform::identity_anchor),
        position: map
            .optional::<&JsonMap>("p")
            .and_then(decode_position)
            .unwrap_or_else(Transform::identity_position),
        scale: soft_property(map, "s").unwrap_or_else(Transform::identity_scale),
        rotation,
        rotation_x: soft_property(map, "rx"),
        rotation_y: soft_property(map, "ry"),
        orientation: soft_property(map, "or"),
        skew: soft_property(map, "sk"),
        skew_axis: soft_property(map, "sa"),
        opacity: soft_property(map, "o").unwrap_or_else(Transform::identity_opacity),
    }
}

fn decode_position(map: &JsonMap) -> Option<Position> {
    if map.optional::<bool>("s") == Some(true) {
        if let (Some(x), Some(y)) = (soft_property(map, "x"), soft_property(map, "y")) {
            return Some(Position::Split {
                x,
                y,
                z: soft_property(map, "z"),
            });
        }
    }
    decode_property(map).ok().map(Position::Combined)
}

fn decode_mask(map: &JsonMap) -> Result<Mask> {
    let shape = decode_property(map.required("pt")?)?;
    Ok(Mask {
        shape,
        mode: map
            .optional::<String>("mode")
            .and_then(|code| MaskMode::from_code(&code))
            .unwrap_or_default(),
        inverted: map.optional("inv").unwrap_or(defaults::MASK_INVERTED),
        name: map.optional("nm"),
        opacity: soft_property(map, "o").unwrap_or_else(Mask::default_opacity),
        expansion: soft_property(map, "x").unwrap_or_else(Mask::default_expansion),
    })
}

fn decode_style(map: &JsonMap) -> Result<LayerStyle> {
    let style_type = LayerStyleType::from_tag(map.required("ty")?);
    let name = map
        .optional("nm")
        .unwrap_or_else(|| defaults::STYLE_NAME.to_string());

    let kind = match style_type {
        LayerStyleType::DropShadow => LayerStyleKind::DropShadow(DropShadowStyle {
            color: decode_property(map.required("c")?)?,
            opacity: decode_property(map.required("o")?)?,
            angle: decode_property(map.required("a")?)?,
            size: decode_property(map.required("s")?)?,
            distance: decode_property(map.required("d")?)?,
            spread: soft_property(map, "ch"),
        }),
        LayerStyleType::Unknown(tag) => LayerStyleKind::Unknown { tag },
    };
    Ok(LayerStyle { name, kind })
}

fn decode_effect(map: &JsonMap) -> Result<LayerEffect> {
    let effect_type = LayerEffectType::from_tag(map.required("ty")?);
    let enabled = map.optional("en").unwrap_or(defaults::EFFECT_ENABLED);

    Ok(LayerEffect {
        name: map
            .optional("nm")
            .unwrap_or_else(|| defaults::EFFECT_NAME.to_string()),
        effect_type,
        enabled: enabled == defaults::EFFECT_ENABLED,
        match_name: map.optional("mn"),
        values: map
            .optional::<&[Value]>("ef")
            .map(|values| decode_each(values, "ef", decode_effect_value))
            .unwrap_or_default(),
    })
}

fn decode_effect_value(map: &JsonMap) -> Result<EffectValue> {
    Ok(EffectValue {
        value_type: EffectValueType::from_tag(map.required("ty")?),
        name: map
            .optional("nm")
            .unwrap_or_else(|| defaults::EFFECT_VALUE_NAME.to_string()),
        value: soft_property(map, "v"),
    })
}

fn decode_layer_meta(map: &JsonMap) -> Option<LayerMeta> {
    let kind = map.optional("cur")?;
    let settings: &JsonMap = map.optional("st")?;

    let sub = settings.optional::<&JsonMap>("sub").map(|sub| MetaSub {
        color_deps: sub
            .optional::<&JsonMap>("colorDeps")
            .and_then(decode_color_deps),
    });

    Some(LayerMeta {
        kind,
        settings: MetaSettings {
            sub,
            movable: settings.optional("movable"),
            tintable: settings.optional("tintable"),
            monochrome: settings.optional("monochrome"),
            add_lib: settings.optional("add_lib"),
            pro: settings.optional("pro"),
            lib_tint: settings.optional("lib_tint"),
            lib_col: settings.optional("lib_col"),
        },
    })
}

fn decode_color_deps(map: &JsonMap) -> Option<ColorDeps> {
    Some(ColorDeps {
        value: map.optional("value")?,
        match_name: map.optional("mn")?,
        display_name: map.optional("nm")?,
    })
}

pub(crate) fn decode_shape_item(map: &JsonMap) -> Result<ShapeItem> {
    Ok(ShapeItem {
        item_type: map.required("ty")?,
        name: map.optional("nm"),
        hidden: map.optional("hd").unwrap_or(defaults::HIDDEN),
        raw: Value::Object(map.clone()),
    })
}

fn decode_text_data(map: &JsonMap) -> Result<TextData> {
    Ok(TextData {
        document: decode_property(map.required("d")?)?,
        animators: map
            .optional::<&[Value]>("a")
            .map(<[Value]>::to_vec)
            .unwrap_or_default(),
        path: map.get("p").cloned(),
        options: map.get("m").cloned(),
    })
}
