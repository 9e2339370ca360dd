//! Map-walking decoder.
//!
//! Parses the source into a generic JSON tree and reads every key through
//! [`FieldAccess`]. Shares nothing with the structured decoder except the
//! model, the registry and the defaulting table.

mod layer;

use crate::accessor::{FieldAccess, JsonMap};
use crate::defaults;
use crate::error::{DecodeError, JsonKind, Result};
use crate::identity::IndexSource;
use crate::model::*;
use serde_json::Value;

use layer::{decode_layers, decode_shape_item};

pub fn decode(bytes: &[u8], indices: &mut dyn IndexSource) -> Result<AnimationDocument> {
    let root: Value = serde_json::from_slice(bytes)?;
    let map = root.as_object().ok_or_else(|| {
        DecodeError::malformed(format!(
            "root must be an object, found {}",
            JsonKind::of(&root)
        ))
    })?;
    decode_document(map, indices)
}

fn decode_document(map: &JsonMap, indices: &mut dyn IndexSource) -> Result<AnimationDocument> {
    let version: String = map.required("v")?;
    let start_frame: f64 = map.required("ip")?;
    let end_frame: f64 = map.required("op")?;
    let framerate: f64 = map.required("fr")?;
    let width: f64 = map.required("w")?;
    let height: f64 = map.required("h")?;
    let layer_values: &[Value] = match map.required("layers") {
        Ok(values) => values,
        Err(DecodeError::TypeMismatch { found, .. }) => {
            return Err(DecodeError::malformed(format!(
                "`layers` must be an array, found {found}"
            )))
        }
        Err(err) => return Err(err),
    };

    let coordinate_space = map
        .optional::<i64>("ddd")
        .and_then(CoordinateSpace::from_raw)
        .unwrap_or_default();

    let layers = decode_layers(layer_values, "layers", indices);

    let glyphs = map
        .optional::<&[Value]>("chars")
        .map(|values| decode_each(values, "chars", decode_glyph));

    let fonts = map.optional::<&JsonMap>("fonts").map(|fonts| FontList {
        fonts: fonts
            .optional::<&[Value]>("list")
            .map(|values| decode_each(values, "list", decode_font))
            .unwrap_or_default(),
    });

    let asset_library = map
        .optional::<&[Value]>("assets")
        .map(|values| AssetLibrary {
            assets: decode_each(values, "assets", |asset| decode_asset(asset, indices)),
        });

    let markers = map
        .optional::<&[Value]>("markers")
        .map(|values| decode_each(values, "markers", decode_marker));

    let meta = map
        .optional::<&JsonMap>("meta")
        .map(|meta| DocumentMeta {
            pack: meta.optional("ct"),
        });

    tracing::debug!(
        layers = layers.len(),
        markers = markers.as_ref().map_or(0, Vec::len),
        "dynamic decode finished"
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

/// Decode each object in `values`; failures drop that element only.
pub(crate) fn decode_each<T>(
    values: &[Value],
    key: &str,
    mut decode: impl FnMut(&JsonMap) -> Result<T>,
) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        let element = format!("{key}[{i}]");
        let result = match value.as_object() {
            Some(map) => decode(map),
            None => Err(DecodeError::mismatch(
                element.as_str(),
                JsonKind::Object,
                JsonKind::of(value),
            )),
        };
        match result {
            Ok(decoded) => out.push(decoded),
            Err(err) => tracing::warn!(element = %element, %err, "dropping element"),
        }
    }
    out
}

fn decode_glyph(map: &JsonMap) -> Result<Glyph> {
    let character = map.required("ch")?;
    let size = map.required("size")?;
    let family = map.required("fFamily")?;
    let style = map.required("style")?;
    let width = map.required("w")?;
    let shapes = map
        .optional::<&JsonMap>("data")
        .and_then(|data| data.optional::<&[Value]>("shapes"))
        .map(|values| decode_each(values, "shapes", decode_shape_item))
        .unwrap_or_default();

    Ok(Glyph {
        character,
        size,
        family,
        style,
        width,
        shapes,
    })
}

fn decode_font(map: &JsonMap) -> Result<Font> {
    Ok(Font {
        name: map.required("fName")?,
        family: map.required("fFamily")?,
        style: map.required("fStyle")?,
        ascent: map.required("ascent")?,
        path: map.optional("fPath"),
    })
}

fn decode_asset_id(map: &JsonMap) -> Result<String> {
    let value = map.raw("id")?;
    match value {
        Value::String(id) => Ok(id.clone()),
        other => other
            .as_i64()
            .map(|n| n.to_string())
            .ok_or_else(|| DecodeError::mismatch("id", JsonKind::String, JsonKind::of(other))),
    }
}

fn decode_asset(map: &JsonMap, indices: &mut dyn IndexSource) -> Result<Asset> {
    let id = decode_asset_id(map)?;

    if map.contains_key("layers") {
        let values: &[Value] = map.required("layers")?;
        return Ok(Asset::PreComp(PreCompAsset {
            id,
            layers: decode_layers(values, "layers", indices),
        }));
    }

    Ok(Asset::Image(ImageAsset {
        id,
        name: map.required("p")?,
        directory: map
            .optional("u")
            .unwrap_or_else(|| defaults::IMAGE_DIRECTORY.to_string()),
        width: map.required("w")?,
        height: map.required("h")?,
    }))
}

fn decode_marker(map: &JsonMap) -> Result<Marker> {
    Ok(Marker {
        name: map.required("cm")?,
        frame: map.required("tm")?,
        duration: map.optional("dr").unwrap_or(defaults::MARKER_DURATION),
    })
}
