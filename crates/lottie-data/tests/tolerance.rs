//! Defaulting and per-element isolation, checked through both decoders.

use lottie_data::model::*;
use lottie_data::{decode, AnimationDocument, DecodeStrategy, ErrorKind, Result, SequentialIndices};
use serde_json::{json, Value};

fn decode_with(strategy: DecodeStrategy, value: &Value) -> Result<AnimationDocument> {
    let bytes = serde_json::to_vec(value).unwrap();
    decode(&bytes, strategy, &mut SequentialIndices::starting_at(0))
}

fn document(layers: Value) -> Value {
    json!({
        "v": "5.7.0", "ip": 0, "op": 60, "fr": 30, "w": 200, "h": 200,
        "layers": layers
    })
}

#[test]
fn test_unrecognized_discriminator_drops_only_that_layer() {
    let doc = document(json!([
        { "ty": 3, "nm": "first", "ip": 0, "op": 60, "st": 0 },
        { "ty": 99, "nm": "mystery", "ip": 0, "op": 60, "st": 0 },
        { "ty": 4, "nm": "second", "ip": 0, "op": 60, "st": 0, "shapes": [] }
    ]));

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        let names: Vec<&str> = decoded.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"], "{strategy}");
    }
}

#[test]
fn test_reserved_tags_fall_back_to_unknown_kind() {
    let doc = document(json!([
        { "ty": 6, "ip": 0, "op": 60, "st": 0, "hd": true },
        { "ty": 15, "ip": 0, "op": 60, "st": 0 },
        { "ty": 16, "ip": 0, "op": 60, "st": 0 },
        { "ty": -1, "ip": 0, "op": 60, "st": 0 }
    ]));

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        let kinds: Vec<&LayerKind> = decoded.layers().iter().map(|l| &l.kind).collect();
        assert_eq!(
            kinds,
            vec![&LayerKind::Unknown { tag: 6 }, &LayerKind::Unknown { tag: 15 }]
        );
        assert!(decoded.layers()[0].hidden);
    }
}

#[test]
fn test_missing_base_fields_use_defaults() {
    let doc = document(json!([{ "ty": 3, "ip": 0, "op": 60, "st": 0 }]));

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        let layer = &decoded.layers()[0];
        assert_eq!(layer.name, "Layer");
        assert_eq!(layer.blend_mode, BlendMode::Normal);
        assert_eq!(layer.time_stretch, 1.0);
        assert!(!layer.hidden);
        assert_eq!(layer.coordinate_space, CoordinateSpace::TwoD);
        assert_eq!(layer.transform, Transform::default());
        assert_eq!(layer.masks, None);
        assert!(layer.styles.is_empty());
        assert!(layer.effects.is_empty());
        assert_eq!(layer.matte, None);
        assert_eq!(layer.parent, None);
        assert_eq!(layer.meta, None);
    }
}

#[test]
fn test_wrongly_typed_soft_fields_use_defaults() {
    let doc = document(json!([{
        "ty": 3, "ip": 0, "op": 60, "st": 0,
        "nm": 12, "bm": "multiply", "sr": "fast", "hd": 1, "ddd": 7, "tt": 9,
        "parent": "root", "ind": "one"
    }]));

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        let layer = &decoded.layers()[0];
        assert_eq!(layer.name, "Layer");
        assert_eq!(layer.blend_mode, BlendMode::Normal);
        assert_eq!(layer.time_stretch, 1.0);
        assert!(!layer.hidden);
        assert_eq!(layer.coordinate_space, CoordinateSpace::TwoD);
        assert_eq!(layer.matte, None);
        assert_eq!(layer.parent, None);
        assert_eq!(layer.index, LayerIndex::Generated(0));
    }
}

#[test]
fn test_start_time_is_required_per_layer() {
    let doc = document(json!([
        { "ty": 3, "nm": "missing", "ip": 0, "op": 60 },
        { "ty": 3, "nm": "text", "ip": 0, "op": 60, "st": "x" },
        { "ty": 3, "nm": "kept", "ip": 0, "op": 60, "st": 2 },
        { "ty": 3, "nm": "null", "ip": 0, "op": 60, "st": null }
    ]));

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        assert_eq!(decoded.layers().len(), 1, "{strategy}");
        let layer = &decoded.layers()[0];
        assert_eq!(layer.name, "kept");
        assert_eq!(layer.start_time, 2.0);
        // Rejected layers never reached the index source.
        assert_eq!(layer.index, LayerIndex::Generated(0));
    }
}

#[test]
fn test_missing_canvas_fields_fail_whole_document() {
    for key in ["w", "h", "fr"] {
        let mut doc = document(json!([]));
        doc.as_object_mut().unwrap().remove(key);

        for strategy in DecodeStrategy::ALL {
            let err = decode_with(strategy, &doc).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingKey(key.to_string()), "{strategy}");
        }
    }
}

#[test]
fn test_minimal_document_has_no_optional_sections() {
    let doc = document(json!([{ "ty": 3, "ip": 0, "op": 60, "st": 0 }]));

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        assert_eq!(decoded.layers().len(), 1);
        assert_eq!(decoded.layers()[0].kind, LayerKind::Null);
        assert!(decoded.glyphs().is_none());
        assert!(decoded.fonts().is_none());
        assert!(decoded.asset_library().is_none());
        assert!(decoded.markers().is_none());
        assert!(decoded.marker_map().is_none());
        assert!(decoded.meta().is_none());
    }
}

#[test]
fn test_duplicate_marker_names_keep_last() {
    let mut doc = document(json!([]));
    doc["markers"] = json!([
        { "cm": "a", "tm": 0 },
        { "cm": "a", "tm": 10 }
    ]);

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        assert_eq!(decoded.markers().unwrap().len(), 2);
        assert_eq!(decoded.marker("a").unwrap().frame, 10.0);
    }
}

#[test]
fn test_generated_indices_follow_document_order() {
    let mut doc = document(json!([
        { "ty": 3, "ip": 0, "op": 60, "st": 0 },
        { "ty": 3, "ind": 40, "ip": 0, "op": 60, "st": 0 },
        { "ty": 3, "ip": 0 },
        { "ty": 3, "ip": 0, "op": 60, "st": 0 }
    ]));
    doc["assets"] = json!([
        { "id": "comp", "layers": [ { "ty": 3, "ip": 0, "op": 60, "st": 0 } ] }
    ]);

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        let indices: Vec<LayerIndex> = decoded.all_layers().map(|l| l.index).collect();
        assert_eq!(
            indices,
            vec![
                LayerIndex::Generated(0),
                LayerIndex::Declared(40),
                LayerIndex::Generated(1),
                LayerIndex::Generated(2),
            ]
        );
    }
}

#[test]
fn test_whole_numbers_and_floats_decode_identically() {
    let whole = json!({
        "v": "5.7.0", "ip": 0, "op": 60, "fr": 30, "w": 200, "h": 200,
        "layers": [ { "ty": 1, "ip": 0, "op": 60, "st": 5, "sr": 2, "sc": "#000", "sw": 10, "sh": 10 } ]
    });
    let fractional = json!({
        "v": "5.7.0", "ip": 0.0, "op": 60.0, "fr": 30.0, "w": 200.0, "h": 200.0,
        "layers": [ { "ty": 1, "ip": 0.0, "op": 60.0, "st": 5.0, "sr": 2.0, "sc": "#000", "sw": 10.0, "sh": 10.0 } ]
    });

    for strategy in DecodeStrategy::ALL {
        assert_eq!(
            decode_with(strategy, &whole).unwrap(),
            decode_with(strategy, &fractional).unwrap()
        );
    }
}

#[test]
fn test_precomp_asset_layers_are_tolerant_too() {
    let mut doc = document(json!([]));
    doc["assets"] = json!([{
        "id": "comp",
        "layers": [
            { "ty": 3, "ip": 0, "op": 60, "st": 0 },
            { "ty": 77, "ip": 0, "op": 60, "st": 0 },
            { "ty": 2, "ip": 0, "op": 60, "st": 0 },
            { "ty": 3, "op": 60, "st": 0 }
        ]
    }]);

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        let comp = decoded.asset_library().unwrap().precomps().next().unwrap();
        assert_eq!(comp.layers.len(), 1);
    }
}

#[test]
fn test_variant_field_failure_drops_layer() {
    let doc = document(json!([
        { "ty": 0, "nm": "no ref", "ip": 0, "op": 60, "st": 0, "w": 10, "h": 10 },
        { "ty": 1, "nm": "no size", "ip": 0, "op": 60, "st": 0, "sc": "#fff" },
        { "ty": 2, "nm": "image", "ip": 0, "op": 60, "st": 0, "refId": "img" },
        { "ty": 5, "nm": "no text", "ip": 0, "op": 60, "st": 0 }
    ]));

    for strategy in DecodeStrategy::ALL {
        let decoded = decode_with(strategy, &doc).unwrap();
        assert_eq!(decoded.layers().len(), 1);
        assert_eq!(decoded.layers()[0].name, "image");
        // The two layers before it failed after drawing their indices.
        assert_eq!(decoded.layers()[0].index, LayerIndex::Generated(2));
    }
}
