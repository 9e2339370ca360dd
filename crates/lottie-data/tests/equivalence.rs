use lottie_data::equivalence::compare;
use lottie_data::{
    decode_dynamic, decode_structured, DecodeError, Equivalence, ErrorKind, Harness,
    IndexComparison, RandomIndices, SequentialIndices,
};
use serde_json::{json, Value};

const STICKER: &[u8] = include_bytes!("fixtures/sticker.json");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

fn assert_agree(input: &[u8]) {
    match Harness::new().check(input) {
        Equivalence::Agree(_) | Equivalence::BothFailed { .. } => {}
        Equivalence::Diverged(d) => panic!("decoders diverged: {}", d.first_difference),
    }
}

fn both_errors(input: &[u8]) -> (DecodeError, DecodeError) {
    let structured = decode_structured(input, &mut SequentialIndices::starting_at(0));
    let dynamic = decode_dynamic(input, &mut SequentialIndices::starting_at(0));
    match (structured, dynamic) {
        (Err(s), Err(d)) => (s, d),
        (s, d) => panic!("expected both to fail, got {s:?} / {d:?}"),
    }
}

#[test]
fn test_sticker_fixture_is_identical_across_strategies() {
    init_tracing();
    for seed in [0, 1, -40, i64::MAX - 1] {
        let outcome = Harness::new().with_seed(seed).check(STICKER);
        match outcome {
            Equivalence::Agree(doc) => assert_eq!(doc.layers().len(), 6),
            other => panic!("seed {seed}: {other:?}"),
        }
    }
}

#[test]
fn test_random_sources_compare_only_after_explicit_erasure() {
    init_tracing();
    let structured = decode_structured(STICKER, &mut RandomIndices::new());
    let dynamic = decode_dynamic(STICKER, &mut RandomIndices::new());
    let outcome = compare(structured, dynamic, IndexComparison::IgnoreGenerated);
    assert!(matches!(outcome, Equivalence::Agree(_)));

    // Erasure leaves declared indices alone.
    if let Equivalence::Agree(doc) = outcome {
        assert_eq!(doc.layers()[0].index.value(), 1);
    }
}

#[test]
fn test_harness_flags_generated_index_drift() {
    let structured = decode_structured(STICKER, &mut SequentialIndices::starting_at(0));
    let dynamic = decode_dynamic(STICKER, &mut SequentialIndices::starting_at(1));
    match compare(structured, dynamic, IndexComparison::Exact) {
        Equivalence::Diverged(d) => {
            assert!(d.first_difference.contains("structured `0,` vs dynamic `1,`"))
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

#[test]
fn test_hard_failures_match_across_strategies() {
    let complete = json!({
        "v": "5.7.0", "ip": 0, "op": 30, "fr": 30, "w": 100, "h": 100, "layers": []
    });

    for key in ["v", "ip", "op", "fr", "w", "h", "layers"] {
        let mut doc = complete.clone();
        doc.as_object_mut().unwrap().remove(key);
        let (s, d) = both_errors(&bytes(&doc));
        assert_eq!(s.kind(), ErrorKind::MissingKey(key.to_string()));
        assert_eq!(s.kind(), d.kind());
        assert_agree(&bytes(&doc));
    }

    for key in ["v", "fr", "w"] {
        let mut doc = complete.clone();
        doc[key] = json!([1]);
        let (s, d) = both_errors(&bytes(&doc));
        assert_eq!(s.kind(), ErrorKind::TypeMismatch(key.to_string()));
        assert_eq!(s.kind(), d.kind());
    }
}

#[test]
fn test_first_missing_key_wins_in_both() {
    let (s, d) = both_errors(br#"{ "v": "5.7.0", "layers": [] }"#);
    assert_eq!(s.kind(), ErrorKind::MissingKey("ip".into()));
    assert_eq!(d.kind(), ErrorKind::MissingKey("ip".into()));
}

#[test]
fn test_structural_failures_match() {
    let layers_object = json!({
        "v": "5.7.0", "ip": 0, "op": 30, "fr": 30, "w": 100, "h": 100, "layers": {}
    });
    for input in [bytes(&layers_object), b"[]".to_vec(), b"\"lottie\"".to_vec()] {
        let (s, d) = both_errors(&input);
        assert_eq!(s.kind(), ErrorKind::MalformedDocument);
        assert_eq!(d.kind(), ErrorKind::MalformedDocument);
    }

    let (s, d) = both_errors(b"{ \"v\": ");
    assert_eq!(s.kind(), ErrorKind::Syntax);
    assert_eq!(d.kind(), ErrorKind::Syntax);
}

#[test]
fn test_malformed_optional_sections_agree() {
    let doc = json!({
        "v": "5.7.0", "ip": 0, "op": 30, "fr": 30.0, "w": 100, "h": 100,
        "ddd": "three",
        "layers": [
            { "ty": 3, "ip": 0, "op": 30, "st": 0, "ks": [], "masksProperties": "none", "sy": {}, "meta": 4 },
            { "ty": 4, "ip": 0, "op": 30, "st": 0, "shapes": {} },
            { "ty": 5, "ip": 0, "op": 30, "st": 0, "t": { "d": 3 } },
            { "ty": 0, "ip": 0, "op": 30, "st": 0, "refId": "c", "w": 1, "h": 1, "tm": "bad" },
            { "ty": 1, "ip": 0, "op": 30, "st": 0, "sc": 0, "sw": 1, "sh": 1 },
            { "ty": "2", "ip": 0, "op": 30, "st": 0 },
            { "ty": 3.0, "ip": 0, "op": 30, "st": 0 }
        ],
        "chars": {},
        "fonts": [],
        "assets": [ { "layers": [] }, { "id": "c", "layers": 3 }, { "id": null } ],
        "markers": [ { "cm": 1, "tm": 0 }, { "cm": "ok", "tm": "0" } ],
        "meta": "none"
    });
    init_tracing();
    assert_agree(&bytes(&doc));
}

#[test]
fn test_transform_fallbacks_agree() {
    let doc = json!({
        "v": "5.7.0", "ip": 0, "op": 30, "fr": 30, "w": 100, "h": 100,
        "layers": [
            { "ty": 3, "ip": 0, "op": 30, "st": 0, "ks": { "r": { "a": 0 }, "rz": { "a": 0, "k": 9 } } },
            { "ty": 3, "ip": 0, "op": 30, "st": 0, "ks": { "p": { "s": true, "x": { "k": 1 } } } },
            { "ty": 3, "ip": 0, "op": 30, "st": 0, "ks": { "p": { "s": true, "x": { "k": 1 }, "y": { "k": 2 }, "k": [0, 0] } } },
            { "ty": 3, "ip": 0, "op": 30, "st": 0, "ks": { "p": { "s": "yes", "k": [5, 5] }, "o": 100 } }
        ]
    });
    assert_agree(&bytes(&doc));
}
