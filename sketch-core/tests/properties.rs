//! Invariants that hold for any generator output.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Map, Value};
use sketch_core::{
    repair, sanitize_elements, Pipeline, PipelineConfig, PipelineOutput, PrimitiveKind,
    RepairOptions,
};

fn arb_kind() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(vec![
        "rectangle", "ellipse", "diamond", "line", "arrow", "text", "image", "frame",
    ]))
}

fn arb_coordinate() -> impl Strategy<Value = Option<Value>> {
    prop::option::of(prop_oneof![
        (-500.0f64..500.0).prop_map(|v| json!(v)),
        (-500i64..500).prop_map(|v| json!(v)),
        (-500i64..500).prop_map(|v| json!(v.to_string())),
        Just(json!(-1.5e308)),
        Just(json!("wide")),
        Just(Value::Null),
    ])
}

fn arb_points() -> impl Strategy<Value = Option<Value>> {
    prop::option::of(prop_oneof![
        prop::collection::vec((-300.0f64..300.0, -300.0f64..300.0), 0..4)
            .prop_map(|points| {
                let pairs: Vec<[f64; 2]> = points.into_iter().map(|(x, y)| [x, y]).collect();
                json!(pairs)
            }),
        Just(json!([[0, 0], "bad"])),
    ])
}

fn arb_raw_element() -> impl Strategy<Value = Value> {
    (
        arb_kind(),
        (arb_coordinate(), arb_coordinate(), arb_coordinate(), arb_coordinate()),
        arb_points(),
        prop::option::of(prop::sample::select(vec!["a", "b", "c", ""])),
        (prop::option::of(0u32..6), prop::option::of(0u32..6)),
        (prop::option::of("[a-zA-Z \n]{0,24}"), prop::option::of("[a-z]{0,8}")),
        prop::option::of(-50.0f64..250.0),
    )
        .prop_map(
            |(kind, (x, y, width, height), points, id, (seed, nonce), (text, original), opacity)| {
                let mut map = Map::new();
                let mut put = |key: &str, value: Option<Value>| {
                    if let Some(value) = value {
                        map.insert(key.to_string(), value);
                    }
                };
                put("type", kind.map(|k| json!(k)));
                put("x", x);
                put("y", y);
                put("width", width);
                put("height", height);
                put("points", points);
                put("id", id.map(|i| json!(i)));
                put("seed", seed.map(|s| json!(s)));
                put("versionNonce", nonce.map(|n| json!(n)));
                put("text", text.map(|t| json!(t)));
                put("originalText", original.map(|t| json!(t)));
                put("opacity", opacity.map(|o| json!(o)));
                put("label", Some(json!({ "text": "inline" })));
                Value::Object(map)
            },
        )
}

fn run(raw: &[Value], seed: u64) -> PipelineOutput {
    Pipeline::default()
        .process(raw, StdRng::seed_from_u64(seed))
        .expect("object elements are always accepted")
}

proptest! {
    #[test]
    fn prop_pipeline_is_total(
        raw in prop::collection::vec(arb_raw_element(), 0..12),
        seed in any::<u64>()
    ) {
        let output = run(&raw, seed);
        prop_assert_eq!(output.document.elements().len(), raw.len());
        prop_assert!(output.document.to_json().is_ok());
    }

    #[test]
    fn prop_input_is_not_mutated(raw in prop::collection::vec(arb_raw_element(), 0..8)) {
        let before = raw.clone();
        let _ = run(&raw, 1);
        prop_assert_eq!(raw, before);
    }

    #[test]
    fn prop_repair_is_idempotent(raw in prop::collection::vec(arb_raw_element(), 0..12)) {
        let output = run(&raw, 2);
        let elements = output.document.elements();
        let again = repair(elements.to_vec(), RepairOptions::default());
        prop_assert_eq!(again.report.total(), 0);
        prop_assert_eq!(again.primitives.as_slice(), elements);
    }

    #[test]
    fn prop_paths_end_at_extent(raw in prop::collection::vec(arb_raw_element(), 0..12)) {
        let output = run(&raw, 3);
        for primitive in output.document.elements() {
            if let Some(path) = primitive.kind.path() {
                prop_assert!(path.points.len() >= 2);
                prop_assert_eq!(path.points.last().copied(), Some(primitive.extent_point()));
                prop_assert!(primitive.width >= 0.0, "width {}", primitive.width);
                prop_assert!(primitive.height >= 0.0, "height {}", primitive.height);
            } else {
                prop_assert!(primitive.width > 0.0, "width {}", primitive.width);
                prop_assert!(primitive.height > 0.0, "height {}", primitive.height);
            }
        }
    }

    #[test]
    fn prop_text_is_echoed(raw in prop::collection::vec(arb_raw_element(), 0..12)) {
        let output = run(&raw, 4);
        for primitive in output.document.elements() {
            if let PrimitiveKind::Text(text) = &primitive.kind {
                prop_assert_eq!(&text.original_text, &text.text);
            }
        }
    }

    #[test]
    fn prop_identities_are_unique(
        raw in prop::collection::vec(arb_raw_element(), 0..16),
        seed in any::<u64>()
    ) {
        let output = run(&raw, seed);
        let elements = output.document.elements();
        let ids: HashSet<_> = elements.iter().map(|p| p.id.as_str()).collect();
        let seeds: HashSet<_> = elements.iter().map(|p| p.seed).collect();
        let nonces: HashSet<_> = elements.iter().map(|p| p.version_nonce).collect();
        prop_assert_eq!(ids.len(), elements.len());
        prop_assert_eq!(seeds.len(), elements.len());
        prop_assert_eq!(nonces.len(), elements.len());
        prop_assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn prop_style_ranges(raw in prop::collection::vec(arb_raw_element(), 0..12)) {
        let output = run(&raw, 5);
        for primitive in output.document.elements() {
            prop_assert!(primitive.style.opacity <= 100);
            prop_assert!(primitive.style.roughness <= 2);
            prop_assert!(primitive.style.stroke_width > 0.0);
        }
    }

    #[test]
    fn prop_same_seed_same_document(raw in prop::collection::vec(arb_raw_element(), 0..8)) {
        let pipeline = Pipeline::new(PipelineConfig::default().with_timestamp(1));
        let first = pipeline.process(&raw, StdRng::seed_from_u64(9)).expect("process");
        let second = pipeline.process(&raw, StdRng::seed_from_u64(9)).expect("process");
        prop_assert_eq!(first.document, second.document);
    }

    #[test]
    fn prop_sanitizer_is_total(
        raw in prop::collection::vec(arb_raw_element(), 0..12),
        seed in any::<u64>()
    ) {
        let outcome = sanitize_elements(&raw, StdRng::seed_from_u64(seed));
        prop_assert!(outcome.is_ok());
        prop_assert_eq!(outcome.map(|o| o.primitives.len()).unwrap_or(0), raw.len());
    }

    #[test]
    fn prop_sanitized_extents_are_settled(raw in prop::collection::vec(arb_raw_element(), 0..12)) {
        let outcome = sanitize_elements(&raw, StdRng::seed_from_u64(6)).expect("sanitize");
        for primitive in &outcome.primitives {
            prop_assert!(primitive.x.is_finite() && primitive.y.is_finite());
            if let Some(path) = primitive.kind.path() {
                prop_assert!(!path.points.is_empty());
                prop_assert!(primitive.width >= 0.0, "width {}", primitive.width);
                prop_assert!(primitive.height >= 0.0, "height {}", primitive.height);
            } else {
                prop_assert!(primitive.width > 0.0, "width {}", primitive.width);
                prop_assert!(primitive.height > 0.0, "height {}", primitive.height);
            }
        }
    }

    #[test]
    fn prop_sanitized_identities_are_unique(raw in prop::collection::vec(arb_raw_element(), 0..16)) {
        let outcome = sanitize_elements(&raw, StdRng::seed_from_u64(7)).expect("sanitize");
        let seeds: HashSet<_> = outcome.primitives.iter().map(|p| p.seed).collect();
        let nonces: HashSet<_> = outcome.primitives.iter().map(|p| p.version_nonce).collect();
        prop_assert_eq!(seeds.len(), outcome.primitives.len());
        prop_assert_eq!(nonces.len(), outcome.primitives.len());
    }
}
