use json_stitch::{
    document_id, indexed_document_id, DocumentRegistry, FragmentUpdate, StitchError, StitchOptions,
};
use serde_json::json;

fn object_with(key: &str, literal: &str) -> Vec<FragmentUpdate> {
    vec![
        FragmentUpdate::start_object("root"),
        FragmentUpdate::complete_string(format!("root.{key}"), literal),
    ]
}

#[test]
fn streamed_tool_call_lifecycle() {
    let mut registry = DocumentRegistry::new();
    let id = document_id("msg-7", "call_a");

    registry.apply(&id, vec![FragmentUpdate::start_object("root")]);
    registry.apply(&id, vec![FragmentUpdate::partial_string("root.query", "wea")]);
    assert_eq!(registry.value(&id), Some(&json!({"query": "wea"})));

    registry.apply(
        &id,
        vec![
            FragmentUpdate::partial_string("root.query", "ther"),
            FragmentUpdate::complete_string("root.query", "\"weather\""),
            FragmentUpdate::end_object("root"),
            FragmentUpdate::json_complete(),
        ],
    );
    assert!(registry.is_complete(&id));
    assert_eq!(registry.value(&id), Some(&json!({"query": "weather"})));

    registry.finalize_message("msg-7", Some(&["call_a"]));
    assert!(!registry.has(&id));
    assert!(!registry.is_complete(&id));
}

#[test]
fn tool_result_locks_before_json_complete() {
    let mut registry = DocumentRegistry::new();
    registry.apply("m:t", object_with("city", "\"Par\""));
    registry.complete("m:t");
    registry.apply("m:t", object_with("city", "\"Paris\""));
    assert_eq!(registry.value("m:t"), Some(&json!({"city": "Par"})));
    assert_eq!(
        registry.get("m:t").map(|_| ()),
        Err(StitchError::DocumentComplete("m:t".to_string()))
    );
    assert_eq!(
        registry.try_get("m:t").map(|r| r.is_locked()),
        Some(true)
    );
}

#[test]
fn completion_is_sticky_until_delete() {
    let mut registry = DocumentRegistry::new();
    registry.complete("a");
    for literal in ["\"x\"", "\"y\""] {
        registry.apply("a", object_with("k", literal));
        assert_eq!(registry.value("a"), None);
    }
    assert!(registry.delete("a"));
    registry.apply("a", object_with("k", "\"z\""));
    assert_eq!(registry.value("a"), Some(&json!({"k": "z"})));
}

#[test]
fn delete_then_get_is_fresh() {
    let mut registry = DocumentRegistry::new();
    registry.apply("a", object_with("k", "\"v\""));
    registry.apply("a", vec![FragmentUpdate::json_complete()]);
    registry.delete("a");
    let rebuilder = registry.get("a").unwrap();
    assert_eq!(rebuilder.value(), None);
    assert!(!rebuilder.is_complete());
}

#[test]
fn prefix_sweep_ignores_insertion_order() {
    let mut registry = DocumentRegistry::new();
    for id in ["x:1", "m:2", "m:1", "mm:1", indexed_document_id("m", 0).as_str(), "x:2"] {
        registry.apply(id, object_with("k", "\"v\""));
    }
    assert_eq!(registry.finalize_message("m", None), 3);
    assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["x:1", "mm:1", "x:2"]);
}

#[test]
fn options_limit_every_document() {
    let options = StitchOptions {
        max_index_gap: 2,
        ..StitchOptions::default()
    };
    let mut registry = DocumentRegistry::with_options(options);
    registry.apply(
        "a",
        vec![
            FragmentUpdate::complete_number("root[2]", "1"),
            FragmentUpdate::complete_number("root[10]", "2"),
        ],
    );
    assert_eq!(registry.value("a"), Some(&json!([null, null, 1])));
    assert_eq!(registry.try_get("a").unwrap().diagnostics().skipped_updates, 1);
}
