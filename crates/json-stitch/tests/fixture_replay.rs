mod common;

use json_stitch::cli::{replay, ReplayArgs};
use json_stitch::{FragmentRebuilder, FragmentUpdate};
use serde::Deserialize;
use serde_json::Value;

use common::fixtures::{
    load_all_fixture_records, load_manifest, scenario_counts, FixtureRecord,
    EXPECTED_FIXTURE_VERSION, EXPECTED_SCENARIO_COUNTS,
};

#[derive(Debug, Deserialize)]
struct RebuilderInput {
    batches: Vec<Vec<FragmentUpdate>>,
    #[serde(default)]
    lock_after_batch: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RebuilderExpected {
    value: Option<Value>,
    complete: bool,
    skipped_updates: u64,
    #[serde(default)]
    non_finite_numbers: u64,
}

#[derive(Debug, Deserialize)]
struct CliInput {
    #[serde(rename = "final")]
    final_only: bool,
    events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CliExpected {
    lines: Vec<Value>,
}

fn field<T: for<'de> Deserialize<'de>>(record: &FixtureRecord, key: &str) -> T {
    let value = record.fixture.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .unwrap_or_else(|e| panic!("fixture {} has bad {key}: {e}", record.entry.name))
}

fn run_rebuilder(record: &FixtureRecord) {
    let input: RebuilderInput = field(record, "input");
    let expected: RebuilderExpected = field(record, "expected");
    let name = &record.entry.name;

    let mut rebuilder = FragmentRebuilder::new();
    for (index, batch) in input.batches.into_iter().enumerate() {
        rebuilder.apply(batch);
        if input.lock_after_batch == Some(index) {
            rebuilder.lock_for_result();
        }
    }

    assert_eq!(rebuilder.value(), expected.value.as_ref(), "value mismatch for {name}");
    assert_eq!(rebuilder.is_complete(), expected.complete, "completion mismatch for {name}");
    let diagnostics = rebuilder.diagnostics();
    assert_eq!(diagnostics.skipped_updates, expected.skipped_updates, "skip count mismatch for {name}");
    assert_eq!(
        diagnostics.non_finite_numbers, expected.non_finite_numbers,
        "non-finite count mismatch for {name}"
    );
}

fn run_cli(record: &FixtureRecord) {
    let input: CliInput = field(record, "input");
    let expected: CliExpected = field(record, "expected");
    let name = &record.entry.name;

    let ndjson = input
        .events
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    let args = ReplayArgs {
        final_only: input.final_only,
        ..ReplayArgs::default()
    };
    let mut out = Vec::new();
    let events = replay(ndjson.as_bytes(), &mut out, &args)
        .unwrap_or_else(|e| panic!("replay failed for {name}: {e}"));
    assert_eq!(events, input.events.len());

    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines, expected.lines, "output mismatch for {name}");
}

#[test]
fn manifest_matches_fixture_files() {
    let manifest = load_manifest();
    assert_eq!(manifest.fixture_version, EXPECTED_FIXTURE_VERSION);
    assert_eq!(manifest.fixture_count, manifest.fixtures.len());
    let counts = scenario_counts(&manifest.fixtures);
    for (scenario, count) in EXPECTED_SCENARIO_COUNTS {
        assert_eq!(counts.get(*scenario), Some(count), "scenario {scenario}");
    }
    assert_eq!(counts.len(), EXPECTED_SCENARIO_COUNTS.len());
}

#[test]
fn fixtures_replay_to_expected_output() {
    for record in load_all_fixture_records() {
        match record.entry.scenario.as_str() {
            "rebuilder_replay" => run_rebuilder(&record),
            "cli_replay" => run_cli(&record),
            other => panic!("unknown fixture scenario {other} in {}", record.entry.name),
        }
    }
}
