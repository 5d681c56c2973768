#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

pub const EXPECTED_FIXTURE_VERSION: u64 = 1;

pub const EXPECTED_SCENARIO_COUNTS: &[(&str, usize)] = &[("cli_replay", 2), ("rebuilder_replay", 7)];

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub scenario: String,
    pub file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub fixture_version: u64,
    pub fixture_count: usize,
    pub fixtures: Vec<ManifestEntry>,
}

#[derive(Debug, Clone)]
pub struct FixtureRecord {
    pub entry: ManifestEntry,
    pub fixture: Value,
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
}

pub fn read_json(path: &Path) -> Value {
    let data = fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}

pub fn load_manifest() -> Manifest {
    let path = fixtures_dir().join("manifest.json");
    let data = fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}

pub fn load_all_fixture_records() -> Vec<FixtureRecord> {
    let dir = fixtures_dir();
    load_manifest()
        .fixtures
        .into_iter()
        .map(|entry| {
            let fixture = read_json(&dir.join(&entry.file));
            FixtureRecord { entry, fixture }
        })
        .collect()
}

pub fn scenario_counts(entries: &[ManifestEntry]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::<String, usize>::new();
    for entry in entries {
        *out.entry(entry.scenario.clone()).or_insert(0) += 1;
    }
    out
}
