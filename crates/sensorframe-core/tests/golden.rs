use std::fs;
use std::path::{Path, PathBuf};

use sensorframe_core::schema::{Schema, presets};
use sensorframe_core::{decode, decoder::message_lines};
use serde_json::Value;

fn golden_dir(case: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("golden")
        .join(case)
}

fn load_schema(case: &str) -> Schema {
    let json = fs::read_to_string(golden_dir(case).join("schema.json")).expect("read schema.json");
    Schema::from_json_str(&json).expect("parse schema.json")
}

fn run_golden(case: &str) {
    let dir = golden_dir(case);
    let schema = load_schema(case);
    let input = fs::read_to_string(dir.join("input.hex")).expect("read input.hex");
    let expected_json = fs::read_to_string(dir.join("expected.json")).expect("read expected.json");
    let expected: Value = serde_json::from_str(&expected_json).expect("parse expected.json");

    let actual: Vec<Value> = message_lines(&input)
        .map(|line| {
            let record = decode(line, &schema).expect("decode golden input");
            serde_json::to_value(record).expect("serialize record")
        })
        .collect();

    assert_eq!(Value::Array(actual), expected, "golden mismatch in {case}");
}

#[test]
fn golden_device_id() {
    run_golden("device_id");
}

#[test]
fn golden_mac() {
    run_golden("mac");
}

#[test]
fn golden_overlap() {
    run_golden("overlap");
}

#[test]
fn golden_schemas_match_presets() {
    assert_eq!(load_schema("device_id"), presets::device_id());
    assert_eq!(load_schema("mac"), presets::mac());
}

#[test]
fn golden_mac_preserves_key_order() {
    let schema = load_schema("mac");
    let input = fs::read_to_string(golden_dir("mac").join("input.hex")).expect("read input.hex");
    let first = message_lines(&input).next().expect("first message");
    let record = decode(first, &schema).expect("decode").expect("gated record");
    let json = serde_json::to_string(&record).expect("record json");
    assert_eq!(
        json,
        r#"{"length":8,"messageType":16,"mac":"58:2d:34:82:81:8b","battery":1,"temperature":22.2,"humidity":43.1}"#
    );
}
