use std::env;
use std::fs;
use std::path::PathBuf;

use nbt_core::NbtConfig;

fn verify_schema(name: &str, schema: schemars::schema::RootSchema) {
    let schema_json = serde_json::to_string_pretty(&schema).expect("schema should serialize");

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push(format!("schema_{name}.json"));

    if env::var("UPDATE_SCHEMA").is_ok() || !path.exists() {
        fs::write(&path, schema_json).expect("failed to write schema");
        return;
    }

    let existing_json = fs::read_to_string(&path).expect("failed to read existing schema");

    // Normalize newlines
    let schema_json = schema_json.replace("\r\n", "\n");
    let existing_json = existing_json.replace("\r\n", "\n");

    if schema_json != existing_json {
        panic!(
            "Schema mismatch for {name}. Run with UPDATE_SCHEMA=1 to update.\nExpected:\n{existing_json}\nActual:\n{schema_json}"
        );
    }
}

#[test]
fn config_schema_snapshot() {
    verify_schema("nbt_config", NbtConfig::json_schema());
}
