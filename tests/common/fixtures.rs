use std::fs;
use std::path::{Path, PathBuf};

use sylva::ast::{decode_str, Program};

/// Get path to a fixture in tests/fixtures/
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a fixture from tests/fixtures/
pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load and decode a program fixture
pub fn load_program(name: &str) -> Program {
    decode_str(&load_fixture(name))
        .unwrap_or_else(|e| panic!("Failed to decode fixture {}: {}", name, e))
}
