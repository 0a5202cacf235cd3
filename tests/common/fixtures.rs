use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Path to a test fixture under tests/fixtures/
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a test fixture from tests/fixtures/
pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// All .sql files under a fixture directory, sorted by path
pub fn discover_scripts(dir: &str) -> Vec<PathBuf> {
    let mut scripts: Vec<PathBuf> = WalkDir::new(fixture_path(dir))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "sql"))
        .collect();
    scripts.sort();
    scripts
}

/// Concatenate the scripts of a fixture directory the way `sqlfold merge` does
pub fn load_migrations(dir: &str) -> String {
    discover_scripts(dir)
        .iter()
        .map(|p| {
            fs::read_to_string(p)
                .unwrap_or_else(|e| panic!("Failed to load {}: {}", p.display(), e))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
