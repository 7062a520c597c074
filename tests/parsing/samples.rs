use std::fs;
use std::path::{Path, PathBuf};

use declcheck::parsing;

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(dir).expect("Failed to read directory");

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("pas")
        {
            files.push(path);
        }
    }

    files.sort();
    files
}

#[test]
fn ensure_samples_parse() {
    let dir = Path::new("tests/samples/");

    assert!(dir.exists(), "samples directory missing");

    let files = files_in(dir);

    assert!(!files.is_empty(), "No .pas files found in samples directory");

    let mut failures = Vec::new();

    for file in &files {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        match parsing::parse(&content) {
            Ok(_) => {}
            Err(e) => {
                println!("File {:?} failed to parse: {:?}", file, e);
                failures.push(file.clone());
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "Sample files should parse successfully, but {} files failed",
            failures.len()
        );
    }
}

#[test]
fn samples_check_ok() {
    for file in files_in(Path::new("tests/samples/")) {
        let content = parsing::load(&file).unwrap();
        let outcome = parsing::check(&content);

        assert!(outcome.ok, "{:?}: {:?}", file, outcome.errors);
        assert!(outcome
            .errors
            .is_empty());
    }
}
