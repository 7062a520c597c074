use std::path::Path;

use declcheck::parsing;

use crate::samples::files_in;

#[test]
fn ensure_fail() {
    let dir = Path::new("tests/broken/");

    assert!(dir.exists(), "broken directory missing");

    let files = files_in(dir);

    assert!(!files.is_empty(), "No .pas files found in broken directory");

    let mut unexpected_successes = Vec::new();

    for file in &files {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        match parsing::parse(&content) {
            Ok(_) => {
                println!("File {:?} unexpectedly parsed successfully", file);
                unexpected_successes.push(file.clone());
            }
            Err(_) => {}
        }
    }

    if !unexpected_successes.is_empty() {
        panic!(
            "Broken files should not to parse successfully, but {} files passed",
            unexpected_successes.len()
        );
    }
}

#[test]
fn broken_files_report_a_first_error() {
    for file in files_in(Path::new("tests/broken/")) {
        let content = parsing::load(&file).unwrap();
        let outcome = parsing::check(&content);

        assert!(!outcome.ok, "{:?}", file);
        let first = outcome
            .first()
            .unwrap_or_else(|| panic!("{:?} has no diagnostics", file));
        assert!(first.line >= 1 && first.column >= 1);
    }
}

#[test]
fn missing_file() {
    let result = parsing::load(Path::new("tests/broken/no_such_file.pas"));

    let error = result.unwrap_err();
    assert_eq!(error.problem, "File not found");
}
