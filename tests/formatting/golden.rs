use std::fs;
use std::path::Path;

use declcheck::formatting::*;
use declcheck::parsing;

/// Golden test for the format command
///
/// This test:
/// 1. Reads all .pas files from tests/golden/
/// 2. Runs the equivalent of the `format` command on each file
/// 3. Compares the formatted output with the original input
/// 4. Shows clear diffs when differences are found
///
/// The test expects files to be in their canonical formatted form. If files
/// fail this test, either the parser & formatter is wrong (a bug that needs
/// to be fixed!) or possibly the golden file is wrong (perhaps because of a
/// deliberate style change, and they thus might need reformatting)

/// Simple diff function to show line-by-line differences
fn show_diff(original: &str, formatted: &str, file_path: &Path) {
    let original_lines: Vec<&str> = original
        .lines()
        .collect();
    let formatted_lines: Vec<&str> = formatted
        .lines()
        .collect();

    let max_lines = original_lines
        .len()
        .max(formatted_lines.len());

    println!("\nDifferences found in file: {:?}", file_path);
    println!("--- Original");
    println!("+++ Formatted");

    for i in 0..max_lines {
        let orig_line = original_lines
            .get(i)
            .unwrap_or(&"");
        let fmt_line = formatted_lines
            .get(i)
            .unwrap_or(&"");

        if orig_line != fmt_line {
            println!("@@ Line {} @@", i + 1);
            println!("- {}", orig_line);
            println!("+ {}", fmt_line);
        }
    }
}

#[test]
fn ensure_identical_output() {
    let dir = Path::new("tests/golden");

    assert!(dir.exists(), "golden directory missing");

    let entries = fs::read_dir(dir).expect("Failed to read golden directory");

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

    assert!(!files.is_empty(), "No .pas files found in golden directory");

    let mut failures = Vec::new();

    for file in &files {
        let original = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let program = parsing::parse(&original)
            .unwrap_or_else(|e| panic!("Failed to parse file {:?}: {:?}", file, e));

        let formatted = render(&Identity, &program);

        if original != formatted {
            show_diff(&original, &formatted, file);
            failures.push(file.clone());
        }
    }

    if !failures.is_empty() {
        panic!(
            "Golden files should be in canonical form, but {} files differ",
            failures.len()
        );
    }
}

#[test]
fn formatting_is_stable() {
    let source = "VAR a,b : integer; procedure P ( x : real ) ; begin end";

    let program = parsing::parse(source).unwrap();
    let once = render(&Identity, &program);

    let program = parsing::parse(&once).unwrap();
    let twice = render(&Identity, &program);

    assert_eq!(once, "var a, b: integer;\nprocedure P(x: real);\nbegin\nend;\n");
    assert_eq!(once, twice);
}

#[test]
fn deep_nesting_is_formatted() {
    let depth = 70;
    let mut source = String::new();
    for i in 0..depth {
        source.push_str(&format!("procedure P{};\nbegin\n", i));
    }
    for _ in 0..depth {
        source.push_str("end;\n");
    }

    let program = parsing::parse(&source).expect("Failed to parse nested procedures");
    assert_eq!(program.count(), depth);

    let result = render(&Identity, &program);
    let last = format!("{}procedure P{};", " ".repeat(4 * (depth - 1)), depth - 1);
    assert!(result
        .lines()
        .any(|line| line == last));

    // and the canonical form reads back to the same declarations
    let again = parsing::parse(&result).expect("Failed to parse formatted output");
    assert_eq!(again, program);
}
