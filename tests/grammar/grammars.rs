use std::fs;
use std::path::{Path, PathBuf};

use declcheck::grammar::{self, ConflictKind, GrammarError};
use declcheck::parsing;

fn grammars_in(dir: &Path) -> Vec<PathBuf> {
    assert!(dir.exists(), "{:?} directory missing", dir);

    let entries = fs::read_dir(dir).expect("Failed to read grammars directory");

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("json")
        {
            files.push(path);
        }
    }

    assert!(!files.is_empty(), "No .json files found in {:?}", dir);

    files.sort();
    files
}

fn read(file: &Path) -> Result<grammar::Grammar, GrammarError> {
    let content = parsing::load(file)
        .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));
    grammar::from_json(&content)
}

#[test]
fn ensure_valid_grammars_are_lr1() {
    for file in grammars_in(Path::new("tests/grammars/valid/")) {
        let description = read(&file).unwrap();

        let verdict = grammar::check_lr1(&description);
        assert!(verdict.is_lr1, "{:?}: {}", file, verdict.message);
        assert!(verdict
            .message
            .starts_with("built "));
    }
}

#[test]
fn ensure_conflicts_are_found() {
    for file in grammars_in(Path::new("tests/grammars/conflicts/")) {
        let description = read(&file).unwrap();

        // the structure is fine; only table construction fails
        assert_eq!(description.validate(), Ok(()), "{:?}", file);

        match grammar::build_lr1(&description) {
            Err(GrammarError::Conflict { kind, .. }) => {
                assert_eq!(kind, ConflictKind::ReduceReduce, "{:?}", file)
            }
            other => panic!("{:?} should conflict, got {:?}", file, other),
        }
    }
}

#[test]
fn ensure_invalid_grammars_are_rejected() {
    for file in grammars_in(Path::new("tests/grammars/invalid/")) {
        let result = read(&file).and_then(|description| description.validate());

        match result {
            Ok(()) => panic!("{:?} should not validate", file),
            Err(error) => assert!(!error.is_conflict(), "{:?}", file),
        }
    }
}

#[test]
fn conflict_names_state_and_symbol() {
    let description = read(Path::new("tests/grammars/conflicts/epsilons.json")).unwrap();

    let verdict = grammar::check_lr1(&description);
    assert!(!verdict.is_lr1);
    assert_eq!(
        verdict.message,
        "reduce/reduce conflict in state 0 on symbol '$'"
    );
}

#[test]
fn valid_tables_are_complete() {
    let description = read(Path::new("tests/grammars/valid/lists.json")).unwrap();
    let tables = grammar::build_lr1(&description).unwrap();

    assert_eq!(tables.action.len(), tables.states);
    assert_eq!(tables.goto.len(), tables.states);
    assert_eq!(
        tables
            .productions
            .iter()
            .map(|production| production.to_string())
            .collect::<Vec<_>>(),
        vec!["List → ident Tail", "Tail → , ident Tail", "Tail → ε"]
    );

    // every shift and goto lands on a state which exists
    for row in &tables.action {
        for action in row.values() {
            if let grammar::Action::Shift(target) = action {
                assert!(*target < tables.states);
            }
        }
    }
    for row in &tables.goto {
        for target in row.values() {
            assert!(*target < tables.states);
        }
    }
}

#[test]
fn built_in_grammar_passes() {
    let description = grammar::default_grammar().unwrap();
    let first = grammar::build_lr1(&description).unwrap();
    let second = grammar::build_lr1(&description).unwrap();

    assert_eq!(first, second);
}
