use super::messages::generate_error_message;
use declcheck::{
    formatting::Render,
    grammar::GrammarError,
    language::{DiagnosticKind, LoadingError},
    parsing::parser::ParsingError,
};
use owo_colors::OwoColorize;
use std::path::Path;

fn label(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::Lexical => "lexical error",
        DiagnosticKind::Syntax => "syntax error",
        DiagnosticKind::Semantic => "semantic error",
    }
}

/// Format a parsing error with full details including source code context
pub fn full_parsing_error<'i>(
    error: &ParsingError,
    filename: &'i Path,
    source: &'i str,
    renderer: &impl Render,
) -> String {
    let (problem, details) = generate_error_message(error, renderer);
    let position = error.position();

    let line = position.line as usize;
    let column = position.column as usize;

    let code = source
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("");
    let width = 3.max(
        line.to_string()
            .len(),
    );

    format!(
        r#"
{}: {}:{}:{} {}

{:width$} {}
{:width$} {} {}
{:width$} {} {:>column$}

{}
        "#,
        label(error.kind()).bright_red(),
        filename.to_string_lossy(),
        line,
        column,
        problem.bold(),
        ' ',
        '|'.bright_blue(),
        line.bright_blue(),
        '|'.bright_blue(),
        code,
        ' ',
        '|'.bright_blue(),
        '^'.bright_red(),
        details
    )
    .trim_ascii()
    .to_string()
}

/// Format the errors from one file, earliest first. Unless all of them are
/// wanted only the first is shown. Each error appears once, in full.
pub fn full_parsing_errors<'i>(
    errors: &mut Vec<ParsingError>,
    all: bool,
    filename: &'i Path,
    source: &'i str,
    renderer: &impl Render,
) -> String {
    errors.sort_by_key(|error| error.position());
    if !all {
        errors.truncate(1);
    }

    errors
        .iter()
        .map(|error| full_parsing_error(error, filename, source, renderer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format a parsing error with concise single-line output
pub fn concise_parsing_error<'i>(
    error: &ParsingError,
    filename: &'i Path,
    renderer: &impl Render,
) -> String {
    let (problem, _) = generate_error_message(error, renderer);
    let position = error.position();

    format!(
        "{}: {}:{}:{} {}",
        label(error.kind()).bright_red(),
        filename.to_string_lossy(),
        position.line,
        position.column,
        problem.bold(),
    )
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    )
}

/// Format a problem with a grammar description. Conflicts are reported as
/// the grammar not being LR(1); anything else means the description itself
/// is broken.
pub fn concise_grammar_error(error: &GrammarError, filename: &Path) -> String {
    let heading = if error.is_conflict() {
        "not LR(1)"
    } else {
        "invalid grammar"
    };

    format!(
        "{}: {}: {}",
        heading.bright_red(),
        filename.display(),
        error
            .message()
            .bold()
    )
}

#[cfg(test)]
mod check {
    use super::*;
    use declcheck::formatting::Identity;
    use declcheck::parsing;

    static SOURCE: &str = "var a, a: integer;\nvar b, b: real;\n";

    #[test]
    fn only_the_earliest_error_by_default() {
        let mut errors = parsing::parse(SOURCE).unwrap_err();
        assert_eq!(errors.len(), 2);

        let text = full_parsing_errors(&mut errors, false, Path::new("two.pas"), SOURCE, &Identity);
        assert_eq!(text.matches("two.pas:").count(), 1);
        assert!(text.contains("two.pas:1:8"));
    }

    #[test]
    fn all_errors_appear_once_each() {
        let mut errors = parsing::parse(SOURCE).unwrap_err();

        let text = full_parsing_errors(&mut errors, true, Path::new("two.pas"), SOURCE, &Identity);
        assert_eq!(text.matches("two.pas:").count(), 2);
        assert_eq!(text.matches("two.pas:1:8").count(), 1);
        assert_eq!(text.matches("two.pas:2:8").count(), 1);
    }
}
