//! Renderers for colourizing declaration source

use std::borrow::Cow;

use crate::formatting::*;
use crate::language::*;

/// We do the code formatting in two passes. First we convert from our
/// declaration tree into a Vec of "fragments" (Syntax tag, String pairs).
/// Then second we apply the specified renderer to each pair to result in an
/// embellished/highlighted String.
pub fn render(renderer: &impl Render, program: &Program) -> String {
    // Pass 1: Format declarations to tagged fragments
    let fragments = formatter::format_with_renderer(program);

    // Pass 2: Render tagged fragments to final output
    render_to_string(renderer, fragments)
}

/// The same two passes, but over source text as written rather than over
/// a parsed tree, so that comments and layout are preserved.
pub fn highlight(renderer: &impl Render, source: &str) -> String {
    let fragments = highlight_fragments(source);

    render_to_string(renderer, fragments)
}

/// Pass 2: apply markup to fragments via style() and combine.
fn render_to_string<'i>(renderer: &impl Render, fragments: Vec<(Syntax, Cow<'i, str>)>) -> String {
    let mut output = String::new();

    for (syntax, content) in fragments {
        let rendered = renderer.style(syntax, &content);
        output.push_str(&rendered);
    }

    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn highlight_with_identity_is_unchanged() {
        let source = "var x: integer; // counter\n";
        assert_eq!(highlight(&Identity, source), source);
    }

    #[test]
    fn empty_program_renders_nothing() {
        assert_eq!(render(&Identity, &Program::default()), "");
    }
}
