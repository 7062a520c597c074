//! Code formatter for declarations

use std::borrow::Cow;

use crate::formatting::*;
use crate::language::*;

/// Each level of nesting inside a body is indented this many spaces.
const INDENT: usize = 4;

pub fn format_with_renderer<'i>(program: &'i Program) -> Vec<(Syntax, Cow<'i, str>)> {
    let mut output = Formatter::new();

    output.format_declarations(&program.declarations);

    output.fragments
}

/// Present a single declaration on one line (or several, if it has a body)
/// without a trailing newline.
pub fn render_declaration(declaration: &Declaration, renderer: &dyn Render) -> String {
    let mut output = Formatter::new();
    output.format_declaration(declaration);

    let result = output.render(renderer);
    result
        .trim_end()
        .to_string()
}

pub fn render_type(kind: &DeclaredType, renderer: &dyn Render) -> String {
    let mut output = Formatter::new();
    output.format_type(kind);
    output.render(renderer)
}

pub fn render_identifier(identifier: &Identifier, renderer: &dyn Render) -> String {
    renderer.style(Syntax::Variable, identifier.0)
}

struct Formatter<'i> {
    fragments: Vec<(Syntax, Cow<'i, str>)>,
    nesting: usize,
}

impl<'i> Formatter<'i> {
    fn new() -> Formatter<'i> {
        Formatter {
            fragments: Vec::new(),
            nesting: 0,
        }
    }

    fn render(&self, renderer: &dyn Render) -> String {
        self.fragments
            .iter()
            .map(|(syntax, content)| renderer.style(*syntax, content))
            .collect()
    }

    fn add(&mut self, syntax: Syntax, content: &'static str) {
        self.fragments
            .push((syntax, Cow::Borrowed(content)));
    }

    fn add_borrowed(&mut self, syntax: Syntax, content: &'i str) {
        self.fragments
            .push((syntax, Cow::Borrowed(content)));
    }

    fn add_owned(&mut self, syntax: Syntax, content: String) {
        self.fragments
            .push((syntax, Cow::Owned(content)));
    }

    fn space(&mut self) {
        self.add(Syntax::Neutral, " ");
    }

    fn newline(&mut self) {
        self.add(Syntax::Newline, "\n");
    }

    fn indent(&mut self) {
        if self.nesting > 0 {
            let spaces = " ".repeat(self.nesting);
            self.add_owned(Syntax::Indent, spaces);
        }
    }

    fn increase(&mut self, depth: usize) {
        self.nesting += depth;
    }

    fn decrease(&mut self, depth: usize) {
        self.nesting -= depth;
    }

    fn format_declarations(&mut self, declarations: &'i [Declaration<'i>]) {
        for declaration in declarations {
            self.format_declaration(declaration);
        }
    }

    fn format_declaration(&mut self, declaration: &'i Declaration<'i>) {
        self.indent();

        match declaration {
            Declaration::Variable { names, kind } => {
                self.add(Syntax::Keyword, "var");
                self.space();
                self.format_names(names);
                self.add(Syntax::Punctuation, ":");
                self.space();
                self.format_type(kind);
                self.add(Syntax::Punctuation, ";");
                self.newline();
            }
            Declaration::Procedure {
                name,
                parameters,
                body,
            } => {
                self.add(Syntax::Keyword, "procedure");
                self.space();
                self.add_borrowed(Syntax::Declaration, name.0);
                self.format_parameters(parameters);
                self.add(Syntax::Punctuation, ";");
                self.format_routine(body);
            }
            Declaration::Function {
                name,
                parameters,
                returns,
                body,
            } => {
                self.add(Syntax::Keyword, "function");
                self.space();
                self.add_borrowed(Syntax::Declaration, name.0);
                self.format_parameters(parameters);
                self.add(Syntax::Punctuation, ":");
                self.space();
                self.format_type(returns);
                self.add(Syntax::Punctuation, ";");
                self.format_routine(body);
            }
        }
    }

    fn format_names(&mut self, names: &'i [Identifier<'i>]) {
        for (i, name) in names
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.add(Syntax::Punctuation, ",");
                self.space();
            }
            self.add_borrowed(Syntax::Variable, name.0);
        }
    }

    /// Consecutive parameters of the same type are written as one section.
    fn format_parameters(&mut self, parameters: &'i [Parameter<'i>]) {
        if parameters.is_empty() {
            return;
        }

        self.add(Syntax::Punctuation, "(");

        let mut sections: Vec<(Vec<Identifier<'i>>, &'i DeclaredType)> = Vec::new();
        for parameter in parameters {
            match sections.last_mut() {
                Some((names, kind)) if **kind == parameter.kind => names.push(parameter.name),
                _ => sections.push((vec![parameter.name], &parameter.kind)),
            }
        }

        for (i, (names, kind)) in sections
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.add(Syntax::Punctuation, ";");
                self.space();
            }
            for (j, name) in names
                .iter()
                .enumerate()
            {
                if j > 0 {
                    self.add(Syntax::Punctuation, ",");
                    self.space();
                }
                self.add_borrowed(Syntax::Variable, name.0);
            }
            self.add(Syntax::Punctuation, ":");
            self.space();
            self.format_type(kind);
        }

        self.add(Syntax::Punctuation, ")");
    }

    fn format_routine(&mut self, body: &'i Option<Vec<Declaration<'i>>>) {
        match body {
            None => {
                self.space();
                self.add(Syntax::Keyword, "forward");
                self.add(Syntax::Punctuation, ";");
                self.newline();
            }
            Some(declarations) => {
                self.newline();
                self.indent();
                self.add(Syntax::Keyword, "begin");
                self.newline();

                self.increase(INDENT);
                self.format_declarations(declarations);
                self.decrease(INDENT);

                self.indent();
                self.add(Syntax::Keyword, "end");
                self.add(Syntax::Punctuation, ";");
                self.newline();
            }
        }
    }

    fn format_type(&mut self, kind: &DeclaredType) {
        match kind {
            DeclaredType::Primitive(primitive) => {
                self.add_owned(Syntax::Type, primitive.to_string());
            }
            DeclaredType::String(size) => {
                self.add(Syntax::Type, "string");
                if let Some(size) = size {
                    self.add(Syntax::Punctuation, "[");
                    self.add_owned(Syntax::Numeric, size.to_string());
                    self.add(Syntax::Punctuation, "]");
                }
            }
            DeclaredType::Array {
                low,
                high,
                element,
            } => {
                self.add(Syntax::Type, "array");
                self.add(Syntax::Punctuation, "[");
                self.add_owned(Syntax::Numeric, low.to_string());
                self.add(Syntax::Punctuation, "..");
                self.add_owned(Syntax::Numeric, high.to_string());
                self.add(Syntax::Punctuation, "]");
                self.space();
                self.add(Syntax::Keyword, "of");
                self.space();
                self.format_type(element);
            }
        }
    }
}
