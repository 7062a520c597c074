use declcheck::{
    formatting::{formatter, Render},
    language::*,
};

/// Trait for declaration types that can present themselves via a renderer
pub trait Present {
    /// Present this node using the given renderer
    fn present(&self, renderer: &dyn Render) -> String;
}

impl Present for Declaration<'_> {
    fn present(&self, renderer: &dyn Render) -> String {
        formatter::render_declaration(self, renderer)
    }
}

impl Present for DeclaredType {
    fn present(&self, renderer: &dyn Render) -> String {
        formatter::render_type(self, renderer)
    }
}

impl Present for Identifier<'_> {
    fn present(&self, renderer: &dyn Render) -> String {
        formatter::render_identifier(self, renderer)
    }
}
