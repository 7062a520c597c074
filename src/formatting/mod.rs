//! Formatting and highlighting of declaration source

pub mod formatter;
mod highlight;
mod renderer;
mod syntax;

pub use highlight::*;
pub use renderer::*;
pub use syntax::*;
