//! Rendering backends which produce marked up output

mod terminal;

pub use terminal::*;
