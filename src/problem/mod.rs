// Program wide top-level error handling

mod format;
mod messages;
mod present;

// Re-export all public symbols
pub use format::*;
pub use present::*;
