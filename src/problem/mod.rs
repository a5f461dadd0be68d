// Presentation of errors to the user

mod format;
mod messages;

// Re-export all public symbols
pub use format::*;
