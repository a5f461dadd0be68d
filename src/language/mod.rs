// Types representing hardware registers and their bit-fields

mod error;
mod types;

// Re-export all public symbols
pub use error::*;
pub use types::*;
