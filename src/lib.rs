//! Extraction of hardware register descriptions from reference manuals and
//! SVD files into the devregs text format.

pub mod devregs;
pub mod language;
pub mod output;
pub mod parsing;
mod regex;
pub mod svd;
