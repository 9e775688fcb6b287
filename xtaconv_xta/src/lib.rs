//! Extractor of the intermediate model from XTA timed-automata files.
//!
//! Extraction is best-effort: sections or declarations that cannot be
//! recognised are left out of the model instead of failing the whole file.

mod parser;

use anyhow::Context;
use log::info;
pub use parser::{parse, strip_comments};
use std::path::Path;
pub use xtaconv_core;
use xtaconv_core::XtaModel;

/// Reads and parses the XTA file at `path`.
///
/// Invalid UTF-8 sequences are replaced rather than rejected,
/// so only I/O failures are errors.
pub fn load(path: &Path) -> anyhow::Result<XtaModel> {
    info!(target: "parser", "parsing XTA model file '{}'", path.display());
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read XTA file '{}'", path.display()))?;
    let source = String::from_utf8_lossy(&bytes);
    Ok(parse(&source))
}
