//! xtaconv converts timed automata written in the XTA format (UPPAAL's textual format)
//! into other model-checking formats:
//!
//! - TCK, the input format of TChecker
//! - Liana, one automaton per process
//! - JSON, a dump of the intermediate model
//!
//! Parsing is done by [`xtaconv_xta`] into the model of [`xtaconv_core`],
//! which is then rendered by [`xtaconv_tck`] or [`xtaconv_liana`].

mod cli;
mod output;

pub use cli::Cli;
pub use output::{Format, XTA_DIR, convert, output_path};
pub use xtaconv_core;
pub use xtaconv_liana;
pub use xtaconv_tck;
pub use xtaconv_xta;
