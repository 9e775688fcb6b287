use anyhow::Context;
use clap::ValueEnum;
use log::info;
use std::path::{Path, PathBuf};

/// Directory name marking the XTA sources of a benchmark tree.
pub const XTA_DIR: &str = "xta";

/// Target format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// TChecker's TCK
    Tck,
    /// One Liana automaton per process
    Liana,
    /// The intermediate model serialized as JSON
    Json,
}

impl Format {
    /// Name of the directory collecting the outputs of this format.
    pub fn dir(self) -> &'static str {
        match self {
            Format::Tck => "tck",
            Format::Liana => "liana",
            Format::Json => "json",
        }
    }

    // Liana outputs are directories, so they get no extension.
    fn extension(self) -> Option<&'static str> {
        match self {
            Format::Tck => Some("tck"),
            Format::Liana => None,
            Format::Json => Some("json"),
        }
    }
}

/// Where the conversion of `relative`, an XTA file path relative to `root`, is written.
///
/// The first `xta` directory of the path is replaced by the format's directory,
/// or the format's directory is added next to the file if there is none.
/// TCK and JSON outputs are files with the format's extension,
/// Liana outputs are the directory under which the per-model directory is created.
pub fn output_path(relative: &Path, root: &Path, format: Format) -> PathBuf {
    let mut dir = root.to_path_buf();
    let mut replaced = false;
    for component in relative.parent().into_iter().flat_map(Path::components) {
        if !replaced && component.as_os_str() == XTA_DIR {
            dir.push(format.dir());
            replaced = true;
        } else {
            dir.push(component);
        }
    }
    if !replaced {
        dir.push(format.dir());
    }
    match format.extension() {
        Some(extension) => dir
            .join(relative.file_name().unwrap_or_default())
            .with_extension(extension),
        None => dir,
    }
}

/// Converts the XTA file `input` to `format`, returning the paths of the written files.
///
/// `output` is a file for TCK and JSON, and the root directory for Liana.
pub fn convert(input: &Path, output: &Path, format: Format) -> anyhow::Result<Vec<PathBuf>> {
    match format {
        Format::Tck => xtaconv_tck::convert(input, output).map(|path| vec![path]),
        Format::Liana => xtaconv_liana::convert(input, output),
        Format::Json => dump(input, output).map(|path| vec![path]),
    }
}

fn dump(input: &Path, output: &Path) -> anyhow::Result<PathBuf> {
    let model = xtaconv_xta::load(input)?;
    let json = serde_json::to_string_pretty(&model).context("failed to serialize model")?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(output, json)
        .with_context(|| format!("failed to write JSON file '{}'", output.display()))?;
    info!(target: "cli", "written JSON model '{}'", output.display());
    Ok(output.to_path_buf())
}
