use crate::{Format, convert, output_path};
use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXTENSION: &str = "xta";

/// A converter of XTA timed automata into TCK and Liana models
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path of an XTA file, or of a directory to convert recursively
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    input: PathBuf,
    /// Output file (TCK, JSON) or directory (Liana);
    /// for a directory input, the root of the converted tree
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    output: Option<PathBuf>,
    /// Format to convert to
    #[arg(short, long, value_enum, default_value_t = Format::Tck)]
    format: Format,
    /// Remove existing output directories of the format before converting a directory
    #[arg(long, default_value = "false")]
    clean: bool,
}

impl Cli {
    pub fn run(&self) -> anyhow::Result<()> {
        if self.input.is_dir() {
            self.batch()
        } else {
            self.single()
        }
    }

    fn single(&self) -> anyhow::Result<()> {
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| output_path(&self.input, Path::new(""), self.format));
        for path in convert(&self.input, &output, self.format)? {
            println!("Converted: {} -> {}", self.input.display(), path.display());
        }
        Ok(())
    }

    fn batch(&self) -> anyhow::Result<()> {
        let root = self.output.as_deref().unwrap_or(&self.input);
        if self.clean {
            let removed = clean(root, self.format)?;
            println!("Cleared {removed} {} directories", self.format.dir());
        }

        let files = discover(&self.input);
        if files.is_empty() {
            println!("No .{EXTENSION} files found in {}", self.input.display());
            return Ok(());
        }
        println!("Found {} .{EXTENSION} files to convert", files.len());

        let style = ProgressStyle::with_template("[{elapsed_precise}] {wide_bar} {pos}/{len} {msg}")?;
        let bar = ProgressBar::new(files.len() as u64).with_style(style);
        let mut converted = 0;
        let mut failed = 0;
        for file in &files {
            bar.set_message(file.display().to_string());
            let relative = file.strip_prefix(&self.input).unwrap_or(file);
            let output = output_path(relative, root, self.format);
            match convert(file, &output, self.format) {
                Ok(paths) => {
                    converted += 1;
                    for path in paths {
                        bar.println(format!(
                            "Converted: {} -> {}",
                            file.display(),
                            path.display()
                        ));
                    }
                }
                Err(err) => {
                    failed += 1;
                    bar.suspend(|| eprintln!("Error converting {}: {err:#}", file.display()));
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!(target: "cli", "converted {converted} of {} files", files.len());
        println!("\nConversion complete:");
        println!("  Successfully converted: {converted}");
        println!("  Failed: {failed}");
        Ok(())
    }
}

/// The XTA files below `dir`, sorted by path.
fn discover(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|err| warn!(target: "cli", "skipping unreadable entry: {err}"))
                .ok()
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == EXTENSION)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Removes the directories named after `format` below `root`, returning how many were removed.
fn clean(root: &Path, format: Format) -> anyhow::Result<usize> {
    let dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir() && entry.file_name() == format.dir())
        .map(walkdir::DirEntry::into_path)
        .collect();
    let mut removed = 0;
    // Nested output directories are gone with their ancestor.
    for dir in dirs.iter().filter(|dir| dir.is_dir()) {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove directory '{}'", dir.display()))?;
        println!("Removed: {}", dir.display());
        removed += 1;
    }
    Ok(removed)
}
