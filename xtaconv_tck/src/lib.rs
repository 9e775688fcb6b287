//! Emitter of TCK documents (the input format of TChecker) from XTA models.
//!
//! Local clocks and variables are qualified by their process' name,
//! while global declarations and constants keep their own.

use anyhow::Context;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use xtaconv_core::expression::{tck_assignments, tck_expression};
use xtaconv_core::{IntRange, Location, Process, Transition, XtaModel};

/// Event of transitions that do not synchronize.
pub const TAU: &str = "tau";

/// A TCK rendering of an [`XtaModel`], produced through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Tck<'a> {
    model: &'a XtaModel,
    system: &'a str,
}

impl<'a> Tck<'a> {
    /// Renders `model` as the TCK system named `system`.
    pub fn new(model: &'a XtaModel, system: &'a str) -> Self {
        Self { model, system }
    }

    fn global_declarations(&self) -> Vec<String> {
        let constants = self.model.constants();
        let mut declarations: Vec<String> = constants
            .iter()
            .map(|c| int_declaration(&c.name, IntRange::for_constant(&c.value)))
            .collect();
        declarations.extend(self.model.clocks().iter().map(|c| format!("clock:1:{c}")));
        declarations.extend(self.model.variables().iter().map(|v| {
            int_declaration(&v.name, IntRange::for_variable(v, constants))
        }));
        declarations
    }

    fn fmt_process(&self, f: &mut fmt::Formatter<'_>, process: &Process) -> fmt::Result {
        let name = process.name();
        writeln!(f, "# Process: {name}")?;

        if !process.clocks().is_empty() {
            writeln!(f, "## Clocks for {name}")?;
            for clock in process.clocks() {
                writeln!(f, "clock:1:{}", process.qualified(clock))?;
            }
            writeln!(f)?;
        }

        if !process.variables().is_empty() {
            writeln!(f, "## Variables for {name}")?;
            for var in process.variables() {
                let range = IntRange::for_variable(var, self.model.constants());
                writeln!(f, "{}", int_declaration(&process.qualified(&var.name), range))?;
            }
            writeln!(f)?;
        }

        if !process.locations().is_empty() {
            writeln!(f, "## Locations for {name}")?;
            for location in process.locations() {
                writeln!(f, "{}", location_line(process, location))?;
            }
            writeln!(f)?;
        }

        if !process.transitions().is_empty() {
            writeln!(f, "## Edges for {name}")?;
            for transition in process.transitions() {
                writeln!(f, "{}", edge_line(process, transition))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Tck<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system:{}\n\n", self.system)?;

        writeln!(f, "# Events")?;
        let mut events = self.model.events();
        events.insert(TAU);
        for event in events {
            writeln!(f, "event:{event}")?;
        }
        write!(f, "\n\n\n")?;

        let declarations = self.global_declarations();
        if !declarations.is_empty() {
            writeln!(f, "# Global declarations")?;
            for declaration in &declarations {
                writeln!(f, "{declaration}")?;
            }
            write!(f, "\n\n\n")?;
        }

        writeln!(f, "# Processes")?;
        for process in self.model.processes() {
            writeln!(f, "process:{}", process.name())?;
        }
        writeln!(f)?;

        for (idx, process) in self.model.processes().iter().enumerate() {
            if idx > 0 {
                write!(f, "\n\n\n")?;
            }
            self.fmt_process(f, process)?;
        }

        let synchronizations = self.model.synchronizations();
        if !synchronizations.is_empty() {
            write!(f, "\n\n\n# Synchronizations\n")?;
            for sync in synchronizations {
                writeln!(f, "sync:{sync}")?;
            }
        }
        Ok(())
    }
}

fn int_declaration(name: &str, range: IntRange) -> String {
    format!("int:1:{}:{}:{}:{name}", range.min, range.max, range.init)
}

fn attributes(attributes: Vec<String>) -> String {
    if attributes.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", attributes.join(" : "))
    }
}

fn location_line(process: &Process, location: &Location) -> String {
    let mut attrs = Vec::new();
    if process.is_initial(&location.name) {
        attrs.push("initial:".to_owned());
    }
    if process.is_urgent(&location.name) {
        attrs.push("urgent:".to_owned());
    }
    if let Some(invariant) = &location.invariant {
        attrs.push(format!("invariant:{}", tck_expression(invariant, process)));
    }
    format!(
        "location:{}:{}{}",
        process.name(),
        location.name,
        attributes(attrs)
    )
}

fn edge_line(process: &Process, transition: &Transition) -> String {
    let event = transition
        .sync
        .as_ref()
        .map_or(TAU, |sync| sync.channel.as_str());
    let mut attrs = Vec::new();
    if let Some(guard) = &transition.guard {
        attrs.push(format!("provided:{}", tck_expression(guard, process)));
    }
    if let Some(assign) = &transition.assign {
        let statements = tck_assignments(assign, process);
        if !statements.is_empty() {
            attrs.push(format!("do:{statements}"));
        }
    }
    format!(
        "edge:{}:{}:{}:{event}{}",
        process.name(),
        transition.source,
        transition.target,
        attributes(attrs)
    )
}

/// Converts the XTA file at `input` into the TCK file at `output`,
/// creating its parent directories.
///
/// The system is named after the stem of `input`.
pub fn convert(input: &Path, output: &Path) -> anyhow::Result<PathBuf> {
    let model = xtaconv_xta::load(input)?;
    let system = input
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let document = Tck::new(&model, &system).to_string();
    debug!(target: "tck", "rendered system '{system}'");
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(output, document)
        .with_context(|| format!("failed to write TCK file '{}'", output.display()))?;
    info!(target: "tck", "written TCK file '{}'", output.display());
    Ok(output.to_path_buf())
}
