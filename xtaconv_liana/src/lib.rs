//! Emitter of Liana automata from XTA models.
//!
//! Every process becomes a separate `create automaton` document.
//! Simple clock comparisons are rendered as `(clock, op, value)` tuples,
//! while integer constants and boolean literals are replaced by their values.

use anyhow::Context;
use log::{debug, info};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use xtaconv_core::expression::{comparison, comparison_tuple, conjuncts, split_assignment, substitute};
use xtaconv_core::{Location, Process, Transition, XtaModel};

/// Action of transitions that do not synchronize.
pub const DEFAULT_ACTION: &str = "a";

const INDENT: &str = "    ";

/// The Liana automaton of a process, produced through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Automaton<'a> {
    model: &'a XtaModel,
    process: &'a Process,
}

impl<'a> Automaton<'a> {
    /// The automaton of `process`, a process of `model`.
    pub fn new(model: &'a XtaModel, process: &'a Process) -> Self {
        Self { model, process }
    }

    /// Name of the automaton.
    pub fn name(&self) -> &'a str {
        self.process.name()
    }

    /// Local clocks followed by the global ones.
    fn clocks(&self) -> Vec<&'a str> {
        let mut clocks: Vec<&str> = self.process.clocks().iter().map(String::as_str).collect();
        for clock in self.model.clocks() {
            if !self.process.is_clock(clock) {
                clocks.push(clock);
            }
        }
        clocks
    }

    fn is_clock(&self, name: &str) -> bool {
        self.process.is_clock(name) || self.model.is_global_clock(name)
    }

    fn actions(&self) -> BTreeSet<&'a str> {
        let transitions = self.process.transitions();
        let mut actions: BTreeSet<&str> = self.process.channels();
        if transitions.is_empty() || transitions.iter().any(|t| t.sync.is_none()) {
            actions.insert(DEFAULT_ACTION);
        }
        actions
    }

    fn integers(&self) -> BTreeSet<&'a str> {
        self.process
            .variables()
            .iter()
            .chain(self.model.variables())
            .map(|v| v.name.as_str())
            .collect()
    }

    fn location_attributes(&self, location: &Location) -> String {
        let initial = if self.process.is_initial(&location.name) {
            'T'
        } else {
            'F'
        };
        let mut attributes = format!("ini: {initial}");
        if self.process.is_urgent(&location.name) {
            attributes.push_str(", urg: T");
        }
        if let Some(invariant) = &location.invariant {
            let constants = self.model.constants();
            let items: Vec<String> = conjuncts(invariant)
                .into_iter()
                .map(|item| {
                    comparison_tuple(item, constants).unwrap_or_else(|| substitute(item, constants))
                })
                .collect();
            if !items.is_empty() {
                attributes.push_str(&format!(", inv: [{}]", items.join(", ")));
            }
        }
        attributes
    }

    fn transition_tuple(&self, transition: &Transition) -> String {
        let constants = self.model.constants();
        let action = transition
            .sync
            .as_ref()
            .map_or_else(|| DEFAULT_ACTION.to_owned(), |sync| sync.to_string());

        let mut clock_guards = Vec::new();
        let mut guards = Vec::new();
        for item in transition.guard.as_deref().map(conjuncts).unwrap_or_default() {
            let tuple = comparison(item)
                .filter(|cmp| self.is_clock(cmp.left))
                .and_then(|_| comparison_tuple(item, constants));
            match tuple {
                Some(tuple) => clock_guards.push(tuple),
                None => guards.push(substitute(item, constants)),
            }
        }

        let mut resets = Vec::new();
        let mut assigns = Vec::new();
        let items = transition.assign.as_deref().unwrap_or_default().split(',');
        for item in items.map(str::trim).filter(|item| !item.is_empty()) {
            match split_assignment(item) {
                Some((var, value)) => {
                    let value = substitute(value, constants);
                    if self.is_clock(var) && value == "0" {
                        resets.push(var.to_owned());
                    } else {
                        assigns.push(format!("{var} = {value}"));
                    }
                }
                None => assigns.push(item.to_owned()),
            }
        }

        let mut parts = vec![
            transition.source.clone(),
            action,
            format!("[{}]", clock_guards.join(", ")),
        ];
        if !guards.is_empty() {
            parts.push(guards.join(" && "));
        }
        parts.push(format!("[{}]", resets.join(", ")));
        if !assigns.is_empty() {
            parts.push(format!("[{}]", assigns.join(", ")));
        }
        parts.push(transition.target.clone());
        format!("({})", parts.join(", "))
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("create automaton {}", self.name()),
            "{".to_owned(),
        ];

        let clocks = self.clocks();
        if clocks.is_empty() {
            lines.push(format!("{INDENT}clocks {{  }}"));
        } else {
            lines.push(format!("{INDENT}clocks {{ {}; }}", clocks.join(", ")));
        }
        let actions: Vec<&str> = self.actions().into_iter().collect();
        lines.push(format!("{INDENT}actions {{ {}; }}", actions.join(", ")));
        let integers: Vec<&str> = self.integers().into_iter().collect();
        if !integers.is_empty() {
            lines.push(format!("{INDENT}integers {{ {}; }}", integers.join(", ")));
        }

        lines.push(format!("{INDENT}locations {{"));
        let locations = self.process.locations();
        let attributes: Vec<String> = locations
            .iter()
            .map(|l| self.location_attributes(l))
            .collect();
        let name_width = locations.iter().map(|l| l.name.len()).max().unwrap_or(0);
        let attr_width = attributes.iter().map(String::len).max().unwrap_or(0);
        for (idx, (location, attrs)) in locations.iter().zip(&attributes).enumerate() {
            let sep = separator(idx, locations.len());
            lines.push(format!(
                "{INDENT}{INDENT}{:<name_width$} <{attrs:<attr_width$}>{sep}",
                location.name
            ));
        }
        lines.push(format!("{INDENT}}}"));

        lines.push(format!("{INDENT}transitions {{"));
        let transitions = self.process.transitions();
        for (idx, transition) in transitions.iter().enumerate() {
            let sep = separator(idx, transitions.len());
            lines.push(format!(
                "{INDENT}{INDENT}{}{sep}",
                self.transition_tuple(transition)
            ));
        }
        lines.push(format!("{INDENT}}}"));
        lines.push("}".to_owned());
        lines
    }
}

fn separator(idx: usize, len: usize) -> char {
    if idx + 1 == len { ';' } else { ',' }
}

impl fmt::Display for Automaton<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// The automata of all the processes of `model`, in file order.
pub fn automata(model: &XtaModel) -> impl Iterator<Item = Automaton<'_>> {
    model
        .processes()
        .iter()
        .map(move |process| Automaton::new(model, process))
}

/// Converts the XTA file at `input` into one Liana file per process,
/// written as `<output_root>/<stem>/<process>.txt`.
///
/// Returns the paths of the written files.
pub fn convert(input: &Path, output_root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let model = xtaconv_xta::load(input)?;
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let dir = output_root.join(stem.as_ref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
    let mut written = Vec::new();
    for automaton in automata(&model) {
        let path = dir.join(format!("{}.txt", automaton.name()));
        debug!(target: "liana", "rendering automaton '{}'", automaton.name());
        std::fs::write(&path, automaton.to_string())
            .with_context(|| format!("failed to write Liana file '{}'", path.display()))?;
        info!(target: "liana", "written automaton '{}' to '{}'", automaton.name(), path.display());
        written.push(path);
    }
    Ok(written)
}
