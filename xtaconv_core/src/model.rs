//! Implementation of the intermediate model.
//!
//! An [`XtaModel`] is made of file-scope declarations
//! (constants, clocks, variables and channels)
//! and of [`Process`]es, each one with its own clocks, variables,
//! locations and transitions.
//! Names declared inside a process shadow file-scope names with the same text.

mod builder;

pub use builder::XtaModelBuilder;

use crate::sync::SyncConstraint;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

// Use of "Newtype" pattern to define different types of indexes.
/// The index of a process in a model under construction.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ProcessId(usize);

/// The error type for operations with [`XtaModelBuilder`]s.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// There is no such process.
    #[error("process {0:?} does not belong to the model")]
    MissingProcess(ProcessId),
    /// A process with the same name has already been defined.
    #[error("process `{0}` is already defined")]
    DuplicateProcess(String),
    /// The clock has already been declared by the process.
    #[error("clock `{1}` is already declared in process {0:?}")]
    DuplicateClock(ProcessId, String),
    /// The variable has already been declared by the process.
    #[error("variable `{1}` is already declared in process {0:?}")]
    DuplicateVar(ProcessId, String),
}

/// A named constant, declared as `const int NAME = VALUE;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    /// The constant's name.
    pub name: String,
    /// The constant's value, as written in the source.
    pub value: String,
}

impl Constant {
    /// The value of the constant, if it is an integer literal.
    pub fn integer_value(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }
}

/// Looks up the integer value of the named constant.
pub fn integer_constant(constants: &[Constant], name: &str) -> Option<i64> {
    constants
        .iter()
        .find(|c| c.name == name)
        .and_then(Constant::integer_value)
}

/// The type of a (global or local) variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    /// Boolean variable.
    Bool,
    /// Integer variable, with the optional `[lo, hi]` range as written in the source.
    Int {
        /// Lower and upper bounds, if declared.
        bounds: Option<(String, String)>,
    },
}

/// A variable declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// The variable's name.
    pub name: String,
    /// The variable's type.
    pub var_type: VarType,
    /// The initializer, as written in the source.
    pub init: Option<String>,
}

/// A synchronization channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// The channel's name.
    pub name: String,
    /// Declared as `urgent chan`.
    pub urgent: bool,
    /// Declared as `broadcast chan`.
    pub broadcast: bool,
}

/// A location of a process, with its optional invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// The location's name.
    pub name: String,
    /// The invariant expression, as written in the source.
    pub invariant: Option<String>,
}

/// Direction of a synchronization.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `chan!`
    Send,
    /// `chan?`
    Receive,
}

impl Direction {
    /// Parses the direction marker (`!` or `?`).
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '!' => Some(Direction::Send),
            '?' => Some(Direction::Receive),
            _ => None,
        }
    }

    /// The direction marker.
    pub fn marker(self) -> char {
        match self {
            Direction::Send => '!',
            Direction::Receive => '?',
        }
    }
}

/// The synchronization label of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sync {
    /// Name of the channel.
    pub channel: String,
    /// Send or receive.
    pub direction: Direction,
}

impl fmt::Display for Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.channel, self.direction.marker())
    }
}

/// A transition `source -> target { guard ...; sync ...; assign ...; }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Source location.
    pub source: String,
    /// Target location.
    pub target: String,
    /// Guard expression, as written in the source.
    pub guard: Option<String>,
    /// Synchronization label.
    pub sync: Option<Sync>,
    /// Comma-separated assignments, as written in the source.
    pub assign: Option<String>,
}

/// A process (a single timed automaton).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    name: String,
    clocks: Vec<String>,
    variables: Vec<Variable>,
    locations: Vec<Location>,
    initial: Option<String>,
    urgent: BTreeSet<String>,
    transitions: Vec<Transition>,
}

impl Process {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            clocks: Vec::new(),
            variables: Vec::new(),
            locations: Vec::new(),
            initial: None,
            urgent: BTreeSet::new(),
            transitions: Vec::new(),
        }
    }

    /// The process' name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The clocks declared by the process.
    pub fn clocks(&self) -> &[String] {
        &self.clocks
    }

    /// The variables declared by the process.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The locations, in declaration order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The initial location, if one was given.
    pub fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// Whether `location` is the initial location.
    pub fn is_initial(&self, location: &str) -> bool {
        self.initial.as_deref() == Some(location)
    }

    /// The urgent locations.
    pub fn urgent(&self) -> &BTreeSet<String> {
        &self.urgent
    }

    /// Whether `location` is urgent.
    pub fn is_urgent(&self, location: &str) -> bool {
        self.urgent.contains(location)
    }

    /// The transitions, in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Whether the process declares a clock with the given name.
    pub fn is_clock(&self, name: &str) -> bool {
        self.clocks.iter().any(|c| c == name)
    }

    /// Whether the name refers to a clock or variable declared by the process.
    pub fn is_local(&self, name: &str) -> bool {
        self.is_clock(name) || self.variables.iter().any(|v| v.name == name)
    }

    /// The name of a local clock or variable, qualified by the process' name.
    pub fn qualified(&self, name: &str) -> String {
        format!("{}_{}", self.name, name)
    }

    /// The channels the process synchronizes on.
    pub fn channels(&self) -> BTreeSet<&str> {
        self.transitions
            .iter()
            .filter_map(|t| t.sync.as_ref())
            .map(|sync| sync.channel.as_str())
            .collect()
    }
}

/// The intermediate model of an XTA file.
///
/// It can only be obtained from a [`XtaModelBuilder`],
/// and it can no longer be altered once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XtaModel {
    constants: Vec<Constant>,
    clocks: Vec<String>,
    variables: Vec<Variable>,
    channels: Vec<Channel>,
    processes: Vec<Process>,
    instances: Vec<String>,
    synchronizations: Vec<SyncConstraint>,
}

impl XtaModel {
    /// The constants, in declaration order.
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// The global clocks.
    pub fn clocks(&self) -> &[String] {
        &self.clocks
    }

    /// The global variables.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The declared channels.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// The processes, in file order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Gets a process by name.
    pub fn process(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name == name)
    }

    /// The names listed in the `system` declaration.
    pub fn instances(&self) -> &[String] {
        &self.instances
    }

    /// The synchronization constraints among processes,
    /// sorted by channel, sender and receiver.
    pub fn synchronizations(&self) -> &[SyncConstraint] {
        &self.synchronizations
    }

    /// The channels used by some transition, sorted and without duplicates.
    pub fn events(&self) -> BTreeSet<&str> {
        self.processes.iter().flat_map(Process::channels).collect()
    }

    /// Whether `name` is a global clock.
    pub fn is_global_clock(&self, name: &str) -> bool {
        self.clocks.iter().any(|c| c == name)
    }
}
