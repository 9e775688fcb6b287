use super::{
    Channel, Constant, Location, ModelError, Process, ProcessId, Transition, Variable, XtaModel,
};
use crate::sync;
use log::{debug, info};

/// The object used to define and build an [`XtaModel`].
///
/// Redeclaring a constant, global variable or location replaces the previous
/// declaration but keeps its position.
#[derive(Debug, Default, Clone)]
pub struct XtaModelBuilder {
    constants: Vec<Constant>,
    clocks: Vec<String>,
    variables: Vec<Variable>,
    channels: Vec<Channel>,
    processes: Vec<Process>,
    instances: Vec<String>,
}

impl XtaModelBuilder {
    /// Create a new [`XtaModelBuilder`].
    /// At creation, this will be completely empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constant to the model.
    pub fn new_constant(&mut self, name: &str, value: &str) {
        let constant = Constant {
            name: name.to_owned(),
            value: value.trim().to_owned(),
        };
        if let Some(prev) = self.constants.iter_mut().find(|c| c.name == name) {
            debug!("constant '{name}' redeclared");
            *prev = constant;
        } else {
            self.constants.push(constant);
        }
    }

    /// Adds a global clock to the model.
    /// Clocks declared more than once are only added the first time.
    pub fn new_global_clock(&mut self, name: &str) {
        if self.clocks.iter().any(|c| c == name) {
            debug!("global clock '{name}' redeclared");
        } else {
            self.clocks.push(name.to_owned());
        }
    }

    /// Adds a global variable to the model.
    pub fn new_global_var(&mut self, var: Variable) {
        if let Some(prev) = self.variables.iter_mut().find(|v| v.name == var.name) {
            debug!("global variable '{}' redeclared", var.name);
            *prev = var;
        } else {
            self.variables.push(var);
        }
    }

    /// Adds a channel to the model.
    pub fn new_channel(&mut self, channel: Channel) {
        if let Some(prev) = self.channels.iter_mut().find(|c| c.name == channel.name) {
            *prev = channel;
        } else {
            self.channels.push(channel);
        }
    }

    /// Adds a name to the `system` instance list.
    pub fn new_instance(&mut self, name: &str) {
        self.instances.push(name.to_owned());
    }

    /// Adds a new, empty process to the model.
    ///
    /// It fails if a process with the same name already exists.
    pub fn new_process(&mut self, name: &str) -> Result<ProcessId, ModelError> {
        if self.processes.iter().any(|p| p.name == name) {
            return Err(ModelError::DuplicateProcess(name.to_owned()));
        }
        let process_id = ProcessId(self.processes.len());
        self.processes.push(Process::new(name.to_owned()));
        Ok(process_id)
    }

    fn process_mut(&mut self, process_id: ProcessId) -> Result<&mut Process, ModelError> {
        self.processes
            .get_mut(process_id.0)
            .ok_or(ModelError::MissingProcess(process_id))
    }

    /// Adds a local clock to the given process.
    ///
    /// It fails if the model contains no such process,
    /// or if the process already declares the clock.
    pub fn new_clock(&mut self, process_id: ProcessId, name: &str) -> Result<(), ModelError> {
        let process = self.process_mut(process_id)?;
        if process.is_clock(name) {
            return Err(ModelError::DuplicateClock(process_id, name.to_owned()));
        }
        process.clocks.push(name.to_owned());
        Ok(())
    }

    /// Adds a local variable to the given process.
    ///
    /// It fails if the model contains no such process,
    /// or if the process already declares the variable.
    pub fn new_var(&mut self, process_id: ProcessId, var: Variable) -> Result<(), ModelError> {
        let process = self.process_mut(process_id)?;
        if process.variables.iter().any(|v| v.name == var.name) {
            return Err(ModelError::DuplicateVar(process_id, var.name));
        }
        process.variables.push(var);
        Ok(())
    }

    /// Adds a location to the given process.
    /// A location that is already there gets the new invariant.
    ///
    /// It fails if the model contains no such process.
    pub fn new_location(
        &mut self,
        process_id: ProcessId,
        name: &str,
        invariant: Option<&str>,
    ) -> Result<(), ModelError> {
        let process = self.process_mut(process_id)?;
        let location = Location {
            name: name.to_owned(),
            invariant: invariant.map(|inv| inv.trim().to_owned()),
        };
        if let Some(prev) = process.locations.iter_mut().find(|l| l.name == name) {
            *prev = location;
        } else {
            process.locations.push(location);
        }
        Ok(())
    }

    /// Sets the initial location of the given process.
    ///
    /// It fails if the model contains no such process.
    pub fn set_initial(&mut self, process_id: ProcessId, name: &str) -> Result<(), ModelError> {
        self.process_mut(process_id)?.initial = Some(name.to_owned());
        Ok(())
    }

    /// Marks a location of the given process as urgent.
    ///
    /// It fails if the model contains no such process.
    pub fn add_urgent(&mut self, process_id: ProcessId, name: &str) -> Result<(), ModelError> {
        self.process_mut(process_id)?
            .urgent
            .insert(name.to_owned());
        Ok(())
    }

    /// Adds a transition to the given process.
    /// Source and target are not required to be declared locations.
    ///
    /// It fails if the model contains no such process.
    pub fn add_transition(
        &mut self,
        process_id: ProcessId,
        transition: Transition,
    ) -> Result<(), ModelError> {
        self.process_mut(process_id)?.transitions.push(transition);
        Ok(())
    }

    /// Produces an [`XtaModel`], resolving the synchronizations among its processes.
    pub fn build(self) -> XtaModel {
        let synchronizations = sync::resolve(&self.processes);
        info!(
            "model built with {} processes and {} synchronizations",
            self.processes.len(),
            synchronizations.len()
        );
        XtaModel {
            constants: self.constants,
            clocks: self.clocks,
            variables: self.variables,
            channels: self.channels,
            processes: self.processes,
            instances: self.instances,
            synchronizations,
        }
    }
}
