//! Intermediate model of XTA timed-automata systems,
//! shared by the XTA extractor and the TCK and Liana emitters.
//!
//! A model is defined through a [`XtaModelBuilder`],
//! by adding global declarations and processes.
//! Building it resolves the synchronizations between processes
//! and yields an immutable [`XtaModel`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod expression;
mod model;
mod range;
pub mod sync;

pub use model::*;
pub use range::IntRange;
pub use sync::SyncConstraint;
