//! # Engine Module
//!
//! Stateful control logic of the SAPT(DFT) pipeline. Nothing in here performs numerics;
//! the engine decides what the quantum-chemistry backend computes, in which order, under
//! which configuration, and where the results go.
//!
//! ## Architecture
//!
//! - **Collaborators** ([`backend`]) - Traits the backend implements: SCF, scratch-store
//!   namespaces, auxiliary basis construction and the energy-term evaluators
//! - **Settings** ([`config`]) - Typed view of the options read by a run, plus validation
//! - **Configuration Transaction** ([`transaction`]) - Scoped overrides of the option store,
//!   restored on every exit path
//! - **Namespaces** ([`namespace`]) - Ordered ownership transfer of cached integrals
//!   between the dimer and monomer calculations
//! - **Evaluation Cache** ([`cache`]) - Immutable intermediates shared by every term
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for callers
//! - **Error Handling** ([`error`]) - Validation, convergence and backend failures
//! - **Tasks** ([`tasks`]) - Geometry normalization, stage scheduling, term evaluation and
//!   result aggregation

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod namespace;
pub mod progress;
pub mod tasks;
pub mod transaction;

#[cfg(test)]
pub(crate) mod testing;
