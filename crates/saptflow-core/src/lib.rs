//! # SAPTFLOW Core Library
//!
//! Orchestration of SAPT(DFT) intermolecular interaction-energy decompositions for
//! two-fragment systems. The numerics (SCF solver, integral engine, basis sets and the
//! individual energy-term formulas) live behind collaborator traits; this crate owns the
//! control logic that sequences them.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Fragment`), the typed
//!   options store that stands in for process-wide settings, the ordered `ResultTable`, and
//!   the `VariableStore` result sink.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer. It includes the configuration
//!   transaction that restores options on every exit path, the namespace cursor that
//!   retargets cached integrals between monomers, the collaborator traits, the shared
//!   evaluation cache, and the per-stage tasks.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into the complete
//!   SAPT(DFT) procedure.

pub mod core;
pub mod engine;
pub mod workflows;
