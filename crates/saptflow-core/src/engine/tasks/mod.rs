//! Units of work composed by the SAPT(DFT) workflow.
//!
//! Each submodule owns one step of a run: normalizing the input geometry, scheduling the
//! dimer and monomer sub-calculations of a pass, evaluating the energy terms against a
//! shared cache, and assembling the report.

pub mod aggregate;
pub mod normalize;
pub mod stages;
pub mod terms;
