//! # Core Module
//!
//! Fundamental building blocks shared by every layer of SAPTFLOW.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, fragments, point groups and the
//!   composite molecule with its subset extraction.
//! - **Settings** ([`options`]) - Typed, module-scoped option store with change tracking.
//! - **Results** ([`results`]) - Ordered, append-only tables of labeled energies.
//! - **Result Sink** ([`variables`]) - Named-variable store that downstream consumers read.

pub mod models;
pub mod options;
pub mod results;
pub mod variables;
