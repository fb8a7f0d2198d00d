//! # Core Models Module
//!
//! Data structures used to describe the molecular systems handed to the SAPT pipeline.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom with element, coordinates and ghost flag
//! - [`elements`] - Static element table (atomic masses)
//! - [`ids`] - Unique identifier types for atoms
//! - [`molecule`] - Fragmented molecule with point group and frame constraints
//! - [`point_group`] - Abelian point groups recognised by the pipeline
//!
//! ## Usage
//!
//! ```ignore
//! use saptflow::core::models::{atom::Atom, molecule::Molecule};
//!
//! let mut dimer = Molecule::new("water dimer");
//! dimer.add_fragment(0, 1, vec![Atom::new("O", Point3::new(0.0, 0.0, 0.0))]);
//! dimer.add_fragment(0, 1, vec![Atom::new("O", Point3::new(0.0, 0.0, 2.9))]);
//! let monomer_a = dimer.extract_subsets(&[0], &[1])?;
//! ```

pub mod atom;
pub mod elements;
pub mod ids;
pub mod molecule;
pub mod point_group;
