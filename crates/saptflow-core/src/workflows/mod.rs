//! # Workflows Module
//!
//! High-level entry points that run a complete procedure against a backend.
//!
//! - **SAPT(DFT)** ([`sapt_dft`]) - Optional delta-HF reference pass followed by the DFT
//!   pass, with every option override restored and the report published to a
//!   [`VariableStore`](crate::core::variables::VariableStore) only when the whole run
//!   succeeds.

pub mod sapt_dft;
