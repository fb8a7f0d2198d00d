//! Collaborator interfaces for the quantum-chemistry backend.
//!
//! The workflow never performs numerics itself. Everything it needs from an engine
//! is expressed through the traits below; a single backend type usually implements
//! all of them and is then usable wherever a [`QuantumEngine`] is expected.

use super::cache::EvaluationCache;
use crate::core::models::molecule::Molecule;
use crate::core::options::Options;
use crate::core::results::ResultTable;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("Iterative solver did not converge within {iterations} iterations (threshold {threshold:e})")]
    NotConverged { iterations: usize, threshold: f64 },

    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasisRole {
    Orbital,
    RiFit,
}

impl BasisRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasisRole::Orbital => "ORBITAL",
            BasisRole::RiFit => "RIFIT",
        }
    }
}

/// Descriptor of a basis set built by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisSet {
    pub name: String,
    pub role: BasisRole,
    pub nbf: usize,
}

/// Opaque handle to a backend-owned JK (Coulomb/exchange) object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JkHandle(u64);

impl JkHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Result of a single sub-calculation. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavefunction {
    label: String,
    energy: f64,
    basis: BasisSet,
    jk: Option<JkHandle>,
}

impl Wavefunction {
    pub fn new(label: &str, energy: f64, basis: BasisSet) -> Self {
        Self {
            label: label.to_string(),
            energy,
            basis,
            jk: None,
        }
    }

    pub fn with_jk(self, jk: JkHandle) -> Self {
        Self {
            jk: Some(jk),
            ..self
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn basis(&self) -> &BasisSet {
        &self.basis
    }

    pub fn jk(&self) -> Option<&JkHandle> {
        self.jk.as_ref()
    }
}

/// Convergence controls handed unchanged to the coupled induction solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InductionControls {
    pub max_iterations: usize,
    pub convergence: f64,
}

pub trait ScfEngine {
    /// Runs a blocking SCF on `molecule` using the current `options`.
    ///
    /// `banner` names the stage for the backend's own output.
    fn run_scf(
        &mut self,
        molecule: &Molecule,
        options: &Options,
        banner: &str,
    ) -> Result<Wavefunction, BackendError>;

    /// Builds a wavefunction shell (basis only, no SCF) for `molecule`.
    fn build_wavefunction(
        &mut self,
        molecule: &Molecule,
        basis: &str,
    ) -> Result<Wavefunction, BackendError>;
}

/// Scratch storage whose cached intermediates are partitioned by namespace.
pub trait IntermediateStore {
    fn set_default_namespace(&mut self, namespace: &str);

    /// Relabels the data held in file `unit` from namespace `old` to `new`.
    ///
    /// Must be idempotent when the data already lives under `new`.
    fn change_file_namespace(&mut self, unit: u32, old: &str, new: &str);
}

pub trait BasisBuilder {
    /// Builds an auxiliary basis for `molecule`.
    ///
    /// `key` names the basis option, `target` is its current value (possibly empty, in
    /// which case the backend derives a default from `primary`).
    fn build_auxiliary_basis(
        &mut self,
        molecule: &Molecule,
        key: &str,
        target: &str,
        role: BasisRole,
        primary: &str,
    ) -> Result<BasisSet, BackendError>;
}

/// Energy-term evaluators and the cache they share.
pub trait SaptTerms {
    fn build_cache(
        &mut self,
        monomer_a: &Wavefunction,
        monomer_b: &Wavefunction,
        jk: &JkHandle,
    ) -> Result<EvaluationCache, BackendError>;

    fn electrostatics(&mut self, cache: &EvaluationCache) -> Result<ResultTable, BackendError>;

    fn exchange(
        &mut self,
        cache: &EvaluationCache,
        jk: &JkHandle,
    ) -> Result<ResultTable, BackendError>;

    /// Coupled induction. Must return [`BackendError::NotConverged`] when the iteration
    /// budget is exhausted.
    fn induction(
        &mut self,
        cache: &EvaluationCache,
        jk: &JkHandle,
        controls: InductionControls,
    ) -> Result<ResultTable, BackendError>;

    fn fdds_dispersion(
        &mut self,
        primary: &BasisSet,
        auxiliary: &BasisSet,
        cache: &EvaluationCache,
    ) -> Result<ResultTable, BackendError>;

    fn mp2_fisapt_dispersion(
        &mut self,
        monomer_a: &Wavefunction,
        primary: &BasisSet,
        auxiliary: &BasisSet,
        cache: &EvaluationCache,
    ) -> Result<ResultTable, BackendError>;

    fn mp2_sapt_dispersion(
        &mut self,
        dimer: &Wavefunction,
        monomer_a: &Wavefunction,
        monomer_b: &Wavefunction,
        primary: &BasisSet,
        auxiliary: &BasisSet,
        cache: &EvaluationCache,
    ) -> Result<ResultTable, BackendError>;
}

/// Everything the SAPT(DFT) workflow needs from a backend.
pub trait QuantumEngine: ScfEngine + IntermediateStore + BasisBuilder + SaptTerms {}

impl<T> QuantumEngine for T where T: ScfEngine + IntermediateStore + BasisBuilder + SaptTerms {}
