use super::backend::InductionControls;
use super::error::ValidationError;
use crate::core::options::{Options, OptionsError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Options(#[from] OptionsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Rhf,
    Uhf,
    Rohf,
    Cuhf,
    Rks,
    Uks,
}

impl FromStr for Reference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RHF" => Ok(Reference::Rhf),
            "UHF" => Ok(Reference::Uhf),
            "ROHF" => Ok(Reference::Rohf),
            "CUHF" => Ok(Reference::Cuhf),
            "RKS" => Ok(Reference::Rks),
            "UKS" => Ok(Reference::Uks),
            _ => Err(ConfigError::InvalidValue {
                key: "REFERENCE",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reference::Rhf => "RHF",
            Reference::Uhf => "UHF",
            Reference::Rohf => "ROHF",
            Reference::Cuhf => "CUHF",
            Reference::Rks => "RKS",
            Reference::Uks => "UKS",
        };
        f.write_str(name)
    }
}

/// Which MP2-like dispersion evaluator runs after the FDDS dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispersionAlgorithm {
    /// Monomer-only formulation; does not need the dimer wavefunction.
    Fisapt,
    /// Formulation that also consumes the dimer wavefunction.
    #[default]
    Sapt,
}

impl FromStr for DispersionAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FISAPT" => Ok(DispersionAlgorithm::Fisapt),
            "SAPT" => Ok(DispersionAlgorithm::Sapt),
            _ => Err(ConfigError::InvalidValue {
                key: "SAPT_DFT_MP2_DISP_ALG",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DispersionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispersionAlgorithm::Fisapt => f.write_str("FISAPT"),
            DispersionAlgorithm::Sapt => f.write_str("SAPT"),
        }
    }
}

/// Typed view of the options read by the SAPT(DFT) workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct SaptSettings {
    pub functional: String,
    pub grac_shift_a: f64,
    pub grac_shift_b: f64,
    pub do_delta_hf: bool,
    pub dispersion: DispersionAlgorithm,
    pub scf_type: String,
    pub reference: Reference,
    pub induction: InductionControls,
    pub basis: String,
    pub df_basis_mp2: String,
}

impl SaptSettings {
    /// Reads every setting as seen by the `SAPT`, `SCF` and `DFMP2` modules.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let max_iterations = options.get_i64("SAPT", "MAXITER")?;
        let max_iterations =
            usize::try_from(max_iterations).map_err(|_| ConfigError::InvalidValue {
                key: "MAXITER",
                value: max_iterations.to_string(),
            })?;
        let convergence = options.get_f64("SAPT", "D_CONVERGENCE")?;
        if convergence <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "D_CONVERGENCE",
                value: convergence.to_string(),
            });
        }

        Ok(Self {
            functional: options.get_str("SAPT", "SAPT_DFT_FUNCTIONAL")?.to_string(),
            grac_shift_a: options.get_f64("SAPT", "SAPT_DFT_GRAC_SHIFT_A")?,
            grac_shift_b: options.get_f64("SAPT", "SAPT_DFT_GRAC_SHIFT_B")?,
            do_delta_hf: options.get_bool("SAPT", "SAPT_DFT_DO_DHF")?,
            dispersion: options.get_str("SAPT", "SAPT_DFT_MP2_DISP_ALG")?.parse()?,
            scf_type: options.get_str("SCF", "SCF_TYPE")?.to_string(),
            reference: options.get_str("SCF", "REFERENCE")?.parse()?,
            induction: InductionControls {
                max_iterations,
                convergence,
            },
            basis: options.get_global_str("BASIS")?.to_string(),
            df_basis_mp2: options.get_str("DFMP2", "DF_BASIS_MP2")?.to_string(),
        })
    }

    /// Whether integrals are density fitted, which makes them reusable across stages.
    pub fn density_fitted(&self) -> bool {
        self.scf_type == "DF"
    }

    /// Gates checked before any sub-calculation runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.functional != "HF" && (self.grac_shift_a == 0.0 || self.grac_shift_b == 0.0) {
            return Err(ValidationError::MissingGracShift {
                functional: self.functional.clone(),
            });
        }
        if self.reference != Reference::Rhf {
            return Err(ValidationError::UnsupportedReference(
                self.reference.to_string(),
            ));
        }
        Ok(())
    }

    /// The orbital basis is only needed once the input passed validation.
    pub fn require_basis(&self) -> Result<&str, ConfigError> {
        if self.basis.is_empty() {
            return Err(ConfigError::MissingParameter("BASIS"));
        }
        Ok(&self.basis)
    }

    /// Sub-calculations the run will perform, in execution order.
    pub fn required_computations(&self) -> Vec<&'static str> {
        let mut computations = Vec::new();
        if self.do_delta_hf {
            computations.extend(["HF  (Dimer)", "HF  (Monomer A)", "HF  (Monomer B)"]);
        }
        computations.extend(["DFT (Monomer A)", "DFT (Monomer B)"]);
        computations
    }
}
