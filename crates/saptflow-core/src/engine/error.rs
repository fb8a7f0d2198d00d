use thiserror::Error;

use super::backend::BackendError;
use super::config::ConfigError;
use crate::core::models::molecule::MoleculeError;
use crate::core::options::OptionsError;
use crate::core::results::DuplicateLabelError;

/// Input problems detected before any sub-calculation is started.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ValidationError {
    #[error("SAPT requires active molecule to have 2 fragments, not {found}")]
    FragmentCount { found: usize },

    #[error("SAPT(DFT) currently only supports restricted references, got '{0}'")]
    UnsupportedReference(String),

    #[error(
        "SAPT(DFT) with functional '{functional}' requires both SAPT_DFT_GRAC_SHIFT_A and SAPT_DFT_GRAC_SHIFT_B to be set"
    )]
    MissingGracShift { functional: String },

    #[error("Invalid geometry: {0}")]
    Geometry(#[from] MoleculeError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Option error: {0}")]
    Options(#[from] OptionsError),

    #[error("Failed to restore options after the run: {0}")]
    ConfigRestore(#[source] OptionsError),

    #[error("{term} failed to converge after {iterations} iterations (threshold {threshold:e})")]
    Convergence {
        term: &'static str,
        iterations: usize,
        threshold: f64,
    },

    #[error("Stage '{stage}' failed: {source}")]
    Backend {
        stage: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("Stage '{stage}' did not provide a JK object")]
    MissingCouplingOperator { stage: &'static str },

    #[error("Energy term '{0}' is missing from the evaluator results")]
    MissingTerm(String),

    #[error("Evaluator '{0}' returned no results")]
    EmptyTerm(&'static str),

    #[error("Duplicate result label: {0}")]
    DuplicateLabel(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<DuplicateLabelError> for EngineError {
    fn from(err: DuplicateLabelError) -> Self {
        EngineError::DuplicateLabel(err.0)
    }
}

impl EngineError {
    /// Wraps a collaborator failure for `stage`, keeping non-convergence distinct.
    pub(crate) fn from_backend(stage: &'static str, source: BackendError) -> Self {
        match source {
            BackendError::NotConverged {
                iterations,
                threshold,
            } => EngineError::Convergence {
                term: stage,
                iterations,
                threshold,
            },
            source => EngineError::Backend { stage, source },
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_backend_maps_non_convergence() {
        let err = EngineError::from_backend(
            "induction",
            BackendError::NotConverged {
                iterations: 50,
                threshold: 1e-8,
            },
        );
        assert!(matches!(
            err,
            EngineError::Convergence {
                term: "induction",
                iterations: 50,
                ..
            }
        ));
    }

    #[test]
    fn from_backend_keeps_other_failures_with_stage() {
        let err = EngineError::from_backend("exchange", BackendError::Failed("disk full".into()));
        assert_eq!(err.to_string(), "Stage 'exchange' failed: disk full");
    }

    #[test]
    fn validation_messages_name_the_problem() {
        let err = EngineError::from(ValidationError::FragmentCount { found: 3 });
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation failed: SAPT requires active molecule to have 2 fragments, not 3"
        );
    }
}
