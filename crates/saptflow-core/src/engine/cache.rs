use super::backend::BackendError;
use nalgebra::DMatrix;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CacheError {
    #[error("Cache entry '{0}' was already inserted")]
    DuplicateKey(String),

    #[error("Cache entry '{0}' is not present")]
    MissingKey(String),
}

impl From<CacheError> for BackendError {
    fn from(err: CacheError) -> Self {
        BackendError::Failed(err.to_string())
    }
}

/// Quantities shared by every energy-term evaluator of one pass.
///
/// Built once from the two monomer wavefunctions and the JK object (orbital
/// coefficients, densities, potentials, overlap, ...), then only ever borrowed.
/// The type has no mutating methods; construction goes through [`CacheBuilder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationCache {
    matrices: HashMap<String, DMatrix<f64>>,
    scalars: HashMap<String, f64>,
}

impl EvaluationCache {
    pub fn builder() -> CacheBuilder {
        CacheBuilder::default()
    }

    pub fn matrix(&self, key: &str) -> Option<&DMatrix<f64>> {
        self.matrices.get(key)
    }

    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.scalars.get(key).copied()
    }

    /// Like [`EvaluationCache::matrix`], but a missing entry is an error.
    pub fn require_matrix(&self, key: &str) -> Result<&DMatrix<f64>, CacheError> {
        self.matrix(key)
            .ok_or_else(|| CacheError::MissingKey(key.to_string()))
    }

    pub fn require_scalar(&self, key: &str) -> Result<f64, CacheError> {
        self.scalar(key)
            .ok_or_else(|| CacheError::MissingKey(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.matrices.len() + self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append-only construction of an [`EvaluationCache`].
#[derive(Debug, Default)]
pub struct CacheBuilder {
    cache: EvaluationCache,
}

impl CacheBuilder {
    pub fn insert_matrix(&mut self, key: &str, matrix: DMatrix<f64>) -> Result<(), CacheError> {
        if self.cache.matrices.contains_key(key) || self.cache.scalars.contains_key(key) {
            return Err(CacheError::DuplicateKey(key.to_string()));
        }
        self.cache.matrices.insert(key.to_string(), matrix);
        Ok(())
    }

    pub fn insert_scalar(&mut self, key: &str, value: f64) -> Result<(), CacheError> {
        if self.cache.matrices.contains_key(key) || self.cache.scalars.contains_key(key) {
            return Err(CacheError::DuplicateKey(key.to_string()));
        }
        self.cache.scalars.insert(key.to_string(), value);
        Ok(())
    }

    pub fn build(self) -> EvaluationCache {
        self.cache
    }
}
