use super::backend::IntermediateStore;
use super::error::EngineError;
use std::fmt;
use tracing::debug;

/// Scratch file holding the density-fitted three-index integrals.
pub const DF_INTEGRALS_UNIT: u32 = 97;

/// Logical owner of the cached intermediates in the backend's scratch store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Dimer,
    MonomerA,
    MonomerB,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Dimer => "dimer",
            Namespace::MonomerA => "monomerA",
            Namespace::MonomerB => "monomerB",
        }
    }

    /// The only namespace that may follow `self`.
    pub fn successor(&self) -> Namespace {
        match self {
            Namespace::Dimer => Namespace::MonomerA,
            Namespace::MonomerA => Namespace::MonomerB,
            Namespace::MonomerB => Namespace::Dimer,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks which namespace currently owns the cached integrals.
///
/// Transitions follow dimer -> monomerA -> monomerB -> dimer and nothing else. The
/// integral file is only relabelled when integrals are density fitted; otherwise there is
/// nothing reusable to hand over and only the token moves.
#[derive(Debug)]
pub struct NamespaceCursor {
    current: Namespace,
    relabel_integrals: bool,
}

impl NamespaceCursor {
    /// Starts at the dimer namespace and makes it the store's default.
    pub fn start<S>(store: &mut S, relabel_integrals: bool) -> Self
    where
        S: IntermediateStore + ?Sized,
    {
        store.set_default_namespace(Namespace::Dimer.as_str());
        Self {
            current: Namespace::Dimer,
            relabel_integrals,
        }
    }

    pub fn current(&self) -> Namespace {
        self.current
    }

    /// Moves the cached integrals to `next`.
    pub fn advance<S>(&mut self, store: &mut S, next: Namespace) -> Result<(), EngineError>
    where
        S: IntermediateStore + ?Sized,
    {
        if next != self.current.successor() {
            return Err(EngineError::Internal(format!(
                "Illegal namespace transition {} -> {}",
                self.current, next
            )));
        }

        if self.relabel_integrals {
            store.change_file_namespace(DF_INTEGRALS_UNIT, self.current.as_str(), next.as_str());
        }
        debug!(from = %self.current, to = %next, relabelled = self.relabel_integrals, "Namespace advanced.");
        self.current = next;
        Ok(())
    }

    /// Makes the current namespace the default for newly written scratch data.
    pub fn activate<S>(&self, store: &mut S)
    where
        S: IntermediateStore + ?Sized,
    {
        store.set_default_namespace(self.current.as_str());
    }
}
