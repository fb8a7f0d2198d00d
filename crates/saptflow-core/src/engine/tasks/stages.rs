use super::normalize::NormalizedDimer;
use crate::core::models::molecule::Molecule;
use crate::core::options::Options;
use crate::engine::backend::{QuantumEngine, Wavefunction};
use crate::engine::config::SaptSettings;
use crate::engine::error::EngineError;
use crate::engine::namespace::{Namespace, NamespaceCursor};
use crate::engine::progress::{Progress, ProgressReporter};
use std::fmt;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Auxiliary Hartree-Fock pass used for the delta-HF correction.
    DeltaHf,
    /// The DFT pass whose monomers define the SAPT(DFT) terms.
    Primary,
}

impl PassKind {
    pub fn name(&self) -> &'static str {
        match self {
            PassKind::DeltaHf => "delta HF",
            PassKind::Primary => "primary",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PassState {
    Init,
    DimerDone,
    MonomerADone,
    MonomerBDone,
    TermsEvaluated,
}

impl PassState {
    fn next(&self) -> Option<PassState> {
        match self {
            PassState::Init => Some(PassState::DimerDone),
            PassState::DimerDone => Some(PassState::MonomerADone),
            PassState::MonomerADone => Some(PassState::MonomerBDone),
            PassState::MonomerBDone => Some(PassState::TermsEvaluated),
            PassState::TermsEvaluated => None,
        }
    }
}

/// Forward-only state of one computation pass.
#[derive(Debug)]
pub struct PassTracker {
    kind: PassKind,
    state: PassState,
}

impl PassTracker {
    pub fn new(kind: PassKind) -> Self {
        Self {
            kind,
            state: PassState::Init,
        }
    }

    pub fn kind(&self) -> PassKind {
        self.kind
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    pub fn advance(&mut self, to: PassState) -> Result<(), EngineError> {
        if self.state.next() != Some(to) {
            return Err(EngineError::Internal(format!(
                "{} pass cannot move from {:?} to {:?}",
                self.kind, self.state, to
            )));
        }
        self.state = to;
        Ok(())
    }
}

/// The three wavefunctions produced by one pass.
#[derive(Debug, Clone)]
pub struct PassWavefunctions {
    pub dimer: Wavefunction,
    pub monomer_a: Wavefunction,
    pub monomer_b: Wavefunction,
}

const HF_DIMER_BANNER: &str = "SAPT(DFT): delta HF Dimer";
const HF_MONOMER_A_BANNER: &str = "SAPT(DFT): delta HF Monomer A";
const HF_MONOMER_B_BANNER: &str = "SAPT(DFT): delta HF Monomer B";
const DFT_DIMER_BANNER: &str = "SAPT(DFT): Dimer Reference";
const DFT_MONOMER_A_BANNER: &str = "SAPT(DFT): DFT Monomer A";
const DFT_MONOMER_B_BANNER: &str = "SAPT(DFT): DFT Monomer B";

/// Runs the sub-calculations of each pass in their fixed order.
///
/// The scheduler is the only component that moves the namespace cursor, so the cached
/// integrals always belong to the molecule about to be computed.
pub struct StageScheduler<'e, 'r, E>
where
    E: QuantumEngine + ?Sized,
{
    engine: &'e mut E,
    cursor: NamespaceCursor,
    reporter: &'r ProgressReporter<'r>,
}

impl<'e, 'r, E> StageScheduler<'e, 'r, E>
where
    E: QuantumEngine + ?Sized,
{
    pub fn new(engine: &'e mut E, reporter: &'r ProgressReporter<'r>, density_fitted: bool) -> Self {
        let cursor = NamespaceCursor::start(engine, density_fitted);
        Self {
            engine,
            cursor,
            reporter,
        }
    }

    pub fn engine(&mut self) -> &mut E {
        &mut *self.engine
    }

    pub fn namespace(&self) -> Namespace {
        self.cursor.current()
    }

    /// Hartree-Fock dimer and monomers, leaving the integrals back in the dimer namespace.
    #[instrument(skip_all, name = "delta_hf_stages")]
    pub fn run_reference_pass(
        &mut self,
        options: &Options,
        geometry: &NormalizedDimer,
        tracker: &mut PassTracker,
    ) -> Result<PassWavefunctions, EngineError> {
        self.reporter.report(Progress::PassStart {
            name: tracker.kind().name(),
        });
        let dimer = self.scf(&geometry.dimer, options, HF_DIMER_BANNER)?;
        tracker.advance(PassState::DimerDone)?;

        self.cursor.advance(&mut *self.engine, Namespace::MonomerA)?;
        let monomer_a = self.scf(&geometry.monomer_a, options, HF_MONOMER_A_BANNER)?;
        tracker.advance(PassState::MonomerADone)?;

        self.cursor.advance(&mut *self.engine, Namespace::MonomerB)?;
        let monomer_b = self.scf(&geometry.monomer_b, options, HF_MONOMER_B_BANNER)?;
        tracker.advance(PassState::MonomerBDone)?;

        self.cursor.advance(&mut *self.engine, Namespace::Dimer)?;

        Ok(PassWavefunctions {
            dimer,
            monomer_a,
            monomer_b,
        })
    }

    /// DFT monomers with their GRAC shifts; the dimer is taken from `dimer_reference` or
    /// built without an SCF.
    #[instrument(skip_all, name = "dft_stages")]
    pub fn run_primary_pass(
        &mut self,
        options: &mut Options,
        settings: &SaptSettings,
        geometry: &NormalizedDimer,
        dimer_reference: Option<Wavefunction>,
        tracker: &mut PassTracker,
    ) -> Result<PassWavefunctions, EngineError> {
        self.reporter.report(Progress::PassStart {
            name: tracker.kind().name(),
        });
        let dimer = match dimer_reference {
            Some(wfn) => wfn,
            None => {
                self.reporter.report(Progress::PhaseStart {
                    name: DFT_DIMER_BANNER,
                });
                let wfn = self
                    .engine
                    .build_wavefunction(&geometry.dimer, &settings.basis)
                    .map_err(|e| EngineError::from_backend("dimer_wavefunction", e))?;
                self.reporter.report(Progress::PhaseFinish);
                wfn
            }
        };
        tracker.advance(PassState::DimerDone)?;

        options.set_global("DFT_FUNCTIONAL", settings.functional.as_str())?;
        options.set_local("SCF", "REFERENCE", "RKS")?;

        self.cursor.advance(&mut *self.engine, Namespace::MonomerA)?;
        let monomer_a = self.dft_monomer(
            options,
            &geometry.monomer_a,
            settings.grac_shift_a,
            DFT_MONOMER_A_BANNER,
        )?;
        tracker.advance(PassState::MonomerADone)?;

        self.cursor.advance(&mut *self.engine, Namespace::MonomerB)?;
        let monomer_b = self.dft_monomer(
            options,
            &geometry.monomer_b,
            settings.grac_shift_b,
            DFT_MONOMER_B_BANNER,
        )?;
        tracker.advance(PassState::MonomerBDone)?;

        Ok(PassWavefunctions {
            dimer,
            monomer_a,
            monomer_b,
        })
    }

    /// Applies `grac_shift` for one monomer SCF and always resets it to zero afterwards.
    fn dft_monomer(
        &mut self,
        options: &mut Options,
        molecule: &Molecule,
        grac_shift: f64,
        banner: &'static str,
    ) -> Result<Wavefunction, EngineError> {
        if grac_shift != 0.0 {
            options.set_global("DFT_GRAC_SHIFT", grac_shift)?;
        }
        self.cursor.activate(&mut *self.engine);

        let outcome = self.scf(molecule, options, banner);
        let reset = options.set_global("DFT_GRAC_SHIFT", 0.0);

        let wfn = outcome?;
        reset?;
        Ok(wfn)
    }

    fn scf(
        &mut self,
        molecule: &Molecule,
        options: &Options,
        banner: &'static str,
    ) -> Result<Wavefunction, EngineError> {
        self.reporter.report(Progress::PhaseStart { name: banner });
        let wfn = self
            .engine
            .run_scf(molecule, options, banner)
            .map_err(|e| EngineError::from_backend(banner, e))?;
        info!(stage = banner, energy = wfn.energy(), "Sub-calculation finished.");
        self.reporter.report(Progress::PhaseFinish);
        Ok(wfn)
    }
}
