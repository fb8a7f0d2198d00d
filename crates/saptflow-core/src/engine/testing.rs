//! Recording backend used by the unit tests of the engine and workflow layers.

use super::backend::{
    BackendError, BasisBuilder, BasisRole, BasisSet, InductionControls, IntermediateStore,
    JkHandle, SaptTerms, ScfEngine, Wavefunction,
};
use super::cache::EvaluationCache;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::options::Options;
use crate::core::results::ResultTable;
use nalgebra::{DMatrix, Point3};

pub(crate) const TEST_BASIS: &str = "jun-cc-pvdz";

/// Water dimer split into donor and acceptor fragments.
pub(crate) fn test_dimer() -> Molecule {
    let mut molecule = Molecule::new("water dimer");
    molecule.add_fragment(
        0,
        1,
        vec![
            Atom::new("O", Point3::new(-1.551007, -0.114520, 0.000000)),
            Atom::new("H", Point3::new(-1.934259, 0.762503, 0.000000)),
            Atom::new("H", Point3::new(-0.599677, 0.040712, 0.000000)),
        ],
    );
    molecule.add_fragment(
        0,
        1,
        vec![
            Atom::new("O", Point3::new(1.350625, 0.111469, 0.000000)),
            Atom::new("H", Point3::new(1.680398, -0.373741, -0.758561)),
            Atom::new("H", Point3::new(1.680398, -0.373741, 0.758561)),
        ],
    );
    molecule
}

/// Defaults plus a basis and both GRAC shifts, i.e. a run that passes validation.
pub(crate) fn test_options() -> Options {
    let mut options = Options::sapt_defaults();
    options.set_global("BASIS", TEST_BASIS).unwrap();
    options.set_global("SAVE_JK", true).unwrap();
    options
        .set_local("SAPT", "SAPT_DFT_GRAC_SHIFT_A", 0.203293)
        .unwrap();
    options
        .set_local("SAPT", "SAPT_DFT_GRAC_SHIFT_B", 0.138264)
        .unwrap();
    options
}

/// Backend double that records every call as a string, in order.
///
/// Energies are looked up by molecule name (`monomerA`, `monomerB`, anything else is the
/// dimer) and by method, where a global `DFT_FUNCTIONAL` other than `HF` selects the DFT
/// table. A JK handle is attached only when `SAVE_JK` is on.
#[derive(Debug, Clone)]
pub(crate) struct MockEngine {
    pub calls: Vec<String>,
    pub observed_shifts: Vec<(String, f64)>,
    pub observed_references: Vec<String>,
    pub hf_energies: [f64; 3],
    pub dft_energies: [f64; 3],
    pub fail_on: Option<String>,
    pub induction_diverges: bool,
    pub next_jk: u64,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            observed_shifts: Vec::new(),
            observed_references: Vec::new(),
            hf_energies: [-152.1, -76.02, -76.05],
            dft_energies: [-152.9, -76.4, -76.41],
            fail_on: None,
            induction_diverges: false,
            next_jk: 0,
        }
    }
}

impl MockEngine {
    pub fn failing_on(call: &str) -> Self {
        Self {
            fail_on: Some(call.to_string()),
            ..Self::default()
        }
    }

    /// A wavefunction in the test basis; not recorded as a call.
    pub fn wavefunction(&self, label: &str, energy: f64) -> Wavefunction {
        Wavefunction::new(label, energy, Self::orbital_basis(TEST_BASIS))
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn orbital_basis(name: &str) -> BasisSet {
        BasisSet {
            name: name.to_ascii_uppercase(),
            role: BasisRole::Orbital,
            nbf: 48,
        }
    }

    fn record(&mut self, call: String) -> Result<(), BackendError> {
        let failing = self.fail_on.as_deref() == Some(call.as_str());
        self.calls.push(call);
        if failing {
            return Err(BackendError::Failed(format!(
                "injected failure at '{}'",
                self.calls.last().map(String::as_str).unwrap_or_default()
            )));
        }
        Ok(())
    }

    fn slot(molecule: &Molecule) -> usize {
        match molecule.name() {
            "monomerA" => 1,
            "monomerB" => 2,
            _ => 0,
        }
    }

    fn table(entries: &[(&str, f64)]) -> ResultTable {
        let mut table = ResultTable::new();
        for &(label, value) in entries {
            table.insert(label, value).unwrap();
        }
        table
    }
}

fn option_failure(err: impl std::fmt::Display) -> BackendError {
    BackendError::Failed(err.to_string())
}

impl ScfEngine for MockEngine {
    fn run_scf(
        &mut self,
        molecule: &Molecule,
        options: &Options,
        _banner: &str,
    ) -> Result<Wavefunction, BackendError> {
        self.record(format!("run_scf:{}", molecule.name()))?;

        let functional = options
            .get_global_str("DFT_FUNCTIONAL")
            .map_err(option_failure)?;
        let slot = Self::slot(molecule);
        let energy = if functional == "HF" {
            self.hf_energies[slot]
        } else {
            let shift = options
                .get_f64("SCF", "DFT_GRAC_SHIFT")
                .map_err(option_failure)?;
            self.observed_shifts
                .push((molecule.name().to_string(), shift));
            self.dft_energies[slot]
        };
        let reference = options
            .get_str("SCF", "REFERENCE")
            .map_err(option_failure)?;
        self.observed_references.push(reference.to_string());

        let basis = options.get_global_str("BASIS").map_err(option_failure)?;
        let wfn = Wavefunction::new(molecule.name(), energy, Self::orbital_basis(basis));
        if options.get_bool("SCF", "SAVE_JK").map_err(option_failure)? {
            self.next_jk += 1;
            return Ok(wfn.with_jk(JkHandle::new(self.next_jk)));
        }
        Ok(wfn)
    }

    fn build_wavefunction(
        &mut self,
        molecule: &Molecule,
        basis: &str,
    ) -> Result<Wavefunction, BackendError> {
        self.record(format!("build_wavefunction:{}", molecule.name()))?;
        Ok(Wavefunction::new(
            molecule.name(),
            0.0,
            Self::orbital_basis(basis),
        ))
    }
}

impl IntermediateStore for MockEngine {
    fn set_default_namespace(&mut self, namespace: &str) {
        self.calls.push(format!("default_namespace:{}", namespace));
    }

    fn change_file_namespace(&mut self, unit: u32, old: &str, new: &str) {
        self.calls.push(format!("relabel:{}:{}->{}", unit, old, new));
    }
}

impl BasisBuilder for MockEngine {
    fn build_auxiliary_basis(
        &mut self,
        _molecule: &Molecule,
        key: &str,
        target: &str,
        role: BasisRole,
        primary: &str,
    ) -> Result<BasisSet, BackendError> {
        self.record(format!(
            "auxiliary_basis:{}:{}:{}:{}",
            key,
            target,
            role.as_str(),
            primary
        ))?;
        let name = if target.is_empty() {
            format!("{}-RI", primary)
        } else {
            target.to_string()
        };
        Ok(BasisSet {
            name,
            role,
            nbf: 120,
        })
    }
}

impl SaptTerms for MockEngine {
    fn build_cache(
        &mut self,
        monomer_a: &Wavefunction,
        monomer_b: &Wavefunction,
        jk: &JkHandle,
    ) -> Result<EvaluationCache, BackendError> {
        self.record(format!(
            "build_cache:{}:{}:jk{}",
            monomer_a.label(),
            monomer_b.label(),
            jk.id()
        ))?;
        let mut builder = EvaluationCache::builder();
        builder.insert_matrix("D_A", DMatrix::identity(2, 2))?;
        builder.insert_matrix("D_B", DMatrix::identity(2, 2))?;
        builder.insert_scalar("nuclear_repulsion", 36.66)?;
        Ok(builder.build())
    }

    fn electrostatics(&mut self, cache: &EvaluationCache) -> Result<ResultTable, BackendError> {
        self.record("electrostatics".to_string())?;
        cache.require_matrix("D_A")?;
        Ok(Self::table(&[("Elst10,r", -0.0131)]))
    }

    fn exchange(
        &mut self,
        _cache: &EvaluationCache,
        jk: &JkHandle,
    ) -> Result<ResultTable, BackendError> {
        self.record(format!("exchange:jk{}", jk.id()))?;
        Ok(Self::table(&[("Exch10", 0.0115), ("Exch10(S^2)", 0.0113)]))
    }

    fn induction(
        &mut self,
        _cache: &EvaluationCache,
        jk: &JkHandle,
        controls: InductionControls,
    ) -> Result<ResultTable, BackendError> {
        self.record(format!(
            "induction:jk{}:{}:{:e}",
            jk.id(),
            controls.max_iterations,
            controls.convergence
        ))?;
        if self.induction_diverges {
            return Err(BackendError::NotConverged {
                iterations: controls.max_iterations,
                threshold: controls.convergence,
            });
        }
        Ok(Self::table(&[
            ("Ind20,r (A<-B)", -0.0010),
            ("Ind20,r (A->B)", -0.0025),
            ("Ind20,r", -0.0035),
            ("Exch-Ind20,r", 0.0018),
        ]))
    }

    fn fdds_dispersion(
        &mut self,
        _primary: &BasisSet,
        _auxiliary: &BasisSet,
        _cache: &EvaluationCache,
    ) -> Result<ResultTable, BackendError> {
        self.record("fdds_dispersion".to_string())?;
        Ok(Self::table(&[("Disp20", -0.0021)]))
    }

    fn mp2_fisapt_dispersion(
        &mut self,
        monomer_a: &Wavefunction,
        _primary: &BasisSet,
        _auxiliary: &BasisSet,
        _cache: &EvaluationCache,
    ) -> Result<ResultTable, BackendError> {
        self.record(format!("mp2_fisapt_dispersion:{}", monomer_a.label()))?;
        Ok(Self::table(&[
            ("Disp20 (MP2)", -0.0023),
            ("Exch-Disp20,u", 0.0004),
        ]))
    }

    fn mp2_sapt_dispersion(
        &mut self,
        dimer: &Wavefunction,
        _monomer_a: &Wavefunction,
        _monomer_b: &Wavefunction,
        _primary: &BasisSet,
        _auxiliary: &BasisSet,
        _cache: &EvaluationCache,
    ) -> Result<ResultTable, BackendError> {
        self.record(format!("mp2_sapt_dispersion:{}", dimer.label()))?;
        Ok(Self::table(&[
            ("Disp20 (MP2)", -0.0023),
            ("Exch-Disp20,r", 0.0004),
        ]))
    }
}
