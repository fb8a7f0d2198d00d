use crate::core::models::molecule::Molecule;
use crate::core::options::Options;
use crate::core::results::ResultTable;
use crate::core::variables::VariableStore;
use crate::engine::backend::{QuantumEngine, Wavefunction};
use crate::engine::config::SaptSettings;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks::normalize::{self, NormalizedDimer};
use crate::engine::tasks::stages::{PassKind, PassTracker, PassWavefunctions, StageScheduler};
use crate::engine::tasks::{aggregate, terms};
use crate::engine::transaction::OptionsTransaction;
use tracing::{info, instrument};

/// Every `(module, key)` the workflow may override; all are restored when the run ends.
pub const STASHED_OPTIONS: [(&str, &str); 6] = [
    ("SCF", "SCF_TYPE"),
    ("SCF", "REFERENCE"),
    ("SCF", "DFT_FUNCTIONAL"),
    ("SCF", "DFT_GRAC_SHIFT"),
    ("SCF", "SAVE_JK"),
    ("SCF", "DF_INTS_IO"),
];

struct DeltaHfPass {
    wavefunctions: PassWavefunctions,
    table: ResultTable,
}

/// Runs a SAPT(DFT) computation on a two-fragment `composite` and returns the
/// dimer-level wavefunction of the DFT pass.
///
/// Validation happens before the backend is touched. Options changed during the run are
/// restored on every exit path. Every energy is published to `variables`, and only after
/// both passes and the restore have succeeded.
#[instrument(skip_all, name = "sapt_dft_workflow")]
pub fn run<E>(
    composite: &Molecule,
    engine: &mut E,
    options: &mut Options,
    variables: &mut VariableStore,
    reporter: &ProgressReporter,
) -> Result<Wavefunction, EngineError>
where
    E: QuantumEngine + ?Sized,
{
    let (dimer, report) = OptionsTransaction::run(options, &STASHED_OPTIONS, |transaction| {
        let options = &mut **transaction;
        default_scf_type(options)?;

        let (settings, geometry) = prepare(composite, options)?;

        options.set_global("SAVE_JK", true)?;
        if settings.density_fitted() {
            options.set_global("DF_INTS_IO", "SAVE")?;
        }

        let mut scheduler = StageScheduler::new(engine, reporter, settings.density_fitted());

        let delta_hf = if settings.do_delta_hf {
            Some(run_delta_hf_pass(
                &mut scheduler,
                options,
                &settings,
                &geometry,
                reporter,
            )?)
        } else {
            None
        };

        let dimer_reference = delta_hf
            .as_ref()
            .map(|pass| pass.wavefunctions.dimer.clone());
        let mut tracker = PassTracker::new(PassKind::Primary);
        let dft = scheduler.run_primary_pass(
            options,
            &settings,
            &geometry,
            dimer_reference,
            &mut tracker,
        )?;
        let dft_terms = terms::run(
            scheduler.engine(),
            &settings,
            &geometry.dimer,
            &dft,
            &mut tracker,
            reporter,
        )?;
        let primary = aggregate::primary_table(&dft, dft_terms)?;
        let report = aggregate::assemble(delta_hf.map(|pass| pass.table), primary)?;

        Ok((dft.dimer, report))
    })?;

    aggregate::publish(&report, variables);
    info!(entries = report.len(), "SAPT(DFT) computation complete.");
    Ok(dimer)
}

/// Settings and geometry a run on `composite` would use, validated, leaving `options`
/// untouched.
pub fn plan(
    composite: &Molecule,
    options: &Options,
) -> Result<(SaptSettings, NormalizedDimer), EngineError> {
    let mut preview = options.clone();
    default_scf_type(&mut preview)?;
    prepare(composite, &preview)
}

/// Reads the settings and runs the gates in order: GRAC shifts, reference, fragment
/// count, then the orbital basis.
fn prepare(
    composite: &Molecule,
    options: &Options,
) -> Result<(SaptSettings, NormalizedDimer), EngineError> {
    let settings = SaptSettings::from_options(options)?;
    log_summary(&settings);
    settings.validate()?;
    let geometry = normalize::run(composite)?;
    settings.require_basis()?;
    Ok((settings, geometry))
}

/// Density-fitted SCF unless the user picked an algorithm.
fn default_scf_type(options: &mut Options) -> Result<(), EngineError> {
    if !options.has_changed("SCF", "SCF_TYPE")? {
        options.set_local("SCF", "SCF_TYPE", "DF")?;
    }
    Ok(())
}

fn run_delta_hf_pass<E>(
    scheduler: &mut StageScheduler<'_, '_, E>,
    options: &Options,
    settings: &SaptSettings,
    geometry: &NormalizedDimer,
    reporter: &ProgressReporter,
) -> Result<DeltaHfPass, EngineError>
where
    E: QuantumEngine + ?Sized,
{
    let mut tracker = PassTracker::new(PassKind::DeltaHf);
    let wavefunctions = scheduler.run_reference_pass(options, geometry, &mut tracker)?;
    let hf_terms = terms::run(
        scheduler.engine(),
        settings,
        &geometry.dimer,
        &wavefunctions,
        &mut tracker,
        reporter,
    )?;
    let table = aggregate::reference_table(&wavefunctions, &hf_terms)?;
    Ok(DeltaHfPass {
        wavefunctions,
        table,
    })
}

fn log_summary(settings: &SaptSettings) {
    info!(
        functional = %settings.functional,
        grac_shift_a = settings.grac_shift_a,
        grac_shift_b = settings.grac_shift_b,
        delta_hf = settings.do_delta_hf,
        dispersion = %settings.dispersion,
        scf_type = %settings.scf_type,
        basis = %settings.basis,
        "SAPT(DFT) algorithm settings."
    );
    info!(
        computations = ?settings.required_computations(),
        "Required computations."
    );
}
