use super::stages::{PassKind, PassState, PassTracker, PassWavefunctions};
use crate::core::models::molecule::Molecule;
use crate::core::results::ResultTable;
use crate::engine::backend::{BackendError, BasisRole, JkHandle, QuantumEngine};
use crate::engine::cache::EvaluationCache;
use crate::engine::config::{DispersionAlgorithm, SaptSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument};

const AUXILIARY_BASIS_KEY: &str = "DF_BASIS_MP2";

/// Evaluates the energy terms of one pass against a single shared cache.
///
/// Electrostatics, exchange and induction run for every pass. The primary pass then
/// builds the RI auxiliary basis and runs FDDS dispersion followed by exactly one
/// MP2-like dispersion, chosen by `settings.dispersion`.
#[instrument(skip_all, name = "evaluate_terms", fields(pass = %tracker.kind()))]
pub fn run<E>(
    engine: &mut E,
    settings: &SaptSettings,
    dimer: &Molecule,
    wavefunctions: &PassWavefunctions,
    tracker: &mut PassTracker,
    reporter: &ProgressReporter,
) -> Result<ResultTable, EngineError>
where
    E: QuantumEngine + ?Sized,
{
    let jk = *wavefunctions
        .monomer_b
        .jk()
        .ok_or(EngineError::MissingCouplingOperator {
            stage: wavefunctions_stage(tracker.kind()),
        })?;

    let cache = engine
        .build_cache(&wavefunctions.monomer_a, &wavefunctions.monomer_b, &jk)
        .map_err(|e| EngineError::from_backend("cache", e))?;
    debug!(entries = cache.len(), "Evaluation cache built.");

    let total_steps = match tracker.kind() {
        PassKind::DeltaHf => 3,
        PassKind::Primary => 5,
    };
    reporter.report(Progress::TaskStart { total_steps });

    let mut table = ResultTable::new();
    evaluate_core_terms(engine, settings, &cache, &jk, &mut table, reporter)?;

    if tracker.kind() == PassKind::Primary {
        evaluate_dispersion(engine, settings, dimer, wavefunctions, &cache, &mut table, reporter)?;
    }

    reporter.report(Progress::TaskFinish);
    tracker.advance(PassState::TermsEvaluated)?;
    info!(terms = table.len(), "Energy terms evaluated.");
    Ok(table)
}

fn wavefunctions_stage(kind: PassKind) -> &'static str {
    match kind {
        PassKind::DeltaHf => "delta HF monomer B",
        PassKind::Primary => "DFT monomer B",
    }
}

fn evaluate_core_terms<E>(
    engine: &mut E,
    settings: &SaptSettings,
    cache: &EvaluationCache,
    jk: &JkHandle,
    table: &mut ResultTable,
    reporter: &ProgressReporter,
) -> Result<(), EngineError>
where
    E: QuantumEngine + ?Sized,
{
    merge(table, "electrostatics", engine.electrostatics(cache))?;
    reporter.report(Progress::TaskIncrement);

    merge(table, "exchange", engine.exchange(cache, jk))?;
    reporter.report(Progress::TaskIncrement);

    merge(table, "induction", engine.induction(cache, jk, settings.induction))?;
    reporter.report(Progress::TaskIncrement);

    Ok(())
}

fn evaluate_dispersion<E>(
    engine: &mut E,
    settings: &SaptSettings,
    dimer: &Molecule,
    wavefunctions: &PassWavefunctions,
    cache: &EvaluationCache,
    table: &mut ResultTable,
    reporter: &ProgressReporter,
) -> Result<(), EngineError>
where
    E: QuantumEngine + ?Sized,
{
    let primary = wavefunctions.monomer_a.basis();
    let auxiliary = engine
        .build_auxiliary_basis(
            dimer,
            AUXILIARY_BASIS_KEY,
            &settings.df_basis_mp2,
            BasisRole::RiFit,
            &settings.basis,
        )
        .map_err(|e| EngineError::from_backend("auxiliary_basis", e))?;
    debug!(basis = %auxiliary.name, nbf = auxiliary.nbf, "Auxiliary basis built.");

    merge(
        table,
        "fdds_dispersion",
        engine.fdds_dispersion(primary, &auxiliary, cache),
    )?;
    reporter.report(Progress::TaskIncrement);

    let mp2 = match settings.dispersion {
        DispersionAlgorithm::Fisapt => engine.mp2_fisapt_dispersion(
            &wavefunctions.monomer_a,
            primary,
            &auxiliary,
            cache,
        ),
        DispersionAlgorithm::Sapt => engine.mp2_sapt_dispersion(
            &wavefunctions.dimer,
            &wavefunctions.monomer_a,
            &wavefunctions.monomer_b,
            primary,
            &auxiliary,
            cache,
        ),
    };
    merge(table, "mp2_dispersion", mp2)?;
    reporter.report(Progress::TaskIncrement);

    Ok(())
}

fn merge(
    table: &mut ResultTable,
    stage: &'static str,
    outcome: Result<ResultTable, BackendError>,
) -> Result<(), EngineError> {
    let terms = outcome.map_err(|e| EngineError::from_backend(stage, e))?;
    if terms.is_empty() {
        return Err(EngineError::EmptyTerm(stage));
    }
    table.extend(terms)?;
    Ok(())
}
