use super::stages::PassWavefunctions;
use crate::core::results::ResultTable;
use crate::core::variables::VariableStore;
use crate::engine::error::EngineError;
use tracing::{info, instrument};

pub const HF_DIMER: &str = "HF DIMER";
pub const HF_MONOMER_A: &str = "HF MONOMER A";
pub const HF_MONOMER_B: &str = "HF MONOMER B";
pub const HF_TOTAL_INTERACTION: &str = "HF TOTAL INTERACTION";
pub const DELTA_HF_CORRECTION: &str = "Delta HF Correction";
pub const DFT_MONOMER_A: &str = "DFT MONOMERA";
pub const DFT_MONOMER_B: &str = "DFT MONOMERB";

const HF_TERM_PREFIX: &str = "HF ";

/// First-order and second-order HF terms that the delta-HF correction removes from the
/// total HF interaction.
const DELTA_HF_TERMS: [&str; 4] = ["Elst10,r", "Exch10", "Ind20,r", "Exch-Ind20,r"];

/// Supermolecular interaction energy: dimer minus both monomers.
pub fn interaction_energy(dimer: f64, monomer_a: f64, monomer_b: f64) -> f64 {
    dimer - monomer_a - monomer_b
}

/// Part of the HF interaction not captured by the HF-level SAPT terms through
/// second order.
pub fn delta_hf_correction(total: f64, terms: &ResultTable) -> Result<f64, EngineError> {
    let mut captured = 0.0;
    for label in DELTA_HF_TERMS {
        captured += terms
            .get(label)
            .ok_or_else(|| EngineError::MissingTerm(label.to_string()))?;
    }
    Ok(total - captured)
}

/// Report section of the auxiliary pass.
///
/// Holds the three HF energies, every evaluator term under an `HF ` prefix, the total
/// HF interaction and the delta-HF correction derived from them.
pub fn reference_table(
    wavefunctions: &PassWavefunctions,
    terms: &ResultTable,
) -> Result<ResultTable, EngineError> {
    let dimer = wavefunctions.dimer.energy();
    let monomer_a = wavefunctions.monomer_a.energy();
    let monomer_b = wavefunctions.monomer_b.energy();
    let total = interaction_energy(dimer, monomer_a, monomer_b);
    let delta = delta_hf_correction(total, terms)?;

    let mut table = ResultTable::new();
    table.insert(HF_DIMER, dimer)?;
    table.insert(HF_MONOMER_A, monomer_a)?;
    table.insert(HF_MONOMER_B, monomer_b)?;
    for (label, value) in terms.iter() {
        table.insert(format!("{HF_TERM_PREFIX}{label}"), value)?;
    }
    table.insert(HF_TOTAL_INTERACTION, total)?;
    table.insert(DELTA_HF_CORRECTION, delta)?;

    info!(total, delta, "Delta HF correction computed.");
    Ok(table)
}

/// Report section of the primary pass: both DFT monomer energies, then the terms.
pub fn primary_table(
    wavefunctions: &PassWavefunctions,
    terms: ResultTable,
) -> Result<ResultTable, EngineError> {
    let mut table = ResultTable::new();
    table.insert(DFT_MONOMER_A, wavefunctions.monomer_a.energy())?;
    table.insert(DFT_MONOMER_B, wavefunctions.monomer_b.energy())?;
    table.extend(terms)?;
    Ok(table)
}

/// Concatenates the pass sections in execution order.
pub fn assemble(
    reference: Option<ResultTable>,
    primary: ResultTable,
) -> Result<ResultTable, EngineError> {
    let mut report = reference.unwrap_or_default();
    report.extend(primary)?;
    Ok(report)
}

/// Writes every report entry to `variables`, keyed by its label.
#[instrument(skip_all, name = "publish_results")]
pub fn publish(report: &ResultTable, variables: &mut VariableStore) {
    for (label, value) in report.iter() {
        variables.set_variable(label, value);
    }
    info!(published = report.len(), "Results published.");
}
