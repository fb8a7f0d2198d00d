use crate::cli::PlanArgs;
use crate::config::{self, RunFile};
use crate::error::Result;
use saptflow::core::models::molecule::Molecule;
use saptflow::core::options::Options;
use saptflow::engine::config::SaptSettings;
use saptflow::engine::tasks::normalize::NormalizedDimer;
use saptflow::workflows::sapt_dft;
use tracing::info;

pub fn run(args: PlanArgs) -> Result<()> {
    let run_file = RunFile::from_file(&args.config)?;
    let molecule = run_file.to_molecule()?;

    let mut options = Options::sapt_defaults();
    run_file.apply_options(&mut options)?;
    config::apply_set_values(&mut options, &args.set_values)?;

    info!("Validating SAPT(DFT) settings and geometry...");
    let report = build_plan(&molecule, &options)?;
    println!("{}", report);
    Ok(())
}

/// Validates a run without a backend and renders what it would compute.
pub fn build_plan(molecule: &Molecule, options: &Options) -> Result<String> {
    let (settings, geometry) = sapt_dft::plan(molecule, options)?;
    Ok(render(&settings, &geometry))
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn render(settings: &SaptSettings, geometry: &NormalizedDimer) -> String {
    let mut out = String::new();
    out.push_str("  ==> Algorithm <==\n\n");
    out.push_str(&format!("   {:<24}{}\n", "SAPT DFT Functional", settings.functional));
    out.push_str(&format!("   {:<24}{}\n", "Monomer A GRAC Shift", settings.grac_shift_a));
    out.push_str(&format!("   {:<24}{}\n", "Monomer B GRAC Shift", settings.grac_shift_b));
    out.push_str(&format!("   {:<24}{}\n", "Delta HF", yes_no(settings.do_delta_hf)));
    out.push_str(&format!("   {:<24}{}\n", "JK Algorithm", settings.scf_type));
    out.push_str(&format!("   {:<24}{}\n", "MP2 Dispersion", settings.dispersion));
    out.push_str(&format!("   {:<24}{}\n", "Basis", settings.basis));
    out.push_str("\n   Required computations:\n");
    for computation in settings.required_computations() {
        out.push_str(&format!("     {}\n", computation));
    }

    out.push_str("\n  ==> Geometry <==\n\n");
    out.push_str(&format!(
        "   {:<24}{} ({} atoms, {})\n",
        "Dimer",
        geometry.dimer.name(),
        geometry.dimer.natom(),
        geometry.dimer.point_group()
    ));
    for (label, monomer) in [
        ("Monomer A", &geometry.monomer_a),
        ("Monomer B", &geometry.monomer_b),
    ] {
        let real = monomer.real_atom_count();
        out.push_str(&format!(
            "   {:<24}{} real, {} ghost atoms\n",
            label,
            real,
            monomer.natom() - real
        ));
    }
    out
}
