use crate::core::models::molecule::Molecule;
use crate::core::models::point_group::PointGroup;
use crate::engine::error::{EngineError, ValidationError};
use crate::engine::namespace::Namespace;
use tracing::{info, instrument, warn};

/// The frame-locked dimer and the two monomers described in the dimer basis.
#[derive(Debug, Clone)]
pub struct NormalizedDimer {
    pub dimer: Molecule,
    pub monomer_a: Molecule,
    pub monomer_b: Molecule,
}

/// Produces a C1, orientation- and centre-of-mass-fixed copy of `composite` and extracts
/// both monomers from it.
///
/// Locking the frame keeps every stage on identical Cartesian coordinates, which is what
/// allows integrals computed for one stage to be reused by the next.
#[instrument(skip_all, name = "normalize_geometry")]
pub fn run(composite: &Molecule) -> Result<NormalizedDimer, EngineError> {
    let nfrag = composite.nfragments();
    if nfrag != 2 {
        return Err(ValidationError::FragmentCount { found: nfrag }.into());
    }

    if !composite.point_group().is_trivial() {
        warn!(
            point_group = %composite.point_group(),
            "SAPT does not make use of molecular symmetry, further calculations in C1 point group."
        );
    }

    let mut dimer = composite.clone();
    dimer.reset_point_group(PointGroup::C1);
    dimer.fix_orientation(true);
    dimer.fix_com(true);

    let mut monomer_a = dimer
        .extract_subsets(&[0], &[1])
        .map_err(ValidationError::from)?;
    monomer_a.set_name(Namespace::MonomerA.as_str());

    let mut monomer_b = dimer
        .extract_subsets(&[1], &[0])
        .map_err(ValidationError::from)?;
    monomer_b.set_name(Namespace::MonomerB.as_str());

    info!(
        natom = dimer.natom(),
        monomer_a_atoms = monomer_a.real_atom_count(),
        monomer_b_atoms = monomer_b.real_atom_count(),
        "Dimer normalized and monomers extracted."
    );

    Ok(NormalizedDimer {
        dimer,
        monomer_a,
        monomer_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn fragmented(fragment_sizes: &[usize]) -> Molecule {
        let mut molecule = Molecule::new("composite");
        let mut z = 0.0;
        for &size in fragment_sizes {
            let atoms = (0..size)
                .map(|_| {
                    z += 1.5;
                    Atom::new("He", Point3::new(0.0, 0.0, z))
                })
                .collect();
            molecule.add_fragment(0, 1, atoms);
        }
        molecule
    }

    #[test]
    fn run_extracts_complementary_monomers() {
        let mut composite = fragmented(&[3, 2]);
        composite.reset_point_group(PointGroup::Cs);

        let normalized = run(&composite).unwrap();

        assert_eq!(normalized.monomer_a.real_fragments(), vec![0]);
        assert_eq!(normalized.monomer_b.real_fragments(), vec![1]);
        assert_eq!(
            normalized.monomer_a.real_atom_count() + normalized.monomer_b.real_atom_count(),
            composite.natom()
        );
        assert_eq!(normalized.monomer_a.natom(), composite.natom());
        assert_eq!(normalized.monomer_a.name(), "monomerA");
        assert_eq!(normalized.monomer_b.name(), "monomerB");
    }

    #[test]
    fn run_locks_frame_and_symmetry_on_a_copy() {
        let mut composite = fragmented(&[1, 1]);
        composite.reset_point_group(PointGroup::C2v);

        let normalized = run(&composite).unwrap();

        for molecule in [&normalized.dimer, &normalized.monomer_a, &normalized.monomer_b] {
            assert_eq!(molecule.point_group(), PointGroup::C1);
            assert!(molecule.orientation_fixed());
            assert!(molecule.com_fixed());
        }
        assert_eq!(composite.point_group(), PointGroup::C2v);
        assert!(!composite.orientation_fixed());
        assert!(!composite.com_fixed());
    }

    #[test]
    fn run_rejects_wrong_fragment_counts() {
        for sizes in [&[4][..], &[1, 1, 1][..]] {
            let composite = fragmented(sizes);
            let err = run(&composite).unwrap_err();
            assert!(matches!(
                err,
                EngineError::Validation(ValidationError::FragmentCount { found }) if found == sizes.len()
            ));
        }
    }
}
