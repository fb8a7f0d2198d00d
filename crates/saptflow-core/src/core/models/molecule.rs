use super::atom::Atom;
use super::ids::AtomId;
use super::point_group::PointGroup;
use slotmap::SlotMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MoleculeError {
    #[error("Fragment index {index} is out of range for a molecule with {count} fragment(s)")]
    FragmentOutOfRange { index: usize, count: usize },

    #[error("Fragment {index} was requested as both real and ghost")]
    OverlappingSelection { index: usize },

    #[error("Subset extraction requires at least one real fragment")]
    EmptySelection,
}

/// A contiguous group of atoms with its own charge and multiplicity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub charge: i32,
    pub multiplicity: u32,
    atoms: Vec<AtomId>,
}

impl Fragment {
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }
}

/// A molecular system made of one or more fragments.
///
/// The same type serves as the composite dimer and as the monomer subsets extracted
/// from it. Subsets are always fresh copies; extraction never touches the source.
#[derive(Debug, Clone)]
pub struct Molecule {
    name: String,
    /// Primary atom storage; fragments hold the ordering.
    atoms: SlotMap<AtomId, Atom>,
    fragments: Vec<Fragment>,
    point_group: PointGroup,
    fix_orientation: bool,
    fix_com: bool,
}

impl Molecule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            atoms: SlotMap::with_key(),
            fragments: Vec::new(),
            point_group: PointGroup::C1,
            fix_orientation: false,
            fix_com: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Appends a fragment built from `atoms` and returns its index.
    pub fn add_fragment(&mut self, charge: i32, multiplicity: u32, atoms: Vec<Atom>) -> usize {
        let ids = atoms
            .into_iter()
            .map(|atom| self.atoms.insert(atom))
            .collect();
        self.fragments.push(Fragment {
            charge,
            multiplicity,
            atoms: ids,
        });
        self.fragments.len() - 1
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Iterates over all atoms, real and ghost, in fragment order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.fragments
            .iter()
            .flat_map(|fragment| fragment.atoms.iter())
            .filter_map(|&id| self.atoms.get(id).map(|atom| (id, atom)))
    }

    pub fn fragment(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn nfragments(&self) -> usize {
        self.fragments.len()
    }

    /// Total number of atoms including ghosts.
    pub fn natom(&self) -> usize {
        self.atoms.len()
    }

    pub fn real_atom_count(&self) -> usize {
        self.atoms.values().filter(|atom| !atom.ghost).count()
    }

    /// Indices of fragments that contain at least one real atom.
    pub fn real_fragments(&self) -> Vec<usize> {
        self.fragments
            .iter()
            .enumerate()
            .filter(|(_, fragment)| {
                fragment
                    .atoms
                    .iter()
                    .any(|id| self.atoms.get(*id).is_some_and(|atom| !atom.ghost))
            })
            .map(|(index, _)| index)
            .collect()
    }

    pub fn point_group(&self) -> PointGroup {
        self.point_group
    }

    pub fn reset_point_group(&mut self, point_group: PointGroup) {
        self.point_group = point_group;
    }

    pub fn fix_orientation(&mut self, fix: bool) {
        self.fix_orientation = fix;
    }

    pub fn fix_com(&mut self, fix: bool) {
        self.fix_com = fix;
    }

    pub fn orientation_fixed(&self) -> bool {
        self.fix_orientation
    }

    pub fn com_fixed(&self) -> bool {
        self.fix_com
    }

    /// Builds a new molecule from the selected fragments.
    ///
    /// Fragments listed in `real` keep their atoms, charge and multiplicity; fragments in
    /// `ghost` contribute ghost atoms only. Unselected fragments are dropped. Fragment
    /// order follows the source molecule. Point group and frame constraints are inherited.
    pub fn extract_subsets(&self, real: &[usize], ghost: &[usize]) -> Result<Self, MoleculeError> {
        if real.is_empty() {
            return Err(MoleculeError::EmptySelection);
        }
        for &index in real.iter().chain(ghost) {
            if index >= self.fragments.len() {
                return Err(MoleculeError::FragmentOutOfRange {
                    index,
                    count: self.fragments.len(),
                });
            }
        }
        if let Some(&index) = real.iter().find(|index| ghost.contains(index)) {
            return Err(MoleculeError::OverlappingSelection { index });
        }

        let mut subset = Molecule::new(&self.name);
        subset.point_group = self.point_group;
        subset.fix_orientation = self.fix_orientation;
        subset.fix_com = self.fix_com;

        for (index, fragment) in self.fragments.iter().enumerate() {
            let is_real = real.contains(&index);
            if !is_real && !ghost.contains(&index) {
                continue;
            }

            let atoms = fragment
                .atoms
                .iter()
                .filter_map(|id| self.atoms.get(*id))
                .map(|atom| if is_real { atom.clone() } else { atom.as_ghost() })
                .collect();

            if is_real {
                subset.add_fragment(fragment.charge, fragment.multiplicity, atoms);
            } else {
                subset.add_fragment(0, 1, atoms);
            }
        }

        Ok(subset)
    }
}
