use super::elements::atomic_mass;
use nalgebra::Point3;

/// Represents an atom of a molecule handed to the SAPT pipeline.
///
/// Ghost atoms carry basis functions but neither nuclear charge nor electrons; they
/// appear when a monomer is described in the full dimer basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element symbol (e.g., "O", "H", "Cl").
    pub element: String,
    /// Cartesian coordinates.
    pub position: Point3<f64>,
    /// Whether the atom only contributes basis functions.
    pub ghost: bool,
}

impl Atom {
    /// Creates a real (non-ghost) atom.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.trim().to_string(),
            position,
            ghost: false,
        }
    }

    /// Returns a copy of this atom converted into a ghost.
    pub fn as_ghost(&self) -> Self {
        Self {
            ghost: true,
            ..self.clone()
        }
    }

    /// Isotope mass of the element, or `None` if the element is unknown.
    ///
    /// Ghost atoms still report their element's mass; callers decide whether ghosts count.
    pub fn mass(&self) -> Option<f64> {
        atomic_mass(&self.element)
    }
}
