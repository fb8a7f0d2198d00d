use crate::error::{CliError, Result};
use nalgebra::Point3;
use saptflow::core::models::atom::Atom;
use saptflow::core::models::molecule::Molecule;
use saptflow::core::models::point_group::PointGroup;
use saptflow::core::options::{OptionValue, Options};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileAtom {
    pub element: String,
    pub position: [f64; 3],
    #[serde(default)]
    pub ghost: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileFragment {
    #[serde(default)]
    pub charge: i32,
    #[serde(default = "default_multiplicity")]
    pub multiplicity: u32,
    pub atoms: Vec<FileAtom>,
}

fn default_multiplicity() -> u32 {
    1
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileMolecule {
    pub name: Option<String>,
    #[serde(rename = "point-group")]
    pub point_group: Option<String>,
    #[serde(rename = "fragment")]
    pub fragments: Vec<FileFragment>,
}

/// A SAPT(DFT) run description: the composite molecule plus option assignments.
///
/// `[globals]` entries are assigned globally; `[options.<MODULE>]` tables are local
/// overrides for that module.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub molecule: FileMolecule,
    #[serde(default)]
    pub globals: BTreeMap<String, OptionValue>,
    #[serde(default)]
    pub options: BTreeMap<String, BTreeMap<String, OptionValue>>,
}

impl RunFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn to_molecule(&self) -> Result<Molecule> {
        let source = &self.molecule;
        let mut molecule = Molecule::new(source.name.as_deref().unwrap_or("dimer"));

        if let Some(symbol) = &source.point_group {
            let point_group = symbol
                .parse::<PointGroup>()
                .map_err(|e| CliError::Config(e.to_string()))?;
            molecule.reset_point_group(point_group);
        }

        for (index, fragment) in source.fragments.iter().enumerate() {
            let mut atoms = Vec::with_capacity(fragment.atoms.len());
            for atom in &fragment.atoms {
                let [x, y, z] = atom.position;
                let built = Atom::new(&atom.element, Point3::new(x, y, z));
                if built.mass().is_none() {
                    return Err(CliError::Config(format!(
                        "Unknown element '{}' in fragment {}",
                        atom.element,
                        index + 1
                    )));
                }
                atoms.push(if atom.ghost { built.as_ghost() } else { built });
            }
            molecule.add_fragment(fragment.charge, fragment.multiplicity, atoms);
        }

        debug!(
            fragments = molecule.nfragments(),
            natom = molecule.natom(),
            "Molecule built from run file."
        );
        Ok(molecule)
    }

    /// Applies every option assignment, globals first.
    pub fn apply_options(&self, options: &mut Options) -> Result<()> {
        for (key, value) in &self.globals {
            options
                .set_global(key, value.clone())
                .map_err(|e| CliError::Config(e.to_string()))?;
        }
        for (module, entries) in &self.options {
            for (key, value) in entries {
                options
                    .set_local(module, key, value.clone())
                    .map_err(|e| CliError::Config(format!("[options.{}] {}", module, e)))?;
            }
        }
        Ok(())
    }
}
