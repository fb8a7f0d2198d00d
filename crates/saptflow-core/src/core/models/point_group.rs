use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unrecognized point group symbol: '{0}'")]
pub struct ParsePointGroupError(pub String);

/// Abelian point groups a molecule may be described in.
///
/// The SAPT pipeline always works in [`PointGroup::C1`]; the other groups exist so that
/// callers can describe their input faithfully and the normalizer can report the reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointGroup {
    #[default]
    C1,
    Ci,
    C2,
    Cs,
    D2,
    C2v,
    C2h,
    D2h,
}

impl PointGroup {
    /// Lowercase Schoenflies symbol.
    pub fn schoenflies_symbol(&self) -> &'static str {
        match self {
            PointGroup::C1 => "c1",
            PointGroup::Ci => "ci",
            PointGroup::C2 => "c2",
            PointGroup::Cs => "cs",
            PointGroup::D2 => "d2",
            PointGroup::C2v => "c2v",
            PointGroup::C2h => "c2h",
            PointGroup::D2h => "d2h",
        }
    }

    pub fn is_trivial(&self) -> bool {
        *self == PointGroup::C1
    }
}

impl FromStr for PointGroup {
    type Err = ParsePointGroupError;

    /// Parses a Schoenflies symbol, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c1" => Ok(PointGroup::C1),
            "ci" => Ok(PointGroup::Ci),
            "c2" => Ok(PointGroup::C2),
            "cs" => Ok(PointGroup::Cs),
            "d2" => Ok(PointGroup::D2),
            "c2v" => Ok(PointGroup::C2v),
            "c2h" => Ok(PointGroup::C2h),
            "d2h" => Ok(PointGroup::D2h),
            _ => Err(ParsePointGroupError(s.to_string())),
        }
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schoenflies_symbol())
    }
}
