use phf::{Map, phf_map};

/// Masses (amu) of the most abundant isotope of each supported element.
static ISOTOPE_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.007_825_032_23, "D" => 2.014_101_778_12, "HE" => 4.002_603_254_13,
    "LI" => 7.016_003_436_6, "BE" => 9.012_183_065, "B" => 11.009_305_36,
    "C" => 12.0, "N" => 14.003_074_004_43, "O" => 15.994_914_619_57,
    "F" => 18.998_403_162_73, "NE" => 19.992_440_176_2,
    "NA" => 22.989_769_282_0, "MG" => 23.985_041_697, "AL" => 26.981_538_41,
    "SI" => 27.976_926_534_65, "P" => 30.973_761_998_42, "S" => 31.972_071_174_4,
    "CL" => 34.968_852_682, "AR" => 39.962_383_123_7,
    "K" => 38.963_706_486_4, "CA" => 39.962_590_863,
    "BR" => 78.918_337_6, "KR" => 83.911_497_728_2, "I" => 126.904_471_9,
};

/// Returns the isotope mass for an element symbol, ignoring case and surrounding whitespace.
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    ISOTOPE_MASSES
        .get(symbol.trim().to_ascii_uppercase().as_str())
        .copied()
}
