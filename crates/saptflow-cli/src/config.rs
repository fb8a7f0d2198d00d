mod file;

pub use file::RunFile;

use crate::error::{CliError, Result};
use saptflow::core::options::{OptionValue, Options};
use tracing::debug;

/// Applies `--set` assignments of the form `KEY=VALUE` (global) or `MODULE.KEY=VALUE`
/// (local to `MODULE`).
pub fn apply_set_values(options: &mut Options, set_values: &[String]) -> Result<()> {
    for kv_pair in set_values {
        let (target, raw) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Argument(format!(
                "Invalid --set format: '{}'. Expected [MODULE.]KEY=VALUE.",
                kv_pair
            ))
        })?;
        let value = parse_value(raw);
        debug!(option = target, value = %value, "Applying option override from the command line.");

        let assigned = match target.split_once('.') {
            Some((module, key)) => options.set_local(module, key, value),
            None => options.set_global(target, value),
        };
        assigned.map_err(|e| CliError::Config(format!("--set {}: {}", kv_pair, e)))?;
    }
    Ok(())
}

fn parse_value(raw: &str) -> OptionValue {
    let raw = raw.trim();
    if let Ok(b) = raw.parse::<bool>() {
        OptionValue::Boolean(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        OptionValue::Integer(i)
    } else if let Ok(d) = raw.parse::<f64>() {
        OptionValue::Double(d)
    } else {
        OptionValue::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_prefers_the_narrowest_type() {
        assert_eq!(parse_value("true"), OptionValue::Boolean(true));
        assert_eq!(parse_value("100"), OptionValue::Integer(100));
        assert_eq!(parse_value("1e-10"), OptionValue::Double(1e-10));
        assert_eq!(parse_value(" pbe0 "), OptionValue::String("pbe0".to_string()));
    }

    #[test]
    fn set_values_assign_globals_and_module_locals() {
        let mut options = Options::sapt_defaults();
        apply_set_values(
            &mut options,
            &[
                "BASIS=aug-cc-pvdz".to_string(),
                "SAPT.SAPT_DFT_GRAC_SHIFT_B=0.138".to_string(),
                "SAPT.D_CONVERGENCE=1".to_string(),
            ],
        )
        .unwrap();

        assert_eq!(options.get_global_str("BASIS").unwrap(), "AUG-CC-PVDZ");
        assert_eq!(options.get_f64("SAPT", "SAPT_DFT_GRAC_SHIFT_B").unwrap(), 0.138);
        assert_eq!(options.get_f64("SAPT", "D_CONVERGENCE").unwrap(), 1.0);
        assert_eq!(options.get_f64("SCF", "SAPT_DFT_GRAC_SHIFT_B").unwrap(), 0.0);
    }

    #[test]
    fn malformed_or_mistyped_set_values_are_rejected() {
        let mut options = Options::sapt_defaults();
        assert!(matches!(
            apply_set_values(&mut options, &["BASIS".to_string()]),
            Err(CliError::Argument(_))
        ));
        assert!(matches!(
            apply_set_values(&mut options, &["MAXITER=lots".to_string()]),
            Err(CliError::Config(_))
        ));
    }
}
