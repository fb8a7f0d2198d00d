use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum OptionsError {
    #[error("Unknown option: '{0}'")]
    UnknownOption(String),

    #[error("Option '{key}' expects a {expected} value, got {found}")]
    TypeMismatch {
        key: String,
        expected: OptionKind,
        found: OptionKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Boolean,
    Integer,
    Double,
    String,
    Array,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Boolean => "boolean",
            OptionKind::Integer => "integer",
            OptionKind::Double => "double",
            OptionKind::String => "string",
            OptionKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<OptionValue>),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Boolean(_) => OptionKind::Boolean,
            OptionValue::Integer(_) => OptionKind::Integer,
            OptionValue::Double(_) => OptionKind::Double,
            OptionValue::String(_) => OptionKind::String,
            OptionValue::Array(_) => OptionKind::Array,
        }
    }

    /// Converts `self` to `kind` where the conversion is lossless.
    ///
    /// Integers widen to doubles and strings are upper-cased, matching how option
    /// values are compared everywhere else.
    fn coerce_to(self, kind: OptionKind) -> Option<OptionValue> {
        match (self, kind) {
            (OptionValue::Integer(i), OptionKind::Double) => Some(OptionValue::Double(i as f64)),
            (OptionValue::String(s), OptionKind::String) => {
                Some(OptionValue::String(s.trim().to_ascii_uppercase()))
            }
            (value, kind) if value.kind() == kind => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::Double(d) => write!(f, "{}", d),
            OptionValue::String(s) => f.write_str(s),
            OptionValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Double(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

/// An option value together with whether the user (or the pipeline) has assigned it.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    pub value: OptionValue,
    pub changed: bool,
}

/// Module-scoped option store.
///
/// Every key is registered once with a global default. A module may carry a local
/// override of a key; reads through [`Options::get`] prefer a changed local value and
/// fall back to the global one. Keys and module names are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    globals: HashMap<String, OptionEntry>,
    locals: HashMap<(String, String), OptionEntry>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options store with every key read by the SAPT(DFT) workflow registered at its default.
    pub fn sapt_defaults() -> Self {
        let mut options = Self::new();
        let defaults: [(&str, OptionValue); 15] = [
            ("BASIS", "".into()),
            ("SCF_TYPE", "PK".into()),
            ("REFERENCE", "RHF".into()),
            ("DFT_FUNCTIONAL", "HF".into()),
            ("DFT_GRAC_SHIFT", 0.0.into()),
            ("SAVE_JK", false.into()),
            ("DF_INTS_IO", "NONE".into()),
            ("DF_BASIS_MP2", "".into()),
            ("SAPT_DFT_GRAC_SHIFT_A", 0.0.into()),
            ("SAPT_DFT_GRAC_SHIFT_B", 0.0.into()),
            ("SAPT_DFT_DO_DHF", true.into()),
            ("SAPT_DFT_FUNCTIONAL", "PBE0".into()),
            ("SAPT_DFT_MP2_DISP_ALG", "SAPT".into()),
            ("MAXITER", 50i64.into()),
            ("D_CONVERGENCE", 1.0e-8.into()),
        ];
        for (key, value) in defaults {
            options.register(key, value);
        }
        options
    }

    /// Registers `key` with a default value. Re-registering replaces the default.
    pub fn register(&mut self, key: &str, default: OptionValue) {
        let default = match default {
            OptionValue::String(s) => OptionValue::String(normalize(&s)),
            other => other,
        };
        self.globals.insert(
            normalize(key),
            OptionEntry {
                value: default,
                changed: false,
            },
        );
    }

    /// Effective value of `key` as seen by `module`.
    pub fn get(&self, module: &str, key: &str) -> Result<&OptionValue, OptionsError> {
        let key = normalize(key);
        let global = self
            .globals
            .get(&key)
            .ok_or_else(|| OptionsError::UnknownOption(key.clone()))?;
        match self.locals.get(&(normalize(module), key)) {
            Some(local) if local.changed => Ok(&local.value),
            _ => Ok(&global.value),
        }
    }

    pub fn get_global(&self, key: &str) -> Result<&OptionValue, OptionsError> {
        let key = normalize(key);
        self.globals
            .get(&key)
            .map(|entry| &entry.value)
            .ok_or(OptionsError::UnknownOption(key))
    }

    pub fn get_f64(&self, module: &str, key: &str) -> Result<f64, OptionsError> {
        match self.get(module, key)? {
            OptionValue::Double(d) => Ok(*d),
            OptionValue::Integer(i) => Ok(*i as f64),
            other => Err(mismatch(key, OptionKind::Double, other)),
        }
    }

    pub fn get_i64(&self, module: &str, key: &str) -> Result<i64, OptionsError> {
        match self.get(module, key)? {
            OptionValue::Integer(i) => Ok(*i),
            other => Err(mismatch(key, OptionKind::Integer, other)),
        }
    }

    pub fn get_bool(&self, module: &str, key: &str) -> Result<bool, OptionsError> {
        match self.get(module, key)? {
            OptionValue::Boolean(b) => Ok(*b),
            other => Err(mismatch(key, OptionKind::Boolean, other)),
        }
    }

    pub fn get_str(&self, module: &str, key: &str) -> Result<&str, OptionsError> {
        match self.get(module, key)? {
            OptionValue::String(s) => Ok(s.as_str()),
            other => Err(mismatch(key, OptionKind::String, other)),
        }
    }

    pub fn get_global_str(&self, key: &str) -> Result<&str, OptionsError> {
        match self.get_global(key)? {
            OptionValue::String(s) => Ok(s.as_str()),
            other => Err(mismatch(key, OptionKind::String, other)),
        }
    }

    /// Whether `key` was assigned either globally or locally for `module`.
    pub fn has_changed(&self, module: &str, key: &str) -> Result<bool, OptionsError> {
        let key = normalize(key);
        let global = self
            .globals
            .get(&key)
            .ok_or_else(|| OptionsError::UnknownOption(key.clone()))?;
        let local_changed = self
            .locals
            .get(&(normalize(module), key))
            .is_some_and(|entry| entry.changed);
        Ok(global.changed || local_changed)
    }

    pub fn set_global(&mut self, key: &str, value: impl Into<OptionValue>) -> Result<(), OptionsError> {
        let key = normalize(key);
        let entry = self
            .globals
            .get_mut(&key)
            .ok_or_else(|| OptionsError::UnknownOption(key.clone()))?;
        entry.value = checked(&key, entry.value.kind(), value.into())?;
        entry.changed = true;
        Ok(())
    }

    pub fn set_local(
        &mut self,
        module: &str,
        key: &str,
        value: impl Into<OptionValue>,
    ) -> Result<(), OptionsError> {
        let key = normalize(key);
        let kind = self
            .globals
            .get(&key)
            .map(|entry| entry.value.kind())
            .ok_or_else(|| OptionsError::UnknownOption(key.clone()))?;
        let value = checked(&key, kind, value.into())?;
        self.locals.insert(
            (normalize(module), key),
            OptionEntry {
                value,
                changed: true,
            },
        );
        Ok(())
    }

    /// Raw local and global entries for `key`, used to snapshot state.
    pub fn entries(
        &self,
        module: &str,
        key: &str,
    ) -> Result<(Option<OptionEntry>, OptionEntry), OptionsError> {
        let key = normalize(key);
        let global = self
            .globals
            .get(&key)
            .cloned()
            .ok_or_else(|| OptionsError::UnknownOption(key.clone()))?;
        let local = self.locals.get(&(normalize(module), key)).cloned();
        Ok((local, global))
    }

    /// Writes back entries captured by [`Options::entries`], including their change flags.
    pub fn restore_entries(
        &mut self,
        module: &str,
        key: &str,
        local: Option<OptionEntry>,
        global: OptionEntry,
    ) -> Result<(), OptionsError> {
        let key = normalize(key);
        let slot = self
            .globals
            .get_mut(&key)
            .ok_or_else(|| OptionsError::UnknownOption(key.clone()))?;
        let kind = slot.value.kind();
        checked(&key, kind, global.value.clone())?;
        *slot = global;

        let local_key = (normalize(module), key);
        match local {
            Some(entry) => {
                checked(&local_key.1, kind, entry.value.clone())?;
                self.locals.insert(local_key, entry);
            }
            None => {
                self.locals.remove(&local_key);
            }
        }
        Ok(())
    }
}

fn mismatch(key: &str, expected: OptionKind, found: &OptionValue) -> OptionsError {
    OptionsError::TypeMismatch {
        key: normalize(key),
        expected,
        found: found.kind(),
    }
}

fn checked(key: &str, kind: OptionKind, value: OptionValue) -> Result<OptionValue, OptionsError> {
    let found = value.kind();
    value.coerce_to(kind).ok_or_else(|| OptionsError::TypeMismatch {
        key: key.to_string(),
        expected: kind,
        found,
    })
}
