use super::error::EngineError;
use crate::core::options::{OptionEntry, Options, OptionsError};
use std::ops::{Deref, DerefMut};
use tracing::{debug, error};

struct StashedOption {
    module: String,
    key: String,
    local: Option<OptionEntry>,
    global: OptionEntry,
}

/// Scoped overrides of an [`Options`] store.
///
/// Opening a transaction records the local and global entries of each `(module, key)`
/// pair. The options can then be changed freely through `Deref`/`DerefMut`. Closing the
/// transaction (or dropping it) writes every recorded entry back, including its
/// `changed` flag.
pub struct OptionsTransaction<'a> {
    options: &'a mut Options,
    stash: Vec<StashedOption>,
    closed: bool,
}

impl<'a> OptionsTransaction<'a> {
    pub fn open(options: &'a mut Options, keys: &[(&str, &str)]) -> Result<Self, EngineError> {
        let mut stash = Vec::with_capacity(keys.len());
        for &(module, key) in keys {
            let (local, global) = options.entries(module, key)?;
            stash.push(StashedOption {
                module: module.to_string(),
                key: key.to_string(),
                local,
                global,
            });
        }
        debug!(stashed = stash.len(), "Opened options transaction.");
        Ok(Self {
            options,
            stash,
            closed: false,
        })
    }

    /// Runs `action` inside a transaction and restores the options afterwards.
    ///
    /// The restore happens on every exit path. An error from `action` takes precedence
    /// over a restore error; the latter is then only logged.
    pub fn run<F, R>(
        options: &'a mut Options,
        keys: &[(&str, &str)],
        action: F,
    ) -> Result<R, EngineError>
    where
        F: FnOnce(&mut OptionsTransaction<'a>) -> Result<R, EngineError>,
    {
        let mut transaction = Self::open(options, keys)?;
        let outcome = action(&mut transaction);
        let restored = transaction.close();

        match (outcome, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(restore_err)) => Err(restore_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(restore_err)) => {
                error!(error = %restore_err, "Options restore failed after an aborted run.");
                Err(err)
            }
        }
    }

    /// Restores every stashed entry.
    pub fn close(mut self) -> Result<(), EngineError> {
        self.closed = true;
        self.restore().map_err(EngineError::ConfigRestore)
    }

    /// Attempts every entry even if one fails, then reports the first failure.
    fn restore(&mut self) -> Result<(), OptionsError> {
        let mut first_error = None;
        for stashed in self.stash.iter().rev() {
            if let Err(err) = self.options.restore_entries(
                &stashed.module,
                &stashed.key,
                stashed.local.clone(),
                stashed.global.clone(),
            ) {
                first_error.get_or_insert(err);
            }
        }
        debug!(restored = self.stash.len(), "Closed options transaction.");
        first_error.map_or(Ok(()), Err)
    }
}

impl Deref for OptionsTransaction<'_> {
    type Target = Options;

    fn deref(&self) -> &Self::Target {
        &*self.options
    }
}

impl DerefMut for OptionsTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.options
    }
}

impl Drop for OptionsTransaction<'_> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.restore() {
                error!(error = %err, "Options restore failed while dropping transaction.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [(&str, &str); 3] = [
        ("SCF", "SCF_TYPE"),
        ("SCF", "REFERENCE"),
        ("SCF", "DFT_GRAC_SHIFT"),
    ];

    #[test]
    fn close_restores_global_and_local_values() {
        let mut options = Options::sapt_defaults();
        options.set_global("SCF_TYPE", "DIRECT").unwrap();
        let before = options.clone();

        let mut transaction = OptionsTransaction::open(&mut options, &KEYS).unwrap();
        transaction.set_local("SCF", "SCF_TYPE", "DF").unwrap();
        transaction.set_local("SCF", "REFERENCE", "RKS").unwrap();
        transaction.set_global("DFT_GRAC_SHIFT", 0.1).unwrap();
        assert_eq!(transaction.get_str("SCF", "REFERENCE").unwrap(), "RKS");
        transaction.close().unwrap();

        assert_eq!(options, before);
    }

    #[test]
    fn drop_without_close_still_restores() {
        let mut options = Options::sapt_defaults();
        let before = options.clone();
        {
            let mut transaction = OptionsTransaction::open(&mut options, &KEYS).unwrap();
            transaction.set_global("REFERENCE", "UHF").unwrap();
        }
        assert_eq!(options, before);
    }

    #[test]
    fn run_restores_options_when_action_fails() {
        let mut options = Options::sapt_defaults();
        let before = options.clone();

        let result: Result<(), EngineError> =
            OptionsTransaction::run(&mut options, &KEYS, |transaction| {
                transaction.set_global("DFT_GRAC_SHIFT", 0.2)?;
                Err(EngineError::Internal("stage blew up".to_string()))
            });

        assert!(matches!(result, Err(EngineError::Internal(_))));
        assert_eq!(options, before);
    }

    #[test]
    fn run_returns_action_value_on_success() {
        let mut options = Options::sapt_defaults();
        let value = OptionsTransaction::run(&mut options, &KEYS, |transaction| {
            transaction.set_local("SCF", "SCF_TYPE", "DF")?;
            Ok(transaction.get_str("SCF", "SCF_TYPE")?.to_string())
        })
        .unwrap();

        assert_eq!(value, "DF");
        assert_eq!(options.get_str("SCF", "SCF_TYPE").unwrap(), "PK");
        assert!(!options.has_changed("SCF", "SCF_TYPE").unwrap());
    }

    const SAVE_JK: [(&str, &str); 1] = [("SCF", "SAVE_JK")];

    #[test]
    fn run_surfaces_restore_failure_after_successful_action() {
        let mut options = Options::sapt_defaults();

        let result = OptionsTransaction::run(&mut options, &SAVE_JK, |transaction| {
            transaction.register("SAVE_JK", "DISK".into());
            Ok(())
        });

        assert!(matches!(
            result,
            Err(EngineError::ConfigRestore(OptionsError::TypeMismatch { ref key, .. })) if key == "SAVE_JK"
        ));
    }

    #[test]
    fn action_error_wins_over_restore_failure() {
        let mut options = Options::sapt_defaults();

        let result: Result<(), EngineError> =
            OptionsTransaction::run(&mut options, &SAVE_JK, |transaction| {
                transaction.register("SAVE_JK", "DISK".into());
                Err(EngineError::Internal("stage blew up".to_string()))
            });

        assert!(matches!(result, Err(EngineError::Internal(ref msg)) if msg == "stage blew up"));
    }

    #[test]
    fn open_rejects_unregistered_keys() {
        let mut options = Options::sapt_defaults();
        let result = OptionsTransaction::open(&mut options, &[("SCF", "NO_SUCH_KEY")]);
        assert!(matches!(result, Err(EngineError::Options(_))));
    }
}
