/// Events emitted while a SAPT(DFT) run advances.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A pass (delta HF or primary) begins.
    PassStart { name: &'static str },

    /// A sub-calculation begins; `name` is its banner.
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// Energy-term evaluation of a pass begins with `total_steps` evaluators.
    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional caller-supplied callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
