/// What the reader does with malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log a warning, count the anomaly and keep grouping lines positionally.
    #[default]
    Warn,
    /// Return the first anomaly to the caller (strict).
    Return,
}

#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    pub error_policy: ErrorPolicy,
}

impl ReaderOptions {
    pub fn strict() -> Self {
        Self {
            error_policy: ErrorPolicy::Return,
        }
    }
}
