use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoContext {
    pub byte_pos: u64,
    pub line_num: u64,
}

/// Malformed-input conditions. Reported as warnings under
/// [`ErrorPolicy::Warn`](crate::ErrorPolicy::Warn), fatal under `Return`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected header '@' at start of record")]
    MissingHeader,
    #[error("record truncated at EOF after {lines} of 4 lines")]
    TruncatedRecord { lines: usize },
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("cannot open input {}: {source}", .path.display())]
    Open {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("cannot create output {}: {source}", .path.display())]
    Create {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("I/O error reading {src} at {ctx:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        src: String,
        ctx: IoContext,
    },
    #[error("I/O error writing {}: {source}", .path.display())]
    Write {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("output {} would overwrite an input", .path.display())]
    OutputIsInput { path: PathBuf },
    #[error("format error in {src} at {ctx:?}: {source}")]
    Format {
        #[source]
        source: FormatError,
        src: String,
        ctx: IoContext,
    },
}

impl FilterError {
    pub(crate) fn io_err(source: io::Error, src: &impl ToString, ctx: IoContext) -> Self {
        Self::Io {
            source,
            src: src.to_string(),
            ctx,
        }
    }
    pub(crate) fn fmt_err(source: FormatError, src: &impl ToString, ctx: IoContext) -> Self {
        Self::Format {
            source,
            src: src.to_string(),
            ctx,
        }
    }
    pub(crate) fn write_err(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Write {
            source,
            path: path.into(),
        }
    }
}
