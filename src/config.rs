use crate::policy::ReaderOptions;
use std::path::{Path, PathBuf};

/// Reads with a sequence length `<=` this are dropped unless configured otherwise.
pub const DEFAULT_THRESHOLD: usize = 25;

/// Default gzip level for `.gz` outputs.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Library layout. Each variant carries exactly the inputs it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Forward reads only.
    SingleEnd { forward: PathBuf },
    /// Mates in two files; outputs get `.R1` / `.R2`.
    PairedSplit { forward: PathBuf, reverse: PathBuf },
    /// Mates alternate within one file.
    PairedInterleaved { forward: PathBuf },
}

impl Mode {
    #[inline]
    pub fn is_paired(&self) -> bool {
        !matches!(self, Mode::SingleEnd { .. })
    }

    pub fn forward(&self) -> &Path {
        match self {
            Mode::SingleEnd { forward }
            | Mode::PairedSplit { forward, .. }
            | Mode::PairedInterleaved { forward } => forward,
        }
    }

    pub fn reverse(&self) -> Option<&Path> {
        match self {
            Mode::PairedSplit { reverse, .. } => Some(reverse.as_path()),
            _ => None,
        }
    }
}

/// Fully validated run configuration.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub mode: Mode,
    /// Output base name; mate tags and extensions are derived from it.
    pub output: PathBuf,
    pub threshold: usize,
    pub compression_level: u32,
    pub reader: ReaderOptions,
}

impl FilterConfig {
    pub fn new(mode: Mode, output: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            output: output.into(),
            threshold: DEFAULT_THRESHOLD,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            reader: ReaderOptions::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_reader_options(mut self, opts: ReaderOptions) -> Self {
        self.reader = opts;
        self
    }
}
