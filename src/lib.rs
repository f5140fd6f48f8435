//! Pair-aware removal of short reads from FASTQ files.
//!
//! - Single-end, split paired-end (`R1`/`R2` files) and interleaved paired-end.
//! - Plain and `.gz` (auto-detect on input, by extension on output).
//! - Two streaming passes per file: build the skip set, then write survivors.
//! - Mates are dropped together: read ids are normalized to a mate-invariant key.
//! - Malformed input is processed best-effort and counted (or rejected, see [`ErrorPolicy`]).
//! - Optional `mmap` for plain files; `zlib` feature for system-zlib parity.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod read_id;
pub mod reader;
pub mod record;
pub mod skip_set;
pub mod writer;
mod util;

pub use crate::config::{DEFAULT_THRESHOLD, FilterConfig, Mode};
pub use crate::error::{FilterError, FormatError, IoContext};
pub use crate::output::{MateTag, OutputDescriptor};
pub use crate::pipeline::{OutputReport, RunSummary, run};
pub use crate::policy::{ErrorPolicy, ReaderOptions};
pub use crate::read_id::{ReadId, normalize_read_id};
pub use crate::reader::{FastqReader, Source};
pub use crate::record::FastqRecord;
pub use crate::skip_set::{BuildStats, SkipSet, SkipSetBuilder};
pub use crate::writer::{FastqWriter, FilteredWriter, WriteStats};
