//! End-to-end run: build the skip set, then write each filtered output.

use crate::config::{FilterConfig, Mode};
use crate::error::FilterError;
use crate::output::{MateTag, OutputDescriptor};
use crate::reader::FastqReader;
use crate::skip_set::{SkipSet, SkipSetBuilder};
use crate::writer::{FilteredWriter, WriteStats};
use std::fs;
use std::path::{Path, PathBuf};

/// One written output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReport {
    pub input: PathBuf,
    pub path: PathBuf,
    pub stats: WriteStats,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub threshold: usize,
    /// Distinct read ids dropped (one per pair in paired modes).
    pub skipped_ids: usize,
    /// Records evaluated per input during the build pass.
    pub evaluated: Vec<(PathBuf, u64)>,
    /// Empty when nothing was filtered.
    pub outputs: Vec<OutputReport>,
    /// Malformed groups across all inputs, counted once per input during the build pass.
    pub anomalies: u64,
}

impl RunSummary {
    pub fn nothing_filtered(&self) -> bool {
        self.skipped_ids == 0
    }

    /// Records dropped across all outputs.
    pub fn dropped_records(&self) -> u64 {
        self.outputs.iter().map(|o| o.stats.dropped).sum()
    }
}

/// Run the filter described by `cfg`.
///
/// Returns without writing anything when no read is at or under the threshold,
/// and fails before reading when an output would overwrite an input.
pub fn run(cfg: &FilterConfig) -> Result<RunSummary, FilterError> {
    let paired = cfg.mode.is_paired();
    let builder = SkipSetBuilder::new(cfg.threshold, paired);
    let mut summary = RunSummary {
        threshold: cfg.threshold,
        ..RunSummary::default()
    };
    let jobs = targets(&cfg.mode);
    check_outputs_distinct(cfg, &jobs)?;

    let mut skip = scan(cfg, &builder, cfg.mode.forward(), &mut summary)?;
    if let Some(reverse) = cfg.mode.reverse() {
        let reverse_skip = scan(cfg, &builder, reverse, &mut summary)?;
        skip = skip.merge(reverse_skip);
    }
    summary.skipped_ids = skip.len();
    if summary.anomalies > 0 {
        log::warn!("{} malformed record groups processed best-effort", summary.anomalies);
    }

    if skip.is_empty() {
        log::info!(
            "no reads <= {} found. No reads to filter and not creating output",
            cfg.threshold
        );
        return Ok(summary);
    }
    log::info!("skipping {} reads", skip.len());

    for &(input, mate) in &jobs {
        write(cfg, &skip, paired, input, mate, &mut summary)?;
    }

    log::info!(
        "done: {} ids skipped, {} records dropped",
        summary.skipped_ids,
        summary.dropped_records()
    );
    Ok(summary)
}

/// Inputs paired with the mate tag of the output each one is filtered into.
fn targets(mode: &Mode) -> Vec<(&Path, Option<MateTag>)> {
    match mode {
        Mode::PairedSplit { forward, reverse } => vec![
            (forward.as_path(), Some(MateTag::R1)),
            (reverse.as_path(), Some(MateTag::R2)),
        ],
        Mode::SingleEnd { forward } | Mode::PairedInterleaved { forward } => {
            vec![(forward.as_path(), None)]
        }
    }
}

/// Creating an output truncates it, so none may resolve to an input file.
fn check_outputs_distinct(
    cfg: &FilterConfig,
    targets: &[(&Path, Option<MateTag>)],
) -> Result<(), FilterError> {
    let inputs: Vec<PathBuf> = targets.iter().map(|(input, _)| file_identity(input)).collect();
    for &(_, mate) in targets {
        let path = OutputDescriptor::new(&cfg.output, mate).resolve();
        if inputs.contains(&file_identity(&path)) {
            return Err(FilterError::OutputIsInput { path });
        }
    }
    Ok(())
}

/// Canonical form of `path`; for a file that does not exist yet, its
/// canonical directory joined with the file name.
fn file_identity(path: &Path) -> PathBuf {
    if let Ok(p) = fs::canonicalize(path) {
        return p;
    }
    let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    fs::canonicalize(dir)
        .map(|d| d.join(name))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn scan(
    cfg: &FilterConfig,
    builder: &SkipSetBuilder,
    input: &Path,
    summary: &mut RunSummary,
) -> Result<SkipSet, FilterError> {
    log::info!("reading input file {} ...", input.display());
    let mut reader = FastqReader::from_path(input, cfg.reader.clone())?;
    let (set, stats) = builder.build_with_stats(&mut reader)?;
    summary.evaluated.push((input.to_path_buf(), stats.evaluated));
    summary.anomalies += reader.anomalies();
    Ok(set)
}

fn write(
    cfg: &FilterConfig,
    skip: &SkipSet,
    paired: bool,
    input: &Path,
    mate: Option<MateTag>,
    summary: &mut RunSummary,
) -> Result<(), FilterError> {
    let mut reader = FastqReader::from_path(input, cfg.reader.clone())?;
    let dest = OutputDescriptor::new(&cfg.output, mate);
    let (path, stats) =
        FilteredWriter::new(skip, paired).write_file(&mut reader, &dest, cfg.compression_level)?;
    summary.outputs.push(OutputReport {
        input: input.to_path_buf(),
        path,
        stats,
    });
    Ok(())
}
