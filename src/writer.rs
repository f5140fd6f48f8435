//! Pass 2: re-stream a file and keep only reads absent from the skip set.

use crate::error::FilterError;
use crate::output::OutputDescriptor;
use crate::record::FastqRecord;
use crate::skip_set::{PROGRESS_EVERY, SkipSet};
use crate::util::has_gz_suffix;

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File-backed output stream, gzip-compressed when the name ends in `.gz`.
pub enum OutputSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    pub fn create(path: &Path, level: u32) -> io::Result<Self> {
        let f = BufWriter::with_capacity(256 * 1024, File::create(path)?);
        if has_gz_suffix(path) {
            log::debug!("{}: gzip output, level {level}", path.display());
            Ok(Self::Gzip(GzEncoder::new(f, Compression::new(level))))
        } else {
            log::debug!("{}: plain output", path.display());
            Ok(Self::Plain(f))
        }
    }

    /// Flush buffers and, for gzip, write the trailer.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Plain(mut w) => w.flush(),
            Self::Gzip(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(w) => w.write(buf),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }
}

/// Writes records line by line, newline-terminated.
pub struct FastqWriter<W: Write> {
    out: W,
    name: PathBuf,
}

impl<W: Write> FastqWriter<W> {
    /// `name` is only used in error messages.
    pub fn new(out: W, name: impl Into<PathBuf>) -> Self {
        Self {
            out,
            name: name.into(),
        }
    }

    /// Write the lines the record has; a truncated record stays truncated.
    pub fn write_record(&mut self, rec: &FastqRecord) -> Result<(), FilterError> {
        for line in rec.lines() {
            self.out
                .write_all(line.as_bytes())
                .and_then(|_| self.out.write_all(b"\n"))
                .map_err(|e| FilterError::write_err(e, &self.name))?;
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W, FilterError> {
        self.out
            .flush()
            .map_err(|e| FilterError::write_err(e, &self.name))?;
        Ok(self.out)
    }
}

impl FastqWriter<OutputSink> {
    pub fn create(path: impl Into<PathBuf>, level: u32) -> Result<Self, FilterError> {
        let path = path.into();
        let sink = OutputSink::create(&path, level).map_err(|e| FilterError::Create {
            source: e,
            path: path.clone(),
        })?;
        Ok(Self::new(sink, path))
    }

    pub fn finish(self) -> Result<PathBuf, FilterError> {
        let Self { out, name } = self;
        out.finish().map_err(|e| FilterError::write_err(e, &name))?;
        Ok(name)
    }
}

/// Counters from one write pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub processed: u64,
    pub written: u64,
    pub dropped: u64,
}

/// Emits every record whose normalized id is not in the skip set, in input order.
#[derive(Debug, Clone, Copy)]
pub struct FilteredWriter<'a> {
    skip: &'a SkipSet,
    paired: bool,
}

impl<'a> FilteredWriter<'a> {
    pub fn new(skip: &'a SkipSet, paired: bool) -> Self {
        Self { skip, paired }
    }

    #[inline]
    pub fn keeps(&self, rec: &FastqRecord) -> bool {
        rec.read_id(self.paired)
            .is_none_or(|id| !self.skip.contains(id.as_str()))
    }

    /// Stream `records` into `out`, one record held at a time.
    pub fn write_to<I, W>(
        &self,
        records: I,
        out: &mut FastqWriter<W>,
    ) -> Result<WriteStats, FilterError>
    where
        I: IntoIterator<Item = Result<FastqRecord, FilterError>>,
        W: Write,
    {
        let mut stats = WriteStats::default();
        for rec in records {
            let rec = rec?;
            stats.processed += 1;
            if stats.processed % PROGRESS_EVERY == 0 {
                log::info!("reads processed {}", stats.processed);
            }
            if self.keeps(&rec) {
                out.write_record(&rec)?;
                stats.written += 1;
            } else {
                stats.dropped += 1;
            }
        }
        log::info!("reads processed {}", stats.processed);
        Ok(stats)
    }

    /// Resolve `dest`, create it, filter `records` into it and finish the stream.
    pub fn write_file<I>(
        &self,
        records: I,
        dest: &OutputDescriptor,
        compression_level: u32,
    ) -> Result<(PathBuf, WriteStats), FilterError>
    where
        I: IntoIterator<Item = Result<FastqRecord, FilterError>>,
    {
        let path = dest.resolve();
        log::info!("writing output file {} ...", path.display());
        let mut out = FastqWriter::create(path, compression_level)?;
        let stats = self.write_to(records, &mut out)?;
        let path = out.finish()?;
        Ok((path, stats))
    }
}
