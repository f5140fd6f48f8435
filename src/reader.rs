use crate::error::{FilterError, FormatError, IoContext};
use crate::policy::{ErrorPolicy, ReaderOptions};
use crate::record::FastqRecord;
use crate::util::{has_gz_suffix, looks_like_gzip, open_file};

#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    Reader,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Reader => f.write_str("<stream>"),
        }
    }
}

/// Sync FASTQ record reader (plain/.gz), streaming.
///
/// Lines are grouped four at a time by position only. Nothing is rejected
/// under the default policy: a group whose first line lacks `@`, or a short
/// trailing group, is logged, counted in [`anomalies`](Self::anomalies) and
/// still yielded.
pub struct FastqReader {
    src: Source,
    rdr: Box<dyn BufRead + Send>,
    opts: ReaderOptions,
    line_num: u64,
    byte_pos: u64,
    records: u64,
    anomalies: u64,
    done: bool,
}

impl FastqReader {
    /// Open from a file path. Auto-detect `.gz` by extension or magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, FilterError> {
        let path = path.as_ref();
        let f = open_file(path).map_err(|e| FilterError::Open {
            source: e,
            path: path.to_path_buf(),
        })?;

        let is_gz = has_gz_suffix(path) || looks_like_gzip(&f).unwrap_or(false);

        let rdr: Box<dyn BufRead + Send> = if is_gz {
            #[cfg(feature = "gzip")]
            {
                log::debug!("{}: gzip input", path.display());
                let dec = MultiGzDecoder::new(f);
                Box::new(BufReader::with_capacity(256 * 1024, dec))
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(FilterError::Open {
                    source: std::io::Error::new(
                        std::io::ErrorKind::Unsupported,
                        "gzip input but the `gzip` feature is disabled",
                    ),
                    path: path.to_path_buf(),
                });
            }
        } else {
            #[cfg(feature = "mmap")]
            {
                use memmap2::Mmap;
                use std::io::Cursor;
                // Own the Mmap inside Cursor to avoid self-ref problems
                let mmap = unsafe { Mmap::map(&f) }.map_err(|e| FilterError::Open {
                    source: e,
                    path: path.to_path_buf(),
                })?;
                log::debug!("{}: plain input, memory-mapped", path.display());
                Box::new(BufReader::with_capacity(512 * 1024, Cursor::new(mmap)))
            }
            #[cfg(not(feature = "mmap"))]
            {
                log::debug!("{}: plain input", path.display());
                Box::new(BufReader::with_capacity(256 * 1024, f))
            }
        };

        Ok(Self::with_source(Source::Path(path.to_path_buf()), rdr, opts))
    }

    /// Wrap an arbitrary `BufRead` (stdin, in-memory data, etc.).
    pub fn from_bufread<R: BufRead + Send + 'static>(reader: R, opts: ReaderOptions) -> Self {
        Self::with_source(Source::Reader, Box::new(reader), opts)
    }

    fn with_source(src: Source, rdr: Box<dyn BufRead + Send>, opts: ReaderOptions) -> Self {
        Self {
            src,
            rdr,
            opts,
            line_num: 0,
            byte_pos: 0,
            records: 0,
            anomalies: 0,
            done: false,
        }
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    /// Records yielded so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Malformed groups seen so far.
    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }

    /// Iterator-style `next` record.
    pub fn next(&mut self) -> Option<Result<FastqRecord, FilterError>> {
        if self.done {
            return None;
        }
        match self.read_one() {
            Ok(Some(rec)) => {
                self.records += 1;
                Some(Ok(rec))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }

    /// Read one line without its terminator. `None` at EOF.
    fn read_line(&mut self) -> Result<Option<String>, FilterError> {
        let mut buf = String::with_capacity(256);
        let n = self
            .rdr
            .read_line(&mut buf)
            .map_err(|e| FilterError::io_err(e, &self.src, self.ctx()))?;
        if n == 0 {
            return Ok(None);
        }
        self.line_num += 1;
        self.byte_pos += n as u64;
        if buf.ends_with('\n') {
            buf.pop();
        }
        if buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }

    fn read_one(&mut self) -> Result<Option<FastqRecord>, FilterError> {
        let header_ctx = IoContext {
            line_num: self.line_num + 1,
            byte_pos: self.byte_pos,
        };
        let Some(header) = self.read_line()? else {
            return Ok(None);
        };
        if !header.starts_with('@') {
            self.anomaly(FormatError::MissingHeader, header_ctx)?;
        }

        let seq = self.read_line()?;
        let plus = match seq {
            Some(_) => self.read_line()?,
            None => None,
        };
        let qual = match plus {
            Some(_) => self.read_line()?,
            None => None,
        };
        let rec = FastqRecord {
            header,
            seq,
            plus,
            qual,
        };

        if !rec.is_complete() {
            let lines = rec.line_count();
            self.anomaly(FormatError::TruncatedRecord { lines }, self.ctx())?;
        }
        Ok(Some(rec))
    }

    fn anomaly(&mut self, kind: FormatError, ctx: IoContext) -> Result<(), FilterError> {
        match self.opts.error_policy {
            ErrorPolicy::Warn => {
                self.anomalies += 1;
                log::warn!(
                    "{} line {}: {kind}; grouping lines positionally",
                    self.src,
                    ctx.line_num
                );
                Ok(())
            }
            ErrorPolicy::Return => Err(FilterError::fmt_err(kind, &self.src, ctx)),
        }
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

impl Iterator for FastqReader {
    type Item = Result<FastqRecord, FilterError>;
    fn next(&mut self) -> Option<Self::Item> {
        FastqReader::next(self)
    }
}
