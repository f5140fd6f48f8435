use crate::read_id::{ReadId, normalize_read_id};

/// One positional 4-line FASTQ group.
///
/// Lines are stored without their terminators. `seq`, `plus` and `qual` are
/// `None` only for a trailing group cut short by end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub header: String,
    pub seq: Option<String>,
    pub plus: Option<String>,
    pub qual: Option<String>,
}

impl FastqRecord {
    pub fn new(
        header: impl Into<String>,
        seq: impl Into<String>,
        plus: impl Into<String>,
        qual: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            seq: Some(seq.into()),
            plus: Some(plus.into()),
            qual: Some(qual.into()),
        }
    }

    #[inline]
    pub fn has_header(&self) -> bool {
        self.header.starts_with('@')
    }

    /// Number of lines present (4 unless truncated).
    pub fn line_count(&self) -> usize {
        1 + [&self.seq, &self.plus, &self.qual]
            .iter()
            .filter(|l| l.is_some())
            .count()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.line_count() == 4
    }

    /// Sequence line length, if the record has one. Trailing whitespace is
    /// not counted.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        self.seq
            .as_deref()
            .map(|s| s.trim_end_matches(|c: char| c.is_ascii_whitespace()).len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len().unwrap_or(0) == 0
    }

    /// True when the sequence line exists and is at most `threshold` long.
    #[inline]
    pub fn is_short(&self, threshold: usize) -> bool {
        self.len().is_some_and(|n| n <= threshold)
    }

    /// Normalized id, or `None` when the header lacks the `@` marker.
    pub fn read_id(&self, paired: bool) -> Option<ReadId> {
        self.has_header()
            .then(|| normalize_read_id(&self.header, paired))
    }

    /// The lines actually present, in file order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.as_str()).chain(
            [&self.seq, &self.plus, &self.qual]
                .into_iter()
                .map_while(|l| l.as_deref()),
        )
    }
}
