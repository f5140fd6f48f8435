//! Pass 1: collect the ids of reads to drop.

use crate::error::FilterError;
use crate::read_id::ReadId;
use crate::record::FastqRecord;
use std::collections::HashSet;
use std::collections::hash_set;

/// Progress is logged every this many records.
pub(crate) const PROGRESS_EVERY: u64 = 1_000_000;

/// Read ids slated for removal. Membership is the only signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet {
    ids: HashSet<ReadId>,
}

impl SkipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not already present.
    pub fn insert(&mut self, id: ReadId) -> bool {
        self.ids.insert(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, ReadId> {
        self.ids.iter()
    }

    /// Union of two sets; used to combine forward- and reverse-derived sets.
    pub fn merge(mut self, other: SkipSet) -> SkipSet {
        if self.ids.len() < other.ids.len() {
            return other.merge(self);
        }
        self.ids.extend(other.ids);
        self
    }
}

impl Extend<ReadId> for SkipSet {
    fn extend<I: IntoIterator<Item = ReadId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl FromIterator<ReadId> for SkipSet {
    fn from_iter<I: IntoIterator<Item = ReadId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SkipSet {
    type Item = ReadId;
    type IntoIter = hash_set::IntoIter<ReadId>;
    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a SkipSet {
    type Item = &'a ReadId;
    type IntoIter = hash_set::Iter<'a, ReadId>;
    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Counters from one build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records seen.
    pub evaluated: u64,
    /// Records at or under the threshold (mates of one fragment may both count).
    pub short: u64,
}

/// Scans a record stream and collects the ids of reads with
/// `sequence length <= threshold`.
#[derive(Debug, Clone, Copy)]
pub struct SkipSetBuilder {
    threshold: usize,
    paired: bool,
}

impl SkipSetBuilder {
    pub fn new(threshold: usize, paired: bool) -> Self {
        Self { threshold, paired }
    }

    /// Consume `records` and return the skip set.
    pub fn build<I>(&self, records: I) -> Result<SkipSet, FilterError>
    where
        I: IntoIterator<Item = Result<FastqRecord, FilterError>>,
    {
        self.build_with_stats(records).map(|(set, _)| set)
    }

    /// Like [`build`](Self::build), also returning pass counters.
    pub fn build_with_stats<I>(&self, records: I) -> Result<(SkipSet, BuildStats), FilterError>
    where
        I: IntoIterator<Item = Result<FastqRecord, FilterError>>,
    {
        let mut set = SkipSet::new();
        let mut stats = BuildStats::default();
        for rec in records {
            let rec = rec?;
            stats.evaluated += 1;
            if stats.evaluated % PROGRESS_EVERY == 0 {
                log::info!("reads evaluated {}", stats.evaluated);
            }
            if !rec.is_short(self.threshold) {
                continue;
            }
            if let Some(id) = rec.read_id(self.paired) {
                stats.short += 1;
                set.insert(id);
            }
        }
        log::info!("reads evaluated {}", stats.evaluated);
        Ok((set, stats))
    }
}
